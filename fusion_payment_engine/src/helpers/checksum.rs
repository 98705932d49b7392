//! The callback checksum scheme.
//!
//! Every outward-facing URL for an order (the notification callback, the success/fail redirects and the hosted
//! checkout page) carries a token that binds the URL to the order it was minted for. The token is a digest of the
//! order's three immutable fields: `order_id`, `ipn_url` and `order_date`. Because those fields never change after
//! creation, a token issued at order-creation time stays verifiable for the life of the order, and no separate
//! token column has to be persisted.
//!
//! The scheme deliberately mixes in no server-held secret, so anyone who can read the order table can forge tokens.
//! That matches the trust model of the callback channel (the `ipn_url` and `order_date` are not guessable by an
//! outside party); mixing in an HMAC key would invalidate URLs already issued.
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::db_types::OrderId;

/// The rendering of `order_date` used as checksum input. Matches the format orders are reported with, so a token
/// can be recomputed from a plain order snapshot.
pub const CHECKSUM_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Derive the checksum token for an order from its immutable fields. Deterministic: the same inputs always yield the
/// same token.
pub fn mint_checksum(order_id: OrderId, ipn_url: &str, order_date: DateTime<Utc>) -> String {
    let date = order_date.format(CHECKSUM_DATE_FORMAT);
    let preimage = format!("{order_id}{ipn_url}{date}");
    let digest = Sha256::digest(preimage.as_bytes());
    format!("{digest:x}")
}

/// Check a supplied token against the checksum recomputed from the *stored* order fields. Any mismatch is a
/// rejection; there is no partial trust.
pub fn verify_checksum(token: &str, order_id: OrderId, ipn_url: &str, order_date: DateTime<Utc>) -> bool {
    mint_checksum(order_id, ipn_url, order_date) == token
}
