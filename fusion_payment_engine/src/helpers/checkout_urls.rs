use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{db_types::OrderId, helpers::mint_checksum};

/// The outward-facing URLs minted for an order when it is created.
///
/// All four URLs embed the same checksum token, so a payment provider (or the sandbox checkout page) can hit any of
/// them and the notification handler will authenticate the call against the stored order. Construction is pure; no
/// state is consulted beyond the arguments.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutUrls {
    /// Where the payment provider posts the payment outcome.
    pub callback_url: String,
    /// The callback, flagged as a successful-payment redirect.
    pub success_url: String,
    /// The callback, flagged as a failed-payment redirect.
    pub fail_url: String,
    /// The hosted checkout page the customer is sent to.
    pub checkout_url: String,
}

impl CheckoutUrls {
    /// Build the URL set for an order. `base_url` is the public address of this gateway and must end with a `/`.
    pub fn generate(base_url: &str, order_id: OrderId, ipn_url: &str, order_date: DateTime<Utc>) -> Self {
        let checksum = mint_checksum(order_id, ipn_url, order_date);
        let callback_url = format!("{base_url}?action=ipn&checksum={checksum}&order_id={order_id}");
        let success_url = format!("{callback_url}&success=true");
        let fail_url = format!("{callback_url}&fail=true");
        let checkout_url = format!("{base_url}checkout?order_id={order_id}&checksum={checksum}");
        Self { callback_url, success_url, fail_url, checkout_url }
    }
}
