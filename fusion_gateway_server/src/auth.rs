use actix_web::HttpRequest;
use fpg_common::Secret;
use log::*;

use crate::errors::AuthError;

pub const API_KEY_HEADER: &str = "X-Api-Key";

/// The allow-list of API keys accepted on the order endpoints. There is no user model behind it; a key either is
/// on the list or it is not.
#[derive(Clone, Debug, Default)]
pub struct ApiKeyStore {
    keys: Secret<Vec<String>>,
}

impl ApiKeyStore {
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys: Secret::new(keys) }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.reveal().iter().any(|k| k == key)
    }
}

/// Checks the `X-Api-Key` header against the allow-list. The two failure modes are deliberately distinguishable to
/// the caller, matching the messages Fusion integrators already handle.
pub fn require_api_key(req: &HttpRequest, store: &ApiKeyStore) -> Result<(), AuthError> {
    let header = req.headers().get(API_KEY_HEADER).ok_or(AuthError::MissingApiKey)?;
    let key = header.to_str().map_err(|_| AuthError::InvalidApiKey)?;
    if store.contains(key) {
        Ok(())
    } else {
        warn!("💻️ Rejected request carrying an unknown API key.");
        Err(AuthError::InvalidApiKey)
    }
}
