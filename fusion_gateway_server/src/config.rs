use std::{env, time::Duration};

use fpg_common::Secret;
use fusion_payment_engine::sqlite::db::db_url;
use log::*;

const DEFAULT_FPG_HOST: &str = "127.0.0.1";
const DEFAULT_FPG_PORT: u16 = 8380;
const DEFAULT_RELAY_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// The public address of this gateway, as embedded in the checkout and callback URLs handed to the payment
    /// provider. Always carries a trailing `/`.
    pub base_url: String,
    /// The allow-list of API keys accepted in the `X-Api-Key` header for the order endpoints.
    pub api_keys: Secret<Vec<String>>,
    /// Upper bound on the outbound IPN relay call. A slow Fusion endpoint must not hold an inbound request hostage.
    pub relay_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_FPG_HOST.to_string(),
            port: DEFAULT_FPG_PORT,
            database_url: String::default(),
            base_url: format!("http://{DEFAULT_FPG_HOST}:{DEFAULT_FPG_PORT}/"),
            api_keys: Secret::default(),
            relay_timeout: Duration::from_secs(DEFAULT_RELAY_TIMEOUT_SECS),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("FPG_HOST").ok().unwrap_or_else(|| DEFAULT_FPG_HOST.into());
        let port = env::var("FPG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for FPG_PORT. {e} Using the default, {DEFAULT_FPG_PORT}, instead."
                    );
                    DEFAULT_FPG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_FPG_PORT);
        let database_url = db_url();
        let base_url = env::var("FPG_BASE_URL").ok().map(|url| normalize_base_url(&url)).unwrap_or_else(|| {
            let url = format!("http://{host}:{port}/");
            warn!("🪛️ FPG_BASE_URL is not set. Callback URLs will be built against {url}. This is almost certainly \
                   wrong outside of local development.");
            url
        });
        let api_keys = extract_api_keys();
        let relay_timeout = env::var("FPG_RELAY_TIMEOUT")
            .map(|s| {
                s.parse::<u64>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid value for FPG_RELAY_TIMEOUT. {e} Using the default, \
                         {DEFAULT_RELAY_TIMEOUT_SECS}s, instead."
                    );
                    DEFAULT_RELAY_TIMEOUT_SECS
                })
            })
            .ok()
            .unwrap_or(DEFAULT_RELAY_TIMEOUT_SECS);
        Self {
            host,
            port,
            database_url,
            base_url,
            api_keys,
            relay_timeout: Duration::from_secs(relay_timeout),
        }
    }
}

/// The URL generators assume `base_url` ends in exactly one `/`.
fn normalize_base_url(url: &str) -> String {
    format!("{}/", url.trim_end_matches('/'))
}

fn extract_api_keys() -> Secret<Vec<String>> {
    let keys = env::var("FPG_API_KEYS")
        .map(|s| s.split(',').map(|k| k.trim().to_string()).filter(|k| !k.is_empty()).collect::<Vec<String>>())
        .unwrap_or_default();
    if keys.is_empty() {
        warn!("🪛️ FPG_API_KEYS is not set. Every create_order and get_order request will be rejected.");
    } else {
        info!("🪛️ {} API key(s) loaded from FPG_API_KEYS.", keys.len());
    }
    Secret::new(keys)
}
