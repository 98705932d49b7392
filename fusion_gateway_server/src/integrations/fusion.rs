use std::time::Duration;

use fusion_payment_engine::db_types::OrderId;
use log::*;
use reqwest::StatusCode;
use serde_json::json;

use crate::errors::ServerError;

/// The result of one relay attempt. Delivery failure is reported, never retried, and never unwinds the order's
/// persisted state.
#[derive(Debug, Clone)]
pub struct RelayOutcome {
    pub success: bool,
    pub message: String,
}

/// Pushes a confirmed-charge event back to the Fusion system's webhook endpoint.
#[allow(async_fn_in_trait)]
pub trait RelayNotifier {
    async fn notify(&self, ipn_url: &str, order_id: OrderId) -> RelayOutcome;
}

#[derive(Clone)]
pub struct FusionNotifier {
    client: reqwest::Client,
}

impl FusionNotifier {
    pub fn new(timeout: Duration) -> Result<Self, ServerError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServerError::InitializeError(format!("Could not construct the relay HTTP client. {e}")))?;
        Ok(Self { client })
    }
}

impl RelayNotifier for FusionNotifier {
    async fn notify(&self, ipn_url: &str, order_id: OrderId) -> RelayOutcome {
        let payload = json!({"event": {"type": "charge:confirmed", "data": {"order_id": order_id}}});
        debug!("🚛️ Relaying charge:confirmed for order [{order_id}] to {ipn_url}");
        match self.client.post(ipn_url).json(&payload).send().await {
            Ok(response) => {
                let code = response.status();
                let body = response.text().await.unwrap_or_default();
                if code == StatusCode::OK {
                    info!("🚛️ Fusion accepted the IPN for order [{order_id}].");
                    RelayOutcome {
                        success: true,
                        message: format!("IPN data sent successfully to the Fusion system: {body}"),
                    }
                } else {
                    warn!("🚛️ Fusion rejected the IPN for order [{order_id}]. HTTP {code}: {body}");
                    RelayOutcome { success: false, message: format!("Fusion system returned HTTP {code}: {body}") }
                }
            },
            Err(e) => {
                warn!("🚛️ Could not deliver the IPN for order [{order_id}] to {ipn_url}. {e}");
                RelayOutcome { success: false, message: format!("Could not reach the Fusion system: {e}") }
            },
        }
    }
}
