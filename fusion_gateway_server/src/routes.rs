//! Request handler definitions.
//!
//! The gateway exposes one resource and dispatches on the `action` query parameter, because that is the calling
//! convention the Fusion plugin uses. Keep the dispatch table here and the per-action logic in its own function.
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use fusion_payment_engine::{
    db_types::OrderId,
    helpers::CheckoutUrls,
    traits::PaymentGatewayDatabase,
    IpnTransition,
    OrderFlowApi,
};
use log::*;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::{
    auth::{require_api_key, ApiKeyStore},
    config::ServerConfig,
    data_objects::{
        ApiResponse,
        GatewayQuery,
        IpnRequest,
        IpnResponseData,
        NewOrderRequest,
        OrderCreatedData,
        OrderSnapshot,
    },
    errors::ServerError,
    integrations::RelayNotifier,
};

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

// ----------------------------------------------   Gateway  ---------------------------------------------------
pub async fn gateway<B, N>(
    req: HttpRequest,
    query: web::Query<GatewayQuery>,
    body: web::Bytes,
    api: web::Data<OrderFlowApi<B>>,
    notifier: web::Data<N>,
    keys: web::Data<ApiKeyStore>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, ServerError>
where
    B: PaymentGatewayDatabase,
    N: RelayNotifier,
{
    let query = query.into_inner();
    match query.action.as_deref() {
        Some("create_order") => create_order(&req, &body, api.as_ref(), keys.as_ref(), config.as_ref()).await,
        Some("get_order") => get_order(&req, &query, api.as_ref(), keys.as_ref()).await,
        Some("ipn") => process_ipn(&query, &body, api.as_ref(), notifier.as_ref()).await,
        _ => Err(ServerError::UnknownAction),
    }
}

async fn create_order<B: PaymentGatewayDatabase>(
    req: &HttpRequest,
    body: &web::Bytes,
    api: &OrderFlowApi<B>,
    keys: &ApiKeyStore,
    config: &ServerConfig,
) -> Result<HttpResponse, ServerError> {
    require_api_key(req, keys)?;
    let request: NewOrderRequest = parse_json_body(body)?;
    let new_order = request.into_new_order()?;
    debug!("💻️ Creating order for Fusion order {}", new_order.custom_id);
    let order = api.process_new_order(new_order).await?;
    let urls = CheckoutUrls::generate(&config.base_url, order.order_id, &order.ipn_url, order.order_date);
    let data = OrderCreatedData { order_id: order.order_id, order_url: urls.checkout_url };
    Ok(HttpResponse::Ok().json(ApiResponse::success("Order created successfully!", json!(data))))
}

async fn get_order<B: PaymentGatewayDatabase>(
    req: &HttpRequest,
    query: &GatewayQuery,
    api: &OrderFlowApi<B>,
    keys: &ApiKeyStore,
) -> Result<HttpResponse, ServerError> {
    require_api_key(req, keys)?;
    let order_id = query
        .order_id
        .as_deref()
        .and_then(|s| s.parse::<OrderId>().ok())
        .filter(|id| id.value() > 0)
        .ok_or(ServerError::InvalidOrderId)?;
    let order =
        api.fetch_order(order_id).await?.ok_or_else(|| ServerError::NoRecordFound("Order not found.".into()))?;
    let snapshot = OrderSnapshot::from(order);
    Ok(HttpResponse::Ok().json(ApiResponse::success("Order details fetched successfully!", json!(snapshot))))
}

async fn process_ipn<B: PaymentGatewayDatabase, N: RelayNotifier>(
    query: &GatewayQuery,
    body: &web::Bytes,
    api: &OrderFlowApi<B>,
    notifier: &N,
) -> Result<HttpResponse, ServerError> {
    let checksum =
        query.checksum.as_deref().filter(|s| !s.is_empty()).ok_or(ServerError::MissingChecksum)?.to_string();
    let request: IpnRequest = parse_json_body(body)?;
    let (order_id, update) = request.into_update()?;
    let resolution = api.process_payment_notification(order_id, &checksum, update).await?;
    let redirect_url = resolution.redirect_url().to_string();
    let (message, ipn_response) = match resolution.transition {
        IpnTransition::AlreadyPaid => {
            (format!("Order status already updated to {}", resolution.order.status), None)
        },
        IpnTransition::Applied => {
            let ipn_response = if resolution.requires_relay() {
                let outcome = notifier.notify(&resolution.order.ipn_url, order_id).await;
                if !outcome.success {
                    // The order stays Paid regardless. Fusion reconciles via get_order.
                    warn!("💻️ Relay for order [{order_id}] failed: {}", outcome.message);
                }
                Some(outcome.message)
            } else {
                None
            };
            ("Order details updated successfully!".to_string(), ipn_response)
        },
    };
    let data = IpnResponseData { redirect_url, ipn_response };
    Ok(HttpResponse::Ok().json(ApiResponse::success(message, json!(data))))
}

fn parse_json_body<T: DeserializeOwned>(body: &web::Bytes) -> Result<T, ServerError> {
    if body.is_empty() {
        return Err(ServerError::InvalidRequestBody("Request payload cannot be empty.".into()));
    }
    serde_json::from_slice(body)
        .map_err(|e| ServerError::InvalidRequestBody(format!("Invalid JSON payload: {e}")))
}
