use chrono::Utc;
use fpg_common::Money;
use fusion_payment_engine::{
    db_types::{NewOrder, Order, OrderId, OrderStatusType, SettlementUpdate},
    helpers::CHECKSUM_DATE_FORMAT,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::ServerError;

//--------------------------------------      ApiResponse      -------------------------------------------------------
/// The envelope every gateway response is wrapped in. The Fusion system keys off the `status` field; `data` is
/// `[]` rather than `null` when there is no payload.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub data: Value,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<S: Into<String>>(message: S, data: Value) -> Self {
        Self { status: "success".into(), message: message.into(), data, timestamp: timestamp() }
    }

    pub fn error<S: Into<String>>(message: S) -> Self {
        Self { status: "error".into(), message: message.into(), data: json!([]), timestamp: timestamp() }
    }
}

fn timestamp() -> String {
    Utc::now().format(CHECKSUM_DATE_FORMAT).to_string()
}

//--------------------------------------    NewOrderRequest    -------------------------------------------------------
/// The create-order payload. Every field is required; validation reports the first missing one by name, in
/// declaration order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewOrderRequest {
    pub amount: Option<Money>,
    pub currency_code: Option<String>,
    pub description: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub custom_id: Option<String>,
    pub ipn_url: Option<String>,
    pub success_url: Option<String>,
    pub fail_url: Option<String>,
}

impl NewOrderRequest {
    pub fn into_new_order(self) -> Result<NewOrder, ServerError> {
        let amount = self.amount.ok_or_else(|| missing_field("amount"))?;
        let currency_code = required(self.currency_code, "currency_code")?;
        let description = required(self.description, "description")?;
        let customer_name = required(self.customer_name, "customer_name")?;
        let customer_email = required(self.customer_email, "customer_email")?;
        let custom_id = required(self.custom_id, "custom_id")?;
        let ipn_url = required(self.ipn_url, "ipn_url")?;
        let success_url = required(self.success_url, "success_url")?;
        let fail_url = required(self.fail_url, "fail_url")?;
        Ok(NewOrder::new(
            amount,
            currency_code,
            description,
            customer_name,
            customer_email,
            custom_id,
            ipn_url,
            success_url,
            fail_url,
        ))
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, ServerError> {
    value.filter(|v| !v.trim().is_empty()).ok_or_else(|| missing_field(field))
}

fn missing_field(field: &str) -> ServerError {
    ServerError::InvalidRequestBody(format!("The field '{field}' is required."))
}

//--------------------------------------    OrderCreatedData   -------------------------------------------------------
#[derive(Debug, Clone, Serialize)]
pub struct OrderCreatedData {
    pub order_id: OrderId,
    /// The hosted checkout URL the customer is sent to.
    pub order_url: String,
}

//--------------------------------------     OrderSnapshot     -------------------------------------------------------
/// The outward view of an order. The stored callback URLs are internal and deliberately absent.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSnapshot {
    pub order_id: OrderId,
    pub amount: Money,
    pub description: String,
    pub currency_code: String,
    pub custom_id: String,
    pub status: OrderStatusType,
    pub received_amount: Option<Money>,
    pub transaction_id: Option<String>,
    pub order_date: String,
}

impl From<Order> for OrderSnapshot {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.order_id,
            amount: order.amount,
            description: order.description,
            currency_code: order.currency_code,
            custom_id: order.custom_id,
            status: order.status,
            received_amount: order.received_amount,
            transaction_id: order.transaction_id,
            order_date: order.order_date.format(CHECKSUM_DATE_FORMAT).to_string(),
        }
    }
}

//--------------------------------------      IpnRequest       -------------------------------------------------------
/// The payment-outcome callback payload. The checksum rides in the query string, not here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IpnRequest {
    pub order_id: Option<i64>,
    pub payment_status: Option<String>,
    pub received_amount: Option<Money>,
    pub transaction_id: Option<String>,
}

impl IpnRequest {
    pub fn into_update(self) -> Result<(OrderId, SettlementUpdate), ServerError> {
        let order_id = self.order_id.filter(|&id| id > 0).map(OrderId).ok_or(ServerError::InvalidOrderId)?;
        let status_str = self.payment_status.ok_or_else(|| missing_field("payment_status"))?;
        // Only terminal outcomes are acceptable in a callback; "Pending" is not a payment result.
        let status = status_str
            .parse::<OrderStatusType>()
            .ok()
            .filter(|s| *s != OrderStatusType::Pending)
            .ok_or_else(|| ServerError::InvalidRequestBody(format!("Invalid payment status '{status_str}'.")))?;
        let received_amount = self.received_amount.ok_or_else(|| missing_field("received_amount"))?;
        let transaction_id = required(self.transaction_id, "transaction_id")?;
        Ok((order_id, SettlementUpdate { status, received_amount, transaction_id }))
    }
}

//--------------------------------------     GatewayQuery      -------------------------------------------------------
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayQuery {
    pub action: Option<String>,
    pub checksum: Option<String>,
    pub order_id: Option<String>,
}

//--------------------------------------    IpnResponseData    -------------------------------------------------------
#[derive(Debug, Clone, Serialize)]
pub struct IpnResponseData {
    /// Where the payment provider should send the customer next.
    pub redirect_url: String,
    /// The relay outcome message, present only when this notification triggered a relay to Fusion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipn_response: Option<String>,
}
