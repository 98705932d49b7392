use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Timelike, Utc};
use fpg_common::Money;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------        OrderId        -------------------------------------------------------
/// The numeric identifier assigned to an order at creation time. It is immutable thereafter: together with the
/// stored `ipn_url` and `order_date` it forms the input of the callback checksum, so it must never be reissued or
/// rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderId(pub i64);

impl OrderId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for OrderId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for OrderId {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self).map_err(|_| ConversionError(format!("Invalid order id: {s}")))
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------   OrderStatusType     -------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatusType {
    /// The order is newly created, and no payment outcome has been received.
    #[default]
    Pending,
    /// The payment provider confirmed the payment. Terminal: once an order is `Paid`, further updates are no-ops.
    Paid,
    /// The payment provider reported a failure. Not guarded against overwrite: a later `Paid` callback for the same
    /// order is still applied.
    Failed,
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "Pending"),
            OrderStatusType::Paid => write!(f, "Paid"),
            OrderStatusType::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ConversionError(pub String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Paid" => Ok(Self::Paid),
            "Failed" => Ok(Self::Failed),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

//--------------------------------------        Order       ----------------------------------------------------------
/// A single order row. `order_id`, `ipn_url` and `order_date` are immutable after creation; the settlement fields
/// (`status`, `received_amount`, `transaction_id`) are written exactly once, together, by the notification flow.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub amount: Money,
    pub currency_code: String,
    pub description: String,
    pub customer_name: String,
    pub customer_email: String,
    /// The Fusion-side order identifier.
    pub custom_id: String,
    /// Fusion's webhook endpoint for this order. Checksum input.
    pub ipn_url: String,
    pub success_url: String,
    pub fail_url: String,
    /// Set at creation, immutable. Checksum input.
    pub order_date: DateTime<Utc>,
    pub status: OrderStatusType,
    pub received_amount: Option<Money>,
    pub transaction_id: Option<String>,
}

//--------------------------------------        NewOrder       -------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub amount: Money,
    pub currency_code: String,
    pub description: String,
    pub customer_name: String,
    pub customer_email: String,
    pub custom_id: String,
    pub ipn_url: String,
    pub success_url: String,
    pub fail_url: String,
    /// The creation timestamp, truncated to whole seconds so that its checksum rendering is stable.
    pub order_date: DateTime<Utc>,
}

impl NewOrder {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        amount: Money,
        currency_code: String,
        description: String,
        customer_name: String,
        customer_email: String,
        custom_id: String,
        ipn_url: String,
        success_url: String,
        fail_url: String,
    ) -> Self {
        let now = Utc::now();
        let order_date = now.with_nanosecond(0).unwrap_or(now);
        Self {
            amount,
            currency_code,
            description,
            customer_name,
            customer_email,
            custom_id,
            ipn_url,
            success_url,
            fail_url,
            order_date,
        }
    }
}

//--------------------------------------   SettlementUpdate    -------------------------------------------------------
/// The payload of a payment-outcome notification, after validation. The three fields are applied to the order in a
/// single write.
#[derive(Debug, Clone)]
pub struct SettlementUpdate {
    pub status: OrderStatusType,
    pub received_amount: Money,
    pub transaction_id: String,
}
