use thiserror::Error;

use crate::db_types::{NewOrder, Order, OrderId, SettlementUpdate};

/// The persistence contract for the payment gateway: one row per order, with create, read and conditional-settle
/// operations. The engine never deletes orders.
#[allow(async_fn_in_trait)]
pub trait PaymentGatewayDatabase {
    /// Stores a new order and returns the full record, including the `order_id` the backend assigned to it.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, PaymentGatewayError>;

    /// Fetches the order with the given id, or `None` if it does not exist.
    async fn fetch_order_by_id(&self, order_id: OrderId) -> Result<Option<Order>, PaymentGatewayError>;

    /// Applies a payment outcome to the order in a single atomic, conditional write. `status`, `received_amount` and
    /// `transaction_id` are always set together.
    ///
    /// The write is guarded: an order whose status is already `Paid` is left untouched and `None` is returned, so
    /// two concurrent notifications for the same order cannot both apply. A `Failed` order is *not* guarded; a later
    /// `Paid` outcome overwrites it.
    ///
    /// Returns the updated order record when the write applied.
    async fn settle_order(
        &self,
        order_id: OrderId,
        update: SettlementUpdate,
    ) -> Result<Option<Order>, PaymentGatewayError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), PaymentGatewayError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum PaymentGatewayError {
    #[error("We have an internal database engine error (configuration/uptime etc.): {0}")]
    DatabaseError(String),
    #[error("Order not found.")]
    OrderNotFound(OrderId),
    #[error("Invalid checksum")]
    InvalidChecksum,
    #[error("Invalid payment status: {0}")]
    InvalidPaymentStatus(String),
}

impl From<sqlx::Error> for PaymentGatewayError {
    fn from(e: sqlx::Error) -> Self {
        PaymentGatewayError::DatabaseError(e.to_string())
    }
}
