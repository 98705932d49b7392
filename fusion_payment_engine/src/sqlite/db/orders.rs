use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewOrder, Order, OrderId, SettlementUpdate},
    traits::PaymentGatewayError,
};

/// Inserts a new order into the database using the given connection. The `order_id` is assigned by the database;
/// status defaults to `Pending` and the settlement fields start out NULL.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, PaymentGatewayError> {
    let order: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                amount,
                currency_code,
                description,
                customer_name,
                customer_email,
                custom_id,
                ipn_url,
                success_url,
                fail_url,
                order_date
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *;
        "#,
    )
    .bind(order.amount)
    .bind(order.currency_code)
    .bind(order.description)
    .bind(order.customer_name)
    .bind(order.customer_email)
    .bind(order.custom_id)
    .bind(order.ipn_url)
    .bind(order.success_url)
    .bind(order.fail_url)
    .bind(order.order_date)
    .fetch_one(conn)
    .await?;
    debug!("📝️ Order inserted with id {}", order.order_id);
    Ok(order)
}

/// Returns the order with the given `order_id`, if any.
pub async fn fetch_order_by_id(order_id: OrderId, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE order_id = $1").bind(order_id).fetch_optional(conn).await?;
    Ok(order)
}

/// Applies a settlement update in one conditional write. The `status <> 'Paid'` guard makes the paid-state terminal
/// and race-free: of any number of concurrent notifications, at most one write lands once an order is `Paid`. A
/// `Failed` row carries no guard and may be overwritten by a later outcome.
///
/// Returns the updated row, or `None` if the guard held the write back.
pub async fn settle_order(
    order_id: OrderId,
    update: SettlementUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, PaymentGatewayError> {
    let result: Option<Order> = sqlx::query_as(
        r#"
            UPDATE orders SET
                status = $1,
                received_amount = $2,
                transaction_id = $3
            WHERE order_id = $4 AND status <> 'Paid'
            RETURNING *;
        "#,
    )
    .bind(update.status.to_string())
    .bind(update.received_amount)
    .bind(update.transaction_id)
    .bind(order_id)
    .fetch_optional(conn)
    .await?;
    trace!("📝️ Result of settle_order for order [{order_id}]: applied={}", result.is_some());
    Ok(result)
}
