//! `SqliteDatabase` is a concrete implementation of a Fusion Payment Engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements the traits defined in the [`crate::traits`] module.
use std::fmt::Debug;

use sqlx::SqlitePool;

use super::db::{new_pool, orders};
use crate::{
    db_types::{NewOrder, Order, OrderId, SettlementUpdate},
    traits::{PaymentGatewayDatabase, PaymentGatewayError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new connection pool for the given database URL and returns a new instance of `SqliteDatabase`.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, PaymentGatewayError> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { pool })
    }

    /// Brings the schema up to date. Called once at server startup, before any requests are served.
    pub async fn run_migrations(&self) -> Result<(), PaymentGatewayError> {
        sqlx::migrate!("./src/sqlite/migrations")
            .run(&self.pool)
            .await
            .map_err(|e| PaymentGatewayError::DatabaseError(e.to_string()))
    }
}

impl PaymentGatewayDatabase for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, PaymentGatewayError> {
        // The write must be committed before this call returns, or a fetch on another pooled connection can miss
        // the row we have just handed back to the caller.
        let mut tx = self.pool.begin().await?;
        let order = orders::insert_order(order, &mut *tx).await?;
        tx.commit().await?;
        Ok(order)
    }

    async fn fetch_order_by_id(&self, order_id: OrderId) -> Result<Option<Order>, PaymentGatewayError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_id(order_id, &mut conn).await?;
        Ok(order)
    }

    async fn settle_order(
        &self,
        order_id: OrderId,
        update: SettlementUpdate,
    ) -> Result<Option<Order>, PaymentGatewayError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::settle_order(order_id, update, &mut *tx).await?;
        tx.commit().await?;
        Ok(order)
    }

    async fn close(&mut self) -> Result<(), PaymentGatewayError> {
        self.pool.close().await;
        Ok(())
    }
}
