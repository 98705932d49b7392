//! Fusion Payment Engine
//!
//! The Fusion Payment Engine holds the core logic of the payment gateway: the order lifecycle, the checksum scheme
//! that authenticates notification callbacks, and the idempotent settlement flow that is triggered when a payment
//! provider reports an outcome. It is HTTP-framework agnostic.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@sqlite`]). SQLite is the supported backend. You should never need to
//!    access the database directly. Instead, use the public API provided by the engine. The exception is the data
//!    types used in the database. These are defined in the `db_types` module and are public.
//! 2. The engine public API ([`OrderFlowApi`]). This provides the public-facing functionality of the engine: creating
//!    orders, fetching them, and applying authenticated payment notifications. Backends need to implement the traits
//!    in the [`mod@traits`] module in order to act as storage for the gateway server.
pub mod db_types;
pub mod helpers;
pub mod sqlite;
pub mod traits;

mod order_flow_api;

pub use order_flow_api::{IpnResolution, IpnTransition, OrderFlowApi};
pub use sqlite::SqliteDatabase;
