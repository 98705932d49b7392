//! The behaviour contracts that storage backends must fulfil to drive the payment engine.
mod payment_gateway_database;

pub use payment_gateway_database::{PaymentGatewayDatabase, PaymentGatewayError};
