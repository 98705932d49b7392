//! The Fusion payment gateway HTTP server.
//!
//! A thin actix-web layer over [`fusion_payment_engine`]. The server exposes a single gateway resource that
//! dispatches on the `action` query parameter (`create_order`, `get_order`, `ipn`), wraps every response in the
//! uniform JSON envelope the Fusion system expects, and relays confirmed charges back to Fusion over HTTP.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
