//! Outbound integrations. Currently only the Fusion IPN relay.

mod fusion;

pub use fusion::{FusionNotifier, RelayNotifier, RelayOutcome};
