//! Gateway: HTTP receiver for Webex webhook deliveries.
//!
//! Single port serves a health probe and the webhook route. Each delivery is
//! handled on its own request task and answered with the dispatch outcome.

mod server;

pub use server::{router, run_gateway, GatewayState};
