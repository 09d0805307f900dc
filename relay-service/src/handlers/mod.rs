//! HTTP handlers for relay-service.

pub mod index;
pub mod relay;

pub use index::{index, not_found};
pub use relay::relay_events;
