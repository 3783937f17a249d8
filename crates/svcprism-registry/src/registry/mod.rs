//! Endpoint registry: identity, endpoint table, live stats, discovery payloads.
//!
//! The table and the payload lists share `Arc`s to the same records, so a
//! stats update made by a business handler is visible to the next STATS reply
//! without copying.

mod endpoint;
mod identity;
mod instrument;
mod payload;
mod service;
mod table;

pub use endpoint::{EndpointInfo, EndpointStats, StatsSnapshot};
pub use identity::ServiceIdentity;
pub use instrument::Instrumented;
pub use payload::DiscoveryPayloads;
pub use service::ServiceRegistry;
pub use table::EndpointTable;
