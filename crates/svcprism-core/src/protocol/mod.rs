//! Discovery protocol modules.
//!
//! - `subject`: the reserved `$SRV` subject hierarchy, endpoint naming, and
//!   token wildcard matching.
//! - `response`: JSON shapes of the PING/INFO/STATS replies.
//!
//! Everything here is pure: no I/O, no clocks, no locks.

pub mod response;
pub mod subject;

pub use response::{InfoEndpoint, InfoResponse, PingResponse, StatsEndpoint, StatsResponse};
pub use subject::{DiscoveryKind, DEFAULT_PREFIX};
