//! svcPrism registry library entry.
//!
//! This crate wires the transport boundary, endpoint registry, discovery
//! dispatcher, and responder metrics into a service-discovery runtime. It is
//! consumed by the demo binary (`main.rs`) and by integration tests.

pub mod config;
pub mod dispatch;
pub mod obs;
pub mod registry;
pub mod services;
pub mod transport;

pub use registry::{EndpointInfo, EndpointStats, Instrumented, ServiceIdentity, ServiceRegistry};
pub use transport::{MemoryTransport, Message, SubjectBinding, SubjectHandler, Transport};
