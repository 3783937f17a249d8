//! Lightweight in-process metrics for the discovery responder.
//!
//! Counters are stored as atomics keyed by sorted label sets and rendered in
//! Prometheus text exposition format on demand.

pub mod metrics;
