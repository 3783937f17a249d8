//! svcPrism core: transport-agnostic discovery protocol primitives and error types.
//!
//! This crate defines the discovery subject hierarchy, the wire shapes of the
//! PING/INFO/STATS responses, and the error surface shared by the registry
//! runtime and its tests. It carries no transport or runtime dependencies so
//! it can be reused by discovery clients as well as responders.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `SvcError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{Result, SvcError};
