//! Discovery dispatch.
//!
//! A single responder is subscribed on all 9 discovery subjects and picks the
//! reply by the type token in the subject.

pub mod discovery;

pub use discovery::DiscoveryResponder;
