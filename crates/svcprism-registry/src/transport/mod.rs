//! Transport boundary.
//!
//! The registry only needs three things from a pub/sub transport: the list of
//! bound subjects, a way to subscribe a handler, and a way to reply to a
//! request. Connection management and delivery guarantees stay on the
//! transport side of this trait.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use svcprism_core::error::Result;

pub use memory::MemoryTransport;

/// One inbound message as delivered to a handler.
#[derive(Debug, Clone)]
pub struct Message {
    /// Concrete subject the message was published on.
    pub subject: String,
    /// Inbox to reply to, if the sender expects a response.
    pub reply: Option<String>,
    pub payload: Bytes,
}

/// A subscription as reported by [`Transport::bound_subjects`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectBinding {
    /// Subscription subject (may contain wildcards).
    pub subject: String,
    /// Queue group, empty when the subscription is not queued.
    pub queue_group: String,
    /// Explicit endpoint name supplied at bind time.
    pub description: Option<String>,
}

/// Handler invoked for every message on a subscribed subject.
///
/// The transport passes itself in so handlers can reply without owning a
/// reference back to it.
#[async_trait]
pub trait SubjectHandler: Send + Sync {
    async fn handle(&self, transport: &dyn Transport, msg: Message) -> Result<()>;
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Current subscriptions, in subscription order.
    fn bound_subjects(&self) -> Vec<SubjectBinding>;

    fn subscribe(
        &self,
        subject: &str,
        queue_group: Option<&str>,
        handler: Arc<dyn SubjectHandler>,
    ) -> Result<()>;

    /// Send `payload` as the response to `msg`.
    async fn reply(&self, msg: &Message, payload: String) -> Result<()>;
}
