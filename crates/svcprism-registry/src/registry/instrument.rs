use std::sync::Arc;

use async_trait::async_trait;

use svcprism_core::error::Result;

use crate::transport::{Message, SubjectHandler, Transport};

use super::table::EndpointTable;

/// Business handler wrapper that keeps the endpoint's stats current.
///
/// Per invocation: take a monotonic timestamp, run the handler, then count the
/// request, add the elapsed time, recompute the average, and count an error
/// if the handler returned `Err`. Handler errors stop here; they are counted,
/// not propagated to the transport.
pub struct Instrumented<H> {
    subject: String,
    table: Arc<EndpointTable>,
    inner: H,
}

impl<H: SubjectHandler> Instrumented<H> {
    pub fn new(subject: impl Into<String>, table: Arc<EndpointTable>, inner: H) -> Self {
        Self {
            subject: subject.into(),
            table,
            inner,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }
}

#[async_trait]
impl<H: SubjectHandler> SubjectHandler for Instrumented<H> {
    async fn handle(&self, transport: &dyn Transport, msg: Message) -> Result<()> {
        // Lookup by the bound subject: `msg.subject` is the concrete one.
        let Some(stats) = self.table.stats(&self.subject) else {
            tracing::warn!(subject = %self.subject, "endpoint not registered; stats not recorded");
            return self.inner.handle(transport, msg).await;
        };

        if let Err(e) = stats.observe(self.inner.handle(transport, msg)).await {
            tracing::debug!(subject = %self.subject, error = %e, "handler error counted");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use svcprism_core::error::SvcError;

    use crate::registry::{EndpointInfo, EndpointStats};
    use crate::transport::MemoryTransport;

    struct Flaky;

    #[async_trait]
    impl SubjectHandler for Flaky {
        async fn handle(&self, _transport: &dyn Transport, msg: Message) -> Result<()> {
            if msg.payload.as_ref() == b"fail" {
                return Err(SvcError::Internal("flagged".into()));
            }
            Ok(())
        }
    }

    fn table_with(subject: &str) -> Arc<EndpointTable> {
        let table = Arc::new(EndpointTable::new());
        table.insert(
            Arc::new(EndpointInfo {
                name: "x".into(),
                subject: subject.into(),
                queue_group: "q".into(),
                metadata: Default::default(),
            }),
            Arc::new(EndpointStats::new("x", subject, "q")),
        );
        table
    }

    fn msg(subject: &str, payload: &'static [u8]) -> Message {
        Message {
            subject: subject.into(),
            reply: None,
            payload: Bytes::from_static(payload),
        }
    }

    #[tokio::test]
    async fn counts_requests_and_errors_without_propagating() {
        let table = table_with("name.*.test");
        let h = Instrumented::new("name.*.test", Arc::clone(&table), Flaky);
        let t = MemoryTransport::new();

        h.handle(&t, msg("name.a.test", b"ok")).await.unwrap();
        h.handle(&t, msg("name.b.test", b"fail")).await.unwrap();

        let snap = table.stats("name.*.test").unwrap().snapshot();
        assert_eq!(snap.num_requests, 2);
        assert_eq!(snap.num_errors, 1);
        assert_eq!(snap.average_processing_time, snap.processing_time / 2);
    }

    #[tokio::test]
    async fn unregistered_subject_passes_through() {
        let table = Arc::new(EndpointTable::new());
        let h = Instrumented::new("nope", Arc::clone(&table), Flaky);
        let t = MemoryTransport::new();

        assert!(h.handle(&t, msg("nope", b"fail")).await.is_err());
        assert!(h.handle(&t, msg("nope", b"ok")).await.is_ok());
        assert!(table.is_empty());
    }
}
