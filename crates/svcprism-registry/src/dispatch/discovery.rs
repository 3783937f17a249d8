use std::sync::Arc;

use async_trait::async_trait;

use svcprism_core::error::Result;
use svcprism_core::protocol::subject::kind_of_subject;

use crate::obs::metrics::RegistryMetrics;
use crate::registry::DiscoveryPayloads;
use crate::transport::{Message, SubjectHandler, Transport};

/// Answers PING/INFO/STATS on the reserved subjects.
pub struct DiscoveryResponder {
    prefix: String,
    payloads: Arc<DiscoveryPayloads>,
    metrics: Arc<RegistryMetrics>,
}

impl DiscoveryResponder {
    pub fn new(
        prefix: String,
        payloads: Arc<DiscoveryPayloads>,
        metrics: Arc<RegistryMetrics>,
    ) -> Self {
        Self {
            prefix,
            payloads,
            metrics,
        }
    }
}

#[async_trait]
impl SubjectHandler for DiscoveryResponder {
    async fn handle(&self, transport: &dyn Transport, msg: Message) -> Result<()> {
        // Unreachable with the fixed subscription set; drop without replying.
        let kind = match kind_of_subject(&self.prefix, &msg.subject) {
            Ok(kind) => kind,
            Err(e) => {
                self.metrics.protocol_errors.inc(&[("subject", msg.subject.as_str())]);
                tracing::error!(subject = %msg.subject, error = %e, "discovery message dropped");
                return Err(e);
            }
        };
        tracing::debug!(subject = %msg.subject, kind = kind.as_str(), "discovery request");

        let body = match self.payloads.render(kind) {
            Ok(body) => body,
            Err(e) => {
                self.metrics.reply_failures.inc(&[("kind", kind.as_str())]);
                tracing::error!(
                    subject = %msg.subject,
                    error = %e,
                    "discovery reply encode failed"
                );
                return Err(e);
            }
        };

        if let Err(e) = transport.reply(&msg, body).await {
            self.metrics.reply_failures.inc(&[("kind", kind.as_str())]);
            tracing::error!(subject = %msg.subject, error = %e, "discovery reply failed");
            return Err(e);
        }

        self.metrics.discovery_requests.inc(&[("kind", kind.as_str())]);
        Ok(())
    }
}
