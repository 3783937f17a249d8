use async_trait::async_trait;

use svcprism_core::error::{Result, SvcError};

use crate::transport::{Message, SubjectHandler, Transport};

/// Replies with the request payload. Non-UTF-8 payloads are an error, which
/// an `Instrumented` wrapper counts against the endpoint.
#[derive(Default)]
pub struct EchoService;

impl EchoService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SubjectHandler for EchoService {
    async fn handle(&self, transport: &dyn Transport, msg: Message) -> Result<()> {
        let body = std::str::from_utf8(&msg.payload)
            .map_err(|e| SvcError::Serialization(format!("echo payload not utf8: {e}")))?
            .to_owned();

        if msg.reply.is_none() {
            return Ok(());
        }
        transport.reply(&msg, body).await
    }
}
