use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use futures_util::future::join_all;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::time::{timeout, Duration};
use uuid::Uuid;

use svcprism_core::error::{Result, SvcError};
use svcprism_core::protocol::subject::subject_matches;

use super::{Message, SubjectBinding, SubjectHandler, Transport};

const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 1000;
/// Replies buffered per request inbox; extra replies are dropped.
const INBOX_CAPACITY: usize = 16;

struct Subscription {
    binding: SubjectBinding,
    handler: Arc<dyn SubjectHandler>,
}

/// In-process pub/sub transport.
///
/// - Wildcard subscriptions (`*`, `>`) with NATS token semantics
/// - Queue groups: one member per group receives each message (round-robin)
/// - Request/reply through `_INBOX.<uuid>` subjects
///
/// `publish` runs handlers to completion before returning. `request` delivers
/// on a spawned task and returns as soon as the first reply arrives, so a slow
/// handler or a crowded inbox never holds the requester past its timeout.
pub struct MemoryTransport {
    subs: RwLock<Vec<Subscription>>,
    inboxes: DashMap<String, mpsc::Sender<String>>,
    rr: AtomicUsize,
    request_timeout: Duration,
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self {
            subs: RwLock::new(Vec::new()),
            inboxes: DashMap::new(),
            rr: AtomicUsize::new(0),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Bind a business subject. This is what the application does for every
    /// endpoint before the registry enumerates bindings.
    pub fn bind(
        &self,
        subject: &str,
        queue_group: &str,
        description: Option<&str>,
        handler: Arc<dyn SubjectHandler>,
    ) -> Result<()> {
        let binding = SubjectBinding {
            subject: subject.to_string(),
            queue_group: queue_group.to_string(),
            description: description.map(str::to_string),
        };
        self.push(binding, handler)
    }

    /// Publish a message; returns the number of handlers it was delivered to.
    pub async fn publish(&self, subject: &str, payload: Bytes) -> Result<usize> {
        let msg = Message {
            subject: subject.to_string(),
            reply: None,
            payload,
        };
        self.deliver(msg).await
    }

    /// Publish with a fresh inbox and wait for the first reply.
    ///
    /// `Ok(None)` when nobody is subscribed or no reply arrives within the
    /// request timeout. Handlers keep running after the first reply.
    pub async fn request(
        self: &Arc<Self>,
        subject: &str,
        payload: Bytes,
    ) -> Result<Option<String>> {
        let inbox = format!("_INBOX.{}", Uuid::new_v4().simple());
        let (tx, mut rx) = mpsc::channel(INBOX_CAPACITY);
        self.inboxes.insert(inbox.clone(), tx);

        let msg = Message {
            subject: subject.to_string(),
            reply: Some(inbox.clone()),
            payload,
        };
        let this = Arc::clone(self);
        let mut delivery = tokio::spawn(async move { this.deliver(msg).await });

        // Every handler has finished once delivery resolves, so any reply is
        // already buffered.
        let wait = async {
            tokio::select! {
                reply = rx.recv() => Ok::<_, SvcError>(reply),
                delivered = &mut delivery => match delivered {
                    Ok(Ok(_)) => Ok(rx.try_recv().ok()),
                    Ok(Err(e)) => Err(e),
                    Err(e) => Err(SvcError::Internal(format!("delivery task failed: {e}"))),
                },
            }
        };
        let out = timeout(self.request_timeout, wait).await.unwrap_or(Ok(None));

        self.inboxes.remove(&inbox);
        out
    }

    fn push(&self, binding: SubjectBinding, handler: Arc<dyn SubjectHandler>) -> Result<()> {
        if binding.subject.is_empty() {
            return Err(SvcError::Transport("subject must not be empty".into()));
        }
        tracing::debug!(
            subject = %binding.subject,
            queue_group = %binding.queue_group,
            "subscribed"
        );
        self.write().push(Subscription { binding, handler });
        Ok(())
    }

    /// Pick the handlers that receive `subject`: every plain subscriber plus
    /// one member of each matching queue group.
    fn route(&self, subject: &str) -> Vec<Arc<dyn SubjectHandler>> {
        let subs = self.read();
        let mut plain = Vec::new();
        let mut groups: Vec<(&str, Vec<Arc<dyn SubjectHandler>>)> = Vec::new();

        for s in subs.iter().filter(|s| subject_matches(&s.binding.subject, subject)) {
            let group = s.binding.queue_group.as_str();
            if group.is_empty() {
                plain.push(Arc::clone(&s.handler));
                continue;
            }
            match groups.iter_mut().find(|(g, _)| *g == group) {
                Some((_, members)) => members.push(Arc::clone(&s.handler)),
                None => groups.push((group, vec![Arc::clone(&s.handler)])),
            }
        }

        let turn = self.rr.fetch_add(1, Ordering::Relaxed);
        for (_, members) in groups {
            plain.push(Arc::clone(&members[turn % members.len()]));
        }
        plain
    }

    async fn deliver(&self, msg: Message) -> Result<usize> {
        let handlers = self.route(&msg.subject);
        let n = handlers.len();

        let results = join_all(handlers.iter().map(|h| h.handle(self, msg.clone()))).await;
        for res in results {
            if let Err(e) = res {
                tracing::warn!(
                    subject = %msg.subject,
                    code = e.code().as_str(),
                    error = %e,
                    "handler failed"
                );
            }
        }
        Ok(n)
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Subscription>> {
        self.subs.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Subscription>> {
        self.subs.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    fn bound_subjects(&self) -> Vec<SubjectBinding> {
        self.read().iter().map(|s| s.binding.clone()).collect()
    }

    fn subscribe(
        &self,
        subject: &str,
        queue_group: Option<&str>,
        handler: Arc<dyn SubjectHandler>,
    ) -> Result<()> {
        let binding = SubjectBinding {
            subject: subject.to_string(),
            queue_group: queue_group.unwrap_or_default().to_string(),
            description: None,
        };
        self.push(binding, handler)
    }

    /// Never blocks: a full inbox drops the reply, a closed one is an error.
    async fn reply(&self, msg: &Message, payload: String) -> Result<()> {
        let inbox = msg
            .reply
            .as_deref()
            .ok_or_else(|| SvcError::Transport(format!("no reply subject on {}", msg.subject)))?;
        let tx = self
            .inboxes
            .get(inbox)
            .map(|r| r.value().clone())
            .ok_or_else(|| SvcError::Transport(format!("unknown inbox: {inbox}")))?;

        match tx.try_send(payload) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                tracing::debug!(%inbox, "inbox full; reply dropped");
                Ok(())
            }
            Err(TrySendError::Closed(_)) => {
                Err(SvcError::Transport(format!("inbox closed: {inbox}")))
            }
        }
    }
}
