use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use svcprism_core::protocol::response::{InfoEndpoint, Metadata, StatsEndpoint};

/// Static descriptor of one business endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointInfo {
    pub name: String,
    pub subject: String,
    pub queue_group: String,
    pub metadata: Metadata,
}

impl EndpointInfo {
    pub fn to_wire(&self) -> InfoEndpoint {
        InfoEndpoint {
            name: self.name.clone(),
            subject: self.subject.clone(),
            queue_group: self.queue_group.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

/// Point-in-time copy of an endpoint's counters. Times in nanoseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub num_requests: u64,
    pub num_errors: u64,
    pub processing_time: u64,
    pub average_processing_time: u64,
}

/// Live counters for one endpoint.
///
/// Each record has its own lock; unrelated endpoints never contend.
#[derive(Debug)]
pub struct EndpointStats {
    name: String,
    subject: String,
    queue_group: String,
    counters: Mutex<StatsSnapshot>,
}

impl EndpointStats {
    pub fn new(
        name: impl Into<String>,
        subject: impl Into<String>,
        queue_group: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            subject: subject.into(),
            queue_group: queue_group.into(),
            counters: Mutex::new(StatsSnapshot::default()),
        }
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn subject(&self) -> &str { &self.subject }
    pub fn queue_group(&self) -> &str { &self.queue_group }

    /// Count one completed request.
    ///
    /// The average is recomputed from the totals on every call (integer
    /// division), never adjusted incrementally.
    pub fn record(&self, elapsed: Duration, errored: bool) {
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        let mut c = self.lock();
        c.num_requests += 1;
        c.processing_time = c.processing_time.saturating_add(nanos);
        c.average_processing_time = c.processing_time / c.num_requests;
        if errored {
            c.num_errors += 1;
        }
    }

    /// Count an error without touching request/timing counters.
    pub fn record_error(&self) {
        self.lock().num_errors += 1;
    }

    /// Time `fut` and record it; `Err` outputs count as errors.
    pub async fn observe<F, T, E>(&self, fut: F) -> std::result::Result<T, E>
    where
        F: Future<Output = std::result::Result<T, E>>,
    {
        let start = Instant::now();
        let res = fut.await;
        self.record(start.elapsed(), res.is_err());
        res
    }

    pub fn reset(&self) {
        *self.lock() = StatsSnapshot::default();
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        *self.lock()
    }

    pub fn to_wire(&self) -> StatsEndpoint {
        let s = self.snapshot();
        StatsEndpoint {
            name: self.name.clone(),
            subject: self.subject.clone(),
            queue_group: self.queue_group.clone(),
            num_requests: s.num_requests,
            num_errors: s.num_errors,
            processing_time: s.processing_time,
            average_processing_time: s.average_processing_time,
        }
    }

    // A panic while holding the lock cannot leave counters half-written
    // (all updates are plain integer stores), so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, StatsSnapshot> {
        self.counters.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_is_total_over_count() {
        let s = EndpointStats::new("test", "name.*.test", "q");
        s.record(Duration::from_nanos(10), false);
        s.record(Duration::from_nanos(25), true);
        s.record(Duration::from_nanos(7), false);

        let snap = s.snapshot();
        assert_eq!(snap.num_requests, 3);
        assert_eq!(snap.num_errors, 1);
        assert_eq!(snap.processing_time, 42);
        assert_eq!(snap.average_processing_time, 14);
    }

    #[test]
    fn average_uses_integer_division() {
        let s = EndpointStats::new("t", "t", "");
        s.record(Duration::from_nanos(10), false);
        s.record(Duration::from_nanos(11), false);
        assert_eq!(s.snapshot().average_processing_time, 10);
    }

    #[test]
    fn record_error_is_independent_of_timing() {
        let s = EndpointStats::new("t", "t", "");
        s.record_error();
        let snap = s.snapshot();
        assert_eq!(snap.num_errors, 1);
        assert_eq!(snap.num_requests, 0);
        assert_eq!(snap.average_processing_time, 0);
    }

    #[test]
    fn reset_zeroes_counters() {
        let s = EndpointStats::new("t", "t", "");
        s.record(Duration::from_micros(3), true);
        s.reset();
        assert_eq!(s.snapshot(), StatsSnapshot::default());
    }

    #[tokio::test]
    async fn observe_counts_err_as_error() {
        let s = EndpointStats::new("t", "t", "");
        let ok: Result<u8, &str> = s.observe(async { Ok(1) }).await;
        let err: Result<u8, &str> = s.observe(async { Err("boom") }).await;
        assert_eq!(ok, Ok(1));
        assert_eq!(err, Err("boom"));

        let snap = s.snapshot();
        assert_eq!(snap.num_requests, 2);
        assert_eq!(snap.num_errors, 1);
    }

    #[test]
    fn wire_shape_carries_identity() {
        let s = EndpointStats::new("test", "name.*.test", "q");
        s.record(Duration::from_nanos(5), false);
        let w = s.to_wire();
        assert_eq!(w.subject, "name.*.test");
        assert_eq!(w.queue_group, "q");
        assert_eq!(w.num_requests, 1);
        assert_eq!(w.processing_time, 5);
    }
}
