use std::sync::Arc;

use svcprism_core::error::{Result, SvcError};
use svcprism_core::protocol::subject::{
    all_discovery_subjects, endpoint_name, is_discovery_subject,
};
use svcprism_core::protocol::{DiscoveryKind, DEFAULT_PREFIX};

use crate::dispatch::DiscoveryResponder;
use crate::obs::metrics::RegistryMetrics;
use crate::transport::{SubjectHandler, Transport};

use super::endpoint::{EndpointInfo, EndpointStats};
use super::identity::ServiceIdentity;
use super::instrument::Instrumented;
use super::payload::DiscoveryPayloads;
use super::table::EndpointTable;

/// Endpoint registry and discovery responder for one service instance.
///
/// Lifecycle:
/// 1. `new` validates identity (no I/O).
/// 2. The application binds its business subjects on the transport,
///    optionally wrapping handlers with [`ServiceRegistry::instrument`].
/// 3. `register_endpoints` is called exactly once, before traffic flows.
pub struct ServiceRegistry {
    identity: Arc<ServiceIdentity>,
    prefix: String,
    transport: Arc<dyn Transport>,
    table: Arc<EndpointTable>,
    payloads: Arc<DiscoveryPayloads>,
    metrics: Arc<RegistryMetrics>,
}

impl ServiceRegistry {
    pub fn new(identity: ServiceIdentity, transport: Arc<dyn Transport>) -> Result<Self> {
        Self::with_prefix(identity, DEFAULT_PREFIX, transport)
    }

    pub fn with_prefix(
        identity: ServiceIdentity,
        prefix: &str,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        identity.validate()?;
        if prefix.is_empty() || prefix.contains(|c: char| c == '*' || c == '>') {
            return Err(SvcError::Configuration(format!(
                "discovery prefix must be a non-empty literal subject: {prefix:?}"
            )));
        }

        let identity = Arc::new(identity);
        Ok(Self {
            payloads: Arc::new(DiscoveryPayloads::new(Arc::clone(&identity))),
            identity,
            prefix: prefix.to_string(),
            transport,
            table: Arc::new(EndpointTable::new()),
            metrics: Arc::new(RegistryMetrics::default()),
        })
    }

    /// Build the endpoint table from the transport's bindings and subscribe
    /// the discovery responder on all 9 discovery subjects.
    ///
    /// Call exactly once: a second call duplicates payload entries and
    /// discovery subscriptions. Returns the number of endpoints registered.
    pub fn register_endpoints(&self) -> Result<usize> {
        let mut registered = 0;

        for binding in self.transport.bound_subjects() {
            if is_discovery_subject(&self.prefix, &binding.subject) {
                continue;
            }

            let name = endpoint_name(&binding.subject, binding.description.as_deref());
            let info = Arc::new(EndpointInfo {
                name: name.clone(),
                subject: binding.subject.clone(),
                queue_group: binding.queue_group.clone(),
                metadata: self.identity.metadata.clone(),
            });
            let stats = Arc::new(EndpointStats::new(
                name,
                binding.subject.clone(),
                binding.queue_group.clone(),
            ));

            self.table.insert(Arc::clone(&info), Arc::clone(&stats));
            self.payloads.push(info, stats);
            registered += 1;

            tracing::info!(
                subject = %binding.subject,
                queue_group = %binding.queue_group,
                "endpoint registered"
            );
        }

        let responder: Arc<dyn SubjectHandler> = Arc::new(DiscoveryResponder::new(
            self.prefix.clone(),
            Arc::clone(&self.payloads),
            Arc::clone(&self.metrics),
        ));
        for subject in self.discovery_subjects() {
            self.transport
                .subscribe(&subject, None, Arc::clone(&responder))?;
        }

        tracing::info!(
            service = %self.identity.name,
            id = %self.identity.id,
            endpoints = registered,
            "discovery subjects subscribed"
        );
        Ok(registered)
    }

    /// Live stats record for `subject`; `None` if it was never registered.
    pub fn get_stats_endpoint(&self, subject: &str) -> Option<Arc<EndpointStats>> {
        self.table.stats(subject)
    }

    pub fn get_info_endpoint(&self, subject: &str) -> Option<Arc<EndpointInfo>> {
        self.table.info(subject)
    }

    /// Wrap a business handler so every invocation updates the stats of
    /// `subject`. Bind the result on the transport under the same subject.
    pub fn instrument<H: SubjectHandler>(&self, subject: &str, inner: H) -> Instrumented<H> {
        Instrumented::new(subject, Arc::clone(&self.table), inner)
    }

    /// The 9 subjects this instance answers discovery queries on.
    pub fn discovery_subjects(&self) -> Vec<String> {
        all_discovery_subjects(&self.prefix, &self.identity.name, &self.identity.id)
    }

    /// Serialized reply for `kind`, exactly as it would be sent.
    pub fn respond(&self, kind: DiscoveryKind) -> Result<String> {
        self.payloads.render(kind)
    }

    pub fn identity(&self) -> &ServiceIdentity {
        &self.identity
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn payloads(&self) -> &DiscoveryPayloads {
        &self.payloads
    }

    pub fn endpoints(&self) -> Arc<EndpointTable> {
        Arc::clone(&self.table)
    }

    pub fn metrics(&self) -> &RegistryMetrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::EchoService;
    use crate::transport::MemoryTransport;

    fn transport_with(bindings: &[(&str, &str, Option<&str>)]) -> Arc<MemoryTransport> {
        let t = Arc::new(MemoryTransport::new());
        for (subject, queue, desc) in bindings {
            t.bind(subject, queue, *desc, Arc::new(EchoService::new())).unwrap();
        }
        t
    }

    #[test]
    fn empty_identity_fails_fast() {
        let t = transport_with(&[]);
        let err = ServiceRegistry::new(ServiceIdentity::new("", "id", "1"), t.clone())
            .err()
            .unwrap();
        assert_eq!(err.code().as_str(), "CONFIGURATION");
        assert!(ServiceRegistry::new(ServiceIdentity::new("svc", "", "1"), t).is_err());
    }

    #[test]
    fn wildcard_prefix_is_rejected() {
        let t = transport_with(&[]);
        let r = ServiceRegistry::with_prefix(ServiceIdentity::new("svc", "id", "1"), "$SRV.>", t);
        assert!(r.is_err());
    }

    #[test]
    fn registers_business_subjects_and_skips_reserved() {
        let t = transport_with(&[
            ("name.*.test", "q", None),
            ("$SRV.PING.other", "", None),
            ("other.subject.entirely", "q", Some("custom")),
        ]);
        let identity = ServiceIdentity::new("svc", "abc123", "1");
        let reg = ServiceRegistry::new(identity, t.clone()).unwrap();

        assert_eq!(reg.register_endpoints().unwrap(), 2);
        assert_eq!(reg.get_info_endpoint("name.*.test").unwrap().name, "test");
        assert_eq!(reg.get_info_endpoint("other.subject.entirely").unwrap().name, "custom");
        assert!(reg.get_stats_endpoint("$SRV.PING.other").is_none());
        assert!(reg.get_stats_endpoint("nope").is_none());
        assert!(reg.get_info_endpoint("nope").is_none());

        // 3 business bindings + 9 discovery subscriptions
        assert_eq!(t.bound_subjects().len(), 12);
    }

    #[test]
    fn subjects_sharing_the_prefix_string_are_reserved() {
        let t = transport_with(&[("$SRVX.a", "q", None), ("orders.$SRV", "q", None)]);
        let reg = ServiceRegistry::new(ServiceIdentity::new("svc", "abc123", "1"), t).unwrap();

        assert_eq!(reg.register_endpoints().unwrap(), 1);
        assert!(reg.get_stats_endpoint("$SRVX.a").is_none());
        assert!(reg.get_stats_endpoint("orders.$SRV").is_some());
    }

    #[test]
    fn endpoint_order_follows_binding_order() {
        let t = transport_with(&[("z.last", "q", None), ("a.first", "q", None)]);
        let reg = ServiceRegistry::new(ServiceIdentity::new("svc", "abc123", "1"), t).unwrap();
        reg.register_endpoints().unwrap();

        let info = reg.payloads().info_response();
        let subjects: Vec<&str> = info.endpoints.iter().map(|e| e.subject.as_str()).collect();
        assert_eq!(subjects, ["z.last", "a.first"]);
    }

    #[test]
    fn registries_do_not_share_tables() {
        let a = ServiceRegistry::new(
            ServiceIdentity::new("a", "1", "1"),
            transport_with(&[("a.x", "q", None)]),
        )
        .unwrap();
        let b = ServiceRegistry::new(
            ServiceIdentity::new("b", "2", "1"),
            transport_with(&[("b.y", "q", None)]),
        )
        .unwrap();
        a.register_endpoints().unwrap();
        b.register_endpoints().unwrap();

        assert!(a.get_stats_endpoint("b.y").is_none());
        assert!(b.get_stats_endpoint("a.x").is_none());
        assert_eq!(a.payloads().endpoint_count(), 1);
    }

    #[test]
    fn info_endpoints_carry_service_metadata() {
        let mut md = svcprism_core::protocol::response::Metadata::new();
        md.insert("region".into(), "eu".into());
        let identity = ServiceIdentity::new("svc", "abc123", "1").with_metadata(md);
        let reg = ServiceRegistry::new(identity, transport_with(&[("a.b", "q", None)])).unwrap();
        reg.register_endpoints().unwrap();

        let info = reg.get_info_endpoint("a.b").unwrap();
        assert_eq!(info.metadata.get("region").map(String::as_str), Some("eu"));
    }
}
