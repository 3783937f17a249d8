use std::sync::{Arc, RwLock, RwLockReadGuard};

use chrono::{DateTime, SecondsFormat, Utc};

use svcprism_core::error::Result;
use svcprism_core::protocol::{
    DiscoveryKind, InfoResponse, PingResponse, StatsResponse,
};

use super::endpoint::{EndpointInfo, EndpointStats};
use super::identity::ServiceIdentity;

/// Backing state for the three discovery replies.
///
/// The endpoint lists hold the same `Arc`s as the endpoint table, so every
/// reply reflects live counters at response time.
pub struct DiscoveryPayloads {
    identity: Arc<ServiceIdentity>,
    started: DateTime<Utc>,
    info_endpoints: RwLock<Vec<Arc<EndpointInfo>>>,
    stats_endpoints: RwLock<Vec<Arc<EndpointStats>>>,
}

impl DiscoveryPayloads {
    pub fn new(identity: Arc<ServiceIdentity>) -> Self {
        Self {
            identity,
            started: Utc::now(),
            info_endpoints: RwLock::new(Vec::new()),
            stats_endpoints: RwLock::new(Vec::new()),
        }
    }

    pub fn started(&self) -> DateTime<Utc> {
        self.started
    }

    pub(crate) fn push(&self, info: Arc<EndpointInfo>, stats: Arc<EndpointStats>) {
        self.info_endpoints
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(info);
        self.stats_endpoints
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(stats);
    }

    pub fn endpoint_count(&self) -> usize {
        self.info().len()
    }

    pub fn ping(&self) -> PingResponse {
        let id = &self.identity;
        PingResponse {
            name: id.name.clone(),
            id: id.id.clone(),
            version: id.version.clone(),
            metadata: id.metadata.clone(),
            kind: DiscoveryKind::Ping.response_type().to_string(),
        }
    }

    pub fn info_response(&self) -> InfoResponse {
        let id = &self.identity;
        InfoResponse {
            name: id.name.clone(),
            id: id.id.clone(),
            version: id.version.clone(),
            metadata: id.metadata.clone(),
            kind: DiscoveryKind::Info.response_type().to_string(),
            description: id.description.clone(),
            endpoints: self.info().iter().map(|e| e.to_wire()).collect(),
        }
    }

    pub fn stats_response(&self) -> StatsResponse {
        let id = &self.identity;
        let endpoints = self
            .stats_endpoints
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|e| e.to_wire())
            .collect();
        StatsResponse {
            name: id.name.clone(),
            id: id.id.clone(),
            version: id.version.clone(),
            metadata: id.metadata.clone(),
            kind: DiscoveryKind::Stats.response_type().to_string(),
            started: self.started.to_rfc3339_opts(SecondsFormat::Micros, true),
            endpoints,
        }
    }

    /// Serialize the reply for `kind`. Nothing is returned on failure, so a
    /// partial body can never be sent.
    pub fn render(&self, kind: DiscoveryKind) -> Result<String> {
        let body = match kind {
            DiscoveryKind::Ping => serde_json::to_string(&self.ping())?,
            DiscoveryKind::Info => serde_json::to_string(&self.info_response())?,
            DiscoveryKind::Stats => serde_json::to_string(&self.stats_response())?,
        };
        Ok(body)
    }

    fn info(&self) -> RwLockReadGuard<'_, Vec<Arc<EndpointInfo>>> {
        self.info_endpoints.read().unwrap_or_else(|e| e.into_inner())
    }
}
