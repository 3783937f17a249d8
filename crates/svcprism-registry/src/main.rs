//! svcPrism demo
//!
//! - Load `svcprism.yaml` (or the path given as the first argument)
//! - Bind configured endpoints on an in-memory transport (echo, instrumented)
//! - Register endpoints + discovery subjects
//! - Send one request per endpoint, then log PING / INFO / STATS replies

use std::process::ExitCode;
use std::sync::Arc;

use bytes::Bytes;
use tracing_subscriber::{fmt, EnvFilter};

use svcprism_core::error::Result;
use svcprism_core::protocol::DiscoveryKind;
use svcprism_registry::services::EchoService;
use svcprism_registry::{config, MemoryTransport, ServiceRegistry};

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "svcprism.yaml".to_string());
    match run(&path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "svcprism failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(path: &str) -> Result<()> {
    let cfg = config::load_from_file(path)?;
    let transport = Arc::new(MemoryTransport::new());
    let registry =
        ServiceRegistry::with_prefix(cfg.identity(), &cfg.discovery.prefix, transport.clone())?;

    for ep in &cfg.endpoints {
        let handler = registry.instrument(&ep.subject, EchoService::new());
        transport.bind(
            &ep.subject,
            &ep.queue_group,
            ep.description.as_deref(),
            Arc::new(handler),
        )?;
    }
    registry.register_endpoints()?;

    let id = registry.identity();
    tracing::info!(service = %id.name, id = %id.id, version = %id.version, "svcprism started");

    for ep in &cfg.endpoints {
        // Wildcard subjects need a concrete token to be routable.
        let subject = ep.subject.replace('*', "demo").replace('>', "demo");
        transport.request(&subject, Bytes::from_static(b"hello")).await?;
    }

    for kind in DiscoveryKind::ALL {
        let subject = format!("{}.{}.{}.{}", registry.prefix(), kind.as_str(), id.name, id.id);
        match transport.request(&subject, Bytes::new()).await? {
            Some(body) => tracing::info!(%subject, %body, "discovery reply"),
            None => tracing::warn!(%subject, "no discovery reply"),
        }
    }

    tracing::debug!(metrics = %registry.metrics().render(), "responder metrics");
    Ok(())
}
