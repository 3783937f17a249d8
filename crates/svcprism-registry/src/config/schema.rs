use serde::Deserialize;

use svcprism_core::error::{Result, SvcError};
use svcprism_core::protocol::response::Metadata;
use svcprism_core::protocol::subject::{is_discovery_subject, validate_token};
use svcprism_core::protocol::DEFAULT_PREFIX;

use crate::registry::ServiceIdentity;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SvcConfig {
    pub version: u32,

    pub service: ServiceSection,

    #[serde(default)]
    pub discovery: DiscoverySection,

    /// Business endpoints bound by the demo binary.
    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,
}

impl SvcConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(SvcError::UnsupportedVersion);
        }

        self.service.validate()?;
        self.discovery.validate()?;

        for ep in &self.endpoints {
            if ep.subject.is_empty() {
                return Err(SvcError::Configuration("endpoints[].subject must not be empty".into()));
            }
            if is_discovery_subject(&self.discovery.prefix, &ep.subject) {
                return Err(SvcError::Configuration(format!(
                    "endpoint subject {} is inside the reserved {} namespace",
                    ep.subject, self.discovery.prefix
                )));
            }
        }
        Ok(())
    }

    /// Identity for the registry; a missing `service.id` is generated here,
    /// so call this once per process.
    pub fn identity(&self) -> ServiceIdentity {
        let id = self
            .service
            .id
            .clone()
            .unwrap_or_else(ServiceIdentity::generate_id);
        ServiceIdentity::new(&self.service.name, id, &self.service.version)
            .with_description(&self.service.description)
            .with_metadata(self.service.metadata.clone())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceSection {
    pub name: String,

    #[serde(default)]
    pub id: Option<String>,

    pub version: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub metadata: Metadata,
}

impl ServiceSection {
    pub fn validate(&self) -> Result<()> {
        validate_token("service.name", &self.name)?;
        if let Some(id) = &self.id {
            validate_token("service.id", id)?;
        }
        if self.version.is_empty() {
            return Err(SvcError::Configuration("service.version must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoverySection {
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for DiscoverySection {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}

impl DiscoverySection {
    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() || self.prefix.contains(|c: char| c == '*' || c == '>') {
            return Err(SvcError::Configuration(
                "discovery.prefix must be a non-empty literal subject".into(),
            ));
        }
        Ok(())
    }
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointConfig {
    pub subject: String,

    #[serde(default = "default_queue_group")]
    pub queue_group: String,

    /// Explicit endpoint name; defaults to the last subject token.
    #[serde(default)]
    pub description: Option<String>,
}

fn default_queue_group() -> String {
    "q".into()
}
