//! Service config loader (strict parsing).

pub mod schema;

use std::fs;

use svcprism_core::error::{Result, SvcError};

pub use schema::{DiscoverySection, EndpointConfig, ServiceSection, SvcConfig};

pub fn load_from_file(path: &str) -> Result<SvcConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| SvcError::Configuration(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<SvcConfig> {
    let cfg: SvcConfig = serde_yaml::from_str(s)
        .map_err(|e| SvcError::Configuration(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
