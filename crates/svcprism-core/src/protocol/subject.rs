//! Discovery subject hierarchy.
//!
//! Every service instance answers on 9 subjects: each of PING/INFO/STATS at
//! three scopes.
//! - `<prefix>.<TYPE>`: every service
//! - `<prefix>.<TYPE>.<name>`: every instance of one service
//! - `<prefix>.<TYPE>.<name>.<id>`: one instance
//!
//! Subjects are dot-delimited tokens. Subscription patterns may use `*`
//! (exactly one token) and `>` (one or more trailing tokens).

use crate::error::{Result, SvcError};

/// Reserved discovery namespace.
pub const DEFAULT_PREFIX: &str = "$SRV";

/// Discovery message type, taken from the token following the prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscoveryKind {
    Ping,
    Info,
    Stats,
}

impl DiscoveryKind {
    pub const ALL: [DiscoveryKind; 3] =
        [DiscoveryKind::Ping, DiscoveryKind::Info, DiscoveryKind::Stats];

    /// Subject token (`PING`, `INFO`, `STATS`).
    pub fn as_str(self) -> &'static str {
        match self {
            DiscoveryKind::Ping => "PING",
            DiscoveryKind::Info => "INFO",
            DiscoveryKind::Stats => "STATS",
        }
    }

    /// Value of the `type` field in the JSON reply.
    pub fn response_type(self) -> &'static str {
        match self {
            DiscoveryKind::Ping => "io.nats.micro.v1.ping",
            DiscoveryKind::Info => "io.nats.micro.v1.info_response",
            DiscoveryKind::Stats => "io.nats.micro.v1.stats_response",
        }
    }

    pub fn from_token(token: &str) -> Result<Self> {
        match token {
            "PING" => Ok(DiscoveryKind::Ping),
            "INFO" => Ok(DiscoveryKind::Info),
            "STATS" => Ok(DiscoveryKind::Stats),
            other => Err(SvcError::Protocol(format!("unknown discovery type: {other}"))),
        }
    }
}

/// The 3 subjects for one discovery kind, broadest scope first.
pub fn discovery_subjects(prefix: &str, kind: DiscoveryKind, name: &str, id: &str) -> [String; 3] {
    let base = format!("{prefix}.{}", kind.as_str());
    let named = format!("{base}.{name}");
    let instance = format!("{named}.{id}");
    [base, named, instance]
}

/// All 9 subjects a service instance subscribes to.
pub fn all_discovery_subjects(prefix: &str, name: &str, id: &str) -> Vec<String> {
    DiscoveryKind::ALL
        .iter()
        .flat_map(|kind| discovery_subjects(prefix, *kind, name, id))
        .collect()
}

/// True when `subject` lives under the reserved namespace.
///
/// Plain string prefix: `$SRVX.a` is reserved under `$SRV` as well.
pub fn is_discovery_subject(prefix: &str, subject: &str) -> bool {
    subject.starts_with(prefix)
}

/// Extract the discovery kind from a subject such as `$SRV.INFO.svc.abc`.
pub fn kind_of_subject(prefix: &str, subject: &str) -> Result<DiscoveryKind> {
    let rest = subject
        .strip_prefix(prefix)
        .and_then(|r| r.strip_prefix('.'))
        .ok_or_else(|| SvcError::Protocol(format!("not a discovery subject: {subject}")))?;
    let token = rest.split('.').next().unwrap_or_default();
    DiscoveryKind::from_token(token)
}

/// Endpoint name: the explicit description when non-empty, else the last
/// dot-delimited token of the subject.
pub fn endpoint_name(subject: &str, description: Option<&str>) -> String {
    match description {
        Some(d) if !d.is_empty() => d.to_string(),
        _ => subject.rsplit('.').next().unwrap_or(subject).to_string(),
    }
}

/// NATS-style token match of a concrete subject against a subscription pattern.
pub fn subject_matches(pattern: &str, subject: &str) -> bool {
    let mut pat = pattern.split('.');
    let mut sub = subject.split('.');
    loop {
        match (pat.next(), sub.next()) {
            (Some(">"), Some(_)) => return true,
            (Some("*"), Some(_)) => continue,
            (Some(p), Some(s)) if p == s => continue,
            (None, None) => return true,
            _ => return false,
        }
    }
}

/// Validate a value that is embedded as a single subject token
/// (service name, instance id).
pub fn validate_token(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(SvcError::Configuration(format!("{field} must not be empty")));
    }
    if value
        .chars()
        .any(|c| c == '.' || c == '*' || c == '>' || c.is_whitespace())
    {
        return Err(SvcError::Configuration(format!(
            "{field} must be a single subject token (no '.', '*', '>' or whitespace): {value}"
        )));
    }
    Ok(())
}
