//! Discovery reply bodies (JSON).
//!
//! Field names mirror the micro-service discovery convention exactly so that
//! stock tooling (`nats micro ls`, `nats micro stats`) can read them.
//! Numeric fields are integers; times are nanoseconds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Ordered string metadata.
pub type Metadata = BTreeMap<String, String>;

/// `$SRV.PING` reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PingResponse {
    pub name: String,
    pub id: String,
    pub version: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(rename = "type")]
    pub kind: String,
}

/// One endpoint in an INFO reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoEndpoint {
    pub name: String,
    pub subject: String,
    pub queue_group: String,
    #[serde(default)]
    pub metadata: Metadata,
}

/// `$SRV.INFO` reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InfoResponse {
    pub name: String,
    pub id: String,
    pub version: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub endpoints: Vec<InfoEndpoint>,
}

/// One endpoint in a STATS reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsEndpoint {
    pub name: String,
    pub subject: String,
    pub queue_group: String,
    pub num_requests: u64,
    pub num_errors: u64,
    /// Total processing time, nanoseconds.
    pub processing_time: u64,
    /// `processing_time / num_requests`, nanoseconds.
    pub average_processing_time: u64,
}

/// `$SRV.STATS` reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatsResponse {
    pub name: String,
    pub id: String,
    pub version: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(rename = "type")]
    pub kind: String,
    /// ISO-8601 UTC.
    pub started: String,
    pub endpoints: Vec<StatsEndpoint>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn ping_has_exactly_identity_fields() {
        let ping = PingResponse {
            name: "svc".into(),
            id: "abc123".into(),
            version: "1.0.0".into(),
            metadata: Metadata::new(),
            kind: "io.nats.micro.v1.ping".into(),
        };
        let v = serde_json::to_value(&ping).unwrap();
        let mut keys: Vec<&str> = v.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, ["id", "metadata", "name", "type", "version"]);
        assert!(v["metadata"].as_object().unwrap().is_empty());
    }

    #[test]
    fn stats_field_names_are_snake_case() {
        let ep = StatsEndpoint {
            name: "test".into(),
            subject: "name.*.test".into(),
            queue_group: "q".into(),
            num_requests: 2,
            num_errors: 1,
            processing_time: 30,
            average_processing_time: 15,
        };
        let s = serde_json::to_string(&ep).unwrap();
        assert_eq!(
            s,
            concat!(
                r#"{"name":"test","subject":"name.*.test","queue_group":"q","#,
                r#""num_requests":2,"num_errors":1,"processing_time":30,"#,
                r#""average_processing_time":15}"#,
            )
        );
    }
}
