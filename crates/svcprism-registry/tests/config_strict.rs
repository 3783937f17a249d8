#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use svcprism_registry::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
service:
  name: "svc"
  version: "1.0.0"
  metdata: { a: b } # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "CONFIGURATION");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
service:
  name: "svc"
  version: "1.0.0"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.service.name, "svc");
    assert_eq!(cfg.discovery.prefix, "$SRV");
    assert!(cfg.endpoints.is_empty());

    let identity = cfg.identity();
    assert_eq!(identity.name, "svc");
    assert_eq!(identity.id.len(), 32);
    assert!(identity.metadata.is_empty());
}

#[test]
fn full_config() {
    let ok = r#"
version: 1
service:
  name: "orders"
  id: "abc123"
  version: "2.1.0"
  description: "order intake"
  metadata:
    zone: "b"
    region: "eu"
discovery:
  prefix: "$DISCO"
endpoints:
  - subject: "orders.*.create"
  - subject: "orders.cancel"
    queue_group: "workers"
    description: "cancel"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.endpoints[0].queue_group, "q");
    assert_eq!(cfg.endpoints[1].description.as_deref(), Some("cancel"));

    let identity = cfg.identity();
    assert_eq!(identity.id, "abc123");
    assert_eq!(identity.description, "order intake");
    let keys: Vec<&str> = identity.metadata.keys().map(String::as_str).collect();
    assert_eq!(keys, ["region", "zone"]);
}

#[test]
fn unsupported_version() {
    let bad = r#"
version: 2
service: { name: "svc", version: "1" }
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn empty_or_dotted_name_rejected() {
    for name in ["\"\"", "\"a.b\"", "\"a*\""] {
        let bad = format!("version: 1\nservice: {{ name: {name}, version: \"1\" }}\n");
        let err = config::load_from_str(&bad).expect_err("must fail");
        assert_eq!(err.code().as_str(), "CONFIGURATION", "name={name}");
    }
}

#[test]
fn endpoint_inside_reserved_namespace_rejected() {
    let bad = r#"
version: 1
service: { name: "svc", version: "1" }
endpoints:
  - subject: "$SRV.PING.fake"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "CONFIGURATION");
}
