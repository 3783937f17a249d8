//! JSON test vector loader shared by subject tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;

use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SubjectVector {
    pub description: String,
    pub prefix: String,
    pub name: String,
    pub id: String,
    /// kind token -> expected subjects
    pub expect: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct NameVector {
    pub subject: String,
    #[serde(default)]
    pub description: Option<String>,
    pub expect: String,
}

pub fn load<T: DeserializeOwned>(name: &str) -> T {
    let s = fs::read_to_string(format!("tests/vectors/{name}"))
        .unwrap_or_else(|e| panic!("read vector {name}: {e}"));
    serde_json::from_str(&s).expect("invalid vector json")
}
