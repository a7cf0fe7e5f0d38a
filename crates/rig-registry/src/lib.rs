// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Content-addressed catalog of [`ToolDefinition`]s.
//!
//! Registration happens once at startup (§9 "Plugin discovery → explicit
//! registration" — no reflection, just `register`). After that the
//! registry is read-only for the lifetime of the process; the Runtime
//! never mutates it mid-call.

use std::collections::BTreeMap;

use rig_adapter::{canonical_json, ToolDefinition};
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate tool name: {0}")]
    DuplicateName(String),
}

/// An immutable view of a [`ToolRegistry`] at some instant, carrying the
/// Interface Hash that identifies it for compatibility checks (§3).
#[derive(Debug, Clone)]
pub struct RegistrySnapshot {
    pub definitions: BTreeMap<String, ToolDefinition>,
    pub interface_hash: String,
    pub pack_set_version: String,
}

/// In-memory catalog. Definitions are keyed by name and never mutated once
/// registered — `name` uniqueness is enforced at `register` time.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    definitions: BTreeMap<String, ToolDefinition>,
    pack_set_version: String,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            definitions: BTreeMap::new(),
            pack_set_version: "dev".to_string(),
        }
    }

    pub fn set_pack_set_version(&mut self, version: impl Into<String>) {
        self.pack_set_version = version.into();
    }

    /// Register one definition. Fails with `duplicate_name` if `def.name`
    /// already exists — unlike the teacher's `ToolRegistry::register`
    /// (which silently overwrites), spec.md §4.1 requires rejection.
    pub fn register(&mut self, def: ToolDefinition) -> Result<(), RegistryError> {
        if self.definitions.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName(def.name));
        }
        self.definitions.insert(def.name.clone(), def);
        Ok(())
    }

    /// Register several definitions in one call, failing fast on the first
    /// duplicate (definitions registered before the failure remain).
    pub fn register_all(
        &mut self,
        defs: impl IntoIterator<Item = ToolDefinition>,
    ) -> Result<(), RegistryError> {
        for def in defs {
            self.register(def)?;
        }
        Ok(())
    }

    /// Deterministic lexicographic iteration (`BTreeMap` keeps this free).
    pub fn list(&self) -> Vec<&ToolDefinition> {
        self.definitions.values().collect()
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.definitions.get(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Freeze a copy of the current definitions with their Interface Hash
    /// and the current pack-set version.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            definitions: self.definitions.clone(),
            interface_hash: compute_interface_hash(&self.definitions),
            pack_set_version: self.pack_set_version.clone(),
        }
    }
}

/// SHA-256 over the canonical serialization of the ordered list
/// `[(name, input_schema, output_schema, error_schema)]`, sorted by name
/// (`BTreeMap` iteration order already is name order).
///
/// Tie-break: names are compared as UTF-8 bytes (`String`'s `Ord`), schema
/// objects serialize with sorted keys and compact separators, so
/// semantically identical schemas hash identically regardless of
/// registration order (§8 invariant 4).
pub fn compute_interface_hash(definitions: &BTreeMap<String, ToolDefinition>) -> String {
    let payload: Vec<_> = definitions
        .values()
        .map(|t| {
            serde_json::json!([t.name, t.input_schema, t.output_schema, t.error_schema])
        })
        .collect();
    let blob = canonical_json(&serde_json::Value::Array(payload));
    let mut hasher = Sha256::new();
    hasher.update(blob.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rig_adapter::RiskClass;
    use serde_json::json;

    fn def(name: &str) -> ToolDefinition {
        ToolDefinition::new(
            name,
            "a tool",
            json!({"type": "object"}),
            json!({"type": "object"}),
            json!({"type": "object"}),
            RiskClass::Read,
        )
    }

    #[test]
    fn register_and_get() {
        let mut reg = ToolRegistry::new();
        reg.register(def("echo")).unwrap();
        assert!(reg.get("echo").is_some());
    }

    #[test]
    fn get_unknown_returns_none() {
        let reg = ToolRegistry::new();
        assert!(reg.get("nope").is_none());
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut reg = ToolRegistry::new();
        reg.register(def("echo")).unwrap();
        let err = reg.register(def("echo")).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateName("echo".to_string()));
    }

    #[test]
    fn list_is_lexicographic() {
        let mut reg = ToolRegistry::new();
        reg.register(def("zeta")).unwrap();
        reg.register(def("alpha")).unwrap();
        reg.register(def("mid")).unwrap();
        let names: Vec<&str> = reg.list().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn interface_hash_is_64_hex_chars() {
        let mut reg = ToolRegistry::new();
        reg.register(def("echo")).unwrap();
        let snap = reg.snapshot();
        assert_eq!(snap.interface_hash.len(), 64);
        assert!(snap.interface_hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn interface_hash_is_order_independent() {
        let mut reg_a = ToolRegistry::new();
        reg_a.register(def("alpha")).unwrap();
        reg_a.register(def("beta")).unwrap();
        reg_a.register(def("gamma")).unwrap();

        let mut reg_b = ToolRegistry::new();
        reg_b.register(def("gamma")).unwrap();
        reg_b.register(def("alpha")).unwrap();
        reg_b.register(def("beta")).unwrap();

        assert_eq!(
            reg_a.snapshot().interface_hash,
            reg_b.snapshot().interface_hash
        );
    }

    #[test]
    fn interface_hash_changes_with_schema() {
        let mut reg_a = ToolRegistry::new();
        reg_a.register(def("echo")).unwrap();

        let mut reg_b = ToolRegistry::new();
        let mut other = def("echo");
        other.description = "a different tool".to_string();
        reg_b.register(other).unwrap();

        // Description isn't part of the hash payload, so these still match —
        // verifies the hash is scoped to (name, input, output, error) only.
        assert_eq!(
            reg_a.snapshot().interface_hash,
            reg_b.snapshot().interface_hash
        );
    }

    #[test]
    fn interface_hash_changes_with_input_schema() {
        let mut reg_a = ToolRegistry::new();
        reg_a.register(def("echo")).unwrap();

        let mut reg_b = ToolRegistry::new();
        let mut other = def("echo");
        other.input_schema = json!({"type": "object", "properties": {"x": {"type": "string"}}});
        reg_b.register(other).unwrap();

        assert_ne!(
            reg_a.snapshot().interface_hash,
            reg_b.snapshot().interface_hash
        );
    }

    #[test]
    fn snapshot_carries_pack_set_version() {
        let mut reg = ToolRegistry::new();
        reg.set_pack_set_version("2026.07.1");
        let snap = reg.snapshot();
        assert_eq!(snap.pack_set_version, "2026.07.1");
    }
}
