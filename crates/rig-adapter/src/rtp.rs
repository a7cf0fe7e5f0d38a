// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Closed set of risk classes a [`ToolDefinition`] may declare.
///
/// Drives approval gating in [`rig_policy::Policy::needs_approval`] — see
/// the policy evaluator for the default `require_approval_for` set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskClass {
    Read,
    Write,
    Infra,
    Money,
    Destructive,
}

/// Immutable, content-addressable description of a single tool.
///
/// Never mutated after registration (§3 invariant). `name` must be unique
/// within a [`rig_registry::ToolRegistry`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Lowercased dotted identifier, e.g. `"airtable.records.list"`.
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    pub output_schema: Value,
    pub error_schema: Value,
    /// Uppercase env-var-style slot names the tool's secrets must satisfy,
    /// in declaration order — the first entry is the one the Audit Sink
    /// uses for the Redacted Auth Marker (§9 Open Question).
    #[serde(default)]
    pub auth_slots: Vec<String>,
    pub risk_class: RiskClass,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Recognized policy knobs this tool suggests as defaults (§4.3);
    /// the Policy Evaluator is not required to honor any of them.
    #[serde(default)]
    pub policy_defaults: Map<String, Value>,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
        output_schema: Value,
        error_schema: Value,
        risk_class: RiskClass,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            output_schema,
            error_schema,
            auth_slots: Vec::new(),
            risk_class,
            tags: BTreeSet::new(),
            policy_defaults: Map::new(),
        }
    }

    pub fn with_auth_slots(mut self, slots: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.auth_slots = slots.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Per-call bundle threaded from the HTTP surface down into the adapter.
///
/// `request_id` is filled in by the Runtime with a freshly generated UUID
/// when the caller omits it — everywhere else in this crate the field
/// stays exactly as the caller supplied it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
}

/// Serialize `value` to its canonical form: object keys sorted
/// lexicographically at every nesting level, compact separators.
///
/// Used identically by the Interface Hash (§4.1/§6) and the Input Hash
/// (§4.6) so that both satisfy the same key-order idempotence law.
pub fn canonical_json(value: &Value) -> String {
    serde_json::to_string(&sort_value(value)).expect("canonical JSON values always serialize")
}

fn sort_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut sorted = Map::new();
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for k in keys {
                sorted.insert(k.clone(), sort_value(&map[k]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_value).collect()),
        other => other.clone(),
    }
}
