// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use chrono::{DateTime, Utc};
use rig_adapter::{canonical_json, ErrorType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Closed outcome set a single terminal `Call` may record (§8 invariant 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Ok,
    Error,
    ApprovalRequired,
    PolicyDenied,
}

/// One append-only audit record (§3, §4.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub timestamp: DateTime<Utc>,
    pub ts_unix: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    pub run_id: String,
    pub tool: String,
    pub input_hash: String,
    pub outcome: Outcome,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redacted_auth_marker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ErrorType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack_set_version: Option<String>,
}

/// SHA-256 of the canonical JSON encoding of call arguments.
///
/// Equal inputs, regardless of key insertion order, yield equal hashes —
/// the same canonicalization the Interface Hash uses (§8 invariant 3).
pub fn compute_input_hash(args: &Value) -> String {
    let blob = canonical_json(args);
    let mut hasher = Sha256::new();
    hasher.update(blob.as_bytes());
    hex::encode(hasher.finalize())
}

/// Derive the Redacted Auth Marker from a tool's declared auth slots.
///
/// Conservative choice (§9 Open Question): always the *first* declared
/// slot, even if the adapter consumed more than one. Never a secret value
/// — only ever the slot name. Returns `None` when the tool has no slots.
pub fn redacted_auth_marker(auth_slots: &[String]) -> Option<String> {
    let first = auth_slots.first()?;
    if let Some(stripped) = first.strip_prefix("env:") {
        Some(format!("env:{stripped}"))
    } else {
        Some(format!("env:{first}"))
    }
}
