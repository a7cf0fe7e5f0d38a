// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ToolError;

/// The envelope every `Call`/`ApproveAndCall` ultimately returns.
///
/// `pack`/`pack_version`/`interface_hash`/`pack_set_version` are present
/// whenever the tool was known to the Registry — even on a policy denial
/// or validation failure (§8 invariant 7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    pub correlation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack_set_version: Option<String>,
}

/// Provenance for a known tool, carried on every `ToolResult` regardless of
/// outcome (§3 "Tool Result", §8 invariant 7).
#[derive(Debug, Clone, Default)]
pub struct Provenance {
    pub pack: Option<String>,
    pub pack_version: Option<String>,
    pub interface_hash: Option<String>,
    pub pack_set_version: Option<String>,
}

impl ToolResult {
    pub fn ok(correlation_id: impl Into<String>, output: Value, prov: Provenance) -> Self {
        Self {
            ok: true,
            output: Some(output),
            error: None,
            correlation_id: correlation_id.into(),
            pack: prov.pack,
            pack_version: prov.pack_version,
            interface_hash: prov.interface_hash,
            pack_set_version: prov.pack_set_version,
        }
    }

    pub fn err(correlation_id: impl Into<String>, error: ToolError, prov: Provenance) -> Self {
        let correlation_id = correlation_id.into();
        let mut error = error;
        if error.correlation_id.is_none() {
            error.correlation_id = Some(correlation_id.clone());
        }
        Self {
            ok: false,
            output: None,
            error: Some(error),
            correlation_id,
            pack: prov.pack,
            pack_version: prov.pack_version,
            interface_hash: prov.interface_hash,
            pack_set_version: prov.pack_set_version,
        }
    }
}
