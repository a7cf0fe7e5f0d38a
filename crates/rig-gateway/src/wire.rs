// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Request/response shapes for the routes in spec.md §6.
//!
//! `ToolDefinition` and `ToolResult` already carry the exact field sets
//! spec.md's wire format documents (they `derive(Serialize)` in
//! `rig-adapter`), so the routes serialize them directly rather than
//! duplicating the shape into parallel DTOs. The only genuinely new wire
//! type is the `POST .../:call` request body.

use rig_adapter::CallContext;
use serde::Deserialize;
use serde_json::Value;

/// Body of `POST /v1/tools/{name}:call` (spec.md §6).
#[derive(Debug, Deserialize)]
pub struct CallBody {
    pub args: Value,
    #[serde(default)]
    pub context: Option<CallContext>,
}

#[derive(Debug, serde::Serialize)]
pub struct HealthBody {
    pub status: &'static str,
}
