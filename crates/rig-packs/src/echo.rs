// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::collections::HashMap;

use async_trait::async_trait;
use rig_adapter::{AdapterError, CallContext, RiskClass, Tool, ToolDefinition};
use serde_json::{json, Value};

/// The illustrative adapter for the Tool Adapter Surface (§4.8): echoes
/// `message` back alongside the caller's `tenant_id`. No secrets, no risk.
///
/// Grounded one-for-one on
/// `original_source/packages/rig-pack-echo/rig_pack_echo/tools.py::echo`
/// and its companion `pack.py` schema declarations.
pub struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "echo",
            "Echo back a message",
            json!({
                "type": "object",
                "properties": {"message": {"type": "string"}},
                "required": ["message"],
                "additionalProperties": false
            }),
            json!({
                "type": "object",
                "properties": {
                    "message": {"type": "string"},
                    "tenant_id": {"type": ["string", "null"]}
                },
                "required": ["message", "tenant_id"],
                "additionalProperties": false
            }),
            json!({"type": "object"}),
            RiskClass::Read,
        )
        .with_tags(["demo"])
    }

    async fn execute(
        &self,
        args: &Value,
        _secrets: &HashMap<String, String>,
        ctx: &CallContext,
    ) -> Result<Value, AdapterError> {
        Ok(json!({
            "message": args.get("message").cloned().unwrap_or(Value::Null),
            "tenant_id": ctx.tenant_id,
        }))
    }
}
