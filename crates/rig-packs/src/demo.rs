// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::collections::HashMap;

use async_trait::async_trait;
use rig_adapter::{AdapterError, CallContext, ErrorType, RiskClass, Tool, ToolDefinition, ToolError};
use serde_json::{json, Value};

/// A destructive-risk demo tool used to exercise the approval-gate flow
/// (§8 "Concrete scenarios" #3). Schema shape mirrors the `required`
/// pattern `original_source/packages/rig-pack-stripe`'s tools use for
/// higher-risk operations; the operation itself has no vendor backing —
/// it is a fixture, not a real destructive action.
pub struct DeleteDatabaseTool;

#[async_trait]
impl Tool for DeleteDatabaseTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "delete_database",
            "Permanently delete a named database",
            json!({
                "type": "object",
                "properties": {"database": {"type": "string"}},
                "required": ["database"]
            }),
            json!({
                "type": "object",
                "properties": {"deleted": {"type": "boolean"}, "database": {"type": "string"}},
                "required": ["deleted"]
            }),
            json!({"type": "object"}),
            RiskClass::Destructive,
        )
        .with_tags(["demo"])
    }

    async fn execute(
        &self,
        args: &Value,
        _secrets: &HashMap<String, String>,
        _ctx: &CallContext,
    ) -> Result<Value, AdapterError> {
        let database = args
            .get("database")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AdapterError::Typed(ToolError::new(ErrorType::ValidationError, "missing 'database'"))
            })?;
        Ok(json!({"deleted": true, "database": database}))
    }
}

/// A money-risk demo tool. Raises a typed `auth_error` when
/// `STRIPE_API_KEY` is absent from the resolved secrets, mirroring how a
/// real vendor adapter reacts to a missing credential
/// (`original_source/packages/rig-pack-stripe`'s `auth_slots` contract).
pub struct ChargeCardTool;

#[async_trait]
impl Tool for ChargeCardTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "charge_card",
            "Charge a payment method for a given amount",
            json!({
                "type": "object",
                "properties": {
                    "amount_cents": {"type": "integer", "minimum": 1},
                    "currency": {"type": "string", "default": "usd"}
                },
                "required": ["amount_cents"]
            }),
            json!({
                "type": "object",
                "properties": {"charge_id": {"type": "string"}, "amount_cents": {"type": "integer"}},
                "required": ["charge_id", "amount_cents"]
            }),
            json!({"type": "object"}),
            RiskClass::Money,
        )
        .with_auth_slots(["STRIPE_API_KEY"])
        .with_tags(["demo"])
    }

    async fn execute(
        &self,
        args: &Value,
        secrets: &HashMap<String, String>,
        _ctx: &CallContext,
    ) -> Result<Value, AdapterError> {
        if !secrets.contains_key("STRIPE_API_KEY") {
            return Err(AdapterError::Typed(
                ToolError::new(ErrorType::AuthError, "STRIPE_API_KEY not resolved for this call")
                    .with_hint("set STRIPE_API_KEY in the environment or configured secrets backend"),
            ));
        }
        let amount_cents = args.get("amount_cents").and_then(Value::as_i64).unwrap_or(0);
        Ok(json!({"charge_id": format!("ch_demo_{amount_cents}"), "amount_cents": amount_cents}))
    }
}
