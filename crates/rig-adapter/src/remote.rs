// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! The remote half of the Tool Adapter Surface (§4.8 "remote case"): a
//! [`Tool`] impl that delegates execution to a side-car process over HTTP
//! instead of running in-process.
//!
//! Grounded on `sven-tools::builtin::web_fetch`'s pattern of wrapping a
//! plain `reqwest` call behind a `Tool` impl — the side-car request itself
//! is nothing more specialized than any other outbound HTTP call the
//! teacher already makes this way.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ErrorType, ToolError};
use crate::rtp::{CallContext, ToolDefinition};
use crate::tool::{AdapterError, Tool};

/// A [`Tool`] whose `execute` forwards `{args, context}` to a side-car URL
/// and translates a non-`ok` response envelope into
/// [`AdapterError::Typed`], so policy, retries, and auditing behave
/// identically to an in-process tool (§4.8).
///
/// The [`ToolDefinition`] is supplied at construction — the side-car isn't
/// consulted for its schema per call, only for executing it.
pub struct RemoteHttpTool {
    definition: ToolDefinition,
    endpoint: String,
    client: reqwest::Client,
}

impl RemoteHttpTool {
    pub fn new(definition: ToolDefinition, endpoint: impl Into<String>) -> Self {
        Self {
            definition,
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Override the default client, e.g. to share a timeout/connection
    /// pool across several remote tools pointed at the same side-car.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

/// The subset of the Tool Result envelope (§3, §6) this adapter reads off
/// a side-car's response. Fields it doesn't need — `correlation_id`,
/// provenance — are left for the Runtime to stamp on the way out rather
/// than trusted from the side-car.
#[derive(Debug, serde::Deserialize)]
struct RemoteEnvelope {
    ok: bool,
    #[serde(default)]
    output: Option<Value>,
    #[serde(default)]
    error: Option<ToolError>,
}

#[async_trait]
impl Tool for RemoteHttpTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(
        &self,
        args: &Value,
        secrets: &HashMap<String, String>,
        ctx: &CallContext,
    ) -> Result<Value, AdapterError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({"args": args, "context": ctx}));
        for (slot, value) in secrets {
            request = request.header(format!("x-rig-secret-{}", slot.to_lowercase()), value);
        }

        let response = request
            .send()
            .await
            .map_err(|err| AdapterError::Generic(err.into()))?;

        let envelope: RemoteEnvelope = response
            .json()
            .await
            .map_err(|err| AdapterError::Generic(err.into()))?;

        if envelope.ok {
            Ok(envelope.output.unwrap_or(Value::Null))
        } else {
            let err = envelope.error.unwrap_or_else(|| {
                ToolError::new(ErrorType::UpstreamError, "side-car reported failure with no error body")
            });
            Err(AdapterError::Typed(err))
        }
    }
}
