// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ToolError;
use crate::rtp::{CallContext, ToolDefinition};

/// Failure channel an adapter implementation raises.
///
/// This is the sum-type rendition of the original's exception-with-payload
/// split (§9 "Typed-error signalling through the adapter boundary"):
/// [`AdapterError::Typed`] is final and never retried by the Runtime no
/// matter what `retryable` says; [`AdapterError::Generic`] is a retry
/// candidate up to `policy.retries`, then becomes `upstream_error`.
#[derive(Debug)]
pub enum AdapterError {
    Typed(ToolError),
    Generic(anyhow::Error),
}

impl From<ToolError> for AdapterError {
    fn from(err: ToolError) -> Self {
        AdapterError::Typed(err)
    }
}

impl From<anyhow::Error> for AdapterError {
    fn from(err: anyhow::Error) -> Self {
        AdapterError::Generic(err)
    }
}

/// Contract every local or remote tool implementation satisfies (§4.8).
///
/// A `Tool` is paired with a [`ToolDefinition`] by the caller at
/// registration time (see `rig_runtime::RegisteredTool`); the trait itself
/// only carries the executable half of the pair.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The definition this implementation satisfies. Used by the caller
    /// to register both halves together; must return the same `name` on
    /// every call.
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool once. Implementations must not retry internally —
    /// retry policy is the Runtime's responsibility.
    async fn execute(
        &self,
        args: &Value,
        secrets: &HashMap<String, String>,
        ctx: &CallContext,
    ) -> Result<Value, AdapterError>;
}
