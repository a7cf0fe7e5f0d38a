// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use serde::{Deserialize, Serialize};

/// Closed taxonomy of wire-visible error tags (§7).
///
/// Both the Runtime and an adapter may emit the same tag — origin is
/// documented per-variant, not encoded in the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Runtime: input failed JSON-Schema validation.
    ValidationError,
    /// Adapter: vendor credential invalid or missing.
    AuthError,
    /// Adapter: authenticated but not allowed by upstream.
    PermissionError,
    /// Runtime or adapter: unknown tool name, approval token, or upstream absence.
    NotFound,
    /// Adapter: upstream resource conflict.
    Conflict,
    /// Adapter: upstream rate limit.
    RateLimited,
    /// Adapter: upstream asked us to retry.
    Transient,
    /// Runtime: attempt exceeded the per-attempt wall-clock budget.
    Timeout,
    /// Runtime: generic adapter failure after retries exhausted.
    UpstreamError,
    /// Runtime: tool excluded by allow-list.
    PolicyBlocked,
    /// Runtime: risk-class approval gate triggered.
    ApprovalRequired,
    /// Runtime: output schema mismatch or unclassified internal fault.
    InternalError,
}

/// A structured, final failure raised across the adapter boundary.
///
/// `retryable` is advice to the *client* — the Runtime never retries a
/// typed failure itself, no matter what this field says (§7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolError {
    #[serde(rename = "type")]
    pub error_type: ErrorType,
    pub message: String,
    #[serde(default)]
    pub retryable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_code: Option<String>,
    #[serde(default)]
    pub remediation_hints: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

impl ToolError {
    pub fn new(error_type: ErrorType, message: impl Into<String>) -> Self {
        Self {
            error_type,
            message: message.into(),
            retryable: false,
            upstream_code: None,
            remediation_hints: Vec::new(),
            correlation_id: None,
        }
    }

    pub fn retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.remediation_hints.push(hint.into());
        self
    }
}
