// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Policy evaluator (§4.3): allow-list membership, approval-class
//! membership, and the per-call timeout/retry knobs the Runtime reads.
//!
//! Generalized from `sven-tools::policy::ToolPolicy`'s glob-match engine
//! (auto/ask/deny over shell-command strings) to the set-membership model
//! spec.md §4.3 describes: tool names and risk classes are already closed,
//! discrete values, so no pattern language is needed.

use std::collections::HashSet;

use rig_adapter::RiskClass;
use serde::{Deserialize, Serialize};

/// Policy configuration consulted on every `Call`.
///
/// `allowed_tools = None` means every known tool is allowed — present
/// means membership test (§4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    #[serde(default)]
    pub allowed_tools: Option<HashSet<String>>,
    #[serde(default = "default_require_approval_for")]
    pub require_approval_for: HashSet<RiskClass>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_retries")]
    pub retries: u32,
}

fn default_require_approval_for() -> HashSet<RiskClass> {
    [RiskClass::Money, RiskClass::Infra, RiskClass::Destructive]
        .into_iter()
        .collect()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_retries() -> u32 {
    1
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            allowed_tools: None,
            require_approval_for: default_require_approval_for(),
            timeout_seconds: default_timeout_seconds(),
            retries: default_retries(),
        }
    }
}

impl Policy {
    /// `allowed_tools` absent ⇒ `true`; present ⇒ membership test.
    pub fn is_allowed(&self, tool_name: &str) -> bool {
        match &self.allowed_tools {
            None => true,
            Some(allowed) => allowed.contains(tool_name),
        }
    }

    pub fn needs_approval(&self, risk_class: RiskClass) -> bool {
        self.require_approval_for.contains(&risk_class)
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_allows_everything() {
        let p = Policy::default();
        assert!(p.is_allowed("anything"));
    }

    #[test]
    fn empty_allowlist_denies_everything() {
        let p = Policy {
            allowed_tools: Some(HashSet::new()),
            ..Policy::default()
        };
        assert!(!p.is_allowed("echo"));
    }

    #[test]
    fn present_allowlist_is_membership_test() {
        let p = Policy {
            allowed_tools: Some(["echo".to_string()].into_iter().collect()),
            ..Policy::default()
        };
        assert!(p.is_allowed("echo"));
        assert!(!p.is_allowed("delete_database"));
    }

    #[test]
    fn default_requires_approval_for_money_infra_destructive() {
        let p = Policy::default();
        assert!(p.needs_approval(RiskClass::Money));
        assert!(p.needs_approval(RiskClass::Infra));
        assert!(p.needs_approval(RiskClass::Destructive));
        assert!(!p.needs_approval(RiskClass::Read));
        assert!(!p.needs_approval(RiskClass::Write));
    }

    #[test]
    fn default_timeout_and_retries() {
        let p = Policy::default();
        assert_eq!(p.timeout_seconds(), 30);
        assert_eq!(p.retries(), 1);
    }

    #[test]
    fn custom_approval_set_overrides_default() {
        let p = Policy {
            require_approval_for: [RiskClass::Write].into_iter().collect(),
            ..Policy::default()
        };
        assert!(p.needs_approval(RiskClass::Write));
        assert!(!p.needs_approval(RiskClass::Money));
    }
}
