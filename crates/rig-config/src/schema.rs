// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
//! Configuration schema for the `rig` binary.
//!
//! Recovered from `original_source/packages/rig-cli/rig_cli/config.py`'s
//! `RigConfig` dataclass (`packs`, `audit_db_path`, `server.{host,port}`,
//! `policy.*`) and folded onto `rig_policy::Policy`'s field set directly
//! so the two never drift. `node_runner` (the MCP bridge's config) is
//! dropped — the MCP transport bridge is an out-of-scope collaborator
//! per spec.md §1.
use std::path::PathBuf;

use rig_policy::Policy;
use serde::{Deserialize, Serialize};

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_audit_path() -> PathBuf {
    PathBuf::from(".rig/audit.jsonl")
}

fn default_packs() -> Vec<String> {
    vec!["rig-pack-echo".to_string(), "rig-pack-demo".to_string()]
}

/// Top-level configuration, merged from layered YAML files (§2 "ambient
/// additions" — Configuration) plus an optional explicit `--config` path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Pack names to register at startup, in the order given. Only the
    /// two bundled demo packs (`rig-pack-echo`, `rig-pack-demo`) ship
    /// with this binary — pack distribution/installation is an
    /// out-of-scope collaborator (spec.md §1).
    #[serde(default = "default_packs")]
    pub packs: Vec<String>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub policy: Policy,
    #[serde(default)]
    pub audit: AuditConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            packs: default_packs(),
            server: ServerConfig::default(),
            policy: Policy::default(),
            audit: AuditConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

/// Audit Sink storage location (§4.6). `original_source`'s
/// `audit_db_path` pointed at a SQLite file; the Rust rendition keeps the
/// field name's intent (a single path the sink owns) but it now names the
/// append-only JSON-lines file `rig-audit::FileAuditSink` opens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "default_audit_path")]
    pub path: PathBuf,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self { path: default_audit_path() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_policy_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8787);
        assert_eq!(cfg.audit.path, PathBuf::from(".rig/audit.jsonl"));
        assert_eq!(cfg.policy.timeout_seconds(), 30);
        assert_eq!(cfg.policy.retries(), 1);
    }

    #[test]
    fn default_packs_are_the_two_bundled_demo_packs() {
        assert_eq!(
            Config::default().packs,
            vec!["rig-pack-echo".to_string(), "rig-pack-demo".to_string()]
        );
    }
}
