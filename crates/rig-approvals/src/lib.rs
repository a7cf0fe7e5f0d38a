// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Approval Store (§4.4): ephemeral, single-use second-phase
//! authorization for calls gated by `Policy::needs_approval`.
//!
//! No direct teacher module governs a single-use token store; this crate
//! is grounded on the uuid-token + mutex-guarded pending-map shape the
//! teacher uses for other ephemeral handshake state (e.g. the gateway's
//! device-pairing flow), and mirrors
//! `original_source/packages/rig-core/rig_core/runtime.py::ApprovalStore`
//! one-for-one: `create(tool_name, args, ctx) -> token`,
//! `pop(token) -> Option<record>`.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rig_adapter::CallContext;
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

/// A pending call awaiting second-phase approval.
#[derive(Debug, Clone)]
pub struct ApprovalRecord {
    pub tool_name: String,
    pub args: Value,
    pub ctx: CallContext,
}

struct Entry {
    record: ApprovalRecord,
    created_at: Instant,
}

/// Default age-out interval for abandoned approvals (§9 design note:
/// "suggested default: one hour").
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// In-memory `token -> pending call` map. Requires internal locking because
/// `create`/`pop` race across concurrent HTTP requests (§5).
pub struct ApprovalStore {
    pending: Mutex<HashMap<String, Entry>>,
    ttl: Duration,
}

impl Default for ApprovalStore {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl ApprovalStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Create a fresh UUID-shaped token for a pending call.
    pub async fn create(&self, tool_name: &str, args: Value, ctx: CallContext) -> String {
        let token = Uuid::new_v4().to_string();
        let record = ApprovalRecord {
            tool_name: tool_name.to_string(),
            args,
            ctx,
        };
        self.pending.lock().await.insert(
            token.clone(),
            Entry {
                record,
                created_at: Instant::now(),
            },
        );
        token
    }

    /// Atomically return and remove the record for `token`. A second call
    /// with the same token — or a call past the TTL — returns `None`,
    /// making the store idempotent after first success (§8 invariant 5).
    pub async fn pop(&self, token: &str) -> Option<ApprovalRecord> {
        let mut pending = self.pending.lock().await;
        let entry = pending.remove(token)?;
        if entry.created_at.elapsed() > self.ttl {
            return None;
        }
        Some(entry.record)
    }

    pub async fn len(&self) -> usize {
        self.pending.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> CallContext {
        CallContext {
            tenant_id: Some("t1".to_string()),
            request_id: Some("r1".to_string()),
            actor: None,
        }
    }

    #[tokio::test]
    async fn create_then_pop_returns_record() {
        let store = ApprovalStore::default();
        let token = store
            .create("delete_database", json!({"database": "prod"}), ctx())
            .await;
        let record = store.pop(&token).await.unwrap();
        assert_eq!(record.tool_name, "delete_database");
        assert_eq!(record.args, json!({"database": "prod"}));
    }

    #[tokio::test]
    async fn pop_is_single_use() {
        let store = ApprovalStore::default();
        let token = store.create("echo", json!({}), ctx()).await;
        assert!(store.pop(&token).await.is_some());
        assert!(store.pop(&token).await.is_none());
    }

    #[tokio::test]
    async fn pop_unknown_token_returns_none() {
        let store = ApprovalStore::default();
        assert!(store.pop("not-a-real-token").await.is_none());
    }

    #[tokio::test]
    async fn token_looks_like_a_uuid() {
        let store = ApprovalStore::default();
        let token = store.create("echo", json!({}), ctx()).await;
        assert_eq!(Uuid::parse_str(&token).map(|_| ()), Ok(()));
    }

    #[tokio::test]
    async fn expired_entry_is_treated_as_not_found() {
        let store = ApprovalStore::new(Duration::from_millis(1));
        let token = store.create("echo", json!({}), ctx()).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(store.pop(&token).await.is_none());
    }

    #[tokio::test]
    async fn independent_tokens_do_not_collide() {
        let store = ApprovalStore::default();
        let t1 = store.create("a", json!({}), ctx()).await;
        let t2 = store.create("b", json!({}), ctx()).await;
        assert_ne!(t1, t2);
        assert_eq!(store.pop(&t1).await.unwrap().tool_name, "a");
        assert_eq!(store.pop(&t2).await.unwrap().tool_name, "b");
    }
}
