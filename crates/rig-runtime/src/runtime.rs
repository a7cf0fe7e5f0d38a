// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use rig_adapter::{AdapterError, CallContext, ErrorType, Provenance, ToolDefinition, ToolError, ToolResult};
use rig_approvals::ApprovalStore;
use rig_audit::{compute_input_hash, redacted_auth_marker, AuditEvent, AuditSink, Outcome};
use rig_policy::Policy;
use rig_registry::ToolRegistry;
use rig_secrets::SecretsResolver;
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::registered::RegisteredTool;
use crate::validate::validate_against_schema;

/// The pipeline described in §4.2: executes a named call end-to-end
/// (policy → input validation → approval gate → secrets → invoke with
/// retries), writing exactly one audit event per terminal transition.
///
/// Grounded on `sven-core::agent::Agent`'s shape — a struct owning a
/// registry plus a run loop that branches on typed vs. generic adapter
/// failure — generalized from a multi-turn conversational loop to a
/// single-call RPC pipeline, and on
/// `original_source/packages/rig-core/rig_core/runtime.py::Runtime` for
/// the exact stage ordering and backoff constant.
pub struct Runtime {
    registry: Mutex<ToolRegistry>,
    executors: Mutex<HashMap<String, RegisteredTool>>,
    policy: Policy,
    approvals: ApprovalStore,
    secrets: Arc<dyn SecretsResolver>,
    audit: Arc<dyn AuditSink>,
    /// Overrides the live-computed `(interface_hash, pack_set_version)`
    /// pair with externally supplied values (`SetSnapshotMeta`) — used
    /// when a deployment imports a pack-set manifest whose interface hash
    /// was computed elsewhere and must be echoed verbatim rather than
    /// recomputed from locally registered definitions.
    meta_override: Mutex<Option<(String, String)>>,
}

impl Runtime {
    pub fn new(policy: Policy, secrets: Arc<dyn SecretsResolver>, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            registry: Mutex::new(ToolRegistry::new()),
            executors: Mutex::new(HashMap::new()),
            policy,
            approvals: ApprovalStore::default(),
            secrets,
            audit,
            meta_override: Mutex::new(None),
        }
    }

    pub fn with_approvals(mut self, approvals: ApprovalStore) -> Self {
        self.approvals = approvals;
        self
    }

    /// Register one tool, mirroring its definition into the underlying
    /// [`ToolRegistry`] so `List`/`Get`/`Snapshot` and interface hashing
    /// stay authoritative. Expected to run only at startup (§5).
    pub async fn register(&self, registered: RegisteredTool) -> anyhow::Result<()> {
        let def = registered.tool.definition();
        {
            let mut registry = self.registry.lock().await;
            registry.register(def.clone())?;
        }
        self.executors.lock().await.insert(def.name.clone(), registered);
        Ok(())
    }

    pub async fn set_snapshot_meta(&self, interface_hash: impl Into<String>, pack_set_version: impl Into<String>) {
        *self.meta_override.lock().await = Some((interface_hash.into(), pack_set_version.into()));
    }

    pub async fn list_tools(&self) -> Vec<ToolDefinition> {
        self.registry.lock().await.list().into_iter().cloned().collect()
    }

    pub async fn get_tool(&self, name: &str) -> Option<ToolDefinition> {
        self.registry.lock().await.get(name).cloned()
    }

    /// Execute `name` end-to-end for `args`/`ctx` (§4.2).
    pub async fn call(&self, name: &str, args: Value, mut ctx: CallContext) -> ToolResult {
        let start = Instant::now();
        let run_id = ctx
            .request_id
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        ctx.request_id = Some(run_id.clone());

        let registered = self.executors.lock().await.get(name).cloned();
        let Some(registered) = registered else {
            let err = ToolError::new(ErrorType::NotFound, format!("unknown tool: {name}"));
            let provenance = Provenance::default();
            self.write_audit(&run_id, ctx.tenant_id.as_deref(), name, &args, Outcome::Error, start.elapsed(), Some(ErrorType::NotFound), &provenance, &[]).await;
            return ToolResult::err(run_id, err, provenance);
        };

        let def = registered.tool.definition();
        let provenance = self.provenance(&registered).await;

        if !self.policy.is_allowed(&def.name) {
            let err = ToolError::new(ErrorType::PolicyBlocked, format!("tool not in allow-list: {}", def.name));
            self.write_audit(&run_id, ctx.tenant_id.as_deref(), &def.name, &args, Outcome::PolicyDenied, start.elapsed(), Some(ErrorType::PolicyBlocked), &provenance, &def.auth_slots).await;
            return ToolResult::err(run_id, err, provenance);
        }

        if let Err(message) = validate_against_schema(&def.input_schema, &args) {
            let err = ToolError::new(ErrorType::ValidationError, message);
            self.write_audit(&run_id, ctx.tenant_id.as_deref(), &def.name, &args, Outcome::Error, start.elapsed(), Some(ErrorType::ValidationError), &provenance, &def.auth_slots).await;
            return ToolResult::err(run_id, err, provenance);
        }

        if self.policy.needs_approval(def.risk_class) {
            let token = self.approvals.create(&def.name, args.clone(), ctx.clone()).await;
            let err = ToolError::new(ErrorType::ApprovalRequired, format!("{} requires approval", def.name))
                .with_hint(format!("approve token: {token}"));
            self.write_audit(&run_id, ctx.tenant_id.as_deref(), &def.name, &args, Outcome::ApprovalRequired, start.elapsed(), Some(ErrorType::ApprovalRequired), &provenance, &def.auth_slots).await;
            return ToolResult::err(run_id, err, provenance);
        }

        self.invoke(&registered, &def, args, ctx, run_id, provenance, start).await
    }

    /// Redeem a single-use approval token and run the gated call to
    /// completion (§8 boundary: "subsequent `ApproveAndCall(token)`
    /// executes the tool and emits a *second* audit event").
    pub async fn approve_and_call(&self, token: &str) -> ToolResult {
        let start = Instant::now();
        let Some(record) = self.approvals.pop(token).await else {
            let run_id = Uuid::new_v4().to_string();
            let err = ToolError::new(ErrorType::NotFound, format!("unknown or expired approval token: {token}"));
            let provenance = Provenance::default();
            self.write_audit(&run_id, None, "<unknown>", &Value::Null, Outcome::Error, start.elapsed(), Some(ErrorType::NotFound), &provenance, &[]).await;
            return ToolResult::err(run_id, err, provenance);
        };

        let run_id = record
            .ctx
            .request_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let registered = self.executors.lock().await.get(&record.tool_name).cloned();
        let Some(registered) = registered else {
            let err = ToolError::new(ErrorType::NotFound, format!("unknown tool: {}", record.tool_name));
            let provenance = Provenance::default();
            self.write_audit(&run_id, record.ctx.tenant_id.as_deref(), &record.tool_name, &record.args, Outcome::Error, start.elapsed(), Some(ErrorType::NotFound), &provenance, &[]).await;
            return ToolResult::err(run_id, err, provenance);
        };

        let def = registered.tool.definition();
        let provenance = self.provenance(&registered).await;
        self.invoke(&registered, &def, record.args, record.ctx, run_id, provenance, start).await
    }

    async fn provenance(&self, registered: &RegisteredTool) -> Provenance {
        let (interface_hash, pack_set_version) = self.snapshot_meta().await;
        Provenance {
            pack: registered.pack.clone(),
            pack_version: registered.pack_version.clone(),
            interface_hash: Some(interface_hash),
            pack_set_version: Some(pack_set_version),
        }
    }

    async fn snapshot_meta(&self) -> (String, String) {
        if let Some(meta) = self.meta_override.lock().await.clone() {
            return meta;
        }
        let snapshot = self.registry.lock().await.snapshot();
        (snapshot.interface_hash, snapshot.pack_set_version)
    }

    /// Secrets resolve + the retry/backoff/timeout loop (§4.2 "Retry
    /// policy", "Timeout"). Only a [`AdapterError::Generic`] failure or a
    /// per-attempt timeout is retried; [`AdapterError::Typed`] is final.
    async fn invoke(
        &self,
        registered: &RegisteredTool,
        def: &ToolDefinition,
        args: Value,
        ctx: CallContext,
        run_id: String,
        provenance: Provenance,
        start: Instant,
    ) -> ToolResult {
        let secrets = self.secrets.resolve(&def.auth_slots, ctx.tenant_id.as_deref()).await;
        let timeout = Duration::from_secs(self.policy.timeout_seconds());
        let max_attempts = self.policy.retries() + 1;
        let mut attempt = 1u32;

        loop {
            let outcome = tokio::time::timeout(timeout, registered.tool.execute(&args, &secrets, &ctx)).await;
            match outcome {
                Ok(Ok(output)) => {
                    if let Err(message) = validate_against_schema(&def.output_schema, &output) {
                        let err = ToolError::new(ErrorType::InternalError, message);
                        self.write_audit(&run_id, ctx.tenant_id.as_deref(), &def.name, &args, Outcome::Error, start.elapsed(), Some(ErrorType::InternalError), &provenance, &def.auth_slots).await;
                        return ToolResult::err(run_id, err, provenance);
                    }
                    self.write_audit(&run_id, ctx.tenant_id.as_deref(), &def.name, &args, Outcome::Ok, start.elapsed(), None, &provenance, &def.auth_slots).await;
                    return ToolResult::ok(run_id, output, provenance);
                }
                Ok(Err(AdapterError::Typed(err))) => {
                    self.write_audit(&run_id, ctx.tenant_id.as_deref(), &def.name, &args, Outcome::Error, start.elapsed(), Some(err.error_type), &provenance, &def.auth_slots).await;
                    return ToolResult::err(run_id, err, provenance);
                }
                Ok(Err(AdapterError::Generic(cause))) => {
                    if attempt < max_attempts {
                        tokio::time::sleep(Duration::from_secs_f64(0.25 * attempt as f64)).await;
                        attempt += 1;
                        continue;
                    }
                    let err = ToolError::new(ErrorType::UpstreamError, cause.to_string());
                    self.write_audit(&run_id, ctx.tenant_id.as_deref(), &def.name, &args, Outcome::Error, start.elapsed(), Some(ErrorType::UpstreamError), &provenance, &def.auth_slots).await;
                    return ToolResult::err(run_id, err, provenance);
                }
                Err(_elapsed) => {
                    if attempt < max_attempts {
                        tokio::time::sleep(Duration::from_secs_f64(0.25 * attempt as f64)).await;
                        attempt += 1;
                        continue;
                    }
                    let err = ToolError::new(
                        ErrorType::Timeout,
                        format!("{} exceeded {}s on attempt {attempt}", def.name, timeout.as_secs()),
                    );
                    self.write_audit(&run_id, ctx.tenant_id.as_deref(), &def.name, &args, Outcome::Error, start.elapsed(), Some(ErrorType::Timeout), &provenance, &def.auth_slots).await;
                    return ToolResult::err(run_id, err, provenance);
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn write_audit(
        &self,
        run_id: &str,
        tenant_id: Option<&str>,
        tool_name: &str,
        args: &Value,
        outcome: Outcome,
        duration: Duration,
        error_type: Option<ErrorType>,
        provenance: &Provenance,
        auth_slots: &[String],
    ) {
        let now = Utc::now();
        let event = AuditEvent {
            timestamp: now,
            ts_unix: now.timestamp(),
            tenant_id: tenant_id.map(str::to_string),
            run_id: run_id.to_string(),
            tool: tool_name.to_string(),
            input_hash: compute_input_hash(args),
            outcome,
            duration_ms: duration.as_millis() as u64,
            redacted_auth_marker: redacted_auth_marker(auth_slots),
            error_type,
            pack: provenance.pack.clone(),
            pack_version: provenance.pack_version.clone(),
            interface_hash: provenance.interface_hash.clone(),
            pack_set_version: provenance.pack_set_version.clone(),
        };
        if let Err(err) = self.audit.write(event).await {
            tracing::error!(run_id, %err, "failed to write audit event");
        }
    }
}
