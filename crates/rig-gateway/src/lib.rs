// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Gateway Protocol Surface (§4.7): a small set of HTTP routes that
//! delegate to the Registry and Runtime.
//!
//! Grounded on the teacher's `axum` 0.7 + `tower-http` stack
//! (`sven-gateway`'s `Cargo.toml`: `axum`, `tower`, `tower-http` with
//! `request-id`/`set-header`/`limit`/`cors`/`trace` features, kept
//! verbatim). Dropped from the teacher's original gateway crate: TLS
//! (`axum-server`/`rcgen`), `libp2p` P2P transport, Slack Socket Mode, the
//! WebSocket control channel, and bearer-token device pairing — none of
//! these have a counterpart in spec.md, which scopes the gateway down to
//! the five documented HTTP routes (§1, §4.7). A `governor`-shaped
//! rate-limit dependency is kept in `Cargo.toml` but deliberately
//! unwired, matching spec.md §1's "slots are reserved but not enforced"
//! non-goal.

mod handlers;
mod router;
mod wire;

use std::net::SocketAddr;
use std::sync::Arc;

use rig_runtime::Runtime;
use tracing::info;

pub use router::build;
pub use wire::CallBody;

/// Bind and serve the RGP surface on `addr`, blocking until the process is
/// signalled to stop. The HTTP layer handles concurrent requests
/// (spec.md §5 "parallel multi-request"); each connection is its own Axum
/// task, consistent with the "no implicit fairness between tenants" note.
pub async fn serve(addr: SocketAddr, runtime: Arc<Runtime>) -> anyhow::Result<()> {
    let app = router::build(runtime);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "RGP gateway listening");
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use rig_audit::FileAuditSink;
    use rig_policy::Policy;
    use rig_secrets::EnvSecretsResolver;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn test_runtime() -> Arc<Runtime> {
        let dir = tempfile::tempdir().unwrap();
        let audit = Arc::new(FileAuditSink::open(dir.path().join("audit.jsonl")).unwrap());
        let runtime = Arc::new(Runtime::new(Policy::default(), Arc::new(EnvSecretsResolver), audit));
        rig_packs::register_demo_packs(&runtime).await.unwrap();
        runtime
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let app = router::build(test_runtime().await);
        let response = app
            .oneshot(Request::builder().uri("/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn list_tools_is_lexicographic_and_includes_schemas() {
        let app = router::build(test_runtime().await);
        let response = app
            .oneshot(Request::builder().uri("/v1/tools").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let names: Vec<&str> = body.as_array().unwrap().iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["charge_card", "delete_database", "echo"]);
        assert!(body[0]["input_schema"].is_object());
    }

    #[tokio::test]
    async fn get_known_tool_returns_its_definition() {
        let app = router::build(test_runtime().await);
        let response = app
            .oneshot(Request::builder().uri("/v1/tools/echo").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["name"], json!("echo"));
    }

    #[tokio::test]
    async fn get_unknown_tool_is_404() {
        let app = router::build(test_runtime().await);
        let response = app
            .oneshot(Request::builder().uri("/v1/tools/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn call_echo_is_always_http_200_even_though_envelope_carries_the_outcome() {
        let app = router::build(test_runtime().await);
        let request = Request::builder()
            .method("POST")
            .uri("/v1/tools/echo:call")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({"args": {"message": "hi"}, "context": {"tenant_id": "t1", "request_id": "r1"}})
                    .to_string(),
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["ok"], json!(true));
        assert_eq!(body["output"]["message"], json!("hi"));
        assert_eq!(body["correlation_id"], json!("r1"));
    }

    #[tokio::test]
    async fn call_unknown_tool_returns_ok_envelope_with_not_found_error() {
        let app = router::build(test_runtime().await);
        let request = Request::builder()
            .method("POST")
            .uri("/v1/tools/nope:call")
            .header("content-type", "application/json")
            .body(Body::from(json!({"args": {}}).to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["ok"], json!(false));
        assert_eq!(body["error"]["type"], json!("not_found"));
    }

    #[tokio::test]
    async fn approval_flow_round_trips_through_http() {
        let app = router::build(test_runtime().await);

        let call = Request::builder()
            .method("POST")
            .uri("/v1/tools/delete_database:call")
            .header("content-type", "application/json")
            .body(Body::from(json!({"args": {"database": "prod"}}).to_string()))
            .unwrap();
        let response = app.clone().oneshot(call).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body["error"]["type"], json!("approval_required"));
        let hint = body["error"]["remediation_hints"][0].as_str().unwrap();
        let token = hint.strip_prefix("approve token: ").unwrap();

        let approve = Request::builder()
            .method("POST")
            .uri(format!("/v1/approvals/{token}:approve"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(approve).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["ok"], json!(true));
        assert_eq!(body["output"]["deleted"], json!(true));
    }
}
