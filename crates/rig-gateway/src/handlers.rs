// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Route handlers (spec.md §4.7/§6). Each one is a thin translation from
//! an HTTP request into a `Registry`/`Runtime` call and back — no policy
//! or pipeline logic lives here, matching spec.md §2's leaves-first
//! dependency order ("the HTTP surface depends only on Registry +
//! Runtime").

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use rig_runtime::Runtime;

use crate::wire::{CallBody, HealthBody};

pub async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

/// `GET /v1/tools` — enumerate all definitions, schemas included
/// (spec.md §4.7). `Registry::List`'s lexicographic order is preserved.
pub async fn list_tools(State(runtime): State<Arc<Runtime>>) -> impl IntoResponse {
    Json(runtime.list_tools().await)
}

/// `GET /v1/tools/{name}` — fetch one; `404` when absent (spec.md §4.7).
pub async fn get_tool(
    State(runtime): State<Arc<Runtime>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match runtime.get_tool(&name).await {
        Some(def) => (StatusCode::OK, Json(def)).into_response(),
        None => (StatusCode::NOT_FOUND, Json(serde_json::json!({"detail": "tool not found"})))
            .into_response(),
    }
}

/// `POST /v1/tools/{name}:call` — always HTTP 200 when the envelope is
/// producible; the envelope itself carries `ok`/`error` (spec.md §4.7).
///
/// `matchit` (axum's router) matches a whole `:name` segment up to the
/// next `/`, so the literal `:call` suffix spec.md's route names rides
/// along inside the captured parameter rather than as separate route
/// syntax — it is stripped here, the one spot in the crate that needs to
/// know about the wire format's verb-suffix convention.
pub async fn call_tool(
    State(runtime): State<Arc<Runtime>>,
    Path(raw): Path<String>,
    Json(body): Json<CallBody>,
) -> impl IntoResponse {
    let Some(name) = raw.strip_suffix(":call") else {
        return (StatusCode::NOT_FOUND, Json(serde_json::json!({"detail": "not found"})))
            .into_response();
    };
    let ctx = body.context.unwrap_or_default();
    let result = runtime.call(name, body.args, ctx).await;
    (StatusCode::OK, Json(result)).into_response()
}

/// `POST /v1/approvals/{token}:approve` — same envelope semantics as
/// `:call` (spec.md §4.7).
pub async fn approve(
    State(runtime): State<Arc<Runtime>>,
    Path(raw): Path<String>,
) -> impl IntoResponse {
    let Some(token) = raw.strip_suffix(":approve") else {
        return (StatusCode::NOT_FOUND, Json(serde_json::json!({"detail": "not found"})))
            .into_response();
    };
    let result = runtime.approve_and_call(token).await;
    (StatusCode::OK, Json(result)).into_response()
}
