// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use rig_runtime::Runtime;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Build the RGP router (spec.md §4.7/§6), bound to a shared [`Runtime`].
///
/// Carries the teacher's `tower-http` ambient stack — `TraceLayer` for
/// structured per-request spans and `SetRequestIdLayer`/
/// `PropagateRequestIdLayer` for an `x-request-id` header — the same
/// mechanism `CallContext.request_id`/`correlation_id` generation rides on
/// when a caller's body omits `request_id` (spec.md's `SPEC_FULL.md` §2
/// ambient-logging addition).
pub fn build(runtime: Arc<Runtime>) -> Router {
    Router::new()
        .route("/v1/health", get(handlers::health))
        .route("/v1/tools", get(handlers::list_tools))
        .route("/v1/tools/:name", get(handlers::get_tool).post(handlers::call_tool))
        .route("/v1/approvals/:token", post(handlers::approve))
        .with_state(runtime)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
