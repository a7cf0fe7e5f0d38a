// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Secrets Resolver (§4.5): maps the auth slot names a tool declares to
//! secret values for the current invocation scope.
//!
//! A slot that isn't currently satisfied is simply omitted from the result
//! — absence is not an error at resolve time; the adapter implementation
//! decides whether that's fatal (e.g. by raising `auth_error`).
//!
//! The trait is the seam spec.md describes ("future back-ends ... satisfy
//! the same contract"), grounded on the same shape
//! `sven_model::ModelProvider` gives `sven-core` — one trait, one bundled
//! implementation, the call site never depends on the concrete backend.

use std::collections::HashMap;

use async_trait::async_trait;

#[async_trait]
pub trait SecretsResolver: Send + Sync {
    async fn resolve(
        &self,
        slots: &[String],
        tenant_id: Option<&str>,
    ) -> HashMap<String, String>;
}

/// Default backend: reads the declared slot names straight out of the
/// process environment. `tenant_id` is accepted for trait-contract parity
/// with future per-tenant backends but unused here.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSecretsResolver;

#[async_trait]
impl SecretsResolver for EnvSecretsResolver {
    async fn resolve(
        &self,
        slots: &[String],
        _tenant_id: Option<&str>,
    ) -> HashMap<String, String> {
        let mut out = HashMap::new();
        for slot in slots {
            if let Ok(value) = std::env::var(slot) {
                out.insert(slot.clone(), value);
            }
        }
        out
    }
}
