// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Bundled demo packs (§1 "Two bundled tool packs"): a fully worked
//! illustration of the Tool Adapter Surface, not a vendor-integration
//! catalog.

mod demo;
mod echo;

use std::sync::Arc;

pub use demo::{ChargeCardTool, DeleteDatabaseTool};
pub use echo::EchoTool;
use rig_runtime::{RegisteredTool, Runtime};

/// Register every bundled pack's tools with `runtime`, stamping each with
/// its pack name/version so `ToolResult::pack`/`pack_version` are populated
/// (§8 invariant 7). Mirrors the Python reference's
/// `PACK.rig_impls()` → `runtime.register(name, reg)` loop.
pub async fn register_demo_packs(runtime: &Runtime) -> anyhow::Result<()> {
    runtime
        .register(RegisteredTool::new(Arc::new(EchoTool)).with_pack("rig-pack-echo", "0.1.0"))
        .await?;
    runtime
        .register(RegisteredTool::new(Arc::new(DeleteDatabaseTool)).with_pack("rig-pack-demo", "0.1.0"))
        .await?;
    runtime
        .register(RegisteredTool::new(Arc::new(ChargeCardTool)).with_pack("rig-pack-demo", "0.1.0"))
        .await?;
    Ok(())
}
