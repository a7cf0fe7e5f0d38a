// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use rig_adapter::Tool;

/// The executable half of a registration: a [`Tool`] implementation paired
/// with the pack-provenance strings that get stamped onto every
/// [`rig_adapter::ToolResult`] for this tool (§8 invariant 7).
///
/// The definition half (name, schemas, risk class…) lives on the `Tool`
/// itself via [`Tool::definition`] and is mirrored into the
/// [`rig_registry::ToolRegistry`] at registration time so `List`/`Get`/
/// `Snapshot` stay authoritative for interface hashing.
#[derive(Clone)]
pub struct RegisteredTool {
    pub tool: Arc<dyn Tool>,
    pub pack: Option<String>,
    pub pack_version: Option<String>,
}

impl RegisteredTool {
    pub fn new(tool: Arc<dyn Tool>) -> Self {
        Self {
            tool,
            pack: None,
            pack_version: None,
        }
    }

    pub fn with_pack(mut self, pack: impl Into<String>, pack_version: impl Into<String>) -> Self {
        self.pack = Some(pack.into());
        self.pack_version = Some(pack_version.into());
        self
    }
}
