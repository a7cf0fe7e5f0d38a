// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! RTP (Runtime Tool Protocol): the data model every other `rig-*` crate
//! shares — tool definitions, call contexts, results, errors — plus the
//! `Tool` trait that local and remote adapters satisfy.

mod error;
mod remote;
mod result;
mod rtp;
mod tool;

pub use error::{ErrorType, ToolError};
pub use remote::RemoteHttpTool;
pub use result::{Provenance, ToolResult};
pub use rtp::{canonical_json, CallContext, RiskClass, ToolDefinition};
pub use tool::{AdapterError, Tool};
