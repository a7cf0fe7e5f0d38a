// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use serde_json::Value;

/// Validate `instance` against `schema`, returning a human-readable
/// message (including the offending path) on mismatch (§4.2 "Input
/// validation").
///
/// Grounded on `vinhnx-VTCode::mcp::schema::validate_against_schema`'s use
/// of the `jsonschema` crate's one-shot `validate` entry point — neither
/// the teacher nor the original Python source need a schema engine of
/// their own, so this borrows the pack's existing idiom wholesale rather
/// than hand-rolling a validator.
pub fn validate_against_schema(schema: &Value, instance: &Value) -> Result<(), String> {
    jsonschema::validate(schema, instance).map_err(|err| err.to_string())
}
