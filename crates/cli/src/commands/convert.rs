//! `msgbridge to-internal`, `to-external`, and `roundtrip`.

use super::{read_input, to_json};
use msgbridge_convert::{convert_external_to_internal, convert_internal_to_external};
use msgbridge_core::{ExternalMessage, InternalMessage, decode_external, decode_internal};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

pub fn to_internal(file: Option<&Path>, pretty: bool) -> Result<(), Box<dyn std::error::Error>> {
    let input = read_input(file)?;
    let internal = external_to_internal(&input)?;
    println!("{}", to_json(&internal, pretty)?);
    Ok(())
}

pub fn to_external(file: Option<&Path>, pretty: bool) -> Result<(), Box<dyn std::error::Error>> {
    let input = read_input(file)?;
    let external = internal_to_external(&input)?;
    println!("{}", to_json(&external, pretty)?);
    Ok(())
}

pub fn roundtrip(file: Option<&Path>, pretty: bool) -> Result<(), Box<dyn std::error::Error>> {
    let input = read_input(file)?;
    let report = roundtrip_report(&input)?;
    if !report.ids_preserved {
        tracing::warn!(
            missing = report.missing_ids.len() + report.missing_tool_call_ids.len(),
            "Round trip dropped identifiers"
        );
    }
    println!("{}", to_json(&report, pretty)?);
    Ok(())
}

fn external_to_internal(input: &str) -> msgbridge_core::Result<Vec<InternalMessage>> {
    let messages = decode_external(input)?;
    Ok(convert_external_to_internal(&messages, None, None)?)
}

fn internal_to_external(input: &str) -> msgbridge_core::Result<Vec<ExternalMessage>> {
    let messages = decode_internal(input)?;
    Ok(convert_internal_to_external(&messages, None, None)?)
}

/// Outcome of converting a conversation to internal and back.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundtripReport {
    pub input: usize,
    pub internal: usize,
    pub output: usize,
    pub ids_preserved: bool,
    pub missing_ids: Vec<String>,
    pub missing_tool_call_ids: Vec<String>,
}

pub fn roundtrip_report(input: &str) -> msgbridge_core::Result<RoundtripReport> {
    let external = decode_external(input)?;
    let internal = convert_external_to_internal(&external, None, None)?;
    let output = convert_internal_to_external(&internal, None, None)?;

    let ids: HashSet<&str> = output.iter().map(ExternalMessage::id).collect();
    let missing_ids: Vec<String> = external
        .iter()
        .map(ExternalMessage::id)
        .filter(|id| !ids.contains(id))
        .map(str::to_string)
        .collect();

    let call_ids: HashSet<&str> = output.iter().flat_map(tool_call_ids).collect();
    let missing_tool_call_ids: Vec<String> = external
        .iter()
        .flat_map(tool_call_ids)
        .filter(|id| !call_ids.contains(id))
        .map(str::to_string)
        .collect();

    Ok(RoundtripReport {
        input: external.len(),
        internal: internal.len(),
        output: output.len(),
        ids_preserved: missing_ids.is_empty() && missing_tool_call_ids.is_empty(),
        missing_ids,
        missing_tool_call_ids,
    })
}

fn tool_call_ids(message: &ExternalMessage) -> impl Iterator<Item = &str> {
    message
        .as_assistant()
        .into_iter()
        .flat_map(|turn| turn.tool_calls.iter().map(|call| call.id.as_str()))
}
