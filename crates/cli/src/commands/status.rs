//! `msgbridge status`: show the lifecycle status of each tool call.
//!
//! Status is read back through a wildcard render, exactly as a UI would
//! observe it, rather than recomputed here.

use super::{read_input, to_json};
use msgbridge_config::BridgeConfig;
use msgbridge_convert::convert_internal_to_external;
use msgbridge_core::{
    ActionDescriptor, ActionRegistry, ExternalMessage, RenderFn, RenderProps, ToolCallStatus,
    decode_internal,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::path::Path;

pub fn run(
    file: Option<&Path>,
    config: &BridgeConfig,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let input = read_input(file)?;
    let rows = status_report(&input, config.status.show_results)?;
    tracing::debug!(calls = rows.len(), "Collected tool call statuses");
    println!("{}", to_json(&rows, pretty)?);
    Ok(())
}

/// One tool call as seen by a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRow {
    pub id: String,
    pub name: String,
    pub status: ToolCallStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

pub fn status_report(input: &str, show_results: bool) -> msgbridge_core::Result<Vec<StatusRow>> {
    let messages = decode_internal(input)?;

    let mut actions = ActionRegistry::new();
    actions.register(ActionDescriptor::wildcard().with_render(RenderFn::new(|p: RenderProps| {
        Some(json!({
            "id": p.message_id,
            "name": p.name,
            "status": p.status,
            "result": p.result,
        }))
    })));

    let external = convert_internal_to_external(&messages, Some(&actions), None)?;
    let mut rows = Vec::new();
    for ui in external
        .iter()
        .filter_map(ExternalMessage::generative_ui)
        .filter_map(|render| render.call(RenderProps::default()))
    {
        let mut row: StatusRow = serde_json::from_value(ui)?;
        if !show_results {
            row.result = None;
        }
        rows.push(row);
    }
    Ok(rows)
}
