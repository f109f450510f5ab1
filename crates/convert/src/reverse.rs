//! Internal → external conversion.
//!
//! Every internal record maps to exactly one external turn. Action executions
//! become independent assistant turns carrying a single tool call, so a
//! forward conversion of N calls followed by a reverse one yields N+1 turns.
//!
//! When a registry has a render for an action or agent, the produced turn
//! carries a wrapper around it. The wrapper computes tool-call status and
//! result on every invocation from an index shared across the batch.

use crate::parse::{parse_result_for_render, parse_result_text};
use crate::status::{ResultIndex, resolve_status};
use msgbridge_core::external::FUNCTION_TOOL_CALL;
use msgbridge_core::{
    ActionDescriptor, ActionExecutionMessage, ActionRegistry, AgentStateMessage,
    AgentStateRegistry, AssistantTurn, ConversionError, ConversionResult, ExternalMessage,
    FunctionCall, ImageFormat, ImageMessage, ImagePayload, InternalMessage, MatchKind, RenderFn,
    RenderProps, ResultMessage, RespondFn, Role, TextMessage, TextTurn, ToolCall, ToolTurn,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Convert internal records to the external representation.
///
/// Results are indexed up front, so an action execution sees its result even
/// when the result appears earlier in the batch. Registries are only read.
pub fn convert_internal_to_external<M>(
    messages: &M,
    actions: Option<&ActionRegistry>,
    agent_states: Option<&AgentStateRegistry>,
) -> ConversionResult<Vec<ExternalMessage>>
where
    M: AsRef<[InternalMessage]> + ?Sized,
{
    let messages = messages.as_ref();
    let results = Arc::new(ResultIndex::build(messages));

    let mut converted = Vec::with_capacity(messages.len());
    let mut wrapped = 0usize;
    for message in messages {
        let external = match message {
            InternalMessage::Text(text) => text_message_to_external(text),
            InternalMessage::ActionExecution(action) => {
                action_execution_to_external(action, actions, &results)
            }
            InternalMessage::Result(result) => result_message_to_external(result),
            InternalMessage::AgentState(state) => agent_state_to_external(state, agent_states),
            InternalMessage::Image(image) => image_message_to_external(image)?,
        };
        if external.generative_ui().is_some() {
            wrapped += 1;
        }
        converted.push(external);
    }

    debug!(
        input = messages.len(),
        output = converted.len(),
        results = results.len(),
        wrapped,
        "Converted internal messages to external"
    );
    Ok(converted)
}

/// Convert a text record, preserving its role.
pub fn text_message_to_external(message: &TextMessage) -> ExternalMessage {
    let turn = TextTurn {
        id: message.id.clone(),
        content: Some(message.content.clone()),
        image: None,
        created_at: message.created_at,
    };
    match message.role {
        Role::Developer => ExternalMessage::Developer(turn),
        Role::System => ExternalMessage::System(turn),
        Role::User => ExternalMessage::User(turn),
        Role::Assistant => ExternalMessage::Assistant(AssistantTurn {
            id: turn.id,
            content: turn.content,
            created_at: turn.created_at,
            ..bare_assistant_turn()
        }),
    }
}

/// Convert a result record into a tool turn.
pub fn result_message_to_external(message: &ResultMessage) -> ExternalMessage {
    ExternalMessage::Tool(ToolTurn {
        id: message.id.clone(),
        content: Value::String(message.result.clone()),
        tool_call_id: Some(message.action_execution_id.clone()),
        tool_name: Some(message.action_name.clone()),
        created_at: message.created_at,
    })
}

/// Convert an image record after validating its payload.
pub fn image_message_to_external(message: &ImageMessage) -> ConversionResult<ExternalMessage> {
    if ImageFormat::from_name(&message.format).is_none() {
        return Err(ConversionError::InvalidImageFormat {
            format: message.format.clone(),
            id: message.id.clone(),
        });
    }
    if message.bytes.trim().is_empty() {
        return Err(ConversionError::EmptyImageBytes {
            id: message.id.clone(),
        });
    }

    let image = Some(ImagePayload::new(&message.format, &message.bytes));
    match message.role {
        Role::User => Ok(ExternalMessage::User(TextTurn {
            id: message.id.clone(),
            content: Some(String::new()),
            image,
            created_at: message.created_at,
        })),
        Role::Assistant => Ok(ExternalMessage::Assistant(AssistantTurn {
            id: message.id.clone(),
            content: Some(String::new()),
            image,
            created_at: message.created_at,
            ..bare_assistant_turn()
        })),
        other => Err(ConversionError::UnsupportedRoleConversion {
            role: other.as_str().to_string(),
            target: "ExternalImageMessage",
        }),
    }
}

/// Convert an action execution into an assistant turn with one tool call.
///
/// The turn carries a render wrapper when `actions` resolves the tool name
/// (exact name first, then the first wildcard) to a descriptor with a render.
pub fn action_execution_to_external(
    action: &ActionExecutionMessage,
    actions: Option<&ActionRegistry>,
    results: &Arc<ResultIndex>,
) -> ExternalMessage {
    let generative_ui = actions
        .and_then(|registry| registry.resolve(&action.name))
        .and_then(|resolved| {
            action_render_wrapper(action, resolved.descriptor, resolved.kind, results)
        });

    ExternalMessage::Assistant(AssistantTurn {
        id: action.id.clone(),
        tool_calls: vec![ToolCall {
            id: action.id.clone(),
            kind: FUNCTION_TOOL_CALL.to_string(),
            function: FunctionCall {
                name: action.name.clone(),
                arguments: Value::String(Value::Object(action.arguments.clone()).to_string()),
            },
        }],
        name: Some(action.name.clone()),
        created_at: action.created_at,
        generative_ui,
        ..bare_assistant_turn()
    })
}

/// Convert an agent-state record into an assistant agent-state turn.
///
/// The turn carries a wrapper when a descriptor named after the agent has a
/// render. The wrapper ignores caller props and passes only the recorded
/// `state`.
pub fn agent_state_to_external(
    message: &AgentStateMessage,
    agent_states: Option<&AgentStateRegistry>,
) -> ExternalMessage {
    let generative_ui = agent_states
        .and_then(|registry| registry.find(&message.agent_name))
        .and_then(|(_, descriptor)| descriptor.render.clone())
        .map(|original| {
            let state = message.state.clone();
            RenderFn::new(move |_: RenderProps| {
                original.call(RenderProps {
                    state: Some(state.clone()),
                    ..RenderProps::default()
                })
            })
        });

    ExternalMessage::Assistant(AssistantTurn {
        id: message.id.clone(),
        agent_name: Some(message.agent_name.clone()),
        state: Some(message.state.clone()),
        created_at: message.created_at,
        generative_ui,
        ..bare_assistant_turn()
    })
}

/// Wrap the descriptor's render so status and result are computed per call.
///
/// The original render is captured here, so later changes to the registry do
/// not affect turns already produced.
fn action_render_wrapper(
    action: &ActionExecutionMessage,
    descriptor: &ActionDescriptor,
    kind: MatchKind,
    results: &Arc<ResultIndex>,
) -> Option<RenderFn> {
    let original = descriptor.render.clone()?;
    let results = Arc::clone(results);
    let id = action.id.clone();
    let name = action.name.clone();
    let args = Value::Object(action.arguments.clone());
    let status_code = action.status.as_ref().map(|s| s.code);

    Some(RenderFn::new(move |overrides: RenderProps| {
        let stored = results.get(&id);
        let status = overrides
            .status
            .unwrap_or_else(|| resolve_status(stored.is_some(), status_code));
        let result = match overrides.result {
            Some(result) if !result.is_null() => Some(parse_result_for_render(&result)),
            _ => stored.map(parse_result_text),
        };

        let mut props = RenderProps {
            status: Some(status),
            args: Some(
                overrides
                    .args
                    .filter(|a| !a.is_null())
                    .unwrap_or_else(|| args.clone()),
            ),
            result,
            message_id: Some(overrides.message_id.unwrap_or_else(|| id.clone())),
            name: overrides.name,
            state: overrides.state,
            respond: overrides.respond,
            extra: overrides.extra,
        };
        match kind {
            MatchKind::Wildcard => props.name = Some(name.clone()),
            MatchKind::Specific => {
                props.respond.get_or_insert_with(RespondFn::noop);
            }
        }
        original.call(props)
    }))
}

fn bare_assistant_turn() -> AssistantTurn {
    AssistantTurn {
        content: None,
        ..AssistantTurn::new("")
    }
}
