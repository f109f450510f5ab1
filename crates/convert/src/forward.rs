//! External → internal conversion.
//!
//! Each external turn expands into one or more internal records. A
//! tool-invoking assistant turn becomes a text record plus one action
//! execution per tool call, all linked by `parent_message_id`.
//!
//! Render callbacks found on the input are bound into the caller's registries.
//! Bindings are staged while the batch converts and applied only once every
//! message has converted, so a failed call leaves the registries untouched.

use crate::UNKNOWN_NAME;
use crate::parse::{parse_arguments, stringify_result};
use msgbridge_core::external::FUNCTION_TOOL_CALL;
use msgbridge_core::{
    ActionExecutionMessage, ActionRegistry, AgentStateDescriptor, AgentStateMessage,
    AgentStateRegistry, AssistantTurn, ConversionError, ConversionResult, ExternalMessage,
    ImageMessage, ImagePayload, InternalMessage, MatchKind, RenderFn, ResultMessage, Role,
    TextMessage, ToolCall, ToolTurn,
};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Convert external messages to the internal representation.
///
/// `messages` may be a single message, an array, a `Vec`, or a slice. When a
/// tool-invoking turn carries a render callback, it is assigned to the action
/// descriptor matching the tool name, or to the first wildcard descriptor if
/// none matches. Agent-state renders are stored under the agent's name.
pub fn convert_external_to_internal<M>(
    messages: &M,
    mut actions: Option<&mut ActionRegistry>,
    mut agent_states: Option<&mut AgentStateRegistry>,
) -> ConversionResult<Vec<InternalMessage>>
where
    M: AsRef<[ExternalMessage]> + ?Sized,
{
    let messages = messages.as_ref();
    let mut pass = ForwardPass::new(actions.as_deref(), agent_states.is_some());
    for message in messages {
        pass.push(message)?;
    }
    let (converted, bindings) = pass.finish();

    let bound = bindings.len();
    for binding in bindings {
        match binding {
            Binding::Action { key, render } => {
                if let Some(registry) = actions.as_deref_mut() {
                    registry.set_render(&key, render);
                }
            }
            Binding::AgentState { name, render } => {
                if let Some(registry) = agent_states.as_deref_mut() {
                    registry.insert(name.clone(), AgentStateDescriptor::new(name).with_render(render));
                }
            }
        }
    }

    debug!(
        input = messages.len(),
        output = converted.len(),
        bound,
        "Converted external messages to internal"
    );
    Ok(converted)
}

/// Like [`convert_external_to_internal`] for one message, but an assistant
/// turn that carries only a render callback (no tool calls, no agent state)
/// becomes an agent-state record for agent `"unknown"`, with the render
/// registered under that name.
pub fn convert_external_with_render(
    message: &ExternalMessage,
    actions: Option<&mut ActionRegistry>,
    agent_states: Option<&mut AgentStateRegistry>,
) -> ConversionResult<Vec<InternalMessage>> {
    if let ExternalMessage::Assistant(turn) = message {
        if let Some(render) = &turn.generative_ui {
            if turn.tool_calls.is_empty() && !turn.is_agent_state() {
                let record = AgentStateMessage {
                    id: turn.id.clone(),
                    agent_name: UNKNOWN_NAME.to_string(),
                    state: Value::Object(Map::new()),
                    role: Role::Assistant,
                    created_at: turn.created_at,
                    status: None,
                };
                if let Some(registry) = agent_states {
                    registry.insert(
                        UNKNOWN_NAME,
                        AgentStateDescriptor::new(UNKNOWN_NAME).with_render(render.clone()),
                    );
                }
                return Ok(vec![record.into()]);
            }
        }
    }
    convert_external_to_internal(message, actions, agent_states)
}

/// Convert a developer, system, assistant, or user turn to a text record.
pub fn text_message_from_external(message: &ExternalMessage) -> ConversionResult<TextMessage> {
    let (role, id, content, created_at) = match message {
        ExternalMessage::Developer(t) => (Role::Developer, &t.id, &t.content, t.created_at),
        ExternalMessage::System(t) => (Role::System, &t.id, &t.content, t.created_at),
        ExternalMessage::User(t) => (Role::User, &t.id, &t.content, t.created_at),
        ExternalMessage::Assistant(t) => (Role::Assistant, &t.id, &t.content, t.created_at),
        ExternalMessage::Tool(_) => {
            return Err(ConversionError::UnsupportedRoleConversion {
                role: message.role().to_string(),
                target: "TextMessage",
            });
        }
    };

    Ok(TextMessage {
        id: id.clone(),
        role,
        content: content.clone().unwrap_or_default(),
        created_at,
        status: None,
    })
}

/// Convert one tool call into an action execution linked to its parent turn.
pub fn action_execution_from_tool_call(
    tool_call: &ToolCall,
    parent_message_id: &str,
) -> ConversionResult<ActionExecutionMessage> {
    if tool_call.kind != FUNCTION_TOOL_CALL {
        return Err(ConversionError::InvalidToolCallType {
            kind: tool_call.kind.clone(),
            id: tool_call.id.clone(),
        });
    }

    Ok(ActionExecutionMessage {
        id: tool_call.id.clone(),
        name: tool_call.function.name.clone(),
        arguments: parse_arguments(&tool_call.function.arguments, &tool_call.function.name),
        parent_message_id: Some(parent_message_id.to_string()),
        created_at: None,
        status: None,
    })
}

/// Convert a tool turn into a result record.
///
/// The action name is the turn's own `toolName` if set, otherwise the name
/// recorded for its `toolCallId` in `tool_call_names`, otherwise `"unknown"`.
pub fn result_message_from_external(
    message: &ExternalMessage,
    tool_call_names: &HashMap<String, String>,
) -> ConversionResult<ResultMessage> {
    match message {
        ExternalMessage::Tool(turn) => result_message_from_turn(turn, tool_call_names),
        other => Err(ConversionError::UnsupportedRoleConversion {
            role: other.role().to_string(),
            target: "ResultMessage",
        }),
    }
}

/// Convert a user or assistant turn carrying a complete image payload.
pub fn image_message_from_external(message: &ExternalMessage) -> ConversionResult<ImageMessage> {
    let (role, id, image, created_at) = match message {
        ExternalMessage::User(t) => (Role::User, &t.id, &t.image, t.created_at),
        ExternalMessage::Assistant(t) => (Role::Assistant, &t.id, &t.image, t.created_at),
        other => {
            return Err(ConversionError::UnsupportedRoleConversion {
                role: other.role().to_string(),
                target: "ImageMessage",
            });
        }
    };

    match image {
        Some(ImagePayload {
            format: Some(format),
            bytes: Some(bytes),
        }) => Ok(ImageMessage {
            id: id.clone(),
            format: format.clone(),
            bytes: bytes.clone(),
            role,
            created_at,
            status: None,
        }),
        _ => Err(ConversionError::MalformedImage { id: id.clone() }),
    }
}

fn result_message_from_turn(
    turn: &ToolTurn,
    tool_call_names: &HashMap<String, String>,
) -> ConversionResult<ResultMessage> {
    let Some(tool_call_id) = turn.tool_call_id.as_ref() else {
        return Err(ConversionError::MissingToolCallId {
            id: turn.id.clone(),
        });
    };

    let action_name = turn
        .tool_name
        .as_ref()
        .filter(|name| !name.is_empty())
        .or_else(|| tool_call_names.get(tool_call_id))
        .cloned()
        .unwrap_or_else(|| {
            warn!(
                message_id = %turn.id,
                tool_call_id = %tool_call_id,
                "No tool call found for result, using unknown action name"
            );
            UNKNOWN_NAME.to_string()
        });

    Ok(ResultMessage {
        id: turn.id.clone(),
        result: stringify_result(&turn.content),
        action_execution_id: tool_call_id.clone(),
        action_name,
        created_at: turn.created_at,
        status: None,
    })
}

/// A registry write deferred until the whole batch has converted.
enum Binding {
    Action { key: String, render: RenderFn },
    AgentState { name: String, render: RenderFn },
}

/// State carried across one forward conversion call.
struct ForwardPass<'a> {
    actions: Option<&'a ActionRegistry>,
    collect_agent_states: bool,
    tool_call_names: HashMap<String, String>,
    bindings: Vec<Binding>,
    converted: Vec<InternalMessage>,
}

impl<'a> ForwardPass<'a> {
    fn new(actions: Option<&'a ActionRegistry>, collect_agent_states: bool) -> Self {
        Self {
            actions,
            collect_agent_states,
            tool_call_names: HashMap::new(),
            bindings: Vec::new(),
            converted: Vec::new(),
        }
    }

    fn push(&mut self, message: &ExternalMessage) -> ConversionResult<()> {
        match message {
            ExternalMessage::Assistant(turn) if turn.is_agent_state() => {
                self.push_agent_state(turn);
            }
            _ if message.image().is_some_and(ImagePayload::is_complete) => {
                let image = image_message_from_external(message)?;
                self.converted.push(image.into());
            }
            ExternalMessage::Assistant(turn) if !turn.tool_calls.is_empty() => {
                self.push_tool_invoking(turn)?;
            }
            ExternalMessage::Tool(turn) => {
                let result = result_message_from_turn(turn, &self.tool_call_names)?;
                self.converted.push(result.into());
            }
            _ => {
                let text = text_message_from_external(message)?;
                self.converted.push(text.into());
            }
        }
        Ok(())
    }

    fn push_agent_state(&mut self, turn: &AssistantTurn) {
        let agent_name = turn
            .agent_name
            .clone()
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());
        let state = match &turn.state {
            Some(state) if !state.is_null() => state.clone(),
            _ => Value::Object(Map::new()),
        };

        if let (Some(render), true) = (&turn.generative_ui, self.collect_agent_states) {
            self.bindings.push(Binding::AgentState {
                name: agent_name.clone(),
                render: render.clone(),
            });
        }

        self.converted.push(
            AgentStateMessage {
                id: turn.id.clone(),
                agent_name,
                state,
                role: Role::Assistant,
                created_at: turn.created_at,
                status: None,
            }
            .into(),
        );
    }

    fn push_tool_invoking(&mut self, turn: &AssistantTurn) -> ConversionResult<()> {
        self.converted.push(
            TextMessage {
                id: turn.id.clone(),
                role: Role::Assistant,
                content: turn.content.clone().unwrap_or_default(),
                created_at: turn.created_at,
                status: None,
            }
            .into(),
        );

        for tool_call in &turn.tool_calls {
            self.tool_call_names
                .insert(tool_call.id.clone(), tool_call.function.name.clone());

            let mut action = action_execution_from_tool_call(tool_call, &turn.id)?;
            action.created_at = turn.created_at;

            if let (Some(render), Some(registry)) = (&turn.generative_ui, self.actions) {
                if let Some(resolved) = registry.resolve(&action.name) {
                    debug!(
                        tool = %action.name,
                        key = %resolved.key,
                        wildcard = resolved.kind == MatchKind::Wildcard,
                        "Binding render to action descriptor"
                    );
                    self.bindings.push(Binding::Action {
                        key: resolved.key.to_string(),
                        render: render.clone(),
                    });
                }
            }

            self.converted.push(action.into());
        }
        Ok(())
    }

    fn finish(self) -> (Vec<InternalMessage>, Vec<Binding>) {
        (self.converted, self.bindings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use msgbridge_core::external::TextTurn;
    use msgbridge_core::{ActionDescriptor, RenderProps, decode_external};
    use serde_json::json;

    fn render(tag: &'static str) -> RenderFn {
        RenderFn::new(move |_: RenderProps| Some(json!(tag)))
    }

    fn tool_turn(id: &str, calls: Vec<ToolCall>) -> AssistantTurn {
        AssistantTurn {
            id: id.to_string(),
            tool_calls: calls,
            ..AssistantTurn::new("")
        }
    }

    #[test]
    fn converts_each_text_role() {
        let messages = vec![
            ExternalMessage::developer("dev").with_id("d1"),
            ExternalMessage::system("sys").with_id("s1"),
            ExternalMessage::assistant("hi").with_id("a1"),
            ExternalMessage::user("hello").with_id("u1"),
        ];
        let converted = convert_external_to_internal(&messages, None, None).unwrap();
        let roles: Vec<_> = converted
            .iter()
            .map(|m| m.as_text().unwrap().role)
            .collect();
        assert_eq!(
            roles,
            [Role::Developer, Role::System, Role::Assistant, Role::User]
        );
        assert_eq!(converted[3].as_text().unwrap().content, "hello");
    }

    #[test]
    fn absent_content_becomes_empty() {
        let message = ExternalMessage::User(TextTurn {
            content: None,
            ..TextTurn::new("")
        });
        let text = text_message_from_external(&message).unwrap();
        assert_eq!(text.content, "");
    }

    #[test]
    fn tool_role_cannot_become_text() {
        let err = text_message_from_external(&ExternalMessage::tool("t1", "ok")).unwrap_err();
        assert!(matches!(
            err,
            ConversionError::UnsupportedRoleConversion { target: "TextMessage", .. }
        ));
    }

    #[test]
    fn expands_tool_calls_in_order() {
        let turn = tool_turn(
            "a1",
            vec![
                ToolCall::function("t1", "search", r#"{"q":"x"}"#),
                ToolCall::function("t2", "fetch", r#"{"url":"u"}"#),
            ],
        );
        let converted =
            convert_external_to_internal(&ExternalMessage::Assistant(turn), None, None).unwrap();

        assert_eq!(converted.len(), 3);
        assert_eq!(converted[0].id(), "a1");
        let first = converted[1].as_action_execution().unwrap();
        let second = converted[2].as_action_execution().unwrap();
        assert_eq!((first.id.as_str(), first.name.as_str()), ("t1", "search"));
        assert_eq!((second.id.as_str(), second.name.as_str()), ("t2", "fetch"));
        assert_eq!(first.parent_message_id.as_deref(), Some("a1"));
        assert_eq!(second.parent_message_id.as_deref(), Some("a1"));
        assert_eq!(Value::Object(second.arguments.clone()), json!({ "url": "u" }));
    }

    #[test]
    fn rejects_non_function_tool_calls() {
        let mut call = ToolCall::function("t1", "search", "{}");
        call.kind = "retrieval".into();
        let err = action_execution_from_tool_call(&call, "a1").unwrap_err();
        assert_eq!(
            err,
            ConversionError::InvalidToolCallType {
                kind: "retrieval".into(),
                id: "t1".into()
            }
        );
    }

    #[test]
    fn malformed_arguments_do_not_abort() {
        let turn = tool_turn("a1", vec![ToolCall::function("t1", "broken", "invalid json {")]);
        let converted =
            convert_external_to_internal(&ExternalMessage::Assistant(turn), None, None).unwrap();
        assert!(converted[1].as_action_execution().unwrap().arguments.is_empty());
    }

    #[test]
    fn result_name_comes_from_earlier_tool_call() {
        let messages = vec![
            ExternalMessage::Assistant(tool_turn(
                "a1",
                vec![ToolCall::function("t1", "search", "{}")],
            )),
            ExternalMessage::tool("t1", "found 3").with_id("r1"),
        ];
        let converted = convert_external_to_internal(&messages, None, None).unwrap();
        let result = converted[2].as_result().unwrap();
        assert_eq!(result.action_name, "search");
        assert_eq!(result.action_execution_id, "t1");
        assert_eq!(result.result, "found 3");
    }

    #[test]
    fn result_name_falls_back_to_unknown() {
        let converted =
            convert_external_to_internal(&ExternalMessage::tool("t404", "late"), None, None)
                .unwrap();
        assert_eq!(converted[0].as_result().unwrap().action_name, UNKNOWN_NAME);
    }

    #[test]
    fn explicit_tool_name_wins() {
        let message = ExternalMessage::Tool(ToolTurn {
            id: "r1".into(),
            content: json!("done"),
            tool_call_id: Some("t1".into()),
            tool_name: Some("explicit".into()),
            created_at: None,
        });
        let mut names = HashMap::new();
        names.insert("t1".to_string(), "recorded".to_string());
        let result = result_message_from_external(&message, &names).unwrap();
        assert_eq!(result.action_name, "explicit");
    }

    #[test]
    fn tool_result_requires_call_id() {
        let message = ExternalMessage::Tool(ToolTurn {
            id: "r1".into(),
            content: json!("orphan"),
            tool_call_id: None,
            tool_name: None,
            created_at: None,
        });
        let err = convert_external_to_internal(&message, None, None).unwrap_err();
        assert_eq!(err, ConversionError::MissingToolCallId { id: "r1".into() });
    }

    #[test]
    fn non_tool_cannot_become_result() {
        let err = result_message_from_external(&ExternalMessage::user("hi"), &HashMap::new())
            .unwrap_err();
        assert!(matches!(
            err,
            ConversionError::UnsupportedRoleConversion { target: "ResultMessage", .. }
        ));
    }

    #[test]
    fn object_result_content_is_serialized() {
        let message = ExternalMessage::tool("t1", json!({ "status": "success", "data": { "value": 42 } }));
        let converted = convert_external_to_internal(&message, None, None).unwrap();
        assert_eq!(
            converted[0].as_result().unwrap().result,
            r#"{"status":"success","data":{"value":42}}"#
        );
    }

    #[test]
    fn agent_state_turn_and_render_binding() {
        let turn = AssistantTurn {
            agent_name: Some("planner".into()),
            state: Some(json!({ "step": 1 })),
            generative_ui: Some(render("plan")),
            ..AssistantTurn::new("")
        };
        let mut states = AgentStateRegistry::new();
        let converted =
            convert_external_to_internal(&ExternalMessage::Assistant(turn), None, Some(&mut states))
                .unwrap();

        let record = converted[0].as_agent_state().unwrap();
        assert_eq!(record.agent_name, "planner");
        assert_eq!(record.state, json!({ "step": 1 }));
        let descriptor = states.get("planner").unwrap();
        assert_eq!(descriptor.name, "planner");
        assert!(descriptor.render.is_some());
    }

    #[test]
    fn agent_state_null_snapshot_becomes_empty_object() {
        let turn = AssistantTurn {
            state: Some(Value::Null),
            agent_name: Some("planner".into()),
            ..AssistantTurn::new("")
        };
        let converted =
            convert_external_to_internal(&ExternalMessage::Assistant(turn), None, None).unwrap();
        let record = converted[0].as_agent_state().unwrap();
        assert_eq!(record.agent_name, "planner");
        assert_eq!(record.state, json!({}));
    }

    #[test]
    fn agent_name_alone_keeps_tool_calls() {
        let messages = decode_external(
            r#"[{"id":"a1","role":"assistant","agentName":"planner","toolCalls":[
                   {"id":"t1","type":"function","function":{"name":"search","arguments":"{}"}}]},
                {"id":"r1","role":"tool","content":"ok","toolCallId":"t1"}]"#,
        )
        .unwrap();
        let converted = convert_external_to_internal(&messages, None, None).unwrap();

        assert_eq!(converted.len(), 3);
        assert!(converted[0].as_text().is_some());
        assert_eq!(converted[1].as_action_execution().unwrap().name, "search");
        assert_eq!(converted[2].as_result().unwrap().action_name, "search");
    }

    #[test]
    fn image_turns_convert() {
        let messages = decode_external(
            r#"[{"id":"i1","role":"user","image":{"format":"png","bytes":"AAAA"}},
                {"id":"i2","role":"assistant","image":{"format":"jpeg","bytes":"BBBB"}}]"#,
        )
        .unwrap();
        let converted = convert_external_to_internal(&messages, None, None).unwrap();
        let user = converted[0].as_image().unwrap();
        let assistant = converted[1].as_image().unwrap();
        assert_eq!((user.role, user.format.as_str()), (Role::User, "png"));
        assert_eq!((assistant.role, assistant.bytes.as_str()), (Role::Assistant, "BBBB"));
    }

    #[test]
    fn incomplete_image_falls_through_to_text() {
        let messages = decode_external(
            r#"{"id":"i1","role":"user","content":"look","image":{"format":"png"}}"#,
        )
        .unwrap();
        let converted = convert_external_to_internal(&messages, None, None).unwrap();
        assert_eq!(converted[0].as_text().unwrap().content, "look");

        let err = image_message_from_external(&messages[0]).unwrap_err();
        assert_eq!(err, ConversionError::MalformedImage { id: "i1".into() });
    }

    #[test]
    fn image_helper_rejects_other_roles() {
        let err = image_message_from_external(&ExternalMessage::system("x")).unwrap_err();
        assert!(matches!(
            err,
            ConversionError::UnsupportedRoleConversion { target: "ImageMessage", .. }
        ));
    }

    #[test]
    fn specific_descriptor_receives_render() {
        let mut actions = ActionRegistry::new();
        actions.insert("specific", ActionDescriptor::new("foo"));
        actions.insert("*", ActionDescriptor::wildcard());

        let turn = tool_turn("a1", vec![ToolCall::function("t1", "foo", "{}")])
            .with_generative_ui(render("foo-ui"));
        convert_external_to_internal(&ExternalMessage::Assistant(turn), Some(&mut actions), None)
            .unwrap();

        assert!(actions.get("specific").unwrap().render.is_some());
        assert!(actions.get("*").unwrap().render.is_none());
    }

    #[test]
    fn wildcard_receives_render_when_no_specific() {
        let mut actions = ActionRegistry::new();
        actions.insert("first", ActionDescriptor::wildcard());
        actions.insert("second", ActionDescriptor::wildcard());
        actions.insert("other", ActionDescriptor::new("other"));

        let turn = tool_turn("a1", vec![ToolCall::function("t1", "foo", "{}")])
            .with_generative_ui(render("any-ui"));
        convert_external_to_internal(&ExternalMessage::Assistant(turn), Some(&mut actions), None)
            .unwrap();

        assert!(actions.get("first").unwrap().render.is_some());
        assert!(actions.get("second").unwrap().render.is_none());
        assert!(actions.get("other").unwrap().render.is_none());
    }

    #[test]
    fn failed_batch_leaves_registries_untouched() {
        let mut actions = ActionRegistry::new();
        actions.register(ActionDescriptor::new("foo"));
        let mut states = AgentStateRegistry::new();

        let mut bad_call = ToolCall::function("t2", "foo", "{}");
        bad_call.kind = "retrieval".into();
        let messages = vec![
            ExternalMessage::Assistant(AssistantTurn {
                agent_name: Some("planner".into()),
                state: Some(json!({})),
                generative_ui: Some(render("plan")),
                ..AssistantTurn::new("")
            }),
            ExternalMessage::Assistant(
                tool_turn("a1", vec![ToolCall::function("t1", "foo", "{}")])
                    .with_generative_ui(render("foo-ui")),
            ),
            ExternalMessage::Assistant(tool_turn("a2", vec![bad_call])),
        ];

        let err = convert_external_to_internal(&messages, Some(&mut actions), Some(&mut states))
            .unwrap_err();
        assert!(matches!(err, ConversionError::InvalidToolCallType { .. }));
        assert!(actions.get("foo").unwrap().render.is_none());
        assert!(states.is_empty());
    }

    #[test]
    fn render_without_registry_is_ignored() {
        let turn = tool_turn("a1", vec![ToolCall::function("t1", "foo", "{}")])
            .with_generative_ui(render("foo-ui"));
        let converted =
            convert_external_to_internal(&ExternalMessage::Assistant(turn), None, None).unwrap();
        assert_eq!(converted.len(), 2);
    }

    #[test]
    fn render_only_turn_becomes_unknown_agent_state() {
        let message = ExternalMessage::Assistant(
            AssistantTurn::new("").with_generative_ui(render("ui")),
        )
        .with_id("a1");
        let mut states = AgentStateRegistry::new();
        let converted = convert_external_with_render(&message, None, Some(&mut states)).unwrap();

        let record = converted[0].as_agent_state().unwrap();
        assert_eq!(record.id, "a1");
        assert_eq!(record.agent_name, "unknown");
        assert_eq!(record.state, json!({}));
        assert!(states.get("unknown").unwrap().render.is_some());
    }

    #[test]
    fn render_helper_delegates_other_messages() {
        let converted =
            convert_external_with_render(&ExternalMessage::assistant("plain"), None, None)
                .unwrap();
        assert_eq!(converted[0].as_text().unwrap().content, "plain");
    }

    #[test]
    fn timestamps_carry_over_to_expanded_records() {
        let at = chrono::Utc::now();
        let turn = AssistantTurn {
            created_at: Some(at),
            ..tool_turn(
                "a1",
                vec![
                    ToolCall::function("t1", "x", "{}"),
                    ToolCall::function("t2", "y", "{}"),
                ],
            )
        };
        let converted =
            convert_external_to_internal(&ExternalMessage::Assistant(turn), None, None).unwrap();
        assert_eq!(converted.len(), 3);
        assert!(converted.iter().all(|m| m.created_at() == Some(at)));
    }

    #[test]
    fn input_is_not_mutated() {
        let message = ExternalMessage::Assistant(tool_turn(
            "a1",
            vec![ToolCall::function("t1", "search", r#"{"q":"x"}"#)],
        ));
        let before = serde_json::to_value(&message).unwrap();
        convert_external_to_internal(&message, None, None).unwrap();
        assert_eq!(serde_json::to_value(&message).unwrap(), before);
    }
}
