//! External (flat) message model: the role-tagged AGUI shape exchanged with
//! the agent runtime.
//!
//! One message per conversational turn. Tool invocations are embedded in the
//! assistant turn that requested them:
//!
//! ```json
//! { "id": "a1", "role": "assistant", "content": "run it",
//!   "toolCalls": [ { "id": "t1", "type": "function",
//!                    "function": { "name": "search", "arguments": "{\"q\":\"x\"}" } } ] }
//! ```

use crate::error::{ConversionError, ConversionResult};
use crate::render::RenderFn;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Tool call type accepted by the converters.
pub const FUNCTION_TOOL_CALL: &str = "function";

/// Every role an external message may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExternalRole {
    Developer,
    System,
    Assistant,
    User,
    Tool,
}

impl ExternalRole {
    pub const ALL: [ExternalRole; 5] = [
        Self::Developer,
        Self::System,
        Self::Assistant,
        Self::User,
        Self::Tool,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Developer => "developer",
            Self::System => "system",
            Self::Assistant => "assistant",
            Self::User => "user",
            Self::Tool => "tool",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == name)
    }
}

impl std::fmt::Display for ExternalRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Image payload; either half may be missing on malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImagePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<String>,
}

impl ImagePayload {
    pub fn new(format: impl Into<String>, bytes: impl Into<String>) -> Self {
        Self {
            format: Some(format.into()),
            bytes: Some(bytes.into()),
        }
    }

    /// Both `format` and `bytes` are present.
    pub fn is_complete(&self) -> bool {
        self.format.is_some() && self.bytes.is_some()
    }
}

/// The function half of a tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,

    /// Normally a JSON string; objects are tolerated on input
    #[serde(default)]
    pub arguments: Value,
}

/// A tool call embedded in an assistant turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,

    #[serde(rename = "type", default = "default_tool_call_type")]
    pub kind: String,

    pub function: FunctionCall,
}

fn default_tool_call_type() -> String {
    FUNCTION_TOOL_CALL.to_string()
}

impl ToolCall {
    /// A function tool call with JSON-string arguments.
    pub fn function(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: default_tool_call_type(),
            function: FunctionCall {
                name: name.into(),
                arguments: Value::String(arguments.into()),
            },
        }
    }
}

/// A developer, system, or user turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextTurn {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Only meaningful on user turns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImagePayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TextTurn {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: Some(content.into()),
            image: None,
            created_at: None,
        }
    }
}

/// An assistant turn: plain text, tool-invoking, agent state, or image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantTurn {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImagePayload>,
    /// Tool name on turns produced from a single action execution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Render callback; never serialized
    #[serde(skip)]
    pub generative_ui: Option<RenderFn>,
}

impl AssistantTurn {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: Some(content.into()),
            tool_calls: Vec::new(),
            agent_name: None,
            state: None,
            image: None,
            name: None,
            created_at: None,
            generative_ui: None,
        }
    }

    pub fn with_tool_call(mut self, tool_call: ToolCall) -> Self {
        self.tool_calls.push(tool_call);
        self
    }

    pub fn with_generative_ui(mut self, render: RenderFn) -> Self {
        self.generative_ui = Some(render);
        self
    }

    /// Carries both an agent name and a state snapshot.
    pub fn is_agent_state(&self) -> bool {
        self.agent_name.is_some() && self.state.is_some()
    }
}

/// A tool result turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolTurn {
    pub id: String,
    /// Usually a string; any JSON value is tolerated
    #[serde(default)]
    pub content: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A message in the external representation, tagged by `role` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ExternalMessage {
    Developer(TextTurn),
    System(TextTurn),
    User(TextTurn),
    Assistant(AssistantTurn),
    Tool(ToolTurn),
}

impl ExternalMessage {
    pub fn developer(content: impl Into<String>) -> Self {
        Self::Developer(TextTurn::new(content))
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::System(TextTurn::new(content))
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::User(TextTurn::new(content))
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant(AssistantTurn::new(content))
    }

    /// An assistant turn reporting an agent's state.
    pub fn agent_state(agent_name: impl Into<String>, state: Value) -> Self {
        Self::Assistant(AssistantTurn {
            content: None,
            agent_name: Some(agent_name.into()),
            state: Some(state),
            ..AssistantTurn::new("")
        })
    }

    /// A tool result turn answering `tool_call_id`.
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<Value>) -> Self {
        Self::Tool(ToolTurn {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            tool_call_id: Some(tool_call_id.into()),
            tool_name: None,
            created_at: None,
        })
    }

    /// Replace the generated id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        match &mut self {
            Self::Developer(t) | Self::System(t) | Self::User(t) => t.id = id,
            Self::Assistant(t) => t.id = id,
            Self::Tool(t) => t.id = id,
        }
        self
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Developer(t) | Self::System(t) | Self::User(t) => &t.id,
            Self::Assistant(t) => &t.id,
            Self::Tool(t) => &t.id,
        }
    }

    pub fn role(&self) -> ExternalRole {
        match self {
            Self::Developer(_) => ExternalRole::Developer,
            Self::System(_) => ExternalRole::System,
            Self::User(_) => ExternalRole::User,
            Self::Assistant(_) => ExternalRole::Assistant,
            Self::Tool(_) => ExternalRole::Tool,
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Developer(t) | Self::System(t) | Self::User(t) => t.created_at,
            Self::Assistant(t) => t.created_at,
            Self::Tool(t) => t.created_at,
        }
    }

    /// Text content of a text or assistant turn.
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Developer(t) | Self::System(t) | Self::User(t) => t.content.as_deref(),
            Self::Assistant(t) => t.content.as_deref(),
            Self::Tool(_) => None,
        }
    }

    /// Image payload, if the turn may legally carry one.
    pub fn image(&self) -> Option<&ImagePayload> {
        match self {
            Self::User(t) => t.image.as_ref(),
            Self::Assistant(t) => t.image.as_ref(),
            _ => None,
        }
    }

    pub fn generative_ui(&self) -> Option<&RenderFn> {
        match self {
            Self::Assistant(t) => t.generative_ui.as_ref(),
            _ => None,
        }
    }

    pub fn as_assistant(&self) -> Option<&AssistantTurn> {
        match self {
            Self::Assistant(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_tool(&self) -> Option<&ToolTurn> {
        match self {
            Self::Tool(t) => Some(t),
            _ => None,
        }
    }

    /// Decode a raw JSON object, checking the role before the shape so that an
    /// unrecognized role is reported together with the message id.
    pub fn from_value(value: Value) -> ConversionResult<Self> {
        let id = value
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let role = match value.get("role") {
            Some(Value::String(role)) => role.clone(),
            Some(other) => other.to_string(),
            None => "undefined".to_string(),
        };
        if ExternalRole::from_name(&role).is_none() {
            return Err(ConversionError::UnknownMessageRole { role, id });
        }

        serde_json::from_value(value).map_err(|e| ConversionError::MalformedMessage {
            id,
            reason: e.to_string(),
        })
    }
}

impl TryFrom<Value> for ExternalMessage {
    type Error = ConversionError;

    fn try_from(value: Value) -> ConversionResult<Self> {
        Self::from_value(value)
    }
}

// A single message can be passed wherever a batch is expected.
impl AsRef<[ExternalMessage]> for ExternalMessage {
    fn as_ref(&self) -> &[ExternalMessage] {
        std::slice::from_ref(self)
    }
}
