//! Internal (linked) message model.
//!
//! Every record is single-purpose: a text turn, one tool invocation, one tool
//! result, an agent-state snapshot, or an image. Tool invocations and results
//! are correlated by id instead of being nested inside a turn.
//!
//! On the wire each record carries an explicit `kind` discriminant:
//!
//! ```json
//! { "kind": "actionExecution", "id": "t1", "name": "search",
//!   "arguments": { "q": "x" }, "parentMessageId": "a1" }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// The role of a text, agent-state, or image record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Developer instructions
    Developer,
    /// System instructions
    System,
    /// The AI assistant
    Assistant,
    /// The end user
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Developer => "developer",
            Self::System => "system",
            Self::Assistant => "assistant",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle code reported by the runtime for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageStatusCode {
    Pending,
    Success,
    Failed,
}

/// Runtime status attached to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageStatus {
    pub code: MessageStatusCode,

    /// Failure reason, only meaningful for `Failed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl MessageStatus {
    pub fn pending() -> Self {
        Self {
            code: MessageStatusCode::Pending,
            reason: None,
        }
    }

    pub fn success() -> Self {
        Self {
            code: MessageStatusCode::Success,
            reason: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            code: MessageStatusCode::Failed,
            reason: Some(reason.into()),
        }
    }
}

/// Image encodings accepted by the reverse converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
    Gif,
}

impl ImageFormat {
    /// The fixed allow-list, in display order.
    pub const ALL: [ImageFormat; 4] = [Self::Jpeg, Self::Png, Self::Webp, Self::Gif];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Gif => "gif",
        }
    }

    /// Look up a format by its exact wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A plain text turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMessage {
    pub id: String,
    pub role: Role,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MessageStatus>,
}

impl TextMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            created_at: None,
            status: None,
        }
    }
}

/// One tool invocation, correlated to its parent turn by `parent_message_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionExecutionMessage {
    /// Equals the originating tool call id
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MessageStatus>,
}

impl ActionExecutionMessage {
    pub fn new(name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            arguments,
            parent_message_id: None,
            created_at: None,
            status: None,
        }
    }

    pub fn with_parent(mut self, parent_message_id: impl Into<String>) -> Self {
        self.parent_message_id = Some(parent_message_id.into());
        self
    }
}

/// The result of one tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMessage {
    pub id: String,
    #[serde(default)]
    pub result: String,
    pub action_execution_id: String,
    pub action_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MessageStatus>,
}

impl ResultMessage {
    pub fn new(
        action_execution_id: impl Into<String>,
        action_name: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            result: result.into(),
            action_execution_id: action_execution_id.into(),
            action_name: action_name.into(),
            created_at: None,
            status: None,
        }
    }
}

/// A snapshot of a named agent's shared state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentStateMessage {
    pub id: String,
    pub agent_name: String,
    #[serde(default = "empty_object")]
    pub state: Value,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MessageStatus>,
}

impl AgentStateMessage {
    pub fn new(agent_name: impl Into<String>, state: Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            agent_name: agent_name.into(),
            state,
            role: Role::Assistant,
            created_at: None,
            status: None,
        }
    }
}

/// An image turn. `format` stays a string so unknown encodings arriving over
/// the wire can be rejected with a precise error during conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMessage {
    pub id: String,
    pub format: String,
    pub bytes: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MessageStatus>,
}

impl ImageMessage {
    pub fn new(role: Role, format: impl Into<String>, bytes: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            format: format.into(),
            bytes: bytes.into(),
            role,
            created_at: None,
            status: None,
        }
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

macro_rules! common_builders {
    ($($ty:ty),+ $(,)?) => {$(
        impl $ty {
            /// Replace the generated id.
            pub fn with_id(mut self, id: impl Into<String>) -> Self {
                self.id = id.into();
                self
            }

            pub fn with_status(mut self, status: MessageStatus) -> Self {
                self.status = Some(status);
                self
            }

            pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
                self.created_at = Some(created_at);
                self
            }
        }
    )+};
}

common_builders!(
    TextMessage,
    ActionExecutionMessage,
    ResultMessage,
    AgentStateMessage,
    ImageMessage,
);

/// The discriminant of an [`InternalMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageKind {
    Text,
    ActionExecution,
    Result,
    AgentState,
    Image,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::ActionExecution => "actionExecution",
            Self::Result => "result",
            Self::AgentState => "agentState",
            Self::Image => "image",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record in the internal representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InternalMessage {
    Text(TextMessage),
    ActionExecution(ActionExecutionMessage),
    Result(ResultMessage),
    AgentState(AgentStateMessage),
    Image(ImageMessage),
}

impl InternalMessage {
    pub fn id(&self) -> &str {
        match self {
            Self::Text(m) => &m.id,
            Self::ActionExecution(m) => &m.id,
            Self::Result(m) => &m.id,
            Self::AgentState(m) => &m.id,
            Self::Image(m) => &m.id,
        }
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Text(_) => MessageKind::Text,
            Self::ActionExecution(_) => MessageKind::ActionExecution,
            Self::Result(_) => MessageKind::Result,
            Self::AgentState(_) => MessageKind::AgentState,
            Self::Image(_) => MessageKind::Image,
        }
    }

    pub fn status(&self) -> Option<&MessageStatus> {
        match self {
            Self::Text(m) => m.status.as_ref(),
            Self::ActionExecution(m) => m.status.as_ref(),
            Self::Result(m) => m.status.as_ref(),
            Self::AgentState(m) => m.status.as_ref(),
            Self::Image(m) => m.status.as_ref(),
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Text(m) => m.created_at,
            Self::ActionExecution(m) => m.created_at,
            Self::Result(m) => m.created_at,
            Self::AgentState(m) => m.created_at,
            Self::Image(m) => m.created_at,
        }
    }

    pub fn as_text(&self) -> Option<&TextMessage> {
        match self {
            Self::Text(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_action_execution(&self) -> Option<&ActionExecutionMessage> {
        match self {
            Self::ActionExecution(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_result(&self) -> Option<&ResultMessage> {
        match self {
            Self::Result(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_agent_state(&self) -> Option<&AgentStateMessage> {
        match self {
            Self::AgentState(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageMessage> {
        match self {
            Self::Image(m) => Some(m),
            _ => None,
        }
    }
}

// A single record can be passed wherever a batch is expected.
impl AsRef<[InternalMessage]> for InternalMessage {
    fn as_ref(&self) -> &[InternalMessage] {
        std::slice::from_ref(self)
    }
}

impl From<TextMessage> for InternalMessage {
    fn from(m: TextMessage) -> Self {
        Self::Text(m)
    }
}

impl From<ActionExecutionMessage> for InternalMessage {
    fn from(m: ActionExecutionMessage) -> Self {
        Self::ActionExecution(m)
    }
}

impl From<ResultMessage> for InternalMessage {
    fn from(m: ResultMessage) -> Self {
        Self::Result(m)
    }
}

impl From<AgentStateMessage> for InternalMessage {
    fn from(m: AgentStateMessage) -> Self {
        Self::AgentState(m)
    }
}

impl From<ImageMessage> for InternalMessage {
    fn from(m: ImageMessage) -> Self {
        Self::Image(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn generated_ids_are_unique() {
        let a = TextMessage::new(Role::User, "hi");
        let b = TextMessage::new(Role::User, "hi");
        assert_ne!(a.id, b.id);
        assert_eq!(a.with_id("fixed").id, "fixed");
    }

    #[test]
    fn serializes_with_kind_discriminant() {
        let msg: InternalMessage = ActionExecutionMessage::new(
            "search",
            json!({"q": "x"}).as_object().cloned().unwrap(),
        )
        .with_id("t1")
        .with_parent("a1")
        .into();

        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["kind"], "actionExecution");
        assert_eq!(value["parentMessageId"], "a1");
        assert_eq!(value["arguments"]["q"], "x");
        assert!(value.get("status").is_none());
    }

    #[test]
    fn deserializes_result_record() {
        let msg: InternalMessage = serde_json::from_value(json!({
            "kind": "result",
            "id": "r1",
            "result": "found 3",
            "actionExecutionId": "t1",
            "actionName": "search",
            "status": { "code": "Success" }
        }))
        .unwrap();

        assert_eq!(msg.kind(), MessageKind::Result);
        assert_eq!(msg.id(), "r1");
        assert_eq!(msg.status().map(|s| s.code), Some(MessageStatusCode::Success));
        assert_eq!(msg.as_result().unwrap().action_name, "search");
    }

    #[test]
    fn agent_state_defaults_to_empty_object() {
        let msg: InternalMessage = serde_json::from_value(json!({
            "kind": "agentState",
            "id": "s1",
            "agentName": "planner",
            "role": "assistant"
        }))
        .unwrap();
        assert_eq!(msg.as_agent_state().unwrap().state, json!({}));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let result: Result<InternalMessage, _> =
            serde_json::from_value(json!({"kind": "video", "id": "v1"}));
        assert!(result.is_err());
    }

    #[test]
    fn image_format_allow_list() {
        assert_eq!(ImageFormat::from_name("png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_name("PNG"), None);
        assert_eq!(ImageFormat::from_name("bmp"), None);
        let names: Vec<_> = ImageFormat::ALL.iter().map(|f| f.as_str()).collect();
        assert_eq!(names, ["jpeg", "png", "webp", "gif"]);
    }

    #[test]
    fn single_message_is_a_batch_of_one() {
        let msg: InternalMessage = TextMessage::new(Role::System, "rules").into();
        let batch: &[InternalMessage] = msg.as_ref();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id(), msg.id());
    }
}
