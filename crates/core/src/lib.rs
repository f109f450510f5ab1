//! # msgbridge Core
//!
//! Domain types for the msgbridge conversion engine: the two message
//! representations, the render side channel, and the error taxonomy.
//! This crate has **no conversion logic**; it defines the model that the
//! converters in `msgbridge-convert` operate on.
//!
//! ## Representations
//!
//! - [`external`]: flat, role-tagged turns (the AGUI wire shape) where tool
//!   calls are embedded in the assistant turn that issued them.
//! - [`internal`]: normalized single-purpose records (text, action execution,
//!   result, agent state, image) correlated by id.
//!
//! Render callbacks live outside both, in caller-owned [`render`] registries.

pub mod codec;
pub mod error;
pub mod external;
pub mod internal;
pub mod render;

// Re-export key types at crate root for ergonomics
pub use codec::{decode_external, decode_internal};
pub use error::{ConversionError, ConversionResult, Error, Result};
pub use external::{
    AssistantTurn, ExternalMessage, ExternalRole, FunctionCall, ImagePayload, TextTurn, ToolCall,
    ToolTurn,
};
pub use internal::{
    ActionExecutionMessage, AgentStateMessage, ImageFormat, ImageMessage, InternalMessage,
    MessageKind, MessageStatus, MessageStatusCode, ResultMessage, Role, TextMessage,
};
pub use render::{
    ActionDescriptor, ActionRegistry, AgentStateDescriptor, AgentStateRegistry, Descriptor,
    MatchKind, Registry, RenderFn, RenderProps, RespondFn, ToolCallStatus, UiElement, WILDCARD,
};
