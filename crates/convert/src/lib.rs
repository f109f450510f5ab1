//! # msgbridge Convert
//!
//! Bidirectional conversion between the flat external message shape and the
//! linked internal one.
//!
//! - [`forward`]: external → internal, binding render callbacks into
//!   caller-owned registries.
//! - [`reverse`]: internal → external, attaching status-aware render
//!   wrappers.
//! - [`status`]: tool-call lifecycle derivation.
//! - [`parse`]: argument and result payload handling that never fails.
//!
//! Conversion is synchronous and keeps no state between calls.

pub mod forward;
pub mod parse;
pub mod reverse;
pub mod status;

/// Name used when an agent or tool name cannot be determined.
pub const UNKNOWN_NAME: &str = "unknown";

pub use forward::{
    action_execution_from_tool_call, convert_external_to_internal, convert_external_with_render,
    image_message_from_external, result_message_from_external, text_message_from_external,
};
pub use parse::{OPAQUE_OBJECT, parse_arguments, parse_result_for_render, stringify_result};
pub use reverse::{
    action_execution_to_external, agent_state_to_external, convert_internal_to_external,
    image_message_to_external, result_message_to_external, text_message_to_external,
};
pub use status::{ResultIndex, resolve_status};
