//! Tool-call lifecycle status, derived from correlation state.
//!
//! Status is never stored: it follows from whether a result record shares the
//! action execution's id, and otherwise from the runtime status code.

use msgbridge_core::{ActionExecutionMessage, InternalMessage, MessageStatusCode, ToolCallStatus};
use std::collections::HashMap;

/// Derive the lifecycle status of a tool call.
///
/// A correlated result means `Complete`. Without one, a `Pending` or absent
/// status code means `InProgress`; any other code means `Executing`.
pub fn resolve_status(
    has_correlated_result: bool,
    status_code: Option<MessageStatusCode>,
) -> ToolCallStatus {
    if has_correlated_result {
        return ToolCallStatus::Complete;
    }
    match status_code {
        None | Some(MessageStatusCode::Pending) => ToolCallStatus::InProgress,
        Some(_) => ToolCallStatus::Executing,
    }
}

/// Map from action execution id to its result string.
#[derive(Debug, Clone, Default)]
pub struct ResultIndex {
    results: HashMap<String, String>,
}

impl ResultIndex {
    /// Index every result record in `messages`, wherever it appears.
    ///
    /// When several results answer the same execution, the last one wins.
    pub fn build(messages: &[InternalMessage]) -> Self {
        let results = messages
            .iter()
            .filter_map(InternalMessage::as_result)
            .map(|r| (r.action_execution_id.clone(), r.result.clone()))
            .collect();
        Self { results }
    }

    pub fn get(&self, action_execution_id: &str) -> Option<&str> {
        self.results.get(action_execution_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Lifecycle status of `action` against this index.
    pub fn status_of(&self, action: &ActionExecutionMessage) -> ToolCallStatus {
        resolve_status(
            self.results.contains_key(&action.id),
            action.status.as_ref().map(|s| s.code),
        )
    }
}
