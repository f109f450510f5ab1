//! Error types for the msgbridge domain.
//!
//! Uses `thiserror` for ergonomic error definitions. Conversion failures are
//! fatal to the call that raised them; recoverable payload problems never
//! surface here (they degrade to defaults inside the converters).

use thiserror::Error;

/// The top-level error type for msgbridge operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Conversion errors ---
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for a single conversion call.
pub type ConversionResult<T> = std::result::Result<T, ConversionError>;

/// A fatal condition that aborts a conversion call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("Unknown message role: \"{role}\" in message with id: {id}")]
    UnknownMessageRole { role: String, id: String },

    #[error("Unsupported tool call type: {kind} (tool call {id})")]
    InvalidToolCallType { kind: String, id: String },

    #[error("Cannot convert message with role {role} to {target}")]
    UnsupportedRoleConversion { role: String, target: &'static str },

    #[error("Tool message must have a toolCallId (message {id})")]
    MissingToolCallId { id: String },

    #[error("Invalid image format: {format}. Supported formats are: jpeg, png, webp, gif (message {id})")]
    InvalidImageFormat { format: String, id: String },

    #[error("Image bytes must be a non-empty string (message {id})")]
    EmptyImageBytes { id: String },

    #[error("Cannot convert message {id} to ImageMessage: missing format or bytes")]
    MalformedImage { id: String },

    #[error("Malformed message {id}: {reason}")]
    MalformedMessage { id: String, reason: String },
}

impl ConversionError {
    /// The id of the message that caused the failure.
    pub fn message_id(&self) -> Option<&str> {
        match self {
            Self::UnknownMessageRole { id, .. }
            | Self::InvalidToolCallType { id, .. }
            | Self::MissingToolCallId { id }
            | Self::InvalidImageFormat { id, .. }
            | Self::EmptyImageBytes { id }
            | Self::MalformedImage { id }
            | Self::MalformedMessage { id, .. } => Some(id),
            Self::UnsupportedRoleConversion { .. } => None,
        }
    }
}
