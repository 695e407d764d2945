// Error types for stintview

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
pub enum StintviewError {
    // Errors from the session data provider
    #[snafu(display("Session not found: {year} {event} ({session})"))]
    SessionNotFound {
        year: u16,
        event: String,
        session: String,
    },
    #[snafu(display("Error loading session file {path}"))]
    SessionLoaderError { path: String, source: io::Error },

    // Errors for the session writer
    #[snafu(display("Error writing session file"))]
    WriterError { source: io::Error },
    #[snafu(display("Error serializing session record"))]
    RecordSerializeError { source: serde_json::Error },

    // Config management errors
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error reading or writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },

    // User input validation errors
    #[snafu(display("Invalid user input: {field} - {reason}"))]
    InvalidUserInput { field: String, reason: String },
}

impl StintviewError {
    pub(crate) fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        StintviewError::InvalidUserInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Message shown to the user when an extraction fails.
    pub fn user_message(&self) -> String {
        match self {
            StintviewError::SessionNotFound { .. } => format!("⚠ {}", self),
            StintviewError::SessionLoaderError { path, source } => {
                format!("⚠ Could not read cached session {}: {}", path, source)
            }
            StintviewError::InvalidUserInput { field, reason } => {
                format!("⚠ Invalid {}: {}", field, reason)
            }
            _ => format!("Error: {}", self),
        }
    }
}
