//! Error types module
//!
//! All failures surfaced by the upload console are unified under [`AppError`].
//! Local validation rejections are *not* errors: they are recorded as
//! [`crate::UploadStatus::Error`] on the candidate and never leave the client.
//! `AppError` covers everything else: file reads, configuration, transport,
//! server rejections and protocol violations.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like bad user input
    Debug,
    /// Warning level - for recoverable issues like a rejected batch
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be presented to the user
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "TRANSPORT_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether retrying the same operation may succeed
    fn is_recoverable(&self) -> bool;

    /// Message suitable for the console's message banner
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read file '{filename}': {source}")]
    FileRead {
        filename: String,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[source] io::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Server rejected the request (status {status}): {message}")]
    ServerRejected { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("An upload is already in progress")]
    SubmitInProgress,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Io(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidResponse(format!("JSON parsing error: {}", err))
    }
}

/// Static metadata for each variant: (error_code, recoverable, log_level).
fn app_error_static_metadata(err: &AppError) -> (&'static str, bool, LogLevel) {
    match err {
        AppError::InvalidInput(_) => ("INVALID_INPUT", false, LogLevel::Debug),
        AppError::Config(_) => ("CONFIG_ERROR", false, LogLevel::Error),
        AppError::FileRead { .. } => ("FILE_READ_ERROR", false, LogLevel::Warn),
        AppError::Io(_) => ("IO_ERROR", true, LogLevel::Error),
        AppError::Transport(_) => ("TRANSPORT_ERROR", true, LogLevel::Warn),
        AppError::ServerRejected { .. } => ("SERVER_REJECTED", false, LogLevel::Warn),
        AppError::InvalidResponse(_) => ("INVALID_RESPONSE", false, LogLevel::Error),
        AppError::SubmitInProgress => ("SUBMIT_IN_PROGRESS", true, LogLevel::Debug),
        AppError::NotFound(_) => ("NOT_FOUND", false, LogLevel::Debug),
        AppError::Internal(_) => ("INTERNAL_ERROR", false, LogLevel::Error),
    }
}

impl ErrorMetadata for AppError {
    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            AppError::ServerRejected { message, .. } => message.clone(),
            AppError::Transport(_) => "Could not reach the document service".to_string(),
            AppError::InvalidResponse(_) => "Unexpected response from the document service".to_string(),
            AppError::Internal(_) => "Internal error".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_rejection_surfaces_extracted_message() {
        let err = AppError::ServerRejected {
            status: 413,
            message: "Request Entity Too Large".to_string(),
        };
        assert_eq!(err.client_message(), "Request Entity Too Large");
        assert_eq!(err.error_code(), "SERVER_REJECTED");
        assert!(!err.is_recoverable());
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn transport_errors_are_recoverable() {
        let err = AppError::Transport("connection refused".to_string());
        assert!(err.is_recoverable());
        assert_eq!(err.client_message(), "Could not reach the document service");
    }

    #[test]
    fn file_read_error_keeps_source() {
        use std::error::Error;

        let err = AppError::FileRead {
            filename: "report.pdf".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("report.pdf"));
        assert!(err.source().is_some());
    }

    #[test]
    fn json_errors_map_to_invalid_response() {
        let err: AppError = serde_json::from_str::<Vec<u8>>("{").unwrap_err().into();
        assert_eq!(err.error_code(), "INVALID_RESPONSE");
    }
}
