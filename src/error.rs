//! Error types for integridai-mcp.
//!
//! Configuration errors surface at startup. Compliance and tool errors are
//! recovered at the dispatch boundary and never terminate the server.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

/// Result type for the scoring and evaluation algorithms.
pub type ComplianceResult<T> = Result<T, ComplianceError>;

/// Errors raised by the scorer and the checklist evaluator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComplianceError {
    /// An input argument failed validation.
    #[error("invalid argument '{name}': {message}")]
    InvalidArgument {
        /// Argument name.
        name: &'static str,
        /// Description of what's wrong.
        message: String,
    },
}

impl ComplianceError {
    pub(crate) fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            message: message.into(),
        }
    }
}

/// Errors raised while executing a named tool.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// No tool with this name exists.
    #[error("Tool not found: {name}")]
    NotFound {
        /// The requested tool name.
        name: String,
    },

    /// Tool arguments are missing or mistyped.
    #[error("{message}")]
    InvalidParams {
        /// Description of what's wrong.
        message: String,
    },

    /// The tool failed while running.
    #[error("{message}")]
    Internal {
        /// Description of the failure.
        message: String,
    },
}

impl ToolError {
    pub(crate) fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams {
            message: message.into(),
        }
    }
}

impl From<ComplianceError> for ToolError {
    fn from(err: ComplianceError) -> Self {
        Self::InvalidParams {
            message: err.to_string(),
        }
    }
}
