//! Error handling for the Allot engine
//!
//! Missing data and degenerate inputs are not errors: the engine answers them with
//! neutral scores and zero allocations. What remains is invalid settings or catalog
//! input, failures of the external data collaborators, configuration problems and
//! internal faults.

use std::fmt;
use thiserror::Error;

/// Error type for allocation runs
#[derive(Error, Debug, Clone)]
pub enum AllotError {
    /// Caller input the engine refuses to interpret
    #[error("Validation error: {message}")]
    Validation { message: String, field: Option<String> },

    /// An external data source failed; the run is aborted without a partial result
    #[error("Collaborator error: {source_name}: {message}")]
    Collaborator { source_name: String, message: String },

    /// Configuration and initialization errors
    #[error("Configuration error: {message}")]
    Configuration { message: String, setting: Option<String> },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String, component: Option<String> },
}

impl AllotError {
    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AllotError::Validation { .. } => "validation",
            AllotError::Collaborator { .. } => "collaborator",
            AllotError::Configuration { .. } => "configuration",
            AllotError::Internal { .. } => "internal",
        }
    }

    /// Get the error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AllotError::Validation { .. } => ErrorSeverity::Low,
            AllotError::Collaborator { .. } => ErrorSeverity::Medium,
            AllotError::Configuration { .. } => ErrorSeverity::High,
            AllotError::Internal { .. } => ErrorSeverity::Critical,
        }
    }

    /// Check whether retrying the same run could succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            AllotError::Validation { .. } => false, // Input must change
            AllotError::Collaborator { .. } => true, // Source may come back
            AllotError::Configuration { .. } => false,
            AllotError::Internal { .. } => false,
        }
    }
}

/// Error severity levels for logging and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Low => write!(f, "LOW"),
            ErrorSeverity::Medium => write!(f, "MEDIUM"),
            ErrorSeverity::High => write!(f, "HIGH"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Result type alias for engine operations
pub type AllotResult<T> = Result<T, AllotError>;

/// Convenience constructors for common error scenarios
impl AllotError {
    /// Create a validation error for a named input field
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation { message: message.into(), field: Some(field.to_string()) }
    }

    /// Wrap a collaborator failure, keeping the whole cause chain in the message
    pub fn collaborator(source_name: &str, error: &anyhow::Error) -> Self {
        Self::Collaborator { source_name: source_name.to_string(), message: format!("{error:#}") }
    }

    /// Create a configuration error for a named setting
    pub fn configuration(setting: &str, message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into(), setting: Some(setting.to_string()) }
    }

    /// Create an internal error attributed to a component
    pub fn internal(component: &str, message: impl Into<String>) -> Self {
        Self::Internal { message: message.into(), component: Some(component.to_string()) }
    }
}
