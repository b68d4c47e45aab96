//! Error types for calidrone.
//!
//! This module defines all error types used throughout the calidrone crate.
//! Every fallible operation in the planner and recorder reports one of these
//! variants, and every variant maps onto a copyable [`ErrorKind`] so state
//! machines can remember the last failure without holding the error itself.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for calidrone operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Editing Errors ===
    /// A user-correctable request was rejected (empty save, edit without selection).
    #[error("validation failed: {message}")]
    Validation {
        /// Description of what the user needs to fix.
        message: String,
    },

    /// A catalog invariant was violated (duplicate id).
    #[error("integrity violation: {message}")]
    Integrity {
        /// Description of the violated invariant.
        message: String,
    },

    /// An operation was requested in a state that does not allow it.
    #[error("invalid state: {message}")]
    InvalidState {
        /// Description of the rejected transition.
        message: String,
    },

    // === Camera Errors ===
    /// The camera device could not be acquired.
    #[error("camera unavailable: {message}")]
    CameraUnavailable {
        /// Description of what went wrong.
        message: String,
    },

    /// The in-flight capture could not be finalized into an artifact.
    #[error("failed to finalize recording: {message}")]
    Finalize {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// Failed to write an exported file.
    #[error("failed to write {path}: {source}")]
    FileWrite {
        /// Path that couldn't be written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for calidrone operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`Error::Validation`].
    Validation,
    /// See [`Error::Integrity`].
    Integrity,
    /// See [`Error::InvalidState`].
    InvalidState,
    /// See [`Error::CameraUnavailable`].
    CameraUnavailable,
    /// See [`Error::Finalize`].
    Finalize,
    /// Configuration loading or validation.
    Config,
    /// File system and serialization failures.
    Io,
    /// See [`Error::Internal`].
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Integrity => write!(f, "integrity"),
            Self::InvalidState => write!(f, "invalid_state"),
            Self::CameraUnavailable => write!(f, "camera_unavailable"),
            Self::Finalize => write!(f, "finalize"),
            Self::Config => write!(f, "config"),
            Self::Io => write!(f, "io"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

impl Error {
    /// Create a new validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new integrity error.
    #[must_use]
    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity {
            message: message.into(),
        }
    }

    /// Create a new invalid state error.
    #[must_use]
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Create a new camera unavailable error.
    #[must_use]
    pub fn camera_unavailable(message: impl Into<String>) -> Self {
        Self::CameraUnavailable {
            message: message.into(),
        }
    }

    /// Create a new finalization error.
    #[must_use]
    pub fn finalize(message: impl Into<String>) -> Self {
        Self::Finalize {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Integrity { .. } => ErrorKind::Integrity,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
            Self::CameraUnavailable { .. } => ErrorKind::CameraUnavailable,
            Self::Finalize { .. } => ErrorKind::Finalize,
            Self::ConfigLoad(_) | Self::ConfigValidation { .. } => ErrorKind::Config,
            Self::FileWrite { .. } | Self::Json(_) => ErrorKind::Io,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Check if this error is user-correctable.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this error reports a rejected state transition.
    #[must_use]
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }

    /// Check if this error means the camera could not be used.
    #[must_use]
    pub fn is_camera_unavailable(&self) -> bool {
        matches!(self, Self::CameraUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::validation("at least one waypoint required");
        assert_eq!(
            err.to_string(),
            "validation failed: at least one waypoint required"
        );

        let err = Error::internal("test error");
        assert_eq!(err.to_string(), "internal error: test error");
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(Error::validation("x").kind(), ErrorKind::Validation);
        assert_eq!(Error::integrity("x").kind(), ErrorKind::Integrity);
        assert_eq!(Error::invalid_state("x").kind(), ErrorKind::InvalidState);
        assert_eq!(
            Error::camera_unavailable("x").kind(),
            ErrorKind::CameraUnavailable
        );
        assert_eq!(Error::finalize("x").kind(), ErrorKind::Finalize);
        assert_eq!(Error::internal("x").kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_error_predicates() {
        assert!(Error::validation("x").is_validation());
        assert!(!Error::integrity("x").is_validation());
        assert!(Error::invalid_state("x").is_invalid_state());
        assert!(Error::camera_unavailable("x").is_camera_unavailable());
        assert!(!Error::finalize("x").is_camera_unavailable());
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::CameraUnavailable.to_string(), "camera_unavailable");
        assert_eq!(ErrorKind::InvalidState.to_string(), "invalid_state");
    }

    #[test]
    fn test_camera_unavailable_display() {
        let err = Error::camera_unavailable("no video device");
        let msg = err.to_string();
        assert!(msg.contains("camera unavailable"));
        assert!(msg.contains("no video device"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "snap_size must be positive".to_string(),
        };
        assert!(err.to_string().contains("snap_size"));
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_file_write_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::FileWrite {
            path: PathBuf::from("/root/forbidden/clip.mp4"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("/root/forbidden/clip.mp4"));
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
