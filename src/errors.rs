// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the scanning core

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Result type for camera capability operations
pub type AccessResult<T> = Result<T, AccessError>;

/// Result type for decoding engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera access / negotiation errors
    Access(AccessError),
    /// Decoding engine errors
    Engine(EngineError),
    /// Configuration errors
    Config(String),
    /// Generic error with message
    Other(String),
}

/// Camera capability errors
///
/// These are terminal: once negotiation fails the device list is not
/// retried automatically. An empty device list is NOT an error (see
/// [`crate::access::negotiate`]), so callers can tell "no devices found"
/// apart from "access denied".
#[derive(Debug, Clone)]
pub enum AccessError {
    /// Permission was refused or the camera is already held elsewhere
    Denied(String),
    /// No camera hardware is present
    NoDevice,
    /// A mandatory constraint (e.g. exact rear facing mode) cannot be met
    ConstraintUnsatisfiable(String),
    /// Underlying platform/backend failure
    Backend(String),
}

/// Decoding engine errors
#[derive(Debug, Clone)]
pub enum EngineError {
    /// Engine is already bound to a running session
    AlreadyRunning,
    /// Engine is not running
    NotRunning,
    /// Failed to start the engine
    StartFailed(String),
    /// Failed to stop the engine
    StopFailed(String),
    /// Frame source failure while scanning
    SourceFailed(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Access(e) => write!(f, "Camera access error: {}", e),
            AppError::Engine(e) => write!(f, "Engine error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessError::Denied(msg) => write!(f, "Access denied: {}", msg),
            AccessError::NoDevice => write!(f, "No camera devices found"),
            AccessError::ConstraintUnsatisfiable(msg) => {
                write!(f, "Constraint not satisfiable: {}", msg)
            }
            AccessError::Backend(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::AlreadyRunning => write!(f, "Engine already running"),
            EngineError::NotRunning => write!(f, "Engine not running"),
            EngineError::StartFailed(msg) => write!(f, "Failed to start engine: {}", msg),
            EngineError::StopFailed(msg) => write!(f, "Failed to stop engine: {}", msg),
            EngineError::SourceFailed(msg) => write!(f, "Frame source failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for AccessError {}
impl std::error::Error for EngineError {}

// Conversions from sub-errors to AppError
impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        AppError::Access(err)
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        AppError::Engine(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Other(err.to_string())
    }
}

impl From<std::io::Error> for AccessError {
    fn from(err: std::io::Error) -> Self {
        AccessError::Backend(err.to_string())
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::SourceFailed(err.to_string())
    }
}
