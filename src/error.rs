//! Error handling module for kickstart
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Presentation-layer failures are never retried; they surface to the caller.

use thiserror::Error;

/// Main error type for kickstart
#[derive(Error, Debug)]
pub enum KickstartError {
    /// IO errors (terminal writes, file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal errors (window size queries)
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// State errors (mutex poisoning, invalid lifecycle)
    #[error("State error: {0}")]
    State(String),

    /// A step command exited unsuccessfully
    #[error("Command failed: {0}")]
    Command(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for kickstart operations
pub type Result<T> = std::result::Result<T, KickstartError>;

impl KickstartError {
    /// Create a terminal error
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }

    /// Create a state error
    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    /// Create a command error
    pub fn command(msg: impl Into<String>) -> Self {
        Self::Command(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KickstartError::terminal("cannot query window size");
        assert_eq!(err.to_string(), "Terminal error: cannot query window size");

        let err = KickstartError::command("`false` exited with status 1");
        assert_eq!(err.to_string(), "Command failed: `false` exited with status 1");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: KickstartError = io_err.into();
        assert!(matches!(err, KickstartError::Io(_)));
    }

    #[test]
    fn test_error_constructors() {
        let err = KickstartError::terminal("no size");
        assert!(matches!(err, KickstartError::Terminal(_)));

        let err = KickstartError::state("display mutex poisoned");
        assert!(matches!(err, KickstartError::State(_)));
    }
}
