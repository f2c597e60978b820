//! Application error types with rich context

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML encoding error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ─────────────────────────────────────────────────────────────
    // Terminal/TUI Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Terminal error: {message}")]
    Terminal { message: String },

    // ─────────────────────────────────────────────────────────────
    // Backend/Transport Errors
    // ─────────────────────────────────────────────────────────────
    /// The request never produced a response (connection refused, timeout, ...)
    #[error("Network error: {message}")]
    Http { message: String },

    /// The backend answered with a non-success status.
    ///
    /// `detail` carries the backend's `{"detail": ...}` message when present,
    /// otherwise the status reason.
    #[error("{detail}")]
    Backend { status: u16, detail: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Log stream error: {message}")]
    Stream { message: String },

    // ─────────────────────────────────────────────────────────────
    // Domain Errors
    // ─────────────────────────────────────────────────────────────
    /// Local input rejected before any request was sent
    #[error("{message}")]
    Validation { message: String },

    /// An asynchronous backend task reached the `failed` state
    #[error("{result}")]
    TaskFailed { result: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn terminal(message: impl Into<String>) -> Self {
        Self::Terminal {
            message: message.into(),
        }
    }

    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
        }
    }

    pub fn backend(status: u16, detail: impl Into<String>) -> Self {
        Self::Backend {
            status,
            detail: detail.into(),
        }
    }

    pub fn stream(message: impl Into<String>) -> Self {
        Self::Stream {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn task_failed(result: impl Into<String>) -> Self {
        Self::TaskFailed {
            result: result.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// HTTP status reported by the backend, if this is a backend failure
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if this is a recoverable error
    ///
    /// Every failure a user action can trigger is recoverable: the view stays
    /// interactive and the action may be retried.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Http { .. }
                | Error::Backend { .. }
                | Error::Stream { .. }
                | Error::Validation { .. }
                | Error::TaskFailed { .. }
                | Error::Json(_)
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions (for use with color-eyre)
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_displays_detail_only() {
        let err = Error::backend(404, "Code not found");
        assert_eq!(err.to_string(), "Code not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_task_failed_displays_result() {
        let err = Error::task_failed("Error creating cluster: boom");
        assert_eq!(err.to_string(), "Error creating cluster: boom");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_setup_errors_are_not_recoverable() {
        assert!(!Error::InvalidUrl("::".into()).is_recoverable());
        assert!(!Error::config("bad file").is_recoverable());
        assert!(!Error::terminal("no tty").is_recoverable());
    }

    #[test]
    fn test_user_action_errors_are_recoverable() {
        assert!(Error::http("connection refused").is_recoverable());
        assert!(Error::backend(500, "boom").is_recoverable());
        assert!(Error::stream("reset").is_recoverable());
        assert!(Error::validation("bad json").is_recoverable());
        assert!(Error::task_failed("nope").is_recoverable());
    }

    #[test]
    fn test_context_keeps_the_error() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = result.context("Writing logs").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_status_only_for_backend_errors() {
        assert_eq!(Error::http("x").status(), None);
        assert_eq!(Error::validation("x").status(), None);
    }
}
