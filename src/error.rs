//! Error types.
//!
//! - [`AppError`] is fatal: it carries a process exit code and ends the run.
//! - [`FetchError`] is recoverable: the dashboard logs it and keeps rendering
//!   with whatever state the other endpoint produced.

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Failure talking to one of the backend endpoints.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Network or transport failure (connect, timeout, body read).
    #[error("request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },

    /// The server answered with a non-2xx status.
    #[error("request to {endpoint} failed with status {status}")]
    Status { endpoint: String, status: u16 },

    /// The body did not have the expected shape.
    #[error("malformed response from {endpoint}: {message}")]
    Malformed { endpoint: String, message: String },
}

impl FetchError {
    pub fn endpoint(&self) -> &str {
        match self {
            FetchError::Transport { endpoint, .. }
            | FetchError::Status { endpoint, .. }
            | FetchError::Malformed { endpoint, .. } => endpoint,
        }
    }

    /// `true` for transport/status failures, `false` for shape problems.
    pub fn is_fetch_failure(&self) -> bool {
        !matches!(self, FetchError::Malformed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_kinds() {
        let status = FetchError::Status {
            endpoint: "/api/prices".to_string(),
            status: 503,
        };
        assert!(status.is_fetch_failure());
        assert_eq!(status.endpoint(), "/api/prices");
        assert_eq!(status.to_string(), "request to /api/prices failed with status 503");

        let malformed = FetchError::Malformed {
            endpoint: "/api/change-point".to_string(),
            message: "expected object".to_string(),
        };
        assert!(!malformed.is_fetch_failure());
    }
}
