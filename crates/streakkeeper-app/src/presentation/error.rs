use serde::{Deserialize, Serialize};
use streakkeeper_domain::shared::{DomainError, ErrorCode, ErrorSeverity};

/// Structured error reported by a CLI command
///
/// Carries the numeric code and severity of the underlying domain error so
/// scripts consuming `--json` output can branch on them.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[error("[{code}] {message}")]
pub struct CommandError {
    /// Numeric error code (2xxx-6xxx range)
    pub code: u16,

    /// Human-readable error message
    pub message: String,

    pub severity: ErrorSeverity,

    /// Whether running the command again may succeed
    pub recoverable: bool,
}

impl CommandError {
    pub fn from_code(error_code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: error_code.code(),
            message: message.into(),
            severity: error_code.severity(),
            recoverable: error_code.is_recoverable(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        Self::from_code(ErrorCode::InfrastructureError, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::from_code(ErrorCode::ValidationError, message)
    }

    /// Process exit status: 2 for input problems, 1 for everything else
    pub fn exit_code(&self) -> i32 {
        match self.severity {
            ErrorSeverity::Info => 2,
            _ => 1,
        }
    }
}

impl From<DomainError> for CommandError {
    fn from(error: DomainError) -> Self {
        Self::from_code(error.code(), error.message())
    }
}

impl From<anyhow::Error> for CommandError {
    fn from(error: anyhow::Error) -> Self {
        Self::infrastructure(format!("{:#}", error))
    }
}
