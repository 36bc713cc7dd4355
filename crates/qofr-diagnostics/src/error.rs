//! QOFR error types

use crate::{ErrorCode, SourceLocation};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Error - construction or evaluation cannot proceed
    Error,
    /// Warning - potential issue but can continue
    Warning,
    /// Information - informational message
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A diagnostic message with location and context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level
    pub severity: Severity,
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Source location within the predicate text
    pub location: Option<SourceLocation>,
    /// Additional context or help
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            location: None,
            help: None,
        }
    }

    /// Create a new warning diagnostic
    pub fn warning(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            location: None,
            help: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Set help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.severity, self.code, self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " at {}", loc)?;
        }
        Ok(())
    }
}

/// Main QOFR error type
#[derive(Debug, Clone, Error)]
pub enum QofError {
    /// Predicate parse error
    #[error("{code}: {message}")]
    Parse {
        code: ErrorCode,
        message: String,
        predicate: String,
        location: Option<SourceLocation>,
    },

    /// Definition error (reference resolution, chain construction).
    /// Fatal: surfaced before any patient is evaluated.
    #[error("{code}: {message}")]
    Definition {
        code: ErrorCode,
        message: String,
        name: Option<String>,
        location: Option<SourceLocation>,
    },

    /// Evaluation error
    #[error("{code}: {message}")]
    Evaluation { code: ErrorCode, message: String },

    /// Aggregation error
    #[error("{code}: {message}")]
    Aggregation {
        code: ErrorCode,
        message: String,
        measure_id: Option<String>,
    },

    /// System error
    #[error("{code}: {message}")]
    System { code: ErrorCode, message: String },

    /// Multiple errors collected
    #[error("Multiple errors: {}", .0.len())]
    Multiple(Vec<QofError>),
}

impl QofError {
    /// Create a parse error
    pub fn parse(code: ErrorCode, message: impl Into<String>, predicate: impl Into<String>) -> Self {
        Self::Parse {
            code,
            message: message.into(),
            predicate: predicate.into(),
            location: None,
        }
    }

    /// Create a parse error with location
    pub fn parse_at(
        code: ErrorCode,
        message: impl Into<String>,
        predicate: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Self::Parse {
            code,
            message: message.into(),
            predicate: predicate.into(),
            location: Some(location),
        }
    }

    /// Create a definition error
    pub fn definition(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Definition {
            code,
            message: message.into(),
            name: None,
            location: None,
        }
    }

    /// Create a definition error naming the offending fact/rule
    pub fn definition_for(
        code: ErrorCode,
        message: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self::Definition {
            code,
            message: message.into(),
            name: Some(name.into()),
            location: None,
        }
    }

    /// Create an evaluation error
    pub fn evaluation(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Evaluation {
            code,
            message: message.into(),
        }
    }

    /// Create an aggregation error
    pub fn aggregation(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Aggregation {
            code,
            message: message.into(),
            measure_id: None,
        }
    }

    /// Create an aggregation error for a specific measure
    pub fn aggregation_for(
        code: ErrorCode,
        message: impl Into<String>,
        measure_id: impl Into<String>,
    ) -> Self {
        Self::Aggregation {
            code,
            message: message.into(),
            measure_id: Some(measure_id.into()),
        }
    }

    /// Create a system error
    pub fn system(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::System {
            code,
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Parse { code, .. } => *code,
            Self::Definition { code, .. } => *code,
            Self::Evaluation { code, .. } => *code,
            Self::Aggregation { code, .. } => *code,
            Self::System { code, .. } => *code,
            Self::Multiple(errors) => errors.first().map(|e| e.code()).unwrap_or(ErrorCode::new(0)),
        }
    }

    /// Get the location if available
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Self::Parse { location, .. } => location.as_ref(),
            Self::Definition { location, .. } => location.as_ref(),
            _ => None,
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Parse {
                code,
                message,
                location,
                ..
            }
            | Self::Definition {
                code,
                message,
                location,
                ..
            } => {
                let mut diag = Diagnostic::error(*code, message.clone());
                if let Some(loc) = location {
                    diag = diag.with_location(loc.clone());
                }
                if let Some(help) = code.info().help {
                    diag = diag.with_help(help);
                }
                diag
            }
            Self::Evaluation { code, message } | Self::System { code, message } => {
                Diagnostic::error(*code, message.clone())
            }
            Self::Aggregation { code, message, .. } => Diagnostic::error(*code, message.clone()),
            Self::Multiple(errors) => {
                if let Some(first) = errors.first() {
                    first.to_diagnostic()
                } else {
                    Diagnostic::error(ErrorCode::new(0), "Unknown error")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{QOF0001, QOF0100};

    #[test]
    fn test_definition_error() {
        let err = QofError::definition_for(QOF0100, "Undefined fact 'bp_sys'", "bp_sys");

        assert!(matches!(err, QofError::Definition { .. }));
        assert_eq!(err.code(), QOF0100);
        assert!(err.code().is_definition_error());
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error(QOF0001, "Unexpected token")
            .with_location(SourceLocation::new(1, 5, 4, 1));

        assert!(diag.to_string().contains("QOF0001"));
        assert!(diag.to_string().contains("1:5"));
    }

    #[test]
    fn test_diagnostic_carries_help() {
        let err = QofError::definition_for(QOF0100, "Undefined fact 'died'", "died");
        let diag = err.to_diagnostic();
        assert!(diag.help.is_some());
    }
}
