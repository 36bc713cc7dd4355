//! QOFR error codes following a structured numbering system
//!
//! Error code ranges:
//! - QOF0001-QOF0099: Parse errors (predicate syntax)
//! - QOF0100-QOF0199: Definition errors (resolution, chain construction)
//! - QOF0200-QOF0299: Evaluation errors (runtime)
//! - QOF0300-QOF0399: Aggregation errors (measures)
//! - QOF0400-QOF0499: System errors (configuration)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is a parse error (0001-0099)
    pub const fn is_parse_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is a definition error (0100-0199)
    pub const fn is_definition_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is an evaluation error (0200-0299)
    pub const fn is_evaluation_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Check if this is an aggregation error (0300-0399)
    pub const fn is_aggregation_error(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }

    /// Check if this is a system error (0400-0499)
    pub const fn is_system_error(&self) -> bool {
        self.0 >= 400 && self.0 < 500
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QOF{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

// Static error info storage
static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

use std::collections::HashMap;
use std::sync::LazyLock;

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Parse errors (0001-0099)
    map.insert(1, ErrorInfo::new("Unexpected token"));
    map.insert(2, ErrorInfo::new("Unexpected end of input"));
    map.insert(3, ErrorInfo::new("Invalid identifier"));
    map.insert(4, ErrorInfo::new("Invalid literal"));
    map.insert(5, ErrorInfo::new("Unterminated string literal"));
    map.insert(6, ErrorInfo::new("Invalid number format"));
    map.insert(7, ErrorInfo::new("Invalid date format"));
    map.insert(8, ErrorInfo::new("Missing closing parenthesis"));
    map.insert(9, ErrorInfo::new("Expected expression"));
    map.insert(10, ErrorInfo::new("Invalid operator"));

    // Definition errors (0100-0199)
    map.insert(
        100,
        ErrorInfo::new("Undefined fact reference")
            .with_help("Check that the fact is declared in the fact dictionary"),
    );
    map.insert(
        101,
        ErrorInfo::new("Undefined rule reference")
            .with_help("Rules may only reference rules defined earlier in the chain"),
    );
    map.insert(102, ErrorInfo::new("Circular rule reference"));
    map.insert(103, ErrorInfo::new("Duplicate rule name"));
    map.insert(104, ErrorInfo::new("Incompatible comparison operands"));
    map.insert(105, ErrorInfo::new("Predicate is not boolean-valued"));
    map.insert(106, ErrorInfo::new("Empty rule chain stage"));

    // Evaluation errors (0200-0299)
    map.insert(200, ErrorInfo::new("Evaluation failed"));
    map.insert(201, ErrorInfo::new("Non-boolean rule result"));
    map.insert(202, ErrorInfo::new("Invalid value comparison"));

    // Aggregation errors (0300-0399)
    map.insert(
        300,
        ErrorInfo::new("Measure column not found")
            .with_help("The numerator/denominator column must exist in the result table"),
    );
    map.insert(301, ErrorInfo::new("Group-by dimension not found"));
    map.insert(302, ErrorInfo::new("Duplicate measure id"));

    // System errors (0400-0499)
    map.insert(400, ErrorInfo::new("Internal error"));
    map.insert(401, ErrorInfo::new("Configuration error"));

    map
});

// Convenient error code constants

// Parse errors
pub const QOF0001: ErrorCode = ErrorCode::new(1);
pub const QOF0002: ErrorCode = ErrorCode::new(2);
pub const QOF0003: ErrorCode = ErrorCode::new(3);
pub const QOF0004: ErrorCode = ErrorCode::new(4);
pub const QOF0005: ErrorCode = ErrorCode::new(5);
pub const QOF0006: ErrorCode = ErrorCode::new(6);
pub const QOF0007: ErrorCode = ErrorCode::new(7);
pub const QOF0008: ErrorCode = ErrorCode::new(8);
pub const QOF0009: ErrorCode = ErrorCode::new(9);
pub const QOF0010: ErrorCode = ErrorCode::new(10);

// Definition errors
pub const QOF0100: ErrorCode = ErrorCode::new(100);
pub const QOF0101: ErrorCode = ErrorCode::new(101);
pub const QOF0102: ErrorCode = ErrorCode::new(102);
pub const QOF0103: ErrorCode = ErrorCode::new(103);
pub const QOF0104: ErrorCode = ErrorCode::new(104);
pub const QOF0105: ErrorCode = ErrorCode::new(105);
pub const QOF0106: ErrorCode = ErrorCode::new(106);

// Evaluation errors
pub const QOF0200: ErrorCode = ErrorCode::new(200);
pub const QOF0201: ErrorCode = ErrorCode::new(201);
pub const QOF0202: ErrorCode = ErrorCode::new(202);

// Aggregation errors
pub const QOF0300: ErrorCode = ErrorCode::new(300);
pub const QOF0301: ErrorCode = ErrorCode::new(301);
pub const QOF0302: ErrorCode = ErrorCode::new(302);

// System errors
pub const QOF0400: ErrorCode = ErrorCode::new(400);
pub const QOF0401: ErrorCode = ErrorCode::new(401);
