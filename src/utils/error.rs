//! Error handling for calctex conversions
//!
//! This module provides a unified error type and result type for all
//! evaluation operations.

use std::fmt;

/// Conversion error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    /// Exactly one of a matched open/close matrix marker was found
    MismatchedDelimiters,
    /// Parse error - input could not be parsed
    ParseError {
        message: String,
        position: Option<usize>,
    },
    /// Evaluation error - shape mismatch, division by zero, overflow
    EvalError { message: String },
    /// IO error (for stdin/file operations)
    IoError { message: String },
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Fixed diagnostic, matched by the CLI failure surface
            CalcError::MismatchedDelimiters => write!(f, "Mismatched matrix delimiters."),
            CalcError::ParseError { message, position } => {
                if let Some(pos) = position {
                    write!(f, "Parse error at offset {}: {}", pos, message)
                } else {
                    write!(f, "Parse error: {}", message)
                }
            }
            CalcError::EvalError { message } => {
                write!(f, "Evaluation error: {}", message)
            }
            CalcError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for CalcError {}

impl From<std::io::Error> for CalcError {
    fn from(err: std::io::Error) -> Self {
        CalcError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type for conversion operations
pub type CalcResult<T> = Result<T, CalcError>;

// Convenience constructors for errors
impl CalcError {
    pub fn parse(message: impl Into<String>) -> Self {
        CalcError::ParseError {
            message: message.into(),
            position: None,
        }
    }

    pub fn parse_at(message: impl Into<String>, position: usize) -> Self {
        CalcError::ParseError {
            message: message.into(),
            position: Some(position),
        }
    }

    pub fn eval(message: impl Into<String>) -> Self {
        CalcError::EvalError {
            message: message.into(),
        }
    }
}
