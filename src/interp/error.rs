//! # Evaluation Error Module / 求值错误模块
//!
//! Runtime error type for the example language.
//!
//! 示例语言的运行时错误类型。

use std::fmt;

/// An error raised while parsing or running example code.
///
/// Every error renders as `Kind: message`, the same shape an interactive
/// session prints for an uncaught exception.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// The source could not be tokenized or parsed.
    Syntax { message: String, line: usize },
    /// An exception raised by running code (`raise`, failed builtins, bad operands, ...).
    Raised { kind: String, message: String },
}

impl EvalError {
    pub fn syntax(message: impl Into<String>, line: usize) -> Self {
        Self::Syntax {
            message: message.into(),
            line,
        }
    }

    pub fn raised(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Raised {
            kind: kind.into(),
            message: message.into(),
        }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::raised("TypeError", message)
    }

    pub fn value_error(message: impl Into<String>) -> Self {
        Self::raised("ValueError", message)
    }

    pub fn name_error(name: &str) -> Self {
        Self::raised("NameError", format!("name '{name}' is not defined"))
    }

    pub fn attribute_error(type_name: &str, attribute: &str) -> Self {
        Self::raised(
            "AttributeError",
            format!("'{type_name}' object has no attribute '{attribute}'"),
        )
    }

    pub fn zero_division(message: impl Into<String>) -> Self {
        Self::raised("ZeroDivisionError", message)
    }

    /// The exception kind, e.g. `ValueError` or `SyntaxError`.
    pub fn kind(&self) -> &str {
        match self {
            Self::Syntax { .. } => "SyntaxError",
            Self::Raised { kind, .. } => kind,
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax { message, line } => write!(f, "SyntaxError: {message} (line {line})"),
            Self::Raised { kind, message } if message.is_empty() => write!(f, "{kind}"),
            Self::Raised { kind, message } => write!(f, "{kind}: {message}"),
        }
    }
}

impl std::error::Error for EvalError {}

/// Result alias for interpreter operations.
pub type EvalResult<T> = Result<T, EvalError>;
