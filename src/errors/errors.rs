use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// The pipeline phase an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lex,
    Parse,
    TypeCheck,
    Codegen,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Lex => write!(f, "LexError"),
            ErrorKind::Parse => write!(f, "ParseError"),
            ErrorKind::TypeCheck => write!(f, "TypeCheckError"),
            ErrorKind::Codegen => write!(f, "CodegenError"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Option<Position>,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position: Some(position),
        }
    }

    /// Type checking and code generation do not track source locations.
    pub fn unlocated(error_impl: ErrorImpl) -> Self {
        Error {
            internal_error: error_impl,
            position: None,
        }
    }

    pub fn get_position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn get_internal(&self) -> &ErrorImpl {
        &self.internal_error
    }

    /// The message without the trailing location.
    pub fn message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn get_kind(&self) -> ErrorKind {
        match &self.internal_error {
            ErrorImpl::UnknownEscapeSequence { .. }
            | ErrorImpl::UnterminatedString
            | ErrorImpl::UnterminatedInterpolation
            | ErrorImpl::UnmatchedInterpolationBrace
            | ErrorImpl::BitwiseAnd
            | ErrorImpl::UnexpectedCharacter { .. } => ErrorKind::Lex,
            ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::BitwiseOr
            | ErrorImpl::MixedOperators { .. }
            | ErrorImpl::ChainedComparison { .. }
            | ErrorImpl::MissingSpaceBefore { .. }
            | ErrorImpl::MissingSpaceAfter { .. }
            | ErrorImpl::InvalidAssignmentTarget
            | ErrorImpl::MissingCatchOrFinally
            | ErrorImpl::CatchAllNotLast
            | ErrorImpl::InvalidExport
            | ErrorImpl::RestNotLast { .. }
            | ErrorImpl::EmptyInterpolation => ErrorKind::Parse,
            ErrorImpl::TypeMismatch { .. }
            | ErrorImpl::UnknownOperand { .. }
            | ErrorImpl::UnknownAssignment { .. }
            | ErrorImpl::NonNullableCoalesce { .. }
            | ErrorImpl::PrivateProperty { .. }
            | ErrorImpl::MethodAsValue { .. } => ErrorKind::TypeCheck,
            ErrorImpl::UnsupportedNode { .. } => ErrorKind::Codegen,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnknownEscapeSequence { .. } => "UnknownEscapeSequence",
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::UnterminatedInterpolation => "UnterminatedInterpolation",
            ErrorImpl::UnmatchedInterpolationBrace => "UnmatchedInterpolationBrace",
            ErrorImpl::BitwiseAnd => "BitwiseAnd",
            ErrorImpl::BitwiseOr => "BitwiseOr",
            ErrorImpl::UnexpectedCharacter { .. } => "UnexpectedCharacter",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::MixedOperators { .. } => "MixedOperators",
            ErrorImpl::ChainedComparison { .. } => "ChainedComparison",
            ErrorImpl::MissingSpaceBefore { .. } => "MissingSpaceBefore",
            ErrorImpl::MissingSpaceAfter { .. } => "MissingSpaceAfter",
            ErrorImpl::InvalidAssignmentTarget => "InvalidAssignmentTarget",
            ErrorImpl::MissingCatchOrFinally => "MissingCatchOrFinally",
            ErrorImpl::CatchAllNotLast => "CatchAllNotLast",
            ErrorImpl::InvalidExport => "InvalidExport",
            ErrorImpl::RestNotLast { .. } => "RestNotLast",
            ErrorImpl::EmptyInterpolation => "EmptyInterpolation",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            ErrorImpl::UnknownOperand { .. } => "UnknownOperand",
            ErrorImpl::UnknownAssignment { .. } => "UnknownAssignment",
            ErrorImpl::NonNullableCoalesce { .. } => "NonNullableCoalesce",
            ErrorImpl::PrivateProperty { .. } => "PrivateProperty",
            ErrorImpl::MethodAsValue { .. } => "MethodAsValue",
            ErrorImpl::UnsupportedNode { .. } => "UnsupportedNode",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnknownEscapeSequence { .. } => ErrorTip::Suggestion(String::from(
                "Supported escapes are \\n, \\t, \\r, \\\\, \\\" and \\'",
            )),
            ErrorImpl::UnterminatedString => ErrorTip::Suggestion(String::from(
                "Strings cannot span lines, use \\n for a line break",
            )),
            ErrorImpl::UnmatchedInterpolationBrace => {
                ErrorTip::Suggestion(String::from("Write `}}` for a literal brace"))
            }
            ErrorImpl::MixedOperators { left, .. } => ErrorTip::Suggestion(format!(
                "Wrap the `{}` chain in parentheses to make the grouping explicit",
                left
            )),
            ErrorImpl::ChainedComparison { .. } => ErrorTip::Suggestion(String::from(
                "Comparisons produce a Boolean, combine them with parentheses and && or ||",
            )),
            ErrorImpl::MissingSpaceBefore { operator } | ErrorImpl::MissingSpaceAfter { operator } => {
                ErrorTip::Suggestion(format!("Write ` {} ` with a space on both sides", operator))
            }
            ErrorImpl::UnknownOperand { .. } | ErrorImpl::UnknownAssignment { .. } => {
                ErrorTip::Suggestion(String::from(
                    "Check the value with `if (typeof x == \"Number\")` before using it",
                ))
            }
            ErrorImpl::NonNullableCoalesce { .. } => ErrorTip::Suggestion(String::from(
                "Annotate the value as nullable (`T?`) if it can be None",
            )),
            ErrorImpl::MethodAsValue { property } => {
                ErrorTip::Suggestion(format!("Wrap it in a function: `() => obj.{}()`", property))
            }
            _ => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.position {
            Some(position) => write!(f, "{} at {}:{}", self.internal_error, position.line, position.col),
            None => write!(f, "{}", self.internal_error),
        }
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("Unknown escape sequence \\{sequence}")]
    UnknownEscapeSequence { sequence: char },
    #[error("Unterminated string literal")]
    UnterminatedString,
    #[error("Unterminated interpolation in f-string")]
    UnterminatedInterpolation,
    #[error("Single '}}' in f-string must be doubled")]
    UnmatchedInterpolationBrace,
    #[error("Unexpected '&': bitwise operators are not supported")]
    BitwiseAnd,
    #[error("Unexpected '|': use '||' for logical OR")]
    BitwiseOr,
    #[error("Unexpected character '{character}'")]
    UnexpectedCharacter { character: char },

    #[error("Expected {expected} but found {found}")]
    UnexpectedToken { expected: String, found: String },
    #[error("Cannot mix {left} and {right} without parentheses")]
    MixedOperators { left: String, right: String },
    #[error("Cannot follow {left} with {right}; use parentheses to clarify")]
    ChainedComparison { left: String, right: String },
    #[error("'{operator}' must be preceded by a space")]
    MissingSpaceBefore { operator: String },
    #[error("'{operator}' must be followed by a space")]
    MissingSpaceAfter { operator: String },
    #[error("Invalid assignment target")]
    InvalidAssignmentTarget,
    #[error("Expected 'catch' or 'finally' after try block")]
    MissingCatchOrFinally,
    #[error("A catch clause without a type must be the last catch clause")]
    CatchAllNotLast,
    #[error("Expected function, let, or val after 'export'")]
    InvalidExport,
    #[error("Rest element must be the last {context}")]
    RestNotLast { context: String },
    #[error("Empty interpolation in f-string")]
    EmptyInterpolation,

    #[error("type mismatch: expected {expected}, got {received}")]
    TypeMismatch { expected: String, received: String },
    #[error("Cannot use '{operator}' on a value of type Unknown; narrow it with typeof first")]
    UnknownOperand { operator: String },
    #[error("Cannot assign a value of type Unknown to {expected}; narrow it with typeof first")]
    UnknownAssignment { expected: String },
    #[error("Left side of '??' has type {type_}, which can never be None")]
    NonNullableCoalesce { type_: String },
    #[error("Cannot access private property '{property}' outside of an object literal method")]
    PrivateProperty { property: String },
    #[error("method '{property}' must be called; it cannot be used as a value")]
    MethodAsValue { property: String },

    #[error("Cannot generate code for {node}")]
    UnsupportedNode { node: String },
}
