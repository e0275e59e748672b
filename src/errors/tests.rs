//! Unit tests for error handling.
//!
//! This module contains tests for error kinds, messages and locations.

use crate::errors::errors::{Error, ErrorImpl, ErrorKind, ErrorTip};
use crate::Position;

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnexpectedCharacter { character: '@' },
        Position { line: 1, col: 10 },
    );

    assert_eq!(error.get_error_name(), "UnexpectedCharacter");
    assert_eq!(error.get_kind(), ErrorKind::Lex);
}

#[test]
fn test_error_position() {
    let error = Error::new(ErrorImpl::UnterminatedString, Position { line: 3, col: 42 });

    let position = error.get_position().unwrap();
    assert_eq!(position.line, 3);
    assert_eq!(position.col, 42);
}

#[test]
fn test_located_error_display() {
    let error = Error::new(
        ErrorImpl::MissingSpaceBefore {
            operator: "+".to_string(),
        },
        Position { line: 1, col: 2 },
    );

    assert_eq!(error.to_string(), "'+' must be preceded by a space at 1:2");
    assert_eq!(error.message(), "'+' must be preceded by a space");
}

#[test]
fn test_unlocated_error_display() {
    let error = Error::unlocated(ErrorImpl::TypeMismatch {
        expected: "Number".to_string(),
        received: "String".to_string(),
    });

    assert!(error.get_position().is_none());
    assert_eq!(error.to_string(), "type mismatch: expected Number, got String");
    assert_eq!(error.get_kind(), ErrorKind::TypeCheck);
}

#[test]
fn test_escape_sequence_message() {
    let error = Error::new(
        ErrorImpl::UnknownEscapeSequence { sequence: 'q' },
        Position { line: 1, col: 5 },
    );

    assert_eq!(error.to_string(), "Unknown escape sequence \\q at 1:5");
}

#[test]
fn test_mixed_operators_message() {
    let error = Error::new(
        ErrorImpl::MixedOperators {
            left: "+".to_string(),
            right: "*".to_string(),
        },
        Position { line: 1, col: 7 },
    );

    assert!(error.to_string().contains("parentheses"));
    assert_eq!(error.get_kind(), ErrorKind::Parse);
}

#[test]
fn test_bitwise_or_is_parse_error() {
    let error = Error::new(ErrorImpl::BitwiseOr, Position { line: 2, col: 3 });

    assert_eq!(error.get_kind(), ErrorKind::Parse);
    assert!(error.to_string().contains("'||'"));
}

#[test]
fn test_interpolation_brace_message() {
    let error = Error::new(ErrorImpl::UnmatchedInterpolationBrace, Position { line: 1, col: 1 });

    assert_eq!(error.message(), "Single '}' in f-string must be doubled");
}

#[test]
fn test_nullish_message_names_type() {
    let error = Error::unlocated(ErrorImpl::NonNullableCoalesce {
        type_: "Boolean".to_string(),
    });

    let message = error.to_string();
    assert!(message.contains("??"));
    assert!(message.contains("Boolean"));
}

#[test]
fn test_codegen_error_kind() {
    let error = Error::unlocated(ErrorImpl::UnsupportedNode {
        node: "spread expression".to_string(),
    });

    assert_eq!(error.get_kind(), ErrorKind::Codegen);
    assert_eq!(error.get_kind().to_string(), "CodegenError");
}

#[test]
fn test_error_tips() {
    let with_tip = Error::unlocated(ErrorImpl::MethodAsValue {
        property: "doThing".to_string(),
    });
    let without_tip = Error::unlocated(ErrorImpl::PrivateProperty {
        property: "_x".to_string(),
    });

    assert!(matches!(with_tip.get_tip(), ErrorTip::Suggestion(tip) if tip.contains("doThing")));
    assert!(matches!(without_tip.get_tip(), ErrorTip::None));
}
