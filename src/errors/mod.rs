//! Error types and error handling for the compiler.
//!
//! This module defines the error type shared by every compilation phase.
//! It includes:
//!
//! - A single error structure with an optional source position
//! - Specific error variants for the lexer, parser, type checker and code generator
//! - Error kind classification and display functionality
//! - Helpful suggestions for common mistakes

pub mod errors;

#[cfg(test)]
mod tests;
