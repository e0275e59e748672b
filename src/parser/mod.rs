//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into a `Program`. It is recursive descent and deliberately has no
//! operator precedence:
//!
//! - Statement parsing (declarations, functions, control flow, modules)
//! - Expression parsing (same-operator chains, ternaries, arrows, literals)
//! - Mandatory whitespace around binary, assignment and ternary operators
//! - Type parsing for annotations
//! - Destructuring patterns
//!
//! Statements and primary expressions are dispatched through NUD and
//! statement lookup tables, postfix forms through LED handlers.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod patterns;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
