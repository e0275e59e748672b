//! JavaScript code generation.
//!
//! Turns a type-checked program into the text of an ES module:
//!
//! - Operators are lowered onto runtime helpers where GPJ semantics differ
//! - Typed `catch` clauses become a shape-guarded `if` chain
//! - Import sources are rewritten to loadable specifiers
//! - Only the optional helpers the body references are prepended

pub mod compiler;
pub mod expr;
pub mod runtime;
pub mod stdlib;
pub mod stmt;

#[cfg(test)]
mod tests;
