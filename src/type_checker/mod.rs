//! Static checking of a parsed program.
//!
//! The checker walks the AST once, tracking the annotated or inferred type of
//! every binding. Inference is deliberately shallow: anything it cannot
//! determine is left unchecked and guarded at runtime by the generated code.
//!
//! - Declared types are checked against initializers, assignments and returns
//! - `typeof` guards narrow bindings in `if` branches and `switch` cases
//! - Bindings of type `Unknown` cannot be used as operands
//! - `_` prefixed properties are only reachable from object literal methods

pub mod compat;
pub mod environment;
pub mod expr;
pub mod narrowing;
pub mod shapes;
pub mod stmt;
pub mod type_checker;
