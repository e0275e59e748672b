/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The program root, the statement and expression sums, and shared pieces
/// - expressions: Node structs for compound expressions
/// - statements: Node structs for compound statements
/// - types: The type annotation grammar
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
