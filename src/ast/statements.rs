use super::{
    ast::{Expr, Pattern, Stmt},
    types::Type,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Let,
    Val,
}

/// Variable Declaration Statement
/// `let`/`val` with a binding pattern, an optional annotation and an
/// initialiser. Only `let` may omit the initialiser.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub kind: DeclKind,
    pub pattern: Pattern,
    pub type_: Option<Type>,
    pub init: Option<Expr>,
}

/// If Statement
/// Blocks are mandatory, `else if` chains nest through `ElseBranch::If`.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub consequent: Vec<Stmt>,
    pub alternate: Option<ElseBranch>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElseBranch {
    If(Box<IfStmt>),
    Block(Vec<Stmt>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileStmt {
    pub body: Vec<Stmt>,
    pub condition: Expr,
}

/// C-style `for (init; test; update)`. Every clause is optional.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<Box<Stmt>>,
    pub test: Option<Expr>,
    pub update: Option<Expr>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForOfStmt {
    pub kind: DeclKind,
    pub pattern: Pattern,
    pub iterable: Expr,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStmt {
    pub discriminant: Expr,
    pub cases: Vec<SwitchCase>,
}

/// A `case` clause, or `default` when `test` is `None`. Bodies fall through.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub test: Option<Expr>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryStmt {
    pub block: Vec<Stmt>,
    pub handlers: Vec<CatchClause>,
    pub finalizer: Option<Vec<Stmt>>,
}

/// `catch (param)` or `catch (param: Type)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub param: String,
    pub type_: Option<Type>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportSpecifiers {
    /// `import a, b as c from "..."`
    Named(Vec<ImportName>),
    /// `import * as ns from "..."`
    Namespace(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportName {
    pub name: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportStmt {
    pub specifiers: ImportSpecifiers,
    pub source: String,
}

/// `type Name<K, V> = T;`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasStmt {
    pub name: String,
    pub parameters: Vec<String>,
    pub aliased: Type,
}
