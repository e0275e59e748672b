//! Core AST definitions.
//!
//! Statements and expressions are closed enums. Leaf nodes carry their data
//! inline; compound nodes carry a struct from `expressions` or `statements`.
//! Every node owns its children, there are no back references.

use super::{
    expressions::{
        AssignmentExpr, BinaryExpr, CallExpr, FStringPart, FunctionExpr, IndexExpr, MemberExpr,
        Property, TernaryExpr, UnaryExpr,
    },
    statements::{
        DoWhileStmt, ForOfStmt, ForStmt, IfStmt, ImportStmt, SwitchStmt, TryStmt,
        TypeAliasStmt, VarDeclStmt, WhileStmt,
    },
};

/// The root of a parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VarDecl(VarDeclStmt),
    /// Always carries a name.
    FunctionDecl(FunctionExpr),
    Return(Option<Expr>),
    If(IfStmt),
    While(WhileStmt),
    DoWhile(DoWhileStmt),
    For(ForStmt),
    ForOf(ForOfStmt),
    Switch(SwitchStmt),
    Try(TryStmt),
    Throw(Expr),
    Break,
    Continue,
    Import(ImportStmt),
    /// Wraps a function or variable declaration.
    Export(Box<Stmt>),
    TypeAlias(TypeAliasStmt),
    Block(Vec<Stmt>),
    Expression(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Raw decimal text as written.
    Number(String),
    /// Decoded string contents.
    String(String),
    FString(Vec<FStringPart>),
    Boolean(bool),
    None,
    Identifier(String),
    This,
    Array(Vec<Expr>),
    Object(Vec<Property>),
    /// `...expr`, only meaningful inside arrays, objects and call arguments.
    Spread(Box<Expr>),
    Member(MemberExpr),
    Index(IndexExpr),
    Call(CallExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Assignment(AssignmentExpr),
    Ternary(TernaryExpr),
    Function(FunctionExpr),
    /// A parenthesised expression. Kept so operator chains stay opaque.
    Grouping(Box<Expr>),
}

impl Expr {
    /// Strips any number of grouping parentheses.
    pub fn unwrap_grouping(&self) -> &Expr {
        match self {
            Expr::Grouping(inner) => inner.unwrap_grouping(),
            other => other,
        }
    }

    /// A short label used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Expr::Number(_) => "number literal",
            Expr::String(_) => "string literal",
            Expr::FString(_) => "f-string",
            Expr::Boolean(_) => "boolean literal",
            Expr::None => "None",
            Expr::Identifier(_) => "identifier",
            Expr::This => "this",
            Expr::Array(_) => "array literal",
            Expr::Object(_) => "object literal",
            Expr::Spread(_) => "spread expression",
            Expr::Member(_) => "member access",
            Expr::Index(_) => "index access",
            Expr::Call(_) => "call",
            Expr::Unary(_) => "unary expression",
            Expr::Binary(_) => "binary expression",
            Expr::Assignment(_) => "assignment",
            Expr::Ternary(_) => "ternary expression",
            Expr::Function(_) => "function",
            Expr::Grouping(_) => "parenthesised expression",
        }
    }
}

/// A binding target in declarations and `for-of` heads.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Identifier(String),
    Object {
        properties: Vec<ObjectPatternProperty>,
        rest: Option<String>,
    },
    Array {
        elements: Vec<Pattern>,
        rest: Option<String>,
    },
}

/// `key` or `key: pattern` inside an object pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPatternProperty {
    pub key: String,
    pub value: Pattern,
}

impl Pattern {
    /// Every name the pattern binds, in source order.
    pub fn bound_names(&self) -> Vec<String> {
        let mut names = vec![];
        self.collect_names(&mut names);
        names
    }

    fn collect_names(&self, names: &mut Vec<String>) {
        match self {
            Pattern::Identifier(name) => names.push(name.clone()),
            Pattern::Object { properties, rest } => {
                for property in properties {
                    property.value.collect_names(names);
                }
                names.extend(rest.iter().cloned());
            }
            Pattern::Array { elements, rest } => {
                for element in elements {
                    element.collect_names(names);
                }
                names.extend(rest.iter().cloned());
            }
        }
    }
}
