use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::{
    ast::{
        ast::{Expr, Stmt},
        expressions::{AssignmentOperator, BinaryOperator},
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{expr::*, parser::Parser, stmt::*};

pub type StmtHandler = fn(&mut Parser) -> Result<Stmt, Error>;
pub type NUDHandler = fn(&mut Parser) -> Result<Expr, Error>;
pub type LEDHandler = fn(&mut Parser, Expr) -> Result<Expr, Error>;

lazy_static! {
    /// Every binary operator token. There is no precedence between them.
    pub static ref BINARY_OPERATORS: HashMap<TokenKind, BinaryOperator> = {
        let mut map = HashMap::new();
        map.insert(TokenKind::Or, BinaryOperator::Or);
        map.insert(TokenKind::And, BinaryOperator::And);
        map.insert(TokenKind::Equals, BinaryOperator::Equals);
        map.insert(TokenKind::NotEquals, BinaryOperator::NotEquals);
        map.insert(TokenKind::Less, BinaryOperator::Less);
        map.insert(TokenKind::Greater, BinaryOperator::Greater);
        map.insert(TokenKind::LessEquals, BinaryOperator::LessEquals);
        map.insert(TokenKind::GreaterEquals, BinaryOperator::GreaterEquals);
        map.insert(TokenKind::Plus, BinaryOperator::Add);
        map.insert(TokenKind::Dash, BinaryOperator::Subtract);
        map.insert(TokenKind::Star, BinaryOperator::Multiply);
        map.insert(TokenKind::Slash, BinaryOperator::Divide);
        map.insert(TokenKind::Percent, BinaryOperator::Modulo);
        map.insert(TokenKind::StarStar, BinaryOperator::Power);
        map.insert(TokenKind::NullishCoalescing, BinaryOperator::Coalesce);
        map
    };

    pub static ref ASSIGNMENT_OPERATORS: HashMap<TokenKind, AssignmentOperator> = {
        let mut map = HashMap::new();
        map.insert(TokenKind::Assignment, AssignmentOperator::Assign);
        map.insert(TokenKind::PlusEquals, AssignmentOperator::Add);
        map.insert(TokenKind::MinusEquals, AssignmentOperator::Subtract);
        map.insert(TokenKind::StarEquals, AssignmentOperator::Multiply);
        map.insert(TokenKind::SlashEquals, AssignmentOperator::Divide);
        map.insert(TokenKind::PercentEquals, AssignmentOperator::Modulo);
        map.insert(TokenKind::StarStarEquals, AssignmentOperator::Power);
        map
    };
}

pub fn create_token_lookups(parser: &mut Parser) {
    // Postfix
    parser.led(TokenKind::Dot, parse_member_expr);
    parser.led(TokenKind::QuestionDot, parse_member_expr);
    parser.led(TokenKind::OpenBracket, parse_index_expr);
    parser.led(TokenKind::OpenParen, parse_call_expr);

    // Literals and symbols
    parser.nud(TokenKind::Number, parse_primary_expr);
    parser.nud(TokenKind::String, parse_primary_expr);
    parser.nud(TokenKind::True, parse_primary_expr);
    parser.nud(TokenKind::False, parse_primary_expr);
    parser.nud(TokenKind::None, parse_primary_expr);
    parser.nud(TokenKind::This, parse_primary_expr);
    parser.nud(TokenKind::Identifier, parse_identifier_expr);
    parser.nud(TokenKind::FString, parse_fstring_expr);
    parser.nud(TokenKind::OpenParen, parse_grouping_expr);
    parser.nud(TokenKind::OpenBracket, parse_array_expr);
    parser.nud(TokenKind::OpenCurly, parse_object_expr);
    parser.nud(TokenKind::Function, parse_function_expr);

    // Prefix
    parser.nud(TokenKind::Not, parse_prefix_expr);
    parser.nud(TokenKind::Dash, parse_prefix_expr);
    parser.nud(TokenKind::Typeof, parse_prefix_expr);

    // Statements
    parser.stmt(TokenKind::Let, parse_var_decl_stmt);
    parser.stmt(TokenKind::Val, parse_var_decl_stmt);
    parser.stmt(TokenKind::Function, parse_fn_decl_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
    parser.stmt(TokenKind::If, parse_if_stmt);
    parser.stmt(TokenKind::While, parse_while_stmt);
    parser.stmt(TokenKind::Do, parse_do_while_stmt);
    parser.stmt(TokenKind::For, parse_for_stmt);
    parser.stmt(TokenKind::Switch, parse_switch_stmt);
    parser.stmt(TokenKind::Try, parse_try_stmt);
    parser.stmt(TokenKind::Throw, parse_throw_stmt);
    parser.stmt(TokenKind::Break, parse_break_stmt);
    parser.stmt(TokenKind::Continue, parse_continue_stmt);
    parser.stmt(TokenKind::Import, parse_import_stmt);
    parser.stmt(TokenKind::Export, parse_export_stmt);
    parser.stmt(TokenKind::Type, parse_type_alias_stmt);
    parser.stmt(TokenKind::OpenCurly, parse_block_stmt);
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
