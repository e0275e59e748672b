//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the parse entry point.
//! The parser is recursive descent. Statements and primary expressions are
//! dispatched through lookup tables keyed by token kind; binary operators
//! have no precedence and are handled by a single chain rule.
//!
//! Handlers are registered in `lookups.rs` (statements, prefix and postfix
//! expression forms) and `types.rs` (annotations).

use std::collections::HashMap;

use crate::{
    ast::ast::{Expr, Program},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind, RESERVED_LOOKUP},
    Position,
};

use super::{
    expr::parse_expr,
    lookups::{
        create_token_lookups, LEDHandler, LEDLookup, NUDHandler, NUDLookup, StmtHandler,
        StmtLookup,
    },
    stmt::parse_stmt,
    types::{create_token_type_lookups, TypeNUDHandler, TypeNUDLookup},
};

/// Cursor over a token stream plus the handler tables the parse functions
/// dispatch through.
pub struct Parser {
    /// Always terminated by EOF
    tokens: Vec<Token>,
    pos: usize,
    stmt_lookup: StmtLookup,
    nud_lookup: NUDLookup,
    led_lookup: LEDLookup,
    type_nud_lookup: TypeNUDLookup,
}

impl Parser {
    /// Builds a parser and registers every handler. An EOF token is
    /// appended when the stream does not already end with one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::EOF) {
            let position = tokens
                .last()
                .map(|t| t.position)
                .unwrap_or(Position { line: 1, col: 1 });
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                position,
                preceded_by_whitespace: true,
            });
        }

        let mut parser = Parser {
            tokens,
            pos: 0,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            type_nud_lookup: HashMap::new(),
        };
        create_token_lookups(&mut parser);
        create_token_type_lookups(&mut parser);
        parser
    }

    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// The token `offset` places ahead, clamped to EOF.
    pub fn peek_token(&self, offset: usize) -> &Token {
        &self.tokens[(self.pos + offset).min(self.tokens.len() - 1)]
    }

    /// Moves past the current token and returns it. The cursor stays on EOF
    /// once it gets there.
    pub fn advance(&mut self) -> &Token {
        let index = self.pos.min(self.tokens.len() - 1);
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        &self.tokens[index]
    }

    /// Consumes a token of `expected_kind`, failing with `error` when given
    /// or with a generic "Expected ..." error otherwise.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        if self.current_token_kind() != expected_kind {
            return match error {
                Some(error) => Err(error),
                None => Err(self.unexpected(&describe_kind(expected_kind))),
            };
        }

        Ok(self.advance().clone())
    }

    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Builds an "Expected ... but found ..." error at the current token.
    pub fn unexpected(&self, expected: &str) -> Error {
        let token = self.current_token();
        Error::new(
            ErrorImpl::UnexpectedToken {
                expected: expected.to_string(),
                found: token.describe(),
            },
            token.position,
        )
    }

    /// Consumes an operator that must have whitespace on both sides.
    ///
    /// The check reads the `preceded_by_whitespace` flag of the operator
    /// itself and of the token after it. Both errors point at the operator.
    pub fn advance_spaced(&mut self) -> Result<Token, Error> {
        let operator = self.current_token().clone();

        if !operator.preceded_by_whitespace {
            return Err(Error::new(
                ErrorImpl::MissingSpaceBefore {
                    operator: operator.value,
                },
                operator.position,
            ));
        }

        if !self.peek_token(1).preceded_by_whitespace {
            return Err(Error::new(
                ErrorImpl::MissingSpaceAfter {
                    operator: operator.value,
                },
                operator.position,
            ));
        }

        self.advance();
        Ok(operator)
    }

    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Saves the cursor for speculative parsing.
    pub fn checkpoint(&self) -> usize {
        self.pos
    }

    pub fn rewind(&mut self, checkpoint: usize) {
        self.pos = checkpoint;
    }

    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    pub fn get_type_nud_lookup(&self) -> &TypeNUDLookup {
        &self.type_nud_lookup
    }

    /// Registers a postfix handler, called with the expression parsed so far.
    pub fn led(&mut self, kind: TokenKind, led_fn: LEDHandler) {
        self.led_lookup.insert(kind, led_fn);
    }

    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_nud_lookup.insert(kind, nud_fn);
    }

    pub fn get_position(&self) -> Position {
        self.current_token().position
    }
}

/// Describes a token kind for "Expected ..." messages.
pub fn describe_kind(kind: TokenKind) -> String {
    let symbol = match kind {
        TokenKind::EOF => return String::from("end of input"),
        TokenKind::Identifier => return String::from("identifier"),
        TokenKind::Number => return String::from("number"),
        TokenKind::String => return String::from("string"),
        TokenKind::FString => return String::from("f-string"),
        TokenKind::OpenBracket => "[",
        TokenKind::CloseBracket => "]",
        TokenKind::OpenCurly => "{",
        TokenKind::CloseCurly => "}",
        TokenKind::OpenParen => "(",
        TokenKind::CloseParen => ")",
        TokenKind::Assignment => "=",
        TokenKind::Equals => "==",
        TokenKind::Not => "!",
        TokenKind::NotEquals => "!=",
        TokenKind::Less => "<",
        TokenKind::LessEquals => "<=",
        TokenKind::Greater => ">",
        TokenKind::GreaterEquals => ">=",
        TokenKind::And => "&&",
        TokenKind::Or => "||",
        TokenKind::Pipe => "|",
        TokenKind::NullishCoalescing => "??",
        TokenKind::Dot => ".",
        TokenKind::DotDotDot => "...",
        TokenKind::QuestionDot => "?.",
        TokenKind::Question => "?",
        TokenKind::Colon => ":",
        TokenKind::Semicolon => ";",
        TokenKind::Comma => ",",
        TokenKind::Arrow => "=>",
        TokenKind::PlusEquals => "+=",
        TokenKind::MinusEquals => "-=",
        TokenKind::StarEquals => "*=",
        TokenKind::SlashEquals => "/=",
        TokenKind::PercentEquals => "%=",
        TokenKind::StarStarEquals => "**=",
        TokenKind::Plus => "+",
        TokenKind::Dash => "-",
        TokenKind::Slash => "/",
        TokenKind::Star => "*",
        TokenKind::StarStar => "**",
        TokenKind::Percent => "%",
        keyword => {
            return RESERVED_LOOKUP
                .iter()
                .find(|(_, kind)| **kind == keyword)
                .map(|(word, _)| format!("'{}'", word))
                .unwrap_or_else(|| keyword.to_string())
        }
    };

    format!("'{}'", symbol)
}

/// Parses a whole token stream into a `Program`, stopping at the first
/// syntax error.
pub fn parse(tokens: Vec<Token>) -> Result<Program, Error> {
    let mut parser = Parser::new(tokens);
    let mut body = vec![];

    while parser.has_tokens() {
        body.push(parse_stmt(&mut parser)?);
    }

    Ok(Program { body })
}

/// Parses a standalone expression, used for f-string interpolations.
///
/// # Arguments
///
/// * `tokens` - Tokens of the embedded expression, terminated by EOF
///
/// # Returns
///
/// The expression, or an error if tokens remain after it.
pub fn parse_embedded_expr(tokens: Vec<Token>) -> Result<Expr, Error> {
    let mut parser = Parser::new(tokens);
    let expr = parse_expr(&mut parser)?;

    if parser.has_tokens() {
        return Err(parser.unexpected("'}'"));
    }

    Ok(expr)
}
