//! Type parsing implementation.
//!
//! This module handles parsing of type annotations. It supports:
//!
//! - Named types, `None` and `Unknown`
//! - Generic types (`Array<Number>`, `Map<String, Number>`)
//! - Object types (`{x: Number, y: String}`)
//! - Tuple types (`[Number, String]`)
//! - Function types (`(a: Number, String) => Boolean`)
//! - Nullable (`T?`) and union (`A | B`) types
//!
//! Primary forms are dispatched through a NUD lookup table. `?` binds
//! tighter than `|`, so `A | B?` is `A | (B?)`.

use std::collections::HashMap;

use crate::{ast::types::Type, errors::errors::Error, lexer::tokens::TokenKind};

use super::parser::Parser;

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<Type, Error>;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Initializes the type parsing lookup table.
///
/// # Arguments
///
/// * `parser` - Mutable reference to the parser to initialize
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Identifier, parse_symbol_type);
    parser.type_nud(TokenKind::None, parse_symbol_type);
    parser.type_nud(TokenKind::OpenCurly, parse_object_type);
    parser.type_nud(TokenKind::OpenBracket, parse_tuple_type);
    parser.type_nud(TokenKind::OpenParen, parse_function_type);
}

/// Parses a full type annotation, including unions.
pub fn parse_type(parser: &mut Parser) -> Result<Type, Error> {
    let first = parse_nullable_type(parser)?;

    if parser.current_token_kind() != TokenKind::Pipe {
        return Ok(first);
    }

    let mut members = vec![first];
    while parser.current_token_kind() == TokenKind::Pipe {
        parser.advance();
        members.push(parse_nullable_type(parser)?);
    }

    Ok(Type::Union(members))
}

fn parse_nullable_type(parser: &mut Parser) -> Result<Type, Error> {
    let kind = parser.current_token_kind();
    let Some(nud) = parser.get_type_nud_lookup().get(&kind).copied() else {
        return Err(parser.unexpected("type"));
    };

    let mut type_ = nud(parser)?;

    while parser.current_token_kind() == TokenKind::Question {
        parser.advance();
        type_ = Type::Nullable(Box::new(type_));
    }

    Ok(type_)
}

/// `Name`, `Name<A, B>`, `None` or `Unknown`.
pub fn parse_symbol_type(parser: &mut Parser) -> Result<Type, Error> {
    let token = parser.advance().clone();

    if token.kind == TokenKind::None {
        return Ok(Type::none());
    }

    if token.value == "Unknown" {
        return Ok(Type::Unknown);
    }

    if parser.current_token_kind() != TokenKind::Less {
        return Ok(Type::Named(token.value));
    }

    parser.advance();
    let mut arguments = vec![parse_type(parser)?];
    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        arguments.push(parse_type(parser)?);
    }
    parser.expect(TokenKind::Greater)?;

    Ok(Type::Generic {
        name: token.value,
        arguments,
    })
}

pub fn parse_object_type(parser: &mut Parser) -> Result<Type, Error> {
    parser.expect(TokenKind::OpenCurly)?;

    let mut fields = vec![];

    while parser.current_token_kind() != TokenKind::CloseCurly {
        let token = parser.current_token().clone();
        if token.kind != TokenKind::Identifier
            && token.kind != TokenKind::String
            && !token.kind.is_keyword()
        {
            return Err(parser.unexpected("field name"));
        }
        parser.advance();

        parser.expect(TokenKind::Colon)?;
        fields.push((token.value, parse_type(parser)?));

        if parser.current_token_kind() != TokenKind::CloseCurly {
            parser.expect(TokenKind::Comma)?;
        }
    }

    parser.expect(TokenKind::CloseCurly)?;
    Ok(Type::Object(fields))
}

pub fn parse_tuple_type(parser: &mut Parser) -> Result<Type, Error> {
    parser.expect(TokenKind::OpenBracket)?;

    let mut elements = vec![];

    while parser.current_token_kind() != TokenKind::CloseBracket {
        elements.push(parse_type(parser)?);

        if parser.current_token_kind() != TokenKind::CloseBracket {
            parser.expect(TokenKind::Comma)?;
        }
    }

    parser.expect(TokenKind::CloseBracket)?;
    Ok(Type::Tuple(elements))
}

/// `(A, b: B) => R`. A single unnamed type in parentheses without an arrow
/// is a grouped type, e.g. `(A | B)?`.
pub fn parse_function_type(parser: &mut Parser) -> Result<Type, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = vec![];
    let mut named = false;

    while parser.current_token_kind() != TokenKind::CloseParen {
        if parser.current_token_kind() == TokenKind::DotDotDot {
            parser.advance();
            named = true;
        }

        if parser.current_token_kind() == TokenKind::Identifier
            && parser.peek_token(1).kind == TokenKind::Colon
        {
            parser.advance();
            parser.advance();
            named = true;
        }

        parameters.push(parse_type(parser)?);

        if parser.current_token_kind() != TokenKind::CloseParen {
            parser.expect(TokenKind::Comma)?;
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    if parser.current_token_kind() != TokenKind::Arrow && parameters.len() == 1 && !named {
        return Ok(parameters.remove(0));
    }

    parser.expect(TokenKind::Arrow)?;
    let return_type = parse_type(parser)?;

    Ok(Type::Function {
        parameters: Some(parameters),
        return_type: Some(Box::new(return_type)),
    })
}
