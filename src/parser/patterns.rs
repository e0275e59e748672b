//! Destructuring patterns for `let`/`val` and `for-of` bindings.

use crate::{
    ast::ast::{ObjectPatternProperty, Pattern},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

pub fn parse_pattern(parser: &mut Parser) -> Result<Pattern, Error> {
    match parser.current_token_kind() {
        TokenKind::Identifier => Ok(Pattern::Identifier(parser.advance().value.clone())),
        TokenKind::OpenCurly => parse_object_pattern(parser),
        TokenKind::OpenBracket => parse_array_pattern(parser),
        _ => Err(parser.unexpected("binding pattern")),
    }
}

/// Parses `...name` and requires the closing token right after it
/// (a trailing comma is allowed).
fn parse_rest(parser: &mut Parser, close: TokenKind, context: &str) -> Result<String, Error> {
    let position = parser.get_position();
    parser.expect(TokenKind::DotDotDot)?;
    let name = parser.expect(TokenKind::Identifier)?.value;

    if parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
    }

    if parser.current_token_kind() != close {
        return Err(Error::new(
            ErrorImpl::RestNotLast {
                context: context.to_string(),
            },
            position,
        ));
    }

    Ok(name)
}

/// `{a, b: renamed, c: {nested}, ...rest}`
fn parse_object_pattern(parser: &mut Parser) -> Result<Pattern, Error> {
    parser.expect(TokenKind::OpenCurly)?;

    let mut properties = vec![];
    let mut rest = None;

    while parser.current_token_kind() != TokenKind::CloseCurly {
        if parser.current_token_kind() == TokenKind::DotDotDot {
            rest = Some(parse_rest(
                parser,
                TokenKind::CloseCurly,
                "property of an object pattern",
            )?);
            break;
        }

        let token = parser.current_token().clone();
        if token.kind != TokenKind::Identifier && !token.kind.is_keyword() {
            return Err(parser.unexpected("property name"));
        }
        parser.advance();

        let value = if parser.current_token_kind() == TokenKind::Colon {
            parser.advance();
            parse_pattern(parser)?
        } else if token.kind == TokenKind::Identifier {
            Pattern::Identifier(token.value.clone())
        } else {
            return Err(parser.unexpected("':'"));
        };

        properties.push(ObjectPatternProperty {
            key: token.value,
            value,
        });

        if parser.current_token_kind() != TokenKind::CloseCurly {
            parser.expect(TokenKind::Comma)?;
        }
    }

    parser.expect(TokenKind::CloseCurly)?;
    Ok(Pattern::Object { properties, rest })
}

/// `[a, [b, c], ...rest]`
fn parse_array_pattern(parser: &mut Parser) -> Result<Pattern, Error> {
    parser.expect(TokenKind::OpenBracket)?;

    let mut elements = vec![];
    let mut rest = None;

    while parser.current_token_kind() != TokenKind::CloseBracket {
        if parser.current_token_kind() == TokenKind::DotDotDot {
            rest = Some(parse_rest(
                parser,
                TokenKind::CloseBracket,
                "element of an array pattern",
            )?);
            break;
        }

        elements.push(parse_pattern(parser)?);

        if parser.current_token_kind() != TokenKind::CloseBracket {
            parser.expect(TokenKind::Comma)?;
        }
    }

    parser.expect(TokenKind::CloseBracket)?;
    Ok(Pattern::Array { elements, rest })
}
