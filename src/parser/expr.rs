use crate::{
    ast::{
        ast::Expr,
        expressions::{
            AssignmentExpr, BinaryExpr, BinaryOperator, CallExpr, FStringPart, FunctionBody,
            FunctionExpr, IndexExpr, MemberExpr, Param, Property, TernaryExpr, UnaryExpr,
            UnaryOperator,
        },
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::{tokenize_at, unescape},
        tokens::TokenKind,
    },
    Position,
};

use super::{
    lookups::{ASSIGNMENT_OPERATORS, BINARY_OPERATORS},
    parser::{parse_embedded_expr, Parser},
    stmt::parse_block,
    types::parse_type,
};

pub fn parse_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parse_assignment_expr(parser)
}

/// Assignment is right associative and only accepts identifiers, members
/// and indexes as targets.
pub fn parse_assignment_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let target = parse_ternary_expr(parser)?;

    let Some(operator) = ASSIGNMENT_OPERATORS
        .get(&parser.current_token_kind())
        .copied()
    else {
        return Ok(target);
    };

    let valid_target = match &target {
        Expr::Identifier(_) | Expr::Index(_) => true,
        Expr::Member(member) => !member.optional,
        _ => false,
    };
    if !valid_target {
        return Err(Error::new(
            ErrorImpl::InvalidAssignmentTarget,
            parser.get_position(),
        ));
    }

    parser.advance_spaced()?;
    let value = parse_assignment_expr(parser)?;

    Ok(Expr::Assignment(AssignmentExpr {
        target: Box::new(target),
        operator,
        value: Box::new(value),
    }))
}

pub fn parse_ternary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let condition = parse_binary_expr(parser)?;

    if parser.current_token_kind() != TokenKind::Question {
        return Ok(condition);
    }

    parser.advance_spaced()?;
    let consequent = parse_expr(parser)?;

    if parser.current_token_kind() != TokenKind::Colon {
        return Err(parser.unexpected("':' in ternary expression"));
    }
    parser.advance_spaced()?;
    let alternate = parse_expr(parser)?;

    Ok(Expr::Ternary(TernaryExpr {
        condition: Box::new(condition),
        consequent: Box::new(consequent),
        alternate: Box::new(alternate),
    }))
}

/// Looks up the binary operator at the cursor. A single `|` is only legal
/// inside type annotations.
fn current_binary_operator(parser: &Parser) -> Result<Option<BinaryOperator>, Error> {
    let kind = parser.current_token_kind();

    if kind == TokenKind::Pipe {
        return Err(Error::new(ErrorImpl::BitwiseOr, parser.get_position()));
    }

    Ok(BINARY_OPERATORS.get(&kind).copied())
}

/// Parses an operator chain. A chain repeats a single operator and folds to
/// the left; comparisons never chain.
pub fn parse_binary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let mut left = parse_unary_expr(parser)?;

    let Some(operator) = current_binary_operator(parser)? else {
        return Ok(left);
    };

    parser.advance_spaced()?;
    let right = parse_unary_expr(parser)?;
    left = Expr::Binary(BinaryExpr {
        left: Box::new(left),
        operator,
        right: Box::new(right),
    });

    if operator.is_comparison() {
        if let Some(next) = current_binary_operator(parser)? {
            return Err(Error::new(
                ErrorImpl::ChainedComparison {
                    left: operator.to_string(),
                    right: next.to_string(),
                },
                parser.get_position(),
            ));
        }
        return Ok(left);
    }

    while let Some(next) = current_binary_operator(parser)? {
        if next != operator {
            return Err(Error::new(
                ErrorImpl::MixedOperators {
                    left: operator.to_string(),
                    right: next.to_string(),
                },
                parser.get_position(),
            ));
        }

        parser.advance_spaced()?;
        let right = parse_unary_expr(parser)?;
        left = Expr::Binary(BinaryExpr {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        });
    }

    Ok(left)
}

/// Runs the NUD handler for the current token, then applies postfix
/// member, index and call handlers while they match.
pub fn parse_unary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let kind = parser.current_token_kind();
    let Some(nud) = parser.get_nud_lookup().get(&kind).copied() else {
        return Err(parser.unexpected("expression"));
    };

    let mut left = nud(parser)?;

    while let Some(led) = parser
        .get_led_lookup()
        .get(&parser.current_token_kind())
        .copied()
    {
        left = led(parser, left)?;
    }

    Ok(left)
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator = match parser.advance().kind {
        TokenKind::Not => UnaryOperator::Not,
        TokenKind::Dash => UnaryOperator::Negate,
        _ => UnaryOperator::Typeof,
    };
    let operand = parse_unary_expr(parser)?;

    Ok(Expr::Unary(UnaryExpr {
        operator,
        operand: Box::new(operand),
    }))
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance().clone();

    match token.kind {
        TokenKind::Number => Ok(Expr::Number(token.value)),
        TokenKind::String => Ok(Expr::String(token.value)),
        TokenKind::True => Ok(Expr::Boolean(true)),
        TokenKind::False => Ok(Expr::Boolean(false)),
        TokenKind::None => Ok(Expr::None),
        TokenKind::This => Ok(Expr::This),
        _ => Err(Error::new(
            ErrorImpl::UnexpectedToken {
                expected: String::from("expression"),
                found: token.describe(),
            },
            token.position,
        )),
    }
}

/// An identifier, or the single-parameter arrow `x => body`.
pub fn parse_identifier_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let name = parser.expect(TokenKind::Identifier)?.value;

    if parser.current_token_kind() != TokenKind::Arrow {
        return Ok(Expr::Identifier(name));
    }

    parser.advance();
    let body = parse_arrow_body(parser)?;

    Ok(Expr::Function(FunctionExpr {
        name: None,
        params: vec![Param {
            name,
            type_: None,
            rest: false,
        }],
        return_type: None,
        body,
        is_arrow: true,
    }))
}

/// Splits the raw f-string body into text and interpolations. Each
/// interpolation is tokenized again with its real source column and parsed
/// as a standalone expression.
pub fn parse_fstring_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance().clone();
    let chars: Vec<char> = token.value.chars().collect();

    // f-strings never span lines; the body starts after `f` and the quote
    let position_of = |index: usize| Position {
        line: token.position.line,
        col: token.position.col + 2 + index as u32,
    };

    let mut parts = vec![];
    let mut text = String::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' if i + 1 < chars.len() => {
                text.push(unescape(chars[i + 1]).unwrap_or(chars[i + 1]));
                i += 2;
            }
            '{' if chars.get(i + 1) == Some(&'{') => {
                text.push('{');
                i += 2;
            }
            '}' if chars.get(i + 1) == Some(&'}') => {
                text.push('}');
                i += 2;
            }
            '{' => {
                let end = interpolation_end(&chars, i);
                let source: String = chars[i + 1..end].iter().collect();

                if source.trim().is_empty() {
                    return Err(Error::new(ErrorImpl::EmptyInterpolation, position_of(i)));
                }

                if !text.is_empty() {
                    parts.push(FStringPart::Text(std::mem::take(&mut text)));
                }

                let tokens = tokenize_at(&source, position_of(i + 1))?;
                parts.push(FStringPart::Expr(parse_embedded_expr(tokens)?));
                i = end + 1;
            }
            ch => {
                text.push(ch);
                i += 1;
            }
        }
    }

    if !text.is_empty() {
        parts.push(FStringPart::Text(text));
    }

    Ok(Expr::FString(parts))
}

/// Index of the `}` closing the interpolation opened at `open`.
fn interpolation_end(chars: &[char], open: usize) -> usize {
    let mut depth = 0;
    let mut quote: Option<char> = None;
    let mut i = open;

    while i < chars.len() {
        let ch = chars[i];
        match quote {
            Some(q) => {
                if ch == '\\' {
                    i += 1;
                } else if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return i;
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }

    chars.len()
}

/// `(` starts either an arrow function or a parenthesised expression. The
/// arrow head is tried first; on failure the cursor is restored and nothing
/// from the attempt is kept.
pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let checkpoint = parser.checkpoint();

    if let Ok((params, return_type)) = parse_arrow_head(parser) {
        let params = params.finish()?;
        let body = parse_arrow_body(parser)?;

        return Ok(Expr::Function(FunctionExpr {
            name: None,
            params,
            return_type,
            body,
            is_arrow: true,
        }));
    }

    parser.rewind(checkpoint);
    parser.expect(TokenKind::OpenParen)?;
    let expr = parse_expr(parser)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::Grouping(Box::new(expr)))
}

fn parse_arrow_head(parser: &mut Parser) -> Result<(ParamList, Option<Type>), Error> {
    let params = parse_param_list(parser)?;

    let return_type = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        Some(parse_type(parser)?)
    } else {
        None
    };

    parser.expect(TokenKind::Arrow)?;
    Ok((params, return_type))
}

fn parse_arrow_body(parser: &mut Parser) -> Result<FunctionBody, Error> {
    if parser.current_token_kind() == TokenKind::OpenCurly {
        Ok(FunctionBody::Block(parse_block(parser)?))
    } else {
        Ok(FunctionBody::Expression(Box::new(parse_expr(parser)?)))
    }
}

/// Parameters as written. A rest parameter that is not last is only
/// reported once the caller knows it is really looking at a function.
pub struct ParamList {
    params: Vec<Param>,
    misplaced_rest: Option<Position>,
}

impl ParamList {
    pub fn finish(self) -> Result<Vec<Param>, Error> {
        match self.misplaced_rest {
            Some(position) => Err(Error::new(
                ErrorImpl::RestNotLast {
                    context: String::from("parameter"),
                },
                position,
            )),
            None => Ok(self.params),
        }
    }
}

/// Parses `(a, b: T, ...rest: Array<T>)` including both parentheses.
pub fn parse_param_list(parser: &mut Parser) -> Result<ParamList, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut params = vec![];
    let mut misplaced_rest = None;
    let mut last_rest: Option<Position> = None;

    while parser.current_token_kind() != TokenKind::CloseParen {
        if let Some(position) = last_rest {
            misplaced_rest.get_or_insert(position);
        }

        let rest = parser.current_token_kind() == TokenKind::DotDotDot;
        if rest {
            last_rest = Some(parser.get_position());
            parser.advance();
        }

        let name = parser.expect(TokenKind::Identifier)?.value;
        let type_ = if parser.current_token_kind() == TokenKind::Colon {
            parser.advance();
            Some(parse_type(parser)?)
        } else {
            None
        };

        params.push(Param { name, type_, rest });

        if parser.current_token_kind() != TokenKind::CloseParen {
            parser.expect(TokenKind::Comma)?;
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(ParamList {
        params,
        misplaced_rest,
    })
}

/// Parses the part of a function after its name: parameters, an optional
/// return type and a block body.
pub fn parse_function_tail(parser: &mut Parser, name: Option<String>) -> Result<FunctionExpr, Error> {
    let params = parse_param_list(parser)?.finish()?;

    let return_type = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        Some(parse_type(parser)?)
    } else {
        None
    };

    let body = parse_block(parser)?;

    Ok(FunctionExpr {
        name,
        params,
        return_type,
        body: FunctionBody::Block(body),
        is_arrow: false,
    })
}

/// `function [name](params) { }` in expression position.
pub fn parse_function_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::Function)?;

    let name = if parser.current_token_kind() == TokenKind::Identifier {
        Some(parser.advance().value.clone())
    } else {
        None
    };

    Ok(Expr::Function(parse_function_tail(parser, name)?))
}

pub fn parse_array_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenBracket)?;

    let mut elements = vec![];

    while parser.current_token_kind() != TokenKind::CloseBracket {
        elements.push(parse_spread_or_expr(parser)?);

        if parser.current_token_kind() != TokenKind::CloseBracket {
            parser.expect(TokenKind::Comma)?;
        }
    }

    parser.expect(TokenKind::CloseBracket)?;
    Ok(Expr::Array(elements))
}

fn parse_spread_or_expr(parser: &mut Parser) -> Result<Expr, Error> {
    if parser.current_token_kind() == TokenKind::DotDotDot {
        parser.advance();
        return Ok(Expr::Spread(Box::new(parse_expr(parser)?)));
    }

    parse_expr(parser)
}

pub fn parse_object_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenCurly)?;

    let mut properties = vec![];

    while parser.current_token_kind() != TokenKind::CloseCurly {
        properties.push(parse_property(parser)?);

        if parser.current_token_kind() != TokenKind::CloseCurly {
            parser.expect(TokenKind::Comma)?;
        }
    }

    parser.expect(TokenKind::CloseCurly)?;
    Ok(Expr::Object(properties))
}

fn parse_property(parser: &mut Parser) -> Result<Property, Error> {
    if parser.current_token_kind() == TokenKind::DotDotDot {
        parser.advance();
        return Ok(Property::Spread(parse_expr(parser)?));
    }

    let key_token = parser.current_token().clone();
    let is_name = key_token.kind == TokenKind::Identifier;
    if !is_name && key_token.kind != TokenKind::String && !key_token.kind.is_keyword() {
        return Err(parser.unexpected("property name"));
    }
    parser.advance();
    let key = key_token.value;

    match parser.current_token_kind() {
        TokenKind::Colon => {
            parser.advance();
            let value = parse_expr(parser)?;
            Ok(Property::KeyValue { key, value })
        }
        TokenKind::OpenParen => {
            let method = parse_function_tail(parser, None)?;
            Ok(Property::KeyValue {
                key,
                value: Expr::Function(method),
            })
        }
        _ if is_name => Ok(Property::Shorthand(key)),
        _ => Err(parser.unexpected("':'")),
    }
}

/// `.name` or `?.name`. Keywords are valid property names.
pub fn parse_member_expr(parser: &mut Parser, left: Expr) -> Result<Expr, Error> {
    let optional = parser.advance().kind == TokenKind::QuestionDot;

    let token = parser.current_token().clone();
    if token.kind != TokenKind::Identifier && !token.kind.is_keyword() {
        return Err(parser.unexpected("property name"));
    }
    parser.advance();

    Ok(Expr::Member(MemberExpr {
        object: Box::new(left),
        property: token.value,
        optional,
    }))
}

pub fn parse_index_expr(parser: &mut Parser, left: Expr) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenBracket)?;
    let index = parse_expr(parser)?;
    parser.expect(TokenKind::CloseBracket)?;

    Ok(Expr::Index(IndexExpr {
        object: Box::new(left),
        index: Box::new(index),
    }))
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut arguments = vec![];

    while parser.current_token_kind() != TokenKind::CloseParen {
        arguments.push(parse_spread_or_expr(parser)?);

        if parser.current_token_kind() != TokenKind::CloseParen {
            parser.expect(TokenKind::Comma)?;
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::Call(CallExpr {
        callee: Box::new(left),
        arguments,
    }))
}
