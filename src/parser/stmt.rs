use crate::{
    ast::{
        ast::{Expr, Pattern, Stmt},
        statements::{
            CatchClause, DeclKind, DoWhileStmt, ElseBranch, ForOfStmt, ForStmt, IfStmt,
            ImportName, ImportSpecifiers, ImportStmt, SwitchCase, SwitchStmt, TryStmt,
            TypeAliasStmt, VarDeclStmt, WhileStmt,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{
    expr::{parse_expr, parse_function_tail},
    parser::Parser,
    patterns::parse_pattern,
    types::parse_type,
};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let kind = parser.current_token_kind();
    if let Some(handler) = parser.get_stmt_lookup().get(&kind).copied() {
        return handler(parser);
    }

    parse_expression_stmt(parser)
}

fn parse_expression_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let expr = parse_expr(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Expression(expr))
}

/// Parses `{ stmt* }` and returns the statements.
pub fn parse_block(parser: &mut Parser) -> Result<Vec<Stmt>, Error> {
    parser.expect(TokenKind::OpenCurly)?;

    let mut body = vec![];
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.unexpected("'}'"));
        }
        body.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;
    Ok(body)
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::Block(parse_block(parser)?))
}

fn parse_decl_kind(parser: &mut Parser) -> Result<DeclKind, Error> {
    match parser.current_token_kind() {
        TokenKind::Let => {
            parser.advance();
            Ok(DeclKind::Let)
        }
        TokenKind::Val => {
            parser.advance();
            Ok(DeclKind::Val)
        }
        _ => Err(parser.unexpected("'let' or 'val'")),
    }
}

/// Parses a declaration without its terminating semicolon, so the C-style
/// `for` header can reuse it.
pub fn parse_var_decl(parser: &mut Parser) -> Result<VarDeclStmt, Error> {
    let kind = parse_decl_kind(parser)?;
    let pattern = parse_pattern(parser)?;

    let type_ = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        Some(parse_type(parser)?)
    } else {
        None
    };

    let requires_init = kind == DeclKind::Val || !matches!(pattern, Pattern::Identifier(_));

    let init = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance_spaced()?;
        Some(parse_expr(parser)?)
    } else if requires_init {
        return Err(parser.unexpected("'=' in declaration"));
    } else {
        None
    };

    Ok(VarDeclStmt {
        kind,
        pattern,
        type_,
        init,
    })
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let declaration = parse_var_decl(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::VarDecl(declaration))
}

/// `function name(...) { }`. A nameless `function` at statement start is
/// an expression statement.
pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if parser.peek_token(1).kind != TokenKind::Identifier {
        return parse_expression_stmt(parser);
    }

    parser.expect(TokenKind::Function)?;
    let name = parser.expect(TokenKind::Identifier)?.value;

    Ok(Stmt::FunctionDecl(parse_function_tail(parser, Some(name))?))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.expect(TokenKind::Return)?;

    if parser.current_token_kind() == TokenKind::Semicolon {
        parser.advance();
        return Ok(Stmt::Return(None));
    }

    let argument = parse_expr(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Return(Some(argument)))
}

fn parse_condition(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser)?;
    parser.expect(TokenKind::CloseParen)?;
    Ok(condition)
}

fn parse_if(parser: &mut Parser) -> Result<IfStmt, Error> {
    parser.expect(TokenKind::If)?;
    let condition = parse_condition(parser)?;
    let consequent = parse_block(parser)?;

    let alternate = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        if parser.current_token_kind() == TokenKind::If {
            Some(ElseBranch::If(Box::new(parse_if(parser)?)))
        } else {
            Some(ElseBranch::Block(parse_block(parser)?))
        }
    } else {
        None
    };

    Ok(IfStmt {
        condition,
        consequent,
        alternate,
    })
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::If(parse_if(parser)?))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.expect(TokenKind::While)?;
    let condition = parse_condition(parser)?;
    let body = parse_block(parser)?;

    Ok(Stmt::While(WhileStmt { condition, body }))
}

pub fn parse_do_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.expect(TokenKind::Do)?;
    let body = parse_block(parser)?;
    parser.expect(TokenKind::While)?;
    let condition = parse_condition(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::DoWhile(DoWhileStmt { body, condition }))
}

/// `for (let|val pattern of iterable)` or `for (init; test; update)`.
pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.expect(TokenKind::For)?;
    parser.expect(TokenKind::OpenParen)?;

    if matches!(parser.current_token_kind(), TokenKind::Let | TokenKind::Val) {
        let checkpoint = parser.checkpoint();
        let kind = parse_decl_kind(parser)?;
        let pattern = parse_pattern(parser)?;

        if parser.current_token_kind() == TokenKind::Of {
            parser.advance();
            let iterable = parse_expr(parser)?;
            parser.expect(TokenKind::CloseParen)?;
            let body = parse_block(parser)?;

            return Ok(Stmt::ForOf(ForOfStmt {
                kind,
                pattern,
                iterable,
                body,
            }));
        }

        parser.rewind(checkpoint);
    }

    let init = match parser.current_token_kind() {
        TokenKind::Semicolon => None,
        TokenKind::Let | TokenKind::Val => Some(Box::new(Stmt::VarDecl(parse_var_decl(parser)?))),
        _ => Some(Box::new(Stmt::Expression(parse_expr(parser)?))),
    };
    parser.expect(TokenKind::Semicolon)?;

    let test = if parser.current_token_kind() == TokenKind::Semicolon {
        None
    } else {
        Some(parse_expr(parser)?)
    };
    parser.expect(TokenKind::Semicolon)?;

    let update = if parser.current_token_kind() == TokenKind::CloseParen {
        None
    } else {
        Some(parse_expr(parser)?)
    };
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_block(parser)?;

    Ok(Stmt::For(ForStmt {
        init,
        test,
        update,
        body,
    }))
}

pub fn parse_switch_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.expect(TokenKind::Switch)?;
    let discriminant = parse_condition(parser)?;
    parser.expect(TokenKind::OpenCurly)?;

    let mut cases = vec![];

    while parser.current_token_kind() != TokenKind::CloseCurly {
        let test = match parser.current_token_kind() {
            TokenKind::Case => {
                parser.advance();
                Some(parse_expr(parser)?)
            }
            TokenKind::Default => {
                parser.advance();
                None
            }
            _ => return Err(parser.unexpected("'case', 'default' or '}'")),
        };
        parser.expect(TokenKind::Colon)?;

        let mut body = vec![];
        while !matches!(
            parser.current_token_kind(),
            TokenKind::Case | TokenKind::Default | TokenKind::CloseCurly | TokenKind::EOF
        ) {
            body.push(parse_stmt(parser)?);
        }

        cases.push(SwitchCase { test, body });
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(Stmt::Switch(SwitchStmt {
        discriminant,
        cases,
    }))
}

/// `try { } catch (e: T) { } ... catch (e) { } finally { }`. A catch
/// without a type accepts everything, so it has to be the last one.
pub fn parse_try_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.expect(TokenKind::Try)?;
    let block = parse_block(parser)?;

    let mut handlers: Vec<CatchClause> = vec![];

    while parser.current_token_kind() == TokenKind::Catch {
        if handlers.last().is_some_and(|handler| handler.type_.is_none()) {
            return Err(Error::new(ErrorImpl::CatchAllNotLast, parser.get_position()));
        }

        parser.advance();
        parser.expect(TokenKind::OpenParen)?;
        let param = parser.expect(TokenKind::Identifier)?.value;
        let type_ = if parser.current_token_kind() == TokenKind::Colon {
            parser.advance();
            Some(parse_type(parser)?)
        } else {
            None
        };
        parser.expect(TokenKind::CloseParen)?;
        let body = parse_block(parser)?;

        handlers.push(CatchClause { param, type_, body });
    }

    let finalizer = if parser.current_token_kind() == TokenKind::Finally {
        parser.advance();
        Some(parse_block(parser)?)
    } else {
        None
    };

    if handlers.is_empty() && finalizer.is_none() {
        return Err(Error::new(
            ErrorImpl::MissingCatchOrFinally,
            parser.get_position(),
        ));
    }

    Ok(Stmt::Try(TryStmt {
        block,
        handlers,
        finalizer,
    }))
}

pub fn parse_throw_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.expect(TokenKind::Throw)?;
    let argument = parse_expr(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Throw(argument))
}

pub fn parse_break_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.expect(TokenKind::Break)?;
    parser.expect(TokenKind::Semicolon)?;
    Ok(Stmt::Break)
}

pub fn parse_continue_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.expect(TokenKind::Continue)?;
    parser.expect(TokenKind::Semicolon)?;
    Ok(Stmt::Continue)
}

fn parse_import_name(parser: &mut Parser) -> Result<ImportName, Error> {
    let name = parser.expect(TokenKind::Identifier)?.value;

    let alias = if parser.current_token_kind() == TokenKind::As {
        parser.advance();
        Some(parser.expect(TokenKind::Identifier)?.value)
    } else {
        None
    };

    Ok(ImportName { name, alias })
}

/// `import a, b as c from "path";` or `import * as ns from "path";`
pub fn parse_import_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.expect(TokenKind::Import)?;

    let specifiers = if parser.current_token_kind() == TokenKind::Star {
        parser.advance();
        parser.expect(TokenKind::As)?;
        ImportSpecifiers::Namespace(parser.expect(TokenKind::Identifier)?.value)
    } else {
        let mut names = vec![parse_import_name(parser)?];
        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            names.push(parse_import_name(parser)?);
        }
        ImportSpecifiers::Named(names)
    };

    parser.expect(TokenKind::From)?;

    let error = parser.unexpected("module path string");
    let source = parser.expect_error(TokenKind::String, Some(error))?.value;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Import(ImportStmt { specifiers, source }))
}

pub fn parse_export_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.expect(TokenKind::Export)?;

    let declaration = match parser.current_token_kind() {
        TokenKind::Function if parser.peek_token(1).kind == TokenKind::Identifier => {
            parse_fn_decl_stmt(parser)?
        }
        TokenKind::Let | TokenKind::Val => parse_var_decl_stmt(parser)?,
        _ => return Err(Error::new(ErrorImpl::InvalidExport, parser.get_position())),
    };

    Ok(Stmt::Export(Box::new(declaration)))
}

/// `type Name<K, V> = T;`
pub fn parse_type_alias_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.expect(TokenKind::Type)?;
    let name = parser.expect(TokenKind::Identifier)?.value;

    let mut parameters = vec![];
    if parser.current_token_kind() == TokenKind::Less {
        parser.advance();
        loop {
            parameters.push(parser.expect(TokenKind::Identifier)?.value);
            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
        parser.expect(TokenKind::Greater)?;
    }

    if parser.current_token_kind() != TokenKind::Assignment {
        return Err(parser.unexpected("'='"));
    }
    parser.advance_spaced()?;

    let aliased = parse_type(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::TypeAlias(TypeAliasStmt {
        name,
        parameters,
        aliased,
    }))
}
