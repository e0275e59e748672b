//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs including:
//! - Variable declarations and destructuring
//! - Functions and arrows
//! - Operator chains and spacing rules
//! - Control flow statements
//! - Modules and type aliases

use crate::{
    ast::{
        ast::{Expr, Pattern, Program, Stmt},
        expressions::{AssignmentOperator, BinaryOperator, FStringPart, FunctionBody, Property},
        statements::{DeclKind, ElseBranch, ImportSpecifiers},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
    Position,
};

use super::parser::parse;

fn parse_source(source: &str) -> Result<Program, Error> {
    parse(tokenize(source).unwrap())
}

fn parse_ok(source: &str) -> Program {
    parse_source(source).unwrap()
}

fn parse_err(source: &str) -> Error {
    parse_source(source).unwrap_err()
}

fn single_expr(source: &str) -> Expr {
    match parse_ok(source).body.remove(0) {
        Stmt::Expression(expr) => expr,
        other => panic!("expected expression statement, got {:?}", other),
    }
}

#[test]
fn test_parse_variable_declaration() {
    let program = parse_ok("let x = 42;");

    match &program.body[0] {
        Stmt::VarDecl(decl) => {
            assert_eq!(decl.kind, DeclKind::Let);
            assert_eq!(decl.pattern, Pattern::Identifier("x".to_string()));
            assert_eq!(decl.init, Some(Expr::Number("42".to_string())));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_parse_annotated_val() {
    let program = parse_ok("val names: Array<String>? = None;");

    match &program.body[0] {
        Stmt::VarDecl(decl) => {
            assert_eq!(decl.kind, DeclKind::Val);
            assert_eq!(
                decl.type_,
                Some(Type::Nullable(Box::new(Type::array_of(Type::string()))))
            );
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_let_may_omit_initialiser_but_val_may_not() {
    parse_ok("let x: Number;");

    let error = parse_err("val x;");
    assert!(matches!(error.get_internal(), ErrorImpl::UnexpectedToken { .. }));
}

#[test]
fn test_same_operator_chain_folds_left() {
    let expr = single_expr("2 ** 2 ** 3;");

    match expr {
        Expr::Binary(outer) => {
            assert_eq!(outer.operator, BinaryOperator::Power);
            assert_eq!(*outer.right, Expr::Number("3".to_string()));
            assert!(matches!(*outer.left, Expr::Binary(_)));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_mixed_operators_require_parentheses() {
    let error = parse_err("2 + 3 * 4;");

    assert_eq!(
        error.get_internal(),
        &ErrorImpl::MixedOperators {
            left: "+".to_string(),
            right: "*".to_string(),
        }
    );
    assert!(error.to_string().contains("parentheses"));
    assert_eq!(error.get_position(), Some(&Position { line: 1, col: 7 }));

    let expr = single_expr("(2 + 3) * 4;");
    assert!(matches!(expr, Expr::Binary(ref b) if matches!(*b.left, Expr::Grouping(_))));
}

#[test]
fn test_comparisons_never_chain() {
    let error = parse_err("a == b == c;");
    assert!(matches!(error.get_internal(), ErrorImpl::ChainedComparison { .. }));

    let error = parse_err("a < b && c;");
    assert_eq!(
        error.get_internal(),
        &ErrorImpl::ChainedComparison {
            left: "<".to_string(),
            right: "&&".to_string(),
        }
    );

    parse_ok("(a < b) && (c < d);");
}

#[test]
fn test_operator_spacing() {
    let error = parse_err("1+2;");
    assert_eq!(
        error.get_internal(),
        &ErrorImpl::MissingSpaceBefore {
            operator: "+".to_string()
        }
    );
    assert_eq!(error.to_string(), "'+' must be preceded by a space at 1:2");

    let error = parse_err("1 +2;");
    assert_eq!(
        error.get_internal(),
        &ErrorImpl::MissingSpaceAfter {
            operator: "+".to_string()
        }
    );

    let error = parse_err("let x= 1;");
    assert!(matches!(error.get_internal(), ErrorImpl::MissingSpaceBefore { .. }));

    let error = parse_err("x +=1;");
    assert!(matches!(error.get_internal(), ErrorImpl::MissingSpaceAfter { .. }));

    let error = parse_err("let y = c? 1 : 2;");
    assert!(matches!(error.get_internal(), ErrorImpl::MissingSpaceBefore { operator } if operator == "?"));

    parse_ok("1 + 2;");
    parse_ok("let z = -x + !y;");
}

#[test]
fn test_unary_needs_no_spacing() {
    let expr = single_expr("typeof -x.y;");

    match expr {
        Expr::Unary(unary) => assert!(matches!(*unary.operand, Expr::Unary(_))),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_single_pipe_is_rejected_in_expressions() {
    let error = parse_err("a | b;");

    assert_eq!(error.get_internal(), &ErrorImpl::BitwiseOr);
    assert_eq!(error.get_position(), Some(&Position { line: 1, col: 3 }));
}

#[test]
fn test_ternary_and_assignment() {
    let expr = single_expr("x = a ? b : c;");

    match expr {
        Expr::Assignment(assignment) => {
            assert_eq!(assignment.operator, AssignmentOperator::Assign);
            assert!(matches!(*assignment.value, Expr::Ternary(_)));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_invalid_assignment_target() {
    let error = parse_err("f() = 1;");
    assert_eq!(error.get_internal(), &ErrorImpl::InvalidAssignmentTarget);

    parse_ok("a.b[0] **= 2;");
}

#[test]
fn test_arrow_functions() {
    let expr = single_expr("(a: Number, ...rest: Array<Number>): Number => a;");
    match expr {
        Expr::Function(function) => {
            assert!(function.is_arrow);
            assert_eq!(function.params.len(), 2);
            assert!(function.params[1].rest);
            assert_eq!(function.return_type, Some(Type::number()));
            assert!(matches!(function.body, FunctionBody::Expression(_)));
        }
        other => panic!("unexpected {:?}", other),
    }

    let expr = single_expr("x => { return x; };");
    assert!(matches!(expr, Expr::Function(ref f) if matches!(f.body, FunctionBody::Block(_))));
}

#[test]
fn test_parenthesised_expression_is_not_an_arrow() {
    let expr = single_expr("(a);");
    assert_eq!(expr, Expr::Grouping(Box::new(Expr::Identifier("a".to_string()))));

    let expr = single_expr("c ? (a) : b;");
    assert!(matches!(expr, Expr::Ternary(_)));
}

#[test]
fn test_rest_parameter_must_be_last() {
    let error = parse_err("function f(...xs, y) { }");

    assert_eq!(
        error.get_internal(),
        &ErrorImpl::RestNotLast {
            context: "parameter".to_string()
        }
    );
    assert_eq!(error.get_position(), Some(&Position { line: 1, col: 12 }));
}

#[test]
fn test_object_literal_forms() {
    let expr = single_expr(r#"f({a: 1, b, "c-d": 2, default: 3, m(x) { return x; }, ...rest,});"#);

    let Expr::Call(call) = expr else {
        panic!("expected call");
    };
    let Expr::Object(properties) = &call.arguments[0] else {
        panic!("expected object");
    };

    assert_eq!(properties.len(), 6);
    assert!(matches!(&properties[1], Property::Shorthand(name) if name == "b"));
    assert!(matches!(&properties[2], Property::KeyValue { key, .. } if key == "c-d"));
    assert!(matches!(&properties[3], Property::KeyValue { key, .. } if key == "default"));
    assert!(matches!(&properties[4], Property::KeyValue { value: Expr::Function(_), .. }));
    assert!(matches!(&properties[5], Property::Spread(_)));
}

#[test]
fn test_member_access_forms() {
    let expr = single_expr("a?.b.of[0](...xs);");

    let Expr::Call(call) = expr else {
        panic!("expected call");
    };
    assert!(matches!(call.arguments[0], Expr::Spread(_)));
    let Expr::Index(index) = *call.callee else {
        panic!("expected index");
    };
    let Expr::Member(member) = *index.object else {
        panic!("expected member");
    };
    assert_eq!(member.property, "of");
    assert!(matches!(*member.object, Expr::Member(ref m) if m.optional));
}

#[test]
fn test_fstring_parts() {
    let expr = single_expr(r#"f"Hi {name}! {{x}} {a + 1}";"#);

    let Expr::FString(parts) = expr else {
        panic!("expected f-string");
    };
    assert_eq!(parts[0], FStringPart::Text("Hi ".to_string()));
    assert_eq!(parts[1], FStringPart::Expr(Expr::Identifier("name".to_string())));
    assert_eq!(parts[2], FStringPart::Text("! {x} ".to_string()));
    assert!(matches!(parts[3], FStringPart::Expr(Expr::Binary(_))));
}

#[test]
fn test_fstring_interpolation_errors_are_located() {
    let error = parse_err(r#"f"{}";"#);
    assert_eq!(error.get_internal(), &ErrorImpl::EmptyInterpolation);

    let error = parse_err(r#"let s = f"v={a+1}";"#);
    assert_eq!(error.get_position(), Some(&Position { line: 1, col: 15 }));
}

#[test]
fn test_destructuring_patterns() {
    let program = parse_ok("let {x: px, y, inner: [a, b], ...others} = point;");

    let Stmt::VarDecl(decl) = &program.body[0] else {
        panic!("expected declaration");
    };
    assert_eq!(
        decl.pattern.bound_names(),
        vec!["px", "y", "a", "b", "others"]
    );

    let error = parse_err("let [...xs, y] = list;");
    assert!(matches!(error.get_internal(), ErrorImpl::RestNotLast { .. }));
}

#[test]
fn test_if_else_chain() {
    let program = parse_ok("if (a) { x; } else if (b) { y; } else { z; }");

    let Stmt::If(stmt) = &program.body[0] else {
        panic!("expected if");
    };
    let Some(ElseBranch::If(nested)) = &stmt.alternate else {
        panic!("expected else if");
    };
    assert!(matches!(nested.alternate, Some(ElseBranch::Block(_))));
}

#[test]
fn test_loops() {
    let program = parse_ok(
        "while (i < 3) { i += 1; }
         do { i -= 1; } while (i > 0);
         for (let i = 0; i < 3; i += 1) { }
         for (;;) { break; }
         for (val [k, v] of entries) { continue; }",
    );

    assert!(matches!(program.body[0], Stmt::While(_)));
    assert!(matches!(program.body[1], Stmt::DoWhile(_)));
    assert!(matches!(program.body[2], Stmt::For(ref f) if f.init.is_some() && f.update.is_some()));
    assert!(matches!(program.body[3], Stmt::For(ref f) if f.test.is_none()));
    assert!(matches!(program.body[4], Stmt::ForOf(ref f) if f.kind == DeclKind::Val));
}

#[test]
fn test_switch_cases() {
    let program = parse_ok(
        r#"switch (typeof v) { case "Number": a; case "String": b; break; default: c; }"#,
    );

    let Stmt::Switch(switch) = &program.body[0] else {
        panic!("expected switch");
    };
    assert_eq!(switch.cases.len(), 3);
    assert_eq!(switch.cases[1].body.len(), 2);
    assert!(switch.cases[2].test.is_none());
}

#[test]
fn test_try_catch_forms() {
    let program = parse_ok(
        "try { a(); } catch (e: HttpError | ValueError) { } catch (e) { } finally { }",
    );

    let Stmt::Try(stmt) = &program.body[0] else {
        panic!("expected try");
    };
    assert_eq!(stmt.handlers.len(), 2);
    assert!(matches!(stmt.handlers[0].type_, Some(Type::Union(_))));
    assert!(stmt.handlers[1].type_.is_none());
    assert!(stmt.finalizer.is_some());

    parse_ok("try { a(); } finally { b(); }");
}

#[test]
fn test_try_errors() {
    let error = parse_err("try { console.log(1); }");
    assert_eq!(error.get_internal(), &ErrorImpl::MissingCatchOrFinally);
    assert!(error.to_string().contains("catch"));

    let error = parse_err("try { } catch (e) { } catch (e: T) { }");
    assert_eq!(error.get_internal(), &ErrorImpl::CatchAllNotLast);
}

#[test]
fn test_imports() {
    let program = parse_ok(
        r#"import readFile, writeFile as write from "fs";
           import * as proc from "process";"#,
    );

    let Stmt::Import(named) = &program.body[0] else {
        panic!("expected import");
    };
    assert_eq!(named.source, "fs");
    let ImportSpecifiers::Named(names) = &named.specifiers else {
        panic!("expected named import");
    };
    assert_eq!(names[1].alias.as_deref(), Some("write"));

    let Stmt::Import(namespace) = &program.body[1] else {
        panic!("expected import");
    };
    assert_eq!(
        namespace.specifiers,
        ImportSpecifiers::Namespace("proc".to_string())
    );
}

#[test]
fn test_import_errors_name_expectation() {
    let error = parse_err(r#"import a "fs";"#);
    assert!(error.to_string().contains("'from'"));

    let error = parse_err("import a from fs;");
    assert!(error.to_string().contains("module path string"));
}

#[test]
fn test_exports() {
    let program = parse_ok("export function f() { } export val x = 1;");

    assert!(matches!(&program.body[0], Stmt::Export(inner) if matches!(**inner, Stmt::FunctionDecl(_))));
    assert!(matches!(&program.body[1], Stmt::Export(inner) if matches!(**inner, Stmt::VarDecl(_))));

    let error = parse_err("export 1;");
    assert_eq!(error.get_internal(), &ErrorImpl::InvalidExport);
}

#[test]
fn test_type_alias_grammar() {
    let program = parse_ok(
        "type Pair<K, V> = {key: K, value: V};
         type Handler = (req: Request, Number) => Boolean;
         type Maybe = (Number | String)?;
         type Row = [Number, String] | None;",
    );

    let Stmt::TypeAlias(pair) = &program.body[0] else {
        panic!("expected alias");
    };
    assert_eq!(pair.parameters, vec!["K", "V"]);
    assert!(matches!(pair.aliased, Type::Object(ref fields) if fields.len() == 2));

    let Stmt::TypeAlias(handler) = &program.body[1] else {
        panic!("expected alias");
    };
    assert_eq!(handler.aliased.to_string(), "(Request, Number) => Boolean");

    let Stmt::TypeAlias(maybe) = &program.body[2] else {
        panic!("expected alias");
    };
    assert_eq!(maybe.aliased.to_string(), "(Number | String)?");

    let Stmt::TypeAlias(row) = &program.body[3] else {
        panic!("expected alias");
    };
    assert_eq!(row.aliased.to_string(), "[Number, String] | None");
}

#[test]
fn test_unexpected_token_message() {
    let error = parse_err("let = 4;");

    assert_eq!(
        error.to_string(),
        "Expected binding pattern but found '=' at 1:5"
    );
}

#[test]
fn test_unterminated_block() {
    let error = parse_err("function f() { return 1;");

    assert_eq!(
        error.get_internal(),
        &ErrorImpl::UnexpectedToken {
            expected: "'}'".to_string(),
            found: "end of input".to_string(),
        }
    );
}
