//! Unit tests for the code generator.

use std::path::PathBuf;

use crate::{
    ast::ast::{Expr, Program, Stmt},
    errors::errors::{ErrorImpl, ErrorKind},
    lexer::lexer::tokenize,
    parser::parser::parse,
    CompileOptions,
};

use super::{
    compiler::generate,
    expr::{escape_template, quote},
    runtime::{ADD_SRC, ARITH_SRC, IS_STRUCT_SRC, TYPEOF_SRC},
    stdlib::resolve_import,
};

fn options() -> CompileOptions {
    CompileOptions {
        stdlib_root: PathBuf::from("/opt/gpj"),
    }
}

fn gen(source: &str) -> String {
    let program = parse(tokenize(source).unwrap()).unwrap();
    generate(&program, &options()).unwrap()
}

/// The generated body, without the runtime preamble.
fn body(source: &str) -> String {
    let js = gen(source);
    let start = js.rfind("\n}\n\n").map(|i| i + 4).unwrap_or(0);
    js[start..].trim_end().to_string()
}

#[test]
fn test_preamble_order() {
    let js = gen("let x = 1;");

    let string = js.find("String.compare").unwrap();
    let json = js.find("JSON.decycle").unwrap();
    let eq = js.find("function __gpj_eq").unwrap();
    let array = js.find("Array.prototype.pop").unwrap();
    assert!(string < json && json < eq && eq < array);

    assert!(js.ends_with("let x = 1;\n"));
}

#[test]
fn test_optional_helpers_only_when_used() {
    let js = gen("let x = 1;");
    assert!(!js.contains(ADD_SRC));
    assert!(!js.contains(ARITH_SRC));
    assert!(!js.contains(TYPEOF_SRC));
    assert!(!js.contains(IS_STRUCT_SRC));

    let js = gen("let x = 1 + 2; let y = 3 - 1;");
    assert!(js.contains(ADD_SRC));
    assert!(js.contains(ARITH_SRC));
    assert!(!js.contains(TYPEOF_SRC));
    assert!(js.find(ADD_SRC).unwrap() < js.find(ARITH_SRC).unwrap());
}

#[test]
fn test_operator_lowering() {
    assert_eq!(body("1 + 2;"), "__gpj_add(1, 2);");
    assert_eq!(body("a - b;"), "__gpj_arith(\"-\", a, b);");
    assert_eq!(body("2 ** 2 ** 3;"), "__gpj_arith(\"**\", __gpj_arith(\"**\", 2, 2), 3);");
    assert_eq!(body("a == b;"), "__gpj_eq(a, b);");
    assert_eq!(body("a != b;"), "!__gpj_eq(a, b);");
    assert_eq!(body("a < b;"), "(a < b);");
    assert_eq!(body("a ?? b;"), "(a ?? b);");
    assert_eq!(body("a && b && c;"), "((a && b) && c);");
}

#[test]
fn test_grouping_preserved() {
    assert_eq!(
        body("(2 + 3) * 4;"),
        "__gpj_arith(\"*\", (__gpj_add(2, 3)), 4);"
    );
}

#[test]
fn test_unary_and_typeof() {
    assert_eq!(body("!a;"), "!a;");
    assert_eq!(body("-a;"), "-a;");
    assert_eq!(body("- -a;"), "-(-a);");

    let js = gen("typeof a;");
    assert!(js.contains(TYPEOF_SRC));
    assert!(js.ends_with("__gpj_typeof(a);\n"));
}

#[test]
fn test_compound_assignment_lowering() {
    assert_eq!(body("x += 1;"), "x = __gpj_add(x, 1);");
    assert_eq!(body("o.n *= 2;"), "o.n = __gpj_arith(\"*\", o.n, 2);");
    assert_eq!(body("x = 1;"), "x = 1;");
}

#[test]
fn test_compound_assignment_evaluates_target_once() {
    assert_eq!(body("xs[i] += 1;"), "xs[i] = __gpj_add(xs[i], 1);");
    assert_eq!(
        body("this.count -= 1;"),
        "this.count = __gpj_arith(\"-\", this.count, 1);"
    );
    assert_eq!(
        body("arr[next()] += 1;"),
        "((__gpj_obj, __gpj_key) => __gpj_obj[__gpj_key] = __gpj_add(__gpj_obj[__gpj_key], 1))(arr, next());"
    );
    assert_eq!(
        body("make().total *= 2;"),
        "((__gpj_obj) => __gpj_obj.total = __gpj_arith(\"*\", __gpj_obj.total, 2))(make());"
    );
    assert_eq!(
        body("a.b[0] += 1;"),
        "((__gpj_obj, __gpj_key) => __gpj_obj[__gpj_key] = __gpj_add(__gpj_obj[__gpj_key], 1))(a.b, 0);"
    );
}

#[test]
fn test_declarations() {
    assert_eq!(body("let x = None;"), "let x = null;");
    assert_eq!(body("let x: Number;"), "let x;");
    assert_eq!(body("val n = 1;"), "const n = 1;");
    assert_eq!(body("val s = \"a\";"), "const s = \"a\";");
    assert_eq!(body("val xs = [1, 2];"), "const xs = Object.freeze([1, 2]);");
    assert_eq!(body("val o = {a: 1};"), "const o = Object.freeze({ a: 1 });");
    assert_eq!(body("val x = y;"), "const x = Object.freeze(y);");
}

#[test]
fn test_destructuring() {
    assert_eq!(
        body("let {a, b: c, ...rest} = o;"),
        "let { a, b: c, ...rest } = o;"
    );
    assert_eq!(body("let [x, [y], ...zs] = xs;"), "let [x, [y], ...zs] = xs;");
    assert_eq!(
        body("for (val [k, v] of pairs) { }"),
        "for (const [k, v] of pairs) {}"
    );
}

#[test]
fn test_fstring_template() {
    assert_eq!(
        body("f\"a{x}b{y + 1}\";"),
        "`a${String(x)}b${String(__gpj_add(y, 1))}`;"
    );
    assert_eq!(body("f\"cost: ${price}\";"), "`cost: \\$${String(price)}`;");
}

#[test]
fn test_escape_helpers() {
    assert_eq!(escape_template("a`b\\c${d}"), "a\\`b\\\\c\\${d}");
    assert_eq!(escape_template("line\nbreak"), "line\\nbreak");
    assert_eq!(quote("say \"hi\"\n"), "\"say \\\"hi\\\"\\n\"");
}

#[test]
fn test_objects_arrays_and_calls() {
    assert_eq!(body("let o = {};"), "let o = {};");
    assert_eq!(
        body("let o = {a: 1, b, ...rest, \"x-y\": 2};"),
        "let o = { a: 1, b, ...rest, \"x-y\": 2 };"
    );
    assert_eq!(body("f(...xs, 1);"), "f(...xs, 1);");
    assert_eq!(body("let xs = [...a, 1];"), "let xs = [...a, 1];");
    assert_eq!(body("a?.b.c[0];"), "a?.b.c[0];");
    assert_eq!(body("({a: 1});"), "({ a: 1 });");
}

#[test]
fn test_collection_constructors() {
    assert_eq!(
        body("let m = Map.of([\"a\", 1], [\"b\", 2]);"),
        "let m = new Map([[\"a\", 1], [\"b\", 2]]);"
    );
    assert_eq!(body("let s = Set.of(1, 2);"), "let s = new Set([1, 2]);");
}

#[test]
fn test_functions() {
    assert_eq!(
        body("function add(a: Number, ...rest: Array<Number>): Number { return a; }"),
        "function add(a, ...rest) {\n  return a;\n}"
    );
    assert_eq!(body("let f = (x) => x;"), "let f = (x) => x;");
    assert_eq!(body("let f = () => ({a: 1});"), "let f = () => ({ a: 1 });");
    assert_eq!(
        body("let o = {get() { return this.x; }};"),
        "let o = { get: function () {\n  return this.x;\n} };"
    );
}

#[test]
fn test_control_flow() {
    assert_eq!(
        body("if (a) { b(); } else if (c) { d(); } else { }"),
        "if (a) {\n  b();\n} else if (c) {\n  d();\n} else {}"
    );
    assert_eq!(
        body("do { i += 1; } while (i < 3);"),
        "do {\n  i = __gpj_add(i, 1);\n} while ((i < 3));"
    );
    assert_eq!(
        body("for (let i = 0; i < 3; i += 1) { }"),
        "for (let i = 0; (i < 3); i = __gpj_add(i, 1)) {}"
    );
    assert_eq!(body("for (;;) { break; }"), "for (;;) {\n  break;\n}");
    assert_eq!(body("while (true) { continue; }"), "while (true) {\n  continue;\n}");
}

#[test]
fn test_switch_cases_wrapped_in_blocks() {
    assert_eq!(
        body("switch (x) { case 1: case 2: let y = x; break; default: z(); }"),
        "switch (x) {\n  case 1:\n  case 2: {\n    let y = x;\n    break;\n  }\n  default: {\n    z();\n  }\n}"
    );
}

#[test]
fn test_single_bare_catch() {
    assert_eq!(
        body("try { f(); } catch (e) { g(e); } finally { h(); }"),
        "try {\n  f();\n} catch (e) {\n  g(e);\n} finally {\n  h();\n}"
    );
    assert_eq!(body("try { } finally { }"), "try {} finally {}");
}

#[test]
fn test_typed_catch_chain_rethrows() {
    let js = gen(
        "type NotFound = {message: String, code: Number};
         try { f(); }
         catch (e: NotFound) { a(e); }
         catch (e: {message: String, value: Number}) { b(e); }",
    );

    assert!(js.contains(IS_STRUCT_SRC));
    assert!(js.contains(TYPEOF_SRC));
    assert!(js.ends_with(
        "try {\n  f();\n} catch (__gpj_err) {\n  if (__gpj_isStruct(__gpj_err, { message: \"String\", code: \"Number\" })) {\n    let e = __gpj_err;\n    a(e);\n  } else if (__gpj_isStruct(__gpj_err, { message: \"String\", value: \"Number\" })) {\n    let e = __gpj_err;\n    b(e);\n  } else {\n    throw __gpj_err;\n  }\n}\n"
    ));
}

#[test]
fn test_typed_catch_union_and_bare_fallback() {
    let js = body(
        "type A = {a: Number};
         type B = {b: String};
         try { } catch (err: A | B) { x(); } catch (other) { y(); }",
    );

    assert_eq!(
        js,
        "try {} catch (__gpj_err) {\n  if (__gpj_isStruct(__gpj_err, { a: \"Number\" }) || __gpj_isStruct(__gpj_err, { b: \"String\" })) {\n    let err = __gpj_err;\n    x();\n  } else {\n    let other = __gpj_err;\n    y();\n  }\n}"
    );
}

#[test]
fn test_unresolvable_catch_annotation_catches_everything() {
    let js = body("try { } catch (e: Missing) { x(); } catch (f: {a: Number}) { y(); }");

    assert_eq!(
        js,
        "try {} catch (__gpj_err) {\n  let e = __gpj_err;\n  x();\n}"
    );
}

#[test]
fn test_imports_and_exports() {
    assert_eq!(
        body("import readFile, writeFile as write from \"fs\";"),
        "import { readFile, writeFile as write } from \"file:///opt/gpj/stdlib/fs.js\";"
    );
    assert_eq!(
        body("import * as util from \"./util\";"),
        "import * as util from \"./util.js\";"
    );
    assert_eq!(
        body("export function f() { } export val x = 1; export let y = 2;"),
        "export function f() {}\nexport const x = 1;\nexport let y = 2;"
    );
}

#[test]
fn test_type_aliases_not_emitted() {
    assert_eq!(body("type Id = Number; let x: Id = 1;"), "let x = 1;");
}

#[test]
fn test_resolve_import() {
    let options = options();

    assert_eq!(resolve_import("./a", &options), "./a.js");
    assert_eq!(resolve_import("../lib/b.js", &options), "../lib/b.js");
    assert_eq!(
        resolve_import("http", &options),
        "file:///opt/gpj/stdlib/http.js"
    );
}

#[test]
fn test_spread_outside_collection_is_codegen_error() {
    let program = Program {
        body: vec![Stmt::Expression(Expr::Spread(Box::new(Expr::Identifier(
            "xs".to_string(),
        ))))],
    };

    let error = generate(&program, &options()).unwrap_err();
    assert_eq!(error.get_kind(), ErrorKind::Codegen);
    assert!(matches!(
        error.get_internal(),
        ErrorImpl::UnsupportedNode { .. }
    ));
    assert!(error.message().starts_with("Cannot generate code for"));
}
