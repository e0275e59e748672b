//! Integration tests for end-to-end compilation.
//!
//! Library tests drive the whole pipeline through `gpj::compile`. CLI tests
//! run the `gpj` binary. Execution tests run the generated JavaScript and
//! are skipped when no `node` binary is on the PATH.

use std::{fs, path::Path, process::Command as StdCommand};

use assert_cmd::Command;
use gpj::{compile, errors::errors::ErrorKind, CompileOptions};
use predicates::prelude::*;
use tempfile::tempdir;

fn node_available() -> bool {
    StdCommand::new("node")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

fn gpj() -> Command {
    let mut command = Command::cargo_bin("gpj").unwrap();
    command.env_remove("GPJ_PRESERVE_OUT");
    command
}

fn write_source(dir: &Path, name: &str, source: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, source).unwrap();
    path
}

/// Compiles and runs `source`, returning the command for assertions.
fn run_source(source: &str) -> Option<assert_cmd::assert::Assert> {
    if !node_available() {
        eprintln!("skipping: node is not available");
        return None;
    }

    let dir = tempdir().unwrap();
    let file = write_source(dir.path(), "main.gpj", source);

    Some(gpj().arg(&file).assert())
}

#[test]
fn test_compile_simple_program() {
    let js = compile("let x = 42;", &CompileOptions::default()).unwrap();

    assert!(js.contains("String.compare"));
    assert!(js.ends_with("let x = 42;\n"));
}

#[test]
fn test_compile_reports_first_failing_phase() {
    let options = CompileOptions::default();

    let error = compile("let s = \"open;", &options).unwrap_err();
    assert_eq!(error.get_kind(), ErrorKind::Lex);

    let error = compile("let x = 2 + 3 * 4;", &options).unwrap_err();
    assert_eq!(error.get_kind(), ErrorKind::Parse);
    assert!(error.to_string().contains("parentheses"));

    let error = compile("let x = 1 == 2 == 3;", &options).unwrap_err();
    assert_eq!(error.get_kind(), ErrorKind::Parse);

    let error = compile("let x: Number = 1; x ?? 0;", &options).unwrap_err();
    assert_eq!(error.get_kind(), ErrorKind::TypeCheck);
    assert_eq!(
        error.to_string(),
        "Left side of '??' has type Number, which can never be None"
    );
}

#[test]
fn test_compile_program_with_every_statement_kind() {
    let source = r#"
import readFile from "fs";
type Point = {x: Number, y: Number};

export function norm(p: Point): Number {
    return (p.x * p.x) + (p.y * p.y);
}

val origin: Point = {x: 0, y: 0};
let total = 0;
for (let i = 0; i < 3; i += 1) {
    total += i;
}
for (val [a, b] of [[1, 2]]) {
    total = a + b;
}
while (total > 0) {
    total -= 1;
}
do {
    total += 1;
} while (total < 2);
switch (total) {
    case 2:
        break;
    default:
        total = 0;
}
try {
    throw {code: 1};
} catch (e: {code: Number}) {
    total = e.code;
} finally {
    total = total;
}
"#;

    let js = compile(source, &CompileOptions::default()).unwrap();

    assert!(js.contains("stdlib/fs.js\";"));
    assert!(js.contains("export function norm(p) {"));
    assert!(js.contains("const origin = Object.freeze({ x: 0, y: 0 });"));
    assert!(js.contains("catch (__gpj_err)"));
    assert!(js.contains("function __gpj_isStruct"));
    assert!(!js.contains("type Point"));
}

#[test]
fn test_compile_narrowed_reassignment_and_private_locals() {
    let options = CompileOptions::default();

    let source = "let v: Number | String = 1;\nif (typeof v == \"Number\") {\n    v = \"s\";\n}\n";
    assert!(compile(source, &options).is_ok());

    let error = compile("let _secret = 1;\nlet y = _secret;\n", &options).unwrap_err();
    assert_eq!(error.get_kind(), ErrorKind::TypeCheck);
    assert!(error.to_string().contains("private property"));
}

#[test]
fn test_cli_emit_prints_javascript() {
    let dir = tempdir().unwrap();
    let file = write_source(dir.path(), "main.gpj", "let x = 1 + 2;\n");

    gpj()
        .arg(&file)
        .arg("--emit")
        .assert()
        .success()
        .stdout(predicate::str::contains("let x = __gpj_add(1, 2);"))
        .stdout(predicate::str::contains("function __gpj_add(a, b)"));
}

#[test]
fn test_cli_out_writes_file() {
    let dir = tempdir().unwrap();
    let file = write_source(dir.path(), "main.gpj", "let x = 5 - 1;\n");
    let out = dir.path().join("build").join("main.mjs");

    gpj()
        .arg(&file)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let js = fs::read_to_string(&out).unwrap();
    assert!(js.contains("let x = __gpj_arith(\"-\", 5, 1);"));
}

#[test]
fn test_cli_reports_parse_error() {
    let dir = tempdir().unwrap();
    let file = write_source(dir.path(), "main.gpj", "let x = 1;\nlet y = 1+ 2;\n");

    gpj()
        .arg(&file)
        .arg("--emit")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "gpj: '+' must be preceded by a space at 2:10",
        ))
        .stderr(predicate::str::contains("2 | let y = 1+ 2;"));
}

#[test]
fn test_cli_reports_type_error() {
    let dir = tempdir().unwrap();
    let file = write_source(dir.path(), "main.gpj", "let x: Number = \"a\";\n");

    gpj()
        .arg(&file)
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "gpj: type mismatch: expected Number, got String",
        ))
        .stderr(predicate::str::contains("error: TypeCheckError"));
}

#[test]
fn test_cli_missing_file() {
    gpj()
        .arg("does/not/exist.gpj")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("gpj: failed to read"));
}

#[test]
fn test_cli_uses_stdlib_root() {
    let dir = tempdir().unwrap();
    let file = write_source(dir.path(), "main.gpj", "import * as fs from \"fs\";\n");

    gpj()
        .arg(&file)
        .arg("--emit")
        .arg("--stdlib-root")
        .arg("/srv/gpj")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "import * as fs from \"file:///srv/gpj/stdlib/fs.js\";",
        ));
}

#[test]
fn test_run_power_folds_left() {
    if let Some(assert) = run_source("console.log(2 ** 2 ** 3);\nconsole.log(1 + 2);\n") {
        assert.success().stdout("64\n3\n");
    }
}

#[test]
fn test_run_deep_equality_is_cycle_safe() {
    let source = r#"
let a = {x: 1};
a.self = a;
let b = {x: 1};
b.self = b;
console.log(a == b);
console.log([1, [2, 3]] == [1, [2, 4]]);
console.log([1, 2] != [1, 2]);
"#;

    if let Some(assert) = run_source(source) {
        assert.success().stdout("true\nfalse\nfalse\n");
    }
}

#[test]
fn test_run_compound_assignment_side_effects_once() {
    let source = r#"
let n = 0;
let arr = [10, 20];
let next = function() {
    n += 1;
    return 0;
};
arr[next()] += 1;
console.log(n, arr[0]);
"#;

    if let Some(assert) = run_source(source) {
        assert.success().stdout("1 11\n");
    }
}

#[test]
fn test_run_coalesce_on_nullable() {
    if let Some(assert) = run_source("let x: Number? = None;\nconsole.log(x ?? 0);\n") {
        assert.success().stdout("0\n");
    }
}

#[test]
fn test_run_typed_catch_rethrows_unmatched() {
    let source = r#"
type WithCode = {message: String, code: Number};
type WithValue = {message: String, value: Number};

function attempt(error: Unknown) {
    try {
        try {
            throw error;
        } catch (e: WithCode) {
            console.log(f"code {e.code}");
        } catch (e: WithValue) {
            console.log(f"value {e.value}");
        }
    } catch (outer) {
        console.log(f"outer {outer.message}");
    }
}

attempt({message: "a", code: 1});
attempt({message: "b", value: 2});
attempt({message: "x"});
"#;

    if let Some(assert) = run_source(source) {
        assert.success().stdout("code 1\nvalue 2\nouter x\n");
    }
}

#[test]
fn test_run_unknown_after_narrowing() {
    let source = r#"
let v: Unknown = 5;
if (typeof v == "Number") {
    console.log(v * 2);
}
"#;

    if let Some(assert) = run_source(source) {
        assert.success().stdout("10\n");
    }
}

#[test]
fn test_run_add_rejects_mixed_operands() {
    if let Some(assert) = run_source("let n = 1;\nlet s = \"a\";\nconsole.log(n + s);\n") {
        assert
            .failure()
            .stderr(predicate::str::contains("Cannot use + on number and string"));
    }
}

#[test]
fn test_run_builtin_adjustments() {
    let source = r#"
console.log([1, [2]].indexOf([2]));
console.log([].pop());
console.log("abc".indexOf("z"));
console.log(String.compare("a", "b"));
val frozen = {a: 1};
try {
    frozen.a = 2;
} catch (e) {
    console.log("frozen");
}
try {
    "a,b".split();
} catch (e) {
    console.log("split");
}
"#;

    if let Some(assert) = run_source(source) {
        assert
            .success()
            .stdout("1\nnull\nnull\n-1\nfrozen\nsplit\n");
    }
}

#[test]
fn test_run_json_decycle_and_recycle() {
    let source = r#"
let a = {name: "a"};
a.self = a;
let text = JSON.stringify(JSON.decycle(a));
console.log(text);
let back = JSON.recycle(JSON.parse(text));
console.log(back.self.self.name);
"#;

    if let Some(assert) = run_source(source) {
        assert
            .success()
            .stdout("{\"name\":\"a\",\"self\":{\"$ref\":\"$\"}}\na\n");
    }
}

#[test]
fn test_run_forwards_exit_code() {
    if let Some(assert) = run_source("import exit from \"process\";\nexit(3);\n") {
        assert.code(3);
    }
}

#[test]
fn test_run_preserve_out() {
    if !node_available() {
        return;
    }

    let dir = tempdir().unwrap();
    let file = write_source(dir.path(), "main.gpj", "console.log(\"hi\");\n");

    let output = gpj()
        .arg(&file)
        .env("GPJ_PRESERVE_OUT", "1")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    let path = stderr
        .lines()
        .find_map(|line| line.strip_prefix("gpj: compiled output preserved at: "))
        .unwrap();
    assert!(Path::new(path).ends_with("out.mjs"));
    assert!(fs::read_to_string(path).unwrap().contains("console.log(\"hi\");"));

    if let Some(parent) = Path::new(path).parent() {
        let _ = fs::remove_dir_all(parent);
    }
}

#[test]
fn test_run_stdlib_fs() {
    if !node_available() {
        return;
    }

    let dir = tempdir().unwrap();
    let data = dir.path().join("data.txt");
    let source = format!(
        "import writeFile, readFile, exists from \"fs\";\nwriteFile(\"{0}\", \"hello\");\nconsole.log(exists(\"{0}\"));\nconsole.log(readFile(\"{0}\"));\n",
        data.display()
    );
    let file = write_source(dir.path(), "main.gpj", &source);

    gpj()
        .arg(&file)
        .assert()
        .success()
        .stdout("true\nhello\n");
}

#[test]
fn test_run_relative_module_import() {
    if !node_available() {
        return;
    }

    let dir = tempdir().unwrap();
    let util = write_source(
        dir.path(),
        "util.gpj",
        "export function double(n: Number): Number {\n    return n * 2;\n}\n",
    );
    let main = write_source(
        dir.path(),
        "main.gpj",
        "import double from \"./util\";\nconsole.log(double(21));\n",
    );
    fs::write(dir.path().join("package.json"), "{\"type\": \"module\"}").unwrap();

    gpj()
        .arg(&util)
        .arg("--out")
        .arg(dir.path().join("util.js"))
        .assert()
        .success();
    gpj()
        .arg(&main)
        .arg("--out")
        .arg(dir.path().join("main.js"))
        .assert()
        .success();

    let output = StdCommand::new("node")
        .arg(dir.path().join("main.js"))
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "42\n");
}
