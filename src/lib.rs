#![allow(clippy::module_inception)]

use std::path::PathBuf;

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;

extern crate regex;

/// A 1-based line and column in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub col: u32,
}

/// Settings for a single compilation.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Directory that contains `stdlib/`, used to resolve bare import names.
    pub stdlib_root: PathBuf,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            stdlib_root: PathBuf::from(env!("CARGO_MANIFEST_DIR")),
        }
    }
}

/// Runs the whole pipeline: tokenize, parse, type check and generate.
///
/// # Arguments
///
/// * `source` - GPJ source text
/// * `options` - Compilation settings
///
/// # Returns
///
/// The generated JavaScript module text, or the first error raised by any phase.
pub fn compile(source: &str, options: &CompileOptions) -> Result<String, Error> {
    let tokens = lexer::lexer::tokenize(source)?;
    let program = parser::parser::parse(tokens)?;
    type_checker::type_checker::check(&program)?;
    compiler::compiler::generate(&program, options)
}

/// Returns the 1-based line number, the text of that line, and the
/// 0-based character offset of `position` within it.
pub fn get_line_at_position(source: &str, position: &Position) -> Option<(usize, String, usize)> {
    let line_text = source.lines().nth(position.line.checked_sub(1)? as usize)?;
    let offset = (position.col.saturating_sub(1) as usize).min(line_text.chars().count());

    Some((position.line as usize, line_text.to_string(), offset))
}

/// Formats a diagnostic for the terminal.
///
/// ```text
/// error: ParseError (Write ` + ` with a space on both sides)
/// -> main.gpj
///   |
/// 2 | let a = 1+ 2;
///   | ---------^
/// ```
///
/// Errors without a position only get the header line.
pub fn render_error(error: &Error, source: &str, file: &str) -> String {
    let mut out = String::new();

    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("error: {}\n", error.get_kind()));
    } else {
        out.push_str(&format!("error: {} ({})\n", error.get_kind(), error.get_tip()));
    }
    out.push_str(&format!("-> {}\n", file));

    let Some(position) = error.get_position() else {
        return out;
    };
    let Some((line, line_text, offset)) = get_line_at_position(source, position) else {
        return out;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    let (trimmed, removed_whitespace) = remove_starting_whitespace(&line_text);
    let arrows = offset.saturating_sub(removed_whitespace) + 1;

    out.push_str(&format!("{:>padding$}\n", "|"));
    out.push_str(&format!("{} | {}\n", line_string, trimmed.trim_end()));
    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));
    out
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string.chars().take_while(|c| *c == ' ' || *c == '\t').count();

    (string.chars().skip(start).collect(), start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::errors::{ErrorImpl, ErrorKind};

    #[test]
    fn test_get_line_at_position() {
        let source = "Hello, world!\nsecond\n\nTesting { }\n";

        let (line_number, line, offset) =
            get_line_at_position(source, &Position { line: 1, col: 11 }).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!");
        assert_eq!(offset, 10);

        let (line_number, line, offset) =
            get_line_at_position(source, &Position { line: 4, col: 9 }).unwrap();
        assert_eq!(line_number, 4);
        assert_eq!(line, "Testing { }");
        assert_eq!(offset, 8);

        assert!(get_line_at_position(source, &Position { line: 9, col: 1 }).is_none());
    }

    #[test]
    fn test_render_error_with_caret() {
        let source = "let a = 1;\n  let b = 1+ 2;\n";
        let error = Error::new(
            ErrorImpl::MissingSpaceBefore {
                operator: "+".to_string(),
            },
            Position { line: 2, col: 12 },
        );

        let rendered = render_error(&error, source, "main.gpj");
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "error: ParseError (Write ` + ` with a space on both sides)");
        assert_eq!(lines[1], "-> main.gpj");
        assert_eq!(lines[2], "  |");
        assert_eq!(lines[3], "2 | let b = 1+ 2;");
        assert_eq!(lines[4], "  | ---------^");
    }

    #[test]
    fn test_render_unlocated_error() {
        let error = Error::unlocated(ErrorImpl::PrivateProperty {
            property: "_x".to_string(),
        });

        let rendered = render_error(&error, "obj._x;", "main.gpj");
        assert_eq!(rendered, "error: TypeCheckError\n-> main.gpj\n");
    }

    #[test]
    fn test_compile_pipeline() {
        let js = compile("let x = 1 + 2;", &CompileOptions::default()).unwrap();

        assert!(js.contains("let x = __gpj_add(1, 2);"));
    }

    #[test]
    fn test_compile_stops_at_first_phase_error() {
        let error = compile("let x = 1+2;", &CompileOptions::default()).unwrap_err();
        assert_eq!(error.get_kind(), ErrorKind::Parse);

        let error = compile("let x: Number = \"a\";", &CompileOptions::default()).unwrap_err();
        assert_eq!(error.get_kind(), ErrorKind::TypeCheck);
    }
}
