//! Main compiler module.
//!
//! This module contains the `Compiler` state and the top level of JavaScript
//! generation: rendering the program body, then prepending the runtime
//! support the body turned out to need.

use std::collections::BTreeSet;

use crate::{
    ast::ast::{Program, Stmt},
    errors::errors::Error,
    type_checker::environment::AliasTable,
    CompileOptions,
};

use super::{
    runtime::{always_emitted, Helper},
    stmt::gen_statement,
};

/// State threaded through one code generation pass.
///
/// A `Compiler` is created per call to [`generate`] and dropped with it, so
/// nothing leaks from one program into the next.
pub struct Compiler<'a> {
    /// Settings for the current compilation
    pub options: &'a CompileOptions,
    /// Type aliases, used to resolve typed `catch` annotations
    pub aliases: AliasTable,
    /// Optional helpers referenced by the body rendered so far
    pub used_helpers: BTreeSet<Helper>,
}

impl<'a> Compiler<'a> {
    /// Creates a new Compiler instance.
    ///
    /// # Arguments
    ///
    /// * `program` - The program about to be generated, scanned for top-level type aliases
    /// * `options` - Settings for this compilation
    pub fn new(program: &Program, options: &'a CompileOptions) -> Self {
        Compiler {
            options,
            aliases: AliasTable::from_program(program),
            used_helpers: BTreeSet::new(),
        }
    }

    /// Marks `helper`, and anything it calls, as needed in the output.
    pub fn use_helper(&mut self, helper: Helper) {
        self.used_helpers.insert(helper);
        for required in helper.requires() {
            self.used_helpers.insert(*required);
        }
    }

    /// Renders statements as a braced block with each line indented.
    pub fn gen_block(&mut self, body: &[Stmt]) -> Result<String, Error> {
        let lines = self.gen_statements(body)?;
        if lines.is_empty() {
            return Ok(String::from("{}"));
        }

        Ok(format!("{{\n{}\n}}", indent(&lines.join("\n"))))
    }

    /// Renders statements in order, skipping those that emit nothing.
    pub fn gen_statements(&mut self, body: &[Stmt]) -> Result<Vec<String>, Error> {
        let mut lines = vec![];
        for stmt in body.iter() {
            let code = gen_statement(self, stmt)?;
            if !code.is_empty() {
                lines.push(code);
            }
        }
        Ok(lines)
    }

    /// The fixed preludes followed by the used optional helpers.
    fn preamble(&self) -> Vec<&'static str> {
        let mut sections = always_emitted().to_vec();
        sections.extend(self.used_helpers.iter().map(Helper::source));
        sections
    }
}

/// Indents every non-empty line by two spaces.
pub fn indent(code: &str) -> String {
    code.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("  {}", line)
            }
        })
        .collect::<Vec<String>>()
        .join("\n")
}

/// Generates the JavaScript module for a type-checked program.
///
/// # Arguments
///
/// * `program` - The program to generate
/// * `options` - Compilation settings, used to resolve stdlib imports
///
/// # Returns
///
/// The module text, or a `Codegen` error for a node that cannot be rendered.
pub fn generate(program: &Program, options: &CompileOptions) -> Result<String, Error> {
    let mut compiler = Compiler::new(program, options);

    // The body goes first so the set of used helpers is complete.
    let body = compiler.gen_statements(&program.body)?;

    let mut out = compiler.preamble().join("\n\n");
    out.push_str("\n\n");
    if !body.is_empty() {
        out.push_str(&body.join("\n"));
        out.push('\n');
    }

    Ok(out)
}
