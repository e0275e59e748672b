use crate::{
    ast::{
        ast::{Expr, Pattern, Stmt},
        expressions::BinaryOperator,
        statements::{
            CatchClause, DeclKind, ElseBranch, IfStmt, ImportSpecifiers, SwitchStmt, TryStmt,
            VarDeclStmt,
        },
    },
    errors::errors::Error,
    type_checker::shapes::resolve_shapes,
};

use super::{
    compiler::{indent, Compiler},
    expr::{gen_expression, gen_function, property_key, quote},
    runtime::Helper,
    stdlib::resolve_import,
};

/// Name of the single catch binding used by typed catch lowering.
const CAUGHT: &str = "__gpj_err";

/// Generates JavaScript for a statement. Statements that only exist for the
/// type checker render as an empty string.
pub fn gen_statement(compiler: &mut Compiler, statement: &Stmt) -> Result<String, Error> {
    match statement {
        Stmt::VarDecl(declaration) => Ok(format!("{};", gen_var_decl(compiler, declaration)?)),
        Stmt::FunctionDecl(function) => gen_function(compiler, function),
        Stmt::Return(argument) => match argument {
            Some(argument) => Ok(format!("return {};", gen_expression(compiler, argument)?)),
            None => Ok(String::from("return;")),
        },
        Stmt::If(if_stmt) => gen_if(compiler, if_stmt),
        Stmt::While(while_stmt) => Ok(format!(
            "while ({}) {}",
            gen_expression(compiler, &while_stmt.condition)?,
            compiler.gen_block(&while_stmt.body)?
        )),
        Stmt::DoWhile(do_while) => {
            let body = compiler.gen_block(&do_while.body)?;
            Ok(format!(
                "do {} while ({});",
                body,
                gen_expression(compiler, &do_while.condition)?
            ))
        }
        Stmt::For(for_stmt) => {
            let init = match for_stmt.init.as_deref() {
                Some(Stmt::VarDecl(declaration)) => gen_var_decl(compiler, declaration)?,
                Some(Stmt::Expression(expr)) => gen_expression(compiler, expr)?,
                Some(other) => gen_statement(compiler, other)?
                    .trim_end_matches(';')
                    .to_string(),
                None => String::new(),
            };
            let test = match &for_stmt.test {
                Some(test) => format!(" {}", gen_expression(compiler, test)?),
                None => String::new(),
            };
            let update = match &for_stmt.update {
                Some(update) => format!(" {}", gen_expression(compiler, update)?),
                None => String::new(),
            };
            Ok(format!(
                "for ({};{};{}) {}",
                init,
                test,
                update,
                compiler.gen_block(&for_stmt.body)?
            ))
        }
        Stmt::ForOf(for_of) => Ok(format!(
            "for ({} {} of {}) {}",
            declaration_keyword(for_of.kind),
            gen_pattern(&for_of.pattern),
            gen_expression(compiler, &for_of.iterable)?,
            compiler.gen_block(&for_of.body)?
        )),
        Stmt::Switch(switch) => gen_switch(compiler, switch),
        Stmt::Try(try_stmt) => gen_try(compiler, try_stmt),
        Stmt::Throw(argument) => Ok(format!("throw {};", gen_expression(compiler, argument)?)),
        Stmt::Break => Ok(String::from("break;")),
        Stmt::Continue => Ok(String::from("continue;")),
        Stmt::Import(import) => {
            let specifiers = match &import.specifiers {
                ImportSpecifiers::Named(names) => {
                    let names = names
                        .iter()
                        .map(|name| match &name.alias {
                            Some(alias) => format!("{} as {}", name.name, alias),
                            None => name.name.clone(),
                        })
                        .collect::<Vec<String>>()
                        .join(", ");
                    format!("{{ {} }}", names)
                }
                ImportSpecifiers::Namespace(namespace) => format!("* as {}", namespace),
            };
            let source = resolve_import(&import.source, compiler.options);
            Ok(format!("import {} from {};", specifiers, quote(&source)))
        }
        Stmt::Export(declaration) => Ok(format!("export {}", gen_statement(compiler, declaration)?)),
        Stmt::TypeAlias(alias) => {
            compiler.aliases.define(alias);
            Ok(String::new())
        }
        Stmt::Block(body) => compiler.gen_block(body),
        Stmt::Expression(expr) => {
            let code = gen_expression(compiler, expr)?;
            // A leading `{` or `function` would be read as a statement.
            if code.starts_with('{') || code.starts_with("function") {
                Ok(format!("({});", code))
            } else {
                Ok(format!("{};", code))
            }
        }
    }
}

fn declaration_keyword(kind: DeclKind) -> &'static str {
    match kind {
        DeclKind::Let => "let",
        DeclKind::Val => "const",
    }
}

/// `let x = v` or `const x = Object.freeze(v)`, without the semicolon.
fn gen_var_decl(compiler: &mut Compiler, declaration: &VarDeclStmt) -> Result<String, Error> {
    let head = format!(
        "{} {}",
        declaration_keyword(declaration.kind),
        gen_pattern(&declaration.pattern)
    );

    let Some(init) = &declaration.init else {
        return Ok(head);
    };

    let value = gen_expression(compiler, init)?;
    if declaration.kind == DeclKind::Val && !is_primitive_expr(init) {
        return Ok(format!("{} = Object.freeze({})", head, value));
    }

    Ok(format!("{} = {}", head, value))
}

/// Expressions that always evaluate to a primitive and need no freezing.
fn is_primitive_expr(expr: &Expr) -> bool {
    match expr {
        Expr::Number(_)
        | Expr::String(_)
        | Expr::FString(_)
        | Expr::Boolean(_)
        | Expr::None
        | Expr::Unary(_) => true,
        Expr::Binary(binary) => !matches!(
            binary.operator,
            BinaryOperator::And | BinaryOperator::Or | BinaryOperator::Coalesce
        ),
        Expr::Grouping(inner) => is_primitive_expr(inner),
        _ => false,
    }
}

pub fn gen_pattern(pattern: &Pattern) -> String {
    match pattern {
        Pattern::Identifier(name) => name.clone(),
        Pattern::Object { properties, rest } => {
            let mut entries = properties
                .iter()
                .map(|property| match &property.value {
                    Pattern::Identifier(name) if *name == property.key => name.clone(),
                    value => format!("{}: {}", property.key, gen_pattern(value)),
                })
                .collect::<Vec<String>>();
            if let Some(rest) = rest {
                entries.push(format!("...{}", rest));
            }
            if entries.is_empty() {
                return String::from("{}");
            }
            format!("{{ {} }}", entries.join(", "))
        }
        Pattern::Array { elements, rest } => {
            let mut entries = elements.iter().map(gen_pattern).collect::<Vec<String>>();
            if let Some(rest) = rest {
                entries.push(format!("...{}", rest));
            }
            format!("[{}]", entries.join(", "))
        }
    }
}

fn gen_if(compiler: &mut Compiler, if_stmt: &IfStmt) -> Result<String, Error> {
    let mut code = format!(
        "if ({}) {}",
        gen_expression(compiler, &if_stmt.condition)?,
        compiler.gen_block(&if_stmt.consequent)?
    );

    match &if_stmt.alternate {
        Some(ElseBranch::If(nested)) => {
            code.push_str(&format!(" else {}", gen_if(compiler, nested)?));
        }
        Some(ElseBranch::Block(body)) => {
            code.push_str(&format!(" else {}", compiler.gen_block(body)?));
        }
        None => {}
    }

    Ok(code)
}

/// Each non-empty case body gets its own block so `let` bindings in
/// different cases do not collide.
fn gen_switch(compiler: &mut Compiler, switch: &SwitchStmt) -> Result<String, Error> {
    let mut cases = vec![];

    for case in switch.cases.iter() {
        let label = match &case.test {
            Some(test) => format!("case {}:", gen_expression(compiler, test)?),
            None => String::from("default:"),
        };

        if case.body.is_empty() {
            cases.push(label);
        } else {
            cases.push(format!("{} {}", label, compiler.gen_block(&case.body)?));
        }
    }

    let discriminant = gen_expression(compiler, &switch.discriminant)?;
    if cases.is_empty() {
        return Ok(format!("switch ({}) {{}}", discriminant));
    }

    Ok(format!(
        "switch ({}) {{\n{}\n}}",
        discriminant,
        indent(&cases.join("\n"))
    ))
}

fn gen_try(compiler: &mut Compiler, try_stmt: &TryStmt) -> Result<String, Error> {
    let mut code = format!("try {}", compiler.gen_block(&try_stmt.block)?);

    match try_stmt.handlers.as_slice() {
        [] => {}
        [CatchClause {
            param,
            type_: None,
            body,
        }] => {
            code.push_str(&format!(" catch ({}) {}", param, compiler.gen_block(body)?));
        }
        handlers => {
            code.push_str(&format!(" catch ({}) {}", CAUGHT, gen_catch_chain(compiler, handlers)?));
        }
    }

    if let Some(finalizer) = &try_stmt.finalizer {
        code.push_str(&format!(" finally {}", compiler.gen_block(finalizer)?));
    }

    Ok(code)
}

/// Lowers typed catch clauses into one `if / else if` chain over the caught
/// value. Clauses are tested in order. A clause whose annotation has no
/// resolvable shape catches everything, like a bare clause, and ends the
/// chain. Without such a clause the value is re-thrown.
fn gen_catch_chain(compiler: &mut Compiler, handlers: &[CatchClause]) -> Result<String, Error> {
    let mut branches: Vec<(String, String)> = vec![];
    let mut fallback = None;

    for handler in handlers.iter() {
        let shapes = handler
            .type_
            .as_ref()
            .and_then(|type_| resolve_shapes(type_, &compiler.aliases));

        let body = gen_catch_body(compiler, handler)?;
        match shapes {
            Some(shapes) => {
                compiler.use_helper(Helper::IsStruct);
                let guards = shapes
                    .iter()
                    .map(|shape| {
                        let fields = shape
                            .iter()
                            .map(|(field, type_name)| format!("{}: {}", property_key(field), quote(type_name)))
                            .collect::<Vec<String>>();
                        let shape = if fields.is_empty() {
                            String::from("{}")
                        } else {
                            format!("{{ {} }}", fields.join(", "))
                        };
                        format!("{}({}, {})", Helper::IsStruct.name(), CAUGHT, shape)
                    })
                    .collect::<Vec<String>>();
                branches.push((guards.join(" || "), body));
            }
            None => {
                fallback = Some(body);
                break;
            }
        }
    }

    let fallback = fallback.unwrap_or_else(|| format!("{{\n  throw {};\n}}", CAUGHT));
    if branches.is_empty() {
        return Ok(fallback);
    }

    let chain = branches
        .iter()
        .map(|(guard, body)| format!("if ({}) {}", guard, body))
        .collect::<Vec<String>>()
        .join(" else ");

    Ok(format!("{{\n{}\n}}", indent(&format!("{} else {}", chain, fallback))))
}

/// A catch clause body that first rebinds the caught value to the clause's
/// own parameter name.
fn gen_catch_body(compiler: &mut Compiler, handler: &CatchClause) -> Result<String, Error> {
    let mut lines = vec![format!("let {} = {};", handler.param, CAUGHT)];
    lines.extend(compiler.gen_statements(&handler.body)?);

    Ok(format!("{{\n{}\n}}", indent(&lines.join("\n"))))
}
