use crate::{
    ast::{
        ast::{Expr, Pattern, Stmt},
        statements::{ElseBranch, IfStmt, ImportSpecifiers, SwitchStmt, TryStmt, VarDeclStmt},
        types::Type,
    },
    errors::errors::Error,
};

use super::{
    compat::check_compat,
    expr::{
        ensure_private_access, function_type, infer_expr, type_check_expr,
        type_check_expr_against, type_check_function,
    },
    narrowing::{narrowed, remainder, typeof_guard, typeof_operand},
    type_checker::TypeChecker,
};

/// Checks statements in the current scope.
fn type_check_body(type_checker: &mut TypeChecker, body: &[Stmt]) -> Result<(), Error> {
    for stmt in body.iter() {
        type_check_stmt(type_checker, stmt)?;
    }
    Ok(())
}

/// Checks statements in a fresh child scope.
pub fn type_check_block(type_checker: &mut TypeChecker, body: &[Stmt]) -> Result<(), Error> {
    type_checker.in_scope(|type_checker| type_check_body(type_checker, body))
}

pub fn type_check_stmt(type_checker: &mut TypeChecker, stmt: &Stmt) -> Result<(), Error> {
    match stmt {
        Stmt::VarDecl(declaration) => type_check_var_decl(type_checker, declaration),
        Stmt::FunctionDecl(function) => {
            let name = function.name.clone().unwrap_or_default();
            ensure_private_access(type_checker, &name)?;

            // Bound before the body so recursive calls see the declared type.
            let declared = function_type(function, function.return_type.clone());
            type_checker.environment.declare(&name, Some(declared));

            let return_type = type_check_function(type_checker, function, false)?;
            let inferred = function_type(function, return_type);
            type_checker.environment.declare(&name, Some(inferred));
            Ok(())
        }
        Stmt::Return(argument) => {
            if let Some(argument) = argument {
                type_check_expr(type_checker, argument)?;
            }

            let declared = type_checker
                .functions
                .last()
                .and_then(|frame| frame.declared.clone());
            if let Some(declared) = declared {
                match argument {
                    Some(argument) => type_check_expr_against(type_checker, argument, &declared)?,
                    None => check_compat(Some(&Type::none()), &declared, &type_checker.aliases)?,
                }
            }

            let inferred = match argument {
                Some(argument) => infer_expr(type_checker, argument),
                None => Some(Type::none()),
            };
            if let Some(frame) = type_checker.functions.last_mut() {
                frame.returns.push(inferred);
            }
            Ok(())
        }
        Stmt::If(if_stmt) => type_check_if(type_checker, if_stmt),
        Stmt::While(while_stmt) => {
            type_check_expr(type_checker, &while_stmt.condition)?;
            type_check_block(type_checker, &while_stmt.body)
        }
        Stmt::DoWhile(do_while) => {
            type_check_block(type_checker, &do_while.body)?;
            type_check_expr(type_checker, &do_while.condition)
        }
        Stmt::For(for_stmt) => type_checker.in_scope(|type_checker| {
            if let Some(init) = &for_stmt.init {
                type_check_stmt(type_checker, init)?;
            }
            if let Some(test) = &for_stmt.test {
                type_check_expr(type_checker, test)?;
            }
            if let Some(update) = &for_stmt.update {
                type_check_expr(type_checker, update)?;
            }
            type_check_block(type_checker, &for_stmt.body)
        }),
        Stmt::ForOf(for_of) => {
            type_check_expr(type_checker, &for_of.iterable)?;
            type_checker.in_scope(|type_checker| {
                for name in for_of.pattern.bound_names() {
                    ensure_private_access(type_checker, &name)?;
                    type_checker.environment.declare(&name, None);
                }
                type_check_body(type_checker, &for_of.body)
            })
        }
        Stmt::Switch(switch) => type_check_switch(type_checker, switch),
        Stmt::Try(try_stmt) => type_check_try(type_checker, try_stmt),
        Stmt::Throw(argument) => type_check_expr(type_checker, argument),
        Stmt::Break | Stmt::Continue => Ok(()),
        Stmt::Import(import) => {
            match &import.specifiers {
                ImportSpecifiers::Named(names) => {
                    for name in names.iter() {
                        let local = name.alias.as_ref().unwrap_or(&name.name);
                        type_checker.environment.declare(local, None);
                    }
                }
                ImportSpecifiers::Namespace(namespace) => {
                    type_checker.environment.declare(namespace, None);
                }
            }
            Ok(())
        }
        Stmt::Export(declaration) => type_check_stmt(type_checker, declaration),
        Stmt::TypeAlias(alias) => {
            type_checker.aliases.define(alias);
            Ok(())
        }
        Stmt::Block(body) => type_check_block(type_checker, body),
        Stmt::Expression(expr) => type_check_expr(type_checker, expr),
    }
}

fn type_check_var_decl(type_checker: &mut TypeChecker, declaration: &VarDeclStmt) -> Result<(), Error> {
    if let Some(init) = &declaration.init {
        type_check_expr(type_checker, init)?;
        if let Some(annotation) = &declaration.type_ {
            type_check_expr_against(type_checker, init, annotation)?;
        }
    }

    for name in declaration.pattern.bound_names() {
        ensure_private_access(type_checker, &name)?;
    }

    match &declaration.pattern {
        Pattern::Identifier(name) => {
            let type_ = match (&declaration.type_, &declaration.init) {
                (Some(annotation), _) => Some(annotation.clone()),
                // `let x = None;` leaves x open for a later assignment
                (None, Some(Expr::None)) | (None, None) => None,
                (None, Some(init)) => infer_expr(type_checker, init),
            };
            type_checker.environment.declare(name, type_);
        }
        pattern => {
            for name in pattern.bound_names() {
                type_checker.environment.declare(&name, None);
            }
        }
    }

    Ok(())
}

/// Checks an if statement, narrowing the guarded identifier in each branch.
/// `else if` chains are checked inside the else scope, so narrowing
/// accumulates along the chain.
fn type_check_if(type_checker: &mut TypeChecker, if_stmt: &IfStmt) -> Result<(), Error> {
    type_check_expr(type_checker, &if_stmt.condition)?;

    let guard = typeof_guard(&if_stmt.condition);
    let (then_type, else_type) = match &guard {
        Some(guard) => {
            let original = type_checker.lookup(&guard.name);
            let matched = Some(narrowed(&guard.type_name));
            let rest = remainder(original.as_ref(), &guard.type_name, &type_checker.aliases);
            if guard.negated {
                (rest, matched)
            } else {
                (matched, rest)
            }
        }
        None => (None, None),
    };

    type_checker.in_scope(|type_checker| {
        if let Some(guard) = &guard {
            type_checker.environment.narrow(&guard.name, then_type);
        }
        type_check_body(type_checker, &if_stmt.consequent)
    })?;

    let Some(alternate) = &if_stmt.alternate else {
        return Ok(());
    };

    type_checker.in_scope(|type_checker| {
        if let Some(guard) = &guard {
            type_checker.environment.narrow(&guard.name, else_type);
        }
        match alternate {
            ElseBranch::If(nested) => type_check_if(type_checker, nested),
            ElseBranch::Block(body) => type_check_body(type_checker, body),
        }
    })
}

/// `switch (typeof x)` narrows `x` in each `case "T":` body.
fn type_check_switch(type_checker: &mut TypeChecker, switch: &SwitchStmt) -> Result<(), Error> {
    type_check_expr(type_checker, &switch.discriminant)?;
    let subject = typeof_operand(&switch.discriminant);

    for case in switch.cases.iter() {
        if let Some(test) = &case.test {
            type_check_expr(type_checker, test)?;
        }

        type_checker.in_scope(|type_checker| {
            if let (Some(name), Some(Expr::String(type_name))) =
                (&subject, case.test.as_ref().map(Expr::unwrap_grouping))
            {
                type_checker
                    .environment
                    .narrow(name, Some(narrowed(type_name)));
            }
            type_check_body(type_checker, &case.body)
        })?;
    }

    Ok(())
}

fn type_check_try(type_checker: &mut TypeChecker, try_stmt: &TryStmt) -> Result<(), Error> {
    type_check_block(type_checker, &try_stmt.block)?;

    for handler in try_stmt.handlers.iter() {
        type_checker.in_scope(|type_checker| {
            type_checker
                .environment
                .declare(&handler.param, handler.type_.clone());
            type_check_body(type_checker, &handler.body)
        })?;
    }

    if let Some(finalizer) = &try_stmt.finalizer {
        type_check_block(type_checker, finalizer)?;
    }

    Ok(())
}
