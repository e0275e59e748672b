use crate::{
    ast::{
        ast::Expr,
        expressions::{
            AssignmentOperator, BinaryOperator, FStringPart, FunctionBody, FunctionExpr,
            MemberExpr, Property, UnaryOperator,
        },
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
};

use super::{
    compat::{admits_none, check_compat},
    stmt::type_check_stmt,
    type_checker::{FunctionFrame, TypeChecker},
};

/// Infers the static type of an expression from literals, bindings and
/// annotated shapes. `None` means the type cannot be determined.
pub fn infer_expr(type_checker: &TypeChecker, expr: &Expr) -> Option<Type> {
    match expr {
        Expr::Number(_) => Some(Type::number()),
        Expr::String(_) | Expr::FString(_) => Some(Type::string()),
        Expr::Boolean(_) => Some(Type::boolean()),
        Expr::None => Some(Type::none()),
        Expr::Identifier(name) => type_checker.lookup(name),
        Expr::Grouping(inner) => infer_expr(type_checker, inner),
        Expr::Array(elements) => match elements.first() {
            Some(Expr::Spread(_)) | None => None,
            Some(first) => infer_expr(type_checker, first).map(Type::array_of),
        },
        Expr::Call(call) => {
            let callee = infer_expr(type_checker, &call.callee)?;
            match type_checker.resolve(&callee) {
                Type::Function {
                    return_type: Some(return_type),
                    ..
                } => Some(*return_type),
                _ => None,
            }
        }
        Expr::Member(member) => field_type(type_checker, member),
        _ => None,
    }
}

/// The declared type of `object.property` when the object has an object type.
fn field_type(type_checker: &TypeChecker, member: &MemberExpr) -> Option<Type> {
    let object = infer_expr(type_checker, &member.object)?;

    match type_checker.resolve(&object) {
        Type::Object(fields) => fields
            .into_iter()
            .find(|(key, _)| *key == member.property)
            .map(|(_, type_)| type_),
        _ => None,
    }
}

/// Checks `expr` against a declared type. Array literals are checked element
/// by element against `Array<E>`.
pub fn type_check_expr_against(
    type_checker: &TypeChecker,
    expr: &Expr,
    expected: &Type,
) -> Result<(), Error> {
    if let Expr::Array(elements) = expr.unwrap_grouping() {
        if let Type::Generic { name, arguments } = type_checker.resolve(expected) {
            if name == "Array" && arguments.len() == 1 {
                for element in elements.iter() {
                    if !matches!(element, Expr::Spread(_)) {
                        type_check_expr_against(type_checker, element, &arguments[0])?;
                    }
                }
                return Ok(());
            }
        }
    }

    check_compat(
        infer_expr(type_checker, expr).as_ref(),
        expected,
        &type_checker.aliases,
    )
}

/// Rejects operands whose static type is `Unknown`.
fn ensure_known(type_checker: &TypeChecker, expr: &Expr, operator: &str) -> Result<(), Error> {
    let Some(type_) = infer_expr(type_checker, expr) else {
        return Ok(());
    };

    if type_checker.resolve(&type_) == Type::Unknown {
        return Err(Error::unlocated(ErrorImpl::UnknownOperand {
            operator: operator.to_string(),
        }));
    }

    Ok(())
}

/// Names starting with `_` are private. They may only be used, as a
/// property or as a local, inside an object literal method.
pub fn ensure_private_access(type_checker: &TypeChecker, name: &str) -> Result<(), Error> {
    if name.starts_with('_') && !type_checker.in_object_method {
        return Err(Error::unlocated(ErrorImpl::PrivateProperty {
            property: name.to_string(),
        }));
    }
    Ok(())
}

/// Checks a member access. `as_value` is false in callee and assignment
/// target position, where function-typed properties are allowed.
fn type_check_member(
    type_checker: &mut TypeChecker,
    member: &MemberExpr,
    as_value: bool,
) -> Result<(), Error> {
    type_check_expr(type_checker, &member.object)?;
    ensure_private_access(type_checker, &member.property)?;

    if as_value {
        if let Some(field) = field_type(type_checker, member) {
            if let Type::Function { .. } = type_checker.resolve(&field) {
                return Err(Error::unlocated(ErrorImpl::MethodAsValue {
                    property: member.property.clone(),
                }));
            }
        }
    }

    Ok(())
}

/// Walks an expression and reports the first type error in it.
pub fn type_check_expr(type_checker: &mut TypeChecker, expr: &Expr) -> Result<(), Error> {
    match expr {
        Expr::Number(_)
        | Expr::String(_)
        | Expr::Boolean(_)
        | Expr::None
        | Expr::This => Ok(()),
        Expr::Identifier(name) => ensure_private_access(type_checker, name),
        Expr::FString(parts) => {
            for part in parts.iter() {
                if let FStringPart::Expr(expr) = part {
                    type_check_expr(type_checker, expr)?;
                }
            }
            Ok(())
        }
        Expr::Array(elements) => {
            for element in elements.iter() {
                type_check_expr(type_checker, element)?;
            }
            Ok(())
        }
        Expr::Object(properties) => {
            for property in properties.iter() {
                match property {
                    Property::KeyValue {
                        value: Expr::Function(method),
                        ..
                    } => {
                        type_check_function(type_checker, method, true)?;
                    }
                    Property::KeyValue { value, .. } => type_check_expr(type_checker, value)?,
                    Property::Spread(value) => type_check_expr(type_checker, value)?,
                    Property::Shorthand(name) => ensure_private_access(type_checker, name)?,
                }
            }
            Ok(())
        }
        Expr::Spread(inner) | Expr::Grouping(inner) => type_check_expr(type_checker, inner),
        Expr::Member(member) => type_check_member(type_checker, member, true),
        Expr::Index(index) => {
            type_check_expr(type_checker, &index.object)?;
            type_check_expr(type_checker, &index.index)
        }
        Expr::Call(call) => {
            match call.callee.unwrap_grouping() {
                Expr::Member(member) => type_check_member(type_checker, member, false)?,
                callee => type_check_expr(type_checker, callee)?,
            }
            for argument in call.arguments.iter() {
                type_check_expr(type_checker, argument)?;
            }
            Ok(())
        }
        Expr::Unary(unary) => {
            type_check_expr(type_checker, &unary.operand)?;
            match unary.operator {
                UnaryOperator::Typeof => Ok(()),
                operator => ensure_known(type_checker, &unary.operand, operator.symbol()),
            }
        }
        Expr::Binary(binary) => {
            type_check_expr(type_checker, &binary.left)?;
            type_check_expr(type_checker, &binary.right)?;

            match binary.operator {
                BinaryOperator::And | BinaryOperator::Or => Ok(()),
                BinaryOperator::Coalesce => {
                    if let Some(left) = infer_expr(type_checker, &binary.left) {
                        if !admits_none(&left, &type_checker.aliases) {
                            return Err(Error::unlocated(ErrorImpl::NonNullableCoalesce {
                                type_: left.to_string(),
                            }));
                        }
                    }
                    Ok(())
                }
                operator => {
                    ensure_known(type_checker, &binary.left, operator.symbol())?;
                    ensure_known(type_checker, &binary.right, operator.symbol())
                }
            }
        }
        Expr::Assignment(assignment) => {
            match assignment.target.as_ref() {
                Expr::Member(member) => type_check_member(type_checker, member, false)?,
                target => type_check_expr(type_checker, target)?,
            }
            type_check_expr(type_checker, &assignment.value)?;

            if assignment.operator != AssignmentOperator::Assign {
                let symbol = assignment.operator.symbol();
                ensure_known(type_checker, &assignment.target, symbol)?;
                return ensure_known(type_checker, &assignment.value, symbol);
            }

            if let Expr::Identifier(name) = assignment.target.as_ref() {
                if let Some(declared) = type_checker.environment.lookup_declared(name) {
                    type_check_expr_against(type_checker, &assignment.value, &declared)?;
                }
                type_checker.environment.widen(name);
            }
            Ok(())
        }
        Expr::Ternary(ternary) => {
            type_check_expr(type_checker, &ternary.condition)?;
            type_check_expr(type_checker, &ternary.consequent)?;
            type_check_expr(type_checker, &ternary.alternate)
        }
        Expr::Function(function) => type_check_function(type_checker, function, false).map(|_| ()),
    }
}

/// The type bound to a function's name.
pub fn function_type(function: &FunctionExpr, return_type: Option<Type>) -> Type {
    Type::Function {
        parameters: Some(
            function
                .params
                .iter()
                .map(|param| param.type_.clone().unwrap_or(Type::Unknown))
                .collect(),
        ),
        return_type: return_type.map(Box::new),
    }
}

/// Checks a function body in its own scope and returns the function's
/// declared or inferred return type.
///
/// `is_method` marks functions written as object literal property values.
/// Those may touch `_` properties, arrows inherit the permission from their
/// surroundings and every other function loses it.
pub fn type_check_function(
    type_checker: &mut TypeChecker,
    function: &FunctionExpr,
    is_method: bool,
) -> Result<Option<Type>, Error> {
    let enclosing_method = type_checker.in_object_method;
    type_checker.in_object_method = is_method || (function.is_arrow && enclosing_method);
    type_checker.functions.push(FunctionFrame {
        declared: function.return_type.clone(),
        returns: vec![],
    });

    let result = type_checker.in_scope(|type_checker| {
        if let Some(name) = &function.name {
            let own_type = function_type(function, function.return_type.clone());
            type_checker.environment.declare(name, Some(own_type));
        }
        for param in function.params.iter() {
            ensure_private_access(type_checker, &param.name)?;
            type_checker
                .environment
                .declare(&param.name, param.type_.clone());
        }

        match &function.body {
            FunctionBody::Block(body) => {
                for stmt in body.iter() {
                    type_check_stmt(type_checker, stmt)?;
                }
            }
            FunctionBody::Expression(body) => {
                type_check_expr(type_checker, body)?;
                if let Some(declared) = &function.return_type {
                    type_check_expr_against(type_checker, body, declared)?;
                }
                let inferred = infer_expr(type_checker, body);
                if let Some(frame) = type_checker.functions.last_mut() {
                    frame.returns.push(inferred);
                }
            }
        }
        Ok(())
    });

    let frame = type_checker.functions.pop();
    type_checker.in_object_method = enclosing_method;
    result?;

    Ok(frame.and_then(FunctionFrame::return_type))
}
