use crate::{
    ast::{
        ast::Expr,
        expressions::{
            AssignmentExpr, BinaryExpr, BinaryOperator, CallExpr, FStringPart, FunctionBody,
            FunctionExpr, Property, UnaryOperator,
        },
    },
    errors::errors::{Error, ErrorImpl},
};

use super::{compiler::Compiler, runtime::Helper};

/// Generates JavaScript for the given expression.
pub fn gen_expression(compiler: &mut Compiler, expression: &Expr) -> Result<String, Error> {
    match expression {
        Expr::Number(value) => Ok(value.clone()),
        Expr::String(value) => Ok(quote(value)),
        Expr::FString(parts) => gen_fstring(compiler, parts),
        Expr::Boolean(value) => Ok(value.to_string()),
        Expr::None => Ok(String::from("null")),
        Expr::Identifier(name) => Ok(name.clone()),
        Expr::This => Ok(String::from("this")),
        Expr::Array(elements) => Ok(format!("[{}]", gen_list(compiler, elements)?)),
        Expr::Object(properties) => gen_object(compiler, properties),
        Expr::Spread(_) => Err(Error::unlocated(ErrorImpl::UnsupportedNode {
            node: String::from("spread expression outside of an array, call or object"),
        })),
        Expr::Member(member) => {
            let object = gen_callee(compiler, &member.object)?;
            let dot = if member.optional { "?." } else { "." };
            Ok(format!("{}{}{}", object, dot, member.property))
        }
        Expr::Index(index) => Ok(format!(
            "{}[{}]",
            gen_callee(compiler, &index.object)?,
            gen_expression(compiler, &index.index)?
        )),
        Expr::Call(call) => gen_call(compiler, call),
        Expr::Unary(unary) => {
            let operand = gen_expression(compiler, &unary.operand)?;
            match unary.operator {
                UnaryOperator::Not => Ok(format!("!{}", operand)),
                // `- -x` must not become the decrement operator
                UnaryOperator::Negate if operand.starts_with('-') => Ok(format!("-({})", operand)),
                UnaryOperator::Negate => Ok(format!("-{}", operand)),
                UnaryOperator::Typeof => {
                    compiler.use_helper(Helper::Typeof);
                    Ok(format!("{}({})", Helper::Typeof.name(), operand))
                }
            }
        }
        Expr::Binary(binary) => gen_binary(compiler, binary),
        Expr::Assignment(assignment) => gen_assignment(compiler, assignment),
        Expr::Ternary(ternary) => Ok(format!(
            "({} ? {} : {})",
            gen_expression(compiler, &ternary.condition)?,
            gen_expression(compiler, &ternary.consequent)?,
            gen_expression(compiler, &ternary.alternate)?
        )),
        Expr::Function(function) => gen_function(compiler, function),
        Expr::Grouping(inner) => Ok(format!("({})", gen_expression(compiler, inner)?)),
    }
}

/// Comma separated elements or arguments, where spreads are allowed.
fn gen_list(compiler: &mut Compiler, elements: &[Expr]) -> Result<String, Error> {
    let mut out = vec![];
    for element in elements.iter() {
        out.push(match element {
            Expr::Spread(inner) => format!("...{}", gen_expression(compiler, inner)?),
            element => gen_expression(compiler, element)?,
        });
    }
    Ok(out.join(", "))
}

/// Renders an expression in callee or object position, where function
/// expressions need parentheses.
fn gen_callee(compiler: &mut Compiler, expression: &Expr) -> Result<String, Error> {
    let code = gen_expression(compiler, expression)?;
    match expression {
        Expr::Function(_) | Expr::Number(_) => Ok(format!("({})", code)),
        _ => Ok(code),
    }
}

fn gen_object(compiler: &mut Compiler, properties: &[Property]) -> Result<String, Error> {
    if properties.is_empty() {
        return Ok(String::from("{}"));
    }

    let mut entries = vec![];
    for property in properties.iter() {
        entries.push(match property {
            Property::KeyValue { key, value } => {
                format!("{}: {}", property_key(key), gen_expression(compiler, value)?)
            }
            Property::Shorthand(name) => name.clone(),
            Property::Spread(value) => format!("...{}", gen_expression(compiler, value)?),
        });
    }

    Ok(format!("{{ {} }}", entries.join(", ")))
}

/// Identifier-shaped keys are written bare, anything else is quoted.
pub fn property_key(key: &str) -> String {
    let mut chars = key.chars();
    let is_identifier = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_' || first == '$')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        None => false,
    };

    if is_identifier {
        key.to_string()
    } else {
        quote(key)
    }
}

/// `Map.of(...)` and `Set.of(...)` construct from their arguments.
fn collection_constructor(call: &CallExpr) -> Option<&str> {
    let Expr::Member(member) = call.callee.as_ref() else {
        return None;
    };
    if member.optional || member.property != "of" {
        return None;
    }

    match member.object.as_ref() {
        Expr::Identifier(name) if name == "Map" || name == "Set" => Some(name.as_str()),
        _ => None,
    }
}

fn gen_call(compiler: &mut Compiler, call: &CallExpr) -> Result<String, Error> {
    let arguments = gen_list(compiler, &call.arguments)?;

    if let Some(constructor) = collection_constructor(call) {
        return Ok(format!("new {}([{}])", constructor, arguments));
    }

    Ok(format!("{}({})", gen_callee(compiler, &call.callee)?, arguments))
}

/// Lowers a binary expression. `+` and the arithmetic operators go through
/// their checking helpers, equality through `__gpj_eq`, and everything else
/// stays native inside parentheses.
pub fn gen_binary(compiler: &mut Compiler, binary: &BinaryExpr) -> Result<String, Error> {
    let left = gen_expression(compiler, &binary.left)?;
    let right = gen_expression(compiler, &binary.right)?;

    Ok(lower_binary(compiler, binary.operator, left, right))
}

fn lower_binary(
    compiler: &mut Compiler,
    operator: BinaryOperator,
    left: String,
    right: String,
) -> String {
    match operator {
        BinaryOperator::Add => {
            compiler.use_helper(Helper::Add);
            format!("{}({}, {})", Helper::Add.name(), left, right)
        }
        operator if operator.is_arithmetic() => {
            compiler.use_helper(Helper::Arith);
            format!(
                "{}(\"{}\", {}, {})",
                Helper::Arith.name(),
                operator.symbol(),
                left,
                right
            )
        }
        BinaryOperator::Equals => format!("__gpj_eq({}, {})", left, right),
        BinaryOperator::NotEquals => format!("!__gpj_eq({}, {})", left, right),
        operator => format!("({} {} {})", left, operator.symbol(), right),
    }
}

/// Parameter names for the object and key of a compound member or index
/// assignment.
const ASSIGN_OBJECT: &str = "__gpj_obj";
const ASSIGN_KEY: &str = "__gpj_key";

/// Expressions that can be written twice without changing behaviour.
fn is_repeatable(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Identifier(_) | Expr::This | Expr::Number(_) | Expr::String(_)
    )
}

/// `x op= v` is rewritten to `x = x op v` so the operator is lowered. When
/// the target's object or index has side effects, they are bound once as
/// arguments of an immediately called arrow and the target is rebuilt from
/// the parameters.
fn gen_assignment(compiler: &mut Compiler, assignment: &AssignmentExpr) -> Result<String, Error> {
    let Some(operator) = assignment.operator.binary() else {
        let target = gen_expression(compiler, &assignment.target)?;
        let value = gen_expression(compiler, &assignment.value)?;
        return Ok(format!("{} = {}", target, value));
    };

    let (target, arguments) = match assignment.target.as_ref() {
        Expr::Member(member) if !is_repeatable(&member.object) => {
            let object = gen_expression(compiler, &member.object)?;
            (
                format!("{}.{}", ASSIGN_OBJECT, member.property),
                vec![object],
            )
        }
        Expr::Index(index) if !is_repeatable(&index.object) || !is_repeatable(&index.index) => {
            let object = gen_expression(compiler, &index.object)?;
            let key = gen_expression(compiler, &index.index)?;
            (
                format!("{}[{}]", ASSIGN_OBJECT, ASSIGN_KEY),
                vec![object, key],
            )
        }
        target => (gen_expression(compiler, target)?, vec![]),
    };

    let value = gen_expression(compiler, &assignment.value)?;
    let assigned = format!(
        "{} = {}",
        target,
        lower_binary(compiler, operator, target.clone(), value)
    );

    if arguments.is_empty() {
        return Ok(assigned);
    }

    let params = [ASSIGN_OBJECT, ASSIGN_KEY][..arguments.len()].join(", ");
    Ok(format!("(({}) => {})({})", params, assigned, arguments.join(", ")))
}

/// Renders a function expression, declaration or arrow.
pub fn gen_function(compiler: &mut Compiler, function: &FunctionExpr) -> Result<String, Error> {
    let params = function
        .params
        .iter()
        .map(|param| {
            if param.rest {
                format!("...{}", param.name)
            } else {
                param.name.clone()
            }
        })
        .collect::<Vec<String>>()
        .join(", ");

    let body = match &function.body {
        FunctionBody::Block(body) => compiler.gen_block(body)?,
        FunctionBody::Expression(body) => {
            let code = gen_expression(compiler, body)?;
            if code.starts_with('{') {
                format!("({})", code)
            } else {
                code
            }
        }
    };

    if function.is_arrow {
        return Ok(format!("({}) => {}", params, body));
    }

    match &function.name {
        Some(name) => Ok(format!("function {}({}) {}", name, params, body)),
        None => Ok(format!("function ({}) {}", params, body)),
    }
}

/// Renders an f-string as a template literal. Each interpolation is passed
/// through `String(...)`.
fn gen_fstring(compiler: &mut Compiler, parts: &[FStringPart]) -> Result<String, Error> {
    let mut out = String::from("`");

    for part in parts.iter() {
        match part {
            FStringPart::Text(text) => out.push_str(&escape_template(text)),
            FStringPart::Expr(expr) => {
                out.push_str(&format!("${{String({})}}", gen_expression(compiler, expr)?))
            }
        }
    }

    out.push('`');
    Ok(out)
}

/// Escapes text for a template literal. Every `$` is escaped, which covers
/// `${` split across adjacent text parts.
pub fn escape_template(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '`' => out.push_str("\\`"),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

/// A double-quoted JavaScript string literal.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
