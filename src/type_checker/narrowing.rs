//! `typeof` guards and the types they narrow to.

use crate::ast::{
    ast::Expr,
    expressions::{BinaryOperator, UnaryOperator},
    types::Type,
};

use super::environment::AliasTable;

/// A condition of the form `typeof name == "T"` or one of its variants.
#[derive(Debug, Clone, PartialEq)]
pub struct Guard {
    pub name: String,
    pub type_name: String,
    /// True for `!=`: the guarded type holds in the else branch.
    pub negated: bool,
}

/// Recognises `typeof x == "T"`, `typeof x != "T"`, `"T" == typeof x` and
/// `"T" != typeof x`, ignoring redundant parentheses.
pub fn typeof_guard(condition: &Expr) -> Option<Guard> {
    let Expr::Binary(binary) = condition.unwrap_grouping() else {
        return None;
    };

    let negated = match binary.operator {
        BinaryOperator::Equals => false,
        BinaryOperator::NotEquals => true,
        _ => return None,
    };

    let left = binary.left.unwrap_grouping();
    let right = binary.right.unwrap_grouping();

    let (name, type_name) = match (typeof_operand(left), right, typeof_operand(right), left) {
        (Some(name), Expr::String(type_name), _, _) => (name, type_name),
        (_, _, Some(name), Expr::String(type_name)) => (name, type_name),
        _ => return None,
    };

    Some(Guard {
        name,
        type_name: type_name.clone(),
        negated,
    })
}

/// The identifier inside `typeof identifier`.
pub fn typeof_operand(expr: &Expr) -> Option<String> {
    match expr.unwrap_grouping() {
        Expr::Unary(unary) if unary.operator == UnaryOperator::Typeof => {
            match unary.operand.unwrap_grouping() {
                Expr::Identifier(name) => Some(name.clone()),
                _ => None,
            }
        }
        _ => None,
    }
}

/// The type a guard establishes in its positive branch.
pub fn narrowed(type_name: &str) -> Type {
    Type::named(type_name)
}

/// Flattens unions and nullables into their members.
fn members(type_: &Type, aliases: &AliasTable) -> Option<Vec<Type>> {
    match aliases.resolve(type_) {
        Type::Union(members) => {
            let mut flat = vec![];
            for member in members.iter() {
                match self::members(member, aliases) {
                    Some(nested) => flat.extend(nested),
                    None => flat.push(aliases.resolve(member)),
                }
            }
            Some(flat)
        }
        Type::Nullable(inner) => {
            let mut flat =
                self::members(&inner, aliases).unwrap_or_else(|| vec![aliases.resolve(&inner)]);
            flat.push(Type::none());
            Some(flat)
        }
        _ => None,
    }
}

/// The type left in the branch where the guard failed. A union or nullable
/// loses every member `typeof` would report as `type_name`, so an `"Array"`
/// guard drops `Array<T>` and tuple members alike. Anything else keeps its
/// original type.
pub fn remainder(original: Option<&Type>, type_name: &str, aliases: &AliasTable) -> Option<Type> {
    let original = original?;

    let Some(members) = members(original, aliases) else {
        return Some(original.clone());
    };

    let mut rest: Vec<Type> = vec![];
    for member in members {
        if member.typeof_name() != Some(type_name) && !rest.contains(&member) {
            rest.push(member);
        }
    }

    match rest.len() {
        0 => None,
        1 => rest.pop(),
        _ => Some(Type::Union(rest)),
    }
}
