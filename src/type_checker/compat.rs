//! Assignment compatibility between two types.
//!
//! The relation is permissive: anything it cannot judge structurally
//! (objects, tuples, functions, generics other than `Array`, unresolved
//! names) is accepted. Only primitives are compared by name.

use crate::{
    ast::types::Type,
    errors::errors::{Error, ErrorImpl},
};

use super::environment::AliasTable;

/// Whether a value of type `actual` may be stored where `expected` is
/// declared.
pub fn is_compat(actual: &Type, expected: &Type, aliases: &AliasTable) -> bool {
    let actual = aliases.resolve(actual);
    let expected = aliases.resolve(expected);

    if expected == Type::Unknown {
        return true;
    }
    if actual == Type::Unknown {
        // Only an `Unknown` member of an expected union takes it.
        return match &expected {
            Type::Union(members) => members
                .iter()
                .any(|member| is_compat(&actual, member, aliases)),
            Type::Nullable(inner) => is_compat(&actual, inner, aliases),
            _ => false,
        };
    }

    match &actual {
        Type::Union(members) => {
            return members
                .iter()
                .all(|member| is_compat(member, &expected, aliases))
        }
        Type::Nullable(inner) => {
            return is_compat(inner, &expected, aliases)
                && is_compat(&Type::none(), &expected, aliases)
        }
        _ => {}
    }

    match &expected {
        Type::Union(members) => {
            return members
                .iter()
                .any(|member| is_compat(&actual, member, aliases))
        }
        Type::Nullable(inner) => {
            return is_compat(&actual, inner, aliases)
                || is_compat(&actual, &Type::none(), aliases)
        }
        _ => {}
    }

    match (&actual, &expected) {
        (Type::Object(_) | Type::Tuple(_) | Type::Function { .. }, _)
        | (_, Type::Object(_) | Type::Tuple(_) | Type::Function { .. }) => true,
        (
            Type::Generic {
                name: actual_name,
                arguments: actual_arguments,
            },
            Type::Generic {
                name: expected_name,
                arguments: expected_arguments,
            },
        ) if actual_name == "Array" && expected_name == "Array" => actual_arguments
            .iter()
            .zip(expected_arguments.iter())
            .all(|(a, e)| is_compat(a, e, aliases)),
        (Type::Generic { .. }, _) | (_, Type::Generic { .. }) => true,
        (Type::Named(actual_name), Type::Named(expected_name))
            if actual.is_primitive() && expected.is_primitive() =>
        {
            actual_name == expected_name
        }
        _ => true,
    }
}

/// Checks an inferred type against a declaration. An undeterminable
/// `actual` always passes.
pub fn check_compat(actual: Option<&Type>, expected: &Type, aliases: &AliasTable) -> Result<(), Error> {
    let Some(actual) = actual else {
        return Ok(());
    };

    if is_compat(actual, expected, aliases) {
        return Ok(());
    }

    if aliases.resolve(actual) == Type::Unknown {
        return Err(Error::unlocated(ErrorImpl::UnknownAssignment {
            expected: expected.to_string(),
        }));
    }

    Err(Error::unlocated(ErrorImpl::TypeMismatch {
        expected: expected.to_string(),
        received: actual.to_string(),
    }))
}

/// Whether `type_` admits `None`, which is what `??` requires of its left
/// operand.
pub fn admits_none(type_: &Type, aliases: &AliasTable) -> bool {
    match aliases.resolve(type_) {
        Type::Unknown | Type::Nullable(_) => true,
        Type::Named(name) => name == "None",
        Type::Union(members) => members.iter().any(|member| admits_none(member, aliases)),
        _ => false,
    }
}
