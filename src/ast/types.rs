//! Type annotations.
//!
//! Annotations are parsed into this tree and used as-is by the type
//! checker. The same enum doubles as the checker's type descriptor, so
//! inferred types and written types compare structurally.

use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// A primitive (`Number`, `String`, `Boolean`, `None`), an alias name or
    /// a generic parameter.
    Named(String),
    /// `Name<A, B>`
    Generic { name: String, arguments: Vec<Type> },
    /// `{k: T, ...}` in declaration order.
    Object(Vec<(String, Type)>),
    /// `[A, B]`
    Tuple(Vec<Type>),
    /// `A | B`
    Union(Vec<Type>),
    /// `T?`, shorthand for `T | None`.
    Nullable(Box<Type>),
    /// `(A, B) => R`. Inferred function types may know neither side.
    Function {
        parameters: Option<Vec<Type>>,
        return_type: Option<Box<Type>>,
    },
    /// A deliberately type-erased value.
    Unknown,
}

pub const PRIMITIVES: [&str; 4] = ["Number", "String", "Boolean", "None"];

impl Type {
    pub fn named(name: &str) -> Type {
        Type::Named(name.to_string())
    }

    pub fn number() -> Type {
        Type::named("Number")
    }

    pub fn string() -> Type {
        Type::named("String")
    }

    pub fn boolean() -> Type {
        Type::named("Boolean")
    }

    pub fn none() -> Type {
        Type::named("None")
    }

    pub fn array_of(element: Type) -> Type {
        Type::Generic {
            name: String::from("Array"),
            arguments: vec![element],
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Named(name) if PRIMITIVES.contains(&name.as_str()))
    }

    /// The name `typeof` reports at runtime for values of this type. Named
    /// types report their own name; `Unknown` has no single answer.
    pub fn typeof_name(&self) -> Option<&str> {
        match self {
            Type::Named(name) => Some(name.as_str()),
            Type::Generic { name, .. } if name == "Array" => Some("Array"),
            Type::Tuple(_) => Some("Array"),
            Type::Generic { .. } | Type::Object(_) => Some("Object"),
            Type::Function { .. } => Some("Function"),
            Type::Union(_) | Type::Nullable(_) | Type::Unknown => None,
        }
    }

    /// Whether rendering this type inside a union or before `?` needs parentheses.
    fn needs_parens(&self) -> bool {
        matches!(self, Type::Union(_) | Type::Function { .. })
    }
}

fn join(types: &[Type], separator: &str) -> String {
    types
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<String>>()
        .join(separator)
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Named(name) => write!(f, "{}", name),
            Type::Generic { name, arguments } => write!(f, "{}<{}>", name, join(arguments, ", ")),
            Type::Object(fields) => {
                let fields = fields
                    .iter()
                    .map(|(key, value)| format!("{}: {}", key, value))
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "{{{}}}", fields)
            }
            Type::Tuple(elements) => write!(f, "[{}]", join(elements, ", ")),
            Type::Union(members) => {
                let members = members
                    .iter()
                    .map(|member| match member {
                        Type::Function { .. } => format!("({})", member),
                        _ => member.to_string(),
                    })
                    .collect::<Vec<String>>()
                    .join(" | ");
                write!(f, "{}", members)
            }
            Type::Nullable(inner) => {
                if inner.needs_parens() {
                    write!(f, "({})?", inner)
                } else {
                    write!(f, "{}?", inner)
                }
            }
            Type::Function {
                parameters,
                return_type,
            } => {
                let parameters = match parameters {
                    Some(parameters) => format!("({})", join(parameters, ", ")),
                    None => String::from("(...)"),
                };
                match return_type {
                    Some(return_type) => write!(f, "{} => {}", parameters, return_type),
                    None => write!(f, "Function"),
                }
            }
            Type::Unknown => write!(f, "Unknown"),
        }
    }
}
