//! Structural shapes of typed `catch` annotations.
//!
//! A shape is the list of fields a thrown value must carry, each with the
//! primitive type its runtime `typeof` has to report. Both the checker and
//! the code generator resolve annotations through this module.

use crate::ast::types::Type;

use super::environment::AliasTable;

/// `(field, primitive type name)` pairs in declaration order.
pub type Shape = Vec<(String, String)>;

/// Resolves a catch annotation into the shapes it accepts, one per union
/// member. `None` means the annotation cannot be expressed as shapes and the
/// clause catches everything.
pub fn resolve_shapes(type_: &Type, aliases: &AliasTable) -> Option<Vec<Shape>> {
    match aliases.resolve(type_) {
        Type::Object(fields) => {
            let mut shape = Shape::new();
            for (key, value) in fields.iter() {
                let value = aliases.resolve(value);
                match &value {
                    Type::Named(name) if value.is_primitive() => {
                        shape.push((key.clone(), name.clone()))
                    }
                    _ => return None,
                }
            }
            Some(vec![shape])
        }
        Type::Union(members) => {
            let mut shapes = vec![];
            for member in members.iter() {
                shapes.extend(resolve_shapes(member, aliases)?);
            }
            Some(shapes)
        }
        _ => None,
    }
}
