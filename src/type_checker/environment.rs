//! Lexical scopes and the type alias table.

use std::collections::HashMap;

use crate::ast::{ast::Program, ast::Stmt, statements::TypeAliasStmt, types::Type};

/// Aliases may refer to each other; resolution gives up after this many hops.
const MAX_ALIAS_DEPTH: usize = 32;

/// A name bound in one scope. A type of `None` means it could not be
/// determined.
#[derive(Debug, Clone)]
pub struct Binding {
    pub name: String,
    pub type_: Option<Type>,
    /// Set for the refinement a `typeof` guard introduces. Reads see it,
    /// writes are checked against the declaration underneath.
    pub narrowed: bool,
}

/// One lexical region.
#[derive(Debug, Default)]
pub struct Scope {
    pub parent: Option<usize>,
    pub bindings: Vec<Binding>,
}

/// Arena of scopes linked by parent index. Scopes are pushed and popped in
/// stack order, so the current scope is always the last one.
#[derive(Debug)]
pub struct Environment {
    scopes: Vec<Scope>,
    current: usize,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            scopes: vec![Scope::default()],
            current: 0,
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope {
            parent: Some(self.current),
            bindings: vec![],
        });
        self.current = self.scopes.len() - 1;
    }

    /// Discards the current scope. The root scope is never popped.
    pub fn pop_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current].parent {
            self.scopes.truncate(self.current);
            self.current = parent;
        }
    }

    /// Binds `name` in the current scope, replacing an earlier binding of
    /// the same name in that scope.
    pub fn declare(&mut self, name: &str, type_: Option<Type>) {
        self.bind(name, type_, false);
    }

    /// Refines `name` in the current scope without redeclaring it.
    pub fn narrow(&mut self, name: &str, type_: Option<Type>) {
        self.bind(name, type_, true);
    }

    fn bind(&mut self, name: &str, type_: Option<Type>, narrowed: bool) {
        let scope = &mut self.scopes[self.current];

        match scope.bindings.iter_mut().find(|binding| binding.name == name) {
            Some(binding) => {
                binding.type_ = type_;
                binding.narrowed = narrowed;
            }
            None => scope.bindings.push(Binding {
                name: name.to_string(),
                type_,
                narrowed,
            }),
        }
    }

    /// Indices of the scopes from the current one out to the root.
    fn chain(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(Some(self.current), move |index| self.scopes[*index].parent)
    }

    fn find(&self, name: &str, skip_narrowed: bool) -> Option<&Binding> {
        self.chain().find_map(|index| {
            self.scopes[index]
                .bindings
                .iter()
                .find(|binding| binding.name == name && !(skip_narrowed && binding.narrowed))
        })
    }

    /// Finds the nearest binding of `name`, narrowings included. Unbound
    /// names and undeterminable bindings both give `None`.
    pub fn lookup(&self, name: &str) -> Option<Type> {
        self.find(name, false).and_then(|binding| binding.type_.clone())
    }

    /// The type `name` was declared with, ignoring any narrowing in effect.
    pub fn lookup_declared(&self, name: &str) -> Option<Type> {
        self.find(name, true).and_then(|binding| binding.type_.clone())
    }

    /// Drops the narrowings of `name` still in effect after it is
    /// reassigned, so later reads see the declared type again.
    pub fn widen(&mut self, name: &str) {
        let declared = self.lookup_declared(name);
        let indices: Vec<usize> = self.chain().collect();

        for index in indices {
            let Some(binding) = self.scopes[index]
                .bindings
                .iter_mut()
                .find(|binding| binding.name == name)
            else {
                continue;
            };
            if !binding.narrowed {
                return;
            }
            binding.type_ = declared.clone();
        }
    }

    /// Number of live scopes, including the root.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

/// `type Name<P...> = aliased;`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAlias {
    pub parameters: Vec<String>,
    pub aliased: Type,
}

#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    aliases: HashMap<String, TypeAlias>,
}

impl AliasTable {
    /// Collects every top-level alias so they can be used before their
    /// declaration.
    pub fn from_program(program: &Program) -> Self {
        let mut table = AliasTable::default();

        for stmt in program.body.iter() {
            if let Stmt::TypeAlias(alias) = stmt {
                table.define(alias);
            }
        }

        table
    }

    pub fn define(&mut self, alias: &TypeAliasStmt) {
        self.aliases.insert(
            alias.name.clone(),
            TypeAlias {
                parameters: alias.parameters.clone(),
                aliased: alias.aliased.clone(),
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&TypeAlias> {
        self.aliases.get(name)
    }

    /// Expands aliases at the head of `type_` until it is no longer an alias
    /// reference. Generic aliases have their parameters substituted.
    pub fn resolve(&self, type_: &Type) -> Type {
        let mut resolved = type_.clone();

        for _ in 0..MAX_ALIAS_DEPTH {
            let expanded = match &resolved {
                Type::Named(name) => match self.get(name) {
                    Some(alias) if alias.parameters.is_empty() => alias.aliased.clone(),
                    _ => return resolved,
                },
                Type::Generic { name, arguments } => match self.get(name) {
                    Some(alias) if !alias.parameters.is_empty() => {
                        let bindings: HashMap<&str, &Type> = alias
                            .parameters
                            .iter()
                            .map(|p| p.as_str())
                            .zip(arguments.iter())
                            .collect();
                        substitute(&alias.aliased, &bindings)
                    }
                    _ => return resolved,
                },
                _ => return resolved,
            };
            resolved = expanded;
        }

        resolved
    }
}

/// Replaces generic parameter names inside `type_`.
fn substitute(type_: &Type, bindings: &HashMap<&str, &Type>) -> Type {
    let all = |types: &Vec<Type>| -> Vec<Type> {
        types.iter().map(|t| substitute(t, bindings)).collect()
    };

    match type_ {
        Type::Named(name) => match bindings.get(name.as_str()) {
            Some(bound) => (*bound).clone(),
            None => type_.clone(),
        },
        Type::Generic { name, arguments } => Type::Generic {
            name: name.clone(),
            arguments: all(arguments),
        },
        Type::Object(fields) => Type::Object(
            fields
                .iter()
                .map(|(key, value)| (key.clone(), substitute(value, bindings)))
                .collect(),
        ),
        Type::Tuple(elements) => Type::Tuple(all(elements)),
        Type::Union(members) => Type::Union(all(members)),
        Type::Nullable(inner) => Type::Nullable(Box::new(substitute(inner, bindings))),
        Type::Function {
            parameters,
            return_type,
        } => Type::Function {
            parameters: parameters.as_ref().map(all),
            return_type: return_type
                .as_ref()
                .map(|r| Box::new(substitute(r, bindings))),
        },
        Type::Unknown => Type::Unknown,
    }
}
