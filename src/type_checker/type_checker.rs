use crate::{
    ast::{ast::Program, types::Type},
    errors::errors::Error,
};

use super::{
    environment::{AliasTable, Environment},
    stmt::type_check_stmt,
};

/// Return bookkeeping for the function whose body is being checked.
#[derive(Debug)]
pub struct FunctionFrame {
    /// The declared return type, if any.
    pub declared: Option<Type>,
    /// The inferred type of each `return` seen so far, `None` where the
    /// argument's type could not be determined.
    pub returns: Vec<Option<Type>>,
}

impl FunctionFrame {
    /// The function's return type once its body has been checked. Without an
    /// annotation every return must agree; no returns at all means `None`.
    pub fn return_type(self) -> Option<Type> {
        if self.declared.is_some() {
            return self.declared;
        }

        let mut returns = self.returns.into_iter();
        let Some(first) = returns.next() else {
            return Some(Type::none());
        };

        let first = first?;
        for other in returns {
            if other.as_ref() != Some(&first) {
                return None;
            }
        }

        Some(first)
    }
}

#[derive(Debug, Default)]
pub struct TypeChecker {
    pub environment: Environment,
    pub aliases: AliasTable,
    /// Innermost function last.
    pub functions: Vec<FunctionFrame>,
    /// True while checking code lexically inside an object literal method,
    /// where `_` properties may be accessed.
    pub in_object_method: bool,
}

impl TypeChecker {
    pub fn new(program: &Program) -> Self {
        TypeChecker {
            environment: Environment::new(),
            aliases: AliasTable::from_program(program),
            functions: vec![],
            in_object_method: false,
        }
    }

    /// Runs `f` inside a fresh child scope.
    pub fn in_scope<T>(
        &mut self,
        f: impl FnOnce(&mut TypeChecker) -> Result<T, Error>,
    ) -> Result<T, Error> {
        self.environment.push_scope();
        let result = f(self);
        self.environment.pop_scope();
        result
    }

    /// Looks up the type bound to `name`, if any is known.
    pub fn lookup(&self, name: &str) -> Option<Type> {
        self.environment.lookup(name)
    }

    pub fn resolve(&self, type_: &Type) -> Type {
        self.aliases.resolve(type_)
    }
}

/// Checks a whole program, reporting the first type error.
///
/// # Arguments
///
/// * `program` - The parsed program
///
/// # Returns
///
/// `Ok(())` when the program is well typed. Type errors carry no position.
pub fn check(program: &Program) -> Result<(), Error> {
    let mut type_checker = TypeChecker::new(program);

    for stmt in program.body.iter() {
        type_check_stmt(&mut type_checker, stmt)?;
    }

    Ok(())
}
