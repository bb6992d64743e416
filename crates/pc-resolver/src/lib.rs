// Copyright (C) 2024 The 9608 Pseudocode Project
// This file is part of the pc9608 library.

// The pc9608 library is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// The pc9608 library is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with the pc9608 library. If not, see <https://www.gnu.org/licenses/>.

//! Static resolver / type-checker, per `spec.md` §4.3. Walks the parsed
//! program once, top to bottom -- the same order the interpreter will later
//! execute it in -- recording each declaration as it is reached and typing
//! every expression in place via [`pc_ast::Expr::set_type`]. Grounded on the
//! teacher's `compiler/passes/src/{symbol_table,type_checker}` pair, but
//! deliberately collapsed into one traversal: 9608 has no forward-declared
//! globals or imports, so there is nothing a separate symbol-table-building
//! pre-pass would gain.

mod builtins;
mod expr;
mod scope;
mod stmt;

use indexmap::IndexMap;
use pc_ast::{CallableDecl, Program, RecordDef, Type};
use pc_errors::Result;
use scope::Scope;
use std::rc::Rc;

/// The RETURN-legality context the resolver is currently inside: top level
/// (no RETURN permitted), a procedure body (no RETURN permitted either), or a
/// function body (RETURN permitted, and must match the carried return type).
enum Context {
    TopLevel,
    Procedure,
    Function(Type),
}

pub struct Resolver {
    records: IndexMap<String, RecordDef>,
    callables: IndexMap<String, Rc<CallableDecl>>,
    global: Scope,
    local: Option<Scope>,
    context: Context,
}

impl Resolver {
    fn new() -> Self {
        Self {
            records: IndexMap::new(),
            callables: IndexMap::new(),
            global: Scope::default(),
            local: None,
            context: Context::TopLevel,
        }
    }

    fn current_scope_mut(&mut self) -> &mut Scope {
        self.local.as_mut().unwrap_or(&mut self.global)
    }

    fn lookup_var(&self, name: &str) -> Option<Type> {
        self.local
            .as_ref()
            .and_then(|s| s.get(name))
            .or_else(|| self.global.get(name))
            .cloned()
    }
}

/// Resolves and type-checks a whole program, mutating every [`pc_ast::Expr`]'s
/// `resolved_type` in place. Once this returns `Ok`, the interpreter may
/// assume every expression node carries a type and every name reference is
/// valid.
#[tracing::instrument(skip_all)]
pub fn resolve(program: &Program) -> Result<()> {
    let mut resolver = Resolver::new();
    resolver.resolve_block(&program.statements)?;
    tracing::debug!("resolved program");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_source(src: &str) -> Result<()> {
        let tokens = pc_lexer::Scanner::scan(src).unwrap();
        let program = pc_parser::parse(tokens).unwrap();
        resolve(&program)
    }

    #[test]
    fn accepts_well_typed_program() {
        assert!(resolve_source("DECLARE X : INTEGER\nX <- 1 + 2").is_ok());
    }

    #[test]
    fn integer_widens_to_real_on_assignment() {
        assert!(resolve_source("DECLARE X : REAL\nX <- 5").is_ok());
    }

    #[test]
    fn rejects_undeclared_name() {
        assert!(resolve_source("X <- 1").is_err());
    }

    #[test]
    fn rejects_duplicate_declaration() {
        assert!(resolve_source("DECLARE X : INTEGER\nDECLARE X : REAL").is_err());
    }

    #[test]
    fn rejects_string_plus_integer() {
        assert!(resolve_source("DECLARE X : STRING\nDECLARE Y : INTEGER\nDECLARE Z : STRING\nZ <- X + Y").is_err());
    }

    #[test]
    fn rejects_return_outside_function() {
        assert!(resolve_source("RETURN 1").is_err());
    }

    #[test]
    fn rejects_return_inside_procedure() {
        assert!(resolve_source("PROCEDURE P()\n  RETURN 1\nENDPROCEDURE").is_err());
    }

    #[test]
    fn rejects_function_missing_return_on_some_path() {
        let src = "FUNCTION F() RETURNS INTEGER\n  DECLARE X : INTEGER\nENDFUNCTION";
        assert!(resolve_source(src).is_err());
    }

    #[test]
    fn accepts_function_returning_on_every_branch() {
        let src = "FUNCTION F(BYVALUE X : INTEGER) RETURNS INTEGER\n  IF X > 0 THEN\n    RETURN 1\n  ELSE\n    RETURN 0\n  ENDIF\nENDFUNCTION";
        assert!(resolve_source(src).is_ok());
    }

    #[test]
    fn rejects_byref_argument_that_is_not_a_variable() {
        let src = "PROCEDURE Inc(BYREF X : INTEGER)\n  X <- X + 1\nENDPROCEDURE\nCALL Inc(1 + 1)";
        assert!(resolve_source(src).is_err());
    }

    #[test]
    fn rejects_array_index_arity_mismatch() {
        let src = "DECLARE A : ARRAY[1:3, 1:3] OF INTEGER\nDECLARE X : INTEGER\nX <- A[1]";
        assert!(resolve_source(src).is_err());
    }

    #[test]
    fn resolves_record_field_access() {
        let src = "TYPE Point\n  DECLARE X : INTEGER\n  DECLARE Y : INTEGER\nENDTYPE\nDECLARE P : Point\nDECLARE N : INTEGER\nN <- P.X";
        assert!(resolve_source(src).is_ok());
    }

    #[test]
    fn rejects_integer_widening_into_a_byref_real_parameter() {
        let src = "PROCEDURE P(BYREF X : REAL)\n  X <- X + 1\nENDPROCEDURE\nDECLARE N : INTEGER\nCALL P(N)";
        assert!(resolve_source(src).is_err());
    }

    #[test]
    fn accepts_integer_widening_into_a_byvalue_real_parameter() {
        let src = "PROCEDURE P(BYVALUE X : REAL)\nENDPROCEDURE\nDECLARE N : INTEGER\nCALL P(N)";
        assert!(resolve_source(src).is_ok());
    }
}
