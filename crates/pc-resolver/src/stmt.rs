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

use crate::expr::{assignable_by_mode, literal_type};
use crate::scope::Scope;
use crate::{Context, Resolver};
use pc_ast::{RecordDef, Stmt, StmtKind, Type};
use pc_errors::{Error, ResolveErrorKind, Result};
use std::rc::Rc;

fn assignable(from: &Type, to: &Type) -> bool {
    from.assignable_without_widening(to) || from.widens_to(to)
}

fn is_scalar(ty: &Type) -> bool {
    matches!(ty, Type::Integer | Type::Real | Type::String | Type::Boolean)
}

/// Conservative RETURN-reachability check, per `spec.md` §4.3
/// ("every path through a function body must reach a RETURN"). Loops are
/// always treated as not guaranteeing a RETURN, even `REPEAT`, which in fact
/// always executes its body once -- a deliberately simple, slightly
/// over-cautious approximation rather than an exact control-flow analysis.
fn stmt_returns(stmt: &Stmt) -> bool {
    match &stmt.kind {
        StmtKind::Return { .. } => true,
        StmtKind::If { then_block, else_block, .. } => {
            !else_block.is_empty() && block_returns(then_block) && block_returns(else_block)
        }
        StmtKind::Case { arms, otherwise, .. } => {
            otherwise.as_ref().is_some_and(|o| stmt_returns(o)) && arms.iter().all(|a| stmt_returns(&a.body))
        }
        _ => false,
    }
}

fn block_returns(stmts: &[Stmt]) -> bool {
    stmts.iter().any(stmt_returns)
}

impl Resolver {
    pub(crate) fn resolve_block(&mut self, stmts: &[Stmt]) -> Result<()> {
        for stmt in stmts {
            self.resolve_stmt(stmt)?;
        }
        Ok(())
    }

    pub(crate) fn resolve_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        match &stmt.kind {
            StmtKind::Declare { name, ty } => self.declare_var(stmt, name, ty.clone()),
            StmtKind::DeclareArray { name, dims, elem } => {
                let ty = Type::Array { elem: Box::new(elem.clone()), dims: dims.clone() };
                self.declare_var(stmt, name, ty)
            }
            StmtKind::TypeDecl { name, fields } => self.declare_record(stmt, name, fields),
            StmtKind::Assign { target, value } => {
                let tty = self.resolve_expr(target)?;
                let vty = self.resolve_expr(value)?;
                if !assignable(&vty, &tty) {
                    return Err(Error::resolve(
                        value.position,
                        ResolveErrorKind::TypeMismatch { expected: tty.to_string(), found: vty.to_string() },
                    ));
                }
                Ok(())
            }
            StmtKind::Output { values } => {
                for value in values {
                    self.resolve_expr(value)?;
                }
                Ok(())
            }
            StmtKind::Input { target } => {
                let ty = self.resolve_expr(target)?;
                if !is_scalar(&ty) {
                    return Err(Error::resolve(
                        target.position,
                        ResolveErrorKind::TypeMismatch {
                            expected: "a scalar INTEGER, REAL, STRING, or BOOLEAN".into(),
                            found: ty.to_string(),
                        },
                    ));
                }
                Ok(())
            }
            StmtKind::If { cond, then_block, else_block } => {
                self.expect_boolean(cond)?;
                self.resolve_block(then_block)?;
                self.resolve_block(else_block)
            }
            StmtKind::Case { scrutinee, arms, otherwise } => {
                let scrutinee_ty = self.resolve_expr(scrutinee)?;
                for arm in arms {
                    let arm_ty = literal_type(&arm.value);
                    if !assignable(&arm_ty, &scrutinee_ty) && !assignable(&scrutinee_ty, &arm_ty) {
                        return Err(Error::resolve(
                            stmt.position,
                            ResolveErrorKind::TypeMismatch { expected: scrutinee_ty.to_string(), found: arm_ty.to_string() },
                        ));
                    }
                    self.resolve_stmt(&arm.body)?;
                }
                if let Some(otherwise) = otherwise {
                    self.resolve_stmt(otherwise)?;
                }
                Ok(())
            }
            StmtKind::While { cond, body } => {
                self.expect_boolean(cond)?;
                self.resolve_block(body)
            }
            StmtKind::Repeat { body, until } => {
                self.resolve_block(body)?;
                self.expect_boolean(until)
            }
            StmtKind::For { var, start, stop, step, body } => {
                let var_ty = self
                    .lookup_var(var)
                    .ok_or_else(|| Error::resolve(stmt.position, ResolveErrorKind::UndeclaredName(var.clone())))?;
                if !var_ty.is_numeric() {
                    return Err(Error::resolve(
                        stmt.position,
                        ResolveErrorKind::TypeMismatch { expected: "a numeric type".into(), found: var_ty.to_string() },
                    ));
                }
                for bound in [Some(start), Some(stop), step.as_ref()].into_iter().flatten() {
                    let bound_ty = self.resolve_expr(bound)?;
                    if !assignable(&bound_ty, &var_ty) {
                        return Err(Error::resolve(
                            bound.position,
                            ResolveErrorKind::TypeMismatch { expected: var_ty.to_string(), found: bound_ty.to_string() },
                        ));
                    }
                }
                self.resolve_block(body)
            }
            StmtKind::ProcedureDecl(decl) => self.resolve_callable(stmt, decl, Context::Procedure),
            StmtKind::FunctionDecl(decl) => {
                let ret = decl.return_type.clone().expect("a FUNCTION declaration always carries a return type");
                self.resolve_callable(stmt, decl, Context::Function(ret))?;
                if !block_returns(&decl.body) {
                    return Err(Error::resolve(stmt.position, ResolveErrorKind::MissingReturn(decl.name.clone())));
                }
                Ok(())
            }
            StmtKind::CallStmt { name, args } => self.resolve_call_args(stmt, name, args),
            StmtKind::Return { value } => {
                let value_ty = self.resolve_expr(value)?;
                match &self.context {
                    Context::Function(ret_ty) => {
                        let ret_ty = ret_ty.clone();
                        if !assignable(&value_ty, &ret_ty) {
                            return Err(Error::resolve(
                                value.position,
                                ResolveErrorKind::TypeMismatch { expected: ret_ty.to_string(), found: value_ty.to_string() },
                            ));
                        }
                        Ok(())
                    }
                    Context::Procedure => Err(Error::resolve(
                        stmt.position,
                        ResolveErrorKind::UnreachableReturn("RETURN is not valid inside a PROCEDURE".into()),
                    )),
                    Context::TopLevel => Err(Error::resolve(
                        stmt.position,
                        ResolveErrorKind::UnreachableReturn("RETURN is not valid outside a FUNCTION".into()),
                    )),
                }
            }
            StmtKind::OpenFile { .. } | StmtKind::CloseFile { .. } => Ok(()),
            StmtKind::ReadFile { target, .. } => {
                let ty = self.resolve_expr(target)?;
                if !is_scalar(&ty) {
                    return Err(Error::resolve(
                        target.position,
                        ResolveErrorKind::TypeMismatch {
                            expected: "a scalar INTEGER, REAL, STRING, or BOOLEAN".into(),
                            found: ty.to_string(),
                        },
                    ));
                }
                Ok(())
            }
            StmtKind::WriteFile { value, .. } => {
                self.resolve_expr(value)?;
                Ok(())
            }
        }
    }

    fn expect_boolean(&mut self, cond: &pc_ast::Expr) -> Result<()> {
        let ty = self.resolve_expr(cond)?;
        if ty != Type::Boolean {
            return Err(Error::resolve(
                cond.position,
                ResolveErrorKind::TypeMismatch { expected: "BOOLEAN".into(), found: ty.to_string() },
            ));
        }
        Ok(())
    }

    fn declare_var(&mut self, stmt: &Stmt, name: &str, ty: Type) -> Result<()> {
        if !self.current_scope_mut().declare(name, ty) {
            return Err(Error::resolve(stmt.position, ResolveErrorKind::DuplicateDeclaration(name.to_string())));
        }
        Ok(())
    }

    fn declare_record(&mut self, stmt: &Stmt, name: &str, fields: &[(String, Type)]) -> Result<()> {
        if self.records.contains_key(name) {
            return Err(Error::resolve(stmt.position, ResolveErrorKind::DuplicateDeclaration(name.to_string())));
        }
        self.records.insert(name.to_string(), RecordDef { name: name.to_string(), fields: fields.to_vec() });
        Ok(())
    }

    fn resolve_callable(&mut self, stmt: &Stmt, decl: &Rc<pc_ast::CallableDecl>, context: Context) -> Result<()> {
        if self.callables.contains_key(&decl.name) {
            return Err(Error::resolve(stmt.position, ResolveErrorKind::DuplicateDeclaration(decl.name.clone())));
        }
        self.callables.insert(decl.name.clone(), decl.clone());

        let previous_local = self.local.replace(Scope::default());
        let previous_context = std::mem::replace(&mut self.context, context);

        let result = (|| {
            for param in &decl.params {
                if !self.current_scope_mut().declare(&param.name, param.ty.clone()) {
                    return Err(Error::resolve(decl.position, ResolveErrorKind::DuplicateDeclaration(param.name.clone())));
                }
            }
            self.resolve_block(&decl.body)
        })();

        self.local = previous_local;
        self.context = previous_context;
        result
    }

    fn resolve_call_args(&mut self, stmt: &Stmt, name: &str, args: &[pc_ast::Expr]) -> Result<()> {
        let (params, modes) = if let Some(decl) = self.callables.get(name).cloned() {
            (
                decl.params.iter().map(|p| p.ty.clone()).collect::<Vec<_>>(),
                decl.params.iter().map(|p| p.mode).collect::<Vec<_>>(),
            )
        } else if let Some(sig) = crate::builtins::lookup(name) {
            (sig.params.to_vec(), sig.params.iter().map(|_| crate::builtins::param_mode()).collect())
        } else {
            return Err(Error::resolve(stmt.position, ResolveErrorKind::UndeclaredName(name.to_string())));
        };

        if params.len() != args.len() {
            return Err(Error::resolve(
                stmt.position,
                ResolveErrorKind::ArityMismatch { name: name.to_string(), expected: params.len(), found: args.len() },
            ));
        }
        for ((arg, param_ty), mode) in args.iter().zip(&params).zip(&modes) {
            let arg_ty = self.resolve_expr(arg)?;
            if *mode == pc_ast::ParamMode::ByRef && !arg.is_variable_reference() {
                return Err(Error::resolve(arg.position, ResolveErrorKind::WrongPassingMode(name.to_string())));
            }
            if !assignable_by_mode(&arg_ty, param_ty, *mode) {
                return Err(Error::resolve(
                    arg.position,
                    ResolveErrorKind::TypeMismatch { expected: param_ty.to_string(), found: arg_ty.to_string() },
                ));
            }
        }
        Ok(())
    }
}
