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

use crate::Resolver;
use pc_ast::{BinaryOp, Expr, ExprKind, LiteralValue, ParamMode, Type, UnaryOp};
use pc_errors::{Error, ResolveErrorKind, Result};

pub fn literal_type(value: &LiteralValue) -> Type {
    match value {
        LiteralValue::Integer(_) => Type::Integer,
        LiteralValue::Real(_) => Type::Real,
        LiteralValue::Str(_) => Type::String,
        LiteralValue::Boolean(_) => Type::Boolean,
    }
}

/// `true` when a value of type `from` may appear where `to` is expected,
/// either because the types already match structurally or because `from`
/// widens to `to` (the single INTEGER -> REAL rule from `spec.md` §3).
fn assignable(from: &Type, to: &Type) -> bool {
    from.assignable_without_widening(to) || from.widens_to(to)
}

/// Same as [`assignable`], but for a call argument: `spec.md` §3 restricts
/// INTEGER -> REAL widening to BY_VALUE parameters, since a BYREF parameter
/// binds straight to the caller's storage slot with no coercion at the call
/// site, so a BYREF argument's type must match exactly.
pub(crate) fn assignable_by_mode(from: &Type, to: &Type, mode: ParamMode) -> bool {
    match mode {
        ParamMode::ByRef => from.assignable_without_widening(to),
        ParamMode::ByValue => assignable(from, to),
    }
}

fn mismatch(pos: pc_errors::Position, expected: impl Into<String>, found: &Type) -> Error {
    Error::resolve(pos, ResolveErrorKind::TypeMismatch { expected: expected.into(), found: found.to_string() })
}

impl Resolver {
    pub(crate) fn resolve_expr(&mut self, expr: &Expr) -> Result<Type> {
        let ty = self.type_of(expr)?;
        expr.set_type(ty.clone());
        Ok(ty)
    }

    fn type_of(&mut self, expr: &Expr) -> Result<Type> {
        match &expr.kind {
            ExprKind::Literal(lit) => Ok(literal_type(lit)),
            ExprKind::Name(name) => self
                .lookup_var(name)
                .ok_or_else(|| Error::resolve(expr.position, ResolveErrorKind::UndeclaredName(name.clone()))),
            ExprKind::Unary(op, operand) => {
                let operand_ty = self.resolve_expr(operand)?;
                match op {
                    UnaryOp::Neg => {
                        if !operand_ty.is_numeric() {
                            return Err(mismatch(expr.position, "a numeric type", &operand_ty));
                        }
                        Ok(operand_ty)
                    }
                    UnaryOp::Not => {
                        if operand_ty != Type::Boolean {
                            return Err(mismatch(expr.position, "BOOLEAN", &operand_ty));
                        }
                        Ok(Type::Boolean)
                    }
                }
            }
            ExprKind::Binary(op, lhs, rhs) => self.type_of_binary(expr, *op, lhs, rhs),
            ExprKind::Index(base, indices) => self.type_of_index(expr, base, indices),
            ExprKind::Field(base, field) => self.type_of_field(expr, base, field),
            ExprKind::Call(name, args) => self.type_of_call(expr, name, args),
        }
    }

    fn type_of_binary(&mut self, expr: &Expr, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> Result<Type> {
        let lty = self.resolve_expr(lhs)?;
        let rty = self.resolve_expr(rhs)?;
        match op {
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
                if !lty.is_numeric() {
                    return Err(mismatch(lhs.position, "a numeric type", &lty));
                }
                if !rty.is_numeric() {
                    return Err(mismatch(rhs.position, "a numeric type", &rty));
                }
                if op == BinaryOp::Div || lty == Type::Real || rty == Type::Real {
                    Ok(Type::Real)
                } else {
                    Ok(Type::Integer)
                }
            }
            BinaryOp::And | BinaryOp::Or => {
                if lty != Type::Boolean {
                    return Err(mismatch(lhs.position, "BOOLEAN", &lty));
                }
                if rty != Type::Boolean {
                    return Err(mismatch(rhs.position, "BOOLEAN", &rty));
                }
                Ok(Type::Boolean)
            }
            _ if op.is_equality_only() => {
                if !assignable(&lty, &rty) && !assignable(&rty, &lty) {
                    return Err(mismatch(expr.position, lty.to_string(), &rty));
                }
                Ok(Type::Boolean)
            }
            _ if op.is_relational() => {
                if !lty.is_numeric() {
                    return Err(mismatch(lhs.position, "a numeric type", &lty));
                }
                if !rty.is_numeric() {
                    return Err(mismatch(rhs.position, "a numeric type", &rty));
                }
                Ok(Type::Boolean)
            }
            _ => unreachable!("every BinaryOp is arithmetic, logical, equality, or relational"),
        }
    }

    fn type_of_index(&mut self, expr: &Expr, base: &Expr, indices: &[Expr]) -> Result<Type> {
        let base_ty = self.resolve_expr(base)?;
        let (elem, dims) = match base_ty {
            Type::Array { elem, dims } => (elem, dims),
            other => return Err(mismatch(base.position, "an ARRAY", &other)),
        };
        if indices.len() != dims.len() {
            return Err(Error::resolve(
                expr.position,
                ResolveErrorKind::ArityMismatch { name: "array index".into(), expected: dims.len(), found: indices.len() },
            ));
        }
        for index in indices {
            let ity = self.resolve_expr(index)?;
            if ity != Type::Integer {
                return Err(mismatch(index.position, "INTEGER", &ity));
            }
        }
        Ok(*elem)
    }

    fn type_of_field(&mut self, _expr: &Expr, base: &Expr, field: &str) -> Result<Type> {
        let base_ty = self.resolve_expr(base)?;
        let record_name = match &base_ty {
            Type::Record(name) => name.clone(),
            other => return Err(mismatch(base.position, "a RECORD", other)),
        };
        let def = self
            .records
            .get(&record_name)
            .ok_or_else(|| Error::resolve(base.position, ResolveErrorKind::UndeclaredName(record_name.clone())))?;
        def.field_type(field)
            .cloned()
            .ok_or_else(|| Error::resolve(base.position, ResolveErrorKind::UndeclaredName(field.to_string())))
    }

    fn type_of_call(&mut self, expr: &Expr, name: &str, args: &[Expr]) -> Result<Type> {
        let (params, modes, return_type): (Vec<Type>, Vec<ParamMode>, Option<Type>) =
            if let Some(decl) = self.callables.get(name).cloned() {
                (
                    decl.params.iter().map(|p| p.ty.clone()).collect(),
                    decl.params.iter().map(|p| p.mode).collect(),
                    decl.return_type.clone(),
                )
            } else if let Some(sig) = crate::builtins::lookup(name) {
                (sig.params.to_vec(), sig.params.iter().map(|_| crate::builtins::param_mode()).collect(), Some(sig.return_type))
            } else {
                return Err(Error::resolve(expr.position, ResolveErrorKind::UndeclaredName(name.to_string())));
            };

        if params.len() != args.len() {
            return Err(Error::resolve(
                expr.position,
                ResolveErrorKind::ArityMismatch { name: name.to_string(), expected: params.len(), found: args.len() },
            ));
        }

        for ((arg, param_ty), mode) in args.iter().zip(&params).zip(&modes) {
            let arg_ty = self.resolve_expr(arg)?;
            if *mode == ParamMode::ByRef && !arg.is_variable_reference() {
                return Err(Error::resolve(arg.position, ResolveErrorKind::WrongPassingMode(name.to_string())));
            }
            if !assignable_by_mode(&arg_ty, param_ty, *mode) {
                return Err(mismatch(arg.position, param_ty.to_string(), &arg_ty));
            }
        }

        return_type.ok_or_else(|| {
            Error::resolve(
                expr.position,
                ResolveErrorKind::TypeMismatch { expected: "a function".into(), found: format!("procedure '{name}'") },
            )
        })
    }
}
