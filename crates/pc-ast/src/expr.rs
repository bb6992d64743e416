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

use crate::token::LiteralValue;
use crate::types::Type;
use pc_errors::Position;
use std::cell::RefCell;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "=",
            BinaryOp::NotEq => "<>",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::LtEq => "<=",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
        };
        write!(f, "{s}")
    }
}

impl BinaryOp {
    /// Relational operators accept only `=`/`<>` on STRING and BOOLEAN
    /// operands, per `spec.md` §4.3.
    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::Lt | BinaryOp::Gt | BinaryOp::LtEq | BinaryOp::GtEq
        )
    }

    pub fn is_equality_only(&self) -> bool {
        matches!(self, BinaryOp::Eq | BinaryOp::NotEq)
    }
}

/// The closed set of expression node shapes from `spec.md` §3.
#[derive(Clone, Debug)]
pub enum ExprKind {
    Literal(LiteralValue),
    Name(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Index(Box<Expr>, Vec<Expr>),
    Field(Box<Expr>, String),
    Call(String, Vec<Expr>),
}

/// An expression node. `resolved_type` starts empty and is filled in by the
/// resolver; by the time the interpreter sees a node, `spec.md`'s invariant
/// guarantees it is `Some`. Interior mutability (rather than a side table
/// keyed by node id) keeps the resolver's single recursive traversal simple,
/// the way the teacher threads per-node metadata directly on the node.
#[derive(Clone, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub position: Position,
    pub resolved_type: RefCell<Option<Type>>,
}

impl Expr {
    pub fn new(kind: ExprKind, position: Position) -> Self {
        Self { kind, position, resolved_type: RefCell::new(None) }
    }

    pub fn set_type(&self, ty: Type) {
        *self.resolved_type.borrow_mut() = Some(ty);
    }

    /// Panics if called before the resolver has run; every call site in the
    /// interpreter runs only on resolver output, so this is an internal
    /// consistency check rather than a user-facing error path.
    pub fn ty(&self) -> Type {
        self.resolved_type
            .borrow()
            .clone()
            .expect("expression type must be resolved before evaluation")
    }

    /// `true` for `Name`, `Index`, and `Field` expressions -- the "variable
    /// reference" expressions `spec.md` requires for assignment targets and
    /// BYREF arguments.
    pub fn is_variable_reference(&self) -> bool {
        matches!(self.kind, ExprKind::Name(_) | ExprKind::Index(..) | ExprKind::Field(..))
    }
}
