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

use crate::stmt::Stmt;
use crate::types::Type;
use pc_errors::Position;

/// BY_VALUE copies the argument into a fresh slot; BY_REFERENCE aliases the
/// argument's storage location for the lifetime of the call, per `spec.md` §3.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamMode {
    ByValue,
    ByRef,
}

#[derive(Clone, Debug)]
pub struct Param {
    pub name: String,
    pub ty: Type,
    pub mode: ParamMode,
}

/// A procedure or function declaration. Functions carry `Some(return_type)`;
/// procedures carry `None`. Shared by the resolver (for signature checks) and
/// the interpreter (for invocation), the way `spec.md` describes a single
/// "callable descriptor".
#[derive(Clone, Debug)]
pub struct CallableDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<Type>,
    pub body: Vec<Stmt>,
    pub position: Position,
}

impl CallableDecl {
    pub fn signature_type(&self) -> Type {
        Type::Callable {
            params: self.params.iter().map(|p| p.ty.clone()).collect(),
            return_type: self.return_type.clone().map(Box::new),
        }
    }
}
