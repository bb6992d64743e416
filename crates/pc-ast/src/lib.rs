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

//! Token, type, and AST node model shared by the parser, resolver, and
//! interpreter -- `spec.md`'s "Token & position model" and "Value & type
//! model" (the static half; runtime [`crate::token::LiteralValue`] values
//! become `pc_interpreter::Value` once the interpreter takes over).

pub mod callable;
pub mod expr;
pub mod stmt;
pub mod token;
pub mod types;

pub use callable::{CallableDecl, Param, ParamMode};
pub use expr::{BinaryOp, Expr, ExprKind, UnaryOp};
pub use stmt::{CaseArm, FileMode, Program, Stmt, StmtKind};
pub use token::{keyword_token, LiteralValue, Token, TokenKind};
pub use types::{Bound, Type};

/// A user-declared `TYPE ... ENDTYPE` record definition.
#[derive(Clone, Debug)]
pub struct RecordDef {
    pub name: String,
    pub fields: Vec<(String, Type)>,
}

impl RecordDef {
    pub fn field_type(&self, name: &str) -> Option<&Type> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }
}
