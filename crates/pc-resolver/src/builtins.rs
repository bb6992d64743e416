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

use pc_ast::{ParamMode, Type};

/// A built-in function's signature, as seen by the resolver. `spec.md` §4.4
/// lists the built-in callables every program may invoke without declaring
/// them; the resolver type-checks calls against this table the same way it
/// would against a user-declared `FUNCTION`.
pub struct BuiltinSignature {
    pub name: &'static str,
    pub params: &'static [Type],
    pub return_type: Type,
}

/// All parameters of every built-in are passed `BYVALUE`; none can be used as
/// a `BYREF` argument target.
pub fn param_mode() -> ParamMode {
    ParamMode::ByValue
}

pub fn lookup(name: &str) -> Option<BuiltinSignature> {
    match name {
        "LENGTH" => Some(BuiltinSignature { name, params: &[Type::String], return_type: Type::Integer }),
        "MID" => Some(BuiltinSignature {
            name,
            params: &[Type::String, Type::Integer, Type::Integer],
            return_type: Type::String,
        }),
        "LEFT" => Some(BuiltinSignature { name, params: &[Type::String, Type::Integer], return_type: Type::String }),
        "RIGHT" => Some(BuiltinSignature { name, params: &[Type::String, Type::Integer], return_type: Type::String }),
        "ASC" => Some(BuiltinSignature { name, params: &[Type::String], return_type: Type::Integer }),
        "INT" => Some(BuiltinSignature { name, params: &[Type::Real], return_type: Type::Integer }),
        "RANDOMBETWEEN" => Some(BuiltinSignature {
            name,
            params: &[Type::Integer, Type::Integer],
            return_type: Type::Integer,
        }),
        "RND" => Some(BuiltinSignature { name, params: &[], return_type: Type::Real }),
        "EOF" => Some(BuiltinSignature { name, params: &[Type::String], return_type: Type::Boolean }),
        _ => None,
    }
}
