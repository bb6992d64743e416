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

use indexmap::IndexMap;
use pc_ast::Type;

/// A single lexical level: a flat name -> declared-type table. `spec.md` §4.3
/// allows at most two live scopes at once (global, and the activation record
/// of whichever callable is currently being resolved) since 9608 has no
/// nested procedures.
#[derive(Default)]
pub struct Scope {
    vars: IndexMap<String, Type>,
}

impl Scope {
    pub fn declare(&mut self, name: &str, ty: Type) -> bool {
        if self.vars.contains_key(name) {
            return false;
        }
        self.vars.insert(name.to_string(), ty);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Type> {
        self.vars.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }
}
