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

use crate::value::Value;

/// Carries `RETURN` control flow up through nested statement execution
/// without borrowing the host language's own error/panic machinery, per
/// `spec.md` §5. `Signal::None` means "keep executing the next statement in
/// this block"; `Signal::Return` means "unwind to the call site with this
/// value" and is propagated unchanged through every enclosing block and loop.
pub enum Signal {
    None,
    Return(Value),
}

impl Signal {
    pub fn is_return(&self) -> bool {
        matches!(self, Signal::Return(_))
    }
}
