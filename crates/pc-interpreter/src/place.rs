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

use crate::value::{ArrayData, Value};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

/// An addressable storage location: a plain variable slot, one element of an
/// array, or one field of a record. `BYREF` parameter passing binds the
/// callee's parameter name directly to the caller's `Place` instead of
/// copying a value, which is what gives mutations through the parameter
/// visibility back in the caller -- `spec.md`'s "indirect slot handle"
/// aliasing model.
#[derive(Clone)]
pub enum Place {
    Var(Rc<RefCell<Value>>),
    /// The flat element index has already been bounds-checked (raising
    /// `RuntimeErrorKind::ArrayBounds`) by the time a `Place` is constructed,
    /// so `get`/`set` can index directly.
    Index(Rc<RefCell<ArrayData>>, usize),
    Field(Rc<RefCell<IndexMap<String, Value>>>, String),
}

impl Place {
    pub fn get(&self) -> Value {
        match self {
            Place::Var(slot) => slot.borrow().clone(),
            Place::Index(array, idx) => array.borrow().elems[*idx].clone(),
            Place::Field(fields, name) => {
                fields.borrow().get(name).cloned().expect("field existence is checked by the resolver")
            }
        }
    }

    pub fn set(&self, value: Value) {
        match self {
            Place::Var(slot) => *slot.borrow_mut() = value,
            Place::Index(array, idx) => array.borrow_mut().elems[*idx] = value,
            Place::Field(fields, name) => {
                fields.borrow_mut().insert(name.clone(), value);
            }
        }
    }
}
