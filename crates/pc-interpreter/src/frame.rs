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

use crate::place::Place;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

/// A lexical environment: the global frame, or the activation frame of
/// whichever callable is currently executing. `spec.md` §3 allows at most one
/// level of nesting (no closures, no nested procedures), so `parent` is
/// either `None` (the global frame) or `Some(global)`.
pub struct Frame {
    slots: IndexMap<String, Place>,
    parent: Option<Rc<RefCell<Frame>>>,
}

impl Frame {
    pub fn new_global() -> Rc<RefCell<Frame>> {
        Rc::new(RefCell::new(Frame { slots: IndexMap::new(), parent: None }))
    }

    pub fn new_child(parent: Rc<RefCell<Frame>>) -> Rc<RefCell<Frame>> {
        Rc::new(RefCell::new(Frame { slots: IndexMap::new(), parent: Some(parent) }))
    }

    /// Binds `name` to `place` in this frame specifically -- used both for
    /// ordinary `DECLARE`s and for binding a callable's parameters (by value
    /// or by reference) into a freshly created activation frame.
    pub fn bind(&mut self, name: &str, place: Place) {
        self.slots.insert(name.to_string(), place);
    }
}

pub fn find_place(frame: &Rc<RefCell<Frame>>, name: &str) -> Option<Place> {
    let f = frame.borrow();
    if let Some(place) = f.slots.get(name) {
        return Some(place.clone());
    }
    f.parent.as_ref().and_then(|parent| find_place(parent, name))
}
