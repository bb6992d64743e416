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

use std::fmt;

/// An array's bounds along one dimension, inclusive on both ends, e.g.
/// `ARRAY[1:10]` is `Bound { lo: 1, hi: 10 }`. Bounds are compile-time integer
/// literals per `spec.md` §3.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bound {
    pub lo: i64,
    pub hi: i64,
}

impl Bound {
    pub fn len(&self) -> i64 {
        self.hi - self.lo + 1
    }
}

/// The closed set of type tags from `spec.md` §3. `ARRAY` carries its element
/// type and 1 or 2 dimension bounds; `RECORD` is a nominal reference to a
/// user-declared type name; `CALLABLE` is only ever used internally by the
/// resolver when type-checking a `Call` expression against a function's
/// signature.
#[derive(Clone, Debug, PartialEq)]
pub enum Type {
    Integer,
    Real,
    String,
    Boolean,
    Array { elem: Box<Type>, dims: Vec<Bound> },
    Record(String),
    Callable { params: Vec<Type>, return_type: Option<Box<Type>> },
    File,
    Null,
}

impl Type {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Integer | Type::Real)
    }

    /// Structural equality for primitives and array shapes, nominal for
    /// records, exactly as `spec.md` §3 specifies ("Type equality is
    /// structural for primitives and array shapes, nominal for records").
    pub fn structurally_eq(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Array { elem: e1, dims: d1 }, Type::Array { elem: e2, dims: d2 }) => {
                e1.structurally_eq(e2) && d1 == d2
            }
            (Type::Record(a), Type::Record(b)) => a == b,
            (Type::Callable { params: p1, return_type: r1 }, Type::Callable { params: p2, return_type: r2 }) => {
                p1.len() == p2.len()
                    && p1.iter().zip(p2).all(|(a, b)| a.structurally_eq(b))
                    && match (r1, r2) {
                        (Some(a), Some(b)) => a.structurally_eq(b),
                        (None, None) => true,
                        _ => false,
                    }
            }
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }

    /// `true` when a value of type `self` may be assigned into a slot of
    /// declared type `target` without widening -- i.e. they are the same
    /// type under [`Type::structurally_eq`].
    pub fn assignable_without_widening(&self, target: &Type) -> bool {
        self.structurally_eq(target)
    }

    /// The single widening `spec.md` allows: INTEGER -> REAL.
    pub fn widens_to(&self, target: &Type) -> bool {
        matches!((self, target), (Type::Integer, Type::Real))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Integer => write!(f, "INTEGER"),
            Type::Real => write!(f, "REAL"),
            Type::String => write!(f, "STRING"),
            Type::Boolean => write!(f, "BOOLEAN"),
            Type::Array { elem, dims } => {
                write!(f, "ARRAY[")?;
                for (i, d) in dims.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}:{}", d.lo, d.hi)?;
                }
                write!(f, "] OF {elem}")
            }
            Type::Record(name) => write!(f, "{name}"),
            Type::Callable { params, return_type } => {
                write!(f, "CALLABLE(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ")")?;
                if let Some(rt) = return_type {
                    write!(f, " RETURNS {rt}")?;
                }
                Ok(())
            }
            Type::File => write!(f, "FILE"),
            Type::Null => write!(f, "NULL"),
        }
    }
}
