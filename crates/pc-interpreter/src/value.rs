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
use pc_ast::{Bound, CallableDecl, RecordDef, Type};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Backing storage for an `ARRAY` value: its declared bounds (1 or 2
/// dimensions) plus a flat, row-major element vector.
#[derive(Clone, Debug)]
pub struct ArrayData {
    pub dims: Vec<Bound>,
    pub elems: Vec<Value>,
}

impl ArrayData {
    pub fn new(dims: Vec<Bound>, fill: Value) -> Self {
        let len = dims.iter().map(|b| b.len() as usize).product();
        Self { dims, elems: vec![fill; len] }
    }

    /// Flattens 1 or 2-dimensional subscripts into the backing vector's
    /// index, row-major for the 2-dimensional case.
    pub fn flat_index(&self, indices: &[i64]) -> Option<usize> {
        if indices.len() != self.dims.len() {
            return None;
        }
        match self.dims.len() {
            1 => {
                let b = &self.dims[0];
                if indices[0] < b.lo || indices[0] > b.hi {
                    return None;
                }
                Some((indices[0] - b.lo) as usize)
            }
            2 => {
                let (b0, b1) = (&self.dims[0], &self.dims[1]);
                if indices[0] < b0.lo || indices[0] > b0.hi || indices[1] < b1.lo || indices[1] > b1.hi {
                    return None;
                }
                let row = (indices[0] - b0.lo) as usize;
                let col = (indices[1] - b1.lo) as usize;
                Some(row * b1.len() as usize + col)
            }
            _ => None,
        }
    }
}

/// A runtime value, per `spec.md` §3's tagged value model. `ARRAY` and
/// `RECORD` carry shared, mutable backing storage (`Rc<RefCell<_>>`) so that
/// [`crate::place::Place`] handles can alias into them for `BYREF` parameters
/// without the interpreter needing raw pointers.
#[derive(Clone, Debug)]
pub enum Value {
    Integer(i64),
    Real(f64),
    Str(String),
    Boolean(bool),
    Array(Rc<RefCell<ArrayData>>),
    Record(Rc<RefCell<IndexMap<String, Value>>>),
    Callable(Rc<CallableDecl>),
    File,
    Null,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Real(_) => "REAL",
            Value::Str(_) => "STRING",
            Value::Boolean(_) => "BOOLEAN",
            Value::Array(_) => "ARRAY",
            Value::Record(_) => "RECORD",
            Value::Callable(_) => "CALLABLE",
            Value::File => "FILE",
            Value::Null => "NULL",
        }
    }

    /// The zero/empty value a freshly declared variable of `ty` starts out
    /// holding. Needs the record registry to build a field-complete default
    /// `RECORD` value.
    pub fn default_for(ty: &Type, records: &IndexMap<String, RecordDef>) -> Value {
        match ty {
            Type::Integer => Value::Integer(0),
            Type::Real => Value::Real(0.0),
            Type::String => Value::Str(String::new()),
            Type::Boolean => Value::Boolean(false),
            Type::Array { elem, dims } => {
                let fill = Value::default_for(elem, records);
                Value::Array(Rc::new(RefCell::new(ArrayData::new(dims.clone(), fill))))
            }
            Type::Record(name) => {
                let def = records.get(name).expect("record type is registered by the time it is used");
                let mut fields = IndexMap::new();
                for (field_name, field_ty) in &def.fields {
                    fields.insert(field_name.clone(), Value::default_for(field_ty, records));
                }
                Value::Record(Rc::new(RefCell::new(fields)))
            }
            Type::Callable { .. } => unreachable!("callables are never DECLAREd as variables"),
            Type::File => Value::File,
            Type::Null => Value::Null,
        }
    }

    /// Deep-copies `ARRAY`/`RECORD` storage instead of sharing it, for
    /// `BYVALUE` argument passing and whole-array/whole-record assignment.
    pub fn deep_clone(&self) -> Value {
        match self {
            Value::Array(data) => {
                let data = data.borrow();
                let cloned = ArrayData { dims: data.dims.clone(), elems: data.elems.iter().map(Value::deep_clone).collect() };
                Value::Array(Rc::new(RefCell::new(cloned)))
            }
            Value::Record(fields) => {
                let fields = fields.borrow();
                let cloned: IndexMap<String, Value> = fields.iter().map(|(k, v)| (k.clone(), v.deep_clone())).collect();
                Value::Record(Rc::new(RefCell::new(cloned)))
            }
            other => other.clone(),
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            // Minimal fixed-point rendering with at least one fractional
            // digit, per `spec.md` §9's resolution of REAL output formatting.
            Value::Real(r) => {
                if r.fract() == 0.0 && r.is_finite() {
                    write!(f, "{r:.1}")
                } else {
                    write!(f, "{r}")
                }
            }
            Value::Str(s) => write!(f, "{s}"),
            Value::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Value::Array(_) => write!(f, "ARRAY"),
            Value::Record(fields) => {
                write!(f, "(")?;
                for (i, (name, value)) in fields.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                write!(f, ")")
            }
            Value::Callable(decl) => write!(f, "{}", decl.name),
            Value::File => write!(f, "FILE"),
            Value::Null => write!(f, "NULL"),
        }
    }
}
