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

use crate::file_table::HostIo;
use crate::frame::Frame;
use crate::interpreter::Interpreter;
use crate::value::Value;
use pc_ast::{Expr, FileMode};
use pc_errors::{Position, Result, RuntimeErrorKind};
use std::cell::RefCell;
use std::rc::Rc;

impl<'a> Interpreter<'a> {
    /// Advances the xorshift64* generator backing `RND`/`RANDOMBETWEEN`.
    /// `spec.md` leaves the exact random source unspecified (it is observable
    /// only through its range, not its sequence), so a small self-contained
    /// generator avoids pulling in a dedicated crate for two builtins.
    fn next_u64(&mut self) -> u64 {
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.rng_state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    pub(crate) fn call_builtin(&mut self, frame: &Rc<RefCell<Frame>>, name: &str, args: &[Expr], position: Position) -> Result<Value> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expr(frame, arg)?);
        }

        match name {
            "LENGTH" => {
                let s = values[0].as_str().expect("resolver guarantees a STRING argument");
                Ok(Value::Integer(s.chars().count() as i64))
            }
            "MID" => {
                let s = values[0].as_str().expect("resolver guarantees a STRING argument");
                let start = values[1].as_integer().expect("resolver guarantees an INTEGER argument");
                let len = values[2].as_integer().expect("resolver guarantees an INTEGER argument");
                let chars: Vec<char> = s.chars().collect();
                let from = (start - 1).max(0) as usize;
                let to = (from + len.max(0) as usize).min(chars.len());
                let slice = if from <= to && from <= chars.len() { chars[from..to].iter().collect() } else { String::new() };
                Ok(Value::Str(slice))
            }
            "LEFT" => {
                let s = values[0].as_str().expect("resolver guarantees a STRING argument");
                let n = values[1].as_integer().expect("resolver guarantees an INTEGER argument").max(0) as usize;
                Ok(Value::Str(s.chars().take(n).collect()))
            }
            "RIGHT" => {
                let s = values[0].as_str().expect("resolver guarantees a STRING argument");
                let n = values[1].as_integer().expect("resolver guarantees an INTEGER argument").max(0) as usize;
                let chars: Vec<char> = s.chars().collect();
                let from = chars.len().saturating_sub(n);
                Ok(Value::Str(chars[from..].iter().collect()))
            }
            "ASC" => {
                let s = values[0].as_str().expect("resolver guarantees a STRING argument");
                let code = s.chars().next().map(|c| c as i64).unwrap_or(0);
                Ok(Value::Integer(code))
            }
            "INT" => {
                let r = values[0].as_real().expect("resolver guarantees a numeric argument");
                Ok(Value::Integer(r.trunc() as i64))
            }
            "RANDOMBETWEEN" => {
                let lo = values[0].as_integer().expect("resolver guarantees an INTEGER argument");
                let hi = values[1].as_integer().expect("resolver guarantees an INTEGER argument");
                if hi < lo {
                    return Err(self.runtime_error(
                        position,
                        RuntimeErrorKind::InputCoercionFailure { input: format!("{lo}..{hi}"), target_type: "a non-empty INTEGER range".into() },
                    ));
                }
                let span = (hi - lo + 1) as u64;
                let offset = self.next_u64() % span;
                Ok(Value::Integer(lo + offset as i64))
            }
            "RND" => Ok(Value::Real(self.next_f64())),
            "EOF" => {
                let filename = values[0].as_str().expect("resolver guarantees a STRING argument").to_string();
                match self.files.mode_of(&filename) {
                    Some(FileMode::Read) => {}
                    _ => {
                        return Err(self.runtime_error(
                            position,
                            RuntimeErrorKind::FileModeMisuse { name: filename, reason: "is not open for reading".into() },
                        ))
                    }
                }
                let eof = self.host.file_is_eof(&filename).map_err(|e| self.io_error(position, &filename, e))?;
                Ok(Value::Boolean(eof))
            }
            other => unreachable!("resolver guarantees '{other}' names a declared callable or builtin"),
        }
    }
}
