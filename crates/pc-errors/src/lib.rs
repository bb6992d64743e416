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

//! Diagnostics substrate shared by every phase of the 9608 pseudocode pipeline.
//!
//! Mirrors the role `leo-errors` plays for the teacher compiler: one crate at
//! the bottom of the dependency graph that every other crate depends on, so
//! that a scan/parse/resolve/runtime error can be constructed anywhere and
//! bubble up through a single `Result` type without each phase needing to know
//! about the others' error representations.

mod kinds;
mod position;

pub use kinds::{ParseErrorKind, ResolveErrorKind, RuntimeErrorKind, ScanErrorKind};
pub use position::Position;

use std::fmt;

/// Which phase of the pipeline raised a given [`Error`]. Used only for the
/// `<Phase>Error` prefix in the diagnostic format from `spec.md` §6.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Scan,
    Parse,
    Resolve,
    Runtime,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Scan => "Scan",
            Phase::Parse => "Parse",
            Phase::Resolve => "Resolve",
            Phase::Runtime => "Runtime",
        };
        write!(f, "{name}")
    }
}

/// A single pipeline diagnostic: the phase that raised it, the source
/// position it points at, the closed-set error kind, and (for runtime errors
/// raised from inside a call) the active callable's name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    pub phase: Phase,
    pub position: Position,
    pub message: String,
    pub callable: Option<String>,
}

impl Error {
    pub fn scan(position: Position, kind: ScanErrorKind) -> Self {
        Self { phase: Phase::Scan, position, message: kind.to_string(), callable: None }
    }

    pub fn parse(position: Position, kind: ParseErrorKind) -> Self {
        Self { phase: Phase::Parse, position, message: kind.to_string(), callable: None }
    }

    pub fn resolve(position: Position, kind: ResolveErrorKind) -> Self {
        Self { phase: Phase::Resolve, position, message: kind.to_string(), callable: None }
    }

    pub fn runtime(position: Position, kind: RuntimeErrorKind) -> Self {
        Self { phase: Phase::Runtime, position, message: kind.to_string(), callable: None }
    }

    /// Attaches the name of the callable that was active when a runtime error
    /// fired, per `spec.md` §7 ("runtime errors also carry the active
    /// callable name when inside a call").
    pub fn with_callable(mut self, name: impl Into<String>) -> Self {
        self.callable = Some(name.into());
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}Error at line {}, column {}: {}",
            self.phase, self.position.line, self.position.column, self.message
        )?;
        if let Some(callable) = &self.callable {
            write!(f, " (in '{callable}')")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
