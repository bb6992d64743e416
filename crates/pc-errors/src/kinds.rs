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

use thiserror::Error;

/// Lexical errors: `spec.md` §7 closes this set at bad character, unterminated
/// string, and malformed numeric literal.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ScanErrorKind {
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("malformed real literal '{0}'")]
    MalformedRealLiteral(String),
}

/// Grammar errors: unexpected token, missing terminator, malformed construct.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("unexpected token '{found}', expected {expected}")]
    UnexpectedToken { found: String, expected: String },
    #[error("missing terminator '{0}'")]
    MissingTerminator(String),
    #[error("malformed construct: {0}")]
    MalformedConstruct(String),
}

/// Static-analysis errors the resolver raises before any statement executes.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ResolveErrorKind {
    #[error("undeclared name '{0}'")]
    UndeclaredName(String),
    #[error("'{0}' is already declared in this scope")]
    DuplicateDeclaration(String),
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
    #[error("'{name}' expects {expected} argument(s), found {found}")]
    ArityMismatch { name: String, expected: usize, found: usize },
    #[error("argument to BYREF parameter '{0}' must be a variable reference")]
    WrongPassingMode(String),
    #[error("not every path through function '{0}' reaches a RETURN")]
    MissingReturn(String),
    #[error("RETURN is not valid here: {0}")]
    UnreachableReturn(String),
}

/// Errors raised while executing a resolved program.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    #[error("division by zero")]
    DivisionByZero,
    #[error("could not coerce input '{input}' to {target_type}")]
    InputCoercionFailure { input: String, target_type: String },
    #[error("array index {index} out of bounds for dimension [{lo}:{hi}]")]
    ArrayBounds { index: i64, lo: i64, hi: i64 },
    #[error("file '{name}' {reason}")]
    FileModeMisuse { name: String, reason: String },
    #[error("read past end-of-file on '{0}'")]
    ReadPastEof(String),
    #[error("FOR step must not be zero")]
    ZeroStep,
}
