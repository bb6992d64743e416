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

//! Ties the four pipeline stages together: scan, parse, resolve, interpret.
//! Mirrors the way the teacher's own `Compiler` type drives its stages in
//! sequence (`compiler/compiler/src/lib.rs`), but as a pair of free functions
//! rather than a struct, since `spec.md`'s pipeline carries no state between
//! runs -- each call to [`run_source`] is a fresh program from a clean
//! interpreter.

use pc_interpreter::HostIo;
use pc_errors::Result;
use std::path::Path;

/// Runs pseudocode source text against `host`, driving it through the
/// scanner, parser, resolver, and interpreter in order. Fails fast: a scan,
/// parse, or resolve error is returned before the interpreter ever sees the
/// program, per `spec.md` §6 (an ill-typed program never begins executing).
#[tracing::instrument(skip_all)]
pub fn run_source(source: &str, host: &mut dyn HostIo) -> Result<()> {
    let tokens = pc_lexer::Scanner::scan(source)?;
    tracing::debug!(count = tokens.len(), "scanned tokens");
    let program = pc_parser::parse(tokens)?;
    tracing::debug!("parsed program");
    pc_resolver::resolve(&program)?;
    tracing::debug!("resolved program");
    pc_interpreter::run(&program, host)
}

/// Reads `path` and runs it, per [`run_source`]. I/O errors reading the
/// source file itself are reported the same way the teacher reports a
/// missing main file (`CompilerError::file_read_error`), wrapped into a
/// `RuntimeError` at the start of the file rather than a new error kind.
pub fn run_file(path: &Path, host: &mut dyn HostIo) -> Result<()> {
    let source = std::fs::read_to_string(path).map_err(|e| {
        pc_errors::Error::runtime(
            pc_errors::Position::new(1, 1),
            pc_errors::RuntimeErrorKind::FileModeMisuse {
                name: path.display().to_string(),
                reason: e.to_string(),
            },
        )
    })?;
    run_source(&source, host)
}
