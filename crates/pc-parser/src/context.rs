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

use pc_ast::{Token, TokenKind};
use pc_errors::{Error, ParseErrorKind, Position, Result};

/// A cursor over the scanned token slice. Mirrors the teacher's
/// `ParserContext` (`compiler/parser/src/parser/context.rs`): every other
/// parser module borrows a `&mut ParserContext` and advances it directly
/// rather than re-implementing lookahead.
pub struct ParserContext {
    tokens: Vec<Token>,
    pos: usize,
}

impl ParserContext {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    pub fn position(&self) -> Position {
        self.peek().position
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    pub fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos.min(self.tokens.len() - 1)].clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    pub fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek_kind()) == std::mem::discriminant(kind)
    }

    /// Skips zero or more newline tokens; used between statements inside a
    /// block, where the scanner's newline tokens are purely structural.
    pub fn skip_newlines(&mut self) {
        while matches!(self.peek_kind(), TokenKind::Newline) {
            self.advance();
        }
    }

    pub fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            Err(Error::parse(
                self.position(),
                ParseErrorKind::UnexpectedToken { found: self.peek_kind().to_string(), expected: expected.into() },
            ))
        }
    }

    pub fn expect_ident(&mut self) -> Result<(String, Position)> {
        let pos = self.position();
        match self.peek_kind().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok((name, pos))
            }
            other => Err(Error::parse(
                pos,
                ParseErrorKind::UnexpectedToken { found: other.to_string(), expected: "an identifier".into() },
            )),
        }
    }

    /// `spec.md` §4.4: `OPENFILE`/`READFILE`/`WRITEFILE`/`CLOSEFILE` take a
    /// dotted identifier sequence (`FileA.txt`) as a single filename, built
    /// here from an `Ident ('.' Ident)*` run rather than by the scanner.
    pub fn expect_filename(&mut self) -> Result<String> {
        let (mut name, _) = self.expect_ident()?;
        while self.check(&TokenKind::Dot) {
            self.advance();
            let (part, _) = self.expect_ident()?;
            name.push('.');
            name.push_str(&part);
        }
        Ok(name)
    }

    pub fn missing_terminator(&self, terminator: &str) -> Error {
        Error::parse(self.position(), ParseErrorKind::MissingTerminator(terminator.into()))
    }

    pub fn malformed(&self, what: impl Into<String>) -> Error {
        Error::parse(self.position(), ParseErrorKind::MalformedConstruct(what.into()))
    }

    /// After a statement, the next token must be a newline, end of file, or
    /// one of the enclosing block's terminator keywords -- otherwise two
    /// statements were written on one line with nothing separating them.
    pub fn expect_statement_end(&mut self, terminators: &[TokenKind]) -> Result<()> {
        if matches!(self.peek_kind(), TokenKind::Newline) {
            self.advance();
            return Ok(());
        }
        if self.is_eof() || terminators.iter().any(|t| self.check(t)) {
            return Ok(());
        }
        Err(Error::parse(
            self.position(),
            ParseErrorKind::UnexpectedToken { found: self.peek_kind().to_string(), expected: "end of statement".into() },
        ))
    }
}
