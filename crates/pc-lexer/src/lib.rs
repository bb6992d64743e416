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

//! The scanner: character stream -> tokens with source positions, per
//! `spec.md` §4.1. Grounded on the teacher's maximal-munch `Token::eat`
//! dispatch (`compiler/parser/src/tokenizer/lexer.rs`), adapted from a
//! `Peekable<Chars>` cursor to an explicit `Vec<char>` index so two-character
//! lookahead (`<-`, `<=`, `>=`, `<>`) and line/column tracking stay simple.

use pc_ast::{keyword_token, Token, TokenKind};
use pc_errors::{Error, Position, Result, ScanErrorKind};

pub struct Scanner {
    chars: Vec<char>,
    index: usize,
    line: usize,
    column: usize,
}

impl Scanner {
    pub fn new(source: &str) -> Self {
        // Normalize line endings up front, per `spec.md` §6 ("either accepted, \r stripped").
        let normalized: String = source.replace("\r\n", "\n").replace('\r', "\n");
        Self { chars: normalized.chars().collect(), index: 0, line: 1, column: 1 }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn peek2(&self) -> Option<char> {
        self.chars.get(self.index + 1).copied()
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.index += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Runs the scanner to completion, producing a token stream terminated by
    /// a single `Eof` token.
    #[tracing::instrument(skip_all)]
    pub fn scan(source: &str) -> Result<Vec<Token>> {
        let mut scanner = Scanner::new(source);
        let mut tokens = Vec::new();
        let mut pending_newline: Option<Position> = None;

        loop {
            // Skip spaces and tabs within a line.
            while matches!(scanner.peek(), Some(' ') | Some('\t')) {
                scanner.advance();
            }

            match scanner.peek() {
                None => {
                    if let Some(pos) = pending_newline {
                        tokens.push(Token::new(TokenKind::Newline, "\n", pos));
                    }
                    tokens.push(Token::new(TokenKind::Eof, "", scanner.position()));
                    break;
                }
                Some('\n') => {
                    // The first newline of a run carries the token's position;
                    // blank lines collapse into that single newline token.
                    if pending_newline.is_none() {
                        pending_newline = Some(scanner.position());
                    }
                    scanner.advance();
                    continue;
                }
                _ => {}
            }

            if let Some(pos) = pending_newline.take() {
                tokens.push(Token::new(TokenKind::Newline, "\n", pos));
            }

            tokens.push(scanner.scan_token()?);
        }

        tracing::debug!(count = tokens.len(), "scanned tokens");
        Ok(tokens)
    }

    fn scan_token(&mut self) -> Result<Token> {
        let start = self.position();
        let c = self.peek().expect("scan_token called at end of input");

        if c.is_ascii_digit() {
            return self.scan_number(start);
        }
        if c == '"' {
            return self.scan_string(start);
        }
        if c.is_ascii_alphabetic() {
            return self.scan_identifier(start);
        }

        self.advance();
        let (kind, lexeme): (TokenKind, String) = match c {
            '+' => (TokenKind::Plus, "+".into()),
            '-' => (TokenKind::Minus, "-".into()),
            '*' => (TokenKind::Star, "*".into()),
            '/' => (TokenKind::Slash, "/".into()),
            '(' => (TokenKind::LParen, "(".into()),
            ')' => (TokenKind::RParen, ")".into()),
            '[' => (TokenKind::LBracket, "[".into()),
            ']' => (TokenKind::RBracket, "]".into()),
            ',' => (TokenKind::Comma, ",".into()),
            ':' => (TokenKind::Colon, ":".into()),
            '.' => (TokenKind::Dot, ".".into()),
            '=' => (TokenKind::Eq, "=".into()),
            '<' => match self.peek() {
                Some('-') => {
                    self.advance();
                    (TokenKind::Assign, "<-".into())
                }
                Some('=') => {
                    self.advance();
                    (TokenKind::LtEq, "<=".into())
                }
                Some('>') => {
                    self.advance();
                    (TokenKind::NotEq, "<>".into())
                }
                _ => (TokenKind::Lt, "<".into()),
            },
            '>' => match self.peek() {
                Some('=') => {
                    self.advance();
                    (TokenKind::GtEq, ">=".into())
                }
                _ => (TokenKind::Gt, ">".into()),
            },
            other => return Err(Error::scan(start, ScanErrorKind::UnexpectedCharacter(other))),
        };
        Ok(Token::new(kind, lexeme, start))
    }

    fn scan_number(&mut self, start: Position) -> Result<Token> {
        let mut lexeme = String::new();
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            lexeme.push(self.advance().unwrap());
        }

        if self.peek() == Some('.') && matches!(self.peek2(), Some(c) if c.is_ascii_digit()) {
            lexeme.push(self.advance().unwrap()); // '.'
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                lexeme.push(self.advance().unwrap());
            }
            let value: f64 = lexeme.parse().map_err(|_| Error::scan(start, ScanErrorKind::MalformedRealLiteral(lexeme.clone())))?;
            return Ok(Token::new(TokenKind::Real(value), lexeme, start));
        }

        // A trailing '.' not followed by a digit is a malformed real literal
        // (`3.`), per `spec.md` §4.1.
        if self.peek() == Some('.') {
            let mut bad = lexeme.clone();
            bad.push('.');
            return Err(Error::scan(start, ScanErrorKind::MalformedRealLiteral(bad)));
        }

        let value: i64 = lexeme.parse().map_err(|_| Error::scan(start, ScanErrorKind::MalformedRealLiteral(lexeme.clone())))?;
        Ok(Token::new(TokenKind::Integer(value), lexeme, start))
    }

    fn scan_string(&mut self, start: Position) -> Result<Token> {
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.advance() {
                Some('"') => break,
                Some(c) => value.push(c),
                None => return Err(Error::scan(start, ScanErrorKind::UnterminatedString)),
            }
        }
        let lexeme = format!("\"{value}\"");
        Ok(Token::new(TokenKind::StringLit(value), lexeme, start))
    }

    fn scan_identifier(&mut self, start: Position) -> Result<Token> {
        let mut lexeme = String::new();
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric()) {
            lexeme.push(self.advance().unwrap());
        }
        let kind = keyword_token(&lexeme).unwrap_or_else(|| TokenKind::Ident(lexeme.clone()));
        Ok(Token::new(kind, lexeme, start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Scanner::scan(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn scans_hello_world() {
        let ks = kinds("OUTPUT \"Hello World!\"");
        assert_eq!(ks, vec![TokenKind::Output, TokenKind::StringLit("Hello World!".into()), TokenKind::Eof]);
    }

    #[test]
    fn collapses_blank_lines_to_one_newline() {
        let ks = kinds("DECLARE X : INTEGER\n\n\nX <- 1");
        let newline_count = ks.iter().filter(|k| matches!(k, TokenKind::Newline)).count();
        assert_eq!(newline_count, 1);
    }

    #[test]
    fn two_char_operators_use_maximal_munch() {
        let ks = kinds("<- <= >= <>");
        assert_eq!(ks, vec![TokenKind::Assign, TokenKind::LtEq, TokenKind::GtEq, TokenKind::NotEq, TokenKind::Eof]);
    }

    #[test]
    fn real_literal_requires_digits_both_sides() {
        assert!(Scanner::scan("3.").is_err());
    }

    #[test]
    fn unterminated_string_is_an_error() {
        assert!(Scanner::scan("\"abc").is_err());
    }

    #[test]
    fn negative_numbers_are_not_lexed_as_literals() {
        let ks = kinds("-5");
        assert_eq!(ks, vec![TokenKind::Minus, TokenKind::Integer(5), TokenKind::Eof]);
    }

    #[test]
    fn scanner_round_trip_reproduces_source() {
        let src = "FOR I <- 1 TO 5\n  T <- T + I\nENDFOR";
        let tokens = Scanner::scan(src).unwrap();
        let mut rebuilt = String::new();
        let mut last_line = 1usize;
        let mut last_col = 1usize;
        for tok in &tokens {
            if matches!(tok.kind, TokenKind::Eof) {
                continue;
            }
            while last_line < tok.position.line {
                rebuilt.push('\n');
                last_line += 1;
                last_col = 1;
            }
            while last_col < tok.position.column {
                rebuilt.push(' ');
                last_col += 1;
            }
            if matches!(tok.kind, TokenKind::Newline) {
                rebuilt.push('\n');
                last_line += 1;
                last_col = 1;
            } else {
                rebuilt.push_str(&tok.lexeme);
                last_col += tok.lexeme.chars().count().max(1);
            }
        }
        assert_eq!(rebuilt, src);
    }
}
