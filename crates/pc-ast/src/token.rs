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

use pc_errors::Position;
use std::fmt;

/// A literal value attached to a token, ready to become a [`crate::expr::ExprKind::Literal`]
/// once the parser reaches a primary expression.
#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    Integer(i64),
    Real(f64),
    Str(String),
    Boolean(bool),
}

/// The closed set of token kinds from `spec.md` §3 ("Tokens").
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Literals.
    Integer(i64),
    Real(f64),
    StringLit(String),
    BooleanLit(bool),

    // Identifiers and keywords.
    Ident(String),
    Declare,
    Type,
    EndType,
    Array,
    Of,
    If,
    Then,
    Else,
    EndIf,
    Case,
    Otherwise,
    EndCase,
    For,
    To,
    Step,
    EndFor,
    While,
    Do,
    EndWhile,
    Repeat,
    Until,
    Procedure,
    EndProcedure,
    Function,
    Returns,
    EndFunction,
    Call,
    Return,
    ByValue,
    ByRef,
    Input,
    Output,
    OpenFile,
    ReadFile,
    WriteFile,
    CloseFile,
    Read,
    WriteMode,
    Append,
    And,
    Or,
    Not,
    IntegerType,
    RealType,
    StringType,
    BooleanType,

    // Operators and punctuation.
    Plus,
    Minus,
    Star,
    Slash,
    Assign, // <-
    Eq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    NotEq,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Dot,

    // Structural.
    Newline,
    Eof,
}

/// A scanned token: kind, verbatim source slice, and 1-based position of its
/// first character. Positions let every later phase report errors at the
/// exact place the offending text came from, per `spec.md`'s invariant that
/// "every token has a position; every AST node references at least one
/// originating token".
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, position: Position) -> Self {
        Self { kind, lexeme: lexeme.into(), position }
    }

    pub fn literal(&self) -> Option<LiteralValue> {
        match &self.kind {
            TokenKind::Integer(i) => Some(LiteralValue::Integer(*i)),
            TokenKind::Real(r) => Some(LiteralValue::Real(*r)),
            TokenKind::StringLit(s) => Some(LiteralValue::Str(s.clone())),
            TokenKind::BooleanLit(b) => Some(LiteralValue::Boolean(*b)),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenKind::*;
        match self {
            Integer(i) => write!(f, "{i}"),
            Real(r) => write!(f, "{r}"),
            StringLit(s) => write!(f, "\"{s}\""),
            BooleanLit(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Ident(s) => write!(f, "{s}"),
            Declare => write!(f, "DECLARE"),
            Type => write!(f, "TYPE"),
            EndType => write!(f, "ENDTYPE"),
            Array => write!(f, "ARRAY"),
            Of => write!(f, "OF"),
            If => write!(f, "IF"),
            Then => write!(f, "THEN"),
            Else => write!(f, "ELSE"),
            EndIf => write!(f, "ENDIF"),
            Case => write!(f, "CASE"),
            Otherwise => write!(f, "OTHERWISE"),
            EndCase => write!(f, "ENDCASE"),
            For => write!(f, "FOR"),
            To => write!(f, "TO"),
            Step => write!(f, "STEP"),
            EndFor => write!(f, "ENDFOR"),
            While => write!(f, "WHILE"),
            Do => write!(f, "DO"),
            EndWhile => write!(f, "ENDWHILE"),
            Repeat => write!(f, "REPEAT"),
            Until => write!(f, "UNTIL"),
            Procedure => write!(f, "PROCEDURE"),
            EndProcedure => write!(f, "ENDPROCEDURE"),
            Function => write!(f, "FUNCTION"),
            Returns => write!(f, "RETURNS"),
            EndFunction => write!(f, "ENDFUNCTION"),
            Call => write!(f, "CALL"),
            Return => write!(f, "RETURN"),
            ByValue => write!(f, "BYVALUE"),
            ByRef => write!(f, "BYREF"),
            Input => write!(f, "INPUT"),
            Output => write!(f, "OUTPUT"),
            OpenFile => write!(f, "OPENFILE"),
            ReadFile => write!(f, "READFILE"),
            WriteFile => write!(f, "WRITEFILE"),
            CloseFile => write!(f, "CLOSEFILE"),
            Read => write!(f, "READ"),
            WriteMode => write!(f, "WRITE"),
            Append => write!(f, "APPEND"),
            And => write!(f, "AND"),
            Or => write!(f, "OR"),
            Not => write!(f, "NOT"),
            IntegerType => write!(f, "INTEGER"),
            RealType => write!(f, "REAL"),
            StringType => write!(f, "STRING"),
            BooleanType => write!(f, "BOOLEAN"),
            Plus => write!(f, "+"),
            Minus => write!(f, "-"),
            Star => write!(f, "*"),
            Slash => write!(f, "/"),
            Assign => write!(f, "<-"),
            Eq => write!(f, "="),
            Lt => write!(f, "<"),
            Gt => write!(f, ">"),
            LtEq => write!(f, "<="),
            GtEq => write!(f, ">="),
            NotEq => write!(f, "<>"),
            LParen => write!(f, "("),
            RParen => write!(f, ")"),
            LBracket => write!(f, "["),
            RBracket => write!(f, "]"),
            Comma => write!(f, ","),
            Colon => write!(f, ":"),
            Dot => write!(f, "."),
            Newline => write!(f, "<newline>"),
            Eof => write!(f, "<eof>"),
        }
    }
}

/// The fixed keyword table from `spec.md` §4.1. Matched against an already
/// scanned identifier; identifiers are case-sensitive so no normalization
/// happens here.
pub fn keyword_token(ident: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match ident {
        "DECLARE" => Declare,
        "TYPE" => Type,
        "ENDTYPE" => EndType,
        "ARRAY" => Array,
        "OF" => Of,
        "IF" => If,
        "THEN" => Then,
        "ELSE" => Else,
        "ENDIF" => EndIf,
        "CASE" => Case,
        "OTHERWISE" => Otherwise,
        "ENDCASE" => EndCase,
        "FOR" => For,
        "TO" => To,
        "STEP" => Step,
        "ENDFOR" => EndFor,
        "WHILE" => While,
        "DO" => Do,
        "ENDWHILE" => EndWhile,
        "REPEAT" => Repeat,
        "UNTIL" => Until,
        "PROCEDURE" => Procedure,
        "ENDPROCEDURE" => EndProcedure,
        "FUNCTION" => Function,
        "RETURNS" => Returns,
        "ENDFUNCTION" => EndFunction,
        "CALL" => Call,
        "RETURN" => Return,
        "BYVALUE" => ByValue,
        "BYREF" => ByRef,
        "INPUT" => Input,
        "OUTPUT" => Output,
        "OPENFILE" => OpenFile,
        "READFILE" => ReadFile,
        "WRITEFILE" => WriteFile,
        "CLOSEFILE" => CloseFile,
        "READ" => Read,
        "WRITE" => WriteMode,
        "APPEND" => Append,
        "AND" => And,
        "OR" => Or,
        "NOT" => Not,
        "INTEGER" => IntegerType,
        "REAL" => RealType,
        "STRING" => StringType,
        "BOOLEAN" => BooleanType,
        "TRUE" => BooleanLit(true),
        "FALSE" => BooleanLit(false),
        _ => return None,
    })
}
