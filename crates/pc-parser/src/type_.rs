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

use crate::context::ParserContext;
use pc_ast::{Bound, TokenKind, Type};
use pc_errors::Result;

/// Parses a type reference: a primitive keyword, a record type name, or an
/// `ARRAY[lo:hi{,lo:hi}] OF <type>` declarator. `spec.md` §3 bounds array
/// dimensions to one or two.
pub fn parse_type(ctx: &mut ParserContext) -> Result<Type> {
    match ctx.peek_kind().clone() {
        TokenKind::IntegerType => {
            ctx.advance();
            Ok(Type::Integer)
        }
        TokenKind::RealType => {
            ctx.advance();
            Ok(Type::Real)
        }
        TokenKind::StringType => {
            ctx.advance();
            Ok(Type::String)
        }
        TokenKind::BooleanType => {
            ctx.advance();
            Ok(Type::Boolean)
        }
        TokenKind::Array => {
            ctx.advance();
            ctx.expect(TokenKind::LBracket, "'['")?;
            let mut dims = vec![parse_bound(ctx)?];
            while ctx.check(&TokenKind::Comma) {
                ctx.advance();
                dims.push(parse_bound(ctx)?);
            }
            if dims.len() > 2 {
                return Err(ctx.malformed("an array may declare at most two dimensions"));
            }
            ctx.expect(TokenKind::RBracket, "']'")?;
            ctx.expect(TokenKind::Of, "OF")?;
            let elem = parse_type(ctx)?;
            Ok(Type::Array { elem: Box::new(elem), dims })
        }
        TokenKind::Ident(name) => {
            ctx.advance();
            Ok(Type::Record(name))
        }
        other => Err(ctx.malformed(format!("expected a type, found '{other}'"))),
    }
}

fn parse_bound(ctx: &mut ParserContext) -> Result<Bound> {
    let lo = parse_signed_int(ctx)?;
    ctx.expect(TokenKind::Colon, "':'")?;
    let hi = parse_signed_int(ctx)?;
    Ok(Bound { lo, hi })
}

fn parse_signed_int(ctx: &mut ParserContext) -> Result<i64> {
    let negative = if ctx.check(&TokenKind::Minus) {
        ctx.advance();
        true
    } else {
        false
    };
    match ctx.peek_kind().clone() {
        TokenKind::Integer(i) => {
            ctx.advance();
            Ok(if negative { -i } else { i })
        }
        other => Err(ctx.malformed(format!("expected an integer bound, found '{other}'"))),
    }
}
