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
use pc_ast::{BinaryOp, Expr, ExprKind, TokenKind, UnaryOp};
use pc_errors::Result;

/// Pratt-style precedence climbing over the nine levels from `spec.md` §4.2,
/// loosest to tightest: `OR -> AND -> NOT -> relational -> +/- -> */ ->
/// unary-minus -> postfix -> primary`. Each level is its own function rather
/// than a single table-driven loop, mirroring the teacher's
/// `parse_disjunctive_expression` / `parse_conjunctive_expression` chain
/// (`compiler/parser/src/parser/expression.rs`).
pub fn parse_expression(ctx: &mut ParserContext) -> Result<Expr> {
    parse_or(ctx)
}

fn parse_or(ctx: &mut ParserContext) -> Result<Expr> {
    let mut left = parse_and(ctx)?;
    while ctx.check(&TokenKind::Or) {
        let pos = ctx.position();
        ctx.advance();
        let right = parse_and(ctx)?;
        left = Expr::new(ExprKind::Binary(BinaryOp::Or, Box::new(left), Box::new(right)), pos);
    }
    Ok(left)
}

fn parse_and(ctx: &mut ParserContext) -> Result<Expr> {
    let mut left = parse_not(ctx)?;
    while ctx.check(&TokenKind::And) {
        let pos = ctx.position();
        ctx.advance();
        let right = parse_not(ctx)?;
        left = Expr::new(ExprKind::Binary(BinaryOp::And, Box::new(left), Box::new(right)), pos);
    }
    Ok(left)
}

/// `NOT` is a right-associative unary operator, so it recurses into itself
/// rather than looping.
fn parse_not(ctx: &mut ParserContext) -> Result<Expr> {
    if ctx.check(&TokenKind::Not) {
        let pos = ctx.position();
        ctx.advance();
        let operand = parse_not(ctx)?;
        return Ok(Expr::new(ExprKind::Unary(UnaryOp::Not, Box::new(operand)), pos));
    }
    parse_relational(ctx)
}

/// Relational operators are non-associative: `A < B < C` is a parse error
/// rather than a chained comparison, per `spec.md` §4.2.
fn parse_relational(ctx: &mut ParserContext) -> Result<Expr> {
    let left = parse_additive(ctx)?;
    let op = match ctx.peek_kind() {
        TokenKind::Eq => BinaryOp::Eq,
        TokenKind::NotEq => BinaryOp::NotEq,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::LtEq => BinaryOp::LtEq,
        TokenKind::GtEq => BinaryOp::GtEq,
        _ => return Ok(left),
    };
    let pos = ctx.position();
    ctx.advance();
    let right = parse_additive(ctx)?;
    let chained = Expr::new(ExprKind::Binary(op, Box::new(left), Box::new(right)), pos);
    if matches!(
        ctx.peek_kind(),
        TokenKind::Eq | TokenKind::NotEq | TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq
    ) {
        return Err(ctx.malformed("relational operators do not chain; parenthesize the comparison"));
    }
    Ok(chained)
}

fn parse_additive(ctx: &mut ParserContext) -> Result<Expr> {
    let mut left = parse_multiplicative(ctx)?;
    loop {
        let op = match ctx.peek_kind() {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            _ => break,
        };
        let pos = ctx.position();
        ctx.advance();
        let right = parse_multiplicative(ctx)?;
        left = Expr::new(ExprKind::Binary(op, Box::new(left), Box::new(right)), pos);
    }
    Ok(left)
}

fn parse_multiplicative(ctx: &mut ParserContext) -> Result<Expr> {
    let mut left = parse_unary_minus(ctx)?;
    loop {
        let op = match ctx.peek_kind() {
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            _ => break,
        };
        let pos = ctx.position();
        ctx.advance();
        let right = parse_unary_minus(ctx)?;
        left = Expr::new(ExprKind::Binary(op, Box::new(left), Box::new(right)), pos);
    }
    Ok(left)
}

fn parse_unary_minus(ctx: &mut ParserContext) -> Result<Expr> {
    if ctx.check(&TokenKind::Minus) {
        let pos = ctx.position();
        ctx.advance();
        let operand = parse_unary_minus(ctx)?;
        return Ok(Expr::new(ExprKind::Unary(UnaryOp::Neg, Box::new(operand)), pos));
    }
    parse_postfix(ctx)
}

/// Handles `name(args)`, `expr[indices]`, and `expr.field` suffixes, left to
/// right, at tighter binding than every binary operator.
fn parse_postfix(ctx: &mut ParserContext) -> Result<Expr> {
    let mut expr = parse_primary(ctx)?;
    loop {
        match ctx.peek_kind() {
            TokenKind::LBracket => {
                let pos = ctx.position();
                ctx.advance();
                let mut indices = vec![parse_expression(ctx)?];
                while ctx.check(&TokenKind::Comma) {
                    ctx.advance();
                    indices.push(parse_expression(ctx)?);
                }
                ctx.expect(TokenKind::RBracket, "']'")?;
                expr = Expr::new(ExprKind::Index(Box::new(expr), indices), pos);
            }
            TokenKind::Dot => {
                let pos = ctx.position();
                ctx.advance();
                let (field, _) = ctx.expect_ident()?;
                expr = Expr::new(ExprKind::Field(Box::new(expr), field), pos);
            }
            _ => break,
        }
    }
    Ok(expr)
}

fn parse_primary(ctx: &mut ParserContext) -> Result<Expr> {
    let pos = ctx.position();
    match ctx.peek_kind().clone() {
        TokenKind::Integer(_) | TokenKind::Real(_) | TokenKind::StringLit(_) | TokenKind::BooleanLit(_) => {
            let tok = ctx.advance();
            let literal = tok.literal().expect("literal token must carry a literal value");
            Ok(Expr::new(ExprKind::Literal(literal), pos))
        }
        TokenKind::Ident(name) => {
            ctx.advance();
            if ctx.check(&TokenKind::LParen) {
                ctx.advance();
                let args = parse_args(ctx)?;
                ctx.expect(TokenKind::RParen, "')'")?;
                Ok(Expr::new(ExprKind::Call(name, args), pos))
            } else {
                Ok(Expr::new(ExprKind::Name(name), pos))
            }
        }
        TokenKind::LParen => {
            ctx.advance();
            let inner = parse_expression(ctx)?;
            ctx.expect(TokenKind::RParen, "')'")?;
            Ok(inner)
        }
        other => Err(ctx.malformed(format!("expected an expression, found '{other}'"))),
    }
}

fn parse_args(ctx: &mut ParserContext) -> Result<Vec<Expr>> {
    let mut args = Vec::new();
    if ctx.check(&TokenKind::RParen) {
        return Ok(args);
    }
    args.push(parse_expression(ctx)?);
    while ctx.check(&TokenKind::Comma) {
        ctx.advance();
        args.push(parse_expression(ctx)?);
    }
    Ok(args)
}
