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
use crate::expression::parse_expression;
use crate::type_::parse_type;
use pc_ast::{CallableDecl, CaseArm, FileMode, LiteralValue, Param, ParamMode, Program, Stmt, StmtKind};
use pc_errors::Result;
use std::rc::Rc;

/// Parses the whole token stream as a top-level statement sequence, per
/// `spec.md` §4.2 ("a program is a sequence of statements with no enclosing
/// block").
pub fn parse_program(ctx: &mut ParserContext) -> Result<Program> {
    let statements = parse_block(ctx, &[])?;
    Ok(Program { statements })
}

/// Parses statements until EOF or one of `terminators` is the next token,
/// without consuming the terminator itself -- the caller does that so it can
/// attach the terminator's position to the enclosing construct.
fn parse_block(ctx: &mut ParserContext, terminators: &[pc_ast::TokenKind]) -> Result<Vec<Stmt>> {
    let mut stmts = Vec::new();
    ctx.skip_newlines();
    while !ctx.is_eof() && !terminators.iter().any(|t| ctx.check(t)) {
        stmts.push(parse_statement(ctx, terminators)?);
        ctx.skip_newlines();
    }
    Ok(stmts)
}

fn parse_statement(ctx: &mut ParserContext, enclosing: &[pc_ast::TokenKind]) -> Result<Stmt> {
    use pc_ast::TokenKind::*;
    match ctx.peek_kind().clone() {
        Declare => parse_declare(ctx, enclosing),
        Type => parse_type_decl(ctx, enclosing),
        If => parse_if(ctx, enclosing),
        Case => parse_case(ctx, enclosing),
        While => parse_while(ctx, enclosing),
        Repeat => parse_repeat(ctx, enclosing),
        For => parse_for(ctx, enclosing),
        Procedure => parse_procedure(ctx, enclosing),
        Function => parse_function(ctx, enclosing),
        Call => parse_call_stmt(ctx, enclosing),
        Return => parse_return(ctx, enclosing),
        Output => parse_output(ctx, enclosing),
        Input => parse_input(ctx, enclosing),
        OpenFile => parse_open_file(ctx, enclosing),
        ReadFile => parse_read_file(ctx, enclosing),
        WriteFile => parse_write_file(ctx, enclosing),
        CloseFile => parse_close_file(ctx, enclosing),
        Ident(_) => parse_assign(ctx, enclosing),
        other => Err(ctx.malformed(format!("'{other}' cannot start a statement"))),
    }
}

fn parse_declare(ctx: &mut ParserContext, enclosing: &[pc_ast::TokenKind]) -> Result<Stmt> {
    let pos = ctx.position();
    ctx.advance(); // DECLARE
    let (name, _) = ctx.expect_ident()?;
    ctx.expect(pc_ast::TokenKind::Colon, "':'")?;
    let ty = parse_type(ctx)?;
    ctx.expect_statement_end(enclosing)?;
    let kind = match ty {
        pc_ast::Type::Array { elem, dims } => StmtKind::DeclareArray { name, dims, elem: *elem },
        other => StmtKind::Declare { name, ty: other },
    };
    Ok(Stmt::new(kind, pos))
}

fn parse_type_decl(ctx: &mut ParserContext, enclosing: &[pc_ast::TokenKind]) -> Result<Stmt> {
    let pos = ctx.position();
    ctx.advance(); // TYPE
    let (name, _) = ctx.expect_ident()?;
    ctx.expect_statement_end(&[pc_ast::TokenKind::EndType])?;
    ctx.skip_newlines();
    let mut fields = Vec::new();
    while !ctx.check(&pc_ast::TokenKind::EndType) && !ctx.is_eof() {
        ctx.expect(pc_ast::TokenKind::Declare, "DECLARE")?;
        let (field_name, _) = ctx.expect_ident()?;
        ctx.expect(pc_ast::TokenKind::Colon, "':'")?;
        let field_ty = parse_type(ctx)?;
        ctx.expect_statement_end(&[pc_ast::TokenKind::EndType])?;
        fields.push((field_name, field_ty));
        ctx.skip_newlines();
    }
    ctx.expect(pc_ast::TokenKind::EndType, "ENDTYPE")?;
    ctx.expect_statement_end(enclosing)?;
    Ok(Stmt::new(StmtKind::TypeDecl { name, fields }, pos))
}

fn parse_assign(ctx: &mut ParserContext, enclosing: &[pc_ast::TokenKind]) -> Result<Stmt> {
    let pos = ctx.position();
    let target = parse_expression(ctx)?;
    if !target.is_variable_reference() {
        return Err(ctx.malformed("the left side of an assignment must be a variable, array element, or field"));
    }
    ctx.expect(pc_ast::TokenKind::Assign, "'<-'")?;
    let value = parse_expression(ctx)?;
    ctx.expect_statement_end(enclosing)?;
    Ok(Stmt::new(StmtKind::Assign { target, value }, pos))
}

fn parse_output(ctx: &mut ParserContext, enclosing: &[pc_ast::TokenKind]) -> Result<Stmt> {
    let pos = ctx.position();
    ctx.advance(); // OUTPUT
    let mut values = vec![parse_expression(ctx)?];
    while ctx.check(&pc_ast::TokenKind::Comma) {
        ctx.advance();
        values.push(parse_expression(ctx)?);
    }
    ctx.expect_statement_end(enclosing)?;
    Ok(Stmt::new(StmtKind::Output { values }, pos))
}

fn parse_input(ctx: &mut ParserContext, enclosing: &[pc_ast::TokenKind]) -> Result<Stmt> {
    let pos = ctx.position();
    ctx.advance(); // INPUT
    let target = parse_expression(ctx)?;
    if !target.is_variable_reference() {
        return Err(ctx.malformed("INPUT's target must be a variable, array element, or field"));
    }
    ctx.expect_statement_end(enclosing)?;
    Ok(Stmt::new(StmtKind::Input { target }, pos))
}

fn parse_if(ctx: &mut ParserContext, enclosing: &[pc_ast::TokenKind]) -> Result<Stmt> {
    use pc_ast::TokenKind::*;
    let pos = ctx.position();
    ctx.advance(); // IF
    let cond = parse_expression(ctx)?;
    ctx.expect(Then, "THEN")?;
    ctx.expect_statement_end(&[Else, EndIf])?;
    let then_block = parse_block(ctx, &[Else, EndIf])?;
    let else_block = if ctx.check(&Else) {
        ctx.advance();
        ctx.expect_statement_end(&[EndIf])?;
        parse_block(ctx, &[EndIf])?
    } else {
        Vec::new()
    };
    ctx.expect(EndIf, "ENDIF")?;
    ctx.expect_statement_end(enclosing)?;
    Ok(Stmt::new(StmtKind::If { cond, then_block, else_block }, pos))
}

fn parse_literal(ctx: &mut ParserContext) -> Result<LiteralValue> {
    use pc_ast::TokenKind::*;
    let negative = if ctx.check(&Minus) {
        ctx.advance();
        true
    } else {
        false
    };
    match ctx.peek_kind().clone() {
        Integer(i) => {
            ctx.advance();
            Ok(LiteralValue::Integer(if negative { -i } else { i }))
        }
        Real(r) => {
            ctx.advance();
            Ok(LiteralValue::Real(if negative { -r } else { r }))
        }
        StringLit(s) if !negative => {
            ctx.advance();
            Ok(LiteralValue::Str(s))
        }
        BooleanLit(b) if !negative => {
            ctx.advance();
            Ok(LiteralValue::Boolean(b))
        }
        other => Err(ctx.malformed(format!("expected a literal CASE value, found '{other}'"))),
    }
}

fn parse_case(ctx: &mut ParserContext, enclosing: &[pc_ast::TokenKind]) -> Result<Stmt> {
    use pc_ast::TokenKind::*;
    let pos = ctx.position();
    ctx.advance(); // CASE
    ctx.expect(Of, "OF")?;
    let scrutinee = parse_expression(ctx)?;
    ctx.expect_statement_end(&[EndCase, Otherwise])?;
    ctx.skip_newlines();

    let arm_terminators = [EndCase, Otherwise];
    let mut arms = Vec::new();
    while !ctx.check(&EndCase) && !ctx.check(&Otherwise) && !ctx.is_eof() {
        let value = parse_literal(ctx)?;
        ctx.expect(Colon, "':'")?;
        let body = Box::new(parse_statement(ctx, &arm_terminators)?);
        arms.push(CaseArm { value, body });
        ctx.skip_newlines();
    }

    let otherwise = if ctx.check(&Otherwise) {
        ctx.advance();
        ctx.expect(Colon, "':'")?;
        let body = Box::new(parse_statement(ctx, &[EndCase])?);
        ctx.skip_newlines();
        Some(body)
    } else {
        None
    };

    ctx.expect(EndCase, "ENDCASE")?;
    ctx.expect_statement_end(enclosing)?;
    Ok(Stmt::new(StmtKind::Case { scrutinee, arms, otherwise }, pos))
}

fn parse_while(ctx: &mut ParserContext, enclosing: &[pc_ast::TokenKind]) -> Result<Stmt> {
    use pc_ast::TokenKind::*;
    let pos = ctx.position();
    ctx.advance(); // WHILE
    let cond = parse_expression(ctx)?;
    ctx.expect(Do, "DO")?;
    ctx.expect_statement_end(&[EndWhile])?;
    let body = parse_block(ctx, &[EndWhile])?;
    ctx.expect(EndWhile, "ENDWHILE")?;
    ctx.expect_statement_end(enclosing)?;
    Ok(Stmt::new(StmtKind::While { cond, body }, pos))
}

fn parse_repeat(ctx: &mut ParserContext, enclosing: &[pc_ast::TokenKind]) -> Result<Stmt> {
    use pc_ast::TokenKind::*;
    let pos = ctx.position();
    ctx.advance(); // REPEAT
    ctx.expect_statement_end(&[Until])?;
    let body = parse_block(ctx, &[Until])?;
    ctx.expect(Until, "UNTIL")?;
    let until = parse_expression(ctx)?;
    ctx.expect_statement_end(enclosing)?;
    Ok(Stmt::new(StmtKind::Repeat { body, until }, pos))
}

fn parse_for(ctx: &mut ParserContext, enclosing: &[pc_ast::TokenKind]) -> Result<Stmt> {
    use pc_ast::TokenKind::*;
    let pos = ctx.position();
    ctx.advance(); // FOR
    let (var, _) = ctx.expect_ident()?;
    ctx.expect(Assign, "'<-'")?;
    let start = parse_expression(ctx)?;
    ctx.expect(To, "TO")?;
    let stop = parse_expression(ctx)?;
    let step = if ctx.check(&Step) {
        ctx.advance();
        Some(parse_expression(ctx)?)
    } else {
        None
    };
    ctx.expect_statement_end(&[EndFor])?;
    let body = parse_block(ctx, &[EndFor])?;
    ctx.expect(EndFor, "ENDFOR")?;
    // A trailing loop-variable name on ENDFOR (`ENDFOR I`) is tolerated but not
    // checked against `var` here.
    if matches!(ctx.peek_kind(), Ident(_)) {
        ctx.advance();
    }
    ctx.expect_statement_end(enclosing)?;
    Ok(Stmt::new(StmtKind::For { var, start, stop, step, body }, pos))
}

fn parse_params(ctx: &mut ParserContext) -> Result<Vec<Param>> {
    use pc_ast::TokenKind::*;
    ctx.expect(LParen, "'('")?;
    let mut params = Vec::new();
    if !ctx.check(&RParen) {
        loop {
            let mode = match ctx.peek_kind() {
                ByValue => {
                    ctx.advance();
                    ParamMode::ByValue
                }
                ByRef => {
                    ctx.advance();
                    ParamMode::ByRef
                }
                other => {
                    return Err(ctx.malformed(format!(
                        "expected BYVALUE or BYREF before parameter name, found '{other}'"
                    )))
                }
            };
            let (name, _) = ctx.expect_ident()?;
            ctx.expect(Colon, "':'")?;
            let ty = parse_type(ctx)?;
            params.push(Param { name, ty, mode });
            if ctx.check(&Comma) {
                ctx.advance();
                continue;
            }
            break;
        }
    }
    ctx.expect(RParen, "')'")?;
    Ok(params)
}

fn parse_procedure(ctx: &mut ParserContext, enclosing: &[pc_ast::TokenKind]) -> Result<Stmt> {
    use pc_ast::TokenKind::*;
    let pos = ctx.position();
    ctx.advance(); // PROCEDURE
    let (name, _) = ctx.expect_ident()?;
    let params = parse_params(ctx)?;
    ctx.expect_statement_end(&[EndProcedure])?;
    let body = parse_block(ctx, &[EndProcedure])?;
    ctx.expect(EndProcedure, "ENDPROCEDURE")?;
    ctx.expect_statement_end(enclosing)?;
    let decl = Rc::new(CallableDecl { name, params, return_type: None, body, position: pos });
    Ok(Stmt::new(StmtKind::ProcedureDecl(decl), pos))
}

fn parse_function(ctx: &mut ParserContext, enclosing: &[pc_ast::TokenKind]) -> Result<Stmt> {
    use pc_ast::TokenKind::*;
    let pos = ctx.position();
    ctx.advance(); // FUNCTION
    let (name, _) = ctx.expect_ident()?;
    let params = parse_params(ctx)?;
    ctx.expect(Returns, "RETURNS")?;
    let return_type = parse_type(ctx)?;
    ctx.expect_statement_end(&[EndFunction])?;
    let body = parse_block(ctx, &[EndFunction])?;
    ctx.expect(EndFunction, "ENDFUNCTION")?;
    ctx.expect_statement_end(enclosing)?;
    let decl = Rc::new(CallableDecl { name, params, return_type: Some(return_type), body, position: pos });
    Ok(Stmt::new(StmtKind::FunctionDecl(decl), pos))
}

fn parse_call_stmt(ctx: &mut ParserContext, enclosing: &[pc_ast::TokenKind]) -> Result<Stmt> {
    use pc_ast::TokenKind::*;
    let pos = ctx.position();
    ctx.advance(); // CALL
    let (name, _) = ctx.expect_ident()?;
    let args = if ctx.check(&LParen) {
        ctx.advance();
        let mut args = Vec::new();
        if !ctx.check(&RParen) {
            args.push(parse_expression(ctx)?);
            while ctx.check(&Comma) {
                ctx.advance();
                args.push(parse_expression(ctx)?);
            }
        }
        ctx.expect(RParen, "')'")?;
        args
    } else {
        Vec::new()
    };
    ctx.expect_statement_end(enclosing)?;
    Ok(Stmt::new(StmtKind::CallStmt { name, args }, pos))
}

fn parse_return(ctx: &mut ParserContext, enclosing: &[pc_ast::TokenKind]) -> Result<Stmt> {
    let pos = ctx.position();
    ctx.advance(); // RETURN
    let value = parse_expression(ctx)?;
    ctx.expect_statement_end(enclosing)?;
    Ok(Stmt::new(StmtKind::Return { value }, pos))
}

fn parse_open_file(ctx: &mut ParserContext, enclosing: &[pc_ast::TokenKind]) -> Result<Stmt> {
    use pc_ast::TokenKind::*;
    let pos = ctx.position();
    ctx.advance(); // OPENFILE
    let name = ctx.expect_filename()?;
    ctx.expect(For, "FOR")?;
    let mode = match ctx.peek_kind() {
        Read => FileMode::Read,
        WriteMode => FileMode::Write,
        Append => FileMode::Append,
        other => {
            return Err(ctx.malformed(format!("expected READ, WRITE, or APPEND, found '{}'", other.clone())))
        }
    };
    ctx.advance();
    ctx.expect_statement_end(enclosing)?;
    Ok(Stmt::new(StmtKind::OpenFile { name, mode }, pos))
}

fn parse_read_file(ctx: &mut ParserContext, enclosing: &[pc_ast::TokenKind]) -> Result<Stmt> {
    let pos = ctx.position();
    ctx.advance(); // READFILE
    let name = ctx.expect_filename()?;
    ctx.expect(pc_ast::TokenKind::Comma, "','")?;
    let target = parse_expression(ctx)?;
    if !target.is_variable_reference() {
        return Err(ctx.malformed("READFILE's target must be a variable, array element, or field"));
    }
    ctx.expect_statement_end(enclosing)?;
    Ok(Stmt::new(StmtKind::ReadFile { name, target }, pos))
}

fn parse_write_file(ctx: &mut ParserContext, enclosing: &[pc_ast::TokenKind]) -> Result<Stmt> {
    let pos = ctx.position();
    ctx.advance(); // WRITEFILE
    let name = ctx.expect_filename()?;
    ctx.expect(pc_ast::TokenKind::Comma, "','")?;
    let value = parse_expression(ctx)?;
    ctx.expect_statement_end(enclosing)?;
    Ok(Stmt::new(StmtKind::WriteFile { name, value }, pos))
}

fn parse_close_file(ctx: &mut ParserContext, enclosing: &[pc_ast::TokenKind]) -> Result<Stmt> {
    let pos = ctx.position();
    ctx.advance(); // CLOSEFILE
    let name = ctx.expect_filename()?;
    ctx.expect_statement_end(enclosing)?;
    Ok(Stmt::new(StmtKind::CloseFile { name }, pos))
}
