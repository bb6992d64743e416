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

//! Recursive-descent / Pratt parser turning a scanned token stream into a
//! [`pc_ast::Program`], per `spec.md` §4.2. Grounded on the teacher's
//! `ParserContext`-driven parser (`compiler/parser/src/parser/{mod,context,
//! expression,statement}.rs`): a cursor over the token slice, precedence
//! climbing for expressions, and recursive descent with explicit terminator
//! checks for statements.

mod context;
mod expression;
mod statement;
mod type_;

use context::ParserContext;
use pc_ast::{Program, Token};
use pc_errors::Result;

/// Parses a complete token stream (including its trailing `Eof` token) into a
/// program. The token stream is expected to come from [`pc_lexer::Scanner::scan`].
#[tracing::instrument(skip_all)]
pub fn parse(tokens: Vec<Token>) -> Result<Program> {
    let mut ctx = ParserContext::new(tokens);
    let program = statement::parse_program(&mut ctx)?;
    if !ctx.is_eof() {
        return Err(ctx.malformed(format!("unexpected trailing token '{}'", ctx.peek_kind())));
    }
    tracing::debug!(statements = program.statements.len(), "parsed program");
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pc_ast::{ExprKind, StmtKind};
    use pc_lexer::Scanner;

    fn parse_source(src: &str) -> Program {
        let tokens = Scanner::scan(src).unwrap();
        parse(tokens).unwrap()
    }

    #[test]
    fn parses_hello_world() {
        let program = parse_source("OUTPUT \"Hello World!\"");
        assert_eq!(program.statements.len(), 1);
        assert!(matches!(program.statements[0].kind, StmtKind::Output { .. }));
    }

    #[test]
    fn parses_declare_and_assign() {
        let program = parse_source("DECLARE X : INTEGER\nX <- 1 + 2 * 3");
        assert_eq!(program.statements.len(), 2);
        assert!(matches!(program.statements[0].kind, StmtKind::Declare { .. }));
        match &program.statements[1].kind {
            StmtKind::Assign { value, .. } => {
                // Multiplication binds tighter than addition.
                match &value.kind {
                    ExprKind::Binary(pc_ast::BinaryOp::Add, _, rhs) => {
                        assert!(matches!(rhs.kind, ExprKind::Binary(pc_ast::BinaryOp::Mul, _, _)));
                    }
                    other => panic!("expected an addition at the top, got {other:?}"),
                }
            }
            other => panic!("expected an assignment, got {other:?}"),
        }
    }

    #[test]
    fn parses_array_declaration() {
        let program = parse_source("DECLARE Scores : ARRAY[1:10] OF INTEGER");
        match &program.statements[0].kind {
            StmtKind::DeclareArray { dims, elem, .. } => {
                assert_eq!(dims.len(), 1);
                assert_eq!(dims[0].lo, 1);
                assert_eq!(dims[0].hi, 10);
                assert_eq!(*elem, pc_ast::Type::Integer);
            }
            other => panic!("expected a DeclareArray, got {other:?}"),
        }
    }

    #[test]
    fn parses_if_else() {
        let program = parse_source("IF X > 0 THEN\n  OUTPUT \"pos\"\nELSE\n  OUTPUT \"non-pos\"\nENDIF");
        match &program.statements[0].kind {
            StmtKind::If { then_block, else_block, .. } => {
                assert_eq!(then_block.len(), 1);
                assert_eq!(else_block.len(), 1);
            }
            other => panic!("expected an If, got {other:?}"),
        }
    }

    #[test]
    fn parses_for_loop_with_tolerated_endfor_name() {
        let program = parse_source("FOR I <- 1 TO 5\n  T <- T + I\nENDFOR I");
        assert!(matches!(program.statements[0].kind, StmtKind::For { .. }));
    }

    #[test]
    fn parses_procedure_with_byref_param() {
        let program = parse_source(
            "PROCEDURE Swap(BYREF A : INTEGER, BYREF B : INTEGER)\n  DECLARE Tmp : INTEGER\nENDPROCEDURE",
        );
        match &program.statements[0].kind {
            StmtKind::ProcedureDecl(decl) => {
                assert_eq!(decl.params.len(), 2);
                assert_eq!(decl.params[0].mode, pc_ast::ParamMode::ByRef);
            }
            other => panic!("expected a ProcedureDecl, got {other:?}"),
        }
    }

    #[test]
    fn relational_operators_do_not_chain() {
        let tokens = Scanner::scan("X <- 1 < 2 < 3").unwrap();
        assert!(parse(tokens).is_err());
    }

    #[test]
    fn parses_case_statement_with_otherwise() {
        let program = parse_source(
            "CASE OF Grade\n  1 : OUTPUT \"A\"\n  2 : OUTPUT \"B\"\n  OTHERWISE : OUTPUT \"?\"\nENDCASE",
        );
        match &program.statements[0].kind {
            StmtKind::Case { arms, otherwise, .. } => {
                assert_eq!(arms.len(), 2);
                assert!(otherwise.is_some());
            }
            other => panic!("expected a Case, got {other:?}"),
        }
    }

    #[test]
    fn parses_dotted_filename_in_file_statements() {
        let program = parse_source("OPENFILE FileA.txt FOR READ");
        match &program.statements[0].kind {
            StmtKind::OpenFile { name, mode } => {
                assert_eq!(name, "FileA.txt");
                assert_eq!(*mode, pc_ast::FileMode::Read);
            }
            other => panic!("expected an OpenFile, got {other:?}"),
        }
    }
}
