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

//! The tree-walking evaluator for resolved 9608 pseudocode programs, per
//! `spec.md` §5-§6. Consumes a [`pc_ast::Program`] that has already passed
//! through `pc_resolver::resolve` -- every `Expr::resolved_type` is `Some`
//! and every name reference is known to be in scope -- and drives it to
//! completion against a [`HostIo`] backend.

mod builtins;
mod file_table;
mod frame;
mod interpreter;
mod place;
mod signal;
mod value;

pub use file_table::{testing, HostIo, StdHostIo};
pub use interpreter::run;
pub use value::Value;

#[cfg(test)]
mod tests {
    use super::*;
    use testing::MemoryHostIo;

    fn run_with(src: &str, host: &mut MemoryHostIo) -> pc_errors::Result<()> {
        let tokens = pc_lexer::Scanner::scan(src).unwrap();
        let program = pc_parser::parse(tokens).unwrap();
        pc_resolver::resolve(&program).unwrap();
        run(&program, host)
    }

    #[test]
    fn hello_world_prints_a_line() {
        let mut host = MemoryHostIo::new();
        run_with("OUTPUT \"Hello, World!\"", &mut host).unwrap();
        assert_eq!(host.output, "Hello, World!\n");
    }

    #[test]
    fn accumulating_for_loop_sums_one_to_five() {
        let src = "DECLARE Total : INTEGER\nDECLARE I : INTEGER\nTotal <- 0\nFOR I <- 1 TO 5\n  Total <- Total + I\nENDFOR\nOUTPUT Total";
        let mut host = MemoryHostIo::new();
        run_with(src, &mut host).unwrap();
        assert_eq!(host.output, "15\n");
    }

    #[test]
    fn byref_parameter_mutates_the_caller_variable() {
        let src = "PROCEDURE Inc(BYREF X : INTEGER)\n  X <- X + 1\nENDPROCEDURE\nDECLARE N : INTEGER\nN <- 41\nCALL Inc(N)\nOUTPUT N";
        let mut host = MemoryHostIo::new();
        run_with(src, &mut host).unwrap();
        assert_eq!(host.output, "42\n");
    }

    #[test]
    fn byvalue_parameter_does_not_mutate_the_caller_variable() {
        let src = "PROCEDURE Inc(BYVALUE X : INTEGER)\n  X <- X + 1\nENDPROCEDURE\nDECLARE N : INTEGER\nN <- 41\nCALL Inc(N)\nOUTPUT N";
        let mut host = MemoryHostIo::new();
        run_with(src, &mut host).unwrap();
        assert_eq!(host.output, "41\n");
    }

    #[test]
    fn recursive_function_computes_factorial() {
        let src = "FUNCTION Fact(BYVALUE N : INTEGER) RETURNS INTEGER\n  IF N <= 1 THEN\n    RETURN 1\n  ELSE\n    RETURN N * Fact(N - 1)\n  ENDIF\nENDFUNCTION\nOUTPUT Fact(5)";
        let mut host = MemoryHostIo::new();
        run_with(src, &mut host).unwrap();
        assert_eq!(host.output, "120\n");
    }

    #[test]
    fn record_field_and_array_element_assignment() {
        let src = "TYPE Point\n  DECLARE X : INTEGER\n  DECLARE Y : INTEGER\nENDTYPE\nDECLARE P : Point\nDECLARE A : ARRAY[1:3] OF INTEGER\nP.X <- 10\nP.Y <- 20\nA[2] <- 99\nOUTPUT P.X + P.Y + A[2]";
        let mut host = MemoryHostIo::new();
        run_with(src, &mut host).unwrap();
        assert_eq!(host.output, "129\n");
    }

    #[test]
    fn whole_array_assignment_copies_rather_than_aliases() {
        let src = "DECLARE A : ARRAY[1:2] OF INTEGER\nDECLARE B : ARRAY[1:2] OF INTEGER\nA[1] <- 1\nA[2] <- 2\nB <- A\nB[1] <- 99\nOUTPUT A[1]\nOUTPUT B[1]";
        let mut host = MemoryHostIo::new();
        run_with(src, &mut host).unwrap();
        assert_eq!(host.output, "1\n99\n");
    }

    #[test]
    fn integer_widens_to_real_on_assignment_and_formats_with_a_decimal_point() {
        let src = "DECLARE R : REAL\nR <- 5\nOUTPUT R";
        let mut host = MemoryHostIo::new();
        run_with(src, &mut host).unwrap();
        assert_eq!(host.output, "5.0\n");
    }

    #[test]
    fn division_by_zero_is_a_runtime_error() {
        let mut host = MemoryHostIo::new();
        let err = run_with("DECLARE X : INTEGER\nX <- 1 / 0", &mut host).unwrap_err();
        assert!(err.to_string().contains("RuntimeError"));
    }

    #[test]
    fn for_loop_with_zero_step_is_a_runtime_error() {
        let src = "DECLARE I : INTEGER\nFOR I <- 1 TO 5 STEP 0\n  OUTPUT I\nENDFOR";
        let mut host = MemoryHostIo::new();
        assert!(run_with(src, &mut host).is_err());
    }

    #[test]
    fn out_of_bounds_array_access_is_a_runtime_error() {
        let src = "DECLARE A : ARRAY[1:3] OF INTEGER\nDECLARE X : INTEGER\nX <- A[9]";
        let mut host = MemoryHostIo::new();
        assert!(run_with(src, &mut host).is_err());
    }

    #[test]
    fn file_write_then_read_round_trips_through_the_host() {
        let src = "OPENFILE data.txt FOR WRITE\nWRITEFILE data.txt, \"hello\"\nCLOSEFILE data.txt\nOPENFILE data.txt FOR READ\nDECLARE Line : STRING\nREADFILE data.txt, Line\nCLOSEFILE data.txt\nOUTPUT Line";
        let mut host = MemoryHostIo::new();
        run_with(src, &mut host).unwrap();
        assert_eq!(host.output, "hello\n");
    }

    #[test]
    fn eof_reports_true_once_every_line_is_consumed() {
        let src = "OPENFILE data.txt FOR READ\nDECLARE Line : STRING\nREADFILE data.txt, Line\nOUTPUT EOF(\"data.txt\")\nCLOSEFILE data.txt";
        let mut host = MemoryHostIo::new();
        host.seed_file("data.txt", ["only line"]);
        run_with(src, &mut host).unwrap();
        assert_eq!(host.output, "TRUE\n");
    }
}
