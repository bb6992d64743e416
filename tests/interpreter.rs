//! End-to-end tests driving the whole pipeline (scan -> parse -> resolve ->
//! interpret) through [`pc9608::run_source`], per `spec.md` §8's worked
//! scenarios.

use pc_interpreter::testing::MemoryHostIo;

fn run(src: &str, host: &mut MemoryHostIo) -> pc_errors::Result<()> {
    pc9608::run_source(src, host)
}

#[test]
fn hello_world() {
    let mut host = MemoryHostIo::new();
    run("OUTPUT \"Hello, World!\"", &mut host).unwrap();
    assert_eq!(host.output, "Hello, World!\n");
}

#[test]
fn accumulating_for_loop() {
    let src = "DECLARE Total : INTEGER\n\
               DECLARE I : INTEGER\n\
               Total <- 0\n\
               FOR I <- 1 TO 10\n\
               \tTotal <- Total + I\n\
               ENDFOR\n\
               OUTPUT Total";
    let mut host = MemoryHostIo::new();
    run(src, &mut host).unwrap();
    assert_eq!(host.output, "55\n");
}

#[test]
fn procedure_byref_swap() {
    let src = "PROCEDURE Swap(BYREF A : INTEGER, BYREF B : INTEGER)\n\
               \tDECLARE Temp : INTEGER\n\
               \tTemp <- A\n\
               \tA <- B\n\
               \tB <- Temp\n\
               ENDPROCEDURE\n\
               DECLARE X : INTEGER\n\
               DECLARE Y : INTEGER\n\
               X <- 1\n\
               Y <- 2\n\
               CALL Swap(X, Y)\n\
               OUTPUT X\n\
               OUTPUT Y";
    let mut host = MemoryHostIo::new();
    run(src, &mut host).unwrap();
    assert_eq!(host.output, "2\n1\n");
}

#[test]
fn recursive_function() {
    let src = "FUNCTION Fib(BYVALUE N : INTEGER) RETURNS INTEGER\n\
               \tIF N < 2 THEN\n\
               \t\tRETURN N\n\
               \tELSE\n\
               \t\tRETURN Fib(N - 1) + Fib(N - 2)\n\
               \tENDIF\n\
               ENDFUNCTION\n\
               OUTPUT Fib(10)";
    let mut host = MemoryHostIo::new();
    run(src, &mut host).unwrap();
    assert_eq!(host.output, "55\n");
}

#[test]
fn record_and_array_composition() {
    let src = "TYPE Student\n\
               \tDECLARE Name : STRING\n\
               \tDECLARE Score : INTEGER\n\
               ENDTYPE\n\
               DECLARE Students : ARRAY[1:2] OF Student\n\
               Students[1].Name <- \"Ada\"\n\
               Students[1].Score <- 90\n\
               Students[2].Name <- \"Bo\"\n\
               Students[2].Score <- 75\n\
               OUTPUT Students[1].Name, \" \", Students[1].Score\n\
               OUTPUT Students[2].Name, \" \", Students[2].Score";
    let mut host = MemoryHostIo::new();
    run(src, &mut host).unwrap();
    assert_eq!(host.output, "Ada 90\nBo 75\n");
}

#[test]
fn file_copy_with_blank_line_substitution() {
    let src = "OPENFILE in.txt FOR READ\n\
               OPENFILE out.txt FOR WRITE\n\
               DECLARE Line : STRING\n\
               WHILE NOT EOF(\"in.txt\") DO\n\
               \tREADFILE in.txt, Line\n\
               \tIF Line = \"\" THEN\n\
               \t\tWRITEFILE out.txt, \"<blank>\"\n\
               \tELSE\n\
               \t\tWRITEFILE out.txt, Line\n\
               \tENDIF\n\
               ENDWHILE\n\
               CLOSEFILE in.txt\n\
               CLOSEFILE out.txt";
    let mut host = MemoryHostIo::new();
    host.seed_file("in.txt", ["first", "", "third"]);
    run(src, &mut host).unwrap();
    assert_eq!(host.file_contents("out.txt").unwrap(), &["first", "<blank>", "third"]);
}

#[test]
fn undeclared_name_is_rejected_before_execution() {
    let mut host = MemoryHostIo::new();
    let err = run("X <- 1", &mut host).unwrap_err();
    assert!(err.to_string().contains("ResolveError"));
}

#[test]
fn return_inside_a_procedure_is_rejected() {
    let src = "PROCEDURE P()\n\tRETURN 1\nENDPROCEDURE";
    let mut host = MemoryHostIo::new();
    let err = run(src, &mut host).unwrap_err();
    assert!(err.to_string().contains("ResolveError"));
}

#[test]
fn non_variable_expression_as_a_byref_argument_is_rejected() {
    let src = "PROCEDURE Inc(BYREF X : INTEGER)\n\tX <- X + 1\nENDPROCEDURE\nCALL Inc(1 + 1)";
    let mut host = MemoryHostIo::new();
    let err = run(src, &mut host).unwrap_err();
    assert!(err.to_string().contains("ResolveError"));
}

#[test]
fn opening_an_already_open_file_is_a_runtime_error() {
    let src = "OPENFILE data.txt FOR WRITE\nOPENFILE data.txt FOR WRITE";
    let mut host = MemoryHostIo::new();
    let err = run(src, &mut host).unwrap_err();
    assert!(err.to_string().contains("RuntimeError"));
}
