/*
 * Copyright (c) 2023-2025 Atsushi Komaba
 *
 * This file is part of Cminus.
 * Cminus is free software: you can redistribute it and/or
 * modify it under the terms of the GNU General Public License
 * as published by the Free Software Foundation, either version 3
 * of the License, or any later version.
 *
 * Cminus is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Cminus. If not, see <https://www.gnu.org/licenses/>.
 */

#![cfg(test)]

use super::*;

fn semantic_errors(input: &str) -> Vec<(usize, SemanticError)> {
    let compilation = compile(input).unwrap();
    assert!(compilation.analysis.logger.syntax_errors().is_empty());
    compilation.analysis.logger.semantic_errors().to_vec()
}

#[test]
fn global_assignment_and_output() {
    let compilation = compile("int x; void main(void){ x = 1 + 2; output(x); }").unwrap();
    let logger = &compilation.analysis.logger;
    assert!(logger.lexical_errors().is_empty());
    assert!(logger.syntax_errors().is_empty());
    assert!(logger.semantic_errors().is_empty());
    assert_eq!(
        compilation.program.to_string(),
        "0\t(ASSIGN, #112, 100, )
1\t(ADD, 100, #4, 100)
2\t(JP, 25, , )
3\t(JP, 9, , )
4\t(SUB, 104, #8, 100)
5\t(SUB, 104, #4, 108)
6\t(ASSIGN, @108, 108, )
7\t(ASSIGN, @100, 104, )
8\t(JP, @108, , )
9\t(ASSIGN, #1, @100, )
10\t(ADD, 100, #4, 100)
11\t(ASSIGN, #2, @100, )
12\t(ADD, 100, #4, 100)
13\t(SUB, 100, #4, 100)
14\t(SUB, 100, #4, 108)
15\t(ADD, @108, @100, @108)
16\t(SUB, 100, #4, 100)
17\t(ASSIGN, @100, 112, )
18\t(ADD, 100, #4, 100)
19\t(SUB, 100, #4, 100)
20\t(ASSIGN, 112, @100, )
21\t(ADD, 100, #4, 100)
22\t(SUB, 100, #4, 100)
23\t(PRINT, @100, , )
24\t(JP, 4, , )
25\t(ADD, 100, #12, 100)
26\t(ASSIGN, 100, 104, )
27\t(SUB, 104, #4, 108)
28\t(ASSIGN, #30, @108, )
29\t(JP, 3, , )
"
    );
}

#[test]
fn break_outside_loop() {
    let compilation = compile("void main(void) {\n break;\n}").unwrap();
    assert_eq!(
        compilation.analysis.logger.semantic_errors(),
        [(2, SemanticError::BreakOutsideLoop)]
    );
    assert!(compilation.program.is_complete());
}

#[test]
fn argument_count_mismatch() {
    let compilation = compile(
        "int f(int a, int b) { return a + b; }
void main(void) { output(f(1)); }",
    )
    .unwrap();
    assert_eq!(
        compilation.analysis.logger.semantic_errors(),
        [(2, SemanticError::ArgumentCountMismatch("f".to_owned()))]
    );
    assert!(compilation.program.is_complete());
    // `f` starts right after the slot that jumps over it.
    assert!(
        compilation
            .program
            .slots()
            .contains(&Some(Instruction::jp(Operand::Direct(2))))
    );
}

#[test]
fn argument_type_mismatch() {
    let errors = semantic_errors("void f(int a[]) { } void main(void) { int x; f(x); }");
    assert_eq!(
        errors,
        [(
            1,
            SemanticError::ArgumentTypeMismatch {
                position: 1,
                function: "f".to_owned(),
                expected: Ty::Array,
                found: Ty::Int,
            }
        )]
    );
    assert_eq!(
        errors[0].1.to_string(),
        "Mismatch in type of argument 1 of 'f'. Expected 'array' but got 'int' instead."
    );
}

#[test]
fn name_not_defined() {
    assert_eq!(
        semantic_errors("void main(void) { x = y; }"),
        [
            (1, SemanticError::NameNotDefined("y".to_owned())),
            (1, SemanticError::NameNotDefined("x".to_owned())),
        ]
    );
    assert_eq!(
        semantic_errors("void main(void) { g(1); }"),
        [(1, SemanticError::NameNotDefined("g".to_owned()))]
    );
}

#[test]
fn missing_main() {
    assert_eq!(
        semantic_errors("int x;"),
        [(1, SemanticError::NameNotDefined("main".to_owned()))]
    );
}

#[test]
fn void_variable() {
    assert_eq!(
        semantic_errors("void x; void main(void) {\n x = 1;\n}"),
        [
            (1, SemanticError::IllegalVoidType("x".to_owned())),
            (2, SemanticError::NameNotDefined("x".to_owned())),
        ]
    );
    assert_eq!(
        semantic_errors("void main(void) { void a[2]; }"),
        [(1, SemanticError::IllegalVoidType("a".to_owned()))]
    );
}

#[test]
fn type_mismatch() {
    let errors = semantic_errors("int a[2]; void main(void) { int x; x = a; }");
    assert_eq!(
        errors,
        [(
            1,
            SemanticError::TypeMismatch {
                expected: Ty::Int,
                found: Ty::Array,
            }
        )]
    );
    assert_eq!(
        errors[0].1.to_string(),
        "Type mismatch in operands, Got array instead of int."
    );
    assert_eq!(
        semantic_errors("int a[2]; void main(void) { output(a + 1); }"),
        [(
            1,
            SemanticError::TypeMismatch {
                expected: Ty::Int,
                found: Ty::Array,
            }
        )]
    );
}

#[test]
fn return_type_mismatch() {
    assert_eq!(
        semantic_errors("int a[2]; int f(void) { return a; } void main(void) { }"),
        [(
            1,
            SemanticError::TypeMismatch {
                expected: Ty::Int,
                found: Ty::Array,
            }
        )]
    );
}

#[test]
fn scopes_release_stack() {
    let compilation = compile("void main(void) { int a; { int b[3]; } }").unwrap();
    let listing = compilation.program.to_string();
    let body: Vec<_> = listing.lines().skip(8).take(5).collect();
    assert_eq!(
        body,
        [
            "8\t(ADD, 100, #4, 100)",
            "9\t(ADD, 100, #12, 100)",
            "10\t(SUB, 100, #12, 100)",
            "11\t(SUB, 100, #4, 100)",
            "12\t(JP, 3, , )",
        ]
    );
}

#[test]
fn jumps_are_backpatched() {
    let compilation = compile(
        "int a[4];
void main(void) {
    int i;
    for (i = 0; i < 4; i = i + 1) {
        if (i == 2) break; else a[i] = i; endif
    }
}",
    )
    .unwrap();
    let logger = &compilation.analysis.logger;
    assert!(logger.syntax_errors().is_empty());
    assert!(logger.semantic_errors().is_empty());
    assert!(compilation.program.is_complete());
}

#[test]
fn deterministic() {
    let input = "int f(int n) { if (n < 2) return 1; endif return n * f(n - 1); }
void main(void) { output(f(5)); }";
    assert_eq!(
        compile(input).unwrap().program,
        compile(input).unwrap().program
    );
}

#[test]
fn broken_stack_after_syntax_error() {
    let mut generator = CodeGenerator::new();
    let analysis = frontend::analyze("void main(void) { x = ; output(1); }", &mut generator);
    assert_eq!(analysis.logger.syntax_errors().len(), 1);
    assert_eq!(
        generator.fault(),
        Some(&InternalError::StackShape {
            action: "assign",
            line: 1,
        })
    );
    assert!(compile("void main(void) { x = ; output(1); }").is_ok());
}
