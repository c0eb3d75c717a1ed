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
use crate::codegen::compile;

const MAX_STEPS: usize = 100_000;

fn outputs(input: &str) -> Vec<i32> {
    let compilation = compile(input).unwrap();
    let logger = &compilation.analysis.logger;
    assert!(logger.lexical_errors().is_empty(), "{:?}", logger.lexical_errors());
    assert!(logger.syntax_errors().is_empty(), "{:?}", logger.syntax_errors());
    assert!(logger.semantic_errors().is_empty(), "{:?}", logger.semantic_errors());
    assert!(compilation.program.is_complete());
    run(&compilation.program, MAX_STEPS).unwrap()
}

#[test]
fn assignment_and_output() {
    assert_eq!(
        outputs("int x; void main(void){ x = 1 + 2; output(x); }"),
        [3]
    );
}

#[test]
fn arithmetic() {
    assert_eq!(
        outputs(
            "void main(void) {
    output(-3 + 5 * 2);
    output(2 < 1);
    output(1 == 1);
    output(-(4) - 10);
    output((1 + 2) * (3 - 7));
}"
        ),
        [7, 0, 1, -14, -12]
    );
}

#[test]
fn recursion() {
    assert_eq!(
        outputs(
            "int fact(int n) {
    if (n < 2) return 1; endif
    return n * fact(n - 1);
}
void main(void) {
    output(fact(5));
    output(fact(1));
}"
        ),
        [120, 1]
    );
}

#[test]
fn arrays() {
    assert_eq!(
        outputs(
            "int a[5];
int sum(int v[], int n) {
    int i;
    int s;
    s = 0;
    for (i = 0; i < n; i = i + 1) s = s + v[i];
    return s;
}
void main(void) {
    int i;
    int b[3];
    for (i = 0; i < 5; i = i + 1) a[i] = i * i;
    b[0] = 7;
    b[1] = 8;
    b[2] = b[0] + 2;
    output(sum(a, 5));
    output(sum(b, 3));
    output(a[4]);
    output(b[2]);
}"
        ),
        [30, 24, 16, 9]
    );
}

#[test]
fn writes_through_array_parameter() {
    assert_eq!(
        outputs(
            "void fill(int v[], int n, int value) {
    int i;
    for (i = 0; i < n; i = i + 1) v[i] = value + i;
}
void main(void) {
    int b[3];
    fill(b, 3, 10);
    output(b[0] + b[1] + b[2]);
}"
        ),
        [33]
    );
}

#[test]
fn break_and_else() {
    assert_eq!(
        outputs(
            "void main(void) {
    int i;
    for (i = 0; i < 10; i = i + 1) {
        if (i == 4) break; else output(i); endif
    }
    output(i);
}"
        ),
        [0, 1, 2, 3, 4]
    );
}

#[test]
fn nested_loops() {
    assert_eq!(
        outputs(
            "void main(void) {
    int i;
    int j;
    int count;
    count = 0;
    for (i = 0; i < 3; i = i + 1)
        for (j = 0; j < 10; j = j + 1) {
            if (j == i) break; endif
            count = count + 1;
        }
    output(count);
}"
        ),
        [3]
    );
}

#[test]
fn return_inside_loop() {
    assert_eq!(
        outputs(
            "int first(int v[], int n, int x) {
    int i;
    for (i = 0; i < n; i = i + 1) {
        if (v[i] == x) return i; endif
    }
    return 0 - 1;
}
int a[4];
void main(void) {
    a[0] = 5; a[1] = 6; a[2] = 7; a[3] = 8;
    output(first(a, 4, 7));
    output(first(a, 4, 9));
}"
        ),
        [2, -1]
    );
}

#[test]
fn block_locals() {
    assert_eq!(
        outputs(
            "int g;
void main(void) {
    int x;
    x = 1;
    {
        int y;
        int x;
        x = 2;
        y = x + 3;
        g = y;
    }
    output(x);
    output(g);
}"
        ),
        [1, 5]
    );
}

#[test]
fn unfilled_slot() {
    let mut program = ProgramBlock::new();
    program.reserve();
    assert_eq!(run(&program, MAX_STEPS), Err(RuntimeError::Placeholder { pc: 0 }));
}

#[test]
fn step_limit() {
    let mut program = ProgramBlock::new();
    program.push(Instruction::jp(Operand::Direct(0)));
    assert_eq!(run(&program, 10), Err(RuntimeError::StepLimit(10)));
}

#[test]
fn jump_to_end_halts() {
    let mut program = ProgramBlock::new();
    program.push(Instruction::jp(Operand::Direct(2)));
    program.push(Instruction::print(Operand::Immediate(1)));
    assert!(run(&program, MAX_STEPS).unwrap().is_empty());
    program.push(Instruction::jp(Operand::Direct(7)));
    program.push(Instruction::print(Operand::Immediate(1)));
    assert_eq!(
        run(&program, MAX_STEPS),
        Err(RuntimeError::InvalidJump { pc: 2, target: 7 })
    );
}

#[test]
fn bad_operands() {
    let mut program = ProgramBlock::new();
    program.push(Instruction::assign(Operand::Immediate(1), Operand::Immediate(2)));
    assert_eq!(
        run(&program, MAX_STEPS),
        Err(RuntimeError::ImmediateDestination { pc: 0 })
    );

    let mut program = ProgramBlock::new();
    program.push(Instruction::assign(Operand::Immediate(-4), Operand::Direct(200)));
    program.push(Instruction::assign(Operand::Immediate(1), Operand::Indirect(200)));
    assert_eq!(
        run(&program, MAX_STEPS),
        Err(RuntimeError::InvalidAddress { pc: 1, address: -4 })
    );
}
