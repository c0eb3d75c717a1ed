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

/*!
 * Three-address code for the stack machine.
 *
 * Three memory cells act as registers: the stack pointer [`SP`], the frame
 * pointer [`FP`] and a scratch cell [`TEMP`]. Globals and the run-time
 * stack live from [`STACK`] upward. Every cell is 4 bytes wide.
 */

use std::fmt::{self, Display, Formatter};

pub const SP: u32 = 100;
pub const FP: u32 = 104;
pub const TEMP: u32 = 108;
pub const STACK: u32 = 112;

/**
 * The size of one cell in bytes.
 */
pub const WORD: u32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    Assign,
    Add,
    Sub,
    Mult,
    Lt,
    Eq,
    Jp,
    Jpf,
    Print,
}

impl Opcode {
    pub fn name(self) -> &'static str {
        match self {
            Opcode::Assign => "ASSIGN",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mult => "MULT",
            Opcode::Lt => "LT",
            Opcode::Eq => "EQ",
            Opcode::Jp => "JP",
            Opcode::Jpf => "JPF",
            Opcode::Print => "PRINT",
        }
    }
}

/**
 * An operand of an [`Instruction`].
 *
 * In the target of `JP` and `JPF`, a [`Direct`](Operand::Direct) operand is
 * the index of an instruction, and an [`Indirect`](Operand::Indirect) one is
 * the address of a cell holding that index.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    /** `#v` */
    Immediate(i32),
    /** `a` */
    Direct(u32),
    /** `@a` */
    Indirect(u32),
}

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Operand::Immediate(value) => write!(f, "#{value}"),
            Operand::Direct(address) => write!(f, "{address}"),
            Operand::Indirect(address) => write!(f, "@{address}"),
        }
    }
}

/**
 * Converts a byte count or an instruction index into an immediate operand.
 */
pub fn imm(value: usize) -> Operand {
    Operand::Immediate(value as i32)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operands: [Option<Operand>; 3],
}

impl Instruction {
    pub fn assign(src: Operand, dst: Operand) -> Instruction {
        Instruction {
            opcode: Opcode::Assign,
            operands: [Some(src), Some(dst), None],
        }
    }
    /**
     * `ADD`, `SUB`, `MULT`, `LT` or `EQ`, storing `lhs op rhs` into `dst`.
     */
    pub fn binary(opcode: Opcode, lhs: Operand, rhs: Operand, dst: Operand) -> Instruction {
        Instruction {
            opcode,
            operands: [Some(lhs), Some(rhs), Some(dst)],
        }
    }
    pub fn jp(target: Operand) -> Instruction {
        Instruction {
            opcode: Opcode::Jp,
            operands: [Some(target), None, None],
        }
    }
    pub fn jpf(condition: Operand, target: Operand) -> Instruction {
        Instruction {
            opcode: Opcode::Jpf,
            operands: [Some(condition), Some(target), None],
        }
    }
    pub fn print(value: Operand) -> Instruction {
        Instruction {
            opcode: Opcode::Print,
            operands: [Some(value), None, None],
        }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.opcode.name())?;
        for operand in &self.operands {
            match operand {
                Some(operand) => write!(f, ", {operand}")?,
                None => write!(f, ", ")?,
            }
        }
        Ok(())
    }
}

/**
 * The append-only instruction list. Slots reserved with
 * [`reserve`](Self::reserve) stay empty until [`fill`](Self::fill)ed.
 */
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgramBlock {
    slots: Vec<Option<Instruction>>,
}

impl ProgramBlock {
    pub fn new() -> ProgramBlock {
        ProgramBlock { slots: Vec::new() }
    }
    /**
     * The index the next instruction will be placed at.
     */
    pub fn len(&self) -> usize {
        self.slots.len()
    }
    pub fn push(&mut self, instruction: Instruction) {
        self.slots.push(Some(instruction));
    }
    /**
     * Reserves an empty slot and returns its index.
     */
    pub fn reserve(&mut self) -> usize {
        self.slots.push(None);
        self.slots.len() - 1
    }
    /**
     * Fills a slot previously returned by [`reserve`](Self::reserve).
     * Returns `false` if `index` is out of range or already filled.
     */
    pub fn fill(&mut self, index: usize, instruction: Instruction) -> bool {
        match self.slots.get_mut(index) {
            Some(slot @ None) => {
                *slot = Some(instruction);
                true
            }
            _ => false,
        }
    }
    pub fn slots(&self) -> &[Option<Instruction>] {
        &self.slots
    }
    /**
     * Whether every reserved slot has been filled.
     */
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }
}

/**
 * Renders the program as one `index\t(instruction)` line per slot.
 */
impl Display for ProgramBlock {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for (index, slot) in self.slots.iter().enumerate() {
            match slot {
                Some(instruction) => writeln!(f, "{index}\t({instruction})")?,
                None => writeln!(f, "{index}\t(, , , )")?,
            }
        }
        Ok(())
    }
}
