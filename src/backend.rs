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
 * Executes a [`ProgramBlock`] on the stack machine.
 */

mod tests;

use std::collections::HashMap;

use thiserror::Error;

use crate::ir::{Instruction, Opcode, Operand, ProgramBlock};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("reached the unfilled slot {pc}")]
    Placeholder { pc: usize },
    #[error("invalid address {address} at {pc}")]
    InvalidAddress { pc: usize, address: i32 },
    #[error("jump from {pc} to {target} leaves the program")]
    InvalidJump { pc: usize, target: i32 },
    #[error("cannot write to an immediate operand at {pc}")]
    ImmediateDestination { pc: usize },
    #[error("`{opcode}` at {pc} lacks an operand")]
    MissingOperand { pc: usize, opcode: &'static str },
    #[error("gave up after {0} steps")]
    StepLimit(usize),
}

/**
 * Runs `program` from its first instruction until control reaches its end,
 * and returns the values printed on the way.
 */
pub fn run(program: &ProgramBlock, max_steps: usize) -> Result<Vec<i32>, RuntimeError> {
    let mut machine = Machine {
        memory: HashMap::new(),
        pc: 0,
        len: program.len(),
    };
    let mut output = Vec::new();
    let mut steps = 0;
    while let Some(&slot) = program.slots().get(machine.pc) {
        if steps == max_steps {
            return Err(RuntimeError::StepLimit(max_steps));
        }
        steps += 1;
        let Some(instruction) = slot else {
            return Err(RuntimeError::Placeholder { pc: machine.pc });
        };
        machine.execute(instruction, &mut output)?;
    }
    tracing::debug!(steps, "halted");
    Ok(output)
}

struct Machine {
    /**
     * Cells never written read as 0.
     */
    memory: HashMap<u32, i32>,
    pc: usize,
    len: usize,
}

impl Machine {
    fn load(&self, address: u32) -> i32 {
        self.memory.get(&address).copied().unwrap_or(0)
    }
    /**
     * The address stored in the cell `address`.
     */
    fn pointee(&self, address: u32) -> Result<u32, RuntimeError> {
        let value = self.load(address);
        u32::try_from(value).map_err(|_| RuntimeError::InvalidAddress {
            pc: self.pc,
            address: value,
        })
    }
    fn read(&self, operand: Operand) -> Result<i32, RuntimeError> {
        match operand {
            Operand::Immediate(value) => Ok(value),
            Operand::Direct(address) => Ok(self.load(address)),
            Operand::Indirect(address) => Ok(self.load(self.pointee(address)?)),
        }
    }
    fn write(&mut self, operand: Operand, value: i32) -> Result<(), RuntimeError> {
        let address = match operand {
            Operand::Immediate(_) => {
                return Err(RuntimeError::ImmediateDestination { pc: self.pc });
            }
            Operand::Direct(address) => address,
            Operand::Indirect(address) => self.pointee(address)?,
        };
        self.memory.insert(address, value);
        Ok(())
    }
    fn jump_target(&self, operand: Operand) -> Result<usize, RuntimeError> {
        let target = match operand {
            Operand::Direct(index) => i32::try_from(index).unwrap_or(i32::MAX),
            Operand::Indirect(address) => self.load(address),
            Operand::Immediate(value) => value,
        };
        match usize::try_from(target) {
            Ok(index) if index <= self.len => Ok(index),
            _ => Err(RuntimeError::InvalidJump {
                pc: self.pc,
                target,
            }),
        }
    }
    fn execute(
        &mut self,
        instruction: Instruction,
        output: &mut Vec<i32>,
    ) -> Result<(), RuntimeError> {
        let pc = self.pc;
        tracing::trace!(pc, %instruction, "execute");
        let operand = |index: usize| {
            instruction.operands[index].ok_or(RuntimeError::MissingOperand {
                pc,
                opcode: instruction.opcode.name(),
            })
        };
        let mut next = pc + 1;
        match instruction.opcode {
            Opcode::Assign => {
                let value = self.read(operand(0)?)?;
                self.write(operand(1)?, value)?;
            }
            Opcode::Jp => next = self.jump_target(operand(0)?)?,
            Opcode::Jpf => {
                if self.read(operand(0)?)? == 0 {
                    next = self.jump_target(operand(1)?)?;
                }
            }
            Opcode::Print => output.push(self.read(operand(0)?)?),
            opcode @ (Opcode::Add | Opcode::Sub | Opcode::Mult | Opcode::Lt | Opcode::Eq) => {
                let lhs = self.read(operand(0)?)?;
                let rhs = self.read(operand(1)?)?;
                let value = match opcode {
                    Opcode::Add => lhs.wrapping_add(rhs),
                    Opcode::Sub => lhs.wrapping_sub(rhs),
                    Opcode::Mult => lhs.wrapping_mul(rhs),
                    Opcode::Lt => i32::from(lhs < rhs),
                    _ => i32::from(lhs == rhs),
                };
                self.write(operand(2)?, value)?;
            }
        }
        self.pc = next;
        Ok(())
    }
}
