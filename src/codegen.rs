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
 * Syntax-directed generation of three-address code.
 *
 * The [`CodeGenerator`] receives the actions met by the parser and keeps a
 * semantic stack whose shape mirrors the constructs currently open in the
 * derivation. Jumps whose targets are not known yet are emitted into
 * reserved slots of the program block and filled in later.
 *
 * A function's frame looks like this, relative to `FP`:
 *
 * | offset     | content                        |
 * |------------|--------------------------------|
 * | -12        | return value                   |
 * | -8         | caller's `FP`                  |
 * | -4         | return address                 |
 * | 0 ..       | parameters, then block locals  |
 */

mod symbol_table;
mod tests;

use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

use crate::frontend::grammar::{Action, Terminal};
use crate::frontend::{self, Analysis};
use crate::frontend::parser::{Actions, Lookahead};
use crate::ir::{FP, Instruction, Opcode, Operand, ProgramBlock, SP, STACK, TEMP, WORD, imm};
use crate::log::{InternalError, Logger, SemanticError};
use symbol_table::{Symbol, SymbolTable};

const SP_CELL: Operand = Operand::Direct(SP);
const FP_CELL: Operand = Operand::Direct(FP);
const TEMP_CELL: Operand = Operand::Direct(TEMP);
/** The cell `SP` points to. */
const TOP: Operand = Operand::Indirect(SP);
const AT_TEMP: Operand = Operand::Indirect(TEMP);

/**
 * The size of the saved return value, `FP` and return address below a
 * frame.
 */
const FRAME_HEADER: u32 = 3 * WORD;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ty {
    Int,
    Array,
    Void,
}

impl Display for Ty {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Ty::Int => write!(f, "int"),
            Ty::Array => write!(f, "array"),
            Ty::Void => write!(f, "void"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Semantic {
    Lexeme(String),
    /**
     * The type of the value on top of the run-time stack. `Void` has no
     * slot there.
     */
    Type(Ty),
    /**
     * The index of an instruction.
     */
    Address(usize),
    Operator(Opcode),
    /**
     * Marks where the arguments of a call begin. `frame` tells whether a
     * frame header was reserved for the call.
     */
    ArgsStart {
        frame: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Entry {
    /**
     * The built-in `output`, compiled to `PRINT`.
     */
    Output,
    /**
     * Registered but its body has not started yet.
     */
    Pending,
    At(usize),
}

#[derive(Clone, Debug)]
struct Function {
    return_ty: Ty,
    params: Vec<(String, Ty)>,
    entry: Entry,
}

/**
 * The semantic stack did not have the shape an action expects.
 */
#[derive(Debug)]
struct Fault;

pub struct CodeGenerator {
    semantic_stack: Vec<Semantic>,
    program: ProgramBlock,
    globals: SymbolTable,
    locals: SymbolTable,
    functions: HashMap<String, Function>,
    current_function: Option<String>,
    /**
     * The index of the shared return sequence of the current function.
     */
    return_block: usize,
    /**
     * For each open loop, the slots reserved by its `break` statements.
     */
    loops: Vec<Vec<usize>>,
    fault: Option<InternalError>,
}

impl CodeGenerator {
    pub fn new() -> CodeGenerator {
        let mut program = ProgramBlock::new();
        program.push(Instruction::assign(imm(STACK as usize), SP_CELL));
        CodeGenerator {
            semantic_stack: Vec::new(),
            program,
            globals: SymbolTable::new(STACK),
            locals: SymbolTable::new(0),
            functions: HashMap::from([(
                "output".to_owned(),
                Function {
                    return_ty: Ty::Void,
                    params: vec![("value".to_owned(), Ty::Int)],
                    entry: Entry::Output,
                },
            )]),
            current_function: None,
            return_block: 0,
            loops: Vec::new(),
            fault: None,
        }
    }
    /**
     * The error that stopped code generation, if any.
     */
    pub fn fault(&self) -> Option<&InternalError> {
        self.fault.as_ref()
    }
    pub fn into_program(self) -> ProgramBlock {
        self.program
    }

    fn emit(&mut self, instruction: Instruction) {
        self.program.push(instruction);
    }
    fn add_sp(&mut self, bytes: u32) {
        self.emit(Instruction::binary(
            Opcode::Add,
            SP_CELL,
            imm(bytes as usize),
            SP_CELL,
        ));
    }
    fn sub_sp(&mut self, bytes: u32) {
        self.emit(Instruction::binary(
            Opcode::Sub,
            SP_CELL,
            imm(bytes as usize),
            SP_CELL,
        ));
    }
    /**
     * Stores `value` on top of the run-time stack.
     */
    fn push_value(&mut self, value: Operand) {
        self.emit(Instruction::assign(value, TOP));
        self.add_sp(WORD);
    }
    fn fill(&mut self, index: usize, instruction: Instruction) -> Result<(), Fault> {
        if self.program.fill(index, instruction) {
            Ok(())
        } else {
            Err(Fault)
        }
    }

    fn pop(&mut self) -> Result<Semantic, Fault> {
        self.semantic_stack.pop().ok_or(Fault)
    }
    fn pop_lexeme(&mut self) -> Result<String, Fault> {
        match self.pop()? {
            Semantic::Lexeme(lexeme) => Ok(lexeme),
            _ => Err(Fault),
        }
    }
    fn pop_type(&mut self) -> Result<Ty, Fault> {
        match self.pop()? {
            Semantic::Type(ty) => Ok(ty),
            _ => Err(Fault),
        }
    }
    fn pop_address(&mut self) -> Result<usize, Fault> {
        match self.pop()? {
            Semantic::Address(index) => Ok(index),
            _ => Err(Fault),
        }
    }
    fn pop_operator(&mut self) -> Result<Opcode, Fault> {
        match self.pop()? {
            Semantic::Operator(opcode) => Ok(opcode),
            _ => Err(Fault),
        }
    }

    /**
     * Finds a variable, in the current function first. The flag is `true`
     * for globals.
     */
    fn lookup(&self, name: &str) -> Option<(Symbol, bool)> {
        self.locals
            .get_symbol(name)
            .map(|symbol| (symbol, false))
            .or_else(|| self.globals.get_symbol(name).map(|symbol| (symbol, true)))
    }
    /**
     * The operand designating a scalar variable or an array parameter.
     * Locals need `TEMP` to hold their address.
     */
    fn variable_operand(&mut self, symbol: Symbol, global: bool) -> Operand {
        if global {
            Operand::Direct(symbol.offset)
        } else {
            self.emit(Instruction::binary(
                Opcode::Add,
                FP_CELL,
                imm(symbol.offset as usize),
                TEMP_CELL,
            ));
            AT_TEMP
        }
    }
    fn check_type(&self, expected: Ty, found: Ty, line: usize, logger: &mut Logger) -> bool {
        if expected == found {
            return true;
        }
        logger.semantic_error(line, SemanticError::TypeMismatch { expected, found });
        false
    }
    fn active_table(&mut self) -> &mut SymbolTable {
        if self.current_function.is_some() {
            &mut self.locals
        } else {
            &mut self.globals
        }
    }
    fn current_function(&mut self) -> Result<&mut Function, Fault> {
        let name = self.current_function.as_ref().ok_or(Fault)?;
        self.functions.get_mut(name).ok_or(Fault)
    }

    fn dispatch(
        &mut self,
        action: Action,
        lookahead: &Lookahead,
        logger: &mut Logger,
    ) -> Result<(), Fault> {
        let line = lookahead.line;
        match action {
            Action::PushId => {
                self.semantic_stack
                    .push(Semantic::Lexeme(lookahead.lexeme.to_owned()));
            }
            Action::PushOperator => {
                let opcode = match lookahead.terminal {
                    Terminal::Plus => Opcode::Add,
                    Terminal::Hyphen => Opcode::Sub,
                    Terminal::Asterisk => Opcode::Mult,
                    Terminal::Less => Opcode::Lt,
                    Terminal::DoubleEqual => Opcode::Eq,
                    _ => return Err(Fault),
                };
                self.semantic_stack.push(Semantic::Operator(opcode));
            }
            Action::PushStack => self.push_stack(line, logger)?,
            Action::Pop => {
                if self.pop_type()? != Ty::Void {
                    self.sub_sp(WORD);
                }
            }
            Action::Assign => self.assign(line, logger)?,
            Action::Operation => {
                let rhs = self.pop_type()?;
                let opcode = self.pop_operator()?;
                let lhs = self.pop_type()?;
                let _ = self.check_type(Ty::Int, lhs, line, logger)
                    && self.check_type(Ty::Int, rhs, line, logger);
                self.sub_sp(WORD);
                self.emit(Instruction::binary(
                    Opcode::Sub,
                    SP_CELL,
                    imm(WORD as usize),
                    TEMP_CELL,
                ));
                self.emit(Instruction::binary(opcode, AT_TEMP, TOP, AT_TEMP));
                self.semantic_stack.push(Semantic::Type(Ty::Int));
            }
            Action::Negate => {
                let ty = self.pop_type()?;
                self.check_type(Ty::Int, ty, line, logger);
                self.emit(Instruction::binary(
                    Opcode::Sub,
                    SP_CELL,
                    imm(WORD as usize),
                    TEMP_CELL,
                ));
                self.emit(Instruction::binary(
                    Opcode::Sub,
                    Operand::Immediate(0),
                    AT_TEMP,
                    AT_TEMP,
                ));
                self.semantic_stack.push(Semantic::Type(Ty::Int));
            }
            Action::DefineInt => {
                let name = self.pop_lexeme()?;
                let ty = self.pop_lexeme()?;
                self.define(name, &ty, None, line, logger);
            }
            Action::DefineArr => {
                let size = parse_number(&self.pop_lexeme()?).max(0) as u32;
                let name = self.pop_lexeme()?;
                let ty = self.pop_lexeme()?;
                self.define(name, &ty, Some(size), line, logger);
            }
            Action::RegisterFunc => {
                let name = self.pop_lexeme()?;
                let return_ty = if self.pop_lexeme()? == "void" {
                    Ty::Void
                } else {
                    Ty::Int
                };
                tracing::debug!(%name, %return_ty, "function");
                self.functions.insert(
                    name.clone(),
                    Function {
                        return_ty,
                        params: Vec::new(),
                        entry: Entry::Pending,
                    },
                );
                self.current_function = Some(name);
                self.locals = SymbolTable::new(0);
                self.loops.clear();
                let skip = self.program.reserve();
                self.semantic_stack.push(Semantic::Address(skip));
            }
            Action::AddFuncParam => self.add_param(None, line, logger)?,
            Action::AddFuncArrayParam => self.add_param(Some(0), line, logger)?,
            Action::BeginFunc => {
                let entry = self.program.len();
                self.current_function()?.entry = Entry::At(entry);
            }
            Action::ReturnCodeBlock => {
                self.return_block = self.program.len();
                self.emit(Instruction::binary(
                    Opcode::Sub,
                    FP_CELL,
                    imm(2 * WORD as usize),
                    SP_CELL,
                ));
                self.emit(Instruction::binary(
                    Opcode::Sub,
                    FP_CELL,
                    imm(WORD as usize),
                    TEMP_CELL,
                ));
                self.emit(Instruction::assign(AT_TEMP, TEMP_CELL));
                self.emit(Instruction::assign(TOP, FP_CELL));
                self.emit(Instruction::jp(AT_TEMP));
            }
            Action::EndFunc => {
                if self.locals.depth() != 1 {
                    return Err(Fault);
                }
                self.emit(Instruction::jp(Operand::Direct(self.return_block as u32)));
                let skip = self.pop_address()?;
                let after = self.program.len();
                self.fill(skip, Instruction::jp(imm_target(after)))?;
                self.current_function = None;
                self.locals = SymbolTable::new(0);
            }
            Action::CallMain => match self.functions.get("main") {
                Some(Function {
                    entry: Entry::At(entry),
                    ..
                }) => {
                    let entry = *entry;
                    self.add_sp(FRAME_HEADER);
                    self.emit(Instruction::assign(SP_CELL, FP_CELL));
                    self.emit(Instruction::binary(
                        Opcode::Sub,
                        FP_CELL,
                        imm(WORD as usize),
                        TEMP_CELL,
                    ));
                    let return_address = self.program.len() + 2;
                    self.emit(Instruction::assign(imm(return_address), AT_TEMP));
                    self.emit(Instruction::jp(imm_target(entry)));
                }
                _ => logger.semantic_error(line, SemanticError::NameNotDefined("main".to_owned())),
            },
            Action::BeginArgs => {
                let Some(Semantic::Lexeme(name)) = self.semantic_stack.last() else {
                    return Err(Fault);
                };
                let frame = !matches!(
                    self.functions.get(name),
                    Some(Function {
                        entry: Entry::Output,
                        ..
                    })
                );
                if frame {
                    self.add_sp(FRAME_HEADER);
                }
                self.semantic_stack.push(Semantic::ArgsStart { frame });
            }
            Action::CallFunc => self.call_func(line, logger)?,
            Action::SkipPb => {
                let index = self.program.reserve();
                self.semantic_stack.push(Semantic::Address(index));
            }
            Action::JpfFromSkipped => {
                let skipped = self.pop_address()?;
                let target = self.program.len();
                self.fill(skipped, Instruction::jpf(TOP, imm_target(target)))?;
            }
            Action::JpfFromSkippedSave => {
                let skipped = self.pop_address()?;
                let saved = self.program.reserve();
                self.fill(skipped, Instruction::jpf(TOP, imm_target(saved + 1)))?;
                self.semantic_stack.push(Semantic::Address(saved));
            }
            Action::JpFromSkipped => {
                let skipped = self.pop_address()?;
                let target = self.program.len();
                self.fill(skipped, Instruction::jp(imm_target(target)))?;
            }
            Action::Label => {
                self.semantic_stack
                    .push(Semantic::Address(self.program.len()));
            }
            Action::BeginLoop => self.loops.push(Vec::new()),
            Action::ForCondition => {
                let exit = self.program.reserve();
                let to_body = self.program.reserve();
                self.semantic_stack.extend([
                    Semantic::Address(exit),
                    Semantic::Address(to_body),
                    Semantic::Address(self.program.len()),
                ]);
            }
            Action::ForStep => {
                let step = self.pop_address()?;
                let to_body = self.pop_address()?;
                let exit = self.pop_address()?;
                let condition = self.pop_address()?;
                self.emit(Instruction::jp(imm_target(condition)));
                let body = self.program.len();
                self.fill(to_body, Instruction::jp(imm_target(body)))?;
                self.semantic_stack
                    .extend([Semantic::Address(exit), Semantic::Address(step)]);
            }
            Action::EndLoop => {
                let step = self.pop_address()?;
                let exit = self.pop_address()?;
                self.emit(Instruction::jp(imm_target(step)));
                let after = self.program.len();
                self.fill(exit, Instruction::jpf(TOP, imm_target(after)))?;
                for slot in self.loops.pop().ok_or(Fault)? {
                    self.fill(slot, Instruction::jp(imm_target(after)))?;
                }
            }
            Action::BreakStatement => {
                if self.loops.is_empty() {
                    logger.semantic_error(line, SemanticError::BreakOutsideLoop);
                } else {
                    let slot = self.program.reserve();
                    if let Some(breaks) = self.loops.last_mut() {
                        breaks.push(slot);
                    }
                }
            }
            Action::FuncReturn => {
                self.emit(Instruction::jp(Operand::Direct(self.return_block as u32)));
            }
            Action::SetFuncReturnValue => {
                let found = self.pop_type()?;
                let expected = self.current_function()?.return_ty;
                self.check_type(expected, found, line, logger);
                self.sub_sp(WORD);
                self.emit(Instruction::binary(
                    Opcode::Sub,
                    FP_CELL,
                    imm(FRAME_HEADER as usize),
                    TEMP_CELL,
                ));
                self.emit(Instruction::assign(TOP, AT_TEMP));
            }
            Action::PushArrIndexAddr => {
                let index = self.pop_type()?;
                let base = self.pop_type()?;
                let _ = self.check_type(Ty::Array, base, line, logger)
                    && self.check_type(Ty::Int, index, line, logger);
                self.sub_sp(WORD);
                self.emit(Instruction::binary(
                    Opcode::Sub,
                    SP_CELL,
                    imm(WORD as usize),
                    TEMP_CELL,
                ));
                self.emit(Instruction::binary(
                    Opcode::Mult,
                    TOP,
                    imm(WORD as usize),
                    TOP,
                ));
                self.emit(Instruction::binary(Opcode::Add, AT_TEMP, TOP, AT_TEMP));
                self.semantic_stack.push(Semantic::Type(Ty::Int));
            }
            Action::PushAddrValue => {
                if !matches!(self.semantic_stack.last(), Some(Semantic::Type(_))) {
                    return Err(Fault);
                }
                self.sub_sp(WORD);
                self.emit(Instruction::assign(TOP, TEMP_CELL));
                self.emit(Instruction::assign(AT_TEMP, TOP));
                self.add_sp(WORD);
            }
            Action::ArrAssign => {
                let rhs = self.pop_type()?;
                self.pop_type()?;
                self.check_type(Ty::Int, rhs, line, logger);
                self.sub_sp(WORD);
                self.emit(Instruction::binary(
                    Opcode::Sub,
                    SP_CELL,
                    imm(WORD as usize),
                    TEMP_CELL,
                ));
                self.emit(Instruction::assign(AT_TEMP, TEMP_CELL));
                self.emit(Instruction::assign(TOP, AT_TEMP));
                self.emit(Instruction::binary(
                    Opcode::Sub,
                    SP_CELL,
                    imm(WORD as usize),
                    TEMP_CELL,
                ));
                self.emit(Instruction::assign(TOP, AT_TEMP));
                self.semantic_stack.push(Semantic::Type(Ty::Int));
            }
            Action::PushScope => self.locals.push_empty_stack(),
            Action::PopScope => {
                let freed = self.locals.pop_stack();
                if freed > 0 {
                    self.sub_sp(freed);
                }
            }
        }
        Ok(())
    }

    /**
     * Replaces the name or number on top of the semantic stack with the
     * type of its value, and pushes the value on the run-time stack. An
     * array is pushed as its base address.
     */
    fn push_stack(&mut self, line: usize, logger: &mut Logger) -> Result<(), Fault> {
        let lexeme = self.pop_lexeme()?;
        if lexeme.starts_with(|ch: char| ch.is_ascii_digit()) {
            self.push_value(Operand::Immediate(parse_number(&lexeme)));
            self.semantic_stack.push(Semantic::Type(Ty::Int));
            return Ok(());
        }
        let Some((symbol, global)) = self.lookup(&lexeme) else {
            logger.semantic_error(line, SemanticError::NameNotDefined(lexeme));
            self.push_value(Operand::Immediate(0));
            self.semantic_stack.push(Semantic::Type(Ty::Int));
            return Ok(());
        };
        if symbol.is_array() && !symbol.is_parameter {
            if global {
                self.push_value(imm(symbol.offset as usize));
            } else {
                self.emit(Instruction::binary(
                    Opcode::Add,
                    FP_CELL,
                    imm(symbol.offset as usize),
                    TOP,
                ));
                self.add_sp(WORD);
            }
        } else {
            let operand = self.variable_operand(symbol, global);
            self.push_value(operand);
        }
        self.semantic_stack.push(Semantic::Type(symbol_type(&symbol)));
        Ok(())
    }

    fn assign(&mut self, line: usize, logger: &mut Logger) -> Result<(), Fault> {
        let rhs = self.pop_type()?;
        let name = self.pop_lexeme()?;
        let Some((symbol, global)) = self.lookup(&name) else {
            logger.semantic_error(line, SemanticError::NameNotDefined(name));
            self.semantic_stack.push(Semantic::Type(rhs));
            return Ok(());
        };
        let target = symbol_type(&symbol);
        // Only an int can be stored.
        let expected = if rhs == Ty::Array { Ty::Int } else { target };
        if self.check_type(expected, rhs, line, logger) && target == Ty::Int {
            self.sub_sp(WORD);
            let operand = self.variable_operand(symbol, global);
            self.emit(Instruction::assign(TOP, operand));
            self.add_sp(WORD);
        }
        self.semantic_stack.push(Semantic::Type(rhs));
        Ok(())
    }

    fn define(
        &mut self,
        name: String,
        ty: &str,
        array_size: Option<u32>,
        line: usize,
        logger: &mut Logger,
    ) {
        if ty == "void" {
            logger.semantic_error(line, SemanticError::IllegalVoidType(name));
            return;
        }
        let symbol = self.active_table().add_symbol(name, array_size, false);
        self.add_sp(symbol.size());
    }

    fn add_param(
        &mut self,
        array_size: Option<u32>,
        line: usize,
        logger: &mut Logger,
    ) -> Result<(), Fault> {
        let name = self.pop_lexeme()?;
        if self.pop_lexeme()? == "void" {
            logger.semantic_error(line, SemanticError::IllegalVoidType(name.clone()));
        }
        let symbol = self.locals.add_symbol(name.clone(), array_size, true);
        self.current_function()?
            .params
            .push((name, symbol_type(&symbol)));
        Ok(())
    }

    fn call_func(&mut self, line: usize, logger: &mut Logger) -> Result<(), Fault> {
        let mut args = Vec::new();
        let frame = loop {
            match self.pop()? {
                Semantic::Type(ty) => args.push(ty),
                Semantic::ArgsStart { frame } => break frame,
                _ => return Err(Fault),
            }
        };
        args.reverse();
        let name = self.pop_lexeme()?;
        let args_size = WORD * args.len() as u32;
        let Some(function) = self.functions.get(&name).cloned() else {
            logger.semantic_error(line, SemanticError::NameNotDefined(name));
            // Leaves one cell as the result.
            self.sub_sp(args_size + FRAME_HEADER - WORD);
            self.semantic_stack.push(Semantic::Type(Ty::Int));
            return Ok(());
        };
        if function.params.len() != args.len() {
            logger.semantic_error(line, SemanticError::ArgumentCountMismatch(name.clone()));
        } else {
            for (position, (&(_, expected), &found)) in
                function.params.iter().zip(&args).enumerate()
            {
                if expected != found {
                    logger.semantic_error(
                        line,
                        SemanticError::ArgumentTypeMismatch {
                            position: position + 1,
                            function: name.clone(),
                            expected,
                            found,
                        },
                    );
                }
            }
        }
        match (function.entry, frame) {
            (Entry::Output, false) => {
                if args.len() == 1 {
                    self.sub_sp(WORD);
                    self.emit(Instruction::print(TOP));
                } else if !args.is_empty() {
                    self.sub_sp(args_size);
                }
            }
            (Entry::At(entry), true) => {
                self.emit(Instruction::binary(
                    Opcode::Sub,
                    SP_CELL,
                    imm((args_size + 2 * WORD) as usize),
                    TEMP_CELL,
                ));
                self.emit(Instruction::assign(FP_CELL, AT_TEMP));
                self.emit(Instruction::binary(
                    Opcode::Add,
                    TEMP_CELL,
                    imm(2 * WORD as usize),
                    FP_CELL,
                ));
                self.emit(Instruction::binary(
                    Opcode::Sub,
                    FP_CELL,
                    imm(WORD as usize),
                    TEMP_CELL,
                ));
                let return_address = self.program.len() + 2;
                self.emit(Instruction::assign(imm(return_address), AT_TEMP));
                self.emit(Instruction::jp(imm_target(entry)));
                if function.return_ty == Ty::Void {
                    self.sub_sp(WORD);
                }
            }
            _ => return Err(Fault),
        }
        self.semantic_stack.push(Semantic::Type(function.return_ty));
        Ok(())
    }
}

impl Actions for CodeGenerator {
    fn perform(&mut self, action: Action, lookahead: &Lookahead, logger: &mut Logger) {
        if self.fault.is_some() {
            return;
        }
        if self.dispatch(action, lookahead, logger).is_err() {
            tracing::warn!(
                action = action.name(),
                line = lookahead.line,
                "semantic stack does not match the action, code generation stopped"
            );
            self.fault = Some(InternalError::StackShape {
                action: action.name(),
                line: lookahead.line,
            });
        }
    }
}

pub struct Compilation {
    pub analysis: Analysis,
    pub program: ProgramBlock,
}

/**
 * Analyzes `input` and generates code for it.
 *
 * Fails only if the semantic stack broke on an input without syntax
 * errors. After a syntax error, code generation just stops at the first
 * broken action.
 */
pub fn compile(input: &str) -> Result<Compilation, InternalError> {
    let mut generator = CodeGenerator::new();
    let analysis = frontend::analyze(input, &mut generator);
    match generator.fault.take() {
        Some(err) if analysis.logger.syntax_errors().is_empty() => Err(err),
        _ => Ok(Compilation {
            analysis,
            program: generator.into_program(),
        }),
    }
}

fn symbol_type(symbol: &Symbol) -> Ty {
    if symbol.is_array() { Ty::Array } else { Ty::Int }
}

/**
 * The jump target designating instruction `index`.
 */
fn imm_target(index: usize) -> Operand {
    Operand::Direct(index as u32)
}

/**
 * Parses a decimal literal, wrapping around on overflow.
 */
fn parse_number(lexeme: &str) -> i32 {
    lexeme.bytes().fold(0i32, |value, digit| {
        value
            .wrapping_mul(10)
            .wrapping_add(i32::from(digit.wrapping_sub(b'0')))
    })
}
