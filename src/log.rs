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
 * Diagnostics reported to the user, and the [`Logger`] collecting them.
 */

use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;

use crate::codegen::Ty;
use crate::frontend::grammar::{Symbol, Terminal};

pub fn cannot_read_input(path: &Path, err: io::Error) {
    eprintln!("ERROR: Cannot read file `{}`. {}", path.display(), err);
}

pub fn cannot_write_output(path: &Path, err: io::Error) {
    eprintln!("ERROR: Cannot write file `{}`. {}", path.display(), err);
}

pub fn aborting(err: &InternalError) {
    eprintln!("ERROR: {err}");
    eprintln!("Aborting due to an internal error.");
}

pub fn runtime_error(err: &crate::backend::RuntimeError) {
    eprintln!("ERROR: {err}");
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LexicalError {
    #[error("({0}, Invalid input)")]
    InvalidInput(String),
    /**
     * Holds the first characters of the comment followed by `...`.
     */
    #[error("({0}, Unclosed comment)")]
    UnclosedComment(String),
    #[error("({0}, Unmatched comment)")]
    UnmatchedComment(String),
    #[error("({0}, Invalid number)")]
    InvalidNumber(String),
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("Syntax error, missing {0}")]
    Missing(Symbol),
    #[error("Syntax error, illegal {0}")]
    Illegal(Terminal),
    #[error("Syntax error, Unexpected EOF")]
    UnexpectedEof,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SemanticError {
    #[error("'{0}' is not defined.")]
    NameNotDefined(String),
    #[error("Type mismatch in operands, Got {found} instead of {expected}.")]
    TypeMismatch { expected: Ty, found: Ty },
    #[error("Illegal type of void for '{0}'.")]
    IllegalVoidType(String),
    #[error("Mismatch in numbers of arguments of '{0}'.")]
    ArgumentCountMismatch(String),
    #[error(
        "Mismatch in type of argument {position} of '{function}'. Expected '{expected}' but got '{found}' instead."
    )]
    ArgumentTypeMismatch {
        position: usize,
        function: String,
        expected: Ty,
        found: Ty,
    },
    #[error("No 'for' found for 'break'.")]
    BreakOutsideLoop,
}

/**
 * A programming error in the compiler itself. Not recoverable.
 */
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InternalError {
    #[error("the semantic stack does not match `#{action}` (line {line})")]
    StackShape { action: &'static str, line: usize },
}

/**
 * Collects diagnostics of every category, each paired with the line it was
 * reported at, in the order they were reported.
 */
#[derive(Debug, Default)]
pub struct Logger {
    lexical_errors: Vec<(usize, LexicalError)>,
    syntax_errors: Vec<(usize, SyntaxError)>,
    semantic_errors: Vec<(usize, SemanticError)>,
}

impl Logger {
    pub fn new() -> Logger {
        Logger::default()
    }
    pub fn lexical_error(&mut self, line: usize, err: LexicalError) {
        tracing::debug!(line, %err, "lexical error");
        self.lexical_errors.push((line, err));
    }
    pub fn syntax_error(&mut self, line: usize, err: SyntaxError) {
        tracing::debug!(line, %err, "syntax error");
        self.syntax_errors.push((line, err));
    }
    pub fn semantic_error(&mut self, line: usize, err: SemanticError) {
        tracing::debug!(line, %err, "semantic error");
        self.semantic_errors.push((line, err));
    }
    pub fn lexical_errors(&self) -> &[(usize, LexicalError)] {
        &self.lexical_errors
    }
    pub fn syntax_errors(&self) -> &[(usize, SyntaxError)] {
        &self.syntax_errors
    }
    pub fn semantic_errors(&self) -> &[(usize, SemanticError)] {
        &self.semantic_errors
    }
    /**
     * Writes lexical errors, one line of output per source line.
     */
    pub fn write_lexical_errors(&self, w: &mut impl Write) -> io::Result<()> {
        if self.lexical_errors.is_empty() {
            return write!(w, "There is no lexical error.");
        }
        let mut last_line = None;
        for (line, err) in &self.lexical_errors {
            if last_line != Some(*line) {
                if last_line.is_some() {
                    writeln!(w)?;
                }
                write!(w, "{line}.\t")?;
                last_line = Some(*line);
            }
            write!(w, "{err} ")?;
        }
        writeln!(w)
    }
    pub fn write_syntax_errors(&self, w: &mut impl Write) -> io::Result<()> {
        if self.syntax_errors.is_empty() {
            return write!(w, "There is no syntax error.");
        }
        for (line, err) in &self.syntax_errors {
            writeln!(w, "#{line} : {err}")?;
        }
        Ok(())
    }
    pub fn write_semantic_errors(&self, w: &mut impl Write) -> io::Result<()> {
        if self.semantic_errors.is_empty() {
            return write!(w, "The input program is semantically correct.");
        }
        for (line, err) in &self.semantic_errors {
            writeln!(w, "#{line} : Semantic Error! {err}")?;
        }
        Ok(())
    }
}
