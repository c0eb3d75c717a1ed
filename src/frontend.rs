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
 * Lexical and syntax analysis. [`analyze`] drives the [`parser`] with the
 * tokens of the [`scanner`] and recovers from errors.
 */

pub mod chars_peekable;
pub mod dfa;
pub mod grammar;
pub mod parse_tree;
pub mod parser;
pub mod scanner;
mod tests;

use std::io::{self, Write};

use indexmap::IndexSet;

use crate::log::{Logger, SyntaxError};
use grammar::Terminal;
use parse_tree::ParseTree;
use parser::{Actions, Lookahead, Parser};
use scanner::{Scanner, Token, TokenKind};

/**
 * The result of analyzing one input.
 */
pub struct Analysis {
    /**
     * Every token other than whitespace and comments, in input order.
     */
    pub tokens: Vec<Token>,
    pub lexemes: IndexSet<String>,
    pub tree: ParseTree,
    pub logger: Logger,
}

/**
 * Parses `input`, passing the actions met along the derivation to
 * `actions`.
 *
 * A missing symbol is skipped and the same token is tried again. An
 * illegal token is discarded.
 */
pub fn analyze<A: Actions>(input: &str, actions: &mut A) -> Analysis {
    let mut scanner = Scanner::new(input);
    let mut parser = Parser::new();
    let mut logger = Logger::new();
    let mut tokens = Vec::new();
    let mut current = next_token(&mut scanner, &mut tokens, &mut logger);
    while !parser.is_finished() {
        let terminal = current.0;
        let token = &current.1;
        let lookahead = Lookahead {
            terminal,
            lexeme: &token.lexeme,
            line: token.line,
        };
        match parser.advance(&lookahead, actions, &mut logger) {
            Ok(()) => {
                if terminal != Terminal::Dollar {
                    current = next_token(&mut scanner, &mut tokens, &mut logger);
                }
            }
            Err(err @ SyntaxError::Missing(_)) => logger.syntax_error(token.line, err),
            Err(err @ SyntaxError::Illegal(_)) => {
                logger.syntax_error(token.line, err);
                tracing::debug!(lexeme = %token.lexeme, line = token.line, "discarded");
                current = next_token(&mut scanner, &mut tokens, &mut logger);
            }
            Err(err @ SyntaxError::UnexpectedEof) => logger.syntax_error(token.line, err),
        }
    }
    Analysis {
        tokens,
        lexemes: scanner.into_lexemes(),
        tree: parser.into_tree(),
        logger,
    }
}

/**
 * Scans up to the next token the parser cares about, logging lexical
 * errors on the way.
 */
fn next_token(
    scanner: &mut Scanner,
    tokens: &mut Vec<Token>,
    logger: &mut Logger,
) -> (Terminal, Token) {
    loop {
        match scanner.next_token() {
            Ok(token) => {
                let Some(terminal) = Terminal::from_token(token.kind, &token.lexeme) else {
                    continue;
                };
                if token.kind != TokenKind::End {
                    tokens.push(token.clone());
                }
                return (terminal, token);
            }
            Err(err) => logger.lexical_error(scanner.line(), err),
        }
    }
}

/**
 * Lists tokens grouped by line as `N.\t(KIND, lexeme) ...`.
 */
pub fn write_tokens(tokens: &[Token], w: &mut impl Write) -> io::Result<()> {
    let mut last_line = None;
    for token in tokens {
        if last_line != Some(token.line) {
            if last_line.is_some() {
                writeln!(w)?;
            }
            write!(w, "{}.\t", token.line)?;
            last_line = Some(token.line);
        }
        write!(w, "({}, {}) ", token.kind.name(), token.lexeme)?;
    }
    if last_line.is_some() {
        writeln!(w)?;
    }
    Ok(())
}

pub fn write_lexemes(lexemes: &IndexSet<String>, w: &mut impl Write) -> io::Result<()> {
    for (index, lexeme) in lexemes.iter().enumerate() {
        writeln!(w, "{}.\t{lexeme}", index + 1)?;
    }
    Ok(())
}
