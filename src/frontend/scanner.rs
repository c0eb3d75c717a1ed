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
 * Splits the input into tokens by running the automaton in [`dfa`]
 * repeatedly.
 *
 * [`dfa`]: super::dfa
 */


use enum_iterator::{Sequence, all};
use indexmap::IndexSet;

use super::chars_peekable::CharsPeekable;
use super::dfa::{Dfa, Recognized, State};
use crate::log::LexicalError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Sequence)]
pub enum Keyword {
    If,
    Else,
    Void,
    Int,
    For,
    Break,
    Return,
    Endif,
}

impl Keyword {
    pub fn text(self) -> &'static str {
        match self {
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::Void => "void",
            Keyword::Int => "int",
            Keyword::For => "for",
            Keyword::Break => "break",
            Keyword::Return => "return",
            Keyword::Endif => "endif",
        }
    }
    pub fn from_text(text: &str) -> Option<Keyword> {
        all::<Keyword>().find(|keyword| keyword.text() == text)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    Identifier,
    Keyword,
    Symbol,
    Comment,
    Whitespace,
    End,
}

impl TokenKind {
    /**
     * The name used in listings and parse-tree labels.
     */
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Number => "NUM",
            TokenKind::Identifier => "ID",
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Symbol => "SYMBOL",
            TokenKind::Comment => "COMMENT",
            TokenKind::Whitespace => "WHITESPACE",
            TokenKind::End => "$",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    /**
     * The line of the last character of the token.
     */
    pub line: usize,
}

pub struct Scanner<'input> {
    chars: CharsPeekable<'input>,
    dfa: Dfa,
    /**
     * Distinct keyword and identifier lexemes in order of first
     * appearance, starting with every keyword.
     */
    lexemes: IndexSet<String>,
}

impl<'input> Scanner<'input> {
    pub fn new(input: &'input str) -> Self {
        Self {
            chars: CharsPeekable::new(input),
            dfa: Dfa::new(),
            lexemes: all::<Keyword>()
                .map(|keyword| keyword.text().to_owned())
                .collect(),
        }
    }
    /**
     * The line the scanner has reached.
     */
    pub fn line(&self) -> usize {
        self.chars.line()
    }
    pub fn into_lexemes(self) -> IndexSet<String> {
        self.lexemes
    }
    /**
     * Scans one token. Once the input is exhausted, every call returns a
     * token of kind [`TokenKind::End`].
     *
     * After an error, the next call starts a fresh scan right after the
     * offending text.
     */
    pub fn next_token(&mut self) -> Result<Token, LexicalError> {
        self.dfa.reset();
        let mut buffer = String::new();
        loop {
            let ch = self.chars.peek_char();
            if ch.is_none() {
                let state = self.dfa.state();
                if state == State::Initial {
                    return Ok(Token {
                        kind: TokenKind::End,
                        lexeme: String::new(),
                        line: self.line(),
                    });
                }
                if state.is_in_comment() {
                    let prefix: String = buffer.chars().take(7).collect();
                    return Err(LexicalError::UnclosedComment(format!("{prefix}...")));
                }
            }
            let state = self.dfa.step(ch);
            if let (false, Some(ch)) = (state.is_lookahead(), ch) {
                self.chars.consume();
                buffer.push(ch);
            }
            if state.is_final() {
                break;
            }
        }
        let state = self.dfa.state();
        if state.is_error() {
            return Err(match state {
                State::InvalidNumber => LexicalError::InvalidNumber(buffer),
                State::UnmatchedComment => LexicalError::UnmatchedComment(buffer),
                _ => LexicalError::InvalidInput(buffer),
            });
        }
        let Some(recognized) = state.recognized() else {
            return Err(LexicalError::InvalidInput(buffer));
        };
        let kind = match recognized {
            Recognized::Number => TokenKind::Number,
            Recognized::Word => {
                self.lexemes.insert(buffer.clone());
                if Keyword::from_text(&buffer).is_some() {
                    TokenKind::Keyword
                } else {
                    TokenKind::Identifier
                }
            }
            Recognized::Symbol => TokenKind::Symbol,
            Recognized::Comment => TokenKind::Comment,
            Recognized::Whitespace => TokenKind::Whitespace,
        };
        tracing::trace!(kind = kind.name(), lexeme = %buffer, line = self.line(), "token");
        Ok(Token {
            kind,
            lexeme: buffer,
            line: self.line(),
        })
    }
}
