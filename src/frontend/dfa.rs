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
 * The lexical automaton.
 *
 * Transitions are listed in [`TRANSITIONS`] and the first rule matching the
 * current state and the next character wins. A character that matches no
 * rule leads to [`State::Trash`].
 */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Initial,
    Number,
    NumberEnd,
    /**
     * Digits followed by a letter. Consumes the rest of the word.
     */
    NumberTail,
    InvalidNumber,
    Word,
    WordEnd,
    Whitespace,
    WhitespaceEnd,
    Symbol,
    Assign,
    DoubleEqual,
    SymbolEnd,
    Slash,
    SlashError,
    CommentBody,
    CommentStar,
    Comment,
    Star,
    UnmatchedComment,
    Trash,
}

/**
 * The kind of token recognized by a final, non-error state.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recognized {
    Number,
    Word,
    Symbol,
    Comment,
    Whitespace,
}

impl State {
    pub fn is_final(self) -> bool {
        matches!(
            self,
            State::NumberEnd
                | State::InvalidNumber
                | State::WordEnd
                | State::WhitespaceEnd
                | State::Symbol
                | State::DoubleEqual
                | State::SymbolEnd
                | State::SlashError
                | State::Comment
                | State::UnmatchedComment
                | State::Trash
        )
    }
    /**
     * Whether the character leading to this state belongs to the next token
     * instead of the current one.
     */
    pub fn is_lookahead(self) -> bool {
        matches!(
            self,
            State::NumberEnd
                | State::InvalidNumber
                | State::WordEnd
                | State::WhitespaceEnd
                | State::SymbolEnd
                | State::SlashError
        )
    }
    /**
     * Whether the scanned text is a lexical error.
     */
    pub fn is_error(self) -> bool {
        matches!(
            self,
            State::InvalidNumber | State::SlashError | State::UnmatchedComment | State::Trash
        )
    }
    /**
     * Whether running out of input in this state leaves a comment open.
     */
    pub fn is_in_comment(self) -> bool {
        matches!(self, State::CommentBody | State::CommentStar)
    }
    pub fn recognized(self) -> Option<Recognized> {
        match self {
            State::NumberEnd => Some(Recognized::Number),
            State::WordEnd => Some(Recognized::Word),
            State::WhitespaceEnd => Some(Recognized::Whitespace),
            State::Symbol | State::DoubleEqual | State::SymbolEnd => Some(Recognized::Symbol),
            State::Comment => Some(Recognized::Comment),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum CharClass {
    Char(char),
    Digits,
    Letters,
    Alphanumeric,
    Whitespace,
    Symbols,
    /**
     * Whitespace or symbols, i.e. a character that can end a word.
     */
    Delimiters,
    /**
     * Any character recognized by the language.
     */
    Legal,
    /**
     * Any character at all.
     */
    Any,
    /**
     * The end of input.
     */
    End,
}

pub const SYMBOLS: &str = ";:,[](){}+-*<=/";

pub fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
}

pub fn is_symbol(ch: char) -> bool {
    SYMBOLS.contains(ch)
}

impl CharClass {
    pub fn contains(self, ch: Option<char>) -> bool {
        let Some(ch) = ch else {
            return matches!(self, CharClass::End);
        };
        match self {
            CharClass::Char(expected) => ch == expected,
            CharClass::Digits => ch.is_ascii_digit(),
            CharClass::Letters => ch.is_ascii_alphabetic(),
            CharClass::Alphanumeric => ch.is_ascii_alphanumeric(),
            CharClass::Whitespace => is_whitespace(ch),
            CharClass::Symbols => is_symbol(ch),
            CharClass::Delimiters => is_whitespace(ch) || is_symbol(ch),
            CharClass::Legal => ch.is_ascii_alphanumeric() || is_whitespace(ch) || is_symbol(ch),
            CharClass::Any => true,
            CharClass::End => false,
        }
    }
}

use CharClass as C;

pub const TRANSITIONS: &[(State, CharClass, State)] = &[
    (State::Initial, C::Char('/'), State::Slash),
    (State::Slash, C::Char('*'), State::CommentBody),
    (State::Slash, C::Any, State::SlashError),
    (State::Slash, C::End, State::SlashError),
    (State::CommentBody, C::Char('*'), State::CommentStar),
    (State::CommentBody, C::Any, State::CommentBody),
    (State::CommentStar, C::Char('/'), State::Comment),
    (State::CommentStar, C::Char('*'), State::CommentStar),
    (State::CommentStar, C::Any, State::CommentBody),
    (State::Initial, C::Char('*'), State::Star),
    (State::Star, C::Char('/'), State::UnmatchedComment),
    (State::Star, C::Legal, State::SymbolEnd),
    (State::Star, C::End, State::SymbolEnd),
    (State::Initial, C::Digits, State::Number),
    (State::Number, C::Digits, State::Number),
    (State::Number, C::Delimiters, State::NumberEnd),
    (State::Number, C::End, State::NumberEnd),
    (State::Number, C::Letters, State::NumberTail),
    (State::NumberTail, C::Alphanumeric, State::NumberTail),
    (State::NumberTail, C::Any, State::InvalidNumber),
    (State::NumberTail, C::End, State::InvalidNumber),
    (State::Initial, C::Char('='), State::Assign),
    (State::Initial, C::Symbols, State::Symbol),
    (State::Assign, C::Char('='), State::DoubleEqual),
    (State::Assign, C::Legal, State::SymbolEnd),
    (State::Assign, C::End, State::SymbolEnd),
    (State::Initial, C::Letters, State::Word),
    (State::Word, C::Alphanumeric, State::Word),
    (State::Word, C::Delimiters, State::WordEnd),
    (State::Word, C::End, State::WordEnd),
    (State::Initial, C::Whitespace, State::Whitespace),
    (State::Whitespace, C::Whitespace, State::Whitespace),
    (State::Whitespace, C::Any, State::WhitespaceEnd),
    (State::Whitespace, C::End, State::WhitespaceEnd),
];

/**
 * The automaton. Only the current state changes.
 */
pub struct Dfa {
    state: State,
}

impl Dfa {
    pub fn new() -> Dfa {
        Dfa {
            state: State::Initial,
        }
    }
    pub fn reset(&mut self) {
        self.state = State::Initial;
    }
    pub fn state(&self) -> State {
        self.state
    }
    /**
     * Moves to the next state on `ch`, where `None` is the end of input,
     * and returns it.
     */
    pub fn step(&mut self, ch: Option<char>) -> State {
        self.state = TRANSITIONS
            .iter()
            .find(|&&(from, class, _)| from == self.state && class.contains(ch))
            .map_or(State::Trash, |&(_, _, to)| to);
        self.state
    }
}
