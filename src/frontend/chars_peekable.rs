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
 * Defines [`CharsPeekable`], used in the scanner to iterate over the
 * characters of an input string.
 */

use std::str::Chars;

/**
 * A structure used in the scanner to iterate over the characters of an input
 * string.
 *
 * The next character can be peeked using the [`peek_char`](Self::peek_char)
 * method and is only removed by [`consume`](Self::consume). A character
 * that was peeked but not consumed is therefore seen again by the next
 * scan. Lines are counted as newlines are consumed.
 */
pub struct CharsPeekable<'input> {
    iter: Chars<'input>,
    /**
     * The next character to be consumed. `None` if EOF has been reached.
     */
    peeked_char: Option<char>,
    /**
     * The 1-based line number of the last consumed character.
     */
    line: usize,
}

impl<'input> CharsPeekable<'input> {
    /**
     * Creates a new [`CharsPeekable`] instance from the given input string.
     */
    pub fn new(input: &'input str) -> Self {
        let mut iter = input.chars();
        let first_ch = iter.next();
        Self {
            iter,
            peeked_char: first_ch,
            line: 1,
        }
    }
    /**
     * Returns the next character without consuming it, or `None` if at EOF.
     */
    pub fn peek_char(&self) -> Option<char> {
        self.peeked_char
    }
    /**
     * Consumes the next character, advancing the iterator.
     */
    pub fn consume(&mut self) {
        if self.peeked_char == Some('\n') {
            self.line += 1;
        }
        self.peeked_char = self.iter.next();
    }
    /**
     * The number of newlines consumed so far, plus one.
     */
    pub fn line(&self) -> usize {
        self.line
    }
}
