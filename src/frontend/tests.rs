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
use crate::log::LexicalError;

fn written(write: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
    let mut buffer = Vec::new();
    write(&mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

#[test]
fn invalid_number_once() {
    let analysis = analyze("int x;\nvoid main(void) { x = 12abc; }", &mut ());
    assert_eq!(
        analysis.logger.lexical_errors(),
        [(2, LexicalError::InvalidNumber("12abc".to_owned()))]
    );
    assert_eq!(
        written(|w| analysis.logger.write_lexical_errors(w)),
        "2.\t(12abc, Invalid number) \n"
    );
}

#[test]
fn lexical_errors_grouped_by_line() {
    let analysis = analyze("int a @;\nint b!; */\n/* open", &mut ());
    assert_eq!(
        written(|w| analysis.logger.write_lexical_errors(w)),
        "1.\t(@, Invalid input) \n2.\t(b!, Invalid input) (*/, Unmatched comment) \n3.\t(/* open..., Unclosed comment) \n"
    );
}

#[test]
fn no_lexical_error() {
    let analysis = analyze("int x;", &mut ());
    assert_eq!(
        written(|w| analysis.logger.write_lexical_errors(w)),
        "There is no lexical error."
    );
}

#[test]
fn token_listing() {
    let analysis = analyze("int x; /* note */\n\nx = 1;", &mut ());
    assert_eq!(
        written(|w| write_tokens(&analysis.tokens, w)),
        "1.\t(KEYWORD, int) (ID, x) (SYMBOL, ;) \n3.\t(ID, x) (SYMBOL, =) (NUM, 1) (SYMBOL, ;) \n"
    );
}

#[test]
fn symbol_table_listing() {
    let analysis = analyze("int count; int total; int count;", &mut ());
    assert_eq!(
        written(|w| write_lexemes(&analysis.lexemes, w)),
        "1.\tif\n2.\telse\n3.\tvoid\n4.\tint\n5.\tfor\n6.\tbreak\n7.\treturn\n8.\tendif\n9.\tcount\n10.\ttotal\n"
    );
}

#[test]
fn trailing_input_is_listed() {
    let analysis = analyze("int x; } y @", &mut ());
    assert_eq!(
        analysis.logger.lexical_errors(),
        [(1, LexicalError::InvalidInput("@".to_owned()))]
    );
    let lexemes: Vec<_> = analysis.tokens.iter().map(|token| token.lexeme.as_str()).collect();
    assert_eq!(lexemes, ["int", "x", ";", "}", "y"]);
}

#[test]
fn syntax_error_listing() {
    let analysis = analyze("int x", &mut ());
    assert_eq!(
        written(|w| analysis.logger.write_syntax_errors(w)),
        "#1 : Syntax error, missing ;\n"
    );
    let analysis = analyze("int x;", &mut ());
    assert_eq!(
        written(|w| analysis.logger.write_syntax_errors(w)),
        "There is no syntax error."
    );
}
