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

fn set<const N: usize>(terminals: [Terminal; N]) -> BTreeSet<Terminal> {
    terminals.into_iter().collect()
}

const EXPRESSION_FOLLOW: [Terminal; 4] = [
    Terminal::Semicolon,
    Terminal::ClosingBracket,
    Terminal::ClosingParenthesis,
    Terminal::Comma,
];

#[test]
fn ll1() {
    let conflicts = Grammar::new().conflicts();
    assert!(conflicts.is_empty(), "{conflicts:?}");
}

#[test]
fn every_non_terminal_has_alternatives() {
    let grammar = Grammar::new();
    for non_terminal in all::<NonTerminal>() {
        assert!(
            !grammar.alternatives(non_terminal).is_empty(),
            "{}",
            non_terminal.name()
        );
    }
}

#[test]
fn first_sets() {
    let grammar = Grammar::new();
    assert_eq!(
        *grammar.first(NonTerminal::Program),
        set([
            Terminal::KeywordInt,
            Terminal::KeywordVoid,
            Terminal::Epsilon
        ])
    );
    assert_eq!(
        *grammar.first(NonTerminal::B),
        set([
            Terminal::OpeningParenthesis,
            Terminal::OpeningBracket,
            Terminal::DoubleEqual,
            Terminal::Equal,
            Terminal::Plus,
            Terminal::Hyphen,
            Terminal::Asterisk,
            Terminal::Less,
            Terminal::Epsilon,
        ])
    );
    assert_eq!(
        *grammar.first(NonTerminal::FactorZegond),
        set([Terminal::Number, Terminal::OpeningParenthesis])
    );
    assert_eq!(
        *grammar.first(NonTerminal::ParamPrime),
        set([Terminal::OpeningBracket, Terminal::Epsilon])
    );
}

#[test]
fn follow_sets() {
    let grammar = Grammar::new();
    assert_eq!(
        *grammar.follow(NonTerminal::Program),
        set([Terminal::Dollar])
    );
    assert_eq!(
        *grammar.follow(NonTerminal::Expression),
        set(EXPRESSION_FOLLOW)
    );
    assert_eq!(
        *grammar.follow(NonTerminal::DeclarationInitial),
        set([
            Terminal::Semicolon,
            Terminal::OpeningBracket,
            Terminal::OpeningParenthesis,
            Terminal::ClosingParenthesis,
            Terminal::Comma,
        ])
    );
    assert_eq!(
        *grammar.follow(NonTerminal::ElseStmt),
        set([
            Terminal::Identifier,
            Terminal::Number,
            Terminal::KeywordIf,
            Terminal::KeywordElse,
            Terminal::KeywordFor,
            Terminal::KeywordBreak,
            Terminal::KeywordReturn,
            Terminal::KeywordEndif,
            Terminal::Semicolon,
            Terminal::OpeningParenthesis,
            Terminal::OpeningBrace,
            Terminal::ClosingBrace,
            Terminal::Plus,
            Terminal::Hyphen,
        ])
    );
}

#[test]
fn prediction() {
    let grammar = Grammar::new();
    assert_eq!(
        grammar.predict(NonTerminal::Expression, Terminal::Identifier),
        Some(
            &[
                Item::Action(Action::PushId),
                Item::Terminal(Terminal::Identifier),
                Item::NonTerminal(NonTerminal::B),
            ][..]
        )
    );
    assert_eq!(
        grammar.predict(NonTerminal::ParamPrime, Terminal::Comma),
        Some(&[Item::Action(Action::AddFuncParam)][..])
    );
    for terminal in EXPRESSION_FOLLOW {
        assert_eq!(
            grammar.predict(NonTerminal::B, terminal),
            Some(&[Item::NonTerminal(NonTerminal::SimpleExpressionPrime)][..])
        );
    }
    assert_eq!(grammar.predict(NonTerminal::C, Terminal::Semicolon), None);
    assert_eq!(grammar.predict(NonTerminal::Expression, Terminal::Semicolon), None);
}

#[test]
fn missing_semicolon_is_predicted_through() {
    let grammar = Grammar::new();
    for terminal in [Terminal::Dollar, Terminal::KeywordInt, Terminal::ClosingBrace] {
        assert_eq!(
            grammar.predict(NonTerminal::DeclarationPrime, terminal),
            Some(&[Item::NonTerminal(NonTerminal::VarDeclarationPrime)][..])
        );
        assert_eq!(
            grammar.predict(NonTerminal::VarDeclarationPrime, terminal),
            Some(&[Item::Action(Action::DefineInt), Item::Terminal(Terminal::Semicolon)][..])
        );
    }
    assert_eq!(
        grammar.predict(NonTerminal::DeclarationPrime, Terminal::OpeningParenthesis),
        Some(&[Item::NonTerminal(NonTerminal::FunDeclarationPrime)][..])
    );
}

#[test]
fn terminals_from_tokens() {
    assert_eq!(
        Terminal::from_token(TokenKind::Keyword, "endif"),
        Some(Terminal::KeywordEndif)
    );
    assert_eq!(
        Terminal::from_token(TokenKind::Symbol, "=="),
        Some(Terminal::DoubleEqual)
    );
    assert_eq!(
        Terminal::from_token(TokenKind::Identifier, "ID"),
        Some(Terminal::Identifier)
    );
    assert_eq!(
        Terminal::from_token(TokenKind::End, ""),
        Some(Terminal::Dollar)
    );
    assert_eq!(Terminal::from_token(TokenKind::Symbol, "$"), None);
    assert_eq!(Terminal::from_token(TokenKind::Whitespace, " "), None);
}
