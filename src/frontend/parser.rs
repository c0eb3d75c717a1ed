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
 * The predictive parser. Consumes one terminal at a time, grows the parse
 * tree and performs the actions met along the derivation.
 */


use super::grammar::{Action, Grammar, Item, NonTerminal, Symbol, Terminal};
use super::parse_tree::{NodeId, ParseTree};
use crate::log::{Logger, SyntaxError};

/**
 * The terminal currently looked at, with the token it came from.
 */
#[derive(Clone, Copy, Debug)]
pub struct Lookahead<'token> {
    pub terminal: Terminal,
    pub lexeme: &'token str,
    pub line: usize,
}

/**
 * Receives the actions met by the parser.
 */
pub trait Actions {
    fn perform(&mut self, action: Action, lookahead: &Lookahead, logger: &mut Logger);
}

/**
 * Ignores every action.
 */
impl Actions for () {
    fn perform(&mut self, _: Action, _: &Lookahead, _: &mut Logger) {}
}

/**
 * An entry of the derivation stack. Grammar symbols carry the parse-tree
 * node created for them.
 */
#[derive(Clone, Copy, Debug)]
enum Frame {
    Terminal(Terminal, NodeId),
    NonTerminal(NonTerminal, NodeId),
    Action(Action),
}

pub struct Parser {
    grammar: Grammar,
    stack: Vec<Frame>,
    tree: ParseTree,
    finished: bool,
}

impl Parser {
    pub fn new() -> Parser {
        let tree = ParseTree::new(NonTerminal::Program.name());
        Parser {
            grammar: Grammar::new(),
            stack: vec![Frame::NonTerminal(NonTerminal::Program, tree.root())],
            tree,
            finished: false,
        }
    }
    /**
     * Whether the end of input has been reached, either normally or by an
     * unexpected EOF. Further calls to [`advance`](Self::advance) change
     * nothing.
     */
    pub fn is_finished(&self) -> bool {
        self.finished
    }
    pub fn tree(&self) -> &ParseTree {
        &self.tree
    }
    pub fn into_tree(self) -> ParseTree {
        self.tree
    }
    /**
     * Drives the derivation until `lookahead` is matched.
     *
     * On [`SyntaxError::Missing`] the missing symbol has been skipped and
     * the same lookahead should be given again. On
     * [`SyntaxError::Illegal`] nothing changed and the caller should move on
     * to the next token. [`SyntaxError::UnexpectedEof`] ends the parse.
     */
    pub fn advance<A: Actions>(
        &mut self,
        lookahead: &Lookahead,
        actions: &mut A,
        logger: &mut Logger,
    ) -> Result<(), SyntaxError> {
        if self.finished {
            return Ok(());
        }
        loop {
            let Some(frame) = self.stack.pop() else {
                if lookahead.terminal != Terminal::Dollar {
                    return Err(SyntaxError::Illegal(lookahead.terminal));
                }
                self.finished = true;
                self.tree.add_child(self.tree.root(), Terminal::Dollar.text());
                return Ok(());
            };
            match frame {
                Frame::Action(action) => {
                    tracing::trace!(action = action.name(), line = lookahead.line, "perform");
                    actions.perform(action, lookahead, logger);
                }
                Frame::Terminal(expected, node) => {
                    if expected == lookahead.terminal {
                        self.tree.set_label(
                            node,
                            format!("({}, {})", expected.kind_name(), lookahead.lexeme),
                        );
                        return Ok(());
                    }
                    self.tree.clear_unused(node);
                    return Err(SyntaxError::Missing(Symbol::Terminal(expected)));
                }
                Frame::NonTerminal(non_terminal, node) => {
                    let terminal = lookahead.terminal;
                    if let Some(body) = self.grammar.predict(non_terminal, terminal) {
                        tracing::trace!(
                            non_terminal = non_terminal.name(),
                            %terminal,
                            "expand"
                        );
                        let body = body.to_vec();
                        self.expand(node, &body);
                    } else if self.grammar.first(non_terminal).contains(&Terminal::Epsilon)
                        && self.grammar.follow(non_terminal).contains(&terminal)
                    {
                        self.tree.add_child(node, Terminal::Epsilon.text());
                    } else if self.grammar.follow(non_terminal).contains(&terminal) {
                        tracing::debug!(non_terminal = non_terminal.name(), %terminal, "missing");
                        self.tree.clear_unused(node);
                        return Err(SyntaxError::Missing(Symbol::NonTerminal(non_terminal)));
                    } else if terminal == Terminal::Dollar {
                        tracing::debug!(non_terminal = non_terminal.name(), "unexpected EOF");
                        self.finished = true;
                        self.tree.clear_unused(node);
                        for frame in std::mem::take(&mut self.stack) {
                            if let Frame::Terminal(_, node) | Frame::NonTerminal(_, node) = frame {
                                self.tree.clear_unused(node);
                            }
                        }
                        return Err(SyntaxError::UnexpectedEof);
                    } else {
                        tracing::debug!(non_terminal = non_terminal.name(), %terminal, "illegal");
                        self.stack.push(frame);
                        return Err(SyntaxError::Illegal(terminal));
                    }
                }
            }
        }
    }
    /**
     * Replaces a nonterminal with a body, adding one child of `node` per
     * grammar symbol in order. A body without grammar symbols derives
     * epsilon.
     */
    fn expand(&mut self, node: NodeId, body: &[Item]) {
        let mut frames = Vec::with_capacity(body.len());
        for &item in body {
            frames.push(match item {
                Item::Terminal(terminal) => {
                    Frame::Terminal(terminal, self.tree.add_child(node, terminal.text()))
                }
                Item::NonTerminal(non_terminal) => Frame::NonTerminal(
                    non_terminal,
                    self.tree.add_child(node, non_terminal.name()),
                ),
                Item::Action(action) => Frame::Action(action),
            });
        }
        if self.tree.children(node).is_empty() {
            self.tree.add_child(node, Terminal::Epsilon.text());
        }
        self.stack.extend(frames.into_iter().rev());
    }
}
