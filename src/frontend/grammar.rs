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
 * The grammar of the language, annotated with the actions driving code
 * generation, and the predictive parsing table derived from it.
 */

mod tests;

use std::collections::{BTreeSet, HashMap};
use std::fmt::{self, Display, Formatter};

use enum_iterator::{Sequence, all};

use super::scanner::TokenKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Sequence)]
pub enum Terminal {
    Identifier,
    Number,
    /**
     * Marks a nullable nonterminal in FIRST sets. Never produced by the
     * scanner.
     */
    Epsilon,
    KeywordIf,
    KeywordElse,
    KeywordVoid,
    KeywordInt,
    KeywordFor,
    KeywordBreak,
    KeywordReturn,
    KeywordEndif,
    Colon,
    Semicolon,
    OpeningParenthesis,
    ClosingParenthesis,
    OpeningBracket,
    ClosingBracket,
    OpeningBrace,
    ClosingBrace,
    Comma,
    DoubleEqual,
    Equal,
    Plus,
    Hyphen,
    Asterisk,
    Less,
    /**
     * The end of input.
     */
    Dollar,
}

impl Terminal {
    pub fn text(self) -> &'static str {
        match self {
            Terminal::Identifier => "ID",
            Terminal::Number => "NUM",
            Terminal::Epsilon => "epsilon",
            Terminal::KeywordIf => "if",
            Terminal::KeywordElse => "else",
            Terminal::KeywordVoid => "void",
            Terminal::KeywordInt => "int",
            Terminal::KeywordFor => "for",
            Terminal::KeywordBreak => "break",
            Terminal::KeywordReturn => "return",
            Terminal::KeywordEndif => "endif",
            Terminal::Colon => ":",
            Terminal::Semicolon => ";",
            Terminal::OpeningParenthesis => "(",
            Terminal::ClosingParenthesis => ")",
            Terminal::OpeningBracket => "[",
            Terminal::ClosingBracket => "]",
            Terminal::OpeningBrace => "{",
            Terminal::ClosingBrace => "}",
            Terminal::Comma => ",",
            Terminal::DoubleEqual => "==",
            Terminal::Equal => "=",
            Terminal::Plus => "+",
            Terminal::Hyphen => "-",
            Terminal::Asterisk => "*",
            Terminal::Less => "<",
            Terminal::Dollar => "$",
        }
    }
    /**
     * The token kind shown in parse-tree labels.
     */
    pub fn kind_name(self) -> &'static str {
        match self {
            Terminal::Identifier => TokenKind::Identifier.name(),
            Terminal::Number => TokenKind::Number.name(),
            Terminal::KeywordIf
            | Terminal::KeywordElse
            | Terminal::KeywordVoid
            | Terminal::KeywordInt
            | Terminal::KeywordFor
            | Terminal::KeywordBreak
            | Terminal::KeywordReturn
            | Terminal::KeywordEndif => TokenKind::Keyword.name(),
            Terminal::Epsilon | Terminal::Dollar => TokenKind::End.name(),
            _ => TokenKind::Symbol.name(),
        }
    }
    /**
     * Maps a token to the terminal the parser consumes. Comments,
     * whitespace and unknown symbols have none.
     */
    pub fn from_token(kind: TokenKind, lexeme: &str) -> Option<Terminal> {
        match kind {
            TokenKind::Number => Some(Terminal::Number),
            TokenKind::Identifier => Some(Terminal::Identifier),
            TokenKind::End => Some(Terminal::Dollar),
            TokenKind::Keyword | TokenKind::Symbol => all::<Terminal>().find(|terminal| {
                !matches!(
                    terminal,
                    Terminal::Identifier | Terminal::Number | Terminal::Epsilon | Terminal::Dollar
                ) && terminal.text() == lexeme
            }),
            TokenKind::Comment | TokenKind::Whitespace => None,
        }
    }
}

impl Display for Terminal {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Sequence)]
pub enum NonTerminal {
    Program,
    DeclarationList,
    Declaration,
    DeclarationInitial,
    DeclarationPrime,
    VarDeclarationPrime,
    FunDeclarationPrime,
    TypeSpecifier,
    Params,
    ParamList,
    Param,
    ParamPrime,
    CompoundStmt,
    StatementList,
    Statement,
    ExpressionStmt,
    SelectionStmt,
    ElseStmt,
    IterationStmt,
    ReturnStmt,
    ReturnStmtPrime,
    Expression,
    B,
    H,
    SimpleExpressionZegond,
    SimpleExpressionPrime,
    C,
    Relop,
    AdditiveExpression,
    AdditiveExpressionPrime,
    AdditiveExpressionZegond,
    D,
    Addop,
    Term,
    TermPrime,
    TermZegond,
    G,
    SignedFactor,
    SignedFactorPrime,
    SignedFactorZegond,
    Factor,
    VarCallPrime,
    VarPrime,
    FactorPrime,
    FactorZegond,
    Args,
    ArgList,
    ArgListPrime,
}

impl NonTerminal {
    pub fn name(self) -> &'static str {
        match self {
            NonTerminal::Program => "Program",
            NonTerminal::DeclarationList => "Declaration-list",
            NonTerminal::Declaration => "Declaration",
            NonTerminal::DeclarationInitial => "Declaration-initial",
            NonTerminal::DeclarationPrime => "Declaration-prime",
            NonTerminal::VarDeclarationPrime => "Var-declaration-prime",
            NonTerminal::FunDeclarationPrime => "Fun-declaration-prime",
            NonTerminal::TypeSpecifier => "Type-specifier",
            NonTerminal::Params => "Params",
            NonTerminal::ParamList => "Param-list",
            NonTerminal::Param => "Param",
            NonTerminal::ParamPrime => "Param-prime",
            NonTerminal::CompoundStmt => "Compound-stmt",
            NonTerminal::StatementList => "Statement-list",
            NonTerminal::Statement => "Statement",
            NonTerminal::ExpressionStmt => "Expression-stmt",
            NonTerminal::SelectionStmt => "Selection-stmt",
            NonTerminal::ElseStmt => "Else-stmt",
            NonTerminal::IterationStmt => "Iteration-stmt",
            NonTerminal::ReturnStmt => "Return-stmt",
            NonTerminal::ReturnStmtPrime => "Return-stmt-prime",
            NonTerminal::Expression => "Expression",
            NonTerminal::B => "B",
            NonTerminal::H => "H",
            NonTerminal::SimpleExpressionZegond => "Simple-expression-zegond",
            NonTerminal::SimpleExpressionPrime => "Simple-expression-prime",
            NonTerminal::C => "C",
            NonTerminal::Relop => "Relop",
            NonTerminal::AdditiveExpression => "Additive-expression",
            NonTerminal::AdditiveExpressionPrime => "Additive-expression-prime",
            NonTerminal::AdditiveExpressionZegond => "Additive-expression-zegond",
            NonTerminal::D => "D",
            NonTerminal::Addop => "Addop",
            NonTerminal::Term => "Term",
            NonTerminal::TermPrime => "Term-prime",
            NonTerminal::TermZegond => "Term-zegond",
            NonTerminal::G => "G",
            NonTerminal::SignedFactor => "Signed-factor",
            NonTerminal::SignedFactorPrime => "Signed-factor-prime",
            NonTerminal::SignedFactorZegond => "Signed-factor-zegond",
            NonTerminal::Factor => "Factor",
            NonTerminal::VarCallPrime => "Var-call-prime",
            NonTerminal::VarPrime => "Var-prime",
            NonTerminal::FactorPrime => "Factor-prime",
            NonTerminal::FactorZegond => "Factor-zegond",
            NonTerminal::Args => "Args",
            NonTerminal::ArgList => "Arg-list",
            NonTerminal::ArgListPrime => "Arg-list-prime",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
    Terminal(Terminal),
    NonTerminal(NonTerminal),
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Symbol::Terminal(terminal) => write!(f, "{}", terminal.text()),
            Symbol::NonTerminal(non_terminal) => write!(f, "{}", non_terminal.name()),
        }
    }
}

/**
 * A semantic action. Actions sit in production bodies next to grammar
 * symbols and are performed when the parser pops them.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Sequence)]
pub enum Action {
    PushId,
    PushOperator,
    PushStack,
    Pop,
    Assign,
    Operation,
    Negate,
    DefineInt,
    DefineArr,
    RegisterFunc,
    AddFuncParam,
    AddFuncArrayParam,
    BeginFunc,
    EndFunc,
    ReturnCodeBlock,
    CallMain,
    BeginArgs,
    CallFunc,
    SkipPb,
    JpfFromSkipped,
    JpfFromSkippedSave,
    JpFromSkipped,
    Label,
    BeginLoop,
    ForCondition,
    ForStep,
    EndLoop,
    BreakStatement,
    FuncReturn,
    SetFuncReturnValue,
    PushArrIndexAddr,
    PushAddrValue,
    ArrAssign,
    PushScope,
    PopScope,
}

impl Action {
    pub fn name(self) -> &'static str {
        match self {
            Action::PushId => "push_id",
            Action::PushOperator => "push_operator",
            Action::PushStack => "push_stack",
            Action::Pop => "pop",
            Action::Assign => "assign",
            Action::Operation => "operation",
            Action::Negate => "negate",
            Action::DefineInt => "define_int",
            Action::DefineArr => "define_arr",
            Action::RegisterFunc => "register_func",
            Action::AddFuncParam => "add_func_param",
            Action::AddFuncArrayParam => "add_func_array_param",
            Action::BeginFunc => "begin_func",
            Action::EndFunc => "end_func",
            Action::ReturnCodeBlock => "return_code_block",
            Action::CallMain => "call_main",
            Action::BeginArgs => "begin_args",
            Action::CallFunc => "call_func",
            Action::SkipPb => "skip_pb",
            Action::JpfFromSkipped => "jpf_from_skipped",
            Action::JpfFromSkippedSave => "jpf_from_skipped_save",
            Action::JpFromSkipped => "jp_from_skipped",
            Action::Label => "label",
            Action::BeginLoop => "begin_loop",
            Action::ForCondition => "for_condition",
            Action::ForStep => "for_step",
            Action::EndLoop => "end_loop",
            Action::BreakStatement => "break_statement",
            Action::FuncReturn => "func_return",
            Action::SetFuncReturnValue => "set_func_return_value",
            Action::PushArrIndexAddr => "push_arr_index_addr",
            Action::PushAddrValue => "push_addr_value",
            Action::ArrAssign => "arr_assign",
            Action::PushScope => "push_scope",
            Action::PopScope => "pop_scope",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Item {
    Terminal(Terminal),
    NonTerminal(NonTerminal),
    Action(Action),
}

/**
 * One alternative of a nonterminal in the parsing table.
 */
#[derive(Debug)]
pub struct Alternative {
    /**
     * The terminals selecting this alternative.
     */
    pub lookahead: BTreeSet<Terminal>,
    pub body: Vec<Item>,
}

/**
 * A production body as written, before its lookahead set is known.
 */
struct Production {
    body: Vec<Item>,
    /**
     * Also selected by any terminal in FOLLOW of the head that selects no
     * other alternative. Lets the parser report the first missing terminal
     * of the body instead of the whole nonterminal.
     */
    on_follow: bool,
}

fn alt(body: Vec<Item>) -> Production {
    Production {
        body,
        on_follow: false,
    }
}

fn fallback(body: Vec<Item>) -> Production {
    Production {
        body,
        on_follow: true,
    }
}

fn productions() -> Vec<(NonTerminal, Vec<Production>)> {
    use Action::*;
    use Item::{Action as A, NonTerminal as N, Terminal as T};
    use NonTerminal::*;
    use Terminal::*;
    vec![
        (Program, vec![alt(vec![N(DeclarationList), A(CallMain)])]),
        (
            DeclarationList,
            vec![
                alt(vec![N(Declaration), N(DeclarationList)]),
                alt(vec![]),
            ],
        ),
        (
            Declaration,
            vec![alt(vec![N(DeclarationInitial), N(DeclarationPrime)])],
        ),
        (
            DeclarationInitial,
            vec![alt(vec![N(TypeSpecifier), A(PushId), T(Identifier)])],
        ),
        (
            DeclarationPrime,
            vec![
                alt(vec![N(FunDeclarationPrime)]),
                fallback(vec![N(VarDeclarationPrime)]),
            ],
        ),
        (
            VarDeclarationPrime,
            vec![
                fallback(vec![A(DefineInt), T(Semicolon)]),
                alt(vec![
                    T(OpeningBracket),
                    A(PushId),
                    T(Number),
                    T(ClosingBracket),
                    A(DefineArr),
                    T(Semicolon),
                ]),
            ],
        ),
        (
            FunDeclarationPrime,
            vec![alt(vec![
                A(RegisterFunc),
                T(OpeningParenthesis),
                N(Params),
                T(ClosingParenthesis),
                A(BeginFunc),
                A(SkipPb),
                A(ReturnCodeBlock),
                A(JpFromSkipped),
                N(CompoundStmt),
                A(EndFunc),
            ])],
        ),
        (
            TypeSpecifier,
            vec![
                alt(vec![A(PushId), T(KeywordInt)]),
                alt(vec![A(PushId), T(KeywordVoid)]),
            ],
        ),
        (
            Params,
            vec![
                alt(vec![
                    A(PushId),
                    T(KeywordInt),
                    A(PushId),
                    T(Identifier),
                    N(ParamPrime),
                    N(ParamList),
                ]),
                alt(vec![T(KeywordVoid)]),
            ],
        ),
        (
            ParamList,
            vec![alt(vec![T(Comma), N(Param), N(ParamList)]), alt(vec![])],
        ),
        (Param, vec![alt(vec![N(DeclarationInitial), N(ParamPrime)])]),
        (
            ParamPrime,
            vec![
                alt(vec![
                    T(OpeningBracket),
                    T(ClosingBracket),
                    A(AddFuncArrayParam),
                ]),
                alt(vec![A(AddFuncParam)]),
            ],
        ),
        (
            CompoundStmt,
            vec![alt(vec![
                T(OpeningBrace),
                A(PushScope),
                N(DeclarationList),
                N(StatementList),
                A(PopScope),
                T(ClosingBrace),
            ])],
        ),
        (
            StatementList,
            vec![alt(vec![N(Statement), N(StatementList)]), alt(vec![])],
        ),
        (
            Statement,
            vec![
                alt(vec![N(ExpressionStmt)]),
                alt(vec![N(CompoundStmt)]),
                alt(vec![N(SelectionStmt)]),
                alt(vec![N(IterationStmt)]),
                alt(vec![N(ReturnStmt)]),
            ],
        ),
        (
            ExpressionStmt,
            vec![
                alt(vec![N(Expression), A(Pop), T(Semicolon)]),
                alt(vec![T(KeywordBreak), A(BreakStatement), T(Semicolon)]),
                alt(vec![T(Semicolon)]),
            ],
        ),
        (
            SelectionStmt,
            vec![alt(vec![
                T(KeywordIf),
                T(OpeningParenthesis),
                N(Expression),
                T(ClosingParenthesis),
                A(Pop),
                A(SkipPb),
                N(Statement),
                N(ElseStmt),
            ])],
        ),
        (
            ElseStmt,
            vec![
                alt(vec![T(KeywordEndif), A(JpfFromSkipped)]),
                alt(vec![
                    T(KeywordElse),
                    A(JpfFromSkippedSave),
                    N(Statement),
                    T(KeywordEndif),
                    A(JpFromSkipped),
                ]),
            ],
        ),
        (
            IterationStmt,
            vec![alt(vec![
                T(KeywordFor),
                A(BeginLoop),
                T(OpeningParenthesis),
                N(Expression),
                A(Pop),
                T(Semicolon),
                A(Label),
                N(Expression),
                A(Pop),
                A(ForCondition),
                T(Semicolon),
                N(Expression),
                A(Pop),
                A(ForStep),
                T(ClosingParenthesis),
                N(Statement),
                A(EndLoop),
            ])],
        ),
        (
            ReturnStmt,
            vec![alt(vec![T(KeywordReturn), N(ReturnStmtPrime)])],
        ),
        (
            ReturnStmtPrime,
            vec![
                alt(vec![
                    N(Expression),
                    A(SetFuncReturnValue),
                    A(FuncReturn),
                    T(Semicolon),
                ]),
                alt(vec![A(FuncReturn), T(Semicolon)]),
            ],
        ),
        (
            Expression,
            vec![
                alt(vec![N(SimpleExpressionZegond)]),
                alt(vec![A(PushId), T(Identifier), N(B)]),
            ],
        ),
        (
            B,
            vec![
                alt(vec![T(Equal), N(Expression), A(Assign)]),
                alt(vec![
                    T(OpeningBracket),
                    A(PushStack),
                    N(Expression),
                    T(ClosingBracket),
                    A(PushArrIndexAddr),
                    N(H),
                ]),
                alt(vec![N(SimpleExpressionPrime)]),
            ],
        ),
        (
            H,
            vec![
                alt(vec![T(Equal), N(Expression), A(ArrAssign)]),
                alt(vec![A(PushAddrValue), N(G), N(D), N(C)]),
            ],
        ),
        (
            SimpleExpressionZegond,
            vec![alt(vec![N(AdditiveExpressionZegond), N(C)])],
        ),
        (
            SimpleExpressionPrime,
            vec![alt(vec![N(AdditiveExpressionPrime), N(C)])],
        ),
        (
            C,
            vec![
                alt(vec![N(Relop), N(AdditiveExpression), A(Operation)]),
                alt(vec![]),
            ],
        ),
        (
            Relop,
            vec![
                alt(vec![A(PushOperator), T(Less)]),
                alt(vec![A(PushOperator), T(DoubleEqual)]),
            ],
        ),
        (AdditiveExpression, vec![alt(vec![N(Term), N(D)])]),
        (AdditiveExpressionPrime, vec![alt(vec![N(TermPrime), N(D)])]),
        (AdditiveExpressionZegond, vec![alt(vec![N(TermZegond), N(D)])]),
        (
            D,
            vec![
                alt(vec![N(Addop), N(Term), A(Operation), N(D)]),
                alt(vec![]),
            ],
        ),
        (
            Addop,
            vec![
                alt(vec![A(PushOperator), T(Plus)]),
                alt(vec![A(PushOperator), T(Hyphen)]),
            ],
        ),
        (Term, vec![alt(vec![N(SignedFactor), N(G)])]),
        (TermPrime, vec![alt(vec![N(SignedFactorPrime), N(G)])]),
        (TermZegond, vec![alt(vec![N(SignedFactorZegond), N(G)])]),
        (
            G,
            vec![
                alt(vec![
                    A(PushOperator),
                    T(Asterisk),
                    N(SignedFactor),
                    A(Operation),
                    N(G),
                ]),
                alt(vec![]),
            ],
        ),
        (
            SignedFactor,
            vec![
                alt(vec![T(Plus), N(Factor)]),
                alt(vec![T(Hyphen), N(Factor), A(Negate)]),
                alt(vec![N(Factor)]),
            ],
        ),
        (SignedFactorPrime, vec![alt(vec![N(FactorPrime)])]),
        (
            SignedFactorZegond,
            vec![
                alt(vec![T(Plus), N(Factor)]),
                alt(vec![T(Hyphen), N(Factor), A(Negate)]),
                alt(vec![N(FactorZegond)]),
            ],
        ),
        (
            Factor,
            vec![
                alt(vec![
                    T(OpeningParenthesis),
                    N(Expression),
                    T(ClosingParenthesis),
                ]),
                alt(vec![A(PushId), T(Identifier), N(VarCallPrime)]),
                alt(vec![A(PushId), T(Number), A(PushStack)]),
            ],
        ),
        (
            VarCallPrime,
            vec![
                alt(vec![
                    T(OpeningParenthesis),
                    A(BeginArgs),
                    N(Args),
                    T(ClosingParenthesis),
                    A(CallFunc),
                ]),
                alt(vec![N(VarPrime)]),
            ],
        ),
        (
            VarPrime,
            vec![
                alt(vec![
                    T(OpeningBracket),
                    A(PushStack),
                    N(Expression),
                    T(ClosingBracket),
                    A(PushArrIndexAddr),
                    A(PushAddrValue),
                ]),
                alt(vec![A(PushStack)]),
            ],
        ),
        (
            FactorPrime,
            vec![
                alt(vec![
                    T(OpeningParenthesis),
                    A(BeginArgs),
                    N(Args),
                    T(ClosingParenthesis),
                    A(CallFunc),
                ]),
                alt(vec![A(PushStack)]),
            ],
        ),
        (
            FactorZegond,
            vec![
                alt(vec![
                    T(OpeningParenthesis),
                    N(Expression),
                    T(ClosingParenthesis),
                ]),
                alt(vec![A(PushId), T(Number), A(PushStack)]),
            ],
        ),
        (Args, vec![alt(vec![N(ArgList)]), alt(vec![])]),
        (ArgList, vec![alt(vec![N(Expression), N(ArgListPrime)])]),
        (
            ArgListPrime,
            vec![
                alt(vec![T(Comma), N(Expression), N(ArgListPrime)]),
                alt(vec![]),
            ],
        ),
    ]
}

/**
 * The parsing table together with the FIRST and FOLLOW set of every
 * nonterminal. Empty alternatives are not in the table; the parser derives
 * epsilon when no alternative applies and FIRST contains
 * [`Terminal::Epsilon`].
 */
pub struct Grammar {
    alternatives: HashMap<NonTerminal, Vec<Alternative>>,
    /**
     * Nonterminals with an empty production.
     */
    derives_empty: BTreeSet<NonTerminal>,
    first: HashMap<NonTerminal, BTreeSet<Terminal>>,
    follow: HashMap<NonTerminal, BTreeSet<Terminal>>,
}

impl Grammar {
    pub fn new() -> Grammar {
        let productions: HashMap<_, _> = productions().into_iter().collect();
        let first = first_sets(&productions);
        let follow = follow_sets(&productions, &first);
        let mut alternatives = HashMap::new();
        let mut derives_empty = BTreeSet::new();
        for non_terminal in all::<NonTerminal>() {
            let Some(bodies) = productions.get(&non_terminal) else {
                continue;
            };
            let mut table: Vec<(Alternative, bool)> = Vec::new();
            for production in bodies {
                if production.body.is_empty() {
                    derives_empty.insert(non_terminal);
                    continue;
                }
                let mut lookahead = body_first(&production.body, &first);
                if lookahead.remove(&Terminal::Epsilon) {
                    lookahead.extend(&follow[&non_terminal]);
                }
                table.push((
                    Alternative {
                        lookahead,
                        body: production.body.clone(),
                    },
                    production.on_follow,
                ));
            }
            let taken: BTreeSet<Terminal> = table
                .iter()
                .filter(|(_, on_follow)| !on_follow)
                .flat_map(|(alternative, _)| alternative.lookahead.iter().copied())
                .collect();
            for (alternative, on_follow) in &mut table {
                if *on_follow {
                    alternative
                        .lookahead
                        .extend(follow[&non_terminal].difference(&taken));
                }
            }
            alternatives.insert(
                non_terminal,
                table.into_iter().map(|(alternative, _)| alternative).collect(),
            );
        }
        let grammar = Grammar {
            alternatives,
            derives_empty,
            first,
            follow,
        };
        debug_assert!(grammar.conflicts().is_empty());
        grammar
    }
    /**
     * The body of the alternative of `non_terminal` selected by
     * `terminal`, if any.
     */
    pub fn predict(&self, non_terminal: NonTerminal, terminal: Terminal) -> Option<&[Item]> {
        self.alternatives
            .get(&non_terminal)?
            .iter()
            .find(|alternative| alternative.lookahead.contains(&terminal))
            .map(|alternative| alternative.body.as_slice())
    }
    pub fn alternatives(&self, non_terminal: NonTerminal) -> &[Alternative] {
        self.alternatives
            .get(&non_terminal)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
    pub fn first(&self, non_terminal: NonTerminal) -> &BTreeSet<Terminal> {
        &self.first[&non_terminal]
    }
    pub fn follow(&self, non_terminal: NonTerminal) -> &BTreeSet<Terminal> {
        &self.follow[&non_terminal]
    }
    /**
     * Every terminal selecting more than one way to continue: two
     * alternatives, or an alternative and the epsilon derivation.
     */
    pub fn conflicts(&self) -> Vec<(NonTerminal, Terminal)> {
        let mut conflicts = Vec::new();
        for non_terminal in all::<NonTerminal>() {
            let mut seen = BTreeSet::new();
            if self.derives_empty.contains(&non_terminal) {
                seen.extend(self.follow(non_terminal).iter().copied());
            }
            let alternatives = self.alternatives(non_terminal);
            for alternative in alternatives {
                for &terminal in &alternative.lookahead {
                    if !seen.insert(terminal) {
                        conflicts.push((non_terminal, terminal));
                    }
                }
            }
        }
        conflicts
    }
}

/**
 * FIRST of a sequence of items. Contains [`Terminal::Epsilon`] if every
 * item can derive the empty string. Actions derive nothing.
 */
fn body_first(
    body: &[Item],
    first: &HashMap<NonTerminal, BTreeSet<Terminal>>,
) -> BTreeSet<Terminal> {
    let mut ret = BTreeSet::new();
    for item in body {
        match *item {
            Item::Terminal(terminal) => {
                ret.insert(terminal);
                return ret;
            }
            Item::NonTerminal(non_terminal) => {
                let set = first.get(&non_terminal);
                ret.extend(
                    set.into_iter()
                        .flatten()
                        .filter(|&&terminal| terminal != Terminal::Epsilon),
                );
                if !set.is_some_and(|set| set.contains(&Terminal::Epsilon)) {
                    return ret;
                }
            }
            Item::Action(_) => {}
        }
    }
    ret.insert(Terminal::Epsilon);
    ret
}

fn first_sets(
    productions: &HashMap<NonTerminal, Vec<Production>>,
) -> HashMap<NonTerminal, BTreeSet<Terminal>> {
    let mut first: HashMap<_, _> = all::<NonTerminal>()
        .map(|non_terminal| (non_terminal, BTreeSet::new()))
        .collect();
    loop {
        let mut changed = false;
        for (&head, bodies) in productions {
            for production in bodies {
                let set = body_first(&production.body, &first);
                let entry = first.entry(head).or_default();
                let before = entry.len();
                entry.extend(set);
                changed |= entry.len() != before;
            }
        }
        if !changed {
            return first;
        }
    }
}

fn follow_sets(
    productions: &HashMap<NonTerminal, Vec<Production>>,
    first: &HashMap<NonTerminal, BTreeSet<Terminal>>,
) -> HashMap<NonTerminal, BTreeSet<Terminal>> {
    let mut follow: HashMap<_, _> = all::<NonTerminal>()
        .map(|non_terminal| (non_terminal, BTreeSet::new()))
        .collect();
    follow
        .entry(NonTerminal::Program)
        .or_default()
        .insert(Terminal::Dollar);
    loop {
        let mut changed = false;
        for (&head, bodies) in productions {
            for production in bodies {
                for (index, item) in production.body.iter().enumerate() {
                    let Item::NonTerminal(non_terminal) = *item else {
                        continue;
                    };
                    let mut set = body_first(&production.body[index + 1..], first);
                    if set.remove(&Terminal::Epsilon) {
                        set.extend(follow[&head].iter().copied());
                    }
                    let entry = follow.entry(non_terminal).or_default();
                    let before = entry.len();
                    entry.extend(set);
                    changed |= entry.len() != before;
                }
            }
        }
        if !changed {
            return follow;
        }
    }
}
