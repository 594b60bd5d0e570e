//! Tokens, token kinds and category groups.

use crate::ast::Node;
use crate::error::ErrorKind;
use crate::position::{Position, Span};
use crate::Text;
use serde::{Deserialize, Serialize};

slotmap::new_key_type! {
    /// Key of a token in the [`crate::graph::TokenGraph`].
    pub struct Token;
}

/// Token kinds, a closed enumeration.
///
/// The first half comes straight out of the scanner; the second half is
/// produced by bracket matching and reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Identifier,
    Bracket,
    Operator,
    Comma,
    Semicolon,
    Error,
    Var,
    Const,
    Func,
    Return,
    BracketPair,
    Expression,
    Statement,
    FcallArgs,
    StatementList,
    FunctionBody,
}

/// Category buckets.
///
/// Filled append-only during scanning and bracket matching; reduction
/// moves tokens between buckets as they change kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenGroup {
    Identifiers,
    AdditiveOperators,
    MultiplicativeOperators,
    AssignmentOperators,
    BracePairs,
    FunctionArguments,
    VarKeywords,
    ConstKeywords,
    FunctionKeywords,
    ReturnKeywords,
    StatementLists,
    FunctionObjects,
}

impl TokenGroup {
    pub const ALL: [Self; 12] = [
        Self::Identifiers,
        Self::AdditiveOperators,
        Self::MultiplicativeOperators,
        Self::AssignmentOperators,
        Self::BracePairs,
        Self::FunctionArguments,
        Self::VarKeywords,
        Self::ConstKeywords,
        Self::FunctionKeywords,
        Self::ReturnKeywords,
        Self::StatementLists,
        Self::FunctionObjects,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// One doubly linked token list: the root neighbors list, a `children`
/// list, or a group bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenList {
    pub first: Option<Token>,
    pub last: Option<Token>,
    pub count: usize,
}

impl TokenList {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Which neighbors list a token is currently linked into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Place {
    Root,
    ChildrenOf(Token),
}

/// Everything stored for one token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenData {
    pub kind: TokenKind,
    pub begin: Position,
    pub end: Position,
    pub text: Text,
    /// AST payload, set once the token carries semantic content.
    pub node: Option<Node>,
    /// Typed lexical diagnostic; set on `Error` tokens only.
    pub diagnostic: Option<ErrorKind>,
    /// Inner neighbors list; non-empty only for bracket pairs and the
    /// kinds derived from them.
    pub children: TokenList,
    pub(crate) place: Option<Place>,
    pub(crate) left: Option<Token>,
    pub(crate) right: Option<Token>,
    pub(crate) group: Option<TokenGroup>,
    pub(crate) group_prev: Option<Token>,
    pub(crate) group_next: Option<Token>,
}

impl TokenData {
    pub(crate) fn new(kind: TokenKind, span: Span, text: Text) -> Self {
        Self {
            kind,
            begin: span.begin,
            end: span.end,
            text,
            node: None,
            diagnostic: None,
            children: TokenList::default(),
            place: None,
            left: None,
            right: None,
            group: None,
            group_prev: None,
            group_next: None,
        }
    }

    #[must_use]
    pub fn span(&self) -> Span {
        Span::new(self.begin, self.end)
    }

    /// The neighbors list this token is linked into, if any.
    #[must_use]
    pub fn place(&self) -> Option<Place> {
        self.place
    }

    #[must_use]
    pub fn left(&self) -> Option<Token> {
        self.left
    }

    #[must_use]
    pub fn right(&self) -> Option<Token> {
        self.right
    }

    #[must_use]
    pub fn group(&self) -> Option<TokenGroup> {
        self.group
    }

    #[must_use]
    pub fn group_prev(&self) -> Option<Token> {
        self.group_prev
    }

    #[must_use]
    pub fn group_next(&self) -> Option<Token> {
        self.group_next
    }
}
