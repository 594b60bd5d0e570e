//! The token graph.
//!
//! Every token is simultaneously a member of one neighbors list (source
//! order) and at most one category group. Both links are slotmap keys,
//! so the structure is acyclic by construction and the whole graph is
//! released at once when dropped — unlinking operations never free a
//! token individually.

mod edit;
mod query;

use crate::token::{Place, Token, TokenData, TokenGroup, TokenList};
use slotmap::SlotMap;
use std::ops;

pub use query::Neighbors;

/// Token storage plus the root neighbors list and the category groups.
#[derive(Debug)]
pub struct TokenGraph {
    tokens: SlotMap<Token, TokenData>,
    root: TokenList,
    groups: [TokenList; TokenGroup::ALL.len()],
}

impl Default for TokenGraph {
    fn default() -> Self {
        Self {
            tokens: SlotMap::with_key(),
            root: TokenList::default(),
            groups: [TokenList::default(); TokenGroup::ALL.len()],
        }
    }
}

impl TokenGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, data: TokenData) -> Token {
        self.tokens.insert(data)
    }

    #[must_use]
    pub fn get(&self, token: Token) -> Option<&TokenData> {
        self.tokens.get(token)
    }

    pub(crate) fn get_mut(&mut self, token: Token) -> &mut TokenData {
        self.tokens.get_mut(token).unwrap()
    }

    /// The top-level neighbors list.
    #[must_use]
    pub fn root(&self) -> TokenList {
        self.root
    }

    /// A category group's list.
    #[must_use]
    pub fn group(&self, group: TokenGroup) -> TokenList {
        self.groups[group.index()]
    }

    /// Number of tokens ever created and still owned by the graph,
    /// linked or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub(crate) fn list(&self, place: Place) -> &TokenList {
        match place {
            Place::Root => &self.root,
            Place::ChildrenOf(parent) => &self.tokens[parent].children,
        }
    }

    fn list_mut(&mut self, place: Place) -> &mut TokenList {
        match place {
            Place::Root => &mut self.root,
            Place::ChildrenOf(parent) => &mut self.tokens.get_mut(parent).unwrap().children,
        }
    }
}

impl ops::Index<Token> for TokenGraph {
    type Output = TokenData;

    fn index(&self, index: Token) -> &Self::Output {
        self.tokens.get(index).unwrap()
    }
}
