//! Read-only traversal and the structural invariant checker.

use super::TokenGraph;
use crate::token::{Place, Token, TokenGroup, TokenList};

/// Iterator over a neighbors list in source order.
pub struct Neighbors<'a> {
    graph: &'a TokenGraph,
    cursor: Option<Token>,
}

impl Iterator for Neighbors<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.cursor?;
        self.cursor = self.graph[token].right;
        Some(token)
    }
}

impl TokenGraph {
    /// Walk a neighbors list front to back.
    #[must_use]
    pub fn neighbors(&self, list: TokenList) -> Neighbors<'_> {
        Neighbors {
            graph: self,
            cursor: list.first,
        }
    }

    /// Walk a group in append order.
    #[must_use]
    pub fn group_members(&self, group: TokenGroup) -> impl Iterator<Item = Token> + '_ {
        let mut cursor = self.group(group).first;
        std::iter::from_fn(move || {
            let token = cursor?;
            cursor = self[token].group_next;
            Some(token)
        })
    }

    /// Verify every structural invariant of the graph.
    ///
    /// Intended for tests; panics with a description of the first
    /// violation found.
    pub fn check_invariants(&self) {
        self.check_list(self.root, Place::Root);
        for (parent, data) in self.tokens.iter() {
            if !data.children.is_empty() {
                self.check_list(data.children, Place::ChildrenOf(parent));
            }
            if data.place.is_none() {
                assert!(
                    data.left.is_none() && data.right.is_none(),
                    "detached token keeps sibling links"
                );
            }
        }

        let mut grouped = 0;
        for group in TokenGroup::ALL {
            grouped += self.check_group(group);
        }
        let with_group = self
            .tokens
            .iter()
            .filter(|(_, data)| data.group.is_some())
            .count();
        assert_eq!(grouped, with_group, "group counts disagree with membership");
    }

    fn check_list(&self, list: TokenList, place: Place) {
        let mut seen = 0;
        let mut previous: Option<Token> = None;
        let mut cursor = list.first;
        while let Some(token) = cursor {
            let data = &self[token];
            assert_eq!(data.place, Some(place), "token linked into the wrong list");
            assert_eq!(data.left, previous, "broken left link");
            if let Some(previous) = previous {
                assert!(
                    self[previous].end.offset <= data.begin.offset,
                    "positions out of order"
                );
            }
            previous = Some(token);
            cursor = data.right;
            seen += 1;
            assert!(seen <= list.count, "list is longer than its count");
        }
        assert_eq!(seen, list.count, "list is shorter than its count");
        assert_eq!(list.last, previous, "last does not close the list");

        // and the same backwards
        let mut seen = 0;
        let mut cursor = list.last;
        while let Some(token) = cursor {
            cursor = self[token].left;
            seen += 1;
        }
        assert_eq!(seen, list.count, "backward walk disagrees with count");
    }

    fn check_group(&self, group: TokenGroup) -> usize {
        let list = self.group(group);
        let mut seen = 0;
        let mut previous: Option<Token> = None;
        let mut cursor = list.first;
        while let Some(token) = cursor {
            let data = &self[token];
            assert_eq!(data.group, Some(group), "token filed in the wrong group");
            assert_eq!(data.group_prev, previous, "broken group back link");
            previous = Some(token);
            cursor = data.group_next;
            seen += 1;
            assert!(seen <= list.count, "group is longer than its count");
        }
        assert_eq!(seen, list.count, "group is shorter than its count");
        assert_eq!(list.last, previous, "group last does not close the list");
        seen
    }
}
