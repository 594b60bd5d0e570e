//! Mutating operations on the token graph.
//!
//! All of them preserve the list invariants checked by
//! [`TokenGraph::check_invariants`]: tokens sit in at most one neighbors
//! list and at most one group, counts match reachability, and a detached
//! token carries no sibling links.

use super::TokenGraph;
use crate::ast::Node;
use crate::position::Span;
use crate::token::{Place, Token, TokenData, TokenGroup, TokenKind};
use crate::Text;

impl TokenGraph {
    /// Append `token` to the end of the neighbors list at `place`.
    pub fn append_to_list(&mut self, place: Place, token: Token) {
        debug_assert!(self.tokens[token].place.is_none());
        let last = self.list(place).last;
        {
            let data = self.get_mut(token);
            data.place = Some(place);
            data.left = last;
            data.right = None;
        }
        if let Some(last) = last {
            self.get_mut(last).right = Some(token);
        }
        let list = self.list_mut(place);
        if list.first.is_none() {
            list.first = Some(token);
        }
        list.last = Some(token);
        list.count += 1;
    }

    /// Insert `token` at the front of the neighbors list at `place`.
    pub fn prepend_to_list(&mut self, place: Place, token: Token) {
        debug_assert!(self.tokens[token].place.is_none());
        let first = self.list(place).first;
        {
            let data = self.get_mut(token);
            data.place = Some(place);
            data.left = None;
            data.right = first;
        }
        if let Some(first) = first {
            self.get_mut(first).left = Some(token);
        }
        let list = self.list_mut(place);
        if list.last.is_none() {
            list.last = Some(token);
        }
        list.first = Some(token);
        list.count += 1;
    }

    /// File `token` at the end of a category group.
    pub fn append_to_group(&mut self, group: TokenGroup, token: Token) {
        debug_assert!(self.tokens[token].group.is_none());
        let last = self.groups[group.index()].last;
        {
            let data = self.get_mut(token);
            data.group = Some(group);
            data.group_prev = last;
            data.group_next = None;
        }
        if let Some(last) = last {
            self.get_mut(last).group_next = Some(token);
        }
        let list = &mut self.groups[group.index()];
        if list.first.is_none() {
            list.first = Some(token);
        }
        list.last = Some(token);
        list.count += 1;
    }

    /// Take `token` out of its group; a no-op for ungrouped tokens.
    pub fn remove_from_group(&mut self, token: Token) {
        let (group, prev, next) = {
            let data = &self.tokens[token];
            match data.group {
                Some(group) => (group, data.group_prev, data.group_next),
                None => return,
            }
        };
        match prev {
            Some(prev) => self.get_mut(prev).group_next = next,
            None => self.groups[group.index()].first = next,
        }
        match next {
            Some(next) => self.get_mut(next).group_prev = prev,
            None => self.groups[group.index()].last = prev,
        }
        self.groups[group.index()].count -= 1;
        let data = self.get_mut(token);
        data.group = None;
        data.group_prev = None;
        data.group_next = None;
    }

    /// Unlink `token` from its neighbors list; a no-op when detached.
    fn unlink(&mut self, token: Token) {
        let (place, left, right) = {
            let data = &self.tokens[token];
            match data.place {
                Some(place) => (place, data.left, data.right),
                None => return,
            }
        };
        match left {
            Some(left) => self.get_mut(left).right = right,
            None => self.list_mut(place).first = right,
        }
        match right {
            Some(right) => self.get_mut(right).left = left,
            None => self.list_mut(place).last = left,
        }
        self.list_mut(place).count -= 1;
        let data = self.get_mut(token);
        data.place = None;
        data.left = None;
        data.right = None;
    }

    /// Unlink `token` from both its neighbors list and its group.
    ///
    /// The token itself stays in the graph, detached, until the graph is
    /// dropped.
    pub fn remove(&mut self, token: Token) {
        self.unlink(token);
        self.remove_from_group(token);
    }

    /// Put `new` into `old`'s neighbors slot.
    ///
    /// `old` ends up detached and ungrouped but keeps its `children`, so
    /// a rule may keep using it under a different kind.
    pub fn replace(&mut self, old: Token, new: Token) {
        debug_assert!(self.tokens[new].place.is_none());
        let (place, left, right) = {
            let data = &self.tokens[old];
            (data.place, data.left, data.right)
        };
        self.remove_from_group(old);
        let Some(place) = place else { return };
        {
            let data = self.get_mut(new);
            data.place = Some(place);
            data.left = left;
            data.right = right;
        }
        match left {
            Some(left) => self.get_mut(left).right = Some(new),
            None => self.list_mut(place).first = Some(new),
        }
        match right {
            Some(right) => self.get_mut(right).left = Some(new),
            None => self.list_mut(place).last = Some(new),
        }
        let data = self.get_mut(old);
        data.place = None;
        data.left = None;
        data.right = None;
    }

    /// Collapse the neighbor window `first..=last` into a fresh token.
    ///
    /// Every token from `first` up to but excluding `last` is removed,
    /// then `last` is replaced by a new token of `kind` carrying `node`
    /// and spanning the whole window. Returns the new token.
    pub fn collapse(
        &mut self,
        first: Token,
        last: Token,
        kind: TokenKind,
        node: Option<Node>,
    ) -> Token {
        let span = Span::new(self.tokens[first].begin, self.tokens[last].end);
        let mut cursor = Some(first);
        while let Some(token) = cursor {
            if token == last {
                break;
            }
            cursor = self.tokens[token].right;
            self.remove(token);
        }
        let mut data = TokenData::new(kind, span, Text::new());
        data.node = node;
        let fresh = self.insert(data);
        self.replace(last, fresh);
        fresh
    }
}
