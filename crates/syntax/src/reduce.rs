//! The reduction engine.
//!
//! An ordered pipeline of local rewrite rules, each driven over one
//! category group. A rule may splice the neighbors list, move tokens
//! between groups, and attach AST nodes; it reports problems through the
//! shared [`Reducer`] context. The snapshot of the traversal's "next"
//! pointer is taken before a rule runs, so a rule unlinking its own token
//! does not disturb the walk.

mod rules;

use crate::ast::{Ast, Node, NodeKind, RootNode};
use crate::error::{CompilationError, ErrorKind};
use crate::graph::TokenGraph;
use crate::position::Span;
use crate::token::{Token, TokenGroup};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

type Rule = for<'a, 'b> fn(&'a mut Reducer<'b>, Token);

struct Pass {
    group: TokenGroup,
    direction: Direction,
    rule: Rule,
}

/// The pipeline, in execution order. Assignment runs backward so `=`
/// associates to the right; scopes run backward so outer braces are
/// classified before the braces nested in them.
const PIPELINE: &[Pass] = &[
    Pass {
        group: TokenGroup::BracePairs,
        direction: Direction::Backward,
        rule: rules::scopes_and_functions,
    },
    Pass {
        group: TokenGroup::Identifiers,
        direction: Direction::Forward,
        rule: rules::function_call_head,
    },
    Pass {
        group: TokenGroup::FunctionArguments,
        direction: Direction::Forward,
        rule: rules::function_call_arguments,
    },
    Pass {
        group: TokenGroup::Identifiers,
        direction: Direction::Forward,
        rule: rules::variable_reference,
    },
    Pass {
        group: TokenGroup::MultiplicativeOperators,
        direction: Direction::Forward,
        rule: rules::binary_operator,
    },
    Pass {
        group: TokenGroup::AdditiveOperators,
        direction: Direction::Forward,
        rule: rules::binary_operator,
    },
    Pass {
        group: TokenGroup::AssignmentOperators,
        direction: Direction::Backward,
        rule: rules::assignment,
    },
    Pass {
        group: TokenGroup::VarKeywords,
        direction: Direction::Forward,
        rule: rules::var_declaration,
    },
    Pass {
        group: TokenGroup::ConstKeywords,
        direction: Direction::Forward,
        rule: rules::const_declaration,
    },
    Pass {
        group: TokenGroup::ReturnKeywords,
        direction: Direction::Forward,
        rule: rules::return_statement,
    },
    Pass {
        group: TokenGroup::StatementLists,
        direction: Direction::Forward,
        rule: rules::statement_list_body,
    },
    Pass {
        group: TokenGroup::FunctionObjects,
        direction: Direction::Forward,
        rule: rules::function_body,
    },
];

/// Shared state of one reduction run.
///
/// Rules report through it instead of returning errors, so one rule
/// invocation may leave several diagnostics.
pub(crate) struct Reducer<'a> {
    pub graph: &'a mut TokenGraph,
    pub ast: &'a mut Ast,
    errors: Vec<CompilationError>,
    aborted: bool,
}

impl<'a> Reducer<'a> {
    fn new(graph: &'a mut TokenGraph, ast: &'a mut Ast) -> Self {
        Self {
            graph,
            ast,
            errors: Vec::new(),
            aborted: false,
        }
    }

    fn finish(self) -> Vec<CompilationError> {
        self.errors
    }

    /// Report a diagnostic and keep going.
    pub(crate) fn error(&mut self, span: Span, kind: ErrorKind) {
        tracing::trace!(%kind, "reduction error");
        self.errors.push(CompilationError::new(span, kind));
    }

    /// Report a diagnostic that stops the pass and the pipeline.
    pub(crate) fn critical(&mut self, span: Span, kind: ErrorKind) {
        tracing::trace!(%kind, "critical reduction error");
        self.errors.push(CompilationError::critical(span, kind));
        self.aborted = true;
    }
}

/// Run the whole pipeline over the groups of `graph`.
///
/// Returns the collected diagnostics; the presence of a critical one
/// means the pipeline stopped early and no root should be built.
pub fn apply_reduction_rules(graph: &mut TokenGraph, ast: &mut Ast) -> Vec<CompilationError> {
    let mut reducer = Reducer::new(graph, ast);
    for pass in PIPELINE {
        tracing::debug!(group = ?pass.group, "reduction pass");
        let list = reducer.graph.group(pass.group);
        let mut cursor = match pass.direction {
            Direction::Forward => list.first,
            Direction::Backward => list.last,
        };
        while let Some(token) = cursor {
            let next = match pass.direction {
                Direction::Forward => reducer.graph[token].group_next(),
                Direction::Backward => reducer.graph[token].group_prev(),
            };
            (pass.rule)(&mut reducer, token);
            if reducer.aborted {
                return reducer.finish();
            }
            cursor = next;
        }
    }
    reducer.finish()
}

/// Build the root statement list from the top-level neighbors list.
pub fn process_root(graph: &mut TokenGraph, ast: &mut Ast) -> (Node, Vec<CompilationError>) {
    let root_list = graph.root();
    let mut reducer = Reducer::new(graph, ast);
    let statements = rules::collect_statements(&mut reducer, root_list);
    let errors = reducer.finish();
    let root = ast.add(NodeKind::Root(RootNode { statements }));
    (root, errors)
}
