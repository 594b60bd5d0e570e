//! The reduction rules.
//!
//! Every rule gets the token the engine is visiting and rewrites a small
//! neighbor window around it. Rules silently skip tokens they do not
//! apply to; an earlier rule may already have retagged or unlinked them.

use super::Reducer;
use crate::ast::{
    AssignmentNode, BinaryNode, BinaryOp, DeclarationNode, FunctionCallNode, FunctionObjectNode,
    Node, NodeKind, ReturnNode, StatementExpressionNode, StatementListNode, VariableNode,
};
use crate::error::ErrorKind;
use crate::position::Span;
use crate::token::{Token, TokenData, TokenGroup, TokenKind, TokenList};
use crate::Text;

/// Classify a `{...}` pair: the body of a function literal, or a plain
/// scope.
pub(super) fn scopes_and_functions(r: &mut Reducer<'_>, token: Token) {
    if r.graph[token].kind != TokenKind::BracketPair || r.graph[token].text.as_str() != "{}" {
        return;
    }
    let left = r.graph[token].left();

    // func {...} — literal with no parameter list
    if let Some(func) = left.filter(|&l| r.graph[l].kind == TokenKind::Func) {
        let node = r
            .ast
            .add(NodeKind::FunctionObject(FunctionObjectNode::default()));
        finish_function(r, func, token, node);
        return;
    }

    // func (...) {...}
    if let Some(parens) = left.filter(|&l| {
        r.graph[l].kind == TokenKind::BracketPair && r.graph[l].text.as_str() == "()"
    }) {
        if let Some(func) = r.graph[parens]
            .left()
            .filter(|&f| r.graph[f].kind == TokenKind::Func)
        {
            let Some(params) = parameter_list(r, parens) else {
                return;
            };
            let node = r.ast.add(NodeKind::FunctionObject(FunctionObjectNode {
                params,
                body: Vec::new(),
            }));
            finish_function(r, func, token, node);
            return;
        }
    }

    // plain scope
    let node = r
        .ast
        .add(NodeKind::StatementList(StatementListNode::default()));
    let span = r.graph[token].span();
    let expr = new_token(r, span, TokenKind::Expression, node);
    r.graph.replace(token, expr);
    retag(r, token, TokenKind::StatementList, node, TokenGroup::StatementLists);
}

/// Collapse `[func, ..., {...}]` into an expression and keep the brace
/// token alive as the function body.
fn finish_function(r: &mut Reducer<'_>, first: Token, brace: Token, node: Node) {
    r.graph
        .collapse(first, brace, TokenKind::Expression, Some(node));
    retag(r, brace, TokenKind::FunctionBody, node, TokenGroup::FunctionObjects);
}

/// Read a comma-separated identifier list out of a paren pair's
/// children. `None` means a critical error was reported.
fn parameter_list(r: &mut Reducer<'_>, parens: Token) -> Option<Vec<Text>> {
    let mut params = Vec::new();
    let mut expect_name = true;
    let mut cursor = r.graph[parens].children.first;
    while let Some(token) = cursor {
        cursor = r.graph[token].right();
        let (kind, span, text) = {
            let data = &r.graph[token];
            (data.kind, data.span(), data.text.clone())
        };
        if expect_name {
            if kind == TokenKind::Identifier {
                if params.contains(&text) {
                    r.error(span, ErrorKind::DuplicateParameter(text));
                } else {
                    params.push(text);
                }
                expect_name = false;
            } else {
                r.critical(span, ErrorKind::InvalidFunctionArgument);
                return None;
            }
        } else if kind == TokenKind::Comma {
            expect_name = true;
        } else {
            r.critical(span, ErrorKind::ExpectedCommaBetweenArguments);
            return None;
        }
    }
    Some(params)
}

/// Turn `[IDENTIFIER, (...)]` into a call expression; the paren pair
/// survives as the argument holder.
pub(super) fn function_call_head(r: &mut Reducer<'_>, token: Token) {
    if r.graph[token].kind != TokenKind::Identifier {
        return;
    }
    let Some(parens) = r.graph[token].right().filter(|&p| {
        r.graph[p].kind == TokenKind::BracketPair && r.graph[p].text.as_str() == "()"
    }) else {
        return;
    };
    let name = r.graph[token].text.clone();
    let callee = r.ast.add(NodeKind::Variable(VariableNode { name }));
    let call = r.ast.add(NodeKind::FunctionCall(FunctionCallNode {
        callee,
        args: Vec::new(),
    }));
    r.graph
        .collapse(token, parens, TokenKind::Expression, Some(call));
    retag(r, parens, TokenKind::FcallArgs, call, TokenGroup::FunctionArguments);
}

/// Check the children of an argument holder against
/// `EXPRESSION (COMMA EXPRESSION)*` and attach the argument vector to
/// the call node.
pub(super) fn function_call_arguments(r: &mut Reducer<'_>, token: Token) {
    if r.graph[token].kind != TokenKind::FcallArgs {
        return;
    }
    let children = r.graph[token].children;
    if children.is_empty() {
        return;
    }
    let mut args = Vec::new();
    let mut expect_expression = true;
    let mut comma_span = None;
    let mut cursor = children.first;
    while let Some(child) = cursor {
        cursor = r.graph[child].right();
        let (kind, span, node) = {
            let data = &r.graph[child];
            (data.kind, data.span(), data.node)
        };
        if expect_expression {
            if kind == TokenKind::Expression {
                if let Some(node) = node {
                    args.push(node);
                }
                expect_expression = false;
            } else {
                r.critical(span, ErrorKind::ExpectedExpression);
                return;
            }
        } else if kind == TokenKind::Comma {
            comma_span = Some(span);
            expect_expression = true;
        } else {
            r.critical(span, ErrorKind::ExpectedCommaBetweenArguments);
            return;
        }
    }
    if expect_expression {
        if let Some(span) = comma_span {
            r.critical(span, ErrorKind::ExpectedExpressionAfterComma);
            return;
        }
    }
    if let Some(call) = r.graph[token].node {
        if let Some(call) = r.ast.get_mut(call).kind.as_function_call_mut() {
            call.args = args;
        }
    }
}

/// Turn a lone identifier into a variable reference, but only between
/// neighbors that a later rule can still consume.
pub(super) fn variable_reference(r: &mut Reducer<'_>, token: Token) {
    if r.graph[token].kind != TokenKind::Identifier {
        return;
    }
    let left_ok = r.graph[token].left().map_or(true, |left| {
        matches!(
            r.graph[left].kind,
            TokenKind::Operator
                | TokenKind::Expression
                | TokenKind::Comma
                | TokenKind::Semicolon
                | TokenKind::Var
                | TokenKind::Const
                | TokenKind::Return
        )
    });
    let right_ok = r.graph[token].right().map_or(true, |right| {
        matches!(
            r.graph[right].kind,
            TokenKind::Operator
                | TokenKind::Expression
                | TokenKind::Identifier
                | TokenKind::Comma
                | TokenKind::Semicolon
                | TokenKind::Var
                | TokenKind::Const
        )
    });
    if !left_ok || !right_ok {
        return;
    }
    let name = r.graph[token].text.clone();
    let node = r.ast.add(NodeKind::Variable(VariableNode { name }));
    r.graph
        .collapse(token, token, TokenKind::Expression, Some(node));
}

/// Fold `expr op expr` for the additive and multiplicative groups.
pub(super) fn binary_operator(r: &mut Reducer<'_>, token: Token) {
    if r.graph[token].kind != TokenKind::Operator {
        return;
    }
    let span = r.graph[token].span();
    let Some(op) = BinaryOp::from_operator(r.graph[token].text.as_str()) else {
        return;
    };
    let Some(left) = r.graph[token]
        .left()
        .filter(|&l| r.graph[l].kind == TokenKind::Expression)
    else {
        r.critical(span, ErrorKind::ExpectedLvalue);
        return;
    };
    let Some(right) = r.graph[token]
        .right()
        .filter(|&t| r.graph[t].kind == TokenKind::Expression)
    else {
        r.critical(span, ErrorKind::ExpectedExpression);
        return;
    };
    let (Some(lhs), Some(rhs)) = (r.graph[left].node, r.graph[right].node) else {
        return;
    };
    let node = r.ast.add(NodeKind::Binary(BinaryNode { op, lhs, rhs }));
    r.graph
        .collapse(left, right, TokenKind::Expression, Some(node));
}

/// Fold `lvalue = expr`. The group runs backward, which makes `=`
/// right-associative.
pub(super) fn assignment(r: &mut Reducer<'_>, token: Token) {
    if r.graph[token].kind != TokenKind::Operator {
        return;
    }
    let span = r.graph[token].span();
    let left = r.graph[token]
        .left()
        .filter(|&l| r.graph[l].kind == TokenKind::Expression);
    let assignable = left
        .and_then(|l| r.graph[l].node)
        .map_or(false, |node| r.ast[node].is_assignable_expression());
    let Some(left) = left.filter(|_| assignable) else {
        r.critical(span, ErrorKind::ExpectedLvalue);
        return;
    };
    let Some(right) = r.graph[token]
        .right()
        .filter(|&t| r.graph[t].kind == TokenKind::Expression)
    else {
        r.critical(span, ErrorKind::ExpectedExpression);
        return;
    };
    let (Some(lhs), Some(rhs)) = (r.graph[left].node, r.graph[right].node) else {
        return;
    };
    let node = r.ast.add(NodeKind::Assignment(AssignmentNode { lhs, rhs }));
    r.graph
        .collapse(left, right, TokenKind::Expression, Some(node));
}

pub(super) fn var_declaration(r: &mut Reducer<'_>, token: Token) {
    declaration(r, token, false);
}

pub(super) fn const_declaration(r: &mut Reducer<'_>, token: Token) {
    declaration(r, token, true);
}

/// Fold `var expr` / `const expr` into a declaration statement. The
/// expression must be an assignment to a variable, or (for `var`) a bare
/// variable reference.
fn declaration(r: &mut Reducer<'_>, token: Token, is_const: bool) {
    let expected = if is_const {
        TokenKind::Const
    } else {
        TokenKind::Var
    };
    if r.graph[token].kind != expected {
        return;
    }
    let span = r.graph[token].span();
    let Some(right) = r.graph[token]
        .right()
        .filter(|&t| r.graph[t].kind == TokenKind::Expression)
    else {
        r.critical(span, ErrorKind::ExpectedExpression);
        return;
    };
    let Some(value) = r.graph[right].node else {
        return;
    };

    enum Outcome {
        Decl(DeclarationNode),
        Error(ErrorKind),
    }
    let outcome = match &r.ast[value].kind {
        NodeKind::Assignment(assign) => match r.ast[assign.lhs].kind.as_variable() {
            Some(variable) => Outcome::Decl(DeclarationNode {
                name: variable.name.clone(),
                is_const,
                init: Some(assign.rhs),
            }),
            None => Outcome::Error(ErrorKind::ExpectedLvalue),
        },
        NodeKind::Variable(variable) => {
            if is_const {
                // a constant needs its value
                Outcome::Error(ErrorKind::ExpectedExpression)
            } else {
                Outcome::Decl(DeclarationNode {
                    name: variable.name.clone(),
                    is_const,
                    init: None,
                })
            }
        }
        _ => Outcome::Error(ErrorKind::ExpectedLvalue),
    };
    match outcome {
        Outcome::Decl(decl) => {
            let node = r.ast.add(NodeKind::Declaration(decl));
            r.graph
                .collapse(token, right, TokenKind::Statement, Some(node));
        }
        Outcome::Error(kind) => r.critical(span, kind),
    }
}

/// Fold `return expr` or a bare `return`.
pub(super) fn return_statement(r: &mut Reducer<'_>, token: Token) {
    if r.graph[token].kind != TokenKind::Return {
        return;
    }
    let value = r.graph[token]
        .right()
        .filter(|&t| r.graph[t].kind == TokenKind::Expression);
    match value {
        Some(expr) => {
            let node = r.ast.add(NodeKind::Return(ReturnNode {
                value: r.graph[expr].node,
            }));
            r.graph
                .collapse(token, expr, TokenKind::Expression, Some(node));
        }
        None => {
            let node = r.ast.add(NodeKind::Return(ReturnNode { value: None }));
            r.graph
                .collapse(token, token, TokenKind::Expression, Some(node));
        }
    }
}

/// Attach the statements of a `{...}` scope to its statement-list node.
pub(super) fn statement_list_body(r: &mut Reducer<'_>, token: Token) {
    if r.graph[token].kind != TokenKind::StatementList {
        return;
    }
    let children = r.graph[token].children;
    let statements = collect_statements(r, children);
    if let Some(node) = r.graph[token].node {
        if let Some(list) = r.ast.get_mut(node).kind.as_statement_list_mut() {
            list.statements = statements;
        }
    }
}

/// Attach the statements of a function body to its function node.
pub(super) fn function_body(r: &mut Reducer<'_>, token: Token) {
    if r.graph[token].kind != TokenKind::FunctionBody {
        return;
    }
    let children = r.graph[token].children;
    let statements = collect_statements(r, children);
    if let Some(node) = r.graph[token].node {
        if let Some(function) = r.ast.get_mut(node).kind.as_function_object_mut() {
            function.body = statements;
        }
    }
}

/// Gather the statements of a neighbors list.
///
/// Statement tokens contribute their node, expressions are wrapped,
/// semicolons separate; anything else is reported and skipped so the
/// walk can flag every offender.
pub(super) fn collect_statements(r: &mut Reducer<'_>, list: TokenList) -> Vec<Node> {
    let mut statements = Vec::new();
    let mut cursor = list.first;
    while let Some(token) = cursor {
        cursor = r.graph[token].right();
        let (kind, span, node, text) = {
            let data = &r.graph[token];
            (data.kind, data.span(), data.node, data.text.clone())
        };
        match kind {
            TokenKind::Statement => {
                if let Some(node) = node {
                    statements.push(node);
                }
            }
            TokenKind::Expression => {
                if let Some(node) = node {
                    statements.push(r.ast.add(NodeKind::StatementExpression(
                        StatementExpressionNode { expression: node },
                    )));
                }
            }
            TokenKind::Semicolon => {}
            _ => r.error(span, ErrorKind::NotAStatement(text)),
        }
    }
    statements
}

fn new_token(r: &mut Reducer<'_>, span: Span, kind: TokenKind, node: Node) -> Token {
    let mut data = TokenData::new(kind, span, Text::new());
    data.node = Some(node);
    r.graph.insert(data)
}

/// Give `token` a new kind and node and move it into `group`.
fn retag(r: &mut Reducer<'_>, token: Token, kind: TokenKind, node: Node, group: TokenGroup) {
    {
        let data = r.graph.get_mut(token);
        data.kind = kind;
        data.node = Some(node);
    }
    r.graph.remove_from_group(token);
    r.graph.append_to_group(group, token);
}
