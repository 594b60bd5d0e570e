//! The abstract syntax tree.
//!
//! Nodes live in one keyed arena that outlives the token graph and is
//! released as a whole once the caller is done with the tree.

use crate::Text;
use enum_as_inner::EnumAsInner;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use std::ops;

slotmap::new_key_type! {
    /// Key of a node in the [`Ast`] arena.
    pub struct Node;
}

/// Node storage.
///
/// The `null` literal is a shared singleton created together with the
/// arena, so every `null` in the source points at the same node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ast {
    nodes: SlotMap<Node, NodeData>,
    null: Node,
}

impl Default for Ast {
    fn default() -> Self {
        Self::new()
    }
}

impl Ast {
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let null = nodes.insert(NodeData {
            kind: NodeKind::Null,
        });
        Self { nodes, null }
    }

    /// The shared `null` literal node.
    #[must_use]
    pub fn null(&self) -> Node {
        self.null
    }

    pub fn add(&mut self, kind: NodeKind) -> Node {
        self.nodes.insert(NodeData { kind })
    }

    #[must_use]
    pub fn get(&self, node: Node) -> Option<&NodeData> {
        self.nodes.get(node)
    }

    pub(crate) fn get_mut(&mut self, node: Node) -> &mut NodeData {
        self.nodes.get_mut(node).unwrap()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl ops::Index<Node> for Ast {
    type Output = NodeData;

    fn index(&self, index: Node) -> &Self::Output {
        self.nodes.get(index).unwrap()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeData {
    pub kind: NodeKind,
}

impl NodeData {
    /// Whether an assignment may target this node.
    #[must_use]
    pub fn is_assignable_expression(&self) -> bool {
        matches!(self.kind, NodeKind::Variable(_))
    }

    /// Number of child nodes.
    #[must_use]
    pub fn arity(&self) -> usize {
        match &self.kind {
            NodeKind::Root(n) => n.statements.len(),
            NodeKind::StatementList(n) => n.statements.len(),
            NodeKind::FunctionObject(n) => n.body.len(),
            NodeKind::FunctionCall(n) => 1 + n.args.len(),
            NodeKind::Variable(_)
            | NodeKind::StaticString(_)
            | NodeKind::Integer(_)
            | NodeKind::Null => 0,
            NodeKind::Binary(_) | NodeKind::Assignment(_) => 2,
            NodeKind::Return(n) => usize::from(n.value.is_some()),
            NodeKind::StatementExpression(_) => 1,
            NodeKind::Declaration(n) => usize::from(n.init.is_some()),
        }
    }

    /// Child node by index, `None` past the arity.
    #[must_use]
    pub fn child(&self, index: usize) -> Option<Node> {
        match &self.kind {
            NodeKind::Root(n) => n.statements.get(index).copied(),
            NodeKind::StatementList(n) => n.statements.get(index).copied(),
            NodeKind::FunctionObject(n) => n.body.get(index).copied(),
            NodeKind::FunctionCall(n) => match index {
                0 => Some(n.callee),
                _ => n.args.get(index - 1).copied(),
            },
            NodeKind::Variable(_)
            | NodeKind::StaticString(_)
            | NodeKind::Integer(_)
            | NodeKind::Null => None,
            NodeKind::Binary(n) => [n.lhs, n.rhs].get(index).copied(),
            NodeKind::Assignment(n) => [n.lhs, n.rhs].get(index).copied(),
            NodeKind::Return(n) => match index {
                0 => n.value,
                _ => None,
            },
            NodeKind::StatementExpression(n) => match index {
                0 => Some(n.expression),
                _ => None,
            },
            NodeKind::Declaration(n) => match index {
                0 => n.init,
                _ => None,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, EnumAsInner)]
pub enum NodeKind {
    Root(RootNode),
    StatementList(StatementListNode),
    FunctionObject(FunctionObjectNode),
    FunctionCall(FunctionCallNode),
    Variable(VariableNode),
    StaticString(StaticStringNode),
    Integer(IntegerNode),
    Null,
    Binary(BinaryNode),
    Assignment(AssignmentNode),
    Return(ReturnNode),
    StatementExpression(StatementExpressionNode),
    Declaration(DeclarationNode),
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RootNode {
    pub statements: Vec<Node>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StatementListNode {
    pub statements: Vec<Node>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct FunctionObjectNode {
    pub params: Vec<Text>,
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCallNode {
    pub callee: Node,
    pub args: Vec<Node>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct VariableNode {
    pub name: Text,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StaticStringNode {
    pub value: Text,
}

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
pub struct IntegerNode {
    pub value: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BinaryNode {
    pub op: BinaryOp,
    pub lhs: Node,
    pub rhs: Node,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AssignmentNode {
    pub lhs: Node,
    pub rhs: Node,
}

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
pub struct ReturnNode {
    pub value: Option<Node>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatementExpressionNode {
    pub expression: Node,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct DeclarationNode {
    pub name: Text,
    pub is_const: bool,
    pub init: Option<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    #[must_use]
    pub fn glyph(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
            Self::Mod => '%',
        }
    }

    pub(crate) fn from_operator(text: &str) -> Option<Self> {
        match text {
            "+" => Some(Self::Add),
            "-" => Some(Self::Sub),
            "*" => Some(Self::Mul),
            "/" => Some(Self::Div),
            "%" => Some(Self::Mod),
            _ => None,
        }
    }
}

impl Ast {
    /// Render a subtree back into source form.
    ///
    /// Binary operations are always parenthesized, so the output spells
    /// out the shape of the tree; tests and `--print-ast` rely on it.
    #[must_use]
    pub fn render(&self, node: Node) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    fn write_node(&self, node: Node, out: &mut String) {
        match &self[node].kind {
            NodeKind::Root(n) => {
                for (i, statement) in n.statements.iter().enumerate() {
                    if i > 0 {
                        out.push('\n');
                    }
                    self.write_node(*statement, out);
                }
            }
            NodeKind::StatementList(n) => self.write_block(&n.statements, out),
            NodeKind::FunctionObject(n) => {
                out.push_str("func(");
                for (i, param) in n.params.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(param);
                }
                out.push_str(") ");
                self.write_block(&n.body, out);
            }
            NodeKind::FunctionCall(n) => {
                self.write_node(n.callee, out);
                out.push('(');
                for (i, arg) in n.args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_node(*arg, out);
                }
                out.push(')');
            }
            NodeKind::Variable(n) => out.push_str(&n.name),
            NodeKind::StaticString(n) => write_quoted(&n.value, out),
            NodeKind::Integer(n) => out.push_str(&n.value.to_string()),
            NodeKind::Null => out.push_str("null"),
            NodeKind::Binary(n) => {
                out.push('(');
                self.write_node(n.lhs, out);
                out.push(' ');
                out.push(n.op.glyph());
                out.push(' ');
                self.write_node(n.rhs, out);
                out.push(')');
            }
            NodeKind::Assignment(n) => {
                self.write_node(n.lhs, out);
                out.push_str(" = ");
                self.write_node(n.rhs, out);
            }
            NodeKind::Return(n) => {
                out.push_str("return");
                if let Some(value) = n.value {
                    out.push(' ');
                    self.write_node(value, out);
                }
            }
            NodeKind::StatementExpression(n) => {
                self.write_node(n.expression, out);
                out.push(';');
            }
            NodeKind::Declaration(n) => {
                out.push_str(if n.is_const { "const " } else { "var " });
                out.push_str(&n.name);
                if let Some(init) = n.init {
                    out.push_str(" = ");
                    self.write_node(init, out);
                }
                out.push(';');
            }
        }
    }

    fn write_block(&self, statements: &[Node], out: &mut String) {
        if statements.is_empty() {
            out.push_str("{ }");
            return;
        }
        out.push_str("{ ");
        for (i, statement) in statements.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            self.write_node(*statement, out);
        }
        out.push_str(" }");
    }
}

fn write_quoted(value: &str, out: &mut String) {
    out.push('"');
    for glyph in value.chars() {
        match glyph {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            _ => out.push(glyph),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_a_shared_singleton() {
        let ast = Ast::new();
        assert_eq!(ast.null(), ast.null());
        assert!(matches!(ast[ast.null()].kind, NodeKind::Null));
    }

    #[test]
    fn only_variables_are_assignable() {
        let mut ast = Ast::new();
        let var = ast.add(NodeKind::Variable(VariableNode { name: "x".into() }));
        let int = ast.add(NodeKind::Integer(IntegerNode { value: 1 }));
        assert!(ast[var].is_assignable_expression());
        assert!(!ast[int].is_assignable_expression());
        assert!(!ast[ast.null()].is_assignable_expression());
    }

    #[test]
    fn arity_and_children_agree() {
        let mut ast = Ast::new();
        let lhs = ast.add(NodeKind::Variable(VariableNode { name: "x".into() }));
        let rhs = ast.add(NodeKind::Integer(IntegerNode { value: 2 }));
        let sum = ast.add(NodeKind::Binary(BinaryNode {
            op: BinaryOp::Add,
            lhs,
            rhs,
        }));
        assert_eq!(ast[sum].arity(), 2);
        assert_eq!(ast[sum].child(0), Some(lhs));
        assert_eq!(ast[sum].child(1), Some(rhs));
        assert_eq!(ast[sum].child(2), None);
        assert_eq!(ast[lhs].arity(), 0);
        assert_eq!(ast[lhs].child(0), None);
    }

    #[test]
    fn call_children_start_with_the_callee() {
        let mut ast = Ast::new();
        let callee = ast.add(NodeKind::Variable(VariableNode { name: "f".into() }));
        let arg = ast.add(NodeKind::Integer(IntegerNode { value: 1 }));
        let call = ast.add(NodeKind::FunctionCall(FunctionCallNode {
            callee,
            args: vec![arg],
        }));
        assert_eq!(ast[call].arity(), 2);
        assert_eq!(ast[call].child(0), Some(callee));
        assert_eq!(ast[call].child(1), Some(arg));
    }

    #[test]
    fn render_spells_out_the_tree_shape() {
        let mut ast = Ast::new();
        let x = ast.add(NodeKind::Variable(VariableNode { name: "x".into() }));
        let one = ast.add(NodeKind::Integer(IntegerNode { value: 1 }));
        let two = ast.add(NodeKind::Integer(IntegerNode { value: 2 }));
        let product = ast.add(NodeKind::Binary(BinaryNode {
            op: BinaryOp::Mul,
            lhs: one,
            rhs: two,
        }));
        let assign = ast.add(NodeKind::Assignment(AssignmentNode { lhs: x, rhs: product }));
        let statement = ast.add(NodeKind::StatementExpression(StatementExpressionNode {
            expression: assign,
        }));
        let root = ast.add(NodeKind::Root(RootNode {
            statements: vec![statement],
        }));
        assert_eq!(ast.render(root), "x = (1 * 2);");
    }

    #[test]
    fn render_escapes_string_payloads() {
        let mut ast = Ast::new();
        let node = ast.add(NodeKind::StaticString(StaticStringNode {
            value: "a\"b\\c\nd".into(),
        }));
        assert_eq!(ast.render(node), "\"a\\\"b\\\\c\\nd\"");
    }
}
