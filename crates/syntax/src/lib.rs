//! Front end of the Goat language: scanner, bracket matcher and the
//! reduction parser that rewrites the token graph into an AST.

#![warn(clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::cast_possible_truncation,
    clippy::enum_glob_use,
    clippy::wildcard_imports,
    clippy::too_many_lines
)]

pub mod ast;
pub mod brackets;
pub mod error;
pub mod graph;
pub mod messages;
pub mod position;
pub mod reduce;
pub mod scanner;
pub mod token;

pub use ast::{Ast, Node};
pub use error::{CompilationError, ErrorKind};
pub use graph::TokenGraph;
pub use position::{Position, Span};
pub use token::{Token, TokenKind};

use scanner::Scanner;

/// Text storage for lexemes, names and messages.
pub type Text = smartstring::SmartString<smartstring::LazyCompact>;

/// The front-end entry point.
///
/// # Example Uses
///
/// ```
/// use goat_syntax::Parser;
///
/// let parse = Parser::new(r#"print("hello goat!");"#).parse();
/// assert!(parse.errors.is_empty());
/// ```
///
/// ```
/// use goat_syntax::Parser;
///
/// let parse = Parser::new("x = 1 + 2;").parse();
/// let root = parse.root.unwrap();
/// assert_eq!(parse.ast.render(root), "x = (1 + 2);");
/// ```
pub struct Parser<'src> {
    source: &'src str,
}

impl<'src> Parser<'src> {
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self { source }
    }

    /// Run the whole front end over the source.
    #[must_use]
    pub fn parse(self) -> Parse {
        let mut graph = TokenGraph::new();
        let mut ast = Ast::new();
        let mut scanner = Scanner::new(self.source);

        if let Err(error) = brackets::process_brackets(&mut scanner, &mut graph, &mut ast) {
            return Parse {
                ast,
                root: None,
                errors: vec![error],
            };
        }

        let mut errors = reduce::apply_reduction_rules(&mut graph, &mut ast);
        if errors.iter().any(|error| error.critical) {
            return Parse {
                ast,
                root: None,
                errors,
            };
        }

        let (root, fill_errors) = reduce::process_root(&mut graph, &mut ast);
        errors.extend(fill_errors);

        // the token graph is released here; the tree outlives it
        drop(graph);
        Parse {
            ast,
            root: Some(root),
            errors,
        }
    }
}

/// The result of parsing: the surviving node arena, the root node (absent
/// after a critical error) and every collected diagnostic in discovery
/// order.
#[derive(Debug)]
pub struct Parse {
    pub ast: Ast,
    pub root: Option<Node>,
    pub errors: Vec<CompilationError>,
}

impl Parse {
    /// Whether parsing produced a tree without any diagnostics.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty() && self.root.is_some()
    }

    /// Render the root back to source form, if there is one.
    #[must_use]
    pub fn render_root(&self) -> Option<String> {
        self.root.map(|root| self.ast.render(root))
    }
}
