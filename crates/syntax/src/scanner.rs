//! The scanner.
//!
//! Works over a wide-character copy of the source. Comments and carriage
//! returns are blanked in place before scanning starts; newlines survive
//! the blanking, so every remaining glyph keeps its original row, column
//! and offset.

use crate::ast::{Ast, IntegerNode, NodeKind, StaticStringNode};
use crate::error::ErrorKind;
use crate::graph::TokenGraph;
use crate::position::{Position, Span};
use crate::token::{Token, TokenData, TokenGroup, TokenKind};
use crate::Text;

pub struct Scanner {
    source: Vec<char>,
    position: Position,
}

impl Scanner {
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut wide: Vec<char> = source.chars().collect();
        blank_comments(&mut wide);
        Self {
            source: wide,
            position: Position::START,
        }
    }

    /// The position the next glyph will be read at.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Scan the next token, filing it into its category group.
    ///
    /// Returns [`None`] at the end of the source. Lexical problems are
    /// returned in-band as [`TokenKind::Error`] tokens carrying their
    /// diagnostic.
    pub fn next_token(&mut self, graph: &mut TokenGraph, ast: &mut Ast) -> Option<Token> {
        while self.peek().map_or(false, char::is_whitespace) {
            self.bump();
        }
        let begin = self.position;
        let glyph = self.peek()?;

        let token = if is_identifier_start(glyph) {
            self.scan_identifier(graph, ast, begin)
        } else if glyph.is_ascii_digit() {
            self.scan_number(graph, ast, begin)
        } else if is_operator_glyph(glyph) {
            self.scan_operator(graph, begin)
        } else if glyph == '"' {
            self.scan_string(graph, ast, begin)
        } else {
            self.bump();
            match glyph {
                '(' | ')' | '[' | ']' | '{' | '}' => {
                    self.emit(graph, TokenKind::Bracket, begin, glyph.to_string().into(), None)
                }
                ',' => self.emit(graph, TokenKind::Comma, begin, ",".into(), None),
                ';' => self.emit(graph, TokenKind::Semicolon, begin, ";".into(), None),
                _ => self.emit_error(graph, begin, ErrorKind::UnknownSymbol(glyph)),
            }
        };
        Some(token)
    }

    fn scan_identifier(&mut self, graph: &mut TokenGraph, ast: &Ast, begin: Position) -> Token {
        while self.peek().map_or(false, is_identifier_continue) {
            self.bump();
        }
        let text = self.slice(begin);
        let (kind, group) = match text.as_str() {
            "var" => (TokenKind::Var, TokenGroup::VarKeywords),
            "const" => (TokenKind::Const, TokenGroup::ConstKeywords),
            "func" => (TokenKind::Func, TokenGroup::FunctionKeywords),
            "return" => (TokenKind::Return, TokenGroup::ReturnKeywords),
            "null" => {
                return self.emit(graph, TokenKind::Expression, begin, text, Some(ast.null()));
            }
            _ => (TokenKind::Identifier, TokenGroup::Identifiers),
        };
        let token = self.emit(graph, kind, begin, text, None);
        graph.append_to_group(group, token);
        token
    }

    fn scan_number(&mut self, graph: &mut TokenGraph, ast: &mut Ast, begin: Position) -> Token {
        // decimal only; overflow wraps silently
        let mut value: i64 = 0;
        while let Some(digit) = self.peek().and_then(|glyph| glyph.to_digit(10)) {
            self.bump();
            value = value.wrapping_mul(10).wrapping_add(i64::from(digit));
        }
        let node = ast.add(NodeKind::Integer(IntegerNode { value }));
        let text = self.slice(begin);
        self.emit(graph, TokenKind::Expression, begin, text, Some(node))
    }

    fn scan_operator(&mut self, graph: &mut TokenGraph, begin: Position) -> Token {
        while self.peek().map_or(false, is_operator_glyph) {
            self.bump();
        }
        let text = self.slice(begin);
        let group = match text.as_str() {
            "+" | "-" => Some(TokenGroup::AdditiveOperators),
            "*" | "/" | "%" => Some(TokenGroup::MultiplicativeOperators),
            _ if text.starts_with('=') => Some(TokenGroup::AssignmentOperators),
            _ => None,
        };
        let token = self.emit(graph, TokenKind::Operator, begin, text, None);
        if let Some(group) = group {
            graph.append_to_group(group, token);
        }
        token
    }

    fn scan_string(&mut self, graph: &mut TokenGraph, ast: &mut Ast, begin: Position) -> Token {
        self.bump(); // opening quote
        let mut value = String::new();
        loop {
            let Some(glyph) = self.bump() else {
                return self.emit_error(graph, begin, ErrorKind::UnclosedQuotationMark);
            };
            match glyph {
                '"' => break,
                '\\' => {
                    let Some(escape) = self.bump() else {
                        return self.emit_error(graph, begin, ErrorKind::UnclosedQuotationMark);
                    };
                    match escape {
                        'r' => value.push('\r'),
                        'n' => value.push('\n'),
                        'b' => value.push('\u{8}'),
                        't' => value.push('\t'),
                        '\\' | '\'' | '"' => value.push(escape),
                        other => {
                            return self.emit_error(
                                graph,
                                begin,
                                ErrorKind::InvalidEscapeSequence(other),
                            );
                        }
                    }
                }
                other => value.push(other),
            }
        }
        let node = ast.add(NodeKind::StaticString(StaticStringNode {
            value: value.into(),
        }));
        let text = self.slice(begin);
        self.emit(graph, TokenKind::Expression, begin, text, Some(node))
    }

    fn emit(
        &self,
        graph: &mut TokenGraph,
        kind: TokenKind,
        begin: Position,
        text: Text,
        node: Option<crate::ast::Node>,
    ) -> Token {
        let mut data = TokenData::new(kind, Span::new(begin, self.position), text);
        data.node = node;
        graph.insert(data)
    }

    fn emit_error(&self, graph: &mut TokenGraph, begin: Position, kind: ErrorKind) -> Token {
        tracing::trace!(%kind, "lexical error");
        let mut data = TokenData::new(
            TokenKind::Error,
            Span::new(begin, self.position),
            kind.to_string().into(),
        );
        data.diagnostic = Some(kind);
        graph.insert(data)
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.position.offset as usize).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let glyph = self.peek()?;
        self.position.advance(glyph);
        Some(glyph)
    }

    fn slice(&self, begin: Position) -> Text {
        self.source[begin.offset as usize..self.position.offset as usize]
            .iter()
            .collect::<String>()
            .into()
    }
}

/// Blank `//…` and `/*…*/` comments and every carriage return with
/// spaces, in place.
///
/// Newlines are kept (including inside block comments) so positions are
/// unaffected. String literals are skipped so their payload survives. An
/// unterminated block comment blanks to the end of the source without an
/// error.
fn blank_comments(source: &mut [char]) {
    for glyph in source.iter_mut() {
        if *glyph == '\r' {
            *glyph = ' ';
        }
    }

    let mut i = 0;
    while i < source.len() {
        match source[i] {
            '"' => {
                i += 1;
                while i < source.len() {
                    match source[i] {
                        '\\' => i += 2,
                        '"' => {
                            i += 1;
                            break;
                        }
                        _ => i += 1,
                    }
                }
            }
            '/' if source.get(i + 1) == Some(&'/') => {
                while i < source.len() && source[i] != '\n' {
                    source[i] = ' ';
                    i += 1;
                }
            }
            '/' if source.get(i + 1) == Some(&'*') => {
                source[i] = ' ';
                source[i + 1] = ' ';
                i += 2;
                while i < source.len() {
                    if source[i] == '*' && source.get(i + 1) == Some(&'/') {
                        source[i] = ' ';
                        source[i + 1] = ' ';
                        i += 2;
                        break;
                    }
                    if source[i] != '\n' {
                        source[i] = ' ';
                    }
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
}

/// The identifier alphabet, by explicit code-point ranges: Latin plus
/// the non-Latin scripts of the language manual.
pub(crate) fn is_identifier_start(glyph: char) -> bool {
    matches!(glyph,
        'A'..='Z' | 'a'..='z' | '_'
        | '\u{0370}'..='\u{03FF}'
        | '\u{0400}'..='\u{04FF}'
        | '\u{0530}'..='\u{058F}'
        | '\u{0590}'..='\u{05FF}'
        | '\u{0600}'..='\u{06FF}'
        | '\u{0800}'..='\u{083F}'
        | '\u{0900}'..='\u{097F}'
        | '\u{0980}'..='\u{09FF}'
        | '\u{0A00}'..='\u{0A7F}'
        | '\u{0A80}'..='\u{0AFF}'
        | '\u{0B00}'..='\u{0B7F}'
        | '\u{0F00}'..='\u{0FFF}'
        | '\u{1800}'..='\u{18AF}'
        | '\u{1D00}'..='\u{1D7F}'
        | '\u{1E00}'..='\u{1EFF}'
        | '\u{2C00}'..='\u{2C5F}'
        | '\u{A720}'..='\u{A7FF}'
        | '\u{A840}'..='\u{A87F}')
}

fn is_identifier_continue(glyph: char) -> bool {
    is_identifier_start(glyph) || glyph.is_ascii_digit()
}

fn is_operator_glyph(glyph: char) -> bool {
    matches!(
        glyph,
        '+' | '-' | '*' | '/' | '%' | '=' | '!' | '<' | '>' | '^' | '&' | '|' | '~'
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;

    fn scan(src: &str) -> (TokenGraph, Ast, Vec<Token>) {
        let mut graph = TokenGraph::new();
        let mut ast = Ast::new();
        let mut scanner = Scanner::new(src);
        let mut tokens = Vec::new();
        while let Some(token) = scanner.next_token(&mut graph, &mut ast) {
            tokens.push(token);
        }
        (graph, ast, tokens)
    }

    fn kinds(graph: &TokenGraph, tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|&t| graph[t].kind).collect()
    }

    #[test]
    fn empty_source_yields_nothing() {
        let (_, _, tokens) = scan("");
        assert!(tokens.is_empty());
        let (_, _, tokens) = scan("   \n\t  ");
        assert!(tokens.is_empty());
    }

    #[test]
    fn statement_tokens_in_order() {
        let (graph, _, tokens) = scan("x = 1;");
        assert_eq!(
            kinds(&graph, &tokens),
            vec![
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Expression,
                TokenKind::Semicolon,
            ]
        );
        assert_eq!(graph[tokens[0]].text.as_str(), "x");
        assert_eq!(graph[tokens[1]].text.as_str(), "=");
    }

    #[test]
    fn keywords_are_classified_and_grouped() {
        let (graph, _, tokens) = scan("var const func return returns");
        assert_eq!(
            kinds(&graph, &tokens),
            vec![
                TokenKind::Var,
                TokenKind::Const,
                TokenKind::Func,
                TokenKind::Return,
                TokenKind::Identifier,
            ]
        );
        assert_eq!(graph.group(TokenGroup::VarKeywords).count, 1);
        assert_eq!(graph.group(TokenGroup::ConstKeywords).count, 1);
        assert_eq!(graph.group(TokenGroup::FunctionKeywords).count, 1);
        assert_eq!(graph.group(TokenGroup::ReturnKeywords).count, 1);
        assert_eq!(graph.group(TokenGroup::Identifiers).count, 1);
    }

    #[test]
    fn null_produces_the_shared_node() {
        let (graph, ast, tokens) = scan("null null");
        assert_eq!(graph[tokens[0]].node, Some(ast.null()));
        assert_eq!(graph[tokens[0]].node, graph[tokens[1]].node);
    }

    #[test]
    fn operator_runs_are_maximal() {
        let (graph, _, tokens) = scan("a ==+ b");
        assert_eq!(tokens.len(), 3);
        assert_eq!(graph[tokens[1]].kind, TokenKind::Operator);
        assert_eq!(graph[tokens[1]].text.as_str(), "==+");
    }

    #[test]
    fn operators_are_filed_by_shape() {
        let (graph, _, _) = scan("+ - * / % = == <");
        assert_eq!(graph.group(TokenGroup::AdditiveOperators).count, 2);
        assert_eq!(graph.group(TokenGroup::MultiplicativeOperators).count, 3);
        assert_eq!(graph.group(TokenGroup::AssignmentOperators).count, 2);
    }

    #[test]
    fn non_latin_identifiers_are_accepted() {
        let (graph, _, tokens) = scan("привет αβγ1 שלום");
        assert_eq!(
            kinds(&graph, &tokens),
            vec![
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier,
            ]
        );
        assert_eq!(graph[tokens[1]].text.as_str(), "αβγ1");
    }

    #[test]
    fn digits_do_not_start_identifiers() {
        let (graph, _, tokens) = scan("1x");
        assert_eq!(
            kinds(&graph, &tokens),
            vec![TokenKind::Expression, TokenKind::Identifier]
        );
    }

    #[test]
    fn integer_values_wrap_silently() {
        let (graph, ast, tokens) = scan("9223372036854775808");
        let node = graph[tokens[0]].node.unwrap();
        match &ast[node].kind {
            NodeKind::Integer(n) => assert_eq!(n.value, i64::MIN),
            other => panic!("expected integer, got {other:?}"),
        }
    }

    #[test]
    fn string_escapes_are_decoded() {
        let (graph, ast, tokens) = scan(r#""a\n\t\"b\"\\""#);
        let node = graph[tokens[0]].node.unwrap();
        match &ast[node].kind {
            NodeKind::StaticString(n) => assert_eq!(n.value.as_str(), "a\n\t\"b\"\\"),
            other => panic!("expected string, got {other:?}"),
        }
    }

    #[test]
    fn invalid_escape_becomes_an_error_token() {
        let (graph, _, tokens) = scan(r#""bad\q""#);
        assert_eq!(graph[tokens[0]].kind, TokenKind::Error);
        assert_eq!(
            graph[tokens[0]].diagnostic,
            Some(ErrorKind::InvalidEscapeSequence('q'))
        );
        assert_eq!(
            graph[tokens[0]].text.as_str(),
            "invalid escape sequence '\\q'"
        );
        // span runs from the opening quote up to the bad glyph
        assert_eq!(graph[tokens[0]].begin.offset, 0);
        assert_eq!(graph[tokens[0]].end.offset, 6);
    }

    #[test]
    fn unterminated_string_is_reported() {
        let (graph, _, tokens) = scan("\"abc");
        assert_eq!(graph[tokens[0]].kind, TokenKind::Error);
        assert_eq!(
            graph[tokens[0]].diagnostic,
            Some(ErrorKind::UnclosedQuotationMark)
        );
    }

    #[test]
    fn unknown_symbol_is_reported() {
        let (graph, _, tokens) = scan("@");
        assert_eq!(graph[tokens[0]].kind, TokenKind::Error);
        assert_eq!(graph[tokens[0]].diagnostic, Some(ErrorKind::UnknownSymbol('@')));
    }

    #[test]
    fn comments_blank_to_spaces_and_keep_positions() {
        let (graph, _, tokens) = scan("/* c */ y // tail\nz");
        assert_eq!(tokens.len(), 2);
        assert_eq!(graph[tokens[0]].text.as_str(), "y");
        assert_eq!(graph[tokens[0]].begin.column, 9);
        assert_eq!(graph[tokens[1]].text.as_str(), "z");
        assert_eq!(graph[tokens[1]].begin.row, 2);
    }

    #[test]
    fn block_comments_may_span_rows() {
        let (graph, _, tokens) = scan("/* a\nb */ x");
        assert_eq!(tokens.len(), 1);
        assert_eq!(graph[tokens[0]].begin.row, 2);
        assert_eq!(graph[tokens[0]].begin.column, 6);
    }

    #[test]
    fn unterminated_block_comment_blanks_to_eof() {
        let (_, _, tokens) = scan("x /* rest");
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn comment_markers_inside_strings_survive() {
        let (graph, ast, tokens) = scan(r#"url = "http://example.com";"#);
        assert_eq!(tokens.len(), 4);
        let node = graph[tokens[2]].node.unwrap();
        match &ast[node].kind {
            NodeKind::StaticString(n) => assert_eq!(n.value.as_str(), "http://example.com"),
            other => panic!("expected string, got {other:?}"),
        }
    }

    #[test]
    fn carriage_returns_are_blanked() {
        let (graph, _, tokens) = scan("x\r\ny");
        assert_eq!(tokens.len(), 2);
        assert_eq!(graph[tokens[1]].begin.row, 2);
        assert_eq!(graph[tokens[1]].begin.column, 1);
    }

    #[test]
    fn tabs_advance_four_columns() {
        let (graph, _, tokens) = scan("\tx");
        assert_eq!(graph[tokens[0]].begin.column, 5);
        assert_eq!(graph[tokens[0]].begin.offset, 1);
    }

    #[test]
    fn brackets_commas_and_semicolons_are_single_glyphs() {
        let (graph, _, tokens) = scan("([{}]),;");
        assert_eq!(
            kinds(&graph, &tokens),
            vec![
                TokenKind::Bracket,
                TokenKind::Bracket,
                TokenKind::Bracket,
                TokenKind::Bracket,
                TokenKind::Bracket,
                TokenKind::Bracket,
                TokenKind::Comma,
                TokenKind::Semicolon,
            ]
        );
        assert_eq!(graph[tokens[2]].text.as_str(), "{");
    }
}
