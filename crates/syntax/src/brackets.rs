//! Bracket matching.
//!
//! Drives the scanner and folds every balanced `(...)`, `[...]`, `{...}`
//! run into a single [`TokenKind::BracketPair`] token whose `children`
//! list holds the inner tokens. Recursion depth equals source nesting
//! depth.

use crate::ast::Ast;
use crate::error::{CompilationError, ErrorKind};
use crate::graph::TokenGraph;
use crate::position::{Position, Span};
use crate::scanner::Scanner;
use crate::token::{Place, Token, TokenData, TokenGroup, TokenKind};

/// Drive `scanner` to completion, building the root neighbors list of
/// `graph`.
///
/// Any lexical error token, bracket mismatch or overrun is critical and
/// stops the front end immediately.
pub fn process_brackets(
    scanner: &mut Scanner,
    graph: &mut TokenGraph,
    ast: &mut Ast,
) -> Result<(), CompilationError> {
    fill_level(scanner, graph, ast, Place::Root, None).map(|_| ())
}

struct OpenBracket {
    glyph: char,
    begin: Position,
}

/// Consume tokens into the list at `place` until the level closes.
///
/// Returns the position just past the closing bracket, or `None` when
/// the root level ran out of input.
fn fill_level(
    scanner: &mut Scanner,
    graph: &mut TokenGraph,
    ast: &mut Ast,
    place: Place,
    open: Option<&OpenBracket>,
) -> Result<Option<Position>, CompilationError> {
    loop {
        let Some(token) = scanner.next_token(graph, ast) else {
            if let Some(open) = open {
                // span runs to the last token inside the level
                let end = graph
                    .list(place)
                    .last
                    .map_or(scanner.position(), |last| graph[last].end);
                return Err(CompilationError::critical(
                    Span::new(open.begin, end),
                    ErrorKind::UnclosedOpeningBracket(open.glyph),
                ));
            }
            return Ok(None);
        };

        let (kind, span, text_glyph) = {
            let data = &graph[token];
            (data.kind, data.span(), data.text.chars().next())
        };

        match kind {
            TokenKind::Error => {
                let kind = graph[token]
                    .diagnostic
                    .clone()
                    .unwrap_or(ErrorKind::UnclosedQuotationMark);
                return Err(CompilationError::critical(span, kind));
            }
            TokenKind::Bracket => {
                let glyph = text_glyph.unwrap_or_default();
                if let Some(closer) = matching_closer(glyph) {
                    let pair = open_pair(graph, glyph, closer, span.begin);
                    let inner = OpenBracket {
                        glyph,
                        begin: span.begin,
                    };
                    let end = fill_level(scanner, graph, ast, Place::ChildrenOf(pair), Some(&inner))?
                        .unwrap_or(span.end);
                    graph.get_mut(pair).end = end;
                    graph.append_to_list(place, pair);
                    if glyph == '{' {
                        graph.append_to_group(TokenGroup::BracePairs, pair);
                    }
                } else {
                    let Some(open) = open else {
                        return Err(CompilationError::critical(
                            span,
                            ErrorKind::MissingOpeningBracket(glyph),
                        ));
                    };
                    if matching_closer(open.glyph) != Some(glyph) {
                        return Err(CompilationError::critical(
                            span,
                            ErrorKind::BracketsDoNotMatch {
                                opening: open.glyph,
                                closing: glyph,
                            },
                        ));
                    }
                    return Ok(Some(span.end));
                }
            }
            _ => graph.append_to_list(place, token),
        }
    }
}

fn open_pair(graph: &mut TokenGraph, opening: char, closing: char, begin: Position) -> Token {
    let mut text = crate::Text::new();
    text.push(opening);
    text.push(closing);
    graph.insert(TokenData::new(
        TokenKind::BracketPair,
        Span::new(begin, begin),
        text,
    ))
}

fn matching_closer(glyph: char) -> Option<char> {
    match glyph {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}
