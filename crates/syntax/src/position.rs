//! Source positions and spans.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of columns a tab glyph is worth.
pub const TAB_WIDTH: u32 = 4;

/// A location in the source: 1-based row and column plus the 0-based
/// glyph offset from the start of the file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub row: u32,
    pub column: u32,
    pub offset: u32,
}

impl Position {
    /// The first position of a file.
    pub const START: Self = Self {
        row: 1,
        column: 1,
        offset: 0,
    };

    /// Advance past one glyph.
    ///
    /// A newline starts a new row, a tab is worth [`TAB_WIDTH`] columns,
    /// every other glyph is one column. The offset always moves by one.
    pub fn advance(&mut self, glyph: char) {
        match glyph {
            '\n' => {
                self.row += 1;
                self.column = 1;
            }
            '\t' => self.column += TAB_WIDTH,
            _ => self.column += 1,
        }
        self.offset += 1;
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.column)
    }
}

/// A half-open span: `end` names the position just past the last glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub begin: Position,
    pub end: Position,
}

impl Span {
    #[must_use]
    pub fn new(begin: Position, end: Position) -> Self {
        Self { begin, end }
    }
}
