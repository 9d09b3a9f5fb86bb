//! Source positions for template diagnostics

use std::fmt;

/// A 1-based location in raw template text
///
/// `pos` counts characters, `row` counts lines and `col` counts columns
/// within the current line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
    pub pos: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl Position {
    /// Position of the first character of a template
    pub const fn start() -> Self {
        Self {
            row: 1,
            col: 1,
            pos: 1,
        }
    }

    /// Advance past one consumed character
    ///
    /// `None` leaves the position unchanged. Newlines start a new row,
    /// carriage returns only reset the column, and tabs advance the column by
    /// `tab_width`.
    pub fn advance(self, c: Option<char>, tab_width: usize) -> Self {
        match c {
            None => self,
            Some('\n') => Self {
                row: self.row + 1,
                col: 1,
                pos: self.pos + 1,
            },
            Some('\r') => Self {
                col: 1,
                pos: self.pos + 1,
                ..self
            },
            Some('\t') => Self {
                col: self.col + tab_width,
                pos: self.pos + 1,
                ..self
            },
            Some(_) => Self {
                col: self.col + 1,
                pos: self.pos + 1,
                ..self
            },
        }
    }

    /// Zero-based character offset, as used by source-annotated reports
    pub fn offset(&self) -> usize {
        self.pos - 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}
