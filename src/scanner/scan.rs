//! Incremental scanner splitting raw text into static and slot segments

use std::iter::FusedIterator;
use std::str::Chars;

use tracing::{trace, warn};

use crate::config::ScanConfig;

use super::position::Position;
use super::segment::{Segment, SlotSegment};

/// Characters withheld until the next character decides what they mean
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Held {
    Nothing,
    /// The escape character
    Escape,
    /// The escape character followed by `<`
    EscapedOpen,
    /// The escape character followed by `%`
    EscapedPercent,
    /// A `<` in static text that may start an opener
    Open(Position),
    /// A `%` in slot text that may start a closer
    Close,
}

impl Held {
    /// Emit the withheld characters as literal text
    fn flush_into(self, escape: char, out: &mut String) {
        match self {
            Held::Nothing => {}
            Held::Escape => out.push(escape),
            Held::EscapedOpen => {
                out.push(escape);
                out.push('<');
            }
            Held::EscapedPercent => {
                out.push(escape);
                out.push('%');
            }
            Held::Open(_) => out.push('<'),
            Held::Close => out.push('%'),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Static,
    /// Inside a slot opened at the given position
    Slot(Position),
    Done,
}

/// Iterator over the segments of a raw template
///
/// Segments are produced on demand. The scanner alternates between static
/// text and slots; after a malformed slot it yields the error segment and an
/// empty terminal static segment, then stops.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    chars: Chars<'a>,
    position: Position,
    config: ScanConfig,
    mode: Mode,
    trailing: Option<Segment>,
}

/// Start scanning `raw` with the given configuration
pub fn scan(raw: &str, config: ScanConfig) -> Scanner<'_> {
    Scanner {
        chars: raw.chars(),
        position: Position::start(),
        config,
        mode: Mode::Static,
        trailing: None,
    }
}

impl<'a> Scanner<'a> {
    /// Position of the next unconsumed character
    pub fn position(&self) -> Position {
        self.position
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        self.position = self.position.advance(c, self.config.tab_width());
        c
    }

    fn scan_static(&mut self) -> Segment {
        let start = self.position;
        let escape = self.config.escape_char();
        let mut text = String::new();
        let mut held = Held::Nothing;

        loop {
            let at = self.position;
            let Some(c) = self.bump() else {
                held.flush_into(escape, &mut text);
                self.mode = Mode::Done;
                return Segment::Static {
                    content: text,
                    start,
                };
            };

            held = match (held, c) {
                (Held::Nothing, c) if c == escape => Held::Escape,
                (Held::Nothing, '<') => Held::Open(at),
                (Held::Escape, c) if c == escape => {
                    text.push(escape);
                    Held::Nothing
                }
                (Held::Escape, '<') => Held::EscapedOpen,
                (Held::Escape, '%') => Held::EscapedPercent,
                (Held::EscapedOpen, '%') => {
                    text.push_str("<%");
                    Held::Nothing
                }
                (Held::EscapedPercent, '>') => {
                    text.push_str("%>");
                    Held::Nothing
                }
                (Held::Open(open), '%') => {
                    trace!(row = open.row, col = open.col, "slot opened");
                    self.mode = Mode::Slot(open);
                    return Segment::Static {
                        content: text,
                        start,
                    };
                }
                (held, c) => {
                    held.flush_into(escape, &mut text);
                    text.push(c);
                    Held::Nothing
                }
            };
        }
    }

    fn scan_slot(&mut self, open: Position) -> Segment {
        let escape = self.config.escape_char();
        let mut slot = String::new();
        let mut held = Held::Nothing;

        loop {
            let Some(c) = self.bump() else {
                held.flush_into(escape, &mut slot);
                let message = format!("incomplete slot: missing closing `%>` after {:?}", slot);
                warn!(row = open.row, col = open.col, "{}", message);
                self.mode = Mode::Done;
                self.trailing = Some(Segment::Static {
                    content: String::new(),
                    start: self.position,
                });
                return Segment::Error {
                    message,
                    start: open,
                };
            };

            held = match (held, c) {
                (Held::Nothing, c) if c == escape => Held::Escape,
                (Held::Nothing, '%') => Held::Close,
                (Held::Escape, c) if c == escape => {
                    slot.push(escape);
                    Held::Nothing
                }
                (Held::Escape, '<') => Held::EscapedOpen,
                (Held::Escape, '%') => Held::EscapedPercent,
                (Held::EscapedOpen, '%') => {
                    slot.push_str("<%");
                    Held::Nothing
                }
                (Held::EscapedPercent, '>') => {
                    slot.push_str("%>");
                    Held::Nothing
                }
                (Held::Close, '>') => {
                    trace!(row = open.row, col = open.col, "slot closed");
                    self.mode = Mode::Static;
                    return Segment::Slot(SlotSegment::new(slot.trim(), open));
                }
                (held, c) => {
                    held.flush_into(escape, &mut slot);
                    slot.push(c);
                    Held::Nothing
                }
            };
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        if let Some(segment) = self.trailing.take() {
            return Some(segment);
        }
        match self.mode {
            Mode::Static => Some(self.scan_static()),
            Mode::Slot(open) => Some(self.scan_slot(open)),
            Mode::Done => None,
        }
    }
}

impl FusedIterator for Scanner<'_> {}
