//! Segments produced by scanning raw template text

use super::position::Position;

/// Text found between an opening `<%` and a closing `%>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSegment {
    /// Slot text with surrounding whitespace trimmed
    pub content: String,
    /// Position of the opening delimiter
    pub start: Position,
}

impl SlotSegment {
    pub fn new(content: impl Into<String>, start: Position) -> Self {
        Self {
            content: content.into(),
            start,
        }
    }
}

/// One piece of a scanned template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, with escape sequences already resolved
    Static { content: String, start: Position },
    /// A dynamic slot
    Slot(SlotSegment),
    /// A malformed slot; always the last slot-related segment of a template
    Error { message: String, start: Position },
}

impl Segment {
    /// The segment's text: literal content, slot content, or diagnostic
    pub fn content(&self) -> &str {
        match self {
            Segment::Static { content, .. } => content,
            Segment::Slot(slot) => &slot.content,
            Segment::Error { message, .. } => message,
        }
    }

    /// Where the segment begins in the raw template
    pub fn start(&self) -> Position {
        match self {
            Segment::Static { start, .. } | Segment::Error { start, .. } => *start,
            Segment::Slot(slot) => slot.start,
        }
    }

    pub fn is_static(&self) -> bool {
        matches!(self, Segment::Static { .. })
    }

    pub fn is_slot(&self) -> bool {
        matches!(self, Segment::Slot(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Segment::Error { .. })
    }
}
