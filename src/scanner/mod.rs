//! Lexical scanning of raw template text

pub mod position;
mod scan;
pub mod segment;

pub use position::Position;
pub use scan::{scan, Scanner};
pub use segment::{Segment, SlotSegment};
