//! Compilation of scanned segments into render units

mod unit;

pub use unit::RenderUnit;

use tracing::debug;

use crate::error::{Result, ScanError};
use crate::error_handler::ErrorHandler;
use crate::scanner::{Segment, SlotSegment};

/// Turns the text of a slot into a render unit
///
/// Implemented for closures taking a `&SlotSegment`, so callers can pass
/// either a reader type or a plain function.
pub trait SlotReader {
    fn read(&mut self, slot: &SlotSegment) -> Result<RenderUnit>;
}

impl<F> SlotReader for F
where
    F: FnMut(&SlotSegment) -> Result<RenderUnit>,
{
    fn read(&mut self, slot: &SlotSegment) -> Result<RenderUnit> {
        self(slot)
    }
}

/// Compile segments, emitting malformed slots as literal diagnostics
pub fn compile<R, I>(reader: R, segments: I) -> Result<Vec<RenderUnit>>
where
    R: SlotReader,
    I: IntoIterator<Item = Segment>,
{
    compile_with(reader, segments, "", None)
}

/// Compile segments, routing malformed slots through `err_handler`
///
/// The whole segment sequence is consumed before returning, so reader and
/// handler failures surface here rather than during rendering. Reader and
/// handler errors are returned unchanged.
pub fn compile_with<R, I>(
    mut reader: R,
    segments: I,
    template_name: &str,
    err_handler: Option<&ErrorHandler>,
) -> Result<Vec<RenderUnit>>
where
    R: SlotReader,
    I: IntoIterator<Item = Segment>,
{
    let mut units = Vec::new();
    let mut segment_count = 0;
    for segment in segments {
        segment_count += 1;
        let unit = match segment {
            Segment::Static { content, .. } => RenderUnit::constant(content),
            Segment::Slot(slot) => reader.read(&slot)?,
            Segment::Error { message, start } => match err_handler {
                None => RenderUnit::constant(message),
                Some(handler) => {
                    let err = ScanError::new(template_name, message, start);
                    RenderUnit::constant(handler(&err)?)
                }
            },
        };
        units.push(unit);
    }
    debug!(
        template = template_name,
        segments = segment_count,
        units = units.len(),
        "compiled template"
    );
    Ok(units)
}
