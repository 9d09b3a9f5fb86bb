//! Handlers deciding what a malformed slot turns into
//!
//! A scan error is first captured as a [`Segment::Error`](crate::Segment).
//! It only becomes a reported failure when the compiler hands it to the
//! configured handler.

use std::sync::Arc;

use crate::error::{Result, ScanError};

/// Turns a scan error into the text to emit, or fails compilation
pub type ErrorHandler = Arc<dyn Fn(&ScanError) -> Result<String> + Send + Sync>;

/// Report the error, tagged with template name and position
pub fn raise() -> ErrorHandler {
    Arc::new(|err| Err(err.clone().into()))
}

/// Emit the diagnostic message as literal output
pub fn literal() -> ErrorHandler {
    Arc::new(|err| Ok(err.message.clone()))
}

/// Build a handler from a closure
pub fn from_fn<F>(f: F) -> ErrorHandler
where
    F: Fn(&ScanError) -> Result<String> + Send + Sync + 'static,
{
    Arc::new(f)
}
