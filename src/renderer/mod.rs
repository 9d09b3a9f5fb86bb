//! Rendering compiled units against a runtime context

pub mod context;

pub use context::{display_value, Context, Handler, Provider, Table, Value};

use tracing::debug;

use crate::compiler::RenderUnit;
use crate::error::Result;

/// Run each unit in order and concatenate the results
///
/// The first failing unit aborts rendering and its error is returned unchanged.
pub fn render(units: &[RenderUnit], ctx: &Context) -> Result<String> {
    let mut out = String::new();
    for unit in units {
        out.push_str(&unit.call(ctx)?);
    }
    debug!(units = units.len(), bytes = out.len(), "rendered template");
    Ok(out)
}
