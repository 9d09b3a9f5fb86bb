//! Built-in slot reader resolving names against the runtime context
//!
//! Slot text is either a dotted path such as `user.name` or `items.0`, or a
//! handler call such as `upper(user.name)` or `join(tags, " | ")`. Handlers
//! are resolved when rendering, so a context may supply its own.

mod expr;
pub mod lexer;

pub use expr::{parse, Expr, Key};

use crate::compiler::RenderUnit;
use crate::error::Result;
use crate::renderer::display_value;
use crate::scanner::SlotSegment;

/// Compile a slot into a unit that looks its value up when rendered
pub fn lookup(slot: &SlotSegment) -> Result<RenderUnit> {
    let expr = parse(&slot.content, slot.start)?;
    let start = slot.start;
    Ok(RenderUnit::new(move |ctx| {
        let value = expr.eval(ctx, start)?;
        Ok(display_value(&value))
    }))
}
