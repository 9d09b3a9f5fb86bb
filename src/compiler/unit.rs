//! Render units: the compiled form of one segment

use std::fmt;

use crate::error::Result;
use crate::renderer::Context;

type UnitFn = dyn Fn(&Context) -> Result<String> + Send + Sync;

enum UnitKind {
    Constant(String),
    Dynamic(Box<UnitFn>),
}

/// Produces the output of one segment given a runtime context
pub struct RenderUnit {
    kind: UnitKind,
}

impl RenderUnit {
    /// A unit that always yields `text`
    pub fn constant(text: impl Into<String>) -> Self {
        Self {
            kind: UnitKind::Constant(text.into()),
        }
    }

    /// A unit computed from the context on every render
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Context) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            kind: UnitKind::Dynamic(Box::new(f)),
        }
    }

    /// The fixed output, if this unit never consults the context
    pub fn as_constant(&self) -> Option<&str> {
        match &self.kind {
            UnitKind::Constant(text) => Some(text),
            UnitKind::Dynamic(_) => None,
        }
    }

    /// Run the unit
    pub fn call(&self, ctx: &Context) -> Result<String> {
        match &self.kind {
            UnitKind::Constant(text) => Ok(text.clone()),
            UnitKind::Dynamic(f) => f(ctx),
        }
    }
}

impl fmt::Debug for RenderUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            UnitKind::Constant(text) => f.debug_tuple("Constant").field(text).finish(),
            UnitKind::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}
