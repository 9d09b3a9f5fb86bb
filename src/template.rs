//! Templates at each stage of the pipeline

use tracing::debug;

use crate::compiler::{compile_with, RenderUnit, SlotReader};
use crate::config::{generate_name, Options, ScanConfig};
use crate::error::{Result, ScanError};
use crate::renderer::{render, Context};
use crate::scanner::{scan, Scanner, Segment};

/// Raw template text and the name used to report problems with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub raw: String,
}

impl Template {
    /// Create a template with a generated name
    pub fn new(raw: impl Into<String>) -> Self {
        Self::named(generate_name(), raw)
    }

    /// Create a template with the given name
    pub fn named(name: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw: raw.into(),
        }
    }

    /// Scan segments on demand
    pub fn scan(&self, config: &ScanConfig) -> Scanner<'_> {
        scan(&self.raw, *config)
    }

    /// Scan all segments
    pub fn parse(&self, config: &ScanConfig) -> ParsedTemplate {
        ParsedTemplate {
            name: self.name.clone(),
            segments: self.scan(config).collect(),
        }
    }

    /// Scan and compile, using `reader` for every slot
    ///
    /// `options.template_name`, when set, replaces the template's own name in
    /// diagnostics.
    pub fn compile<R: SlotReader>(&self, reader: R, options: &Options) -> Result<CompiledTemplate> {
        let name = options.template_name.as_deref().unwrap_or(&self.name);
        let units = compile_with(
            reader,
            self.scan(&options.scan),
            name,
            options.err_handler.as_ref(),
        )?;
        Ok(CompiledTemplate {
            name: name.to_string(),
            units,
        })
    }
}

/// A fully scanned template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTemplate {
    pub name: String,
    pub segments: Vec<Segment>,
}

impl ParsedTemplate {
    /// The malformed slot that stopped scanning, if any
    pub fn error(&self) -> Option<ScanError> {
        self.segments.iter().find_map(|segment| match segment {
            Segment::Error { message, start } => {
                Some(ScanError::new(self.name.clone(), message.clone(), *start))
            }
            _ => None,
        })
    }

    /// Compile the segments, using `reader` for every slot
    pub fn compile<R: SlotReader>(self, reader: R, options: &Options) -> Result<CompiledTemplate> {
        let units = compile_with(reader, self.segments, &self.name, options.err_handler.as_ref())?;
        Ok(CompiledTemplate {
            name: self.name,
            units,
        })
    }
}

/// Render units for every segment of a template, in order
#[derive(Debug)]
pub struct CompiledTemplate {
    pub name: String,
    pub units: Vec<RenderUnit>,
}

impl CompiledTemplate {
    /// Render against the given context
    pub fn render(&self, ctx: &Context) -> Result<String> {
        debug!(template = %self.name, "rendering");
        render(&self.units, ctx)
    }
}
