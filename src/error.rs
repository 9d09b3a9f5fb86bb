//! Error types for scanning, compiling and rendering templates

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::scanner::Position;

/// A malformed slot, reported through an error handler
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{template}:{start}: {message}")]
pub struct ScanError {
    pub template: String,
    pub message: String,
    pub start: Position,
}

impl ScanError {
    pub fn new(template: impl Into<String>, message: impl Into<String>, start: Position) -> Self {
        Self {
            template: template.into(),
            message: message.into(),
            start,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str) -> String {
        let name = self.template.as_str();
        let span = self.start.offset()..self.start.offset() + 2;
        let mut buf = Vec::new();

        let written = Report::build(ReportKind::Error, name, span.start)
            .with_message(&self.message)
            .with_label(
                Label::new((name, span))
                    .with_message("slot opened here is never closed")
                    .with_color(Color::Red),
            )
            .finish()
            .write((name, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// Errors raised while turning slot text into render units
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// Slot text the reader cannot understand
    #[error("invalid slot at {start}: {message}")]
    Syntax { message: String, start: Position },

    /// Failure from a caller-supplied slot reader
    #[error("{0}")]
    Custom(String),
}

impl CompileError {
    pub fn syntax(message: impl Into<String>, start: Position) -> Self {
        Self::Syntax {
            message: message.into(),
            start,
        }
    }
}

/// Errors raised while rendering against a runtime context
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Name not provided by any context provider
    #[error("undefined name '{name}' at {start}")]
    Undefined { name: String, start: Position },

    /// Tried to look up a field or index of a scalar value
    #[error("cannot index into '{path}' at {start}")]
    NotIndexable { path: String, start: Position },

    /// Handler not provided by any context provider
    #[error("unknown handler '{name}' at {start}")]
    UnknownHandler { name: String, start: Position },

    /// A handler function reported a failure
    #[error("handler '{name}' failed: {message}")]
    Handler { name: String, message: String },

    /// Failure from a caller-supplied render unit
    #[error("{0}")]
    Custom(String),
}

/// Any failure in the scan, compile and render pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
