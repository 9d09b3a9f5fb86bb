//! Slotted - a small templating engine built around `<% ... %>` slots
//!
//! Raw template text is scanned into alternating static and slot segments,
//! compiled into render units by a slot reader, and rendered against a
//! runtime context.
//!
//! # Example
//!
//! ```rust
//! use slotted::{render_str, Context};
//!
//! let ctx = Context::new().with_value("num", 45);
//! assert_eq!(render_str("foo <% num %> bar", &ctx).unwrap(), "foo 45 bar");
//! ```

pub mod compiler;
pub mod config;
pub mod error;
pub mod error_handler;
pub mod reader;
pub mod renderer;
pub mod scanner;
pub mod template;

pub use compiler::{compile, compile_with, RenderUnit, SlotReader};
pub use config::{ConfigError, Options, ScanConfig, DEFAULT_ESCAPE_CHAR, DEFAULT_TAB_WIDTH};
pub use error::{CompileError, Error, RenderError, Result, ScanError};
pub use error_handler::ErrorHandler;
pub use renderer::{render, Context, Provider, Value};
pub use scanner::{scan, Position, Scanner, Segment, SlotSegment};
pub use template::{CompiledTemplate, ParsedTemplate, Template};

/// Compile source text with the built-in lookup reader
///
/// # Example
///
/// ```rust
/// use slotted::{compile_str, error_handler, Context, Error, Options};
///
/// let options = Options::new()
///     .with_template_name("greeting")
///     .with_error_handler(error_handler::raise());
///
/// let err = compile_str("hello <% name", &options).unwrap_err();
/// assert!(matches!(err, Error::Scan(_)));
/// assert!(err.to_string().starts_with("greeting:1:7: incomplete slot"));
///
/// let compiled = compile_str("hello <% upper(name) %>", &options).unwrap();
/// let ctx = Context::new().with_value("name", "ada");
/// assert_eq!(compiled.render(&ctx).unwrap(), "hello ADA");
/// ```
pub fn compile_str(source: &str, options: &Options) -> Result<CompiledTemplate> {
    let template = Template::named(options.resolve_name(), source);
    template.compile(reader::lookup, options)
}

/// Compile and render source text with default options
pub fn render_str(source: &str, ctx: &Context) -> Result<String> {
    compile_str(source, &Options::default())?.render(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_plain_text() {
        assert_eq!(render_str("foo bar", &Context::new()).unwrap(), "foo bar");
    }

    #[test]
    fn test_render_slot() {
        let ctx = Context::new().with_value("num", 45);
        assert_eq!(render_str("foo <% num %> bar", &ctx).unwrap(), "foo 45 bar");
    }

    #[test]
    fn test_render_escaped_escape() {
        assert_eq!(render_str(r"a \\ b", &Context::new()).unwrap(), r"a \ b");
    }

    #[test]
    fn test_undefined_name_is_render_error() {
        let err = render_str("<% missing %>", &Context::new()).unwrap_err();
        assert!(matches!(err, Error::Render(RenderError::Undefined { .. })));
    }

    #[test]
    fn test_bad_slot_is_compile_error() {
        let err = render_str("<% a b %>", &Context::new()).unwrap_err();
        assert!(matches!(err, Error::Compile(_)));
    }
}
