//! Configuration for scanning and compiling templates

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Deserialize;
use thiserror::Error;

use crate::error_handler::ErrorHandler;

/// Character that introduces escape sequences unless overridden
pub const DEFAULT_ESCAPE_CHAR: char = '\\';

/// Columns a tab character advances unless overridden
pub const DEFAULT_TAB_WIDTH: usize = 1;

/// Characters that make up the slot delimiters `<%` and `%>`
pub const DELIMITER_CHARS: [char; 3] = ['<', '%', '>'];

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse template configuration TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid escape character {0:?}: delimiter characters cannot be escapes")]
    InvalidEscapeChar(char),
}

/// Options that affect how raw template text is split into segments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    escape_char: char,
    tab_width: usize,
}

/// TOML structure for deserializing scan configuration
#[derive(Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct TomlScanConfig {
    escape_char: Option<char>,
    tab_width: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            escape_char: DEFAULT_ESCAPE_CHAR,
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

impl ScanConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    ///
    /// Recognized keys are `escape-char` and `tab-width`; missing keys keep
    /// their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlScanConfig = toml::from_str(content)?;
        let mut config = Self::default();
        if let Some(escape_char) = parsed.escape_char {
            config = config.with_escape_char(escape_char)?;
        }
        if let Some(tab_width) = parsed.tab_width {
            config = config.with_tab_width(tab_width);
        }
        Ok(config)
    }

    /// Character that suppresses delimiter recognition
    pub fn escape_char(&self) -> char {
        self.escape_char
    }

    /// Columns advanced by a tab character
    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    /// Set the escape character
    ///
    /// `<`, `%` and `>` are rejected: as escapes they would stop slots from
    /// ever opening or closing.
    pub fn with_escape_char(mut self, escape_char: char) -> Result<Self, ConfigError> {
        if DELIMITER_CHARS.contains(&escape_char) {
            return Err(ConfigError::InvalidEscapeChar(escape_char));
        }
        self.escape_char = escape_char;
        Ok(self)
    }

    /// Set the tab width used for column tracking
    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width;
        self
    }
}

/// Per-call options for compiling a template
#[derive(Clone, Default)]
pub struct Options {
    /// Scanner configuration
    pub scan: ScanConfig,

    /// Name used in diagnostics; generated when absent
    pub template_name: Option<String>,

    /// Handler invoked for malformed slots; `None` renders them literally
    pub err_handler: Option<ErrorHandler>,
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("scan", &self.scan)
            .field("template_name", &self.template_name)
            .field("err_handler", &self.err_handler.as_ref().map(|_| ".."))
            .finish()
    }
}

impl Options {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scanner configuration
    pub fn with_scan(mut self, scan: ScanConfig) -> Self {
        self.scan = scan;
        self
    }

    /// Set the escape character, rejecting delimiter characters
    pub fn with_escape_char(mut self, escape_char: char) -> Result<Self, ConfigError> {
        self.scan = self.scan.with_escape_char(escape_char)?;
        Ok(self)
    }

    /// Set the template name used in diagnostics
    pub fn with_template_name(mut self, name: impl Into<String>) -> Self {
        self.template_name = Some(name.into());
        self
    }

    /// Set the handler for malformed slots
    pub fn with_error_handler(mut self, handler: ErrorHandler) -> Self {
        self.err_handler = Some(handler);
        self
    }

    /// The configured template name, or a freshly generated one
    pub fn resolve_name(&self) -> String {
        self.template_name.clone().unwrap_or_else(generate_name)
    }
}

/// Generate a unique template name
pub fn generate_name() -> String {
    static NEXT: AtomicUsize = AtomicUsize::new(1);
    format!("template-{}", NEXT.fetch_add(1, Ordering::Relaxed))
}
