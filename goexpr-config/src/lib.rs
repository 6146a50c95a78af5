//! Configuration for the goexpr command line.
//!
//! The settings decide how an extraction is printed (plain text or JSON, with or without
//! its category) and how much source surrounds a reported syntax error. Every key has a
//! value in `defaults/goexpr.default.toml`, which is compiled in, so a `goexpr.toml` only
//! needs the keys it changes.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/goexpr.default.toml");

/// Settings for `goexpr extract`, `tokens` and `ast`.
#[derive(Debug, Clone, Deserialize)]
pub struct GoexprConfig {
    pub output: OutputConfig,
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub show_category: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Text,
    Json,
}

/// How syntax errors are reported.
#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosticsConfig {
    pub show_source_context: bool,
    pub context_lines: usize,
}

/// Builds a [`GoexprConfig`] from the compiled-in defaults plus what the user supplied.
///
/// Later layers win: an explicit `--config` file (or `goexpr.toml` in the working directory
/// when none is given) overrides the defaults, and flags such as `--format` override both
/// through [`Loader::set_override`].
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Only the compiled-in defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// A file the user named; it must exist.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// A file picked up by convention, such as `./goexpr.toml`; skipped when absent.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Set one dotted key, e.g. `output.format` from `--format json`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Merge the layers. Unknown output formats and mistyped values fail here.
    pub fn build(self) -> Result<GoexprConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The configuration used when no file or flag changes anything.
pub fn load_defaults() -> Result<GoexprConfig, ConfigError> {
    Loader::new().build()
}
