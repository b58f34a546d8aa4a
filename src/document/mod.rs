//! Document Layer
//!
//! The parsed API description handed to the engine, the read-only
//! [`Context`] checks run against, and source-location lookup.

pub mod context;
pub mod location;
pub mod pointer;

use std::path::{Path, PathBuf};

use serde_json::Value;

pub use context::{Context, IGNORE_EXTENSION, WILDCARD};
pub use location::{Location, SourceMap};

use crate::error::LintError;

/// UTF-8 byte order mark some editors put in front of the text
pub(crate) const BOM: char = '\u{feff}';

/// An already-parsed document plus what is known about its origin
#[derive(Debug, Clone)]
pub struct Document {
    root: Value,
    source: Option<String>,
    origin: Option<PathBuf>,
}

impl Document {
    /// Wrap a parsed model with no source text attached
    pub fn from_value(root: Value) -> Self {
        Self {
            root,
            source: None,
            origin: None,
        }
    }

    /// Parse YAML or JSON text, keeping the text for location lookup.
    ///
    /// A leading byte order mark is dropped.
    pub fn parse(text: &str) -> Result<Self, LintError> {
        let text = text.strip_prefix(BOM).unwrap_or(text);
        let root: Value = serde_yaml::from_str(text)?;
        Ok(Self {
            root,
            source: Some(text.to_string()),
            origin: None,
        })
    }

    /// Read and parse a document from disk
    pub fn load(path: &Path) -> Result<Self, LintError> {
        let text = std::fs::read_to_string(path).map_err(|source| LintError::DocumentRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut document = Self::parse(&text)?;
        document.origin = Some(path.to_path_buf());
        Ok(document)
    }

    /// Attach the path the model was read from; source text is read lazily
    pub fn with_origin(mut self, path: impl Into<PathBuf>) -> Self {
        self.origin = Some(path.into());
        self
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// Build the location index, once per run.
    ///
    /// Prefers the retained text; otherwise reads the origin file. `None`
    /// when neither is available, which only costs locations.
    pub fn source_map(&self) -> Option<SourceMap> {
        if let Some(text) = &self.source {
            return Some(SourceMap::parse(text));
        }
        let Some(path) = &self.origin else {
            log::warn!("No source text available, results will carry no location");
            return None;
        };
        match SourceMap::load(path) {
            Ok(map) => Some(map),
            Err(e) => {
                log::warn!("Could not read file {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Shared read-only context for the checks of one run
    pub fn context(&self) -> Context {
        Context::new(self.root.clone())
    }
}
