//! Error types for metamodel extraction and export.

use std::path::PathBuf;

use thiserror::Error;

use crate::parser::ParseError;

/// Errors surfaced by the extraction pipeline.
///
/// Per-file parse failures are recoverable at the driver level (the file is
/// skipped and the run continues); they only become a `ModelError` when a
/// caller parses a single file directly.
#[derive(Debug, Error)]
pub enum ModelError {
    /// IO error while reading sources or writing the model file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A source file failed to parse.
    #[error("{}: {source}", .file.display())]
    Parse {
        file: PathBuf,
        #[source]
        source: ParseError,
    },

    /// XML serialization error during export.
    #[error("XML error: {0}")]
    Xml(String),

    /// The produced model failed structural validation before export.
    #[error("model validation failed:\n{0}")]
    Validation(String),
}

impl ModelError {
    /// Create an XML error.
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }

    /// Attach a file path to a parse error.
    pub fn parse(file: impl Into<PathBuf>, source: ParseError) -> Self {
        Self::Parse {
            file: file.into(),
            source,
        }
    }
}
