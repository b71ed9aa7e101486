//! Errors raised by the TypeScript host.

use std::path::PathBuf;

/// Failures while reading or parsing a source file.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// IO error reading a source file.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The grammar could not be loaded into the parser.
    #[error("Failed to load TypeScript grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// The parser returned no tree.
    #[error("Failed to parse {path}")]
    Parse {
        /// Path of the file that failed to parse.
        path: String,
    },
}
