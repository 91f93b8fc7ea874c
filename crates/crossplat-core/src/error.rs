//! Error types for catalog loading and target resolution.

use std::path::PathBuf;

/// Errors that can occur while loading a catalog or resolving targets.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An alias token named an alias that does not exist.
    #[error("unknown alias: {name}")]
    UnknownAlias { name: String },

    /// An alias token was empty (e.g. a bare `-`).
    #[error("invalid alias token '{token}': alias name is empty")]
    EmptyAliasToken { token: String },

    /// A pair string was not of the form `os/arch`.
    #[error("invalid platform pair '{input}': expected os/arch")]
    InvalidPair { input: String },

    /// An explicitly requested pair is not in the catalog.
    #[error("platform {pair} is not in the toolchain catalog")]
    UnknownPair { pair: String },

    /// The alias policy conflicts with the catalog.
    #[error("invalid alias table: {detail}")]
    AliasTable { detail: String },

    /// The external catalog command failed.
    #[error("catalog command `{command}` failed: {detail}")]
    CatalogCommand { command: String, detail: String },

    /// The catalog file does not exist.
    #[error("catalog file not found: {}", path.display())]
    CatalogNotFound { path: PathBuf },

    /// The catalog JSON could not be decoded.
    #[error("catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while reading a catalog.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for resolution operations.
pub type Result<T> = std::result::Result<T, CoreError>;
