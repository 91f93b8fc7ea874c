//! Bundle error types.

use std::path::PathBuf;

/// Errors from template handling and archive packaging.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    /// A template could not be parsed.
    #[error("invalid template '{template}' at byte {position}: {detail}")]
    Template {
        template: String,
        position: usize,
        detail: String,
    },

    /// A template rendered to an unusable file name.
    #[error("template '{template}' rendered invalid file name '{rendered}': {detail}")]
    InvalidName {
        template: String,
        rendered: String,
        detail: String,
    },

    /// The clean glob is malformed.
    #[error("invalid glob '{pattern}': {source}")]
    Glob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// Writing the archive failed.
    #[error("archive error at {}: {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// Filesystem error on a specific path.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BundleError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BundleError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for bundle operations.
pub type Result<T> = std::result::Result<T, BundleError>;
