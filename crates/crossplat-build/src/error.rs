//! Build error types.
//!
//! Only fatal conditions live here. A target whose compiler invocation
//! fails is reported through [`crate::report::TargetOutcome::Failed`].

use std::path::PathBuf;

use crossplat_bundle::BundleError;

/// Errors that abort a build run.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The build configuration is unusable.
    #[error("configuration error: {detail}")]
    Config { detail: String },

    /// The compiler executable could not be located.
    #[error("toolchain `{program}` not found: {detail}")]
    ToolchainNotFound { program: String, detail: String },

    /// Two targets would write the same archive.
    #[error("targets {first} and {second} both render archive {}", path.display())]
    ArchiveCollision {
        first: String,
        second: String,
        path: PathBuf,
    },

    /// Template or archive failure.
    #[error(transparent)]
    Bundle(#[from] BundleError),

    /// Packaging a successfully compiled target failed.
    #[error("packaging {target} failed: {source}")]
    Packaging {
        target: String,
        #[source]
        source: BundleError,
    },

    /// Filesystem error in the output directory.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The worker pool could not be created.
    #[error("failed to start {jobs} build workers: {detail}")]
    WorkerPool { jobs: usize, detail: String },
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;
