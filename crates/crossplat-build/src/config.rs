//! Frozen parameters of one build run.

use std::path::PathBuf;

use crossplat_bundle::{
    Renderer, DEFAULT_ARCHIVE_TEMPLATE, DEFAULT_BINARY_TEMPLATE, DEFAULT_CLEAN_GLOB,
};

use crate::error::{BuildError, Result};

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "release";

/// Build parameters. Not modified once target resolution starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Directory receiving the archives.
    pub output_dir: PathBuf,
    /// Executable base name (`{NAME}`).
    pub name: String,
    /// Toolchain version from the project manifest, if known.
    pub toolchain_version: Option<String>,
    /// Template for the binary inside each archive.
    pub binary_template: String,
    /// Template for the archive file name.
    pub archive_template: String,
    /// Arguments passed verbatim to the compiler after its own flags.
    pub build_args: Vec<String>,
    /// Remove matching archives before building.
    pub clean: bool,
    /// Glob of archives removed by `clean`.
    pub clean_glob: String,
    /// Plan and report without running the compiler or touching the disk.
    pub dry_run: bool,
    /// Enable cgo for interop-capable targets.
    pub cgo: bool,
    /// Strip symbol tables and debug information.
    pub strip: bool,
    /// Number of targets built concurrently.
    pub jobs: usize,
}

impl BuildConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            name: name.into(),
            toolchain_version: None,
            binary_template: DEFAULT_BINARY_TEMPLATE.to_string(),
            archive_template: DEFAULT_ARCHIVE_TEMPLATE.to_string(),
            build_args: Vec::new(),
            clean: false,
            clean_glob: DEFAULT_CLEAN_GLOB.to_string(),
            dry_run: false,
            cgo: false,
            strip: false,
            jobs: 1,
        }
    }

    /// Check the configuration and compile its templates.
    pub fn renderer(&self) -> Result<Renderer> {
        if self.name.trim().is_empty() {
            return Err(BuildError::Config {
                detail: "executable name is empty".into(),
            });
        }
        if self.jobs == 0 {
            return Err(BuildError::Config {
                detail: "jobs must be at least 1".into(),
            });
        }
        Ok(Renderer::new(&self.binary_template, &self.archive_template)?)
    }
}
