//! CLI command implementations.

pub mod build;
pub mod clean;
pub mod doctor;
pub mod init;
pub mod list;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use crossplat_build::DEFAULT_OUTPUT_DIR;
use crossplat_core::{AliasTable, CatalogSource, GoDistCatalog, JsonFileCatalog, PlatformSet};
use tracing::debug;

use crate::gomod::GoModule;
use crate::manifest::CrossplatManifest;

/// Everything known about the project before a command runs.
#[derive(Debug, Clone, Default)]
pub struct Project {
    /// Directory holding `crossplat.toml`, or the working directory.
    pub dir: PathBuf,
    pub manifest: CrossplatManifest,
    pub module: Option<GoModule>,
}

impl Project {
    /// Load `crossplat.toml` (searched upward) and `go.mod` from the project
    /// directory. Both are optional.
    pub fn discover(cwd: &Path) -> Result<Self> {
        let (manifest, dir) = match CrossplatManifest::find_and_load(cwd)? {
            Some((manifest, dir)) => (manifest, dir),
            None => (CrossplatManifest::default(), cwd.to_path_buf()),
        };
        let module = match GoModule::load(&dir)? {
            Some(module) => Some(module),
            None if dir != cwd => GoModule::load(cwd)?,
            None => None,
        };
        debug!(dir = %dir.display(), has_go_mod = module.is_some(), "project discovered");
        Ok(Self {
            dir,
            manifest,
            module,
        })
    }

    /// Output directory: explicit flag, then `crossplat.toml` (relative to the
    /// project directory), then the default.
    pub fn output_dir(&self, flag: Option<&Path>) -> PathBuf {
        if let Some(dir) = flag {
            return dir.to_path_buf();
        }
        let configured = self
            .manifest
            .build
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        self.dir.join(configured)
    }

    /// Read the platform catalog from `file`, or ask the toolchain.
    pub fn catalog(&self, file: Option<&Path>) -> Result<PlatformSet> {
        let set = match file {
            Some(path) => JsonFileCatalog::new(path).load(),
            None => GoDistCatalog::new(self.manifest.toolchain_command()).load(),
        }
        .context("loading platform catalog")?;
        debug!(pairs = set.len(), "catalog loaded");
        Ok(set)
    }

    /// Build the alias table from the catalog and the configured categories.
    pub fn alias_table(&self, catalog_file: Option<&Path>) -> Result<AliasTable> {
        let catalog = self.catalog(catalog_file)?;
        AliasTable::build(&catalog, &self.manifest.alias_policy()).context("building alias table")
    }
}
