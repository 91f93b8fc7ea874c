//! Resolved targets: a platform pair plus the paths derived for it.

use std::collections::HashMap;
use std::path::PathBuf;

use crossplat_bundle::RenderedNames;
use crossplat_core::{PlatformPair, PlatformSet};
use tracing::debug;

use crate::config::BuildConfig;
use crate::error::{BuildError, Result};

/// Directory under the output directory holding unpackaged binaries.
pub const STAGING_DIR: &str = ".crossplat";

/// One pair selected for this run with its output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub pair: PlatformPair,
    pub names: RenderedNames,
    /// Where the compiler writes the binary. Unique per target.
    pub staging_path: PathBuf,
    /// Final archive location.
    pub archive_path: PathBuf,
}

impl ResolvedTarget {
    /// Per-target staging directory.
    pub fn staging_dir(&self) -> PathBuf {
        self.staging_path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default()
    }
}

/// Derive the resolved targets for a platform set.
///
/// Fails on template errors and when two targets render the same archive
/// name, before any build work starts.
pub fn plan(set: &PlatformSet, config: &BuildConfig) -> Result<Vec<ResolvedTarget>> {
    let renderer = config.renderer()?;
    let staging_root = config.output_dir.join(STAGING_DIR);

    let mut seen: HashMap<PathBuf, String> = HashMap::new();
    let mut targets = Vec::with_capacity(set.len());
    for pair in set {
        let names = renderer.render(&config.name, pair)?;
        let staging_path = staging_root
            .join(format!("{}_{}", pair.os, pair.arch))
            .join(&names.binary);
        let archive_path = config.output_dir.join(&names.archive);

        if let Some(first) = seen.insert(archive_path.clone(), pair.to_string()) {
            return Err(BuildError::ArchiveCollision {
                first,
                second: pair.to_string(),
                path: archive_path,
            });
        }

        debug!(target = %pair, archive = %archive_path.display(), "planned");
        targets.push(ResolvedTarget {
            pair: pair.clone(),
            names,
            staging_path,
            archive_path,
        });
    }
    Ok(targets)
}
