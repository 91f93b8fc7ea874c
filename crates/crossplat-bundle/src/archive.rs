//! Single-entry zip archives and output-directory cleanup.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use globset::Glob;
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{BundleError, Result};

/// Write `binary` into a new archive at `archive` under the name `member`.
///
/// An existing archive at that path is replaced.
pub fn write_single_entry(binary: &Path, archive: &Path, member: &str) -> Result<()> {
    let mut input = File::open(binary).map_err(|e| BundleError::io(binary, e))?;
    let output = File::create(archive).map_err(|e| BundleError::io(archive, e))?;

    let zip_err = |source: zip::result::ZipError| BundleError::Archive {
        path: archive.to_path_buf(),
        source,
    };

    let mut writer = ZipWriter::new(output);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);
    writer.start_file(member, options).map_err(zip_err)?;
    io::copy(&mut input, &mut writer).map_err(|e| BundleError::io(archive, e))?;
    writer.finish().map_err(zip_err)?;

    debug!(archive = %archive.display(), member, "archive written");
    Ok(())
}

/// Files directly inside `dir` whose names match `pattern`, sorted.
///
/// A missing directory has no archives.
pub fn find_archives(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let matcher = Glob::new(pattern)
        .map_err(|source| BundleError::Glob {
            pattern: pattern.to_string(),
            source,
        })?
        .compile_matcher();

    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| BundleError::io(dir, e))? {
        let entry = entry.map_err(|e| BundleError::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| BundleError::io(entry.path(), e))?;
        if file_type.is_file() && matcher.is_match(entry.file_name()) {
            found.push(entry.path());
        }
    }
    found.sort();
    Ok(found)
}

/// Remove every archive in `dir` matching `pattern`. Returns what was removed.
pub fn clean_archives(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let archives = find_archives(dir, pattern)?;
    if !archives.is_empty() {
        info!(count = archives.len(), dir = %dir.display(), "cleaning archives");
    }
    for path in &archives {
        debug!(path = %path.display(), "removing");
        fs::remove_file(path).map_err(|e| BundleError::io(path, e))?;
    }
    Ok(archives)
}
