//! `crossplat clean`: remove archives from the output directory.

use std::path::Path;

use anyhow::{Context, Result};
use crossplat_bundle::{clean_archives, DEFAULT_CLEAN_GLOB};

use super::Project;

/// Remove archives matching `glob` (or the configured pattern) from the
/// output directory.
pub fn run(project: &Project, output_dir: Option<&Path>, glob: Option<&str>) -> Result<()> {
    let dir = project.output_dir(output_dir);
    let pattern = glob
        .or(project.manifest.build.clean_glob.as_deref())
        .unwrap_or(DEFAULT_CLEAN_GLOB);

    if !dir.is_dir() {
        println!("Already clean: {} does not exist", dir.display());
        return Ok(());
    }

    let removed = clean_archives(&dir, pattern)
        .with_context(|| format!("cleaning {}", dir.display()))?;
    for path in &removed {
        println!("Removed {}", path.display());
    }
    println!("{} archives removed from {}", removed.len(), dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn clean_removes_only_archives() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("release");
        fs::create_dir(&out).unwrap();
        fs::write(out.join("app_linux_amd64.zip"), b"zip").unwrap();
        fs::write(out.join("notes.txt"), b"keep").unwrap();

        let project = Project::discover(dir.path()).unwrap();
        run(&project, None, None).unwrap();
        assert!(!out.join("app_linux_amd64.zip").exists());
        assert!(out.join("notes.txt").exists());
    }

    #[test]
    fn clean_handles_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let project = Project::discover(dir.path()).unwrap();
        run(&project, None, None).unwrap();
    }

    #[test]
    fn clean_with_custom_glob() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("dist");
        fs::create_dir(&out).unwrap();
        fs::write(out.join("app.zip"), b"zip").unwrap();
        fs::write(out.join("app.tar"), b"tar").unwrap();

        let project = Project::discover(dir.path()).unwrap();
        run(&project, Some(&out), Some("*.tar")).unwrap();
        assert!(out.join("app.zip").exists());
        assert!(!out.join("app.tar").exists());
    }
}
