//! `crossplat init`: write a starter `crossplat.toml`.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::gomod::GoModule;
use crate::manifest::{CrossplatManifest, MANIFEST_FILE};

/// Create `crossplat.toml` in `dir`. The name defaults to the `go.mod`
/// module name, then the directory name.
pub fn run(dir: &Path, name: Option<&str>) -> Result<()> {
    let path = dir.join(MANIFEST_FILE);
    if path.exists() {
        bail!("{} already exists", path.display());
    }

    let module = GoModule::load(dir)?;
    let name = match (name, &module) {
        (Some(name), _) => name.to_string(),
        (None, Some(module)) => module.default_name().to_string(),
        (None, None) => dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .context("cannot infer a name; pass one explicitly")?,
    };

    fs::write(&path, CrossplatManifest::template(&name))
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Created {} for '{name}'", path.display());
    Ok(())
}
