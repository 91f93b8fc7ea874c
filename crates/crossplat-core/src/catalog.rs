//! Platform catalog sources.
//!
//! The catalog is the toolchain's own list of supported pairs, in the shape
//! printed by `go tool dist list -json`:
//!
//! ```json
//! [{"GOOS": "linux", "GOARCH": "amd64", "CgoSupported": true, "FirstClass": true}]
//! ```

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::pair::PlatformPair;
use crate::set::PlatformSet;

/// One catalog record as emitted by the toolchain.
#[derive(Debug, Clone, Deserialize)]
struct CatalogRecord {
    #[serde(rename = "GOOS")]
    os: String,
    #[serde(rename = "GOARCH")]
    arch: String,
    #[serde(rename = "CgoSupported", default)]
    cgo_supported: bool,
    #[serde(rename = "FirstClass", default)]
    first_class: bool,
}

impl From<CatalogRecord> for PlatformPair {
    fn from(r: CatalogRecord) -> Self {
        PlatformPair::new(r.os, r.arch).with_capabilities(r.first_class, r.cgo_supported)
    }
}

/// Something that can produce the full platform catalog.
pub trait CatalogSource {
    /// Fetch the catalog. Called once per run.
    fn load(&self) -> Result<PlatformSet>;
}

/// Decode a catalog from its JSON form.
pub fn parse_catalog_json(json: &str) -> Result<PlatformSet> {
    let records: Vec<CatalogRecord> = serde_json::from_str(json)?;
    Ok(records.into_iter().map(PlatformPair::from).collect())
}

/// Catalog obtained by running `<go> tool dist list -json`.
#[derive(Debug, Clone)]
pub struct GoDistCatalog {
    program: PathBuf,
}

impl GoDistCatalog {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command_line(&self) -> String {
        format!("{} tool dist list -json", self.program.display())
    }
}

impl Default for GoDistCatalog {
    fn default() -> Self {
        Self::new("go")
    }
}

impl CatalogSource for GoDistCatalog {
    fn load(&self) -> Result<PlatformSet> {
        debug!(command = %self.command_line(), "querying platform catalog");
        let output = Command::new(&self.program)
            .args(["tool", "dist", "list", "-json"])
            .output()
            .map_err(|e| CoreError::CatalogCommand {
                command: self.command_line(),
                detail: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(CoreError::CatalogCommand {
                command: self.command_line(),
                detail: format!(
                    "{}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        let json = String::from_utf8_lossy(&output.stdout);
        let catalog = parse_catalog_json(&json)?;
        debug!(pairs = catalog.len(), "catalog loaded");
        Ok(catalog)
    }
}

/// Catalog read from a JSON file with the toolchain's record shape.
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for JsonFileCatalog {
    fn load(&self) -> Result<PlatformSet> {
        if !self.path.exists() {
            return Err(CoreError::CatalogNotFound {
                path: self.path.clone(),
            });
        }
        let json = std::fs::read_to_string(&self.path)?;
        parse_catalog_json(&json)
    }
}

/// A fixed, in-memory catalog.
impl CatalogSource for PlatformSet {
    fn load(&self) -> Result<PlatformSet> {
        Ok(self.clone())
    }
}
