//! `crossplat.toml` parsing and project configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use crossplat_core::AliasPolicy;
use serde::{Deserialize, Serialize};

/// File name searched for from the working directory upward.
pub const MANIFEST_FILE: &str = "crossplat.toml";

/// The top-level `crossplat.toml` structure. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrossplatManifest {
    /// Defaults for `crossplat build`.
    #[serde(default)]
    pub build: BuildSection,
    /// External toolchain settings.
    #[serde(default)]
    pub toolchain: ToolchainSection,
    /// Static alias categories: alias name to operating systems.
    #[serde(default)]
    pub aliases: BTreeMap<String, Vec<String>>,
}

/// `[build]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BuildSection {
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_template: Option<String>,
    #[serde(default)]
    pub bundle_template: Option<String>,
    /// Alias tokens used when none are given on the command line.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Compiler arguments used when none follow `--`.
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub jobs: Option<usize>,
    #[serde(default)]
    pub clean_glob: Option<String>,
}

/// `[toolchain]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolchainSection {
    /// Compiler command (default: `go`).
    #[serde(default)]
    pub command: Option<String>,
}

impl CrossplatManifest {
    /// Search upward from `start_dir` for a `crossplat.toml` file, parse and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest = Self::parse(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    pub fn parse(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// The built-in alias policy with this manifest's categories applied.
    pub fn alias_policy(&self) -> AliasPolicy {
        let mut policy = AliasPolicy::default();
        for (name, oses) in &self.aliases {
            policy.set_category(name.as_str(), oses.iter().map(String::as_str));
        }
        policy
    }

    /// Toolchain command, defaulting to `go`.
    pub fn toolchain_command(&self) -> &str {
        self.toolchain.command.as_deref().unwrap_or("go")
    }

    /// Generate the starter file written by `crossplat init`.
    pub fn template(name: &str) -> String {
        format!(
            r#"[build]
name = "{name}"
output-dir = "release"
name-template = "{{NAME}}{{EXT}}"
bundle-template = "{{NAME}}_{{GOOS}}_{{GOARCH}}{{ZIP}}"
aliases = ["first-class"]

[toolchain]
command = "go"

[aliases]
desktop = ["windows", "darwin", "linux"]
"#
        )
    }
}
