//! Minimal `go.mod` reader: module path and `go` directive.

use std::path::Path;

use anyhow::{bail, Context, Result};

pub const GO_MOD_FILE: &str = "go.mod";

/// The parts of `go.mod` used for defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoModule {
    /// Full module path, e.g. `github.com/acme/tool/v2`.
    pub path: String,
    /// Version from the `go` directive, if present.
    pub go_version: Option<String>,
}

impl GoModule {
    /// Read `go.mod` from `dir`. A missing file is `Ok(None)`.
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let file = dir.join(GO_MOD_FILE);
        if !file.is_file() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&file)
            .with_context(|| format!("reading {}", file.display()))?;
        let module = Self::parse(&content).with_context(|| format!("parsing {}", file.display()))?;
        Ok(Some(module))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut path = None;
        let mut go_version = None;
        for raw in content.lines() {
            let line = match raw.find("//") {
                Some(i) => &raw[..i],
                None => raw,
            }
            .trim();
            let mut parts = line.split_whitespace();
            match parts.next() {
                Some("module") => {
                    let Some(value) = parts.next() else {
                        bail!("invalid module directive: {raw:?}");
                    };
                    path = Some(value.trim_matches('"').to_string());
                }
                Some("go") => go_version = parts.next().map(str::to_string),
                _ => {}
            }
        }
        match path {
            Some(path) if !path.is_empty() => Ok(Self { path, go_version }),
            _ => bail!("no module directive"),
        }
    }

    /// Executable name implied by the module path: its last segment, skipping
    /// a trailing major-version segment such as `v2`.
    pub fn default_name(&self) -> &str {
        let mut segments = self.path.rsplit('/').filter(|s| !s.is_empty());
        let last = segments.next().unwrap_or(&self.path);
        if is_major_version(last) {
            if let Some(prev) = segments.next() {
                return prev;
            }
        }
        last
    }
}

fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_module_and_go_version() {
        let m = GoModule::parse(
            "// comment\nmodule github.com/acme/tool // trailing\n\ngo 1.22\n\nrequire (\n\tgolang.org/x/sys v0.1.0\n)\n",
        )
        .unwrap();
        assert_eq!(m.path, "github.com/acme/tool");
        assert_eq!(m.go_version.as_deref(), Some("1.22"));
        assert_eq!(m.default_name(), "tool");
    }

    #[test]
    fn major_version_suffix_skipped() {
        let m = GoModule::parse("module github.com/acme/tool/v3\n").unwrap();
        assert_eq!(m.default_name(), "tool");
        assert!(m.go_version.is_none());
    }

    #[test]
    fn single_segment_module() {
        assert_eq!(GoModule::parse("module \"hello\"\n").unwrap().default_name(), "hello");
        assert_eq!(GoModule::parse("module v2\n").unwrap().default_name(), "v2");
    }

    #[test]
    fn missing_module_rejected() {
        assert!(GoModule::parse("go 1.21\n").is_err());
        assert!(GoModule::parse("module\n").is_err());
    }

    #[test]
    fn load_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(GoModule::load(dir.path()).unwrap().is_none());
        std::fs::write(dir.path().join(GO_MOD_FILE), "module example.com/app\n").unwrap();
        assert_eq!(
            GoModule::load(dir.path()).unwrap().unwrap().default_name(),
            "app"
        );
    }
}
