//! A single OS/architecture combination.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::CoreError;

/// An operating system and architecture the compiler can target.
///
/// Identity is `(os, arch)`. The capability flags are metadata copied from
/// the catalog and take no part in equality or hashing, so a pair parsed
/// from a user string compares equal to the catalog entry it names.
#[derive(Debug, Clone, Eq)]
pub struct PlatformPair {
    /// Target operating system (`GOOS`).
    pub os: String,
    /// Target architecture (`GOARCH`).
    pub arch: String,
    /// Whether the toolchain supports this pair as first class.
    pub first_class: bool,
    /// Whether native interop (cgo) builds are supported.
    pub interop_capable: bool,
}

impl PlatformPair {
    /// Create a pair with no capability metadata.
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
            first_class: false,
            interop_capable: false,
        }
    }

    /// Attach capability metadata.
    pub fn with_capabilities(mut self, first_class: bool, interop_capable: bool) -> Self {
        self.first_class = first_class;
        self.interop_capable = interop_capable;
        self
    }

    /// Whether `other` names the same OS/architecture.
    pub fn same_target(&self, other: &PlatformPair) -> bool {
        self.os == other.os && self.arch == other.arch
    }
}

impl PartialEq for PlatformPair {
    fn eq(&self, other: &Self) -> bool {
        self.same_target(other)
    }
}

impl Hash for PlatformPair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.os.hash(state);
        self.arch.hash(state);
    }
}

impl fmt::Display for PlatformPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

/// Parses `os/arch` (a backslash separator is accepted too).
impl FromStr for PlatformPair {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (os, arch) = trimmed
            .split_once('/')
            .or_else(|| trimmed.split_once('\\'))
            .ok_or_else(|| CoreError::InvalidPair {
                input: s.to_string(),
            })?;
        if os.is_empty() || arch.is_empty() || arch.contains(['/', '\\']) {
            return Err(CoreError::InvalidPair {
                input: s.to_string(),
            });
        }
        Ok(PlatformPair::new(os, arch))
    }
}
