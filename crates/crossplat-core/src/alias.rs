//! Alias table construction.
//!
//! An alias names a platform set. Two kinds exist:
//! - **Static categories** from an [`AliasPolicy`]: fixed OS lists such as
//!   `desktop` or `unix`, filtered against the catalog.
//! - **Dynamic aliases** computed from one scan over the catalog: one per
//!   OS, one per architecture, plus `first-class`, `second-class` and `cgo`.
//!
//! `all` always names the whole catalog.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{CoreError, Result};
use crate::set::PlatformSet;

/// Alias naming the full catalog.
pub const ALL: &str = "all";
/// Alias naming first-class pairs.
pub const FIRST_CLASS: &str = "first-class";
/// Alias naming pairs that are not first class.
pub const SECOND_CLASS: &str = "second-class";
/// Alias naming interop-capable pairs.
pub const CGO: &str = "cgo";

const RESERVED: [&str; 4] = [ALL, FIRST_CLASS, SECOND_CLASS, CGO];

/// Static category definitions: alias name to the operating systems it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasPolicy {
    categories: BTreeMap<String, Vec<String>>,
}

impl AliasPolicy {
    /// A policy with no static categories.
    pub fn empty() -> Self {
        Self {
            categories: BTreeMap::new(),
        }
    }

    /// Add or replace a category.
    pub fn with_category<S: Into<String>>(
        mut self,
        name: impl Into<String>,
        oses: impl IntoIterator<Item = S>,
    ) -> Self {
        self.set_category(name, oses);
        self
    }

    /// Add or replace a category in place.
    pub fn set_category<S: Into<String>>(
        &mut self,
        name: impl Into<String>,
        oses: impl IntoIterator<Item = S>,
    ) {
        self.categories
            .insert(name.into(), oses.into_iter().map(Into::into).collect());
    }

    /// Operating systems of a category.
    pub fn category(&self, name: &str) -> Option<&[String]> {
        self.categories.get(name).map(Vec::as_slice)
    }

    /// Categories in name order.
    pub fn categories(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.categories
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl Default for AliasPolicy {
    fn default() -> Self {
        Self::empty()
            .with_category("mobile", ["android", "ios"])
            .with_category("web", ["js", "wasip1"])
            .with_category("apple", ["darwin", "ios"])
            .with_category("desktop", ["windows", "darwin", "linux"])
            .with_category(
                "unix",
                [
                    "linux",
                    "aix",
                    "darwin",
                    "dragonfly",
                    "freebsd",
                    "illumos",
                    "netbsd",
                    "openbsd",
                    "plan9",
                    "solaris",
                ],
            )
    }
}

/// Read-only mapping from alias name to platform set.
#[derive(Debug, Clone)]
pub struct AliasTable {
    aliases: BTreeMap<String, PlatformSet>,
}

impl AliasTable {
    /// Build the table for a catalog.
    ///
    /// Fails if a static category would shadow `all`, `first-class`,
    /// `second-class`, `cgo` or a catalog OS/architecture, or if some name
    /// is both an OS and an architecture in the catalog.
    pub fn build(catalog: &PlatformSet, policy: &AliasPolicy) -> Result<Self> {
        let oses = catalog.oses();
        let archs = catalog.archs();

        if let Some(name) = oses.iter().find(|os| archs.contains(*os)) {
            return Err(CoreError::AliasTable {
                detail: format!("'{name}' is both an operating system and an architecture"),
            });
        }
        if let Some(name) = oses.iter().chain(archs.iter()).find(|n| RESERVED.contains(*n)) {
            return Err(CoreError::AliasTable {
                detail: format!("catalog value '{name}' collides with a built-in alias"),
            });
        }

        let mut aliases = BTreeMap::new();
        aliases.insert(ALL.to_string(), catalog.clone());

        for (name, category_oses) in policy.categories() {
            if RESERVED.contains(&name) || oses.contains(&name) || archs.contains(&name) {
                return Err(CoreError::AliasTable {
                    detail: format!("category '{name}' shadows a built-in or catalog alias"),
                });
            }
            let filter: Vec<&str> = category_oses.iter().map(String::as_str).collect();
            let members = catalog.only(&filter);
            debug!(alias = name, pairs = members.len(), "static category");
            aliases.insert(name.to_string(), members);
        }

        let mut first_class = PlatformSet::new();
        let mut second_class = PlatformSet::new();
        let mut cgo = PlatformSet::new();
        for pair in catalog {
            aliases
                .entry(pair.os.clone())
                .or_insert_with(PlatformSet::new)
                .insert(pair.clone());
            aliases
                .entry(pair.arch.clone())
                .or_insert_with(PlatformSet::new)
                .insert(pair.clone());
            if pair.first_class {
                first_class.insert(pair.clone());
            } else {
                second_class.insert(pair.clone());
            }
            if pair.interop_capable {
                cgo.insert(pair.clone());
            }
        }
        aliases.insert(FIRST_CLASS.to_string(), first_class);
        aliases.insert(SECOND_CLASS.to_string(), second_class);
        aliases.insert(CGO.to_string(), cgo);

        Ok(Self { aliases })
    }

    pub fn get(&self, name: &str) -> Option<&PlatformSet> {
        self.aliases.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.aliases.contains_key(name)
    }

    /// Alias names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.aliases.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PlatformSet)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pair::PlatformPair;

    fn catalog() -> PlatformSet {
        [
            PlatformPair::new("linux", "amd64").with_capabilities(true, true),
            PlatformPair::new("linux", "arm64").with_capabilities(true, true),
            PlatformPair::new("windows", "amd64").with_capabilities(true, true),
            PlatformPair::new("windows", "386").with_capabilities(false, true),
            PlatformPair::new("darwin", "arm64").with_capabilities(true, true),
            PlatformPair::new("ios", "arm64").with_capabilities(false, true),
            PlatformPair::new("android", "arm64").with_capabilities(false, true),
            PlatformPair::new("js", "wasm").with_capabilities(false, false),
            PlatformPair::new("plan9", "386").with_capabilities(false, false),
        ]
        .into_iter()
        .collect()
    }

    fn names(set: &PlatformSet) -> String {
        set.to_string()
    }

    #[test]
    fn all_is_full_catalog() {
        let table = AliasTable::build(&catalog(), &AliasPolicy::default()).unwrap();
        assert_eq!(table.get(ALL).unwrap(), &catalog());
    }

    #[test]
    fn static_categories() {
        let table = AliasTable::build(&catalog(), &AliasPolicy::default()).unwrap();
        assert_eq!(
            names(table.get("desktop").unwrap()),
            "linux/amd64, linux/arm64, windows/amd64, windows/386, darwin/arm64"
        );
        assert_eq!(
            names(table.get("mobile").unwrap()),
            "ios/arm64, android/arm64"
        );
        assert_eq!(names(table.get("apple").unwrap()), "darwin/arm64, ios/arm64");
        assert_eq!(names(table.get("web").unwrap()), "js/wasm");
        assert!(table.get("unix").unwrap().has(&"plan9/386".parse().unwrap()));
    }

    #[test]
    fn per_os_and_per_arch_aliases_are_total() {
        let cat = catalog();
        let table = AliasTable::build(&cat, &AliasPolicy::default()).unwrap();
        for pair in &cat {
            assert!(table.get(&pair.os).unwrap().has(pair), "os alias for {pair}");
            assert!(table.get(&pair.arch).unwrap().has(pair), "arch alias for {pair}");
        }
        assert_eq!(names(table.get("386").unwrap()), "windows/386, plan9/386");
        assert_eq!(names(table.get("windows").unwrap()), "windows/amd64, windows/386");
    }

    #[test]
    fn class_and_cgo_aliases() {
        let table = AliasTable::build(&catalog(), &AliasPolicy::default()).unwrap();
        let first = table.get(FIRST_CLASS).unwrap();
        let second = table.get(SECOND_CLASS).unwrap();
        assert_eq!(first.len(), 4);
        assert_eq!(first.union(second), catalog());
        assert!(first.difference(second) == *first);
        let cgo = table.get(CGO).unwrap();
        assert!(!cgo.has(&"js/wasm".parse().unwrap()));
        assert_eq!(cgo.len(), 7);
    }

    #[test]
    fn builtin_aliases_exist_for_empty_catalog() {
        let table = AliasTable::build(&PlatformSet::new(), &AliasPolicy::default()).unwrap();
        assert!(table.get(FIRST_CLASS).unwrap().is_empty());
        assert!(table.get(SECOND_CLASS).unwrap().is_empty());
        assert!(table.get(CGO).unwrap().is_empty());
        assert!(table.get("desktop").unwrap().is_empty());
    }

    #[test]
    fn category_shadowing_catalog_os_is_rejected() {
        let policy = AliasPolicy::default().with_category("linux", ["linux", "android"]);
        let err = AliasTable::build(&catalog(), &policy).unwrap_err();
        assert!(matches!(err, CoreError::AliasTable { .. }));
    }

    #[test]
    fn category_shadowing_reserved_is_rejected() {
        let policy = AliasPolicy::empty().with_category(ALL, ["linux"]);
        assert!(AliasTable::build(&catalog(), &policy).is_err());
    }

    #[test]
    fn custom_policy_replaces_category() {
        let policy = AliasPolicy::default().with_category("mobile", ["android"]);
        let table = AliasTable::build(&catalog(), &policy).unwrap();
        assert_eq!(names(table.get("mobile").unwrap()), "android/arm64");
    }

    #[test]
    fn names_are_sorted() {
        let table = AliasTable::build(&catalog(), &AliasPolicy::empty()).unwrap();
        let names: Vec<&str> = table.names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert!(table.contains("wasm"));
    }
}
