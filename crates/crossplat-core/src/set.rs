//! Platform-set algebra.
//!
//! A `PlatformSet` keeps insertion order for stable reporting, but no two
//! elements share the same `(os, arch)`. Every operation returns a new set.

use std::fmt;

use crate::error::Result;
use crate::pair::PlatformPair;

/// An ordered collection of unique platform pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformSet {
    pairs: Vec<PlatformPair>,
}

impl PlatformSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma- or whitespace-separated list of `os/arch` pairs.
    pub fn parse_list(input: &str) -> Result<Self> {
        input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(str::parse::<PlatformPair>)
            .collect()
    }

    /// Append a pair unless an equal one is already present.
    ///
    /// Returns `true` if the pair was added.
    pub fn insert(&mut self, pair: PlatformPair) -> bool {
        if self.has(&pair) {
            return false;
        }
        self.pairs.push(pair);
        true
    }

    /// Pairs whose OS is one of `oses`.
    pub fn only(&self, oses: &[&str]) -> Self {
        self.filter(|p| oses.contains(&p.os.as_str()))
    }

    /// Pairs whose architecture is one of `archs`.
    pub fn only_arch(&self, archs: &[&str]) -> Self {
        self.filter(|p| archs.contains(&p.arch.as_str()))
    }

    /// Pairs whose architecture is not one of `archs`.
    pub fn without_arch(&self, archs: &[&str]) -> Self {
        self.filter(|p| !archs.contains(&p.arch.as_str()))
    }

    /// Pairs matching a predicate, in order.
    pub fn filter(&self, mut keep: impl FnMut(&PlatformPair) -> bool) -> Self {
        Self {
            pairs: self.pairs.iter().filter(|p| keep(p)).cloned().collect(),
        }
    }

    /// Exact `(os, arch)` membership.
    pub fn has(&self, pair: &PlatformPair) -> bool {
        self.pairs.iter().any(|p| p.same_target(pair))
    }

    /// The stored pair equal to `pair`, carrying this set's metadata.
    pub fn get(&self, pair: &PlatformPair) -> Option<&PlatformPair> {
        self.pairs.iter().find(|p| p.same_target(pair))
    }

    /// Receiver's pairs, then the pairs of `other` not already present.
    pub fn union(&self, other: &PlatformSet) -> Self {
        let mut res = self.clone();
        for pair in &other.pairs {
            res.insert(pair.clone());
        }
        res
    }

    /// Receiver's pairs that do not appear in `other`.
    pub fn difference(&self, other: &PlatformSet) -> Self {
        self.filter(|p| !other.has(p))
    }

    /// Distinct operating systems, in first-seen order.
    pub fn oses(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for p in &self.pairs {
            if !seen.contains(&p.os.as_str()) {
                seen.push(&p.os);
            }
        }
        seen
    }

    /// Distinct architectures, in first-seen order.
    pub fn archs(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for p in &self.pairs {
            if !seen.contains(&p.arch.as_str()) {
                seen.push(&p.arch);
            }
        }
        seen
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlatformPair> {
        self.pairs.iter()
    }

    pub fn as_slice(&self) -> &[PlatformPair] {
        &self.pairs
    }
}

impl FromIterator<PlatformPair> for PlatformSet {
    fn from_iter<I: IntoIterator<Item = PlatformPair>>(iter: I) -> Self {
        let mut set = PlatformSet::new();
        for pair in iter {
            set.insert(pair);
        }
        set
    }
}

impl IntoIterator for PlatformSet {
    type Item = PlatformPair;
    type IntoIter = std::vec::IntoIter<PlatformPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

impl<'a> IntoIterator for &'a PlatformSet {
    type Item = &'a PlatformPair;
    type IntoIter = std::slice::Iter<'a, PlatformPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

impl fmt::Display for PlatformSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pair) in self.pairs.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{pair}")?;
        }
        Ok(())
    }
}
