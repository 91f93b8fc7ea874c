//! Alias expression resolution.
//!
//! Tokens are folded strictly left to right into an initially empty set:
//! a plain token unions its alias in, a `-`-prefixed token removes it.
//! `["all", "-windows"]` therefore drops every windows pair, while
//! `["-windows", "all"]` keeps them because nothing was there to remove.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::alias::{AliasTable, ALL, FIRST_CLASS};
use crate::error::{CoreError, Result};
use crate::pair::PlatformPair;
use crate::set::PlatformSet;

/// Alias used when a request has no tokens.
pub const DEFAULT_ALIAS: &str = FIRST_CLASS;

/// Prefix marking a token as a removal.
pub const NEGATE_MARKER: char = '-';

/// One alias reference, parsed once at the input boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasToken {
    pub name: String,
    pub negate: bool,
}

impl AliasToken {
    pub fn add(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            negate: false,
        }
    }

    pub fn remove(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            negate: true,
        }
    }
}

impl FromStr for AliasToken {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let (name, negate) = match trimmed.strip_prefix(NEGATE_MARKER) {
            Some(rest) => (rest, true),
            None => (trimmed, false),
        };
        if name.is_empty() {
            return Err(CoreError::EmptyAliasToken {
                token: s.to_string(),
            });
        }
        Ok(Self {
            name: name.to_string(),
            negate,
        })
    }
}

impl fmt::Display for AliasToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negate {
            write!(f, "{NEGATE_MARKER}")?;
        }
        f.write_str(&self.name)
    }
}

/// What the user asked to build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionRequest {
    /// Alias tokens, applied in order.
    pub tokens: Vec<AliasToken>,
    /// Explicit pairs unioned in after the tokens.
    pub include: Vec<PlatformPair>,
    /// Explicit pairs removed last.
    pub exclude: Vec<PlatformPair>,
}

impl ResolutionRequest {
    /// Parse raw CLI tokens such as `["all", "-windows"]`.
    pub fn parse<I, S>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = tokens
            .into_iter()
            .map(|t| t.as_ref().parse())
            .collect::<Result<Vec<AliasToken>>>()?;
        Ok(Self {
            tokens,
            ..Self::default()
        })
    }

    pub fn with_include(mut self, pairs: impl IntoIterator<Item = PlatformPair>) -> Self {
        self.include.extend(pairs);
        self
    }

    pub fn with_exclude(mut self, pairs: impl IntoIterator<Item = PlatformPair>) -> Self {
        self.exclude.extend(pairs);
        self
    }

    /// The tokens actually applied: the request's, or the default alias.
    pub fn effective_tokens(&self) -> Vec<AliasToken> {
        if self.tokens.is_empty() {
            vec![AliasToken::add(DEFAULT_ALIAS)]
        } else {
            self.tokens.clone()
        }
    }
}

/// Resolve a request against an alias table.
///
/// An unknown alias aborts the whole resolution. Included pairs must exist
/// in the catalog and take the catalog's metadata.
pub fn resolve(table: &AliasTable, request: &ResolutionRequest) -> Result<PlatformSet> {
    let mut result = PlatformSet::new();
    for token in request.effective_tokens() {
        let members = table
            .get(&token.name)
            .ok_or_else(|| CoreError::UnknownAlias {
                name: token.name.clone(),
            })?;
        result = if token.negate {
            result.difference(members)
        } else {
            result.union(members)
        };
        debug!(token = %token, pairs = result.len(), "applied alias");
    }

    if !request.include.is_empty() {
        let catalog = table.get(ALL).cloned().unwrap_or_default();
        let mut extra = PlatformSet::new();
        for pair in &request.include {
            let canonical = catalog.get(pair).ok_or_else(|| CoreError::UnknownPair {
                pair: pair.to_string(),
            })?;
            extra.insert(canonical.clone());
        }
        result = result.union(&extra);
    }
    if !request.exclude.is_empty() {
        let drop: PlatformSet = request.exclude.iter().cloned().collect();
        result = result.difference(&drop);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::AliasPolicy;

    fn table() -> AliasTable {
        let catalog: PlatformSet = [
            PlatformPair::new("linux", "amd64").with_capabilities(true, true),
            PlatformPair::new("windows", "amd64").with_capabilities(true, true),
            PlatformPair::new("windows", "arm64").with_capabilities(false, false),
            PlatformPair::new("darwin", "arm64").with_capabilities(false, true),
        ]
        .into_iter()
        .collect();
        AliasTable::build(&catalog, &AliasPolicy::default()).unwrap()
    }

    fn run(tokens: &[&str]) -> Result<PlatformSet> {
        resolve(&table(), &ResolutionRequest::parse(tokens)?)
    }

    #[test]
    fn parse_tokens() {
        let t: AliasToken = "-windows".parse().unwrap();
        assert_eq!(t, AliasToken::remove("windows"));
        assert_eq!(t.to_string(), "-windows");
        let t: AliasToken = "first-class".parse().unwrap();
        assert_eq!(t, AliasToken::add("first-class"));
    }

    #[test]
    fn bare_marker_is_rejected() {
        assert!(matches!(
            "-".parse::<AliasToken>(),
            Err(CoreError::EmptyAliasToken { .. })
        ));
        assert!("".parse::<AliasToken>().is_err());
    }

    #[test]
    fn empty_request_equals_first_class() {
        assert_eq!(run(&[]).unwrap(), run(&["first-class"]).unwrap());
        assert_eq!(run(&[]).unwrap().to_string(), "linux/amd64, windows/amd64");
    }

    #[test]
    fn negation_after_union_removes() {
        let s = run(&["all", "-windows"]).unwrap();
        assert_eq!(s.to_string(), "linux/amd64, darwin/arm64");
    }

    #[test]
    fn negation_before_union_has_no_effect() {
        let s = run(&["-windows", "all"]).unwrap();
        assert_eq!(s.len(), 4);
        assert!(s.has(&"windows/arm64".parse().unwrap()));
    }

    #[test]
    fn later_union_re_adds() {
        let s = run(&["all", "-windows", "arm64"]).unwrap();
        assert_eq!(s.to_string(), "linux/amd64, darwin/arm64, windows/arm64");
    }

    #[test]
    fn unknown_alias_aborts() {
        let err = run(&["all", "-nosuch", "linux"]).unwrap_err();
        match err {
            CoreError::UnknownAlias { name } => assert_eq!(name, "nosuch"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn include_uses_catalog_metadata() {
        let request = ResolutionRequest::parse(["linux"])
            .unwrap()
            .with_include(["darwin/arm64".parse().unwrap()]);
        let s = resolve(&table(), &request).unwrap();
        assert_eq!(s.to_string(), "linux/amd64, darwin/arm64");
        assert!(s.get(&"darwin/arm64".parse().unwrap()).unwrap().interop_capable);
    }

    #[test]
    fn include_outside_catalog_is_error() {
        let request = ResolutionRequest::default().with_include(["plan9/386".parse().unwrap()]);
        assert!(matches!(
            resolve(&table(), &request),
            Err(CoreError::UnknownPair { .. })
        ));
    }

    #[test]
    fn exclude_applies_last() {
        let request = ResolutionRequest::parse(["all"])
            .unwrap()
            .with_exclude(["windows/arm64".parse().unwrap()]);
        let s = resolve(&table(), &request).unwrap();
        assert_eq!(s.len(), 3);
        assert!(!s.has(&"windows/arm64".parse().unwrap()));
    }
}
