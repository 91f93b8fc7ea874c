//! Per-target outcomes of a build run.

use std::fmt;
use std::path::PathBuf;

use crossplat_core::PlatformPair;

/// What happened to one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetOutcome {
    /// Dry run: the target was planned only.
    Planned,
    /// Compiled and archived.
    Packaged { archive: PathBuf },
    /// The compiler failed; no archive was produced.
    Failed { error: String },
}

/// Outcome of one target, keyed by its pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReport {
    pub pair: PlatformPair,
    pub outcome: TargetOutcome,
}

/// Summary of a build run, in resolved-target order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub dry_run: bool,
    pub targets: Vec<TargetReport>,
    /// Archives removed by the clean step (or that would be, in a dry run).
    pub cleaned: Vec<PathBuf>,
}

impl BuildReport {
    pub fn total(&self) -> usize {
        self.targets.len()
    }

    pub fn packaged(&self) -> impl Iterator<Item = &TargetReport> {
        self.targets
            .iter()
            .filter(|t| matches!(t.outcome, TargetOutcome::Packaged { .. }))
    }

    pub fn failed(&self) -> impl Iterator<Item = &TargetReport> {
        self.targets
            .iter()
            .filter(|t| matches!(t.outcome, TargetOutcome::Failed { .. }))
    }

    pub fn archives(&self) -> Vec<&PathBuf> {
        self.targets
            .iter()
            .filter_map(|t| match &t.outcome {
                TargetOutcome::Packaged { archive } => Some(archive),
                _ => None,
            })
            .collect()
    }

    /// True when no target failed to compile.
    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dry_run {
            let total = self.total();
            let noun = if total == 1 { "target" } else { "targets" };
            return write!(f, "dry run: {total} {noun} planned");
        }
        let failed = self.failed().count();
        write!(
            f,
            "{} of {} targets packaged",
            self.packaged().count(),
            self.total()
        )?;
        if failed > 0 {
            let names: Vec<String> = self.failed().map(|t| t.pair.to_string()).collect();
            write!(f, ", {failed} failed ({})", names.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(outcomes: Vec<(&str, TargetOutcome)>) -> BuildReport {
        BuildReport {
            dry_run: false,
            targets: outcomes
                .into_iter()
                .map(|(p, outcome)| TargetReport {
                    pair: p.parse().unwrap(),
                    outcome,
                })
                .collect(),
            cleaned: Vec::new(),
        }
    }

    #[test]
    fn summary_with_failure() {
        let r = report(vec![
            (
                "linux/amd64",
                TargetOutcome::Packaged {
                    archive: "release/app_linux_amd64.zip".into(),
                },
            ),
            (
                "windows/386",
                TargetOutcome::Failed {
                    error: "go exited with exit status: 1".into(),
                },
            ),
        ]);
        assert!(!r.is_success());
        assert_eq!(r.archives().len(), 1);
        assert_eq!(
            r.to_string(),
            "1 of 2 targets packaged, 1 failed (windows/386)"
        );
    }

    #[test]
    fn dry_run_summary() {
        let mut r = report(vec![("linux/amd64", TargetOutcome::Planned)]);
        r.dry_run = true;
        assert!(r.is_success());
        assert_eq!(r.to_string(), "dry run: 1 target planned");

        r.targets.push(TargetReport {
            pair: "windows/arm64".parse().unwrap(),
            outcome: TargetOutcome::Planned,
        });
        assert_eq!(r.to_string(), "dry run: 2 targets planned");
    }
}
