//! The build-execute-package loop.
//!
//! Per target: compile into the target's staging path, then zip the binary
//! into its archive and delete the staging copy. A compiler failure is
//! logged and recorded and the loop moves on. Any failure writing the
//! archive or touching the output directory ends the run immediately.

use std::fs;
use std::path::PathBuf;

use crossplat_bundle::{clean_archives, find_archives, write_single_entry};
use rayon::prelude::*;
use tracing::{error, info, warn};

use crate::compiler::{CompileRequest, Compiler};
use crate::config::BuildConfig;
use crate::error::{BuildError, Result};
use crate::report::{BuildReport, TargetOutcome, TargetReport};
use crate::target::{ResolvedTarget, STAGING_DIR};

/// Runs planned targets through a compiler.
pub struct Orchestrator<'a, C: Compiler + ?Sized> {
    config: &'a BuildConfig,
    compiler: &'a C,
}

impl<'a, C: Compiler + ?Sized> Orchestrator<'a, C> {
    pub fn new(config: &'a BuildConfig, compiler: &'a C) -> Self {
        Self { config, compiler }
    }

    /// Build, package and report every target.
    ///
    /// Returns `Err` only for fatal problems; compile failures are in the
    /// report.
    pub fn run(&self, targets: &[ResolvedTarget]) -> Result<BuildReport> {
        let dry_run = self.config.dry_run;
        info!(count = targets.len(), dry_run, "preparing to build targets");

        let cleaned = self.prepare_output()?;

        let built = if self.config.jobs > 1 && targets.len() > 1 {
            self.run_parallel(targets)
        } else {
            targets
                .iter()
                .map(|t| self.build_one(t))
                .collect::<Result<Vec<_>>>()
        };

        // Staging is removed even when a target aborted the run.
        let removed = if dry_run {
            Ok(())
        } else {
            self.remove_staging()
        };
        let reports = built?;
        removed?;

        Ok(BuildReport {
            dry_run,
            targets: reports,
            cleaned,
        })
    }

    /// Ensure the output directory exists and run the clean step.
    ///
    /// Completes before any target starts.
    fn prepare_output(&self) -> Result<Vec<PathBuf>> {
        let dir = &self.config.output_dir;
        let glob = &self.config.clean_glob;

        if self.config.dry_run {
            if !self.config.clean {
                return Ok(Vec::new());
            }
            let found = find_archives(dir, glob)?;
            for path in &found {
                info!(path = %path.display(), "would remove");
            }
            return Ok(found);
        }

        fs::create_dir_all(dir).map_err(|e| BuildError::io(dir, e))?;
        if self.config.clean {
            Ok(clean_archives(dir, glob)?)
        } else {
            Ok(Vec::new())
        }
    }

    fn remove_staging(&self) -> Result<()> {
        let staging_root = self.config.output_dir.join(STAGING_DIR);
        if staging_root.exists() {
            fs::remove_dir_all(&staging_root).map_err(|e| BuildError::io(&staging_root, e))?;
        }
        Ok(())
    }

    fn run_parallel(&self, targets: &[ResolvedTarget]) -> Result<Vec<TargetReport>> {
        let jobs = self.config.jobs;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .thread_name(|i| format!("crossplat-build-{i}"))
            .build()
            .map_err(|e| BuildError::WorkerPool {
                jobs,
                detail: e.to_string(),
            })?;
        pool.install(|| targets.par_iter().map(|t| self.build_one(t)).collect())
    }

    fn build_one(&self, target: &ResolvedTarget) -> Result<TargetReport> {
        let pair = &target.pair;
        info!(target = %pair, archive = %target.archive_path.display(), "building");

        if self.config.dry_run {
            return Ok(TargetReport {
                pair: pair.clone(),
                outcome: TargetOutcome::Planned,
            });
        }

        let staging_dir = target.staging_dir();
        fs::create_dir_all(&staging_dir).map_err(|e| BuildError::io(&staging_dir, e))?;

        let cgo = self.config.cgo && pair.interop_capable;
        if self.config.cgo && !cgo {
            warn!(target = %pair, "cgo is not supported for this target, building without it");
        }
        let request = CompileRequest {
            pair,
            output: &target.staging_path,
            args: &self.config.build_args,
            cgo,
            strip: self.config.strip,
        };

        let outcome = match self.compiler.compile(&request) {
            Err(e) => {
                error!(target = %pair, error = %e, "build failed");
                if target.staging_path.exists() {
                    fs::remove_file(&target.staging_path)
                        .map_err(|e| BuildError::io(&target.staging_path, e))?;
                }
                TargetOutcome::Failed {
                    error: e.to_string(),
                }
            }
            Ok(()) => {
                write_single_entry(
                    &target.staging_path,
                    &target.archive_path,
                    &target.names.binary,
                )
                .map_err(|source| BuildError::Packaging {
                    target: pair.to_string(),
                    source,
                })?;
                fs::remove_file(&target.staging_path)
                    .map_err(|e| BuildError::io(&target.staging_path, e))?;
                info!(target = %pair, archive = %target.archive_path.display(), "packaged");
                TargetOutcome::Packaged {
                    archive: target.archive_path.clone(),
                }
            }
        };

        Ok(TargetReport {
            pair: pair.clone(),
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::sync::Mutex;

    use crossplat_core::{resolve, AliasPolicy, AliasTable, PlatformPair, PlatformSet, ResolutionRequest};

    use crate::compiler::CompileError;
    use crate::target::plan;

    /// Writes a small file as the "binary" unless the pair is listed in `fail`.
    #[derive(Default)]
    struct FakeCompiler {
        fail: Vec<&'static str>,
        /// Succeed without producing any output.
        produce_nothing: bool,
        calls: Mutex<Vec<(String, bool)>>,
    }

    impl FakeCompiler {
        fn failing(fail: Vec<&'static str>) -> Self {
            Self {
                fail,
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<(String, bool)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Compiler for FakeCompiler {
        fn compile(&self, req: &CompileRequest<'_>) -> std::result::Result<(), CompileError> {
            let name = req.pair.to_string();
            self.calls.lock().unwrap().push((name.clone(), req.cgo));
            if self.fail.contains(&name.as_str()) {
                return Err(CompileError::Other(format!("simulated failure for {name}")));
            }
            if self.produce_nothing {
                return Ok(());
            }
            fs::write(req.output, format!("binary for {name}"))
                .map_err(|e| CompileError::Other(e.to_string()))
        }
    }

    fn catalog() -> PlatformSet {
        [
            PlatformPair::new("linux", "amd64").with_capabilities(true, true),
            PlatformPair::new("windows", "amd64").with_capabilities(true, true),
            PlatformPair::new("darwin", "arm64").with_capabilities(false, true),
        ]
        .into_iter()
        .collect()
    }

    fn config_in(dir: &std::path::Path) -> BuildConfig {
        let mut config = BuildConfig::new("app");
        config.output_dir = dir.join("release");
        config
    }

    fn entry_names(path: &std::path::Path) -> Vec<String> {
        let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn first_class_dry_run_spawns_nothing() {
        let table = AliasTable::build(&catalog(), &AliasPolicy::default()).unwrap();
        let set = resolve(&table, &ResolutionRequest::parse(["first-class"]).unwrap()).unwrap();
        assert_eq!(set.to_string(), "linux/amd64, windows/amd64");

        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.dry_run = true;
        let targets = plan(&set, &config).unwrap();
        let compiler = FakeCompiler::default();

        let report = Orchestrator::new(&config, &compiler).run(&targets).unwrap();

        assert_eq!(report.total(), 2);
        assert!(report
            .targets
            .iter()
            .all(|t| t.outcome == TargetOutcome::Planned));
        assert!(compiler.calls().is_empty());
        assert!(!config.output_dir.exists());
    }

    #[test]
    fn every_success_becomes_single_entry_archive() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let targets = plan(&catalog(), &config).unwrap();
        let compiler = FakeCompiler::default();

        let report = Orchestrator::new(&config, &compiler).run(&targets).unwrap();

        assert!(report.is_success());
        assert_eq!(report.archives().len(), 3);
        let win = config.output_dir.join("app_windows_amd64.zip");
        assert_eq!(entry_names(&win), vec!["app.exe"]);
        let linux = config.output_dir.join("app_linux_amd64.zip");
        assert_eq!(entry_names(&linux), vec!["app"]);
        assert!(!config.output_dir.join(STAGING_DIR).exists());
    }

    #[test]
    fn one_compile_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let targets = plan(&catalog(), &config).unwrap();
        let compiler = FakeCompiler::failing(vec!["windows/amd64"]);

        let report = Orchestrator::new(&config, &compiler).run(&targets).unwrap();

        assert_eq!(compiler.calls().len(), 3);
        assert_eq!(report.archives().len(), 2);
        assert!(!report.is_success());
        let failed: Vec<String> = report.failed().map(|t| t.pair.to_string()).collect();
        assert_eq!(failed, vec!["windows/amd64"]);
        assert!(!config.output_dir.join("app_windows_amd64.zip").exists());
        let on_disk = find_archives(&config.output_dir, "*.zip").unwrap();
        assert_eq!(on_disk.len(), 2);
    }

    #[test]
    fn packaging_failure_aborts_remaining_targets() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let targets = plan(&catalog(), &config).unwrap();
        let compiler = FakeCompiler {
            produce_nothing: true,
            ..FakeCompiler::default()
        };

        let err = Orchestrator::new(&config, &compiler)
            .run(&targets)
            .unwrap_err();

        assert!(matches!(err, BuildError::Packaging { .. }));
        assert_eq!(compiler.calls().len(), 1);
    }

    #[test]
    fn packaging_failure_removes_staged_binaries() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let set: PlatformSet = catalog().only(&["linux"]);
        let targets = plan(&set, &config).unwrap();
        // A directory where the archive should go makes the zip write fail
        // after the binary was staged.
        fs::create_dir_all(&targets[0].archive_path).unwrap();
        let compiler = FakeCompiler::default();

        let err = Orchestrator::new(&config, &compiler)
            .run(&targets)
            .unwrap_err();

        assert!(matches!(err, BuildError::Packaging { .. }));
        assert_eq!(compiler.calls().len(), 1);
        assert!(!targets[0].staging_path.exists());
        assert!(!config.output_dir.join(STAGING_DIR).exists());
    }

    #[test]
    fn clean_runs_before_building() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.clean = true;
        fs::create_dir_all(&config.output_dir).unwrap();
        let stale = config.output_dir.join("old_plan9_386.zip");
        fs::write(&stale, b"stale").unwrap();
        let keep = config.output_dir.join("README.txt");
        fs::write(&keep, b"keep").unwrap();

        let set: PlatformSet = catalog().only(&["linux"]);
        let targets = plan(&set, &config).unwrap();
        let report = Orchestrator::new(&config, &FakeCompiler::default())
            .run(&targets)
            .unwrap();

        assert_eq!(report.cleaned, vec![stale.clone()]);
        assert!(!stale.exists());
        assert!(keep.exists());
        assert!(config.output_dir.join("app_linux_amd64.zip").exists());
    }

    #[test]
    fn dry_run_clean_only_lists() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.clean = true;
        config.dry_run = true;
        fs::create_dir_all(&config.output_dir).unwrap();
        let stale = config.output_dir.join("old.zip");
        fs::write(&stale, b"stale").unwrap();

        let targets = plan(&catalog(), &config).unwrap();
        let report = Orchestrator::new(&config, &FakeCompiler::default())
            .run(&targets)
            .unwrap();

        assert_eq!(report.cleaned, vec![stale.clone()]);
        assert!(stale.exists());
    }

    #[test]
    fn cgo_only_for_capable_targets() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.cgo = true;
        let set: PlatformSet = [
            PlatformPair::new("linux", "amd64").with_capabilities(true, true),
            PlatformPair::new("js", "wasm").with_capabilities(false, false),
        ]
        .into_iter()
        .collect();
        let targets = plan(&set, &config).unwrap();
        let compiler = FakeCompiler::default();

        Orchestrator::new(&config, &compiler).run(&targets).unwrap();

        assert_eq!(
            compiler.calls(),
            vec![
                ("linux/amd64".to_string(), true),
                ("js/wasm".to_string(), false)
            ]
        );
    }

    #[test]
    fn parallel_run_keeps_report_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.jobs = 4;
        let set: PlatformSet = [
            "linux/amd64",
            "linux/arm64",
            "linux/386",
            "windows/amd64",
            "darwin/arm64",
        ]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
        let targets = plan(&set, &config).unwrap();
        let compiler = FakeCompiler::failing(vec!["linux/386"]);

        let report = Orchestrator::new(&config, &compiler).run(&targets).unwrap();

        let order: Vec<String> = report.targets.iter().map(|t| t.pair.to_string()).collect();
        let planned: Vec<String> = targets.iter().map(|t| t.pair.to_string()).collect();
        assert_eq!(order, planned);
        assert_eq!(compiler.calls().len(), 5);
        assert_eq!(report.archives().len(), 4);
        assert_eq!(report.failed().count(), 1);
    }
}
