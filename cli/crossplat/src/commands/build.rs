//! `crossplat build`: resolve aliases, compile each target and bundle it.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use crossplat_build::{plan, BuildConfig, BuildReport, Compiler, GoCompiler, Orchestrator};
use crossplat_core::{resolve, PlatformPair, PlatformSet, ResolutionRequest};
use tracing::{info, warn};

use super::Project;

/// Flags of `crossplat build`. `None` and empty values defer to
/// `crossplat.toml`, then `go.mod`, then built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub output_dir: Option<PathBuf>,
    pub name: Option<String>,
    pub name_template: Option<String>,
    pub bundle_template: Option<String>,
    pub clean: bool,
    pub dry_run: bool,
    pub cgo: bool,
    pub strip: bool,
    pub jobs: Option<usize>,
    pub show_targets: bool,
    pub include: Vec<PlatformPair>,
    pub exclude: Vec<PlatformPair>,
    pub catalog: Option<PathBuf>,
    pub aliases: Vec<String>,
    pub build_args: Vec<String>,
}

/// Run a build with the `go` toolchain and fail if any target failed.
pub fn run(project: &Project, options: &BuildOptions) -> Result<()> {
    let command = project.manifest.toolchain_command();
    let compiler = if options.dry_run {
        GoCompiler::new(command)
    } else {
        GoCompiler::locate(command)?
    };
    let report = execute(project, options, &compiler)?;
    println!("{report}");
    ensure_success(&report)
}

/// Any failed target fails the command, after the other archives are written.
pub fn ensure_success(report: &BuildReport) -> Result<()> {
    if !report.is_success() {
        bail!(
            "{} of {} targets failed to build",
            report.failed().count(),
            report.total()
        );
    }
    Ok(())
}

/// Resolve, plan and run a build with the given compiler.
pub fn execute(
    project: &Project,
    options: &BuildOptions,
    compiler: &dyn Compiler,
) -> Result<BuildReport> {
    let config = build_config(project, options)?;
    if let Some(version) = &config.toolchain_version {
        info!(go = %version, "go.mod toolchain version");
    }

    let set = select_targets(project, options)?;
    if set.is_empty() {
        warn!("no targets selected");
    }

    let targets = plan(&set, &config)?;
    if options.show_targets {
        for target in &targets {
            println!("{:<20} {}", target.pair.to_string(), target.archive_path.display());
        }
    }

    let report = Orchestrator::new(&config, compiler).run(&targets)?;
    Ok(report)
}

/// Merge flags, `crossplat.toml` and `go.mod` into a build configuration.
pub fn build_config(project: &Project, options: &BuildOptions) -> Result<BuildConfig> {
    let section = &project.manifest.build;
    let name = options
        .name
        .clone()
        .or_else(|| section.name.clone())
        .or_else(|| project.module.as_ref().map(|m| m.default_name().to_string()));
    let Some(name) = name else {
        bail!("no executable name: pass --name, set build.name in crossplat.toml, or run next to a go.mod");
    };

    let mut config = BuildConfig::new(name);
    config.output_dir = project.output_dir(options.output_dir.as_deref());
    config.toolchain_version = project.module.as_ref().and_then(|m| m.go_version.clone());
    if let Some(t) = options.name_template.as_ref().or(section.name_template.as_ref()) {
        config.binary_template = t.clone();
    }
    if let Some(t) = options
        .bundle_template
        .as_ref()
        .or(section.bundle_template.as_ref())
    {
        config.archive_template = t.clone();
    }
    if let Some(glob) = &section.clean_glob {
        config.clean_glob = glob.clone();
    }
    config.build_args = if options.build_args.is_empty() {
        section.args.clone()
    } else {
        options.build_args.clone()
    };
    config.jobs = options.jobs.or(section.jobs).unwrap_or(1);
    config.clean = options.clean;
    config.dry_run = options.dry_run;
    config.cgo = options.cgo;
    config.strip = options.strip;

    config.renderer().context("invalid build configuration")?;
    Ok(config)
}

/// Resolve the requested aliases plus explicit includes and excludes.
pub fn select_targets(project: &Project, options: &BuildOptions) -> Result<PlatformSet> {
    let table = project.alias_table(options.catalog.as_deref())?;
    let tokens = if options.aliases.is_empty() {
        &project.manifest.build.aliases
    } else {
        &options.aliases
    };
    let request = ResolutionRequest::parse(tokens)?
        .with_include(options.include.iter().cloned())
        .with_exclude(options.exclude.iter().cloned());
    Ok(resolve(&table, &request)?)
}
