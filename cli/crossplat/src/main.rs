//! crossplat: cross-compile a Go project for a set of platforms and bundle
//! each binary into its own zip archive.

mod commands;
mod gomod;
mod manifest;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use crossplat_core::PlatformPair;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::build::BuildOptions;
use commands::Project;

#[derive(Parser)]
#[command(name = "crossplat", version, about = "Cross-compile and bundle Go binaries")]
struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and bundle the selected platforms
    Build {
        /// Output directory (default: release)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Executable name (default: last segment of the go.mod module path)
        #[arg(long)]
        name: Option<String>,
        /// Template for the binary inside each archive
        #[arg(long)]
        name_template: Option<String>,
        /// Template for the archive file name
        #[arg(long)]
        bundle_template: Option<String>,
        /// Remove existing archives from the output directory first
        #[arg(long)]
        clean: bool,
        /// Print what would be built without compiling or writing anything
        #[arg(long, alias = "dry-run")]
        dry: bool,
        /// Enable cgo for targets that support it
        #[arg(long)]
        cgo: bool,
        /// Strip symbol tables and debug information
        #[arg(long)]
        strip: bool,
        /// Number of targets built concurrently
        #[arg(short, long)]
        jobs: Option<usize>,
        /// Print the resolved targets and their archive paths
        #[arg(long)]
        show_targets: bool,
        /// Add an explicit os/arch pair after alias resolution
        #[arg(long, value_name = "OS/ARCH")]
        include: Vec<PlatformPair>,
        /// Remove an explicit os/arch pair after alias resolution
        #[arg(long, value_name = "OS/ARCH")]
        exclude: Vec<PlatformPair>,
        /// Read the platform catalog from a JSON file instead of `go tool dist list -json`
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Aliases to build, applied left to right; prefix with '-' to remove
        #[arg(allow_hyphen_values = true, value_name = "ALIAS")]
        aliases: Vec<String>,
        /// Arguments passed to `go build` (after `--`)
        #[arg(last = true)]
        build_args: Vec<String>,
    },
    /// List aliases, or with --targets the platforms each alias names
    List {
        /// Show the platforms of each alias
        #[arg(long)]
        targets: bool,
        /// Read the platform catalog from a JSON file
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Aliases to show (default: all)
        #[arg(value_name = "ALIAS")]
        aliases: Vec<String>,
    },
    /// Remove archives from the output directory
    Clean {
        /// Output directory (default: release)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Pattern of files to remove (default: *.zip)
        #[arg(long)]
        glob: Option<String>,
    },
    /// Write a starter crossplat.toml
    Init {
        /// Executable name (default: from go.mod)
        #[arg(long)]
        name: Option<String>,
    },
    /// Check toolchain and project status
    Doctor,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// Install a stderr subscriber. `RUST_LOG` wins over the flags.
fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,crossplat={level},crossplat_core={level},crossplat_bundle={level},crossplat_build={level}"
        ))
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Build {
            output_dir,
            name,
            name_template,
            bundle_template,
            clean,
            dry,
            cgo,
            strip,
            jobs,
            show_targets,
            include,
            exclude,
            catalog,
            aliases,
            build_args,
        } => {
            let project = Project::discover(&cwd)?;
            let (aliases, build_args) = split_passthrough(aliases, build_args);
            let options = BuildOptions {
                output_dir,
                name,
                name_template,
                bundle_template,
                clean,
                dry_run: dry,
                cgo,
                strip,
                jobs,
                show_targets,
                include,
                exclude,
                catalog,
                aliases,
                build_args,
            };
            commands::build::run(&project, &options)
        }

        Commands::List {
            targets,
            catalog,
            aliases,
        } => {
            let project = Project::discover(&cwd)?;
            commands::list::run(&project, catalog.as_deref(), &aliases, targets)
        }

        Commands::Clean { output_dir, glob } => {
            let project = Project::discover(&cwd)?;
            commands::clean::run(&project, output_dir.as_deref(), glob.as_deref())
        }

        Commands::Init { name } => commands::init::run(&cwd, name.as_deref()),

        Commands::Doctor => commands::doctor::run(&cwd),
    }
}

/// Hyphen-valued aliases swallow a literal `--`; everything after it belongs
/// to the compiler.
fn split_passthrough(
    mut aliases: Vec<String>,
    build_args: Vec<String>,
) -> (Vec<String>, Vec<String>) {
    let Some(at) = aliases.iter().position(|a| a == "--") else {
        return (aliases, build_args);
    };
    let mut passthrough = aliases.split_off(at + 1);
    aliases.truncate(at);
    passthrough.extend(build_args);
    (aliases, passthrough)
}
