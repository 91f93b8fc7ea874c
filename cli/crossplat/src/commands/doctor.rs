//! `crossplat doctor`: toolchain and project diagnostics.

use std::path::Path;
use std::process::Command;

use anyhow::Result;

use crate::gomod::GoModule;
use crate::manifest::CrossplatManifest;

/// Print toolchain and project status. Problems are reported, not raised.
pub fn run(cwd: &Path) -> Result<()> {
    println!("=== crossplat doctor ===");
    println!();
    println!("crossplat version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("--- Project ---");
    let (manifest, dir) = match CrossplatManifest::find_and_load(cwd) {
        Ok(Some((manifest, dir))) => {
            println!("  crossplat.toml: found at {}", dir.display());
            (manifest, dir)
        }
        Ok(None) => {
            println!("  crossplat.toml: not found (defaults apply)");
            (CrossplatManifest::default(), cwd.to_path_buf())
        }
        Err(e) => {
            println!("  crossplat.toml: error: {e:#}");
            (CrossplatManifest::default(), cwd.to_path_buf())
        }
    };
    match GoModule::load(&dir) {
        Ok(Some(module)) => {
            println!("  go.mod module:  {}", module.path);
            println!("  default name:   {}", module.default_name());
            if let Some(version) = &module.go_version {
                println!("  go directive:   {version}");
            }
        }
        Ok(None) => println!("  go.mod: not found (pass --name when building)"),
        Err(e) => println!("  go.mod: error: {e:#}"),
    }
    println!();

    println!("--- Toolchain ---");
    let command = manifest.toolchain_command();
    match which::which(command) {
        Ok(path) => {
            println!("  {command}: {}", path.display());
            print_tool_output(&path, &["version"]);
            match Command::new(&path).args(["tool", "dist", "list"]).output() {
                Ok(out) if out.status.success() => {
                    let count = String::from_utf8_lossy(&out.stdout).lines().count();
                    println!("  platforms:  {count}");
                }
                _ => println!("  platforms:  catalog query failed"),
            }
        }
        Err(_) => println!("  {command}: not found on PATH"),
    }

    Ok(())
}

fn print_tool_output(program: &Path, args: &[&str]) {
    match Command::new(program).args(args).output() {
        Ok(output) => {
            let text = String::from_utf8_lossy(&output.stdout);
            let first_line = text.lines().next().unwrap_or("(unknown version)");
            println!("  version:    {first_line}");
        }
        Err(_) => println!("  version:    unavailable"),
    }
}
