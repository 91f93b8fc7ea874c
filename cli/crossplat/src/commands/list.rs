//! `crossplat list`: show alias names and their platform sets.

use std::path::Path;

use anyhow::{bail, Result};
use crossplat_core::AliasTable;

use super::Project;

/// Print the listing for `names` (all aliases when empty).
pub fn run(project: &Project, catalog: Option<&Path>, names: &[String], targets: bool) -> Result<()> {
    let table = project.alias_table(catalog)?;
    for line in render(&table, names, targets)? {
        println!("{line}");
    }
    Ok(())
}

/// Listing lines: one alias per line, or with `targets` the alias followed
/// by its pairs.
pub fn render(table: &AliasTable, names: &[String], targets: bool) -> Result<Vec<String>> {
    let selected: Vec<&str> = if names.is_empty() {
        table.names().collect()
    } else {
        for name in names {
            if !table.contains(name) {
                bail!("unknown alias '{name}'");
            }
        }
        names.iter().map(String::as_str).collect()
    };

    let mut lines = Vec::new();
    for name in selected {
        if !targets {
            lines.push(name.to_string());
            continue;
        }
        let set = table.get(name).cloned().unwrap_or_default();
        lines.push(format!("{name} ({}):", set.len()));
        lines.extend(set.iter().map(|pair| format!("  {pair}")));
    }
    Ok(lines)
}
