//! Removal of working copies that are no longer in the manifest.
//!
//! Only directories directly under the externals root are considered. Files,
//! including the manifest itself, are left alone.

use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Delete every directory in `externals_dir` whose name is not in `keep`.
///
/// Returns the directories removed (or, with `dry_run`, the ones that would be).
pub fn prune_unused(
    externals_dir: &Path,
    keep: &[String],
    dry_run: bool,
) -> Result<Vec<PathBuf>> {
    if !externals_dir.exists() {
        println!("{} Nothing to prune.", "✓".green());
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(externals_dir)
        .with_context(|| format!("Failed to list {}", externals_dir.display()))?;

    let mut stale = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if !keep.contains(&name) {
            stale.push((name, entry.path()));
        }
    }
    stale.sort();

    if stale.is_empty() {
        println!("{} All working copies are listed in the manifest.", "✓".green());
        return Ok(Vec::new());
    }

    let mut removed = Vec::new();
    for (name, path) in stale {
        if dry_run {
            println!("   {} Would remove: {}", "→".cyan(), name);
        } else {
            println!("   {} Removing unused: {}", "🗑️".red(), name);
            fs::remove_dir_all(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        removed.push(path);
    }

    if !dry_run {
        println!("{} Removed {} unused working copies.", "✓".green(), removed.len());
    }
    Ok(removed)
}
