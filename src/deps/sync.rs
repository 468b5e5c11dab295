//! Working copy synchronization.
//!
//! Each manifest record is brought to its pinned revision with one of two
//! procedures, chosen by a structural check of the target directory:
//!
//! - **Create** (no working copy): wipe the target, clone into it, checkout.
//! - **Update** (working copy present): `fetch --all`, then `checkout --force`.
//!
//! Records are processed strictly in manifest order. The first failing git
//! command aborts the run; nothing is rolled back.

use crate::manifest::{Dependency, read_manifest};
use crate::process::Invocation;
use crate::ui;
use anyhow::{Context, Result};
use colored::*;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkingCopyState {
    Absent,
    Present,
}

impl fmt::Display for WorkingCopyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkingCopyState::Absent => write!(f, "absent"),
            WorkingCopyState::Present => write!(f, "present"),
        }
    }
}

/// A working copy exists iff `path` is a directory with `.git` directly inside.
///
/// This only looks at the layout; it does not validate the repository.
pub fn working_copy_state(path: &Path) -> WorkingCopyState {
    if path.is_dir() && path.join(".git").exists() {
        WorkingCopyState::Present
    } else {
        WorkingCopyState::Absent
    }
}

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub git: String,
    pub dry_run: bool,
    pub verbose: bool,
    /// Restrict the run to these names. Empty means every record.
    pub only: Vec<String>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            git: "git".to_string(),
            dry_run: false,
            verbose: false,
            only: Vec::new(),
        }
    }
}

/// The procedure chosen for one record, before anything runs.
#[derive(Debug, Clone)]
pub struct SyncPlan {
    pub state: WorkingCopyState,
    pub path: PathBuf,
    pub steps: Vec<Invocation>,
}

pub fn plan(dep: &Dependency, externals_dir: &Path, git: &str) -> SyncPlan {
    let path = dep.local_path(externals_dir);
    let state = working_copy_state(&path);
    let steps = match state {
        WorkingCopyState::Absent => vec![
            Invocation::new(git, &path).args(["clone", dep.url.as_str(), "."]),
            Invocation::new(git, &path).args(["checkout", dep.revision.as_str()]),
        ],
        WorkingCopyState::Present => vec![
            Invocation::new(git, &path).args(["fetch", "--all"]),
            Invocation::new(git, &path).args(["checkout", "--force", dep.revision.as_str()]),
        ],
    };
    SyncPlan { state, path, steps }
}

#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub name: String,
    /// State found by the exists check, i.e. which procedure ran.
    pub state: WorkingCopyState,
    pub path: PathBuf,
}

#[derive(Debug, Default)]
pub struct SyncReport {
    pub outcomes: Vec<SyncOutcome>,
}

impl SyncReport {
    pub fn created(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.state == WorkingCopyState::Absent)
            .count()
    }

    pub fn updated(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.state == WorkingCopyState::Present)
            .count()
    }
}

/// Remove whatever is at `path` and leave an empty directory in its place.
///
/// Irreversible: any existing content is deleted, whether or not it was a
/// valid working copy.
pub fn reset_directory(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove {}", path.display()))?,
        Ok(_) => fs::remove_file(path)
            .with_context(|| format!("Failed to remove {}", path.display()))?,
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to inspect {}", path.display()));
        }
    }
    fs::create_dir_all(path).with_context(|| format!("Failed to create {}", path.display()))
}

/// Bring one dependency's working copy to its pinned revision.
pub fn sync_dependency(
    dep: &Dependency,
    externals_dir: &Path,
    options: &SyncOptions,
) -> Result<SyncOutcome> {
    let plan = plan(dep, externals_dir, &options.git);
    let outcome = SyncOutcome {
        name: dep.name.clone(),
        state: plan.state,
        path: plan.path.clone(),
    };

    if options.dry_run {
        let action = match plan.state {
            WorkingCopyState::Absent => "create (wipes target)",
            WorkingCopyState::Present => "update",
        };
        println!(
            "   {} {} @ {} [{}]",
            "→".cyan(),
            dep.name.bold(),
            dep.revision,
            action
        );
        for step in &plan.steps {
            println!("     {}", step.to_string().dimmed());
        }
        return Ok(outcome);
    }

    let verb = match plan.state {
        WorkingCopyState::Absent => "Cloning",
        WorkingCopyState::Present => "Updating",
    };
    let pb = ui::spinner(format!("{} {}...", verb, dep.name));

    if plan.state == WorkingCopyState::Absent
        && let Err(e) = reset_directory(&plan.path)
    {
        pb.finish_with_message(format!("{} Failed {}", "x".red(), dep.name));
        return Err(e);
    }

    for step in &plan.steps {
        if options.verbose {
            pb.suspend(|| println!("     {}", step.to_string().dimmed()));
        }
        if let Err(e) = step.run() {
            pb.finish_with_message(format!("{} Failed {}", "x".red(), dep.name));
            return Err(e).with_context(|| {
                format!("Failed to sync '{}' at {}", dep.name, plan.path.display())
            });
        }
    }

    pb.finish_with_message(format!(
        "{} {} {} @ {}",
        "✓".green(),
        match plan.state {
            WorkingCopyState::Absent => "Created",
            WorkingCopyState::Present => "Updated",
        },
        dep.name,
        short_revision(&dep.revision)
    ));
    Ok(outcome)
}

/// Synchronize every record in the manifest, in file order.
pub fn sync_all(
    manifest_path: &Path,
    externals_dir: &Path,
    options: &SyncOptions,
) -> Result<SyncReport> {
    let reader = read_manifest(manifest_path)?;
    let only: HashSet<&str> = options.only.iter().map(String::as_str).collect();
    let mut seen: HashSet<String> = HashSet::new();
    let mut report = SyncReport::default();

    println!(
        "{} Synchronizing externals in {}{}",
        "📦".blue(),
        externals_dir.display(),
        if options.dry_run { " (dry run)" } else { "" }
    );

    for dep in reader {
        let dep = dep?;
        if !only.is_empty() && !only.contains(dep.name.as_str()) {
            continue;
        }
        seen.insert(dep.name.clone());
        report
            .outcomes
            .push(sync_dependency(&dep, externals_dir, options)?);
    }

    let mut missing: Vec<&str> = only
        .iter()
        .copied()
        .filter(|name| !seen.contains(*name))
        .collect();
    if !missing.is_empty() {
        missing.sort_unstable();
        anyhow::bail!(
            "Not listed in {}: {}",
            manifest_path.display(),
            missing.join(", ")
        );
    }

    if !options.dry_run {
        println!(
            "{} {} externals synchronized ({} created, {} updated)",
            "✓".green(),
            report.outcomes.len(),
            report.created(),
            report.updated()
        );
    }
    Ok(report)
}

fn short_revision(rev: &str) -> &str {
    let is_hash = rev.len() > 12 && rev.chars().all(|c| c.is_ascii_hexdigit());
    if is_hash { &rev[..12] } else { rev }
}
