//! Read-only status of every manifest entry.
//!
//! Shows whether each working copy exists and which commit it has checked
//! out, using `git2` so that nothing is spawned and nothing is modified.
//!
//! ## Example Output
//!
//! ```text
//!   ┌────────┬──────────┬─────────┬──────────────┐
//!   │ Name   │ Pinned   │ State   │ HEAD         │
//!   ├────────┼──────────┼─────────┼──────────────┤
//!   │ glfw   │ 3.3.9    │ present │ 7b6aead9fb88 │
//!   │ assimp │ v5.3.1   │ absent  │ -            │
//!   └────────┴──────────┴─────────┴──────────────┘
//! ```

use crate::deps::{WorkingCopyState, working_copy_state};
use crate::manifest::{Dependency, Manifest};
use crate::ui;
use anyhow::Result;
use colored::*;
use git2::Repository;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyStatus {
    pub name: String,
    pub revision: String,
    pub state: WorkingCopyState,
    /// Full id of the checked-out commit, if it could be read.
    pub head: Option<String>,
    /// Whether HEAD is the commit the pinned revision resolves to.
    pub pinned: bool,
}

/// Whether HEAD points at the commit `revision` resolves to.
///
/// `revision` may be a full or short commit id, or a tag.
pub fn head_matches(repo: &Repository, revision: &str) -> bool {
    let Ok(head) = repo.head().and_then(|h| h.peel_to_commit()) else {
        return false;
    };
    repo.revparse_single(revision)
        .and_then(|obj| obj.peel_to_commit())
        .is_ok_and(|pinned| pinned.id() == head.id())
}

pub fn inspect(dep: &Dependency, externals_dir: &Path) -> DependencyStatus {
    let path = dep.local_path(externals_dir);
    let state = working_copy_state(&path);

    let mut status = DependencyStatus {
        name: dep.name.clone(),
        revision: dep.revision.clone(),
        state,
        head: None,
        pinned: false,
    };

    if state == WorkingCopyState::Present
        && let Ok(repo) = Repository::open(&path)
    {
        if let Ok(commit) = repo.head().and_then(|h| h.peel_to_commit()) {
            status.head = Some(commit.id().to_string());
        }
        status.pinned = head_matches(&repo, &dep.revision);
    }
    status
}

pub fn print_status(manifest_path: &Path, externals_dir: &Path) -> Result<()> {
    let manifest = Manifest::load(manifest_path)?;

    if manifest.dependencies.is_empty() {
        println!("{} No externals listed in {}", "ℹ".blue(), manifest_path.display());
        return Ok(());
    }

    let mut table = ui::Table::new(&["Name", "Pinned", "State", "HEAD"]);
    let mut drifted = 0;
    for dep in &manifest.dependencies {
        let status = inspect(dep, externals_dir);
        let state = match status.state {
            WorkingCopyState::Present => status.state.to_string().green(),
            WorkingCopyState::Absent => status.state.to_string().yellow(),
        };
        let head = match &status.head {
            Some(id) if status.pinned => id[..12.min(id.len())].to_string(),
            Some(id) => {
                drifted += 1;
                format!("{} (not pinned)", &id[..12.min(id.len())])
                    .red()
                    .to_string()
            }
            None => "-".dimmed().to_string(),
        };
        table.add_row(vec![status.name, status.revision, state.to_string(), head]);
    }
    table.print();

    if drifted > 0 {
        println!(
            "{} {} working copies are off their pinned revision. Run 'extsync sync'.",
            "!".yellow(),
            drifted
        );
    }
    Ok(())
}
