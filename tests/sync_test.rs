//! Integration tests for working copy synchronization
//!
//! These tests build small upstream repositories with git2, point a manifest
//! at them and run the synchronizer with the real `git` executable.

use extsync::deps::{SyncOptions, WorkingCopyState, sync_all};
use extsync::status::head_matches;
use git2::{Oid, Repository, Signature};
use std::fs;
use std::path::{Path, PathBuf};

struct Fixture {
    _root: tempfile::TempDir,
    upstream: PathBuf,
    externals: PathBuf,
    manifest: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let root = tempfile::tempdir().expect("Failed to create temp dir");
        let upstream = root.path().join("upstream").join("libfoo");
        let externals = root.path().join("project").join("Externals");
        fs::create_dir_all(&externals).expect("Failed to create externals dir");
        Repository::init(&upstream).expect("Failed to init upstream repo");
        let manifest = externals.join("Revisions");
        Self {
            _root: root,
            upstream,
            externals,
            manifest,
        }
    }

    fn upstream_repo(&self) -> Repository {
        Repository::open(&self.upstream).unwrap()
    }

    fn commit(&self, file: &str, contents: &str) -> Oid {
        let repo = self.upstream_repo();
        fs::write(self.upstream.join(file), contents).unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(file)).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = Signature::now("extsync", "extsync@example.com").unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, contents, &tree, &parents)
            .unwrap()
    }

    fn tag(&self, name: &str, oid: Oid) {
        let repo = self.upstream_repo();
        let obj = repo.find_object(oid, None).unwrap();
        repo.tag_lightweight(name, &obj, false).unwrap();
    }

    fn write_manifest(&self, lines: &[String]) {
        fs::write(&self.manifest, lines.join("\n") + "\n").unwrap();
    }

    fn line(&self, name: &str, revision: &str) -> String {
        format!("{} {} {}", name, self.upstream.display(), revision)
    }

    fn working_copy(&self, name: &str) -> PathBuf {
        self.externals.join(name)
    }

    fn head_of(&self, name: &str) -> Oid {
        let repo = Repository::open(self.working_copy(name)).unwrap();
        repo.head().unwrap().peel_to_commit().unwrap().id()
    }

    fn sync(&self) -> anyhow::Result<extsync::deps::SyncReport> {
        sync_all(&self.manifest, &self.externals, &SyncOptions::default())
    }
}

fn git_available() -> bool {
    if extsync::process::is_available("git") {
        true
    } else {
        eprintln!("Skipping test: git executable not found");
        false
    }
}

#[test]
fn test_fresh_sync_clones_at_pinned_revision() {
    if !git_available() {
        return;
    }
    let fx = Fixture::new();
    let first = fx.commit("lib.h", "v1");
    fx.commit("lib.h", "v2");
    fx.write_manifest(&[fx.line("libfoo", &first.to_string())]);

    let report = fx.sync().expect("sync should succeed");

    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].state, WorkingCopyState::Absent);
    assert!(fx.working_copy("libfoo").join(".git").is_dir());
    assert_eq!(fx.head_of("libfoo"), first);
    assert_eq!(
        fs::read_to_string(fx.working_copy("libfoo").join("lib.h")).unwrap(),
        "v1"
    );
}

#[test]
fn test_second_sync_updates_and_is_idempotent() {
    if !git_available() {
        return;
    }
    let fx = Fixture::new();
    let pinned = fx.commit("lib.h", "v1");
    fx.write_manifest(&[fx.line("libfoo", &pinned.to_string())]);

    fx.sync().expect("first sync should succeed");
    let report = fx.sync().expect("second sync should succeed");

    assert_eq!(report.outcomes[0].state, WorkingCopyState::Present);
    assert_eq!(report.updated(), 1);
    assert_eq!(fx.head_of("libfoo"), pinned);
}

#[test]
fn test_update_discards_local_changes_and_moves_to_new_pin() {
    if !git_available() {
        return;
    }
    let fx = Fixture::new();
    let old = fx.commit("lib.h", "old");
    fx.write_manifest(&[fx.line("libfoo", &old.to_string())]);
    fx.sync().expect("initial sync should succeed");

    let new = fx.commit("lib.h", "new");
    fx.write_manifest(&[fx.line("libfoo", &new.to_string())]);
    fs::write(fx.working_copy("libfoo").join("lib.h"), "local edit").unwrap();

    fx.sync().expect("update should succeed");

    assert_eq!(fx.head_of("libfoo"), new);
    assert_eq!(
        fs::read_to_string(fx.working_copy("libfoo").join("lib.h")).unwrap(),
        "new"
    );
}

#[test]
fn test_pin_by_tag() {
    if !git_available() {
        return;
    }
    let fx = Fixture::new();
    let tagged = fx.commit("lib.h", "release");
    fx.tag("v1.0", tagged);
    fx.commit("lib.h", "after release");
    fx.write_manifest(&[fx.line("libfoo", "v1.0")]);

    fx.sync().expect("sync should succeed");

    let repo = Repository::open(fx.working_copy("libfoo")).unwrap();
    assert!(head_matches(&repo, "v1.0"));
    assert_eq!(fx.head_of("libfoo"), tagged);
}

#[test]
fn test_directory_without_git_metadata_is_replaced() {
    if !git_available() {
        return;
    }
    let fx = Fixture::new();
    let pinned = fx.commit("lib.h", "v1");
    fx.write_manifest(&[fx.line("libfoo", &pinned.to_string())]);

    let stale = fx.working_copy("libfoo");
    fs::create_dir_all(stale.join("junk")).unwrap();
    fs::write(stale.join("junk").join("old.o"), "stale").unwrap();

    let report = fx.sync().expect("sync should succeed");

    assert_eq!(report.created(), 1);
    assert!(!stale.join("junk").exists());
    assert_eq!(fx.head_of("libfoo"), pinned);
}

#[test]
fn test_short_lines_do_not_affect_valid_records() {
    if !git_available() {
        return;
    }
    let fx = Fixture::new();
    let pinned = fx.commit("lib.h", "v1");
    fx.write_manifest(&[
        String::new(),
        "lonely".to_string(),
        format!("twofields {}", fx.upstream.display()),
        fx.line("libfoo", &pinned.to_string()),
    ]);

    let report = fx.sync().expect("sync should succeed");

    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].name, "libfoo");
    assert!(!fx.working_copy("lonely").exists());
    assert!(!fx.working_copy("twofields").exists());
}

#[test]
fn test_duplicate_name_last_line_wins() {
    if !git_available() {
        return;
    }
    let fx = Fixture::new();
    let first = fx.commit("lib.h", "v1");
    let second = fx.commit("lib.h", "v2");
    fx.write_manifest(&[
        fx.line("libfoo", &first.to_string()),
        fx.line("libfoo", &second.to_string()),
    ]);

    let report = fx.sync().expect("sync should succeed");

    assert_eq!(report.created(), 1);
    assert_eq!(report.updated(), 1);
    assert_eq!(fx.head_of("libfoo"), second);
}

#[test]
fn test_failing_git_command_aborts_before_next_record() {
    if !git_available() {
        return;
    }
    let fx = Fixture::new();
    let pinned = fx.commit("lib.h", "v1");
    let missing_upstream = fx.upstream.with_file_name("does-not-exist");
    fx.write_manifest(&[
        format!("broken {} {}", missing_upstream.display(), pinned),
        fx.line("libfoo", &pinned.to_string()),
    ]);

    let err = fx.sync().expect_err("clone of a missing upstream must fail");

    let message = format!("{:#}", err);
    assert!(message.contains("Failed to sync 'broken'"));
    assert!(message.contains("clone"));
    assert!(!fx.working_copy("libfoo").exists());
}

#[test]
fn test_unknown_revision_aborts_run() {
    if !git_available() {
        return;
    }
    let fx = Fixture::new();
    fx.commit("lib.h", "v1");
    fx.write_manifest(&[
        fx.line("libfoo", "0000000000000000000000000000000000000bad"),
        fx.line("libbar", "HEAD"),
    ]);

    let err = fx.sync().expect_err("checkout of an unknown revision must fail");

    assert!(format!("{:#}", err).contains("checkout"));
    // The clone itself succeeded and is left as git left it.
    assert!(fx.working_copy("libfoo").join(".git").is_dir());
    assert!(!fx.working_copy("libbar").exists());
}

#[test]
fn test_only_filter_keeps_other_records_untouched() {
    if !git_available() {
        return;
    }
    let fx = Fixture::new();
    let pinned = fx.commit("lib.h", "v1");
    fx.write_manifest(&[
        fx.line("libfoo", &pinned.to_string()),
        fx.line("libbar", &pinned.to_string()),
    ]);

    let options = SyncOptions {
        only: vec!["libbar".to_string()],
        ..SyncOptions::default()
    };
    let report = sync_all(&fx.manifest, &fx.externals, &options).unwrap();

    assert_eq!(report.outcomes.len(), 1);
    assert!(fx.working_copy("libbar").join(".git").is_dir());
    assert!(!fx.working_copy("libfoo").exists());
}
