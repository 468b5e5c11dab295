//! Working copy management for manifest entries.
//!
//! - **Sync**: clone or update each external to its pinned revision
//! - **Prune**: delete working copies no longer listed in the manifest
//!
//! ## Commands
//!
//! - `extsync sync [NAMES...]` - Synchronize all (or the named) externals
//! - `extsync prune` - Remove unlisted working copies

mod prune;
mod sync;

pub use prune::prune_unused;
pub use sync::{
    SyncOptions, SyncOutcome, SyncPlan, SyncReport, WorkingCopyState, plan, reset_directory,
    sync_all, sync_dependency, working_copy_state,
};
