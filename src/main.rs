//! # extsync CLI Entry Point
//!
//! Parses CLI arguments using clap and routes commands to the library.
//!
//! ## Command Structure
//!
//! - **Sync**: `sync` (the default), `prune`
//! - **Build**: `build`
//! - **Inspect**: `status`, `doctor`
//! - **Shell**: `completion`

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use std::path::{Path, PathBuf};

use extsync::build;
use extsync::commands;
use extsync::config::{self, ExtConfig};
use extsync::deps;
use extsync::manifest::Manifest;
use extsync::status;

#[derive(Parser)]
#[command(name = "extsync")]
#[command(about = "Keep external repositories at their pinned revisions", version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project root containing extsync.toml and the externals dir [default: current dir]
    #[arg(long, global = true)]
    project: Option<PathBuf>,
    /// Print every external command before running it
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Show what would be executed without running
    #[arg(long, global = true)]
    dry_run: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone or update externals to their pinned revisions.
    ///
    /// A directory without a `.git` subdirectory is deleted and cloned afresh.
    /// Local modifications in existing working copies are discarded.
    Sync {
        /// Only synchronize these externals (manifest order is kept)
        names: Vec<String>,
        /// Build afterwards: the named external when exactly one is given,
        /// otherwise build.dependency from extsync.toml
        #[arg(long)]
        build: bool,
    },
    /// Configure, build and install one external with CMake (Debug and Release)
    Build {
        /// External to build [default: build.dependency from extsync.toml]
        name: Option<String>,
    },
    /// Show each external's working copy state and checked-out commit
    Status,
    /// Delete working copies that are not listed in the manifest
    Prune,
    /// Diagnose tool and project setup issues
    Doctor,
    /// Generate shell completion scripts
    Completion { shell: Shell },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let project_root = match &cli.project {
        Some(dir) => std::path::absolute(dir)
            .with_context(|| format!("Invalid project directory {}", dir.display()))?,
        None => std::env::current_dir().context("Could not determine current directory")?,
    };

    match &cli.command {
        None => {
            let config = config::load_config(&project_root)?;
            run_sync(&cli, &config, &project_root, Vec::new())
        }

        Some(Commands::Sync { names, build }) => {
            let config = config::load_config(&project_root)?;
            run_sync(&cli, &config, &project_root, names.clone())?;
            if *build {
                let target = match names.as_slice() {
                    [only] => Some(only.as_str()),
                    _ => None,
                };
                run_build(&cli, &config, &project_root, target)?;
            }
            Ok(())
        }

        Some(Commands::Build { name }) => {
            let config = config::load_config(&project_root)?;
            run_build(&cli, &config, &project_root, name.as_deref())
        }

        Some(Commands::Status) => {
            let config = config::load_config(&project_root)?;
            status::print_status(
                &config.manifest_path(&project_root),
                &config.externals_dir(&project_root),
            )
        }

        Some(Commands::Prune) => {
            let config = config::load_config(&project_root)?;
            let manifest = Manifest::load(&config.manifest_path(&project_root))?;
            let keep: Vec<String> = manifest
                .dependencies
                .into_iter()
                .map(|dep| dep.name)
                .collect();
            deps::prune_unused(&config.externals_dir(&project_root), &keep, cli.dry_run)?;
            Ok(())
        }

        Some(Commands::Doctor) => {
            let config = config::load_config(&project_root)?;
            if !commands::doctor::run_doctor(&config, &project_root)? {
                std::process::exit(1);
            }
            Ok(())
        }

        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, bin_name, &mut std::io::stdout());
            Ok(())
        }
    }
}

fn run_sync(cli: &Cli, config: &ExtConfig, project_root: &Path, only: Vec<String>) -> Result<()> {
    let options = deps::SyncOptions {
        git: config.externals.git.clone(),
        dry_run: cli.dry_run,
        verbose: cli.verbose,
        only,
    };
    deps::sync_all(
        &config.manifest_path(project_root),
        &config.externals_dir(project_root),
        &options,
    )?;
    Ok(())
}

fn run_build(
    cli: &Cli,
    config: &ExtConfig,
    project_root: &Path,
    name: Option<&str>,
) -> Result<()> {
    let Some(name) = name.or(config.build.dependency.as_deref()) else {
        anyhow::bail!(
            "No external to build.\n\n\
            💡 Tip: Pass a name ('extsync build <name>') or set [build] dependency in {}.",
            config::CONFIG_FILE
        );
    };

    let manifest_path = config.manifest_path(project_root);
    let manifest = Manifest::load(&manifest_path)?;
    if !manifest.contains(name) {
        anyhow::bail!("'{}' is not listed in {}", name, manifest_path.display());
    }

    let options = build::BuildOptions {
        dry_run: cli.dry_run,
        verbose: cli.verbose,
    };
    build::build_dependency(
        name,
        &config.externals_dir(project_root),
        &config.build,
        options,
    )
}
