//! CMake configure + build/install of one synchronized external.
//!
//! For every profile (Debug, then Release by default) two commands run from
//! `<working copy>/<build_dir>`:
//!
//! ```text
//! cmake <working copy> -G <generator> -DCMAKE_INSTALL_PREFIX=<profile>
//! cmake --build . --config <profile> --target install
//! ```
//!
//! The build directory is created when missing and never cleaned.

use crate::config::BuildConfig;
use crate::deps::{WorkingCopyState, working_copy_state};
use crate::process::Invocation;
use crate::ui;
use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Configure and build commands for one profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStep {
    pub profile: String,
    pub configure: Invocation,
    pub build: Invocation,
}

#[derive(Debug, Clone)]
pub struct BuildPlan {
    pub source_dir: PathBuf,
    pub build_dir: PathBuf,
    pub steps: Vec<BuildStep>,
}

impl BuildPlan {
    pub fn new(source_dir: &Path, settings: &BuildConfig) -> Self {
        let build_dir = source_dir.join(&settings.build_dir);
        let steps = settings
            .profiles
            .iter()
            .map(|profile| BuildStep {
                profile: profile.clone(),
                configure: Invocation::new(&settings.cmake, &build_dir)
                    .arg(source_dir.to_string_lossy())
                    .args(["-G", settings.generator.as_str()])
                    .arg(format!("-DCMAKE_INSTALL_PREFIX={}", profile)),
                build: Invocation::new(&settings.cmake, &build_dir).args([
                    "--build",
                    ".",
                    "--config",
                    profile.as_str(),
                    "--target",
                    "install",
                ]),
            })
            .collect();

        Self {
            source_dir: source_dir.to_path_buf(),
            build_dir,
            steps,
        }
    }

    /// Every command in execution order.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.steps
            .iter()
            .flat_map(|step| [step.configure.clone(), step.build.clone()])
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    pub dry_run: bool,
    pub verbose: bool,
}

/// Execute a plan. The first failing command aborts the remaining steps.
pub fn run_build(name: &str, plan: &BuildPlan, options: BuildOptions) -> Result<()> {
    if options.dry_run {
        println!(
            "{} Would build {} in {}",
            "→".cyan(),
            name.bold(),
            plan.build_dir.display()
        );
        for inv in plan.invocations() {
            println!("     {}", inv.to_string().dimmed());
        }
        return Ok(());
    }

    fs::create_dir_all(&plan.build_dir)
        .with_context(|| format!("Failed to create {}", plan.build_dir.display()))?;

    for step in &plan.steps {
        run_step(
            &step.configure,
            format!("Configuring {} ({})...", name, step.profile),
            options,
        )
        .with_context(|| format!("CMake configure failed for '{}' ({})", name, step.profile))?;

        run_step(
            &step.build,
            format!("Building {} ({})...", name, step.profile),
            options,
        )
        .with_context(|| format!("CMake build failed for '{}' ({})", name, step.profile))?;

        println!("   {} {}", "✓".green(), step.profile);
    }
    Ok(())
}

fn run_step(inv: &Invocation, message: String, options: BuildOptions) -> Result<()> {
    let pb = ui::spinner(message);
    if options.verbose {
        pb.suspend(|| println!("     {}", inv.to_string().dimmed()));
    }
    match inv.run() {
        Ok(_) => {
            pb.finish_and_clear();
            Ok(())
        }
        Err(e) => {
            pb.finish_with_message(format!("{} {}", "x".red(), inv.to_string().dimmed()));
            Err(e.into())
        }
    }
}

/// Build the working copy of `name` under `externals_dir`.
pub fn build_dependency(
    name: &str,
    externals_dir: &Path,
    settings: &BuildConfig,
    options: BuildOptions,
) -> Result<()> {
    // Configure runs from the build dir, so the source argument must not be relative.
    let source_dir = std::path::absolute(externals_dir.join(name))
        .with_context(|| format!("Failed to resolve working copy path for '{}'", name))?;
    if working_copy_state(&source_dir) != WorkingCopyState::Present && !options.dry_run {
        anyhow::bail!(
            "No working copy for '{}' at {}\n\n\
            💡 Tip: Run 'extsync sync {}' first.",
            name,
            source_dir.display(),
            name
        );
    }

    println!("{} Building {} with CMake...", "🔨".yellow(), name.bold());
    let plan = BuildPlan::new(&source_dir, settings);
    run_build(name, &plan, options)?;
    if !options.dry_run {
        println!("{} Built {}", "✓".green(), name);
    }
    Ok(())
}
