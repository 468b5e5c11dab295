//! Doctor command handler
//!
//! Handles `extsync doctor`: checks the external tools and the project layout.

use anyhow::Result;
use colored::*;
use std::path::Path;

use crate::config::ExtConfig;
use crate::manifest::Manifest;
use crate::process;

/// Run the `extsync doctor` command to diagnose setup issues.
///
/// Returns `false` when something required for `sync` is missing.
pub fn run_doctor(config: &ExtConfig, project_root: &Path) -> Result<bool> {
    println!("{} Running extsync doctor...", "🚑".red());
    println!("-------------------------------");
    let mut healthy = true;

    print!("Checking OS... ");
    println!(
        "{} ({})",
        std::env::consts::OS.green(),
        std::env::consts::ARCH.cyan()
    );

    print!("Checking Git ({})... ", config.externals.git);
    if process::is_available(&config.externals.git) {
        println!("{}", "Found".green());
    } else {
        println!("{}", "Not Found (Install Git)".red());
        healthy = false;
    }

    print!("Checking CMake ({})... ", config.build.cmake);
    if process::is_available(&config.build.cmake) {
        println!("{}", "Found".green());
    } else {
        println!("{}", "Not Found (Only needed for 'extsync build')".yellow());
    }

    let externals_dir = config.externals_dir(project_root);
    println!("Externals dir: {}", externals_dir.display().to_string().cyan());

    let manifest_path = config.manifest_path(project_root);
    print!("Checking manifest... ");
    match Manifest::load(&manifest_path) {
        Ok(manifest) => println!(
            "{} ({} entries)",
            "OK".green(),
            manifest.dependencies.len()
        ),
        Err(e) => {
            println!("{} {:#}", "Error:".red(), e);
            healthy = false;
        }
    }

    if let Some(name) = &config.build.dependency {
        println!(
            "Build target: {} ({}, generator \"{}\")",
            name.bold(),
            config.build.profiles.join(", "),
            config.build.generator
        );
    }

    Ok(healthy)
}
