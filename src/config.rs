//! Configuration file parsing (`extsync.toml`).
//!
//! The file is optional. Without it every setting falls back to the fixed
//! layout: manifest at `Externals/Revisions`, working copies at
//! `Externals/<name>`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "extsync.toml";

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct ExtConfig {
    pub externals: ExternalsConfig,
    pub build: BuildConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ExternalsConfig {
    /// External storage root, relative to the project root.
    pub dir: String,
    /// Manifest file name, relative to the externals dir.
    pub manifest: String,
    pub git: String,
}

impl Default for ExternalsConfig {
    fn default() -> Self {
        Self {
            dir: "Externals".to_string(),
            manifest: "Revisions".to_string(),
            git: "git".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct BuildConfig {
    /// Dependency built by `extsync build` when no name is given.
    pub dependency: Option<String>,
    pub cmake: String,
    pub generator: String,
    pub build_dir: String,
    pub profiles: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            dependency: None,
            cmake: "cmake".to_string(),
            generator: default_generator(),
            build_dir: "build".to_string(),
            profiles: vec!["Debug".to_string(), "Release".to_string()],
        }
    }
}

fn default_generator() -> String {
    if cfg!(target_os = "windows") {
        "Visual Studio 17 2022".to_string()
    } else {
        "Unix Makefiles".to_string()
    }
}

impl ExtConfig {
    pub fn externals_dir(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.externals.dir)
    }

    pub fn manifest_path(&self, project_root: &Path) -> PathBuf {
        self.externals_dir(project_root).join(&self.externals.manifest)
    }
}

/// Load `extsync.toml` from `project_root`, or the defaults if it is absent.
pub fn load_config(project_root: &Path) -> Result<ExtConfig> {
    let path = project_root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(ExtConfig::default());
    }
    let config_str = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&config_str).with_context(|| {
        format!(
            "Failed to parse {} - check for syntax errors (missing quotes, brackets)",
            path.display()
        )
    })
}
