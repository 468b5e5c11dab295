//! Manifest (`Externals/Revisions`) reading.
//!
//! One record per line: `<name> <url> <revision> [ignored...]`, fields
//! separated by whitespace. Lines with fewer than three fields are skipped.
//! There is no comment syntax and no quoting.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

/// A single pinned external repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub name: String,
    pub url: String,
    pub revision: String,
}

impl Dependency {
    /// Location of the working copy under the externals root.
    pub fn local_path(&self, externals_dir: &Path) -> PathBuf {
        externals_dir.join(&self.name)
    }
}

/// Parse one manifest line. Returns `None` for lines with fewer than three fields.
pub fn parse_line(line: &str) -> Option<Dependency> {
    let mut fields = line.split_whitespace();
    let name = fields.next()?;
    let url = fields.next()?;
    let revision = fields.next()?;
    Some(Dependency {
        name: name.to_string(),
        url: url.to_string(),
        revision: revision.to_string(),
    })
}

/// Lazy reader over a manifest file, yielding records in file order.
///
/// I/O and encoding errors are yielded as `Err` and should end the run.
pub struct ManifestReader {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_no: usize,
}

impl Iterator for ManifestReader {
    type Item = Result<Dependency>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line_no += 1;
            match line {
                Ok(line) => {
                    if let Some(dep) = parse_line(&line) {
                        return Some(Ok(dep));
                    }
                }
                Err(e) => {
                    return Some(Err(e).with_context(|| {
                        format!(
                            "Failed to read {} (line {})",
                            self.path.display(),
                            self.line_no
                        )
                    }));
                }
            }
        }
    }
}

/// Open the manifest at `path` for lazy reading.
pub fn read_manifest(path: &Path) -> Result<ManifestReader> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open manifest {}", path.display()))?;
    Ok(ManifestReader {
        path: path.to_path_buf(),
        lines: BufReader::new(file).lines(),
        line_no: 0,
    })
}

/// Fully loaded manifest, for commands that need random access.
#[derive(Debug, Default)]
pub struct Manifest {
    pub dependencies: Vec<Dependency>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let dependencies = read_manifest(path)?.collect::<Result<Vec<_>>>()?;
        Ok(Self { dependencies })
    }

    /// Look up a record by name. When a name repeats, the last line wins.
    pub fn get(&self, name: &str) -> Option<&Dependency> {
        self.dependencies.iter().rev().find(|dep| dep.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}
