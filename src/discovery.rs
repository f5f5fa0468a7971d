use anyhow::{anyhow, bail, Context, Result};
use dialoguer::{theme::ColorfulTheme, Select};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Default name of a 23andMe raw data download
pub const DEFAULT_PATTERN: &str = "genome_*.txt";

/// Finds raw data files whose name matches a glob pattern
pub struct FileDiscovery {
    pattern: String,
    matcher: Regex,
    recursive: bool,
}

impl FileDiscovery {
    pub fn new(pattern: &str, recursive: bool) -> Result<Self> {
        Ok(Self {
            pattern: pattern.to_string(),
            matcher: glob_to_regex(pattern)?,
            recursive,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| self.matcher.is_match(&name.to_string_lossy()))
            .unwrap_or(false)
    }

    /// Matching files under `dir`, sorted by path
    pub fn discover(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        if self.recursive {
            for entry in WalkDir::new(dir)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if path.is_file() && self.matches(path) {
                    files.push(path.to_path_buf());
                }
            }
        } else {
            let entries = fs::read_dir(dir)
                .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

            for entry in entries {
                let entry = entry.with_context(|| {
                    format!("Failed to read directory entry in: {}", dir.display())
                })?;
                let path = entry.path();

                if path.is_file() && self.matches(&path) {
                    files.push(path);
                }
            }
        }

        files.sort();
        debug!(
            "Found {} files matching {} in {}",
            files.len(),
            self.pattern,
            dir.display()
        );
        Ok(files)
    }

    /// Pick one file from the candidates. A single candidate is taken as is;
    /// several are offered as a numbered menu when someone is at the terminal.
    pub fn select(&self, files: &[PathBuf], interactive: bool) -> Result<PathBuf> {
        match files {
            [] => bail!("Sorry, didn't find any files matching: {}", self.pattern),
            [only] => {
                info!("Using {}", only.display());
                Ok(only.clone())
            }
            _ if !interactive => {
                let names: Vec<String> = files.iter().map(|f| f.display().to_string()).collect();
                Err(anyhow!(
                    "Found {} files matching {}; pass --input to choose one of: {}",
                    files.len(),
                    self.pattern,
                    names.join(", ")
                ))
            }
            _ => {
                let items: Vec<String> = files.iter().map(|f| f.display().to_string()).collect();
                let choice = Select::with_theme(&ColorfulTheme::default())
                    .with_prompt(format!(
                        "Found the following files matching {}. Select one to process",
                        self.pattern
                    ))
                    .default(0)
                    .items(&items)
                    .interact()
                    .context("File selection was cancelled")?;
                Ok(files[choice].clone())
            }
        }
    }
}

/// Translate a shell glob (`*`, `?`) into an anchored file-name regex
fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let escaped = regex::escape(pattern)
        .replace(r"\*", "[^/]*")
        .replace(r"\?", "[^/]");
    Regex::new(&format!("^{}$", escaped))
        .with_context(|| format!("Invalid file pattern: {}", pattern))
}
