use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::aggregate::PositionPolicy;
use crate::output::ReportFormat;

/// Optional settings file. Every key may be omitted; command-line flags take
/// precedence over anything set here.
///
/// ```toml
/// dir = "~/Downloads"
/// pattern = "genome_*.zip"
/// positions = "global"
/// format = "json"
/// ```
#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub input: Option<PathBuf>,
    pub dir: Option<PathBuf>,
    pub pattern: Option<String>,
    pub recursive: Option<bool>,
    pub reference: Option<PathBuf>,
    pub positions: Option<PositionPolicy>,
    pub format: Option<ReportFormat>,
    pub output: Option<PathBuf>,
    pub color: Option<bool>,
    pub header_check: Option<bool>,
    pub lookup_url: Option<String>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_settings() -> Result<()> {
        let settings = Settings::parse(
            r#"
            pattern = "genome_*.zip"
            recursive = true
            positions = "global"
            format = "tsv"
            color = false
            "#,
        )?;

        assert_eq!(settings.pattern.as_deref(), Some("genome_*.zip"));
        assert_eq!(settings.recursive, Some(true));
        assert_eq!(settings.positions, Some(PositionPolicy::Global));
        assert_eq!(settings.format, Some(ReportFormat::Tsv));
        assert_eq!(settings.color, Some(false));
        assert_eq!(settings.input, None);
        Ok(())
    }

    #[test]
    fn test_empty_settings() -> Result<()> {
        assert_eq!(Settings::parse("")?, Settings::default());
        Ok(())
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(Settings::parse("threads = 8").is_err());
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "positions = \"adjacent-only\"")?;
        writeln!(file, "lookup_url = \"https://example.org/snp/\"")?;
        file.flush()?;

        let settings = Settings::load(file.path())?;
        assert_eq!(settings.positions, Some(PositionPolicy::AdjacentOnly));
        assert_eq!(settings.lookup_url.as_deref(), Some("https://example.org/snp/"));
        Ok(())
    }
}
