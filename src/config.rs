use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{Result, ScraperError};

pub const DEFAULT_CONFIG_PATH: &str = "watch_scraper.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extraction: ExtractionConfig,
    pub logging: LoggingConfig,
}

/// Brands appended after the built-in tables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub extra_multi_word_brands: Vec<String>,
    pub extra_single_word_brands: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: String,
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: "logs".to_string(),
            file_prefix: "watch_scraper.log".to_string(),
        }
    }
}

impl Config {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(path).map_err(|e| {
            ScraperError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let extraction = &self.extraction;
        for name in extraction
            .extra_multi_word_brands
            .iter()
            .chain(&extraction.extra_single_word_brands)
        {
            if name.trim().is_empty() {
                return Err(ScraperError::Config("Brand names must not be blank".to_string()));
            }
        }

        for name in &extraction.extra_multi_word_brands {
            if !name.trim().contains([' ', '-']) {
                return Err(ScraperError::Config(format!(
                    "'{}' is listed as a multi-word brand but has a single word",
                    name
                )));
            }
        }

        if self.logging.directory.trim().is_empty() {
            return Err(ScraperError::Config("Log directory must not be blank".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("absent.toml")).unwrap();

        assert!(config.extraction.extra_multi_word_brands.is_empty());
        assert_eq!(config.logging.directory, "logs");
    }

    #[test]
    fn test_load_extra_brands() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[extraction]
extra_multi_word_brands = ["Baume & Mercier"]
extra_single_word_brands = ["Nomos"]

[logging]
directory = "var/log"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.extraction.extra_multi_word_brands, vec!["Baume & Mercier"]);
        assert_eq!(config.extraction.extra_single_word_brands, vec!["Nomos"]);
        assert_eq!(config.logging.directory, "var/log");
        assert_eq!(config.logging.file_prefix, "watch_scraper.log");
    }

    #[test]
    fn test_single_word_in_multi_word_list_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[extraction]\nextra_multi_word_brands = [\"Nomos\"]").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ScraperError::Config(_)));
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[extraction\nextra = ").unwrap();

        assert!(matches!(Config::load(file.path()), Err(ScraperError::Toml(_))));
    }
}
