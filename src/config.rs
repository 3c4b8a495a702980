use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "twcascade.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct Config {
    /// Prefix every utility class carries, e.g. `tw-`.
    #[serde(default)]
    pub prefix: String,
    /// Taxonomy TOML compiled at startup instead of the bundled one.
    #[serde(default)]
    pub taxonomy: Option<PathBuf>,
    /// Precompiled table JSON; wins over `taxonomy`.
    #[serde(default)]
    pub table: Option<PathBuf>,
    #[serde(default)]
    pub check: CheckConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct CheckConfig {
    #[serde(default)]
    pub ignore: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    Builtin,
    Taxonomy(PathBuf),
    Compiled(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ConfigError {
    pub message: String,
}

/// Loads a config file; relative paths inside it resolve against its directory.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|err| ConfigError {
        message: format!("failed to read config {}: {}", path.display(), err),
    })?;
    let mut config: Config = toml::from_str(&text).map_err(|err| ConfigError {
        message: format!("failed to parse config {}: {}", path.display(), err),
    })?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    config.taxonomy = config.taxonomy.map(|value| base.join(value));
    config.table = config.table.map(|value| base.join(value));
    tracing::debug!(path = %path.display(), prefix = %config.prefix, "loaded config");
    Ok(config)
}

/// Loads `twcascade.toml` from `dir` when present.
pub fn discover(dir: &Path) -> Result<Option<Config>, ConfigError> {
    let candidate = dir.join(DEFAULT_CONFIG_FILE);
    if !candidate.is_file() {
        return Ok(None);
    }
    load(&candidate).map(Some)
}

impl Config {
    pub fn table_source(&self) -> TableSource {
        if let Some(path) = self.table.as_ref() {
            return TableSource::Compiled(path.clone());
        }
        if let Some(path) = self.taxonomy.as_ref() {
            return TableSource::Taxonomy(path.clone());
        }
        TableSource::Builtin
    }
}
