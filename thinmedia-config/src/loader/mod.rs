pub mod error;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use serde_json::Value;
use tracing::debug;

use crate::models::IndexerConfig;
use crate::models::legacy::LegacyConfig;
use crate::validation::{ConfigWarnings, apply_guard_rails};
use error::ConfigLoadError;

pub const CONFIG_PATH_ENV: &str = "THINMEDIA_CONFIG_PATH";
pub const CONFIG_JSON_ENV: &str = "THINMEDIA_CONFIG_JSON";
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Probed in order, relative to the loader's base directory.
pub const DEFAULT_CANDIDATES: &[&str] = &[
    "thinmedia.toml",
    "thinmedia.json",
    "config/thinmedia.toml",
    "data/indexer_config.json",
];

/// Where the configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Explicit(path) => write!(f, "{}", path.display()),
            ConfigSource::EnvPath(path) => write!(f, "{} (via {CONFIG_PATH_ENV})", path.display()),
            ConfigSource::EnvInline => write!(f, "{CONFIG_JSON_ENV}"),
            ConfigSource::File(path) => write!(f, "{} (default location)", path.display()),
        }
    }
}

/// A validated configuration and the warnings raised while checking it.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: IndexerConfig,
    pub source: ConfigSource,
    pub warnings: ConfigWarnings,
}

/// Resolves the indexer configuration.
///
/// Evaluation order:
/// 1) an explicit path (`--config`),
/// 2) `$THINMEDIA_CONFIG_PATH` (TOML or JSON file),
/// 3) `$THINMEDIA_CONFIG_JSON` (inline JSON),
/// 4) the first of [`DEFAULT_CANDIDATES`] that exists.
///
/// `$TMDB_API_KEY` then overrides the credential. Finding nothing is an
/// error; there is no usable default without an API key.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    explicit_path: Option<PathBuf>,
    base_dir: PathBuf,
    env: BTreeMap<String, String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader over the current directory and a snapshot of the process
    /// environment.
    pub fn new() -> Self {
        Self {
            explicit_path: None,
            base_dir: PathBuf::from("."),
            env: std::env::vars().collect(),
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_path = Some(path.into());
        self
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    /// Replace the environment snapshot.
    pub fn with_env<K, V>(mut self, vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.env = vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let (mut config, source) = self.resolve()?;

        if let Some(key) = self.var(API_KEY_ENV) {
            debug!("metadata API key taken from {API_KEY_ENV}");
            config.metadata.api_key = key.to_string();
        }

        let warnings = apply_guard_rails(&config)?;
        Ok(ConfigLoad {
            config,
            source,
            warnings,
        })
    }

    /// Find and parse the configuration without overrides or validation.
    pub fn resolve(&self) -> Result<(IndexerConfig, ConfigSource), ConfigLoadError> {
        if let Some(path) = &self.explicit_path {
            let config = load_from_file(path)?;
            return Ok((config, ConfigSource::Explicit(path.clone())));
        }

        if let Some(path_str) = self.var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(path_str);
            let config = load_from_file(&path)?;
            return Ok((config, ConfigSource::EnvPath(path)));
        }

        if let Some(raw) = self.var(CONFIG_JSON_ENV) {
            let config = parse_json(raw)
                .with_context(|| format!("failed to parse {CONFIG_JSON_ENV}"))
                .map_err(ConfigLoadError::Parse)?;
            return Ok((config, ConfigSource::EnvInline));
        }

        if let Some(path) = self.find_default_file() {
            let config = load_from_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }

        Err(ConfigLoadError::NotFound)
    }

    fn var(&self, key: &str) -> Option<&str> {
        self.env
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    fn find_default_file(&self) -> Option<PathBuf> {
        DEFAULT_CANDIDATES
            .iter()
            .map(|candidate| self.base_dir.join(candidate))
            .find(|path| path.is_file())
    }
}

pub fn load_from_file(path: &Path) -> Result<IndexerConfig, ConfigLoadError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => {
            parse_json(&contents).with_context(|| format!("invalid config {}", path.display()))
        }
        Some("toml") | Some("tml") => toml::from_str(&contents)
            .map_err(|err| anyhow!("invalid config {}: {}", path.display(), err)),
        _ => parse_from_str(&contents, &path.display().to_string()),
    };
    parsed.map_err(ConfigLoadError::Parse)
}

pub fn parse_from_str(contents: &str, origin: &str) -> anyhow::Result<IndexerConfig> {
    toml::from_str(contents).or_else(|toml_err| {
        parse_json(contents).map_err(|json_err| {
            anyhow!(
                "failed to parse config {}: toml error: {}; json error: {}",
                origin,
                toml_err,
                json_err
            )
        })
    })
}

/// Parse either JSON layout: the sectioned one or the legacy flat one.
pub fn parse_json(raw: &str) -> anyhow::Result<IndexerConfig> {
    let value: Value =
        serde_json::from_str(raw).map_err(|err| anyhow!("invalid config json: {err}"))?;

    if LegacyConfig::matches(&value) {
        debug!("converting legacy flat configuration");
        let legacy: LegacyConfig = serde_json::from_value(value)
            .map_err(|err| anyhow!("invalid legacy config json: {err}"))?;
        return legacy.into_config();
    }

    serde_json::from_value(value).map_err(|err| anyhow!("invalid config json: {err}"))
}
