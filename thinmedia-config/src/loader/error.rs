use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ConfigGuardRailError;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error(
        "no configuration found; pass --config, set THINMEDIA_CONFIG_PATH or THINMEDIA_CONFIG_JSON, or create thinmedia.toml"
    )]
    NotFound,
    #[error("failed to read configuration file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[source] anyhow::Error),
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
}
