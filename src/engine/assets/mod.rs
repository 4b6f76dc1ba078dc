// Asset loading: character configurations and stats stored as TOML files

mod handle;
mod library;
mod loader;

pub use handle::{AssetHandle, AssetId, ConfigHandle, StatsHandle};
pub use library::AssetLibrary;
pub use loader::{AssetLoader, AssetType};

use crate::game::characters::{ConfigError, StatsError};

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("asset already loaded: {0}")]
    AlreadyLoaded(String),

    #[error("failed to parse asset: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("invalid stats: {0}")]
    InvalidStats(#[from] StatsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
