// Named collection of configuration and stats assets
//
// This is the data side of the inspector: pick an asset by name, spawn
// characters from it, or register a freshly edited copy under a new name.

use std::collections::{BTreeMap, HashMap};

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::game::characters::{CharacterConfig, CharacterStats, SharedConfig};

use super::handle::{AssetHandle, AssetId, ConfigHandle, StatsHandle};
use super::loader::{AssetLoader, AssetType};
use super::AssetError;

pub struct AssetLibrary {
    loader: AssetLoader,
    configs: HashMap<AssetId, SharedConfig>,
    stats: HashMap<AssetId, CharacterStats>,
    // Sorted so pickers list assets in a stable order
    config_names: BTreeMap<String, AssetId>,
    stats_names: BTreeMap<String, AssetId>,
}

impl AssetLibrary {
    pub fn new(loader: AssetLoader) -> Self {
        Self {
            loader,
            configs: HashMap::new(),
            stats: HashMap::new(),
            config_names: BTreeMap::new(),
            stats_names: BTreeMap::new(),
        }
    }

    /// Load `configurations/<name>.toml`, or return the cached handle
    pub fn load_config(&mut self, name: &str) -> Result<ConfigHandle> {
        if let Some(&id) = self.config_names.get(name) {
            debug!("configuration '{}' already loaded", name);
            return Ok(AssetHandle::new(id));
        }

        let text = self.loader.load_text(AssetType::Configuration, name)?;
        let config = CharacterConfig::from_toml_str(&text)
            .with_context(|| format!("configuration '{}'", name))?;

        info!("loaded configuration '{}' ({})", name, config.display_name);
        self.insert_config(name, config)
    }

    /// Register a configuration that did not come from disk
    pub fn insert_config(&mut self, name: &str, config: CharacterConfig) -> Result<ConfigHandle> {
        if self.config_names.contains_key(name) {
            return Err(AssetError::AlreadyLoaded(name.to_string()).into());
        }
        config.validate().map_err(AssetError::from)?;

        let id = AssetId::from_name(name);
        self.configs.insert(id, config.into_shared());
        self.config_names.insert(name.to_string(), id);
        Ok(AssetHandle::new(id))
    }

    pub fn config(&self, handle: ConfigHandle) -> Option<SharedConfig> {
        self.configs.get(&handle.id()).cloned()
    }

    pub fn config_by_name(&self, name: &str) -> Option<SharedConfig> {
        self.config_names
            .get(name)
            .and_then(|id| self.configs.get(id))
            .cloned()
    }

    /// Load `stats/<name>.toml`, or return the cached handle
    pub fn load_stats(&mut self, name: &str) -> Result<StatsHandle> {
        if let Some(&id) = self.stats_names.get(name) {
            return Ok(AssetHandle::new(id));
        }

        let text = self.loader.load_text(AssetType::Stats, name)?;
        let stats: CharacterStats = toml::from_str(&text)
            .map_err(AssetError::from)
            .with_context(|| format!("stats '{}'", name))?;

        info!("loaded stats '{}'", name);
        self.insert_stats(name, stats)
    }

    pub fn insert_stats(&mut self, name: &str, stats: CharacterStats) -> Result<StatsHandle> {
        if self.stats_names.contains_key(name) {
            return Err(AssetError::AlreadyLoaded(name.to_string()).into());
        }
        stats.validate().map_err(AssetError::from)?;

        let id = AssetId::from_name(name);
        self.stats.insert(id, stats);
        self.stats_names.insert(name.to_string(), id);
        Ok(AssetHandle::new(id))
    }

    /// Stats are copied out: each character owns its pool
    pub fn stats(&self, handle: StatsHandle) -> Option<CharacterStats> {
        self.stats.get(&handle.id()).cloned()
    }

    pub fn stats_by_name(&self, name: &str) -> Option<CharacterStats> {
        self.stats_names
            .get(name)
            .and_then(|id| self.stats.get(id))
            .cloned()
    }

    pub fn config_names(&self) -> impl Iterator<Item = &str> {
        self.config_names.keys().map(String::as_str)
    }

    pub fn stats_names(&self) -> impl Iterator<Item = &str> {
        self.stats_names.keys().map(String::as_str)
    }

    /// Load every asset on disk. Broken files are logged and skipped.
    /// Returns how many assets were loaded.
    pub fn load_all(&mut self) -> Result<usize> {
        let mut loaded = 0;

        for name in self.loader.list_assets(AssetType::Configuration)? {
            match self.load_config(&name) {
                Ok(_) => loaded += 1,
                Err(e) => warn!("skipping configuration '{}': {:#}", name, e),
            }
        }
        for name in self.loader.list_assets(AssetType::Stats)? {
            match self.load_stats(&name) {
                Ok(_) => loaded += 1,
                Err(e) => warn!("skipping stats '{}': {:#}", name, e),
            }
        }

        Ok(loaded)
    }

    pub fn loader(&self) -> &AssetLoader {
        &self.loader
    }
}
