// Asset file lookup

use super::AssetError;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Kinds of asset files on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetType {
    Configuration,
    Stats,
}

impl AssetType {
    pub fn default_directory(&self) -> &'static str {
        match self {
            AssetType::Configuration => "configurations",
            AssetType::Stats => "stats",
        }
    }

    pub fn extension(&self) -> &'static str {
        "toml"
    }
}

/// Finds and reads asset files under a base directory
#[derive(Debug)]
pub struct AssetLoader {
    base_path: PathBuf,
}

impl AssetLoader {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// `<base>/<type dir>/<name>.toml`
    pub fn resolve_path(&self, asset_type: AssetType, name: &str) -> PathBuf {
        self.base_path
            .join(asset_type.default_directory())
            .join(name)
            .with_extension(asset_type.extension())
    }

    pub fn load_text(&self, asset_type: AssetType, name: &str) -> Result<String> {
        let path = self.resolve_path(asset_type, name);
        if !path.exists() {
            return Err(AssetError::NotFound(path.to_string_lossy().to_string()).into());
        }
        Ok(std::fs::read_to_string(&path).map_err(AssetError::Io)?)
    }

    pub fn exists(&self, asset_type: AssetType, name: &str) -> bool {
        self.resolve_path(asset_type, name).exists()
    }

    /// Asset names (file stems) of one type, sorted
    pub fn list_assets(&self, asset_type: AssetType) -> Result<Vec<String>> {
        let dir = self.base_path.join(asset_type.default_directory());
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let matches_type = path
                .extension()
                .is_some_and(|ext| ext == asset_type.extension());
            if path.is_file() && matches_type {
                if let Some(stem) = path.file_stem() {
                    names.push(stem.to_string_lossy().to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}
