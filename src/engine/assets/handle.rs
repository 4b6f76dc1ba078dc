// Type-safe asset handles

use std::marker::PhantomData;

/// Unique identifier for an asset, derived from its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetId(u64);

impl AssetId {
    pub fn from_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self(hasher.finish())
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Handle to a loaded asset. `T` keeps configuration and stats handles apart.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct AssetHandle<T> {
    id: AssetId,
    _phantom: PhantomData<fn() -> T>,
}

// Derives would require `T: Clone`
impl<T> Clone for AssetHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for AssetHandle<T> {}

impl<T> AssetHandle<T> {
    pub(crate) fn new(id: AssetId) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    pub fn id(&self) -> AssetId {
        self.id
    }
}

// Marker types
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ConfigAsset;
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct StatsAsset;

pub type ConfigHandle = AssetHandle<ConfigAsset>;
pub type StatsHandle = AssetHandle<StatsAsset>;
