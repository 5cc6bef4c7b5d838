use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::foundation::error::{LcrError, LcrResult};

/// The opaque static blobs embedded into every container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Placeholder ambient-lighting layer, embedded as-is.
    Radiosity,
    /// Bytes following the `tmfk` magic at the start of the key table.
    FormatKeyPrefix,
    /// Bytes following every name in the key table.
    FormatKeyLayerTrailer,
    /// BOM vars block written between the payload region and the index table.
    IndexPreamble,
}

impl ResourceKind {
    /// All kinds, in load order.
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Radiosity,
        ResourceKind::FormatKeyPrefix,
        ResourceKind::FormatKeyLayerTrailer,
        ResourceKind::IndexPreamble,
    ];

    /// Conventional file name inside a resource directory.
    pub fn file_name(self) -> &'static str {
        match self {
            ResourceKind::Radiosity => "blue-radiosity",
            ResourceKind::FormatKeyPrefix => "tmfkPrefixData",
            ResourceKind::FormatKeyLayerTrailer => "tmfkLayerData",
            ResourceKind::IndexPreamble => "bomTableStart",
        }
    }
}

/// Read-only access to the static resource blobs.
pub trait ResourceProvider: Send + Sync {
    /// Returns the bytes for `kind`, or [`LcrError::ResourceMissing`].
    fn load(&self, kind: ResourceKind) -> LcrResult<Vec<u8>>;
}

/// Resources read from files in one directory, named by
/// [`ResourceKind::file_name`].
#[derive(Clone, Debug)]
pub struct DirResources {
    root: PathBuf,
}

impl DirResources {
    /// Resources rooted at `root`. Files are read lazily on each load.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory the blobs are read from.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceProvider for DirResources {
    fn load(&self, kind: ResourceKind) -> LcrResult<Vec<u8>> {
        let path = self.root.join(kind.file_name());
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(
                LcrError::resource_missing(format!("{kind:?} ('{}')", path.display())),
            ),
            Err(err) => Err(anyhow::Error::new(err)
                .context(format!("read resource '{}'", path.display()))
                .into()),
        }
    }
}

/// Resources held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryResources {
    blobs: HashMap<ResourceKind, Vec<u8>>,
}

impl MemoryResources {
    /// Empty set; every load fails until blobs are inserted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, kind: ResourceKind, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(kind, bytes);
        self
    }

    /// Inserts or replaces the blob for `kind`.
    pub fn insert(&mut self, kind: ResourceKind, bytes: impl Into<Vec<u8>>) {
        self.blobs.insert(kind, bytes.into());
    }
}

impl ResourceProvider for MemoryResources {
    fn load(&self, kind: ResourceKind) -> LcrResult<Vec<u8>> {
        self.blobs
            .get(&kind)
            .cloned()
            .ok_or_else(|| LcrError::resource_missing(format!("{kind:?}")))
    }
}

/// All four blobs, loaded once per construction.
#[derive(Clone, Debug)]
pub struct StaticResources {
    pub radiosity: Vec<u8>,
    pub format_key_prefix: Vec<u8>,
    pub format_key_trailer: Vec<u8>,
    pub index_preamble: Vec<u8>,
}

impl StaticResources {
    /// Loads every blob; the first missing one aborts.
    pub fn load(provider: &dyn ResourceProvider) -> LcrResult<Self> {
        Ok(Self {
            radiosity: provider.load(ResourceKind::Radiosity)?,
            format_key_prefix: provider.load(ResourceKind::FormatKeyPrefix)?,
            format_key_trailer: provider.load(ResourceKind::FormatKeyLayerTrailer)?,
            index_preamble: provider.load(ResourceKind::IndexPreamble)?,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/resources.rs"]
mod tests;
