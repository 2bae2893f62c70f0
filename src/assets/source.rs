use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use crate::foundation::error::{InkformError, InkformResult};

/// Provides the bytes of a source document for a given identity.
pub trait AssetSource: Send + Sync {
    /// Load the bytes for `identity`, failing when it cannot be resolved.
    fn load(&self, identity: &str) -> InkformResult<Vec<u8>>;
}

/// Reads identities as paths relative to a root directory.
///
/// Relative identities are normalized with [`normalize_rel_path`]; absolute identities are read
/// as given.
#[derive(Clone, Debug)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    /// Source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory used for relative identities.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, identity: &str) -> InkformResult<PathBuf> {
        let p = Path::new(identity);
        if p.is_absolute() {
            return Ok(p.to_path_buf());
        }
        let norm = normalize_rel_path(identity)?;
        Ok(self.root.join(Path::new(&norm)))
    }
}

impl AssetSource for FsAssetSource {
    fn load(&self, identity: &str) -> InkformResult<Vec<u8>> {
        let path = self.resolve(identity)?;
        std::fs::read(&path).map_err(|e| {
            InkformError::asset(format!("failed to read '{}': {e}", path.display()))
        })
    }
}

/// In-memory identity to bytes map, useful for embedded templates.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssetSource {
    entries: Arc<RwLock<HashMap<String, Arc<Vec<u8>>>>>,
}

impl MemoryAssetSource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the bytes for `identity`.
    pub fn insert(&self, identity: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(identity.into(), Arc::new(bytes.into()));
    }

    /// Builder-style [`Self::insert`].
    pub fn with(self, identity: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(identity, bytes);
        self
    }
}

impl AssetSource for MemoryAssetSource {
    fn load(&self, identity: &str) -> InkformResult<Vec<u8>> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries
            .get(identity)
            .map(|b| b.to_vec())
            .ok_or_else(|| InkformError::asset(format!("unknown asset '{identity}'")))
    }
}

/// Normalize and validate root-relative asset paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> InkformResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(InkformError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(InkformError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(InkformError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(InkformError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
