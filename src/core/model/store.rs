use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{info, warn};

use super::artifact::{ArtifactId, ArtifactMetadata};
use super::error::StoreError;

/// A persisted artifact as seen when listing the store.
#[derive(Debug, Clone)]
pub struct ArtifactRecord {
    pub id: ArtifactId,
    pub meta: ArtifactMetadata,
}

/// Opaque-blob artifact persistence. Write-once: `save` always creates
/// a new artifact under a fresh id and never overwrites. Read-heavy and
/// safe for concurrent readers.
pub trait ArtifactStore: Send + Sync {
    fn save(&self, blob: &[u8], meta: &ArtifactMetadata) -> Result<ArtifactId, StoreError>;
    fn load(&self, id: &ArtifactId) -> Result<Vec<u8>, StoreError>;
    fn list(&self) -> Result<Vec<ArtifactRecord>, StoreError>;
}

/// Filesystem store: `model_<id>.bin` blob plus `model_<id>.meta.json`
/// sidecar under one directory.
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn blob_path(&self, id: &ArtifactId) -> PathBuf {
        self.root.join(format!("model_{}.bin", id))
    }

    fn meta_path(&self, id: &ArtifactId) -> PathBuf {
        self.root.join(format!("model_{}.meta.json", id))
    }
}

impl ArtifactStore for FsArtifactStore {
    fn save(&self, blob: &[u8], meta: &ArtifactMetadata) -> Result<ArtifactId, StoreError> {
        let id = ArtifactId::generate();
        let blob_path = self.blob_path(&id);
        if blob_path.exists() {
            return Err(StoreError::AlreadyExists(id.to_string()));
        }

        let meta_json = serde_json::to_vec(meta)
            .map_err(|e| StoreError::CorruptMetadata(e.to_string()))?;
        fs::write(&blob_path, blob)?;
        fs::write(self.meta_path(&id), meta_json)?;

        info!("💾 saved artifact {} ({} bytes)", id, blob.len());
        Ok(id)
    }

    fn load(&self, id: &ArtifactId) -> Result<Vec<u8>, StoreError> {
        fs::read(self.blob_path(id)).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound(id.to_string())
            } else {
                StoreError::Io(e)
            }
        })
    }

    fn list(&self) -> Result<Vec<ArtifactRecord>, StoreError> {
        let mut records = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => continue,
            };
            let id = match name
                .strip_prefix("model_")
                .and_then(|rest| rest.strip_suffix(".meta.json"))
            {
                Some(id) => ArtifactId::from(id),
                None => continue,
            };
            match read_metadata(&path) {
                Ok(meta) => records.push(ArtifactRecord { id, meta }),
                Err(e) => warn!("⚠️ skipping unreadable metadata {:?}: {}", path, e),
            }
        }
        records.sort_by_key(|r| r.meta.created_at_ms);
        Ok(records)
    }
}

fn read_metadata(path: &Path) -> Result<ArtifactMetadata, StoreError> {
    let bytes = fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(|e| StoreError::CorruptMetadata(e.to_string()))
}

/// In-memory store for tests and ephemeral runs.
pub struct MemoryArtifactStore {
    inner: Mutex<HashMap<String, (Vec<u8>, ArtifactMetadata)>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryArtifactStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn save(&self, blob: &[u8], meta: &ArtifactMetadata) -> Result<ArtifactId, StoreError> {
        let id = ArtifactId::generate();
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| StoreError::CorruptMetadata("store lock poisoned".to_string()))?;
        if inner.contains_key(id.as_str()) {
            return Err(StoreError::AlreadyExists(id.to_string()));
        }
        inner.insert(id.as_str().to_string(), (blob.to_vec(), meta.clone()));
        Ok(id)
    }

    fn load(&self, id: &ArtifactId) -> Result<Vec<u8>, StoreError> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| StoreError::CorruptMetadata("store lock poisoned".to_string()))?;
        inner
            .get(id.as_str())
            .map(|(blob, _)| blob.clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn list(&self) -> Result<Vec<ArtifactRecord>, StoreError> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| StoreError::CorruptMetadata("store lock poisoned".to_string()))?;
        let mut records: Vec<ArtifactRecord> = inner
            .iter()
            .map(|(id, (_, meta))| ArtifactRecord {
                id: ArtifactId::from(id.as_str()),
                meta: meta.clone(),
            })
            .collect();
        records.sort_by_key(|r| r.meta.created_at_ms);
        Ok(records)
    }
}
