use crate::domain::ports::BlobStore;
use crate::utils::error::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub const DEFAULT_DOCUMENT_NAME: &str = "donnees.json";

/// Stores the document as `<base_path>/<name>` on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    base_path: PathBuf,
    name: String,
}

impl FileBlobStore {
    pub fn new(base_path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            name: name.into(),
        }
    }

    pub fn full_path(&self) -> PathBuf {
        self.base_path.join(&self.name)
    }
}

impl BlobStore for FileBlobStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_blob(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(self.full_path()) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_blob(&self, data: &[u8]) -> Result<()> {
        let full_path = self.full_path();

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}

/// Keeps the document in memory. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blob: Arc<Mutex<Option<Vec<u8>>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(data: impl Into<Vec<u8>>) -> Self {
        Self {
            blob: Arc::new(Mutex::new(Some(data.into()))),
        }
    }

    pub fn contents(&self) -> Option<Vec<u8>> {
        self.blob
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl BlobStore for MemoryBlobStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn read_blob(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.contents())
    }

    fn write_blob(&self, data: &[u8]) -> Result<()> {
        let mut blob = self
            .blob
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *blob = Some(data.to_vec());
        Ok(())
    }
}
