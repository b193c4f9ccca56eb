use crate::error::{ServiceError, ServiceResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{Error, ErrorKind};
use std::marker::PhantomData;
use std::path::PathBuf;

/// Typed load/save of a single JSON document on disk.
///
/// A missing file loads as the default document; a file that exists but does
/// not parse is a hard `CorruptData` error, never a silent empty document.
/// Saves go through a temp file followed by a rename, so a concurrent reader
/// of the file can never observe a half-written document.
pub struct DocumentStore<T> {
    path: PathBuf,
    _doc: PhantomData<T>,
}

impl<T> DocumentStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn open(path: impl Into<PathBuf>) -> Self {
        DocumentStore {
            path: path.into(),
            _doc: PhantomData,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn load(&self) -> ServiceResult<T> {
        if !self.path.exists() {
            return Ok(T::default());
        }

        let bytes = fs::read(&self.path)?;
        serde_json::from_slice(&bytes).map_err(|source| ServiceError::CorruptData {
            path: self.path.display().to_string(),
            source,
        })
    }

    pub fn save(&self, document: &T) -> ServiceResult<()> {
        let bytes = serde_json::to_vec(document)
            .map_err(|e| Error::new(ErrorKind::InvalidData, e.to_string()))?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;

        Ok(())
    }
}
