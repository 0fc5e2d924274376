use crate::token_store::{StorageError, StorageKey, StorageResult, TokenStore};

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::NamedTempFile;

/// One file per entry inside a storage directory.
///
/// Writes go through a uniquely named temp file, fsync and atomic rename
/// so a crash mid-write never leaves a truncated token behind.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: StorageKey) -> PathBuf {
        self.dir.join(key.as_str())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: StorageKey) -> StorageResult<Option<String>> {
        let path = self.entry_path(key);

        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::read(path, e)),
        }
    }

    fn set(&self, key: StorageKey, value: &str) -> StorageResult<()> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| StorageError::dir_creation(self.dir.clone(), e))?;

        let final_path = self.entry_path(key);

        // Unique per write, so concurrent writers never share a temp file
        let mut temp = NamedTempFile::new_in(&self.dir)
            .map_err(|e| StorageError::write(self.dir.clone(), e))?;

        temp.write_all(value.as_bytes())
            .map_err(|e| StorageError::write(temp.path().to_path_buf(), e))?;

        temp.as_file()
            .sync_all()
            .map_err(|e| StorageError::write(temp.path().to_path_buf(), e))?;

        temp.persist(&final_path).map_err(|e| {
            StorageError::atomic_rename(e.file.path().to_path_buf(), final_path.clone(), e.error)
        })?;

        debug!("Stored session entry '{}'", key.as_str());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> StorageResult<()> {
        let path = self.entry_path(key);

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::remove(path, e)),
        }
    }
}
