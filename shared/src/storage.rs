use std::path::{Path, PathBuf};

use log::debug;

use crate::error::Error;

/// Key/value byte storage backed by one file per key.
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub async fn create(root: &Path) -> Result<FileStorage, Error> {
        tokio::fs::create_dir_all(root).await?;

        Ok(FileStorage {
            root: root.to_path_buf(),
        })
    }

    fn path_of(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.bin", key))
    }

    pub async fn read_bytes(&self, key: &str) -> Result<Vec<u8>, Error> {
        let bytes = tokio::fs::read(self.path_of(key)).await?;

        debug!("read {} bytes of {}", bytes.len(), key);

        Ok(bytes)
    }

    /// Writes through a temporary file so a crash never leaves half a unit.
    pub async fn write_bytes(&self, key: &str, data: &[u8]) -> Result<(), Error> {
        let path = self.path_of(key);
        let tmp = self.root.join(format!("{}.bin.tmp", key));

        tokio::fs::write(&tmp, data).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!("wrote {} bytes of {}", data.len(), key);

        Ok(())
    }
}
