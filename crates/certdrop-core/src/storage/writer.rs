//! Sequential writer for one upload's output file.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use super::StoredUpload;
use crate::error::UploadError;

/// Append-only writer over a freshly created file. Hashes everything it writes.
pub struct UploadWriter {
    file: File,
    path: PathBuf,
    written: u64,
    hasher: Sha256,
}

impl UploadWriter {
    /// Create `path`, failing with `OutputOpen` if it already exists.
    pub async fn create_new(path: &Path) -> Result<Self, UploadError> {
        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
            .map_err(|source| UploadError::OutputOpen {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::new(file, path.to_path_buf()))
    }

    pub(crate) fn new(file: File, path: PathBuf) -> Self {
        Self {
            file,
            path,
            written: 0,
            hasher: Sha256::new(),
        }
    }

    /// Append `data` at the current end of file.
    pub async fn write_chunk(&mut self, data: &[u8]) -> Result<(), UploadError> {
        self.file
            .write_all(data)
            .await
            .map_err(|source| UploadError::OutputWrite {
                path: self.path.clone(),
                source,
            })?;
        self.hasher.update(data);
        self.written += data.len() as u64;
        Ok(())
    }

    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush (and optionally fsync) then close the file.
    pub async fn finish(mut self, sync: bool) -> Result<StoredUpload, UploadError> {
        let path = self.path.clone();
        let wrap = |source| UploadError::OutputWrite {
            path: path.clone(),
            source,
        };
        self.file.flush().await.map_err(wrap)?;
        if sync {
            self.file.sync_all().await.map_err(wrap)?;
        }
        drop(self.file);
        Ok(StoredUpload {
            path: self.path,
            bytes: self.written,
            sha256: hex::encode(self.hasher.finalize()),
        })
    }

    /// Flush and close without producing a receipt; used on abort paths.
    pub async fn close(mut self) {
        if let Err(e) = self.file.flush().await {
            tracing::debug!(path = %self.path.display(), "flush on abort: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_chunks_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cert_1.json");
        let mut w = UploadWriter::create_new(&path).await.unwrap();
        w.write_chunk(b"hel").await.unwrap();
        w.write_chunk(b"lo\n").await.unwrap();
        assert_eq!(w.bytes_written(), 6);
        let stored = w.finish(true).await.unwrap();
        assert_eq!(stored.bytes, 6);
        assert_eq!(
            stored.sha256,
            "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03"
        );
        assert_eq!(std::fs::read(&path).unwrap(), b"hello\n");
    }

    #[tokio::test]
    async fn create_new_refuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cert_1.json");
        std::fs::write(&path, b"original").unwrap();
        match UploadWriter::create_new(&path).await {
            Err(UploadError::OutputOpen { source, .. }) => {
                assert_eq!(source.kind(), std::io::ErrorKind::AlreadyExists)
            }
            Ok(_) => panic!("must not open an existing file"),
            Err(e) => panic!("unexpected error: {e}"),
        }
        assert_eq!(std::fs::read(&path).unwrap(), b"original");
    }

    #[tokio::test]
    async fn create_new_in_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("cert_1.json");
        assert!(matches!(
            UploadWriter::create_new(&path).await,
            Err(UploadError::OutputOpen { .. })
        ));
    }
}
