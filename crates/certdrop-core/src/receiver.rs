//! Streams one upload body into a lazily created output file.
//!
//! The output file does not exist until the first non-empty chunk arrives, so an
//! empty body leaves nothing behind. Input and output handles are owned by the
//! call and closed on every return path.

use std::future::Future;
use std::io;
use std::path::PathBuf;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::UploadError;
use crate::storage::{claim, StoredUpload, UploadWriter};

/// Chunk size used when the configuration does not override it.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Result of a successful receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The body was empty; no file was created.
    Empty,
    /// The body was written to a new file.
    Stored(StoredUpload),
}

impl UploadOutcome {
    pub fn bytes_written(&self) -> u64 {
        match self {
            UploadOutcome::Empty => 0,
            UploadOutcome::Stored(s) => s.bytes,
        }
    }

    pub fn stored(&self) -> Option<&StoredUpload> {
        match self {
            UploadOutcome::Empty => None,
            UploadOutcome::Stored(s) => Some(s),
        }
    }
}

/// Chunked copy policy.
#[derive(Debug, Clone, Copy)]
pub struct Receiver {
    chunk_size: usize,
    sync_on_finish: bool,
}

impl Default for Receiver {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            sync_on_finish: false,
        }
    }
}

impl Receiver {
    pub fn new(chunk_size: usize, sync_on_finish: bool) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            sync_on_finish,
        }
    }

    /// Copy `input` into the file named by `next_path`.
    ///
    /// `next_path` is only called once data has arrived, and again if the
    /// name it returned was taken before it could be created. On an open
    /// failure the rest of the input is not read.
    pub async fn receive<R, P, F>(
        &self,
        input: R,
        next_path: P,
    ) -> Result<UploadOutcome, UploadError>
    where
        R: AsyncRead + Unpin,
        P: FnMut() -> F,
        F: Future<Output = Result<PathBuf, UploadError>>,
    {
        self.copy(input, move || claim(next_path)).await
    }

    /// Chunked copy; `open` runs at most once, when the first data arrives.
    async fn copy<R, O, F>(&self, mut input: R, open: O) -> Result<UploadOutcome, UploadError>
    where
        R: AsyncRead + Unpin,
        O: FnOnce() -> F,
        F: Future<Output = Result<UploadWriter, UploadError>>,
    {
        let mut open = Some(open);
        let mut buf = vec![0u8; self.chunk_size];
        let mut out: Option<UploadWriter> = None;

        loop {
            let n = match input.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    if let Some(writer) = out.take() {
                        tracing::warn!(
                            path = %writer.path().display(),
                            bytes = writer.bytes_written(),
                            "upload body failed mid-read; partial file left in place"
                        );
                        writer.close().await;
                    }
                    return Err(UploadError::InputRead(e));
                }
            };

            if out.is_none() {
                if let Some(open) = open.take() {
                    let writer = open().await?;
                    tracing::debug!(path = %writer.path().display(), "output file created");
                    out = Some(writer);
                }
            }
            if let Some(writer) = out.as_mut() {
                if let Err(e) = writer.write_chunk(&buf[..n]).await {
                    if let Some(writer) = out.take() {
                        writer.close().await;
                    }
                    return Err(e);
                }
            }
        }

        match out {
            None => {
                tracing::debug!("empty upload body, nothing stored");
                Ok(UploadOutcome::Empty)
            }
            Some(writer) => {
                let stored = writer.finish(self.sync_on_finish).await?;
                tracing::info!(
                    path = %stored.path.display(),
                    bytes = stored.bytes,
                    sha256 = %stored.sha256,
                    "upload stored"
                );
                Ok(UploadOutcome::Stored(stored))
            }
        }
    }
}
