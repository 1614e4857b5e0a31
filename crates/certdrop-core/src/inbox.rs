//! A configured upload destination: directory, base filename and copy policy.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::io::AsyncRead;

use crate::config::CertdropConfig;
use crate::error::UploadError;
use crate::naming::{allocate, TargetName, DEFAULT_MAX_ATTEMPTS};
use crate::receiver::{Receiver, UploadOutcome};

/// Where and how uploads are stored. Immutable; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Inbox {
    dir: PathBuf,
    name: TargetName,
    max_attempts: u32,
    receiver: Receiver,
}

impl Inbox {
    /// Inbox storing `<stem>_<n><ext>` siblings of `base_filename` inside `dir`.
    pub fn new(dir: impl Into<PathBuf>, base_filename: &str) -> Result<Self, UploadError> {
        Ok(Self {
            dir: dir.into(),
            name: TargetName::parse(base_filename)?,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            receiver: Receiver::default(),
        })
    }

    pub fn from_config(cfg: &CertdropConfig) -> Result<Self, UploadError> {
        Ok(Self::new(&cfg.target_dir, &cfg.base_filename)?
            .with_max_attempts(cfg.max_attempts)
            .with_receiver(Receiver::new(cfg.chunk_size, cfg.sync_on_finish)))
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_receiver(mut self, receiver: Receiver) -> Self {
        self.receiver = receiver;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn name(&self) -> &TargetName {
        &self.name
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Create the target directory if it is missing.
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create target dir: {}", self.dir.display()))
    }

    /// The path the next upload would get right now.
    ///
    /// The scan runs on the blocking pool; a nearly full inbox can take up
    /// to `max_attempts` metadata lookups.
    pub async fn next_free(&self) -> Result<PathBuf, UploadError> {
        let dir = self.dir.clone();
        let name = self.name.clone();
        let max_attempts = self.max_attempts;
        tokio::task::spawn_blocking(move || allocate(&dir, &name, max_attempts))
            .await
            .map_err(|e| UploadError::Probe {
                path: self.dir.clone(),
                source: e.into(),
            })?
    }

    /// Store one upload body.
    pub async fn accept<R>(&self, input: R) -> Result<UploadOutcome, UploadError>
    where
        R: AsyncRead + Unpin,
    {
        self.receiver.receive(input, || self.next_free()).await
    }
}
