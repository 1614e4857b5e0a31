//! Upload error type shared by the allocator, writer and receiver.

use std::io;
use std::path::PathBuf;

/// Terminal failure of a single upload. Nothing is retried past this point.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Every candidate `<stem>_1<ext>` .. `<stem>_<attempts><ext>` already exists.
    #[error("no free filename for {name} in {} after {attempts} attempts", dir.display())]
    AllocationExhausted {
        dir: PathBuf,
        name: String,
        attempts: u32,
    },

    /// The chosen output path could not be created (permissions, missing directory, disk full).
    #[error("could not open {} for writing", path.display())]
    OutputOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing a chunk (or the final flush) failed after the file was created.
    #[error("write to {} failed", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The incoming body failed mid-read.
    #[error("reading upload body failed")]
    InputRead(#[source] io::Error),

    /// Base filename is empty, not a single path component, or a reserved name.
    #[error("invalid base filename: {0:?}")]
    InvalidFilename(String),

    /// Existence check on a candidate failed (e.g. target directory not searchable).
    #[error("cannot inspect {}", path.display())]
    Probe {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl UploadError {
    /// Path of the file involved, when the error concerns one.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            UploadError::OutputOpen { path, .. }
            | UploadError::OutputWrite { path, .. }
            | UploadError::Probe { path, .. } => Some(path),
            UploadError::AllocationExhausted { .. }
            | UploadError::InputRead(_)
            | UploadError::InvalidFilename(_) => None,
        }
    }
}
