//! Disk side of an upload.
//!
//! Output files are always created with exclusive create (`O_EXCL`), so a name
//! that appeared between allocation and open is never overwritten; `claim`
//! asks the allocator again in that case.

mod claim;
mod writer;

pub use claim::claim;
pub use writer::UploadWriter;

use std::path::PathBuf;

/// A completed, closed output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    /// Full path of the created file.
    pub path: PathBuf,
    /// Number of body bytes written.
    pub bytes: u64,
    /// SHA-256 of the written bytes, lowercase hex.
    pub sha256: String,
}

impl StoredUpload {
    /// Final path component, e.g. `cert_3.json`.
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}
