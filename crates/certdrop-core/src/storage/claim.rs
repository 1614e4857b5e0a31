//! Exclusive creation of the next free output file.

use std::future::Future;
use std::io;
use std::path::PathBuf;

use super::UploadWriter;
use crate::error::UploadError;

/// Create the file named by `next_path`, asking again whenever the name was
/// taken between the existence check and the open.
///
/// Stops with the provider's error (typically `AllocationExhausted`), or with
/// `OutputOpen` if the provider hands back a path that just failed.
pub async fn claim<P, F>(mut next_path: P) -> Result<UploadWriter, UploadError>
where
    P: FnMut() -> F,
    F: Future<Output = Result<PathBuf, UploadError>>,
{
    let mut conflicted: Option<PathBuf> = None;
    loop {
        let path = next_path().await?;
        match UploadWriter::create_new(&path).await {
            Ok(writer) => return Ok(writer),
            Err(UploadError::OutputOpen { path, source })
                if source.kind() == io::ErrorKind::AlreadyExists
                    && conflicted.as_deref() != Some(path.as_path()) =>
            {
                tracing::debug!(path = %path.display(), "name taken before open, allocating again");
                conflicted = Some(path);
            }
            Err(e) => return Err(e),
        }
    }
}
