//! `certdrop send <url> <path>` – upload a report to a receiver.

use anyhow::{Context, Result};
use certdrop_core::client;
use std::path::Path;

pub async fn run_send(url: &str, path: &Path, content_type: &str) -> Result<()> {
    let (url_owned, path_owned, ct) = (
        url.to_string(),
        path.to_path_buf(),
        content_type.to_string(),
    );
    let report =
        tokio::task::spawn_blocking(move || client::send_file(&url_owned, &path_owned, &ct))
            .await
            .context("upload task panicked")??;

    match report.receipt() {
        Some(receipt) => println!(
            "Stored {} as {} ({} bytes, sha256 {})",
            path.display(),
            receipt.file,
            receipt.bytes,
            receipt.sha256
        ),
        None => println!("Sent {} (HTTP {}, nothing stored)", path.display(), report.status),
    }
    Ok(())
}
