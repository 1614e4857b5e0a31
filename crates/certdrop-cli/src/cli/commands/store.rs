//! `certdrop store [path]` – store one body from stdin or a file.

use anyhow::{Context, Result};
use certdrop_core::config::CertdropConfig;
use certdrop_core::{Inbox, UploadOutcome};
use std::path::Path;

pub async fn run_store(cfg: &CertdropConfig, path: Option<&Path>) -> Result<()> {
    let inbox = Inbox::from_config(cfg)?;
    inbox.ensure_dir()?;

    let outcome = match path {
        Some(p) => {
            let file = tokio::fs::File::open(p)
                .await
                .with_context(|| format!("open {}", p.display()))?;
            inbox.accept(file).await?
        }
        None => inbox.accept(tokio::io::stdin()).await?,
    };

    match outcome {
        UploadOutcome::Empty => eprintln!("Empty input, nothing stored"),
        UploadOutcome::Stored(stored) => {
            println!("{}  {}  {}", stored.sha256, stored.bytes, stored.path.display())
        }
    }
    Ok(())
}
