//! `certdrop next-name` – show where the next upload would go.

use anyhow::Result;
use certdrop_core::config::CertdropConfig;
use certdrop_core::Inbox;

pub async fn run_next_name(cfg: &CertdropConfig) -> Result<()> {
    let inbox = Inbox::from_config(cfg)?;
    println!("{}", inbox.next_free().await?.display());
    Ok(())
}
