//! `certdrop serve` – run the HTTP receiver until Ctrl-C.

use anyhow::Result;
use certdrop_core::config::CertdropConfig;
use certdrop_core::{server, Inbox};
use std::sync::Arc;

pub async fn run_serve(cfg: &CertdropConfig, listen: Option<&str>) -> Result<()> {
    let inbox = Inbox::from_config(cfg)?;
    inbox.ensure_dir()?;
    let route = server::checked_route(&cfg.upload_route)?;
    let addr = listen.unwrap_or(&cfg.listen_addr);
    println!(
        "Receiving uploads on http://{}{} into {}",
        addr,
        route,
        inbox.dir().display()
    );
    server::serve(Arc::new(inbox), addr, &route).await
}
