use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::naming::DEFAULT_MAX_ATTEMPTS;
use crate::receiver::DEFAULT_CHUNK_SIZE;

/// Global configuration loaded from `~/.config/certdrop/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertdropConfig {
    /// Directory uploads are written into. Relative paths resolve against the working directory.
    pub target_dir: PathBuf,
    /// Name whose numbered siblings are created (`cert.json` → `cert_1.json`, `cert_2.json`, ...).
    pub base_filename: String,
    /// Highest numeric suffix tried before an upload is rejected.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Read buffer size for the body copy, in bytes.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// fsync each stored file before reporting success.
    #[serde(default)]
    pub sync_on_finish: bool,
    /// Address `certdrop serve` binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Route accepting POST/PUT uploads.
    #[serde(default = "default_upload_route")]
    pub upload_route: String,
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_upload_route() -> String {
    "/uploadcert".to_string()
}

impl Default for CertdropConfig {
    fn default() -> Self {
        Self {
            target_dir: PathBuf::from("cert_clientes"),
            base_filename: "cert.json".to_string(),
            max_attempts: default_max_attempts(),
            chunk_size: default_chunk_size(),
            sync_on_finish: false,
            listen_addr: default_listen_addr(),
            upload_route: default_upload_route(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("certdrop")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<CertdropConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = CertdropConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit file; it must exist.
pub fn load_from(path: &Path) -> Result<CertdropConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: CertdropConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
