//! CLI for the certdrop upload receiver.

mod commands;

use anyhow::Result;
use certdrop_core::client::DEFAULT_CONTENT_TYPE;
use certdrop_core::config::{self, CertdropConfig};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use commands::{
    run_checksum, run_completions, run_man, run_next_name, run_send, run_serve, run_store,
};

/// Top-level CLI for certdrop.
#[derive(Debug, Parser)]
#[command(name = "certdrop")]
#[command(about = "certdrop: store uploaded reports under collision-free names", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/certdrop/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Target directory (overrides `target_dir` from the config).
    #[arg(long, global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run the HTTP receiver.
    Serve {
        /// Listen address (overrides `listen_addr` from the config).
        #[arg(long, value_name = "ADDR")]
        listen: Option<String>,
    },

    /// Store one body read from stdin (or a file) into the target directory.
    Store {
        /// Read from this file instead of stdin.
        path: Option<PathBuf>,
    },

    /// Print the path the next upload would be stored at.
    NextName,

    /// POST a file to a running receiver.
    Send {
        /// Upload URL, e.g. http://127.0.0.1:8080/uploadcert.
        url: String,
        /// File whose contents are sent as the request body.
        path: PathBuf,
        /// Content-Type header for the request.
        #[arg(long, default_value = DEFAULT_CONTENT_TYPE)]
        content_type: String,
    },

    /// Compute SHA-256 of a stored file.
    Checksum {
        /// Path to the file.
        path: String,
    },

    /// Print shell completions.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },

    /// Print the man page (roff).
    Man,
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match &cli.command {
            CliCommand::Serve { listen } => {
                let cfg = cli.resolve_config()?;
                run_serve(&cfg, listen.as_deref()).await?;
            }
            CliCommand::Store { path } => {
                let cfg = cli.resolve_config()?;
                run_store(&cfg, path.as_deref()).await?;
            }
            CliCommand::NextName => run_next_name(&cli.resolve_config()?).await?,
            CliCommand::Send {
                url,
                path,
                content_type,
            } => run_send(url, path, content_type).await?,
            CliCommand::Checksum { path } => run_checksum(Path::new(path)).await?,
            CliCommand::Completions { shell } => run_completions(*shell)?,
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }

    /// Config file (explicit or XDG default) with command-line overrides applied.
    fn resolve_config(&self) -> Result<CertdropConfig> {
        let mut cfg = match &self.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);
        if let Some(dir) = &self.dir {
            cfg.target_dir = dir.clone();
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests;
