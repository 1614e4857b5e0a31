//! Upload agent side: POST a report file to a certdrop receiver.
//!
//! Uses the curl crate (libcurl). Blocking; call from `spawn_blocking` if used
//! from async code.

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;

use crate::server::UploadReceipt;

/// Content type the desktop certificate agent sends its report with.
pub const DEFAULT_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Outcome of a successful (2xx) upload request.
#[derive(Debug, Clone)]
pub struct SendReport {
    pub status: u32,
    pub body: Vec<u8>,
}

impl SendReport {
    /// Parsed receipt when the receiver stored a file (`201`).
    pub fn receipt(&self) -> Option<UploadReceipt> {
        serde_json::from_slice(&self.body).ok()
    }
}

/// POST the contents of `path` to `url`.
pub fn send_file(url: &str, path: &Path, content_type: &str) -> Result<SendReport> {
    let data = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    send_bytes(url, &data, content_type)
}

/// POST `data` to `url`. Non-2xx responses are errors.
pub fn send_bytes(url: &str, data: &[u8], content_type: &str) -> Result<SendReport> {
    let parsed = url::Url::parse(url).with_context(|| format!("invalid URL: {}", url))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("unsupported URL scheme: {}", parsed.scheme());
    }

    let mut easy = curl::easy::Easy::new();
    easy.url(parsed.as_str()).context("invalid URL")?;
    easy.post(true)?;
    easy.post_fields_copy(data)?;
    easy.connect_timeout(Duration::from_secs(15))?;
    easy.timeout(Duration::from_secs(60))?;

    let mut list = curl::easy::List::new();
    list.append(&format!("Content-Type: {}", content_type))?;
    easy.http_headers(list)?;

    let mut body = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|chunk| {
            body.extend_from_slice(chunk);
            Ok(chunk.len())
        })?;
        transfer.perform().context("upload request failed")?;
    }

    let status = easy.response_code().context("no response code")?;
    if !(200..300).contains(&status) {
        anyhow::bail!(
            "POST {} returned HTTP {}: {}",
            parsed,
            status,
            String::from_utf8_lossy(&body).trim()
        );
    }
    tracing::debug!(url = %parsed, status, bytes = data.len(), "upload sent");
    Ok(SendReport { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_scheme() {
        let err = send_bytes("ftp://example.com/upload", b"x", DEFAULT_CONTENT_TYPE).unwrap_err();
        assert!(err.to_string().contains("unsupported URL scheme"));
    }

    #[test]
    fn rejects_garbage_url() {
        assert!(send_bytes("not a url", b"x", DEFAULT_CONTENT_TYPE).is_err());
    }

    #[test]
    fn receipt_parsed_from_body() {
        let report = SendReport {
            status: 201,
            body: br#"{"file":"cert_1.json","bytes":2,"sha256":"ab"}"#.to_vec(),
        };
        let receipt = report.receipt().unwrap();
        assert_eq!(receipt.file, "cert_1.json");
        assert_eq!(receipt.bytes, 2);

        let empty = SendReport {
            status: 204,
            body: Vec::new(),
        };
        assert!(empty.receipt().is_none());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = send_file("http://127.0.0.1:1/", &dir.path().join("nope.json"), DEFAULT_CONTENT_TYPE)
            .unwrap_err();
        assert!(format!("{err:#}").contains("read"));
    }
}
