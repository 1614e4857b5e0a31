//! Runs a real certdrop listener on an ephemeral port for integration tests.

use certdrop_core::server;
use certdrop_core::Inbox;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub struct RunningServer {
    /// Full upload URL, e.g. "http://127.0.0.1:40123/uploadcert".
    pub upload_url: String,
    stop: Option<oneshot::Sender<()>>,
    task: tokio::task::JoinHandle<anyhow::Result<()>>,
}

impl RunningServer {
    /// Stop accepting and wait for the server task to finish.
    pub async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        self.task.await.expect("server task").expect("server result");
    }
}

/// Start a server storing `cert.json` siblings in `dir`.
pub async fn start(dir: &Path, max_attempts: u32) -> RunningServer {
    let inbox = Inbox::new(dir, "cert.json")
        .expect("inbox")
        .with_max_attempts(max_attempts);
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        server::serve_on(listener, Arc::new(inbox), "/uploadcert", async move {
            let _ = rx.await;
        })
        .await
    });
    RunningServer {
        upload_url: format!("http://{}/uploadcert", addr),
        stop: Some(tx),
        task,
    }
}
