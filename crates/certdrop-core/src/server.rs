//! HTTP front end: every POST/PUT body on the upload route goes into the inbox.
//!
//! Responses carry no more than the reference receiver needs: `201` with a small
//! JSON receipt when a file was written, `204` for an empty body.

use anyhow::{bail, Context, Result};
use axum::body::Body;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::TryStreamExt;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::io::StreamReader;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::error::UploadError;
use crate::inbox::Inbox;
use crate::receiver::UploadOutcome;

/// JSON body of a `201 Created` upload response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// Name of the created file inside the target directory.
    pub file: String,
    pub bytes: u64,
    pub sha256: String,
}

/// Router with `GET /health` and POST/PUT on `upload_route`.
pub fn router(inbox: Arc<Inbox>, upload_route: &str) -> Result<Router> {
    let route = checked_route(upload_route)?;
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));
    Ok(Router::new()
        .route("/health", get(health))
        .route(&route, post(upload).put(upload))
        .layer(DefaultBodyLimit::disable())
        .layer(trace)
        .with_state(inbox))
}

/// Upload route with a leading `/`. Must be a literal path: axum treats `:`
/// and `*` segments as parameters.
pub fn checked_route(route: &str) -> Result<String> {
    let route = normalize_route(route);
    if route.contains(|c: char| matches!(c, ':' | '*' | '{' | '}')) {
        bail!("upload route {:?} must be a literal path", route);
    }
    Ok(route)
}

/// Bind `listen_addr` and serve until Ctrl-C.
pub async fn serve(inbox: Arc<Inbox>, listen_addr: &str, upload_route: &str) -> Result<()> {
    checked_route(upload_route)?;
    let listener = TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", listen_addr))?;
    serve_on(listener, inbox, upload_route, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve_on<F>(
    listener: TcpListener,
    inbox: Arc<Inbox>,
    upload_route: &str,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr().context("listener has no local address")?;
    let route = checked_route(upload_route)?;
    tracing::info!(
        %addr,
        %route,
        dir = %inbox.dir().display(),
        name = %inbox.name(),
        "accepting uploads"
    );
    let app = router(inbox, &route)?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("http server failed")?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("ctrl-c handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

fn normalize_route(route: &str) -> String {
    if route.starts_with('/') {
        route.to_string()
    } else {
        format!("/{}", route)
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn upload(State(inbox): State<Arc<Inbox>>, body: Body) -> Response {
    let reader = StreamReader::new(body.into_data_stream().map_err(io::Error::other));
    match inbox.accept(reader).await {
        Ok(UploadOutcome::Empty) => StatusCode::NO_CONTENT.into_response(),
        Ok(UploadOutcome::Stored(stored)) => {
            let receipt = UploadReceipt {
                file: stored.file_name().to_string(),
                bytes: stored.bytes,
                sha256: stored.sha256,
            };
            (StatusCode::CREATED, Json(receipt)).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn error_response(err: UploadError) -> Response {
    let status = match &err {
        UploadError::AllocationExhausted { .. } => StatusCode::INSUFFICIENT_STORAGE,
        UploadError::InputRead(_) => StatusCode::BAD_REQUEST,
        UploadError::OutputOpen { .. }
        | UploadError::OutputWrite { .. }
        | UploadError::Probe { .. }
        | UploadError::InvalidFilename(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    match std::error::Error::source(&err) {
        Some(source) => tracing::error!(%status, "upload failed: {}: {}", err, source),
        None => tracing::error!(%status, "upload failed: {}", err),
    }
    // Only file names leave the server, never the target directory.
    let message = match &err {
        UploadError::OutputOpen { .. } => format!(
            "could not open {} for writing",
            err.path()
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy())
                .unwrap_or_default()
        ),
        UploadError::OutputWrite { .. } | UploadError::Probe { .. } => {
            "storage error".to_string()
        }
        UploadError::AllocationExhausted { name, attempts, .. } => {
            format!("no free filename for {} after {} attempts", name, attempts)
        }
        other => other.to_string(),
    };
    (status, message).into_response()
}
