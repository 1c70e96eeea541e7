//! HTTP surface for the sync server.
//!
//! Routes, per trench:
//!
//! - `POST /{trench}` - push reconciliation; body and response are JSON
//! - `GET /{trench}/{*attachment}` - read a blob (`If-Match` validator)
//! - `PUT /{trench}/{*attachment}` - store a blob (`ETag` validator)
//!
//! Store work is synchronous and runs on the blocking pool; the per-trench
//! lock taken by [`FileTrench::open`] serializes concurrent requests against
//! one trench.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handlers;
use crate::reconcile::reconcile;
use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::{header, HeaderMap, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use trowel_protocol::{PushRequest, PushResponse};
use trowel_store::FileTrench;

/// Shared state for all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Creates the handler state from a configuration.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Builds the application router.
#[must_use]
pub fn app_router(state: AppState) -> Router {
    let body_limit = state.config.max_attachment_bytes;
    Router::new()
        .route("/{trench}", post(handle_push))
        .route(
            "/{trench}/{*attachment}",
            get(handle_read_attachment).put(handle_write_attachment),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the configured address and serves requests until shutdown.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    let addr = config.bind_addr;
    let router = app_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "trowel listening");
    axum::serve(listener, router).await
}

async fn handle_push(
    State(state): State<AppState>,
    Path(trench): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<Response, ServerError> {
    reject_parent_segments(&trench)?;
    let request = PushRequest::from_json(&body)
        .map_err(|e| ServerError::InvalidRequest(format!("invalid push request: {e}")))?;
    let pretty = params.contains_key("debug");

    let root = state.config.root.clone();
    let response = run_blocking(move || {
        let _span = tracing::info_span!("push", trench = %trench).entered();
        let mut handle = FileTrench::open(&root, &trench)?;
        reconcile(&mut handle, &request)
    })
    .await?;

    json_response(&response, pretty)
}

async fn handle_read_attachment(
    State(state): State<AppState>,
    Path((trench, attachment)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    reject_parent_segments(&trench)?;
    reject_parent_segments(&attachment)?;
    let checksum = quoted_header(&headers, header::IF_MATCH);

    let root = state.config.root.clone();
    let name = attachment.clone();
    let validator = checksum.clone();
    let (data, _meta) = run_blocking(move || {
        let _span = tracing::info_span!("read", trench = %trench).entered();
        let handle = FileTrench::open(&root, &trench)?;
        handlers::read_attachment(&handle, &name, &validator)
    })
    .await?;

    Ok(([(header::ETAG, format!("\"{checksum}\""))], data).into_response())
}

async fn handle_write_attachment(
    State(state): State<AppState>,
    Path((trench, attachment)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, ServerError> {
    // The Bytes extractor has already consumed the body, so rejections below
    // leave the connection drained and reusable.
    reject_parent_segments(&trench)?;
    reject_parent_segments(&attachment)?;
    let checksum = quoted_header(&headers, header::ETAG);

    let root = state.config.root.clone();
    run_blocking(move || {
        let _span = tracing::info_span!("write", trench = %trench).entered();
        let mut handle = FileTrench::open(&root, &trench)?;
        handlers::write_attachment(&mut handle, &attachment, &checksum, &body)
    })
    .await?;

    Ok(StatusCode::OK)
}

async fn run_blocking<T, F>(f: F) -> ServerResult<T>
where
    F: FnOnce() -> ServerResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
}

fn json_response(response: &PushResponse, pretty: bool) -> Result<Response, ServerError> {
    let body = response
        .to_json(pretty)
        .map_err(|e| ServerError::Internal(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// Rejects any path whose segments contain a parent-directory token, before
/// any trench is opened.
fn reject_parent_segments(path: &str) -> ServerResult<()> {
    if path.split('/').any(|segment| segment == "..") {
        return Err(ServerError::InvalidPath(path.to_string()));
    }
    Ok(())
}

fn quoted_header(headers: &HeaderMap, name: HeaderName) -> String {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .trim_matches('"')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_segments_are_rejected() {
        assert!(reject_parent_segments("..").is_err());
        assert!(reject_parent_segments("photos/../secret").is_err());
        assert!(reject_parent_segments("../trench").is_err());
    }

    #[test]
    fn normal_paths_pass() {
        assert!(reject_parent_segments("area-a").is_ok());
        assert!(reject_parent_segments("photos/day1/p1.jpg").is_ok());
        // Only the parent-directory token is rejected at this layer.
        assert!(reject_parent_segments("..hidden").is_ok());
    }

    #[test]
    fn header_quotes_are_stripped() {
        let mut headers = HeaderMap::new();
        headers.insert(header::IF_MATCH, "\"2023-01-01\"".parse().unwrap());
        assert_eq!(quoted_header(&headers, header::IF_MATCH), "2023-01-01");
    }

    #[test]
    fn absent_header_reads_empty() {
        let headers = HeaderMap::new();
        assert_eq!(quoted_header(&headers, header::ETAG), "");
    }

    #[test]
    fn router_builds() {
        let _router = app_router(AppState::new(ServerConfig::default()));
    }
}
