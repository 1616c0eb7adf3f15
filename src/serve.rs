//! The HTTP shell serving on-demand entry thumbnails. Each request is an
//! independent parse-render cycle over a freshly fetched source; no state
//! crosses requests beyond the shared HTTP client.

use crate::config::Config;
use crate::entry::Parser;
use crate::fetch;
use crate::thumbnail;
use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

pub const DEFAULT_PORT: u16 = 5002;

struct AppState {
    config: Config,
    client: reqwest::Client,
}

/// Runs the thumbnail server until the process is stopped.
pub async fn serve(config: Config, port: u16) -> Result<()> {
    let state = Arc::new(AppState {
        client: fetch::client(),
        config,
    });
    let app = Router::new()
        .route("/*title", get(entry_thumbnail))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "serving entry thumbnails");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Looks up the entry whose title matches the (URL-decoded) request path
/// and responds with its rendered SVG. Unknown titles get a plain-text
/// 404; an unreachable source gets a 502.
async fn entry_thumbnail(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
) -> Response {
    let source = match fetch::fetch_source(&state.client, &state.config.source_url).await {
        Ok(source) => source,
        Err(err) => {
            tracing::error!("fetching diary source: {:#}", err);
            return (StatusCode::BAD_GATEWAY, "Source unavailable").into_response();
        }
    };

    // Titles are the lookup key here, so untitled entries can never
    // match; no need to require them at parse time.
    let entries = Parser::new(false).parse(&source);
    match entries
        .into_iter()
        .find(|entry| entry.title.as_deref() == Some(title.as_str()))
    {
        Some(entry) => {
            tracing::debug!(%title, "rendering thumbnail");
            let svg = thumbnail::render_default(&title, &entry.content);
            ([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response()
        }
        None => (StatusCode::NOT_FOUND, "Entry not found").into_response(),
    }
}
