//! Proxy server
//!
//! Axum router serving:
//! - `/rovers/{name}` and `/apod`, relayed to the NASA API with the server's key
//! - `/` the dashboard page and `/select` the rover selection event, both
//!   scoped to the caller's browser session
//! - `/health`
//! - static assets for everything else

pub mod session;
pub mod upstream;

use std::path::Path;
use std::sync::Arc;

use axum::extract::{Path as UrlPath, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::error::{ProxyError, UnknownRover};
use crate::state::{ApplicationState, RoverName};
use crate::ui::{page, views};

pub use session::{SessionRegistry, SESSION_COOKIE};
pub use upstream::UpstreamClient;

/// Shared handler state
#[derive(Clone)]
pub struct ProxyState {
    upstream: Arc<UpstreamClient>,
    sessions: SessionRegistry,
}

impl ProxyState {
    pub fn new(upstream: UpstreamClient, sessions: SessionRegistry) -> Self {
        Self {
            upstream: Arc::new(upstream),
            sessions,
        }
    }
}

/// Build the proxy router
pub fn router(state: ProxyState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/select", get(select_rover))
        .route("/rovers/{name}", get(rover_photos))
        .route("/apod", get(apod))
        .route("/health", get(health))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `router` on `listener` until Ctrl-C
pub async fn serve(listener: TcpListener, router: Router) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("🌐 proxy listening on http://{}", addr);
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "could not listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("proxy shutting down");
}

async fn rover_photos(
    State(state): State<ProxyState>,
    UrlPath(name): UrlPath<String>,
) -> Result<Json<Value>, ProxyError> {
    let rover = RoverName::from_slug(&name).ok_or(UnknownRover(name))?;

    match state.upstream.rover_photos(rover).await {
        Ok(body) => Ok(Json(body)),
        Err(err) => {
            warn!(%rover, error = %err, "rover photos request failed");
            Err(err)
        }
    }
}

async fn apod(State(state): State<ProxyState>) -> Result<Json<Value>, ProxyError> {
    match state.upstream.apod().await {
        Ok(image) => Ok(Json(json!({ "image": image }))),
        Err(err) => {
            warn!(error = %err, "apod request failed");
            Err(err)
        }
    }
}

/// The caller's dashboard, or the initial one for a new or unknown session
async fn dashboard_page(State(state): State<ProxyState>, headers: HeaderMap) -> Html<String> {
    let markup = session::session_id(&headers)
        .and_then(|session_id| state.sessions.get(&session_id))
        .map(|session| session.mount.markup())
        .filter(|markup| !markup.is_empty())
        .unwrap_or_else(|| views::compose_app(&ApplicationState::new()));
    Html(page::document(&markup))
}

#[derive(Debug, Deserialize)]
struct SelectParams {
    #[serde(default)]
    rover: String,
}

/// Selector change event: run one selection cycle in the caller's session,
/// then show the page again
async fn select_rover(
    State(state): State<ProxyState>,
    headers: HeaderMap,
    Query(params): Query<SelectParams>,
) -> Response {
    let rover = match params.rover.parse::<RoverName>() {
        Ok(rover) => rover,
        Err(err) => {
            debug!(value = %params.rover, "ignoring selection");
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": err.to_string() })))
                .into_response();
        }
    };

    let existing = session::session_id(&headers)
        .and_then(|session_id| state.sessions.get(&session_id).map(|session| (session_id, session)));
    let (session_id, session, is_new) = match existing {
        Some((session_id, session)) => (session_id, session, false),
        None => {
            let (session_id, session) = state.sessions.create();
            (session_id, session, true)
        }
    };

    match session.handle.select(rover).await {
        Ok(outcome) => {
            debug!(%rover, session = %session_id, ?outcome, "selection finished");
            let mut response = Redirect::to("/").into_response();
            if is_new {
                if let Some(cookie) = session::session_cookie(&session_id) {
                    response.headers_mut().insert(header::SET_COOKIE, cookie);
                }
            }
            response
        }
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
    }
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
