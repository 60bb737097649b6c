//! API Handlers
//!
//! HTTP request handlers for each shortener endpoint.
//!
//! The owner namespace comes from the Basic auth username; a request
//! without credentials operates in the global (single-tenant) namespace.
//! Cache degradation indicators returned by the service are logged here
//! and never turned into request failures.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::Redirect,
    Json,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use tracing::{info, warn};

use crate::alias;
use crate::deadline::Deadline;
use crate::error::{AppError, Result};
use crate::models::{
    DeleteResponse, HealthResponse, RenameRequest, RenameResponse, SaveRequest, SaveResponse,
};
use crate::storage::LinkService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The store/cache façade
    pub service: Arc<LinkService>,
    /// Deadline applied to each operation
    pub op_timeout: Duration,
}

impl AppState {
    /// Creates a new AppState around the given service.
    pub fn new(service: Arc<LinkService>, op_timeout: Duration) -> Self {
        Self {
            service,
            op_timeout,
        }
    }

    fn deadline(&self) -> Deadline {
        Deadline::after(self.op_timeout)
    }
}

/// Extracts the owner namespace from the Basic auth username.
///
/// Missing or unparseable credentials select the global namespace.
fn owner_from_headers(headers: &HeaderMap) -> String {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return String::new();
    };
    let Ok(value) = value.to_str() else {
        return String::new();
    };
    let Some(encoded) = value.strip_prefix("Basic ") else {
        return String::new();
    };
    let Ok(decoded) = BASE64.decode(encoded) else {
        return String::new();
    };
    let Ok(decoded) = String::from_utf8(decoded) else {
        return String::new();
    };
    decoded
        .split_once(':')
        .map(|(user, _)| user.to_string())
        .unwrap_or_default()
}

/// Handler for POST /save
///
/// Stores a new short link; generates a random alias when the request
/// does not supply one.
pub async fn save_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SaveRequest>,
) -> Result<Json<SaveResponse>> {
    if let Some(message) = req.validate() {
        return Err(AppError::InvalidRequest(message));
    }

    let owner = owner_from_headers(&headers);
    let alias = req.alias.clone().unwrap_or_else(alias::default_alias);

    let mirror = state
        .service
        .save(state.deadline(), &req.url, &alias, &owner)
        .await?;
    if mirror.is_degraded() {
        warn!(%owner, %alias, "save completed with degraded cache");
    }

    info!(%owner, %alias, "short link saved");
    Ok(Json(SaveResponse::new(&owner, alias)))
}

/// Handler for GET /:alias
///
/// Resolves an alias in the caller's namespace and redirects to the
/// target URL.
pub async fn resolve_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(alias): Path<String>,
) -> Result<Redirect> {
    let owner = owner_from_headers(&headers);
    resolve(&state, &owner, &alias).await
}

/// Handler for GET /u/:owner/:alias
///
/// Resolves an alias in an explicit owner namespace.
pub async fn resolve_owner_handler(
    State(state): State<AppState>,
    Path((owner, alias)): Path<(String, String)>,
) -> Result<Redirect> {
    resolve(&state, &owner, &alias).await
}

async fn resolve(state: &AppState, owner: &str, alias: &str) -> Result<Redirect> {
    let resolved = state.service.lookup(state.deadline(), owner, alias).await?;
    if resolved.cache.is_degraded() {
        warn!(%owner, %alias, "lookup served from store, cache unavailable");
    }

    Ok(Redirect::temporary(&resolved.url))
}

/// Handler for PUT /rename
///
/// Moves a short link to a new alias; generates a random target alias
/// when the request does not supply one.
pub async fn rename_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RenameRequest>,
) -> Result<Json<RenameResponse>> {
    if let Some(message) = req.validate() {
        return Err(AppError::InvalidRequest(message));
    }

    let owner = owner_from_headers(&headers);
    let new_alias = req.new_alias.clone().unwrap_or_else(alias::default_alias);

    let mirror = state
        .service
        .rename(state.deadline(), &owner, &req.alias, &new_alias)
        .await?;
    if mirror.is_degraded() {
        warn!(%owner, alias = %req.alias, %new_alias, "rename completed with degraded cache");
    }

    info!(%owner, alias = %req.alias, %new_alias, "short link renamed");
    Ok(Json(RenameResponse::new(new_alias)))
}

/// Handler for DELETE /:alias
///
/// Removes a short link from the caller's namespace.
pub async fn delete_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(alias): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let owner = owner_from_headers(&headers);

    let mirror = state.service.delete(state.deadline(), &owner, &alias).await?;
    if mirror.is_degraded() {
        warn!(%owner, %alias, "delete completed with degraded cache");
    }

    info!(%owner, %alias, "short link deleted");
    Ok(Json(DeleteResponse::new(alias)))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
