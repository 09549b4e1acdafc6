use axum::{
    extract::{ConnectInfo, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::{Arc, LazyLock};

use crate::models::{Event, EventType};
use crate::storage::Storage;

/// 1x1 transparent GIF, served for every pixel-beacon request.
const ONE_PIXEL_GIF_BASE64: &str = "R0lGODlhAQABAPAAAAAAAAAAACH5BAEAAAAALAAAAAABAAEAAAICRAEAOw==";

pub static ONE_PIXEL_GIF: LazyLock<Vec<u8>> = LazyLock::new(|| {
    BASE64
        .decode(ONE_PIXEL_GIF_BASE64)
        .expect("embedded pixel payload is valid base64")
});

pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub signup_url: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Deserialize)]
pub struct TrackQuery {
    /// Missing or unparseable email is accepted as empty; tracking never
    /// rejects a request over its input.
    #[serde(default)]
    pub email: String,
}

/// Static usage description
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to the Email Tracker API. Use /track_open?email=you@example.com \
                  for open beacons and /track_click?email=you@example.com for tracked links."
            .to_string(),
    })
}

/// Record an email-open event and serve the tracking pixel
pub async fn track_open(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TrackQuery>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let client_ip = addr.ip().to_string();
    tracing::info!(email = %query.email, ip = %client_ip, "email opened");

    state
        .storage
        .insert(&query.email, &client_ip, EventType::Open)
        .await
        .map_err(storage_error)?;

    Ok((
        [(header::CONTENT_TYPE, "image/gif")],
        ONE_PIXEL_GIF.as_slice(),
    ))
}

/// Record a link-click event and redirect to the signup page
pub async fn track_click(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TrackQuery>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let client_ip = addr.ip().to_string();
    tracing::info!(email = %query.email, ip = %client_ip, "link clicked");

    state
        .storage
        .insert(&query.email, &client_ip, EventType::Click)
        .await
        .map_err(storage_error)?;

    // 302 built by hand: axum's Redirect helpers only emit 303/307/308
    let location = format!("{}?email={}", state.signup_url, query.email);
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]))
}

/// Dump every recorded event
pub async fn list_clicks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Event>>, (StatusCode, Json<ErrorResponse>)> {
    let events = state.storage.list_all().await.map_err(storage_error)?;
    Ok(Json(events))
}

fn storage_error(err: crate::storage::StorageError) -> (StatusCode, Json<ErrorResponse>) {
    tracing::error!(error = %err, "storage operation failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: format!("storage operation failed: {}", err),
        }),
    )
}
