use axum::{routing::get, Router};
use std::sync::Arc;

use crate::storage::Storage;

use super::handlers::{list_clicks, root, track_click, track_open, AppState};

pub fn create_router(storage: Arc<dyn Storage>, signup_url: String) -> Router {
    let state = Arc::new(AppState {
        storage,
        signup_url,
    });

    Router::new()
        .route("/", get(root))
        .route("/track_open", get(track_open))
        .route("/track_click", get(track_click))
        .route("/clicks", get(list_clicks))
        .with_state(state)
}
