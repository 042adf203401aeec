#![allow(clippy::unused_async)] // axum handlers have to be async

use crate::api::serve::AppState;
use crate::api::util::Outcome;
use crate::minecraft::defaults;
use crate::minecraft::properties::PropertySet;
use crate::store::ServerInfo;
use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse};

/// GET /api/server
pub async fn server_info(State(state): State<AppState>) -> Json<ServerInfo> {
    Json(state.store.info())
}

/// GET /api/properties/defaults
pub async fn default_properties() -> Json<PropertySet> {
    Json(defaults::default_properties().clone())
}

/// GET /api/properties
pub async fn load_properties(State(state): State<AppState>) -> Json<Outcome> {
    Json(Outcome::from(state.store.load()))
}

/// PUT /api/properties
pub async fn save_properties(
    State(state): State<AppState>,
    Json(properties): Json<PropertySet>,
) -> Json<Outcome> {
    let result = state.store.save(&properties);
    if result.is_ok() && state.exit_after_save {
        state.shutdown.notify_one();
    }
    Json(Outcome::from(result))
}

pub async fn index() -> Html<&'static str> {
    Html(include_str!("../resources/web/index.html"))
}

pub async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, mime::APPLICATION_JAVASCRIPT_UTF_8.to_string())],
        include_str!("../resources/web/script.js"),
    )
}

pub async fn style() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, mime::TEXT_CSS_UTF_8.to_string())],
        include_str!("../resources/web/style.css"),
    )
}
