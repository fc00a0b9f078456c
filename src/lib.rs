pub mod batch;
pub mod certificate;
pub mod config;
pub mod error;
pub mod export;
pub mod naming;
pub mod participants;
pub mod pdf;
pub mod render;
pub mod routes;
pub mod state;
pub mod templates;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use certificate::CertificateRecord;
pub use error::{AppError, AppResult};
pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/preview.png", get(routes::preview))
        .route("/certificate", post(routes::download_certificate))
        .route("/api/participants", post(routes::parse_participants))
        .route("/bulk", post(routes::bulk_download))
        .nest_service("/static", tower_http::services::ServeDir::new("static"))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}
