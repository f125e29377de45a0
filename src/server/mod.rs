use crate::config::PortalMode;
use crate::server::handlers::{
    page_handler, report_handler, select_handler, status_handler, upload_handler,
};
use crate::server::types::AppState;
use axum::extract::DefaultBodyLimit;
use axum::{Router, routing::get, routing::post};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub mod handlers;
pub mod page;
pub mod types;

/// Builds the portal router. Selection and upload routes only exist in
/// upload mode.
pub fn app(state: AppState, body_limit_bytes: usize) -> Router {
    let mode = state.controller.mode();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/", get(page_handler))
        .route("/report", get(report_handler))
        .route("/status", get(status_handler));

    if mode == PortalMode::Upload {
        router = router
            .route("/select", post(select_handler))
            .route("/upload", post(upload_handler));
    }

    router
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}
