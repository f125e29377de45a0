use crate::core::types::{SelectedFile, UPLOAD_FIELD_NAME};
use crate::server::page::render_page;
use crate::server::types::{AppState, SelectResponse};
use axum::extract::{Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use std::sync::Arc;

fn rejected(message: String) -> Response {
    tracing::warn!("{}", message);
    (
        StatusCode::BAD_REQUEST,
        Json(SelectResponse {
            success: false,
            message,
        }),
    )
        .into_response()
}

// portal page handler
pub async fn page_handler(State(state): State<Arc<AppState>>) -> Response {
    let controller = &state.controller;

    // the auto-load fetch runs in its own task; waiting on it here does not
    // cancel it if the client goes away
    if let Some(handle) = controller.present() {
        if let Err(e) = handle.await {
            tracing::error!("auto-load task panicked: {}", e);
        }
    }

    let selected = controller.selected().await;
    let report = controller.report().await;
    match render_page(controller.mode(), selected.as_ref(), &report) {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            tracing::error!("Error rendering portal page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

// file selection handler, keeps the multipart `file_upload` field as the selection
pub async fn select_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Response {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return rejected(format!("Failed to parse multipart data: {}", e)),
        };

        if field.name() != Some(UPLOAD_FIELD_NAME) {
            continue;
        }

        let name = field.file_name().unwrap_or_default().to_string();
        if name.is_empty() {
            return rejected("No file selected".to_string());
        }
        let mime_type = field.content_type().map(String::from);

        let content = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return rejected(format!("Failed to read file {}: {}", name, e)),
        };

        state
            .controller
            .select(SelectedFile::new(name, content, mime_type))
            .await;
        return Redirect::to("/").into_response();
    }

    rejected(format!("Missing required field: '{}'", UPLOAD_FIELD_NAME))
}

// starts a workflow run and returns immediately; failures only reach the logs
pub async fn upload_handler(State(state): State<Arc<AppState>>) -> Redirect {
    if state.controller.start_upload().await.is_none() {
        tracing::debug!("upload requested with no file selected");
    }
    Redirect::to("/")
}

pub async fn report_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        state.controller.report().await,
    )
}

pub async fn status_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.controller.status().await)
}
