//! Firework request handlers.

use super::error::ApiError;
use super::AppState;
use crate::service::{FireworkView, ServiceError};
use crate::store::{FireworkId, FireworkStore};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Multipart, Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum::extract::multipart::MultipartRejection;
use serde::Deserialize;

/// Body of `PUT /fireworks/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub is_shareable: bool,
}

fn firework_id(path: Result<Path<FireworkId>, PathRejection>) -> Result<FireworkId, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|e| ApiError::BadRequest(format!("invalid firework id: {}", e.body_text())))
}

/// `GET /fireworks`
pub(super) async fn list_fireworks<S: FireworkStore + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<FireworkView>>, ApiError> {
    Ok(Json(state.service.list()?))
}

/// `GET /fireworks/{id}`
pub(super) async fn get_firework<S: FireworkStore + 'static>(
    State(state): State<AppState<S>>,
    path: Result<Path<FireworkId>, PathRejection>,
) -> Result<Json<FireworkView>, ApiError> {
    let id = firework_id(path)?;
    Ok(Json(state.service.get(id)?))
}

/// `POST /fireworks` with a multipart form holding `image` and
/// optionally `is_shareable`.
///
/// Only the literal text `true` makes a firework shareable. When a field
/// is repeated, the first occurrence is used.
pub(super) async fn create_firework<S: FireworkStore + 'static>(
    State(state): State<AppState<S>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let mut multipart = multipart
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart form: {}", e.body_text())))?;

    let mut image = None;
    let mut is_shareable = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("image") if image.is_none() => {
                tracing::debug!(
                    file_name = field.file_name().unwrap_or(""),
                    content_type = field.content_type().unwrap_or(""),
                    "Received image field"
                );
                image = Some(field.bytes().await?);
            }
            Some("is_shareable") if is_shareable.is_none() => {
                is_shareable = Some(field.text().await? == "true");
            }
            _ => {}
        }
    }

    let image = image.ok_or_else(|| ApiError::BadRequest("no image file provided".into()))?;
    let is_shareable = is_shareable.unwrap_or(false);

    // Decoding and resampling are CPU-bound.
    let service = state.service.clone();
    let result = tokio::task::spawn_blocking(move || service.ingest(&image, is_shareable))
        .await
        .map_err(|e| ApiError::Internal(format!("ingest task failed: {}", e)))?;

    if let Some(metrics) = &state.metrics {
        match &result {
            Ok(_) => metrics.record_ingest(),
            Err(ServiceError::Decode(_)) => metrics.record_decode_failure(),
            Err(_) => {}
        }
    }
    let view = result?;
    state.refresh_stored();

    Ok((StatusCode::CREATED, Json(view)))
}

/// `PUT /fireworks/{id}` with a JSON body `{"is_shareable": bool}`.
pub(super) async fn update_firework<S: FireworkStore + 'static>(
    State(state): State<AppState<S>>,
    path: Result<Path<FireworkId>, PathRejection>,
    body: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Json<FireworkView>, ApiError> {
    let id = firework_id(path)?;
    let Json(request) =
        body.map_err(|e| ApiError::BadRequest(format!("invalid request: {}", e.body_text())))?;

    let view = state.service.update(id, request.is_shareable)?;
    if let Some(metrics) = &state.metrics {
        metrics.record_update();
    }
    Ok(Json(view))
}

/// `DELETE /fireworks/{id}`
pub(super) async fn delete_firework<S: FireworkStore + 'static>(
    State(state): State<AppState<S>>,
    path: Result<Path<FireworkId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = firework_id(path)?;
    state.service.delete(id)?;

    if let Some(metrics) = &state.metrics {
        metrics.record_delete();
    }
    state.refresh_stored();
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /metrics`
pub(super) async fn metrics_handler<S: FireworkStore + 'static>(
    State(state): State<AppState<S>>,
) -> impl IntoResponse {
    let Some(metrics) = &state.metrics else {
        return (
            StatusCode::NOT_FOUND,
            [("content-type", "text/plain; charset=utf-8")],
            "metrics disabled".to_string(),
        );
    };

    match metrics.encode() {
        Ok(output) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            output,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {}", e),
        ),
    }
}

/// `GET /health`
pub(super) async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
