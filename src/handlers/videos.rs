//! Video catalogue endpoints.

use crate::document_id::DocumentId;
use crate::models::{CreatedResponse, VideoIn, VideoListResponse};
use crate::store::{Document, ID_FIELD};
use crate::{AppError, AppState, Result};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use std::sync::Arc;

pub const VIDEO_COLLECTION: &str = "video";
pub const LIST_LIMIT: usize = 50;

/// Rename the store's `_id` to `id`. The store always writes `_id` as the
/// identifier's hex string.
fn expose_id(mut doc: Document) -> Document {
    if let Some(id) = doc.remove(ID_FIELD) {
        doc.insert("id".to_string(), id);
    }
    doc
}

pub async fn create_video(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<VideoIn>, JsonRejection>,
) -> Result<Json<CreatedResponse>> {
    let Json(input) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let video = input.into_video()?;

    let id = state
        .store
        .create_document(VIDEO_COLLECTION, &video)
        .await?;

    tracing::info!(id = %id, title = %video.title, "Video created");

    Ok(Json(CreatedResponse { id: id.to_string() }))
}

pub async fn list_videos(State(state): State<Arc<AppState>>) -> Result<Json<VideoListResponse>> {
    let items = state
        .store
        .get_documents(VIDEO_COLLECTION, &Document::new(), LIST_LIMIT)
        .await?
        .into_iter()
        .map(expose_id)
        .collect();

    Ok(Json(VideoListResponse { items }))
}

pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Result<Json<Document>> {
    let id = DocumentId::parse(&video_id).map_err(|e| {
        tracing::warn!("Rejected video lookup: {}", e);
        AppError::InvalidId
    })?;

    let doc = state
        .store
        .find_document(VIDEO_COLLECTION, &id)
        .await
        .map_err(|e| {
            tracing::warn!("Video lookup for {} failed: {}", id, e);
            AppError::InvalidId
        })?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    Ok(Json(expose_id(doc)))
}
