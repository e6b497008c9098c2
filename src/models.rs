use crate::store::Document;
use crate::{AppError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CHANNEL_NAME: &str = "Unknown Creator";

fn default_channel_name() -> String {
    DEFAULT_CHANNEL_NAME.to_string()
}

/// Request body of `POST /api/videos`. Unknown fields, `id` included, are
/// ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoIn {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub thumbnail_url: String,
    pub video_url: String,
    #[serde(default = "default_channel_name")]
    pub channel_name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl VideoIn {
    /// Check the fields serde cannot and apply the remaining defaults.
    pub fn into_video(self) -> Result<Video> {
        if self.title.is_empty() {
            return Err(AppError::Validation("title must not be empty".to_string()));
        }

        Ok(Video {
            title: self.title,
            description: self.description.unwrap_or_default(),
            thumbnail_url: self.thumbnail_url,
            video_url: self.video_url,
            channel_name: self.channel_name,
            tags: self.tags,
        })
    }
}

/// A video record as persisted in the `video` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub video_url: String,
    pub channel_name: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct VideoListResponse {
    pub items: Vec<Document>,
}

#[derive(Debug, Serialize)]
pub struct DiagnosticsResponse {
    pub backend: &'static str,
    pub database: String,
    pub database_url: &'static str,
    pub database_name: &'static str,
    pub connection_status: &'static str,
    pub collections: Vec<String>,
}
