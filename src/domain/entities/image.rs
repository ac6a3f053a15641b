use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ImageAsset {
    pub id: Uuid,
    pub project_id: Uuid,
    pub storage_path: String,
    pub mime_type: String,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ImageInsert {
    pub project_id: Uuid,
    pub storage_path: String,
    pub mime_type: String,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub id: Uuid,
    pub image_url: String,
    pub mime_type: String,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
}

impl From<ImageAsset> for ImageResponse {
    fn from(image: ImageAsset) -> Self {
        ImageResponse {
            image_url: image_file_url(&image.id),
            id: image.id,
            mime_type: image.mime_type,
            file_size: image.file_size,
            created_at: image.created_at,
        }
    }
}

/// Derived URL under which an image's bytes are served.
pub fn image_file_url(id: &Uuid) -> String {
    format!("/api/images/{id}/file")
}
