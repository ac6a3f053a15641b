use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::constants::MAX_UPLOAD_BYTES;
use crate::entities::image::{ImageAsset, ImageInsert, ImageResponse};
use crate::errors::AppError;
use crate::infrastructure::storage::images::ImageStorage;
use crate::repositories::image::ImageRepository;

/// Upload types we accept, matched by magic bytes rather than the
/// client-supplied content type.
const ACCEPTED_MIME_TYPES: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/webp", "webp"),
    ("image/gif", "gif"),
];

pub struct ImageHandler<I>
where
    I: ImageRepository,
{
    pub image_repo: Arc<I>,
    pub storage: ImageStorage,
}

impl<I> ImageHandler<I>
where
    I: ImageRepository,
{
    pub fn new(image_repo: Arc<I>, storage: ImageStorage) -> Self {
        ImageHandler { image_repo, storage }
    }

    pub async fn upload(&self, project_id: &Uuid, data: &[u8]) -> Result<ImageResponse, AppError> {
        if data.is_empty() {
            return Err(AppError::field("file", "uploaded file is empty"));
        }
        if data.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::field(
                "file",
                &format!("uploaded file exceeds the {} byte limit", MAX_UPLOAD_BYTES),
            ));
        }

        let (mime_type, extension) = sniff_image_type(data)?;

        let storage_path = self.storage.save(data, extension).await?;
        let insert = ImageInsert {
            project_id: *project_id,
            storage_path: storage_path.clone(),
            mime_type: mime_type.to_string(),
            file_size: data.len() as i64,
            created_at: Utc::now(),
        };

        let image = match self.image_repo.insert_image(&insert).await {
            Ok(image) => image,
            Err(e) => {
                // Do not leave the file behind if the row never landed.
                let _ = self.storage.remove(&storage_path).await;
                return Err(e);
            }
        };

        info!(image_id = %image.id, size = image.file_size, mime = %image.mime_type, "image uploaded");
        Ok(image.into())
    }

    pub async fn serve(&self, image_id: &Uuid) -> Result<(ImageAsset, Vec<u8>), AppError> {
        let image = self
            .image_repo
            .get_image(image_id)
            .await?
            .ok_or(AppError::ImageNotFound)?;

        let bytes = self.storage.read(&image.storage_path).await?;
        Ok((image, bytes))
    }
}

fn sniff_image_type(data: &[u8]) -> Result<(&'static str, &'static str), AppError> {
    let kind = infer::get(data)
        .ok_or_else(|| AppError::field("file", "unrecognized file format"))?;

    ACCEPTED_MIME_TYPES
        .iter()
        .find(|(mime, _)| *mime == kind.mime_type())
        .copied()
        .ok_or_else(|| {
            AppError::field("file", "only PNG, JPEG, WebP and GIF images are accepted")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal valid magic byte prefixes.
    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0];

    #[test]
    fn recognizes_png_and_jpeg_by_magic_bytes() {
        assert_eq!(sniff_image_type(PNG_MAGIC).unwrap(), ("image/png", "png"));
        assert_eq!(sniff_image_type(JPEG_MAGIC).unwrap(), ("image/jpeg", "jpg"));
    }

    #[test]
    fn rejects_non_image_payloads() {
        assert!(sniff_image_type(b"%PDF-1.4 not an image").is_err());
        assert!(sniff_image_type(b"plain text").is_err());
    }
}
