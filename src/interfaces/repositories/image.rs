use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::image::{ImageAsset, ImageInsert};
use crate::errors::AppError;
use crate::repositories::sqlx_repo::SqlxImageRepo;

#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn insert_image(&self, insert: &ImageInsert) -> Result<ImageAsset, AppError>;
    async fn get_image(&self, id: &Uuid) -> Result<Option<ImageAsset>, AppError>;
    async fn element_ref_count(&self, image_id: &Uuid) -> Result<i64, AppError>;
    /// Deletes the image row only when no element references it any more.
    /// Returns the storage path of the deleted file, if a row was removed.
    async fn delete_image_if_unreferenced(
        &self,
        image_id: &Uuid,
    ) -> Result<Option<String>, AppError>;
}

const IMAGE_COLUMNS: &str = "id, project_id, storage_path, mime_type, file_size, created_at";

#[async_trait]
impl ImageRepository for SqlxImageRepo {
    async fn insert_image(&self, insert: &ImageInsert) -> Result<ImageAsset, AppError> {
        let image = sqlx::query_as::<_, ImageAsset>(&format!(
            r#"
            INSERT INTO images (project_id, storage_path, mime_type, file_size, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {IMAGE_COLUMNS}
            "#,
        ))
        .bind(insert.project_id)
        .bind(&insert.storage_path)
        .bind(&insert.mime_type)
        .bind(insert.file_size)
        .bind(insert.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(image)
    }

    async fn get_image(&self, id: &Uuid) -> Result<Option<ImageAsset>, AppError> {
        let image = sqlx::query_as::<_, ImageAsset>(&format!(
            "SELECT {IMAGE_COLUMNS} FROM images WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(image)
    }

    async fn element_ref_count(&self, image_id: &Uuid) -> Result<i64, AppError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM elements WHERE image_id = $1")
                .bind(image_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    async fn delete_image_if_unreferenced(
        &self,
        image_id: &Uuid,
    ) -> Result<Option<String>, AppError> {
        // Check-then-delete is not transactional; a concurrent element
        // create could re-reference the image between the two statements.
        if self.element_ref_count(image_id).await? > 0 {
            return Ok(None);
        }

        let path = sqlx::query_scalar::<_, String>(
            "DELETE FROM images WHERE id = $1 RETURNING storage_path",
        )
        .bind(image_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(path)
    }
}
