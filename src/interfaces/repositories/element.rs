use async_trait::async_trait;
use sqlx::QueryBuilder;
use uuid::Uuid;

use crate::entities::element::{ElementInsert, ElementRow, UpdateElementRequest};
use crate::entities::option_fields::OptionField;
use crate::errors::AppError;
use crate::repositories::sqlx_repo::SqlxElementRepo;

#[async_trait]
pub trait ElementRepository: Send + Sync {
    async fn list_elements(&self, page_id: &Uuid) -> Result<Vec<ElementRow>, AppError>;
    async fn get_element(&self, id: &Uuid) -> Result<Option<ElementRow>, AppError>;
    async fn count_image_elements(&self, page_id: &Uuid) -> Result<i64, AppError>;
    async fn insert_element(&self, insert: &ElementInsert) -> Result<ElementRow, AppError>;
    async fn update_element(
        &self,
        id: &Uuid,
        update: &UpdateElementRequest,
    ) -> Result<ElementRow, AppError>;
    async fn delete_element(&self, id: &Uuid) -> Result<(), AppError>;
}

const ELEMENT_COLUMNS: &str = "id, page_id, element_type, x, y, width, height, content, \
     image_id, crop_x, crop_y, crop_zoom, animation_prompt, video_url, video_status, \
     created_at, updated_at";

#[async_trait]
impl ElementRepository for SqlxElementRepo {
    async fn list_elements(&self, page_id: &Uuid) -> Result<Vec<ElementRow>, AppError> {
        let rows = sqlx::query_as::<_, ElementRow>(&format!(
            "SELECT {ELEMENT_COLUMNS} FROM elements WHERE page_id = $1 ORDER BY created_at ASC",
        ))
        .bind(page_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get_element(&self, id: &Uuid) -> Result<Option<ElementRow>, AppError> {
        let row = sqlx::query_as::<_, ElementRow>(&format!(
            "SELECT {ELEMENT_COLUMNS} FROM elements WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn count_image_elements(&self, page_id: &Uuid) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM elements WHERE page_id = $1 AND element_type = 'image'",
        )
        .bind(page_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn insert_element(&self, insert: &ElementInsert) -> Result<ElementRow, AppError> {
        let row = sqlx::query_as::<_, ElementRow>(&format!(
            r#"
            INSERT INTO elements
                (page_id, element_type, x, y, width, height, content, image_id,
                 crop_x, crop_y, crop_zoom, animation_prompt, video_url, video_status,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {ELEMENT_COLUMNS}
            "#,
        ))
        .bind(insert.page_id)
        .bind(&insert.element_type)
        .bind(insert.x)
        .bind(insert.y)
        .bind(insert.width)
        .bind(insert.height)
        .bind(&insert.content)
        .bind(insert.image_id)
        .bind(insert.crop_x)
        .bind(insert.crop_y)
        .bind(insert.crop_zoom)
        .bind(&insert.animation_prompt)
        .bind(&insert.video_url)
        .bind(&insert.video_status)
        .bind(insert.created_at)
        .bind(insert.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_element(
        &self,
        id: &Uuid,
        update: &UpdateElementRequest,
    ) -> Result<ElementRow, AppError> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new("UPDATE elements SET ");
        let mut set = builder.separated(", ");

        if let OptionField::SetToValue(position) = &update.position {
            set.push("x = ").push_bind_unseparated(position.x);
            set.push("y = ").push_bind_unseparated(position.y);
            set.push("width = ").push_bind_unseparated(position.width);
            set.push("height = ").push_bind_unseparated(position.height);
        }
        if let OptionField::SetToValue(content) = &update.content {
            set.push("content = ").push_bind_unseparated(content.clone());
        }
        match &update.image_id {
            OptionField::SetToValue(image_id) => {
                set.push("image_id = ").push_bind_unseparated(*image_id);
            }
            OptionField::SetToNull => {
                set.push("image_id = NULL");
            }
            OptionField::Unchanged => {}
        }
        match &update.crop_data {
            OptionField::SetToValue(crop) => {
                set.push("crop_x = ").push_bind_unseparated(crop.x);
                set.push("crop_y = ").push_bind_unseparated(crop.y);
                set.push("crop_zoom = ").push_bind_unseparated(crop.zoom);
            }
            OptionField::SetToNull => {
                set.push("crop_x = NULL");
                set.push("crop_y = NULL");
                set.push("crop_zoom = NULL");
            }
            OptionField::Unchanged => {}
        }
        match &update.animation_prompt {
            OptionField::SetToValue(prompt) => {
                set.push("animation_prompt = ").push_bind_unseparated(prompt.clone());
            }
            OptionField::SetToNull => {
                set.push("animation_prompt = NULL");
            }
            OptionField::Unchanged => {}
        }
        match &update.video_url {
            OptionField::SetToValue(url) => {
                set.push("video_url = ").push_bind_unseparated(url.clone());
            }
            OptionField::SetToNull => {
                set.push("video_url = NULL");
            }
            OptionField::Unchanged => {}
        }
        if let OptionField::SetToValue(status) = &update.video_status {
            set.push("video_status = ").push_bind_unseparated(status.as_str());
        }
        set.push("updated_at = NOW()");

        builder.push(" WHERE id = ").push_bind(*id);
        builder.push(&format!(" RETURNING {ELEMENT_COLUMNS}"));

        let row = builder
            .build_query_as::<ElementRow>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::ElementNotFound)?;

        Ok(row)
    }

    async fn delete_element(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM elements WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ElementNotFound);
        }

        Ok(())
    }
}
