use async_trait::async_trait;
use sqlx::QueryBuilder;
use uuid::Uuid;

use crate::entities::option_fields::OptionField;
use crate::entities::page::{Page, PageInsert, UpdatePageRequest};
use crate::errors::AppError;
use crate::repositories::sqlx_repo::SqlxPageRepo;

#[async_trait]
pub trait PageRepository: Send + Sync {
    async fn list_pages(&self, project_id: &Uuid) -> Result<Vec<Page>, AppError>;
    async fn page_ids(&self, project_id: &Uuid) -> Result<Vec<Uuid>, AppError>;
    async fn get_page(&self, id: &Uuid) -> Result<Option<Page>, AppError>;
    async fn next_order_index(&self, project_id: &Uuid) -> Result<i32, AppError>;
    async fn create_page(&self, insert: &PageInsert) -> Result<Page, AppError>;
    async fn update_page(&self, id: &Uuid, update: &UpdatePageRequest) -> Result<Page, AppError>;
    /// Deletes the page and returns the ids of images its elements were
    /// referencing, for the caller's orphan sweep.
    async fn delete_page(&self, id: &Uuid) -> Result<Vec<Uuid>, AppError>;
    /// Rewrites order_index for every page in the given order. Ownership
    /// and permutation completeness are checked by the caller.
    async fn reorder_pages(&self, project_id: &Uuid, ordered_ids: &[Uuid]) -> Result<(), AppError>;
}

const PAGE_COLUMNS: &str =
    "id, project_id, order_index, template_id, title, subtitle, created_at, updated_at";

#[async_trait]
impl PageRepository for SqlxPageRepo {
    async fn list_pages(&self, project_id: &Uuid) -> Result<Vec<Page>, AppError> {
        let pages = sqlx::query_as::<_, Page>(&format!(
            "SELECT {PAGE_COLUMNS} FROM pages WHERE project_id = $1 \
             ORDER BY order_index ASC, created_at ASC",
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(pages)
    }

    async fn page_ids(&self, project_id: &Uuid) -> Result<Vec<Uuid>, AppError> {
        let ids = sqlx::query_scalar::<_, Uuid>("SELECT id FROM pages WHERE project_id = $1")
            .bind(project_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(ids)
    }

    async fn get_page(&self, id: &Uuid) -> Result<Option<Page>, AppError> {
        let page = sqlx::query_as::<_, Page>(&format!(
            "SELECT {PAGE_COLUMNS} FROM pages WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(page)
    }

    async fn next_order_index(&self, project_id: &Uuid) -> Result<i32, AppError> {
        let next = sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(order_index) + 1, 0) FROM pages WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(next)
    }

    async fn create_page(&self, insert: &PageInsert) -> Result<Page, AppError> {
        let page = sqlx::query_as::<_, Page>(&format!(
            r#"
            INSERT INTO pages (project_id, order_index, template_id, title, subtitle, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PAGE_COLUMNS}
            "#,
        ))
        .bind(insert.project_id)
        .bind(insert.order_index)
        .bind(&insert.template_id)
        .bind(&insert.title)
        .bind(&insert.subtitle)
        .bind(insert.created_at)
        .bind(insert.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(page)
    }

    async fn update_page(&self, id: &Uuid, update: &UpdatePageRequest) -> Result<Page, AppError> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new("UPDATE pages SET ");
        let mut set = builder.separated(", ");

        if let OptionField::SetToValue(template_id) = &update.template_id {
            set.push("template_id = ").push_bind_unseparated(template_id.clone());
        }
        match &update.title {
            OptionField::SetToValue(title) => {
                set.push("title = ").push_bind_unseparated(title.clone());
            }
            OptionField::SetToNull => {
                set.push("title = NULL");
            }
            OptionField::Unchanged => {}
        }
        match &update.subtitle {
            OptionField::SetToValue(subtitle) => {
                set.push("subtitle = ").push_bind_unseparated(subtitle.clone());
            }
            OptionField::SetToNull => {
                set.push("subtitle = NULL");
            }
            OptionField::Unchanged => {}
        }
        set.push("updated_at = NOW()");

        builder.push(" WHERE id = ").push_bind(*id);
        builder.push(&format!(" RETURNING {PAGE_COLUMNS}"));

        let page = builder
            .build_query_as::<Page>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::PageNotFound)?;

        Ok(page)
    }

    async fn delete_page(&self, id: &Uuid) -> Result<Vec<Uuid>, AppError> {
        let image_ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT DISTINCT image_id FROM elements \
             WHERE page_id = $1 AND image_id IS NOT NULL",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let result = sqlx::query("DELETE FROM pages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::PageNotFound);
        }

        Ok(image_ids)
    }

    async fn reorder_pages(&self, project_id: &Uuid, ordered_ids: &[Uuid]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for (index, page_id) in ordered_ids.iter().enumerate() {
            sqlx::query(
                "UPDATE pages SET order_index = $1, updated_at = NOW() \
                 WHERE id = $2 AND project_id = $3",
            )
            .bind(index as i32)
            .bind(page_id)
            .bind(project_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
