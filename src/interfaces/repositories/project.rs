use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::project::{Project, ProjectInsert};
use crate::errors::AppError;
use crate::repositories::sqlx_repo::SqlxProjectRepo;

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    async fn create_project(&self, insert: &ProjectInsert) -> Result<Project, AppError>;
    async fn get_project_by_id(&self, id: &Uuid) -> Result<Option<Project>, AppError>;
    async fn get_project_by_slug(&self, slug: &str) -> Result<Option<Project>, AppError>;
    async fn slug_exists(&self, slug: &str) -> Result<bool, AppError>;
    /// Deletes the project row; pages, elements and image rows go with it
    /// via cascade. Returns the storage paths of the project's images so
    /// the caller can unlink the files afterwards.
    async fn delete_project(&self, id: &Uuid) -> Result<Vec<String>, AppError>;
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_project(&self, insert: &ProjectInsert) -> Result<Project, AppError> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, slug, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, slug, password_hash, created_at
            "#,
        )
        .bind(&insert.name)
        .bind(&insert.slug)
        .bind(&insert.password_hash)
        .bind(insert.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    async fn get_project_by_id(&self, id: &Uuid) -> Result<Option<Project>, AppError> {
        let project = sqlx::query_as::<_, Project>(
            "SELECT id, name, slug, password_hash, created_at FROM projects WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn get_project_by_slug(&self, slug: &str) -> Result<Option<Project>, AppError> {
        let project = sqlx::query_as::<_, Project>(
            "SELECT id, name, slug, password_hash, created_at FROM projects WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM projects WHERE slug = $1)",
        )
        .bind(slug)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn delete_project(&self, id: &Uuid) -> Result<Vec<String>, AppError> {
        let paths = sqlx::query_scalar::<_, String>(
            "SELECT storage_path FROM images WHERE project_id = $1",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ProjectNotFound);
        }

        Ok(paths)
    }
}
