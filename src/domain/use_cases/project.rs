use std::sync::Arc;

use slug::slugify;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::entities::project::{
    AccessProjectRequest, NewProjectRequest, ProjectCreatedResponse, ProjectResponse,
};
use crate::entities::token::AuthResponse;
use crate::errors::AppError;
use crate::infrastructure::auth::password::{hash_password, verify_password};
use crate::infrastructure::storage::images::ImageStorage;
use crate::repositories::project::ProjectRepository;
use crate::repositories::token::TokenService;

const TOKEN_TYPE: &str = "Bearer";
const MAX_SLUG_ATTEMPTS: u32 = 20;

/// Project lifecycle and password-based access, generic over storage and
/// token issuance so tests can swap in fakes.
pub struct ProjectHandler<R, T>
where
    R: ProjectRepository,
    T: TokenService,
{
    pub project_repo: Arc<R>,
    pub token_service: Arc<T>,
    pub storage: ImageStorage,
}

impl<R, T> ProjectHandler<R, T>
where
    R: ProjectRepository,
    T: TokenService,
{
    pub fn new(project_repo: Arc<R>, token_service: Arc<T>, storage: ImageStorage) -> Self {
        ProjectHandler { project_repo, token_service, storage }
    }

    pub async fn create_project(
        &self,
        request: NewProjectRequest,
    ) -> Result<ProjectCreatedResponse, AppError> {
        request.validate()?;

        let slug = self.unique_slug(&request.name).await?;
        let password_hash = hash_password(&request.password)?;
        let insert = request.prepare_for_insert(slug, password_hash);

        let project = self.project_repo.create_project(&insert).await?;
        let access_token = self.token_service.create_jwt(&project)?;

        info!(slug = %project.slug, "project created");

        Ok(ProjectCreatedResponse {
            project: project.into(),
            access_token,
            token_type: TOKEN_TYPE.to_string(),
        })
    }

    /// Wrong slug and wrong password produce the same error, so the
    /// endpoint cannot be used to probe which slugs exist.
    pub async fn access_project(
        &self,
        request: AccessProjectRequest,
    ) -> Result<(ProjectResponse, AuthResponse), AppError> {
        request.validate()?;

        let project = self
            .project_repo
            .get_project_by_slug(&request.slug)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(&request.password, &project.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let access_token = self.token_service.create_jwt(&project)?;

        Ok((
            project.into(),
            AuthResponse {
                access_token,
                token_type: TOKEN_TYPE.to_string(),
            },
        ))
    }

    pub async fn get_project(&self, project_id: &Uuid) -> Result<ProjectResponse, AppError> {
        let project = self
            .project_repo
            .get_project_by_id(project_id)
            .await?
            .ok_or(AppError::ProjectNotFound)?;

        Ok(project.into())
    }

    /// Removes the project and everything under it. Database rows go first
    /// (cascade), then the image files; a file that fails to unlink is
    /// logged and skipped rather than failing the whole delete.
    pub async fn delete_project(&self, project_id: &Uuid) -> Result<(), AppError> {
        let paths = self.project_repo.delete_project(project_id).await?;

        for path in &paths {
            if let Err(e) = self.storage.remove(path).await {
                tracing::warn!(path = %path, error = %e, "failed to remove image file");
            }
        }

        info!(project_id = %project_id, images_removed = paths.len(), "project deleted");
        Ok(())
    }

    async fn unique_slug(&self, name: &str) -> Result<String, AppError> {
        let mut base = slugify(name);
        if base.is_empty() {
            base = "gazette".to_string();
        }

        if !self.project_repo.slug_exists(&base).await? {
            return Ok(base);
        }

        for n in 2..=MAX_SLUG_ATTEMPTS {
            let candidate = format!("{base}-{n}");
            if !self.project_repo.slug_exists(&candidate).await? {
                return Ok(candidate);
            }
        }

        // Heavily contended name; fall back to a random suffix.
        Ok(format!("{base}-{}", &Uuid::new_v4().simple().to_string()[..8]))
    }
}
