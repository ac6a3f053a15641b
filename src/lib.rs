pub mod constants;
pub mod domain;
pub mod editor;
pub mod errors;
pub mod graceful_shutdown;
pub mod infrastructure;
pub mod interfaces;
pub mod settings;

pub use domain::entities;
pub use domain::use_cases;
pub use interfaces::repositories;

use std::sync::Arc;

use sqlx::PgPool;

use crate::infrastructure::auth::jwt::JwtService;
use crate::infrastructure::storage::images::ImageStorage;
use crate::repositories::sqlx_repo::{
    SqlxElementRepo, SqlxImageRepo, SqlxPageRepo, SqlxProjectRepo,
};
use crate::use_cases::element::ElementHandler;
use crate::use_cases::image::ImageHandler;
use crate::use_cases::page::PageHandler;
use crate::use_cases::project::ProjectHandler;

pub type ProjectUseCase = ProjectHandler<SqlxProjectRepo, JwtService>;
pub type PageUseCase = PageHandler<SqlxPageRepo, SqlxElementRepo, SqlxImageRepo>;
pub type ElementUseCase = ElementHandler<SqlxElementRepo, SqlxPageRepo, SqlxImageRepo>;
pub type ImageUseCase = ImageHandler<SqlxImageRepo>;

/// Shared application state handed to every worker.
pub struct AppState {
    pub project_handler: ProjectUseCase,
    pub page_handler: PageUseCase,
    pub element_handler: ElementUseCase,
    pub image_handler: ImageUseCase,
}

impl AppState {
    pub fn new(pool: PgPool, jwt_service: Arc<JwtService>, storage: ImageStorage) -> Self {
        let project_repo = Arc::new(SqlxProjectRepo { pool: pool.clone() });
        let page_repo = Arc::new(SqlxPageRepo { pool: pool.clone() });
        let element_repo = Arc::new(SqlxElementRepo { pool: pool.clone() });
        let image_repo = Arc::new(SqlxImageRepo { pool });

        AppState {
            project_handler: ProjectHandler::new(project_repo, jwt_service, storage.clone()),
            page_handler: PageHandler::new(
                page_repo.clone(),
                element_repo.clone(),
                image_repo.clone(),
                storage.clone(),
            ),
            element_handler: ElementHandler::new(
                element_repo,
                page_repo,
                image_repo.clone(),
                storage.clone(),
            ),
            image_handler: ImageHandler::new(image_repo, storage),
        }
    }
}
