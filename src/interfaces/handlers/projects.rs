use actix_web::{delete, get, post, web, HttpResponse};

use crate::entities::element::{Element, ElementResponse};
use crate::entities::page::{PageResponse, PageWithElements};
use crate::entities::project::{
    AccessProjectRequest, GazetteResponse, NewProjectRequest, ProjectCreatedResponse,
};
use crate::errors::AppError;
use crate::repositories::element::ElementRepository;
use crate::repositories::page::PageRepository;
use crate::repositories::project::ProjectRepository;
use crate::use_cases::extractors::ProjectContext;
use crate::AppState;

#[post("/projects")]
#[tracing::instrument(skip_all)]
pub async fn create_project(
    state: web::Data<AppState>,
    request: web::Json<NewProjectRequest>,
) -> Result<HttpResponse, AppError> {
    let created = state.project_handler.create_project(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

#[post("/projects/access")]
#[tracing::instrument(skip_all)]
pub async fn access_project(
    state: web::Data<AppState>,
    request: web::Json<AccessProjectRequest>,
) -> Result<HttpResponse, AppError> {
    let (project, auth) = state.project_handler.access_project(request.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ProjectCreatedResponse {
        project,
        access_token: auth.access_token,
        token_type: auth.token_type,
    }))
}

#[get("/projects/me")]
pub async fn get_current_project(
    state: web::Data<AppState>,
    context: ProjectContext,
) -> Result<HttpResponse, AppError> {
    let project = state.project_handler.get_project(&context.project_id).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[delete("/projects/me")]
#[tracing::instrument(skip_all)]
pub async fn delete_current_project(
    state: web::Data<AppState>,
    context: ProjectContext,
) -> Result<HttpResponse, AppError> {
    state.project_handler.delete_project(&context.project_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Read-only published view of a gazette: the project with every page and
/// its elements, in page order. No authentication.
#[get("/gazettes/{slug}")]
pub async fn get_gazette(
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let project = state
        .project_handler
        .project_repo
        .get_project_by_slug(&slug)
        .await?
        .ok_or(AppError::ProjectNotFound)?;

    let pages = state.page_handler.page_repo.list_pages(&project.id).await?;

    let mut assembled = Vec::with_capacity(pages.len());
    for page in pages {
        let rows = state.element_handler.element_repo.list_elements(&page.id).await?;
        let elements = rows
            .into_iter()
            .map(|row| Element::try_from(row).map(ElementResponse::from))
            .collect::<Result<Vec<_>, _>>()?;

        assembled.push(PageWithElements {
            page: PageResponse::from(page),
            elements,
        });
    }

    Ok(HttpResponse::Ok().json(GazetteResponse {
        project: project.into(),
        pages: assembled,
    }))
}
