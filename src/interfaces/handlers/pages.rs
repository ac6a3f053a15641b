use actix_web::{delete, get, post, put, web, HttpResponse};
use uuid::Uuid;

use crate::entities::page::{NewPageRequest, ReorderPagesRequest, UpdatePageRequest};
use crate::errors::AppError;
use crate::use_cases::extractors::ProjectContext;
use crate::AppState;

#[get("/projects/me/pages")]
pub async fn list_pages(
    state: web::Data<AppState>,
    context: ProjectContext,
) -> Result<HttpResponse, AppError> {
    let pages = state.page_handler.list_pages(&context.project_id).await?;
    Ok(HttpResponse::Ok().json(pages))
}

#[post("/projects/me/pages")]
pub async fn create_page(
    state: web::Data<AppState>,
    context: ProjectContext,
    request: web::Json<NewPageRequest>,
) -> Result<HttpResponse, AppError> {
    let page = state
        .page_handler
        .create_page(&context.project_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(page))
}

#[put("/pages/{page_id}")]
pub async fn update_page(
    state: web::Data<AppState>,
    context: ProjectContext,
    page_id: web::Path<Uuid>,
    request: web::Json<UpdatePageRequest>,
) -> Result<HttpResponse, AppError> {
    let page = state
        .page_handler
        .update_page(&context.project_id, &page_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

#[delete("/pages/{page_id}")]
pub async fn delete_page(
    state: web::Data<AppState>,
    context: ProjectContext,
    page_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    state.page_handler.delete_page(&context.project_id, &page_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/pages/reorder")]
pub async fn reorder_pages(
    state: web::Data<AppState>,
    context: ProjectContext,
    request: web::Json<ReorderPagesRequest>,
) -> Result<HttpResponse, AppError> {
    let pages = state
        .page_handler
        .reorder_pages(&context.project_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(pages))
}
