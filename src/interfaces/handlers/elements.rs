use actix_web::{delete, get, post, put, web, HttpResponse};
use uuid::Uuid;

use crate::entities::element::{NewElementRequest, UpdateElementRequest};
use crate::errors::AppError;
use crate::use_cases::extractors::ProjectContext;
use crate::AppState;

#[get("/pages/{page_id}/elements")]
pub async fn list_elements(
    state: web::Data<AppState>,
    context: ProjectContext,
    page_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let elements = state
        .element_handler
        .list_elements(&context.project_id, &page_id)
        .await?;
    Ok(HttpResponse::Ok().json(elements))
}

#[post("/pages/{page_id}/elements")]
pub async fn create_element(
    state: web::Data<AppState>,
    context: ProjectContext,
    page_id: web::Path<Uuid>,
    request: web::Json<NewElementRequest>,
) -> Result<HttpResponse, AppError> {
    let element = state
        .element_handler
        .create_element(&context.project_id, &page_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(element))
}

#[put("/elements/{element_id}")]
pub async fn update_element(
    state: web::Data<AppState>,
    context: ProjectContext,
    element_id: web::Path<Uuid>,
    request: web::Json<UpdateElementRequest>,
) -> Result<HttpResponse, AppError> {
    let element = state
        .element_handler
        .update_element(&context.project_id, &element_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(element))
}

#[delete("/elements/{element_id}")]
pub async fn delete_element(
    state: web::Data<AppState>,
    context: ProjectContext,
    element_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    state
        .element_handler
        .delete_element(&context.project_id, &element_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
