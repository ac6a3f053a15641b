use actix_web::{get, HttpResponse, Responder};

use crate::entities::template::TEMPLATES;

#[get("/templates")]
pub async fn list_templates() -> impl Responder {
    HttpResponse::Ok().json(&*TEMPLATES)
}
