use actix_web::{get, HttpResponse, Responder};

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "name": "La Gazette de la Vie API",
        "docs": "/api/health"
    }))
}
