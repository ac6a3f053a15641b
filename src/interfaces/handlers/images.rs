use actix_multipart::Multipart;
use actix_web::{get, http::header, post, web, HttpResponse};
use futures_util::TryStreamExt;
use uuid::Uuid;

use crate::constants::MAX_UPLOAD_BYTES;
use crate::errors::AppError;
use crate::use_cases::extractors::ProjectContext;
use crate::AppState;

#[post("/images")]
#[tracing::instrument(skip_all)]
pub async fn upload_image(
    state: web::Data<AppState>,
    context: ProjectContext,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let data = read_file_field(payload).await?;
    let image = state.image_handler.upload(&context.project_id, &data).await?;
    Ok(HttpResponse::Created().json(image))
}

/// Serves the raw bytes. Public, since the read-only viewer needs the
/// images without a token; image ids are unguessable.
#[get("/images/{image_id}/file")]
pub async fn serve_image(
    state: web::Data<AppState>,
    image_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let (image, bytes) = state.image_handler.serve(&image_id).await?;

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, image.mime_type))
        .insert_header((header::CACHE_CONTROL, "public, max-age=31536000, immutable"))
        .body(bytes))
}

/// Pulls the bytes of the `file` part out of the multipart body, bounding
/// the read so an oversized upload is cut off mid-stream.
async fn read_file_field(mut payload: Multipart) -> Result<Vec<u8>, AppError> {
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| AppError::field("file", &e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let mut data = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| AppError::field("file", &e.to_string()))?
        {
            if data.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(AppError::field(
                    "file",
                    &format!("uploaded file exceeds the {} byte limit", MAX_UPLOAD_BYTES),
                ));
            }
            data.extend_from_slice(&chunk);
        }
        return Ok(data);
    }

    Err(AppError::field("file", "multipart field \"file\" is required"))
}
