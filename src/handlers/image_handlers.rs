// src/handlers/image_handlers.rs
use std::io::ErrorKind;
use std::path::Path;

use actix_web::http::header;
use actix_web::{HttpResponse, get, web};

use crate::AppState;
use crate::error::BoardError;
use crate::services::upload_service::sniff_mime;

/// GET /image/{filename}
/// Serves stored attachments for deployments without a separate static server.
#[get("/image/{filename}")]
pub async fn serve_image(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, BoardError> {
    let filename = path.into_inner();

    // Sanitize filename to prevent directory traversal
    let Some(safe_filename) = Path::new(&filename)
        .file_name()
        .and_then(|name| name.to_str())
    else {
        return Ok(HttpResponse::NotFound().finish());
    };

    let file_path = state.uploads.image_dir().join(safe_filename);
    let data = match tokio::fs::read(&file_path).await {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Ok(HttpResponse::NotFound().finish());
        }
        Err(e) => return Err(e.into()),
    };

    // The stored extension is the client's; trust the bytes instead.
    let content_type = sniff_mime(&data).unwrap_or(mime::APPLICATION_OCTET_STREAM);

    Ok(HttpResponse::Ok()
        .content_type(content_type)
        .insert_header((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .body(data))
}
