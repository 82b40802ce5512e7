// src/handlers/board_handlers.rs - GET / and POST /

use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::http::header;
use actix_web::{HttpResponse, get, post, web};
use futures::StreamExt;
use log::{info, warn};

use crate::AppState;
use crate::dtos::post_dtos::{PostSubmission, UploadedFile};
use crate::error::BoardError;
use crate::models::post::NewPost;
use crate::services::upload_service::UploadError;

fn redirect_to_board() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

async fn render_board(state: &AppState) -> Result<HttpResponse, BoardError> {
    let posts = state.posts.list_all().await?;
    let html = state.view.render(&posts)?;
    Ok(HttpResponse::Ok()
        .content_type(mime::TEXT_HTML_UTF_8)
        .body(html))
}

async fn drain(field: &mut Field) -> Result<(), MultipartError> {
    while let Some(chunk) = field.next().await {
        chunk?;
    }
    Ok(())
}

/// Reads the whole form. File bytes are kept up to `max_file_bytes + 1`,
/// enough for the upload service to see the attachment is too large.
async fn read_submission(
    payload: &mut Multipart,
    max_file_bytes: usize,
) -> Result<PostSubmission, BoardError> {
    let mut submission = PostSubmission::default();

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "body" => {
                let mut buf = Vec::new();
                while let Some(chunk) = field.next().await {
                    buf.extend_from_slice(&chunk?);
                }
                // stored verbatim, so undecodable text is refused rather than repaired
                let body = String::from_utf8(buf)
                    .map_err(|_| BoardError::InvalidText("body".to_string()))?;
                submission.body = Some(body);
            }
            "image" => {
                let file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .map(str::to_string);
                let mut bytes = Vec::new();
                while let Some(chunk) = field.next().await {
                    let chunk = chunk?;
                    let room = (max_file_bytes + 1).saturating_sub(bytes.len());
                    bytes.extend_from_slice(&chunk[..chunk.len().min(room)]);
                }
                submission.image = Some(UploadedFile { file_name, bytes });
            }
            _ => drain(&mut field).await?,
        }
    }

    Ok(submission)
}

#[get("/")]
pub async fn show_board(state: web::Data<AppState>) -> Result<HttpResponse, BoardError> {
    render_board(&state).await
}

#[post("/")]
pub async fn submit_post(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, BoardError> {
    let submission = read_submission(&mut payload, state.uploads.max_bytes()).await?;

    // Without a body field the request is just a page view.
    let Some(body) = submission.body else {
        return render_board(&state).await;
    };

    if body.trim().is_empty() {
        warn!("rejected submission with blank body");
        return Ok(redirect_to_board());
    }

    let image_filename = match state.uploads.store(submission.image).await {
        Ok(name) => name,
        Err(e @ (UploadError::NotAnImage(_) | UploadError::TooLarge { .. })) => {
            warn!("rejected submission: {}", e);
            return Ok(redirect_to_board());
        }
        Err(e) => return Err(e.into()),
    };

    let new_post = NewPost {
        body,
        image_filename: image_filename.clone(),
    };
    if let Err(e) = state.posts.insert(new_post).await {
        if let Some(name) = &image_filename {
            state.uploads.discard(name).await;
        }
        return Err(e.into());
    }

    info!("post created (image: {:?})", image_filename);
    Ok(redirect_to_board())
}
