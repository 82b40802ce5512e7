pub mod board_handlers;
pub mod image_handlers;

use actix_web::web;

use crate::handlers::board_handlers::{show_board, submit_post};
use crate::handlers::image_handlers::serve_image;

/// Registers every route; `/image/{filename}` only when `serve_images` is set.
pub fn configure(cfg: &mut web::ServiceConfig, serve_images: bool) {
    cfg.service(show_board) // GET /
        .service(submit_post); // POST /
    if serve_images {
        cfg.service(serve_image); // GET /image/{filename}
    }
}
