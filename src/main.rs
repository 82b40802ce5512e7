// src/main.rs
mod config;
mod dtos;
mod error;
mod handlers;
mod models;
mod repositories;
mod services;
mod views;

use std::sync::Arc;

use actix_web::{App, HttpServer, middleware::Logger, web};
use log::{error, info};

use crate::config::AppConfig;
use crate::repositories::post_repository::{PostRepository, PostStore};
use crate::services::upload_service::UploadService;
use crate::views::board_view::BoardView;

#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostStore>,
    pub uploads: UploadService,
    pub view: Arc<BoardView>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let app_config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    info!("Postgres: {}@{}/{}", app_config.pg_user, app_config.pg_host, app_config.pg_db);
    info!("Upload root: {}", app_config.upload_root.display());

    let pg_pool = match config::get_pg_pool(&app_config) {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to create PG pool: {:#}", e);
            std::process::exit(1);
        }
    };

    let repository = PostRepository::new(pg_pool);
    if let Err(e) = repository.ensure_schema().await {
        error!("Failed to prepare kadai_post table: {}", e);
        std::process::exit(1);
    }

    let view = match BoardView::new(app_config.max_image_bytes) {
        Ok(v) => v,
        Err(e) => {
            error!("Failed to load board template: {}", e);
            std::process::exit(1);
        }
    };

    let uploads = UploadService::new(&app_config.upload_root, app_config.max_image_bytes);
    tokio::fs::create_dir_all(uploads.image_dir()).await?;

    let state = web::Data::new(AppState {
        posts: Arc::new(repository),
        uploads,
        view: Arc::new(view),
    });

    let serve_images = app_config.serve_images;
    let bind_address = format!("0.0.0.0:{}", app_config.port);
    info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(|cfg| handlers::configure(cfg, serve_images))
    })
    .bind(&bind_address)?
    .run()
    .await
}
