// src/repositories/post_repository.rs - kadai_post table access

use async_trait::async_trait;
use deadpool_postgres::Pool;
use thiserror::Error;
use tokio_postgres::Row;

use crate::models::post::{NewPost, Post};

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS kadai_post (
    id BIGSERIAL PRIMARY KEY,
    body TEXT NOT NULL,
    image_filename TEXT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT now()
)";

const INSERT_SQL: &str = "INSERT INTO kadai_post (body, image_filename) VALUES ($1, $2)";

const LIST_SQL: &str = "SELECT id, body, image_filename, created_at FROM kadai_post \
     ORDER BY created_at DESC, id DESC";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),
    #[error("database error: {0}")]
    Db(#[from] tokio_postgres::Error),
}

/// Storage seam for posts. Handlers only ever see `dyn PostStore`.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Writes one row. `body` is stored exactly as submitted.
    async fn insert(&self, post: NewPost) -> Result<(), StoreError>;

    /// Every post, newest first.
    async fn list_all(&self) -> Result<Vec<Post>, StoreError>;
}

pub struct PostRepository {
    pool: Pool,
}

impl PostRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let client = self.pool.get().await?;
        client.batch_execute(CREATE_TABLE_SQL).await?;
        Ok(())
    }
}

fn row_to_post(row: &Row) -> Result<Post, StoreError> {
    Ok(Post {
        id: row.try_get("id")?,
        body: row.try_get("body")?,
        image_filename: row.try_get("image_filename")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl PostStore for PostRepository {
    async fn insert(&self, post: NewPost) -> Result<(), StoreError> {
        let client = self.pool.get().await?;
        let stmt = client.prepare_cached(INSERT_SQL).await?;
        client
            .execute(&stmt, &[&post.body, &post.image_filename])
            .await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Post>, StoreError> {
        let client = self.pool.get().await?;
        let stmt = client.prepare_cached(LIST_SQL).await?;
        let rows = client.query(&stmt, &[]).await?;
        rows.iter().map(row_to_post).collect()
    }
}
