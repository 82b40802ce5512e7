// In-process PostStore for handler tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, Utc};

use crate::models::post::{NewPost, Post};
use crate::repositories::post_repository::{PostStore, StoreError};

#[derive(Default)]
pub struct MemoryPostRepository {
    rows: Mutex<Vec<Post>>,
    fail_inserts: bool,
}

impl MemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every insert fails, as if the database went away after the upload.
    pub fn failing() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            fail_inserts: true,
        }
    }

    /// Seeds a row with an explicit timestamp.
    pub fn push_at(&self, body: &str, created_at: NaiveDateTime) {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.len() as i64 + 1;
        rows.push(Post {
            id,
            body: body.to_string(),
            image_filename: None,
            created_at,
        });
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl PostStore for MemoryPostRepository {
    async fn insert(&self, post: NewPost) -> Result<(), StoreError> {
        if self.fail_inserts {
            // tokio_postgres::Error has no public constructor
            // a closed pool is the nearest stand-in
            return Err(StoreError::Pool(deadpool_postgres::PoolError::Closed));
        }
        let mut rows = self.rows.lock().unwrap();
        let id = rows.len() as i64 + 1;
        // strictly increasing, like consecutive inserts against now()
        let created_at = Utc::now().naive_utc() + Duration::microseconds(id);
        rows.push(Post {
            id,
            body: post.body,
            image_filename: post.image_filename,
            created_at,
        });
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Post>, StoreError> {
        let mut posts = self.rows.lock().unwrap().clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[actix_web::test]
    async fn lists_newest_first() {
        let repo = MemoryPostRepository::new();
        repo.push_at("t1", at(1));
        repo.push_at("t3", at(3));
        repo.push_at("t2", at(2));

        let bodies: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.body)
            .collect();
        assert_eq!(bodies, vec!["t3", "t2", "t1"]);
    }

    #[actix_web::test]
    async fn insert_assigns_id_and_keeps_body_verbatim() {
        let repo = MemoryPostRepository::new();
        repo.insert(NewPost {
            body: "<b>raw</b>\n".to_string(),
            image_filename: None,
        })
        .await
        .unwrap();

        let posts = repo.list_all().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, 1);
        assert_eq!(posts[0].body, "<b>raw</b>\n");
        assert!(posts[0].image_filename.is_none());
    }
}
