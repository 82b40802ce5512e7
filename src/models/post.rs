use chrono::NaiveDateTime;
use serde::Serialize;

/// Row of `kadai_post`.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: i64,
    pub body: String,
    pub image_filename: Option<String>, // generated by UploadService, never the client's name
    pub created_at: NaiveDateTime,
}

/// Insert payload; `id` and `created_at` are assigned by the database.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub body: String,
    pub image_filename: Option<String>,
}
