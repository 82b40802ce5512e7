use serde::Serialize;

use crate::models::post::Post;

/// File part of the submission form, buffered in memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>, // client-supplied, only its suffix is used
    pub bytes: Vec<u8>,
}

/// Fields read from a `POST /` multipart body.
#[derive(Debug, Default)]
pub struct PostSubmission {
    pub body: Option<String>,
    pub image: Option<UploadedFile>,
}

// Shape handed to the board template
#[derive(Debug, Serialize)]
pub struct PostOut {
    pub id: i64,
    pub body: String,
    pub image_filename: Option<String>,
    pub created_at: String,
}

impl From<&Post> for PostOut {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            body: post.body.clone(),
            image_filename: post.image_filename.clone(),
            created_at: post.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}
