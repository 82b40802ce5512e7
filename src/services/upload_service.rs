// src/services/upload_service.rs - image attachment validation and storage

use std::path::{Path, PathBuf};

use rand::RngCore;
use rand::rngs::OsRng;
use thiserror::Error;

use crate::dtos::post_dtos::UploadedFile;

/// Random part of a stored name: 25 bytes, 50 hex characters.
pub const RANDOM_NAME_BYTES: usize = 25;

pub const IMAGE_DIR: &str = "image";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("attachment is not an image (detected {0})")]
    NotAnImage(String),
    #[error("attachment exceeds {limit} bytes")]
    TooLarge { limit: usize },
    #[error("failed to write attachment: {0}")]
    Io(#[from] std::io::Error),
}

/// Sniffs the MIME type from magic bytes only. `None` when nothing matches.
/// SVG is text, carries no magic number and is never reported as an image.
pub fn sniff_mime(bytes: &[u8]) -> Option<mime::Mime> {
    let kind = infer::get(bytes)?;
    kind.mime_type().parse().ok()
}

/// Text after the last dot of the base name, `png` for both `a.png` and `.png`.
fn client_extension(original_name: &str) -> Option<&str> {
    let base = Path::new(original_name).file_name()?.to_str()?;
    let (_, ext) = base.rsplit_once('.')?;
    Some(ext).filter(|ext| !ext.is_empty())
}

/// `<unix-timestamp><50 hex chars>[.<ext>]`, extension copied from the client name.
pub fn generate_filename(original_name: Option<&str>) -> String {
    let mut random = [0u8; RANDOM_NAME_BYTES];
    OsRng.fill_bytes(&mut random);

    let mut name = format!("{}{}", chrono::Utc::now().timestamp(), hex::encode(random));

    // The suffix is not checked against the sniffed type.
    if let Some(ext) = original_name.and_then(client_extension) {
        name.push('.');
        name.push_str(ext);
    }
    name
}

#[derive(Clone)]
pub struct UploadService {
    image_dir: PathBuf,
    max_bytes: usize,
}

impl UploadService {
    pub fn new(upload_root: impl AsRef<Path>, max_bytes: usize) -> Self {
        Self {
            image_dir: upload_root.as_ref().join(IMAGE_DIR),
            max_bytes,
        }
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Validates and writes an attachment. `Ok(None)` when nothing was attached.
    pub async fn store(&self, upload: Option<UploadedFile>) -> Result<Option<String>, UploadError> {
        let upload = match upload {
            Some(u) if !u.bytes.is_empty() => u,
            _ => return Ok(None),
        };

        if upload.bytes.len() > self.max_bytes {
            return Err(UploadError::TooLarge { limit: self.max_bytes });
        }

        match sniff_mime(&upload.bytes) {
            Some(m) if m.type_() == mime::IMAGE => {
                log::debug!("sniffed attachment type {}", m);
            }
            Some(m) => return Err(UploadError::NotAnImage(m.to_string())),
            None => return Err(UploadError::NotAnImage("unknown".to_string())),
        }

        let filename = generate_filename(upload.file_name.as_deref());

        tokio::fs::create_dir_all(&self.image_dir).await?;
        let path = self.image_dir.join(&filename);
        tokio::fs::write(&path, &upload.bytes).await?;

        log::info!("stored attachment {} ({} bytes)", filename, upload.bytes.len());
        Ok(Some(filename))
    }

    /// Removes a stored attachment whose post never made it into the database.
    pub async fn discard(&self, filename: &str) {
        let path = self.image_dir.join(filename);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            log::error!("failed to remove orphaned attachment {}: {}", path.display(), e);
        }
    }
}
