//! Image upload gateway: declared-type and size validation, key
//! generation, and hand-off to object storage.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::storage::ObjectStorage;

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// Public URL and storage key of a stored upload.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct StoredObject {
    pub url: String,
    pub path: String,
}

#[derive(Clone)]
pub struct UploadService {
    storage: Arc<dyn ObjectStorage>,
}

impl UploadService {
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self { storage }
    }

    /// Validate and store one image. The declared content type is trusted
    /// as-is; there is no content sniffing.
    pub async fn store_image(
        &self,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredObject, ServiceError> {
        if !ALLOWED_IMAGE_TYPES.contains(&content_type) {
            return Err(ServiceError::UnsupportedMedia(
                "Only JPG/PNG/WEBP allowed".into(),
            ));
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(ServiceError::PayloadTooLarge(
                "File too large (max 5MB)".into(),
            ));
        }

        let key = storage_key(content_type);
        self.storage.put(&key, content_type, bytes).await?;
        Ok(StoredObject {
            url: self.storage.public_url(&key),
            path: key,
        })
    }
}

/// `public/{unix-millis}_{random}.{ext}` with the extension taken from the
/// declared content type.
fn storage_key(content_type: &str) -> String {
    let ext = content_type
        .split('/')
        .nth(1)
        .filter(|s| !s.is_empty())
        .unwrap_or("jpg");
    format!(
        "public/{}_{}.{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple(),
        ext
    )
}
