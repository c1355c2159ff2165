pub mod supabase;

use async_trait::async_trait;

use crate::errors::ServiceError;

/// Object storage behind the image upload gateway.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` under `key`. Existing keys are never overwritten.
    async fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>)
        -> Result<(), ServiceError>;

    /// Public URL serving the object at `key`.
    fn public_url(&self, key: &str) -> String;
}
