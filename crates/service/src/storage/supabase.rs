use async_trait::async_trait;
use reqwest::{header, Client};

use crate::errors::{upstream_error, ServiceError};
use crate::storage::ObjectStorage;

/// Fixed public bucket holding listing images.
pub const LISTINGS_BUCKET: &str = "listings";

#[derive(Clone)]
pub struct SupabaseStorage {
    http: Client,
    base: String,
    key: String,
    bucket: String,
}

impl SupabaseStorage {
    pub fn new(base_url: &str, service_role_key: &str) -> Self {
        Self {
            http: Client::new(),
            base: base_url.trim_end_matches('/').to_string(),
            key: service_role_key.to_string(),
            bucket: LISTINGS_BUCKET.to_string(),
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base, self.bucket, key)
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), ServiceError> {
        let resp = self
            .http
            .post(self.object_url(key))
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header(header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(upstream_error(resp).await);
        }
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base, self.bucket, key
        )
    }
}
