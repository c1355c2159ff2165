use models::errors::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    UnsupportedMedia(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    /// A store or storage call failed; `message` is the upstream body's
    /// message, surfaced verbatim to the caller.
    #[error("{message}")]
    Upstream { status: u16, message: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(format!("{} not found", entity))
    }
}

impl From<ModelError> for ServiceError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Validation(msg) => Self::Validation(msg),
        }
    }
}

/// Turn a non-success upstream response into `ServiceError::Upstream`,
/// preferring the `message` field of a PostgREST-style error body.
pub(crate) async fn upstream_error(resp: reqwest::Response) -> ServiceError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or(body);
    tracing::warn!(status, %message, "upstream request failed");
    ServiceError::Upstream { status, message }
}
