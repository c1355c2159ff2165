use axum::extract::{Multipart, State};
use axum::Json;
use service::uploads::StoredObject;

use crate::errors::ApiError;
use crate::state::ServerState;

pub async fn probe() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true, "method": "GET /api/uploads" }))
}

/// Accept one multipart `file` field and hand it to the upload gateway.
pub async fn upload_image(
    State(state): State<ServerState>,
    mut form: Multipart,
) -> Result<Json<StoredObject>, ApiError> {
    while let Some(field) = form
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request("form-data required"))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|_| ApiError::bad_request("form-data required"))?
            .to_vec();
        let stored = state.uploads.store_image(&content_type, bytes).await?;
        return Ok(Json(stored));
    }
    Err(ApiError::bad_request("file field is required"))
}
