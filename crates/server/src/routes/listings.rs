use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use models::listing::{Listing, ListingPatch, NewListing};
use serde::{Deserialize, Serialize};
use service::listings::{ListingPage, SearchParams};
use service::pagination::{PageQuery, DEFAULT_PER_PAGE};
use service::store::AreaBounds;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::state::ServerState;

/// Raw query-string values. Numbers are parsed leniently afterwards so a
/// malformed filter acts as absent instead of failing the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    q: Option<String>,
    page: Option<String>,
    per_page: Option<String>,
    min_py: Option<String>,
    max_py: Option<String>,
}

impl ListQuery {
    fn into_params(self) -> SearchParams {
        SearchParams {
            term: self.q,
            bounds: AreaBounds {
                min_py: parse_filter(self.min_py),
                max_py: parse_filter(self.max_py),
            },
            page: PageQuery {
                page: parse_or(self.page, 1),
                per_page: parse_or(self.per_page, DEFAULT_PER_PAGE),
            },
        }
    }
}

fn parse_or(raw: Option<String>, default: u32) -> u32 {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

fn parse_filter(raw: Option<String>) -> Option<f64> {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Wire shape of a search response: `{data, count, page, perPage}`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPageBody {
    data: Vec<Listing>,
    count: u64,
    page: u32,
    per_page: u32,
}

impl From<ListingPage> for ListingPageBody {
    fn from(page: ListingPage) -> Self {
        Self {
            data: page.data,
            count: page.count,
            page: page.page,
            per_page: page.per_page,
        }
    }
}

#[derive(Serialize)]
pub struct DataBody<T> {
    data: T,
}

pub async fn search_listings(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListingPageBody>, ApiError> {
    let page = state.listings.search(query.into_params()).await?;
    Ok(Json(page.into()))
}

pub async fn create_listing(
    State(state): State<ServerState>,
    body: Option<Json<NewListing>>,
) -> Result<(StatusCode, Json<DataBody<Listing>>), ApiError> {
    let Some(Json(input)) = body else {
        return Err(ApiError::bad_request("Request body is required (JSON)"));
    };
    let created = state.listings.create(input).await?;
    Ok((StatusCode::CREATED, Json(DataBody { data: created })))
}

pub async fn get_listing(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DataBody<Listing>>, ApiError> {
    let listing = state.listings.get(id).await?;
    Ok(Json(DataBody { data: listing }))
}

pub async fn update_listing(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ListingPatch>,
) -> Result<Json<DataBody<Listing>>, ApiError> {
    let updated = state.listings.update(id, patch).await?;
    Ok(Json(DataBody { data: updated }))
}

pub async fn delete_listing(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.listings.delete(id).await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}
