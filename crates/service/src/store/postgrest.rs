//! PostgREST-backed implementation of [`ListingStore`] for a hosted
//! Supabase project. The service-role key goes out on every request as
//! both `apikey` and bearer token.

use async_trait::async_trait;
use models::listing::{Listing, ListingInsert, ListingPatch};
use reqwest::header::{self, HeaderMap};
use reqwest::{Client, RequestBuilder, StatusCode};
use uuid::Uuid;

use crate::errors::{upstream_error, ServiceError};
use crate::pagination::RowRange;
use crate::store::{AreaBounds, CountedPage, ListingStore, TextColumn};

/// PostgREST media type requesting exactly one row; zero rows make the
/// upstream answer 406, which maps to a not-found here.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

#[derive(Clone)]
pub struct PostgrestStore {
    http: Client,
    base: String,
    key: String,
}

impl PostgrestStore {
    pub fn new(base_url: &str, service_role_key: &str) -> Self {
        Self {
            http: Client::new(),
            base: base_url.trim_end_matches('/').to_string(),
            key: service_role_key.to_string(),
        }
    }

    fn listings_url(&self) -> String {
        format!("{}/rest/v1/listings", self.base)
    }

    fn authed(&self, rb: RequestBuilder) -> RequestBuilder {
        rb.header("apikey", &self.key).bearer_auth(&self.key)
    }

    /// Select one row window with `Prefer: count=exact`; the exact total
    /// comes back in `Content-Range`.
    async fn select_counted(
        &self,
        query: &[(String, String)],
        range: RowRange,
    ) -> Result<CountedPage, ServiceError> {
        let resp = self
            .authed(self.http.get(self.listings_url()))
            .query(query)
            .header("Range-Unit", "items")
            .header(header::RANGE, format!("{}-{}", range.from, range.to))
            .header("Prefer", "count=exact")
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(upstream_error(resp).await);
        }
        let count = exact_count(resp.headers());
        let rows = resp.json::<Vec<Listing>>().await?;
        Ok((rows, count))
    }
}

/// Total from a `Content-Range` header such as `0-9/57` or `*/57`.
fn exact_count(headers: &HeaderMap) -> u64 {
    headers
        .get(header::CONTENT_RANGE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.rsplit('/').next())
        .and_then(|total| total.parse().ok())
        .unwrap_or(0)
}

fn base_select() -> Vec<(String, String)> {
    vec![
        ("select".into(), "*".into()),
        ("order".into(), "created_at.desc".into()),
    ]
}

#[async_trait]
impl ListingStore for PostgrestStore {
    async fn select_by_area(
        &self,
        range: RowRange,
        bounds: AreaBounds,
    ) -> Result<CountedPage, ServiceError> {
        let mut query = base_select();
        if let Some(min) = bounds.min_py {
            query.push(("area_py".into(), format!("gte.{min}")));
        }
        if let Some(max) = bounds.max_py {
            query.push(("area_py".into(), format!("lte.{max}")));
        }
        self.select_counted(&query, range).await
    }

    async fn select_by_text(
        &self,
        column: TextColumn,
        term: &str,
        range: RowRange,
    ) -> Result<CountedPage, ServiceError> {
        let mut query = base_select();
        query.push((column.as_str().into(), format!("ilike.*{term}*")));
        self.select_counted(&query, range).await
    }

    async fn insert(&self, row: ListingInsert) -> Result<Listing, ServiceError> {
        let resp = self
            .authed(self.http.post(self.listings_url()))
            .header("Prefer", "return=representation")
            .header(header::ACCEPT, SINGLE_OBJECT)
            .json(&row)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(upstream_error(resp).await);
        }
        Ok(resp.json::<Listing>().await?)
    }

    async fn fetch(&self, id: Uuid) -> Result<Listing, ServiceError> {
        let id_eq = format!("eq.{id}");
        let resp = self
            .authed(self.http.get(self.listings_url()))
            .query(&[("select", "*"), ("id", id_eq.as_str())])
            .header(header::ACCEPT, SINGLE_OBJECT)
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_ACCEPTABLE {
            return Err(ServiceError::not_found("listing"));
        }
        if !resp.status().is_success() {
            return Err(upstream_error(resp).await);
        }
        Ok(resp.json::<Listing>().await?)
    }

    async fn update(&self, id: Uuid, patch: ListingPatch) -> Result<Listing, ServiceError> {
        let id_eq = format!("eq.{id}");
        let resp = self
            .authed(self.http.patch(self.listings_url()))
            .query(&[("id", id_eq.as_str())])
            .header("Prefer", "return=representation")
            .header(header::ACCEPT, SINGLE_OBJECT)
            .json(&patch)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(upstream_error(resp).await);
        }
        Ok(resp.json::<Listing>().await?)
    }

    async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let id_eq = format!("eq.{id}");
        let resp = self
            .authed(self.http.delete(self.listings_url()))
            .query(&[("id", id_eq.as_str())])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(upstream_error(resp).await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_parses_both_content_range_shapes() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_RANGE, "0-9/57".parse().unwrap());
        assert_eq!(exact_count(&headers), 57);

        headers.insert(header::CONTENT_RANGE, "*/12".parse().unwrap());
        assert_eq!(exact_count(&headers), 12);

        headers.insert(header::CONTENT_RANGE, "*/*".parse().unwrap());
        assert_eq!(exact_count(&headers), 0);

        assert_eq!(exact_count(&HeaderMap::new()), 0);
    }

    #[test]
    fn base_url_loses_trailing_slash() {
        let store = PostgrestStore::new("https://demo.supabase.co/", "key");
        assert_eq!(
            store.listings_url(),
            "https://demo.supabase.co/rest/v1/listings"
        );
    }
}
