//! Listing search composition and CRUD pass-through.

use std::collections::HashSet;
use std::sync::Arc;

use models::listing::{Listing, ListingPatch, NewListing};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::pagination::PageQuery;
use crate::store::{AreaBounds, ListingStore, TextColumn};

/// Search inputs after lenient parsing at the edge. An absent or blank
/// term selects the pure range-filter branch.
#[derive(Clone, Debug, Default)]
pub struct SearchParams {
    pub term: Option<String>,
    pub bounds: AreaBounds,
    pub page: PageQuery,
}

/// One page of search results with the echoed, normalized pagination.
#[derive(Clone, Debug, Serialize)]
pub struct ListingPage {
    pub data: Vec<Listing>,
    pub count: u64,
    pub page: u32,
    pub per_page: u32,
}

#[derive(Clone)]
pub struct ListingService {
    store: Arc<dyn ListingStore>,
}

impl ListingService {
    pub fn new(store: Arc<dyn ListingStore>) -> Self {
        Self { store }
    }

    /// Compose the filtered, paginated listing query.
    ///
    /// Without a term this is a single range-filtered select and `count`
    /// is exact. With a term, title and address are searched as two
    /// concurrent branches over the same row window; the pages are merged
    /// by id (first occurrence wins, title branch first) and the area
    /// bounds are applied to the merged rows, with area-less rows passing.
    /// `count` is then the larger branch count, an approximation of the
    /// union size.
    pub async fn search(&self, params: SearchParams) -> Result<ListingPage, ServiceError> {
        let page = params.page.normalize();
        let range = page.row_range();
        let term = params
            .term
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let (data, count) = match term {
            None => self.store.select_by_area(range, params.bounds).await?,
            Some(term) => {
                let (by_title, by_addr) = tokio::join!(
                    self.store.select_by_text(TextColumn::Title, term, range),
                    self.store.select_by_text(TextColumn::Address, term, range),
                );
                let (title_rows, title_count) = by_title?;
                let (addr_rows, addr_count) = by_addr?;
                tracing::debug!(term, title_count, addr_count, "text search branches");

                let rows = merge_by_id(title_rows, addr_rows)
                    .into_iter()
                    .filter(|row| params.bounds.admits(row.area_py))
                    .collect();
                (rows, title_count.max(addr_count))
            }
        };

        Ok(ListingPage {
            data,
            count,
            page: page.page,
            per_page: page.per_page,
        })
    }

    pub async fn create(&self, input: NewListing) -> Result<Listing, ServiceError> {
        let row = input.into_insert()?;
        self.store.insert(row).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Listing, ServiceError> {
        self.store.fetch(id).await
    }

    pub async fn update(&self, id: Uuid, patch: ListingPatch) -> Result<Listing, ServiceError> {
        self.store.update(id, patch).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.store.delete(id).await
    }
}

/// Concatenate two branch pages, keeping the first occurrence of each id.
fn merge_by_id(first: Vec<Listing>, second: Vec<Listing>) -> Vec<Listing> {
    let mut seen = HashSet::new();
    first
        .into_iter()
        .chain(second)
        .filter(|row| seen.insert(row.id))
        .collect()
}
