pub mod postgrest;

use async_trait::async_trait;
use models::listing::{Listing, ListingInsert, ListingPatch};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::pagination::RowRange;

/// Text columns the free-text search matches against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextColumn {
    Title,
    Address,
}

impl TextColumn {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Address => "address",
        }
    }
}

/// Inclusive pyeong bounds; either side may be open.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AreaBounds {
    pub min_py: Option<f64>,
    pub max_py: Option<f64>,
}

impl AreaBounds {
    pub fn is_open(&self) -> bool {
        self.min_py.is_none() && self.max_py.is_none()
    }

    /// Whether a row passes the bounds. Rows without a recorded area pass.
    pub fn admits(&self, area_py: Option<f64>) -> bool {
        match area_py {
            None => true,
            Some(v) => {
                self.min_py.map_or(true, |min| v >= min) && self.max_py.map_or(true, |max| v <= max)
            }
        }
    }
}

/// One page of rows plus the store's exact total for the filter.
pub type CountedPage = (Vec<Listing>, u64);

/// Listing persistence as the hosted store exposes it. Every call is one
/// request/response round trip; failures surface directly.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Rows within `bounds` (each side applied only when present), newest
    /// first, with an exact total count.
    async fn select_by_area(
        &self,
        range: RowRange,
        bounds: AreaBounds,
    ) -> Result<CountedPage, ServiceError>;

    /// Case-insensitive substring match on one text column, newest first,
    /// with an exact total count.
    async fn select_by_text(
        &self,
        column: TextColumn,
        term: &str,
        range: RowRange,
    ) -> Result<CountedPage, ServiceError>;

    async fn insert(&self, row: ListingInsert) -> Result<Listing, ServiceError>;

    async fn fetch(&self, id: Uuid) -> Result<Listing, ServiceError>;

    async fn update(&self, id: Uuid, patch: ListingPatch) -> Result<Listing, ServiceError>;

    async fn delete(&self, id: Uuid) -> Result<(), ServiceError>;
}
