use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

/// A rentable property record as stored in the `listings` table.
///
/// `area_m2`/`area_py` are a redundant pair kept consistent by the editing
/// UI only; the store enforces nothing about them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub id: Uuid,
    pub title: String,
    pub address: Option<String>,
    pub area_m2: Option<f64>,
    pub area_py: Option<f64>,
    pub deposit: Option<i64>,
    pub rent: Option<i64>,
    pub contact_phone: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create payload as received from the client. `id`/`created_at` are
/// store-assigned and never accepted here.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewListing {
    pub title: Option<String>,
    pub address: Option<String>,
    pub area_m2: Option<f64>,
    pub area_py: Option<f64>,
    pub deposit: Option<i64>,
    pub rent: Option<i64>,
    pub contact_phone: Option<String>,
    pub image_url: Option<String>,
}

/// The exact row shape sent to the store on insert.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ListingInsert {
    pub title: String,
    pub address: Option<String>,
    pub area_m2: Option<f64>,
    pub area_py: Option<f64>,
    pub deposit: Option<i64>,
    pub rent: Option<i64>,
    pub contact_phone: Option<String>,
    pub image_url: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl NewListing {
    /// Validate and normalize into an insertable row. The title must be
    /// non-empty after trimming; optional text fields collapse to NULL
    /// when absent or blank.
    pub fn into_insert(self) -> Result<ListingInsert, ModelError> {
        let title = self.title.as_deref().unwrap_or("").trim().to_string();
        if title.is_empty() {
            return Err(ModelError::Validation("title is required".into()));
        }
        Ok(ListingInsert {
            title,
            address: non_blank(self.address),
            area_m2: self.area_m2,
            area_py: self.area_py,
            deposit: self.deposit,
            rent: self.rent,
            contact_phone: non_blank(self.contact_phone),
            image_url: non_blank(self.image_url),
        })
    }
}

/// Partial update; only fields present in the request body are serialized
/// and therefore touched by the store.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ListingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_m2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_py: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_requires_title() {
        let err = NewListing::default().into_insert().unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));

        let err = NewListing {
            title: Some("   ".into()),
            ..Default::default()
        }
        .into_insert()
        .unwrap_err();
        assert_eq!(err.to_string(), "title is required");
    }

    #[test]
    fn insert_trims_title_and_drops_blank_optionals() {
        let row = NewListing {
            title: Some("  역세권 오피스텔  ".into()),
            address: Some("".into()),
            contact_phone: Some("01012345678".into()),
            ..Default::default()
        }
        .into_insert()
        .unwrap();
        assert_eq!(row.title, "역세권 오피스텔");
        assert_eq!(row.address, None);
        assert_eq!(row.contact_phone.as_deref(), Some("01012345678"));
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = ListingPatch {
            rent: Some(65),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "rent": 65 }));
    }
}
