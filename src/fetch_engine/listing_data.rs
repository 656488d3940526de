//! Wire shape of one listing page
//!
//! Only the fields the filter needs are modelled. Every field defaults, and
//! unknown fields are ignored, so schema drift on the server side never turns
//! into a decode failure.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListingPage {
    pub meta: ListingMeta,
    pub data: ListingBody,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListingMeta {
    pub status: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListingBody {
    pub total_count: i64,
    pub items: Vec<ListingItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListingItem {
    pub essential: Essential,
}

/// The per-video record inside a listing entry
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Essential {
    pub id: String,
    pub registered_at: Option<DateTime<FixedOffset>>,
    pub count: Counts,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Counts {
    pub comment: i64,
}

impl ListingPage {
    /// Decode a page body.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for bodies that are not a JSON object of
    /// the expected shape.
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }
}
