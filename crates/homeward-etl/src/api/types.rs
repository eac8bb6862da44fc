//! Wire types for the animal API
//!
//! Matches the source API's pagination structure. Summaries are deserialized
//! leniently: a missing name becomes an empty string so the record reaches
//! the transformer (which rejects it with a per-record validation error)
//! instead of failing the whole page.

use serde::{Deserialize, Serialize};

/// One page of the animal listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimalPage {
    /// Page number (1-indexed)
    pub page: u32,

    /// Total pages the source reports
    pub total_pages: u32,

    /// Total record count, when the source reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_items: Option<u64>,

    /// Records on this page
    pub items: Vec<AnimalSummary>,
}

/// One animal as listed by the paginated endpoint
///
/// The listing omits the fields the transformer needs (`friends`,
/// `born_at`); those come from the detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimalSummary {
    pub id: u64,

    #[serde(default)]
    pub name: String,
}
