//! The denormalized search document contract.
//!
//! One document per product, built by the catalog sync job and read back by
//! the query path. Both sides compile against this definition so the index
//! shape can never drift between writer and reader. The document is a
//! disposable projection: it is rebuilt wholesale from the relational
//! catalog and must never be treated as a source of truth for price or
//! stock.

use serde::{Deserialize, Serialize};

use crate::types::id::{CategoryId, ProductId};
use crate::types::price::Price;

/// Version of the document shape below. Bump on any field change so a
/// running sync job and query path can detect a mismatch during deploys.
pub const SCHEMA_VERSION: u32 = 1;

/// The attribute the index identifies documents by.
pub const PRIMARY_KEY: &str = "id";

/// Attributes the index matches free text against, in ranking order.
pub const SEARCHABLE_ATTRIBUTES: &[&str] =
    &["title", "part_number", "fits_makes", "fits_models", "category_slug"];

/// Attributes the index accepts in filter expressions.
pub const FILTERABLE_ATTRIBUTES: &[&str] = &[
    "fits_makes",
    "fits_models",
    "year_start",
    "year_end",
    "category_slug",
];

/// Attributes the index may sort by.
pub const SORTABLE_ATTRIBUTES: &[&str] = &["price"];

/// A product flattened with its aggregated fitment metadata.
///
/// `year_start`/`year_end` are the min/max model years across every variant
/// the product fits; `fits_makes`/`fits_models` are the deduplicated names
/// reached by walking fitment -> variant -> model -> make. A product with no
/// fitment rows (a "universal" part) carries null years and empty name
/// lists but is still present in the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDocument {
    pub id: ProductId,
    pub title: String,
    pub slug: String,
    /// Price in minor currency units.
    pub price: Price,
    pub stock_count: i32,
    pub category_id: Option<CategoryId>,
    pub category_slug: Option<String>,
    pub part_number: String,
    #[serde(default)]
    pub attributes: serde_json::Value,
    pub year_start: Option<i32>,
    pub year_end: Option<i32>,
    #[serde(default)]
    pub fits_makes: Vec<String>,
    #[serde(default)]
    pub fits_models: Vec<String>,
}

impl SearchDocument {
    /// Whether the document's fitment span covers `year`.
    ///
    /// Universal products (no fitment rows) match no specific year.
    #[must_use]
    pub fn fits_year(&self, year: i32) -> bool {
        match (self.year_start, self.year_end) {
            (Some(start), Some(end)) => start <= year && year <= end,
            _ => false,
        }
    }
}
