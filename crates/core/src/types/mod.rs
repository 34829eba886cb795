//! Core types for Axleworks.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod search_document;
pub mod year_range;

pub use id::*;
pub use price::Price;
pub use search_document::SearchDocument;
pub use year_range::{YearRange, YearRangeError, expand_years};
