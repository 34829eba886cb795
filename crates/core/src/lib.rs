//! Axleworks Core - Shared types library.
//!
//! This crate provides common types used across all Axleworks components:
//! - `storefront` - Public catalog/search API
//! - `cli` - Command-line tools for migrations, seeding, and index sync
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, model-year ranges, and the search
//!   document contract shared by the sync job and the query path

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
