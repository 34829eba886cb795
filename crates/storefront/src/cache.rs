//! Cache types for taxonomy endpoint responses.
//!
//! Taxonomy data is rarely-mutated reference data, so responses are cached.
//! The cache is explicitly emptied when a sync run completes (the one event
//! that implies the taxonomy may have changed); the TTL on the cache itself
//! is only a backstop.

use std::sync::Arc;

use axleworks_core::{MakeId, ModelId};

use crate::db::vehicles::{Make, VehicleModel};

/// Cache key for taxonomy responses.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Makes,
    Models(MakeId),
    Years(ModelId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Makes(Arc<Vec<Make>>),
    Models(Arc<Vec<VehicleModel>>),
    Years(Arc<Vec<i32>>),
}
