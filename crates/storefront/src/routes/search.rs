//! Search route handlers - the query orchestration path.
//!
//! Request flow: raw query parameters are parsed into a typed
//! [`SearchParams`] (all range checks happen here, before any database or
//! index access), the filter resolver turns taxonomy ids into the names the
//! index filters on (unknown ids fail fast), and one index request is
//! issued. The response echoes the raw filter inputs so the caller can
//! re-render its filter UI without a round trip.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use axleworks_core::{MakeId, ModelId, SearchDocument};

use crate::db::VehicleRepository;
use crate::error::AppError;
use crate::search::SearchQuery;
use crate::state::AppState;

const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 100;

/// Raw search query parameters, exactly as supplied by the caller.
///
/// Everything arrives as an optional string so that numeric coercion is an
/// explicit, testable step producing `AppError::Validation` rather than a
/// framework rejection.
#[derive(Debug, Default, Deserialize)]
pub struct RawSearchParams {
    #[serde(default)]
    pub q: String,
    pub make_id: Option<String>,
    pub model_id: Option<String>,
    pub year: Option<String>,
    pub category_slug: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Validated search parameters.
#[derive(Debug, PartialEq, Eq)]
pub struct SearchParams {
    pub q: String,
    pub make_id: Option<MakeId>,
    pub model_id: Option<ModelId>,
    pub year: Option<i32>,
    pub category_slug: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

impl SearchParams {
    /// Coerce and range-check the raw parameters.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for non-numeric ids/year/limit/offset,
    /// `limit` outside `[1, 100]`, or negative `offset`. No I/O happens
    /// before this returns.
    pub fn parse(raw: &RawSearchParams) -> Result<Self, AppError> {
        let limit = match present(raw.limit.as_deref()) {
            None => DEFAULT_LIMIT,
            Some(value) => value
                .parse::<u32>()
                .ok()
                .filter(|n| (1..=MAX_LIMIT).contains(n))
                .ok_or_else(|| AppError::Validation("invalid limit (1-100)".to_owned()))?,
        };

        let offset = match present(raw.offset.as_deref()) {
            None => 0,
            Some(value) => value
                .parse::<u32>()
                .map_err(|_| AppError::Validation("invalid offset".to_owned()))?,
        };

        let year = present(raw.year.as_deref())
            .map(|value| {
                value
                    .parse::<i32>()
                    .map_err(|_| AppError::Validation("invalid year".to_owned()))
            })
            .transpose()?;

        let make_id = present(raw.make_id.as_deref())
            .map(|value| {
                value
                    .parse::<i32>()
                    .map(MakeId::new)
                    .map_err(|_| AppError::Validation("invalid make_id".to_owned()))
            })
            .transpose()?;

        let model_id = present(raw.model_id.as_deref())
            .map(|value| {
                value
                    .parse::<i32>()
                    .map(ModelId::new)
                    .map_err(|_| AppError::Validation("invalid model_id".to_owned()))
            })
            .transpose()?;

        Ok(Self {
            q: raw.q.trim().to_owned(),
            make_id,
            model_id,
            year,
            category_slug: present(raw.category_slug.as_deref()).map(str::to_owned),
            limit,
            offset,
        })
    }
}

/// Treat empty strings as absent; filter UIs submit every field.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Taxonomy ids resolved to the names the index filters on.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ResolvedFilters {
    pub make_name: Option<String>,
    pub model_name: Option<String>,
}

/// Resolve taxonomy ids to names, rejecting unknown ids before any index
/// call. Partial resolution is never passed through: the first unknown id
/// short-circuits.
async fn resolve_filters(
    repo: &VehicleRepository<'_>,
    make_id: Option<MakeId>,
    model_id: Option<ModelId>,
) -> Result<ResolvedFilters, AppError> {
    let make_name = match make_id {
        None => None,
        Some(id) => Some(
            repo.make_name(id)
                .await?
                .ok_or_else(|| AppError::InvalidFilter(format!("unknown make_id: {id}")))?,
        ),
    };

    let model_name = match model_id {
        None => None,
        Some(id) => Some(
            repo.model_name(id)
                .await?
                .ok_or_else(|| AppError::InvalidFilter(format!("unknown model_id: {id}")))?,
        ),
    };

    Ok(ResolvedFilters {
        make_name,
        model_name,
    })
}

/// Build the index filter expression from resolved names and the remaining
/// raw-value filters. Year membership tests the document's fitment span.
fn build_filter(
    resolved: &ResolvedFilters,
    year: Option<i32>,
    category_slug: Option<&str>,
) -> Option<String> {
    let mut clauses = Vec::new();

    if let Some(name) = &resolved.make_name {
        clauses.push(format!("fits_makes = {}", quote(name)));
    }
    if let Some(name) = &resolved.model_name {
        clauses.push(format!("fits_models = {}", quote(name)));
    }
    if let Some(year) = year {
        clauses.push(format!("year_start <= {year} AND year_end >= {year}"));
    }
    if let Some(slug) = category_slug {
        clauses.push(format!("category_slug = {}", quote(slug)));
    }

    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join(" AND "))
    }
}

/// Quote a string value for the index filter syntax.
fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Echo of the caller's raw filter inputs (not the resolved names).
#[derive(Debug, Serialize)]
pub struct EchoedFilters {
    pub q: String,
    pub make_id: Option<String>,
    pub model_id: Option<String>,
    pub year: Option<String>,
    pub category_slug: Option<String>,
}

impl From<&RawSearchParams> for EchoedFilters {
    fn from(raw: &RawSearchParams) -> Self {
        Self {
            q: raw.q.clone(),
            make_id: raw.make_id.clone(),
            model_id: raw.model_id.clone(),
            year: raw.year.clone(),
            category_slug: raw.category_slug.clone(),
        }
    }
}

/// Search response contract.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Total matches ignoring pagination.
    pub count: u64,
    pub limit: u32,
    pub offset: u32,
    pub results: Vec<SearchDocument>,
    pub filters: EchoedFilters,
}

/// Public search entry point.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(raw): Query<RawSearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let params = SearchParams::parse(&raw)?;

    let repo = VehicleRepository::new(state.pool());
    let resolved = resolve_filters(&repo, params.make_id, params.model_id).await?;
    let filter = build_filter(&resolved, params.year, params.category_slug.as_deref());

    let page = state
        .search()
        .search(&SearchQuery {
            q: params.q,
            filter,
            limit: params.limit,
            offset: params.offset,
        })
        .await?;

    Ok(Json(SearchResponse {
        count: page.total_hits,
        limit: params.limit,
        offset: params.offset,
        results: page.hits,
        filters: EchoedFilters::from(&raw),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawSearchParams {
        let mut params = RawSearchParams::default();
        for (key, value) in pairs {
            let value = (*value).to_owned();
            match *key {
                "q" => params.q = value,
                "make_id" => params.make_id = Some(value),
                "model_id" => params.model_id = Some(value),
                "year" => params.year = Some(value),
                "category_slug" => params.category_slug = Some(value),
                "limit" => params.limit = Some(value),
                "offset" => params.offset = Some(value),
                other => panic!("unknown key {other}"),
            }
        }
        params
    }

    fn validation_message(err: AppError) -> String {
        match err {
            AppError::Validation(message) => message,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn defaults_apply_when_nothing_is_supplied() {
        let params = SearchParams::parse(&raw(&[])).expect("valid");
        assert_eq!(params.limit, 20);
        assert_eq!(params.offset, 0);
        assert_eq!(params.q, "");
        assert_eq!(params.make_id, None);
        assert_eq!(params.year, None);
    }

    #[test]
    fn limit_zero_is_rejected() {
        let err = SearchParams::parse(&raw(&[("limit", "0")])).expect_err("invalid");
        assert_eq!(validation_message(err), "invalid limit (1-100)");
    }

    #[test]
    fn limit_above_hundred_is_rejected() {
        let err = SearchParams::parse(&raw(&[("limit", "101")])).expect_err("invalid");
        assert_eq!(validation_message(err), "invalid limit (1-100)");
    }

    #[test]
    fn non_numeric_limit_is_rejected() {
        let err = SearchParams::parse(&raw(&[("limit", "twenty")])).expect_err("invalid");
        assert_eq!(validation_message(err), "invalid limit (1-100)");
    }

    #[test]
    fn negative_offset_is_rejected() {
        let err = SearchParams::parse(&raw(&[("offset", "-1")])).expect_err("invalid");
        assert_eq!(validation_message(err), "invalid offset");
    }

    #[test]
    fn non_numeric_year_is_rejected() {
        let err = SearchParams::parse(&raw(&[("year", "recent")])).expect_err("invalid");
        assert_eq!(validation_message(err), "invalid year");
    }

    #[test]
    fn non_numeric_make_id_is_rejected() {
        let err = SearchParams::parse(&raw(&[("make_id", "honda")])).expect_err("invalid");
        assert_eq!(validation_message(err), "invalid make_id");
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let params = SearchParams::parse(&raw(&[
            ("make_id", ""),
            ("year", ""),
            ("limit", ""),
            ("category_slug", ""),
        ]))
        .expect("valid");
        assert_eq!(params.make_id, None);
        assert_eq!(params.year, None);
        assert_eq!(params.limit, 20);
        assert_eq!(params.category_slug, None);
    }

    #[test]
    fn boundary_limits_are_accepted() {
        assert_eq!(
            SearchParams::parse(&raw(&[("limit", "1")])).expect("valid").limit,
            1
        );
        assert_eq!(
            SearchParams::parse(&raw(&[("limit", "100")])).expect("valid").limit,
            100
        );
    }

    #[test]
    fn no_filters_yields_no_expression() {
        assert_eq!(build_filter(&ResolvedFilters::default(), None, None), None);
    }

    #[test]
    fn all_filters_combine_with_and() {
        let resolved = ResolvedFilters {
            make_name: Some("Honda".to_owned()),
            model_name: Some("Civic".to_owned()),
        };
        let filter =
            build_filter(&resolved, Some(2018), Some("brake-systems")).expect("expression");
        assert_eq!(
            filter,
            r#"fits_makes = "Honda" AND fits_models = "Civic" AND year_start <= 2018 AND year_end >= 2018 AND category_slug = "brake-systems""#
        );
    }

    #[test]
    fn year_alone_builds_span_membership_test() {
        let filter =
            build_filter(&ResolvedFilters::default(), Some(2020), None).expect("expression");
        assert_eq!(filter, "year_start <= 2020 AND year_end >= 2020");
    }

    #[test]
    fn quoting_escapes_embedded_quotes() {
        let resolved = ResolvedFilters {
            make_name: Some(r#"O"Brien"#.to_owned()),
            model_name: None,
        };
        let filter = build_filter(&resolved, None, None).expect("expression");
        assert_eq!(filter, r#"fits_makes = "O\"Brien""#);
    }

    #[test]
    fn echoed_filters_carry_raw_inputs() {
        let raw = raw(&[("q", "brake"), ("make_id", "0007"), ("year", "2018")]);
        let echoed = EchoedFilters::from(&raw);
        // The raw text round-trips untouched, not the parsed value.
        assert_eq!(echoed.make_id.as_deref(), Some("0007"));
        assert_eq!(echoed.year.as_deref(), Some("2018"));
        assert_eq!(echoed.q, "brake");
    }
}
