//! Listing parameters and the layered filter pipeline.
//!
//! Filters run in a fixed order (gate → visibility flags → explicit
//! filters → pagination); the order is load-bearing because pagination
//! accounting is computed over the fully filtered set.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use gazette_core::LogRecord;

/// Query parameters for a log listing, as received on the wire.
///
/// Everything arrives string-typed and is coerced leniently: non-numeric
/// `limit`/`offset` fall back to their defaults and unrecognized boolean
/// strings read as false. This tolerance is inherited producer behavior,
/// kept deliberately (see DESIGN.md) instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLogsParams {
    /// Exact match on the resolved tag; `"all"` (the default) disables it.
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    /// Exact match on severity; `"all"` (the default) disables it.
    pub level: Option<String>,
    /// Page size, default 100.
    pub limit: Option<String>,
    /// Page offset over the filtered set, default 0.
    pub offset: Option<String>,
    /// Inclusive lower bound on `timestamp`.
    pub start_date: Option<String>,
    /// Inclusive upper bound on `timestamp`.
    pub end_date: Option<String>,
    /// Exact match on the resolved user id.
    pub user_id: Option<String>,
    /// Case-insensitive substring over the full serialized record.
    pub search: Option<String>,
    /// Show `http_request` records, default false.
    pub show_http: Option<String>,
    /// Show `OPTIONS` preflight records, default false.
    pub show_options: Option<String>,
    /// Show `database_query`/`database_operation` records, default false.
    pub show_database: Option<String>,
    /// Apply the meaningful-tag gate before everything else, default true.
    pub action_only: Option<String>,
}

impl ListLogsParams {
    pub fn limit(&self) -> usize {
        coerce_usize(&self.limit, 100)
    }

    pub fn offset(&self) -> usize {
        coerce_usize(&self.offset, 0)
    }

    pub fn show_http(&self) -> bool {
        coerce_bool(&self.show_http, false)
    }

    pub fn show_options(&self) -> bool {
        coerce_bool(&self.show_options, false)
    }

    pub fn show_database(&self) -> bool {
        coerce_bool(&self.show_database, false)
    }

    pub fn action_only(&self) -> bool {
        coerce_bool(&self.action_only, true)
    }

    /// The tag filter, with `"all"` meaning unset.
    fn tag_filter(&self) -> Option<&str> {
        self.event_type.as_deref().filter(|t| *t != "all")
    }

    fn level_filter(&self) -> Option<&str> {
        self.level.as_deref().filter(|l| *l != "all")
    }
}

fn coerce_usize(v: &Option<String>, default: usize) -> usize {
    v.as_deref()
        .and_then(|s| s.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn coerce_bool(v: &Option<String>, default: bool) -> bool {
    match v.as_deref() {
        Some(s) => s == "true" || s == "1",
        None => default,
    }
}

/// Parse a query-side date bound. Accepts RFC 3339, a naive datetime
/// (assumed UTC), or a bare date (midnight UTC).
fn parse_date_bound(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|n| n.and_utc())
}

/// Pagination metadata over the filtered set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    pub has_more: bool,
}

/// Summary of the returned page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    /// Records remaining after all filters.
    pub total: usize,
    /// Records actually returned on this page.
    pub showing: usize,
    /// Filtered-set records not on this page.
    pub filtered: usize,
    /// Distinct tags present on the returned page, first-seen order.
    pub types: Vec<String>,
}

/// Response body of a log listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLogsResponse {
    pub logs: Vec<Value>,
    pub pagination: Pagination,
    pub summary: PageSummary,
}

/// Run the full listing pipeline over records in file order (oldest first).
pub(crate) fn run(mut records: Vec<LogRecord>, params: &ListLogsParams) -> ListLogsResponse {
    // Present newest-first
    records.reverse();

    // The meaningful-tag gate runs before every other filter
    if params.action_only() {
        records.retain(LogRecord::is_meaningful);
    }

    if !params.show_http() {
        records.retain(|r| r.tag.as_deref() != Some("http_request"));
    }
    if !params.show_options() {
        records.retain(|r| r.method.as_deref() != Some("OPTIONS"));
    }
    if !params.show_database() {
        records.retain(|r| {
            !matches!(
                r.tag.as_deref(),
                Some("database_query") | Some("database_operation")
            )
        });
    }

    // Health-check chatter is suppressed regardless of flags
    records.retain(|r| r.tag.as_deref() != Some("system_health"));

    if let Some(tag) = params.tag_filter() {
        records.retain(|r| r.tag.as_deref() == Some(tag));
    }
    if let Some(level) = params.level_filter() {
        records.retain(|r| r.level.as_deref() == Some(level));
    }
    if let Some(start) = params.start_date.as_deref().and_then(parse_date_bound) {
        records.retain(|r| r.timestamp.is_some_and(|ts| ts >= start));
    }
    if let Some(end) = params.end_date.as_deref().and_then(parse_date_bound) {
        records.retain(|r| r.timestamp.is_some_and(|ts| ts <= end));
    }
    if let Some(user_id) = params.user_id.as_deref() {
        records.retain(|r| r.user_id.as_deref() == Some(user_id.trim()));
    }
    if let Some(search) = params.search.as_deref() {
        let needle = search.to_lowercase();
        records.retain(|r| r.matches_search(&needle));
    }

    let total = records.len();
    let offset = params.offset();
    let limit = params.limit();

    let page: Vec<&LogRecord> = records.iter().skip(offset).take(limit).collect();

    let mut types: Vec<String> = Vec::new();
    for record in &page {
        if let Some(tag) = &record.tag {
            if !types.contains(tag) {
                types.push(tag.clone());
            }
        }
    }

    let showing = page.len();
    ListLogsResponse {
        logs: page.into_iter().map(|r| r.raw.clone()).collect(),
        pagination: Pagination {
            total,
            offset,
            limit,
            has_more: offset + showing < total,
        },
        summary: PageSummary {
            total,
            showing,
            filtered: total - showing,
            types,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_offset_coercion_tolerates_junk() {
        let params = ListLogsParams {
            limit: Some("not-a-number".into()),
            offset: Some("".into()),
            ..Default::default()
        };
        assert_eq!(params.limit(), 100);
        assert_eq!(params.offset(), 0);

        let params = ListLogsParams {
            limit: Some("25".into()),
            offset: Some(" 50 ".into()),
            ..Default::default()
        };
        assert_eq!(params.limit(), 25);
        assert_eq!(params.offset(), 50);
    }

    #[test]
    fn test_boolean_coercion_defaults() {
        let params = ListLogsParams::default();
        assert!(!params.show_http());
        assert!(!params.show_options());
        assert!(!params.show_database());
        assert!(params.action_only());

        let params = ListLogsParams {
            show_http: Some("1".into()),
            action_only: Some("false".into()),
            ..Default::default()
        };
        assert!(params.show_http());
        assert!(!params.action_only());
    }

    #[test]
    fn test_all_disables_tag_and_level_filters() {
        let params = ListLogsParams {
            event_type: Some("all".into()),
            level: Some("all".into()),
            ..Default::default()
        };
        assert!(params.tag_filter().is_none());
        assert!(params.level_filter().is_none());
    }

    #[test]
    fn test_parse_date_bound_formats() {
        assert!(parse_date_bound("2024-01-15T10:30:00Z").is_some());
        assert!(parse_date_bound("2024-01-15T10:30:00").is_some());
        let midnight = parse_date_bound("2024-01-15").unwrap();
        assert_eq!(midnight.to_rfc3339(), "2024-01-15T00:00:00+00:00");
        assert!(parse_date_bound("last tuesday").is_none());
    }
}
