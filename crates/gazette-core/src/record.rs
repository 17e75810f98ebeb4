//! The `LogRecord` model and its normalization rules.
//!
//! The event log is newline-delimited JSON written by loosely-typed
//! producers: the classification tag and per-event fields (`userId`,
//! `duration`, `url`, `method`) may appear at the top level or nested under
//! a structured `message` object, inconsistently. Normalization happens
//! exactly once, at parse time, so every consumer sees resolved fields
//! instead of re-probing the raw JSON at each filter site.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use crate::fields;

/// Tags admitted by the default action-only listing gate.
///
/// Records tagged exactly `error` or with an `admin_` prefix are admitted by
/// rule rather than by membership, see [`LogRecord::is_meaningful`].
pub const MEANINGFUL_TAGS: &[&str] = &[
    "article_created",
    "article_updated",
    "article_deleted",
    "article_publish_toggled",
    "comment_created",
    "comment_deleted",
    "like",
    "unlike",
    "login_success",
    "login_failed",
    "registration_success",
    "registration_failed",
    "user_action",
    "public_view",
    "access_denied",
];

/// Tags excluded from statistics unconditionally.
///
/// Together with HTTP method `OPTIONS` these form the fixed noise set; see
/// [`LogRecord::is_noise`].
pub const NOISE_TAGS: &[&str] = &[
    "http_request",
    "database_query",
    "database_operation",
    "system_health",
];

/// Requests slower than this many milliseconds are surfaced by the stats
/// report as slow requests.
pub const SLOW_REQUEST_THRESHOLD_MS: f64 = 1000.0;

/// One parsed event line from the log file.
///
/// `raw` is the original JSON value as written; listings return it verbatim.
/// `line` is the line exactly as it appears in the file, kept so the
/// free-text search sees the producer's own serialization (re-serializing
/// `raw` would reorder object keys). The remaining fields are resolved once
/// from `raw`, consulting the nested `message` object as a fallback.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub raw: Value,
    pub line: String,
    pub tag: Option<String>,
    pub level: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub user_id: Option<String>,
    pub duration: Option<f64>,
    pub url: Option<String>,
    pub method: Option<String>,
}

impl LogRecord {
    /// Parse one log line. Returns `None` for lines that are not valid JSON
    /// objects; such lines are dropped from listings and statistics alike.
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        let raw: Value = serde_json::from_str(trimmed).ok()?;
        if !raw.is_object() {
            return None;
        }
        Some(Self::new(raw, trimmed.to_string()))
    }

    /// Normalize an already-parsed JSON object into a canonical record.
    pub fn from_value(raw: Value) -> Self {
        let line = raw.to_string();
        Self::new(raw, line)
    }

    fn new(raw: Value, line: String) -> Self {
        let tag = resolved_field(&raw, fields::TYPE).and_then(value_to_string);
        let level = raw.get(fields::LEVEL).and_then(value_to_string);
        let timestamp = raw
            .get(fields::TIMESTAMP)
            .and_then(Value::as_str)
            .and_then(parse_timestamp);
        let user_id = resolved_field(&raw, fields::USER_ID).and_then(value_to_string);
        let duration = resolved_field(&raw, fields::DURATION).and_then(Value::as_f64);
        let url = resolved_field(&raw, fields::URL).and_then(value_to_string);
        let method = resolved_field(&raw, fields::METHOD).and_then(value_to_string);

        Self {
            raw,
            line,
            tag,
            level,
            timestamp,
            user_id,
            duration,
            url,
            method,
        }
    }

    /// The raw timestamp string as written, without reparsing.
    pub fn timestamp_str(&self) -> Option<&str> {
        self.raw.get(fields::TIMESTAMP).and_then(Value::as_str)
    }

    /// Look up an event-payload field, consulting the nested `message`
    /// object as a fallback (e.g. `newStatus` on publish-toggle events).
    pub fn payload_field(&self, name: &str) -> Option<&Value> {
        resolved_field(&self.raw, name)
    }

    /// Whether the default action-only listing gate admits this record:
    /// tag in the fixed allow-list, OR exactly `error`, OR `admin_`-prefixed.
    pub fn is_meaningful(&self) -> bool {
        match self.tag.as_deref() {
            Some(tag) => {
                MEANINGFUL_TAGS.contains(&tag) || tag == "error" || tag.starts_with("admin_")
            }
            None => false,
        }
    }

    /// Whether this record belongs to the fixed noise set excluded from
    /// statistics: noise-tagged, or an HTTP `OPTIONS` preflight.
    pub fn is_noise(&self) -> bool {
        if let Some(tag) = self.tag.as_deref() {
            if NOISE_TAGS.contains(&tag) {
                return true;
            }
        }
        self.method.as_deref() == Some("OPTIONS")
    }

    /// Case-insensitive substring match against the record line as written.
    /// `needle` must already be lowercased by the caller.
    pub fn matches_search(&self, needle: &str) -> bool {
        self.line.to_lowercase().contains(needle)
    }
}

/// Resolve a field that may live at the top level or inside the `message`
/// object. Top level wins when both are present.
fn resolved_field<'a>(raw: &'a Value, name: &str) -> Option<&'a Value> {
    if let Some(v) = raw.get(name) {
        if !v.is_null() {
            return Some(v);
        }
    }
    raw.get(fields::MESSAGE).and_then(|m| m.get(name))
}

/// Stringify a scalar JSON value. User ids in particular are written as
/// numbers by some producers and strings by others.
fn value_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse an ISO-8601 timestamp, tolerating a missing timezone (assumed UTC).
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|n| n.and_utc())
}
