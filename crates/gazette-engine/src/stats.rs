//! Aggregate statistics over the event log.
//!
//! Stats are always computed over every parsed record minus the fixed noise
//! set; the listing's meaningful-tag gate is intentionally NOT applied here.
//! The list view defaults to a decluttered slice, the stats reflect broad
//! activity — an asymmetry inherited from product behavior, preserved.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::Value;

use gazette_core::{fields, LogRecord, SLOW_REQUEST_THRESHOLD_MS};

/// Record counts per severity.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ByLevel {
    pub error: usize,
    pub warn: usize,
    pub info: usize,
    pub debug: usize,
}

/// One ranked entry in the top-users rollup.
#[derive(Debug, Clone, Serialize)]
pub struct TopUser {
    pub id: String,
    pub count: usize,
}

/// A request that exceeded the slow threshold, reduced to display fields.
#[derive(Debug, Clone, Serialize)]
pub struct SlowRequest {
    pub url: Option<String>,
    pub duration: f64,
    pub timestamp: Option<String>,
}

/// Noise accounting relative to the raw record count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoiseSummary {
    pub meaningful_logs: usize,
    pub noise_removed: usize,
    pub noise_percentage: String,
}

/// The full statistics report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    /// Non-noise record count.
    pub total: usize,
    /// Every parsed record, noise included.
    pub raw_total: usize,
    pub by_level: ByLevel,
    /// Count per distinct tag over non-noise records.
    pub by_action: BTreeMap<String, usize>,
    /// Up to 10 most-recent error-level records from the trailing 24 hours,
    /// kept in original file order (oldest of the window first).
    pub recent_errors: Vec<Value>,
    pub last_hour: usize,
    #[serde(rename = "last24Hours")]
    pub last_24_hours: usize,
    /// Up to 10 users ranked by record count, `anonymous` excluded.
    pub top_users: Vec<TopUser>,
    pub total_articles_created: usize,
    pub total_articles_published: usize,
    pub total_comments: usize,
    pub total_likes: usize,
    pub total_logins: usize,
    pub total_registrations: usize,
    /// `"<n>ms"` mean of observed durations, or `"N/A"` when none exist.
    pub response_time_avg: String,
    /// Up to 10 above-threshold requests in encounter order.
    pub slow_requests: Vec<SlowRequest>,
    pub summary: NoiseSummary,
}

/// Compute the report over records in file order, relative to `now`.
pub(crate) fn compute(records: &[LogRecord], now: DateTime<Utc>) -> StatsReport {
    let raw_total = records.len();
    let hour_ago = now - Duration::hours(1);
    let day_ago = now - Duration::hours(24);

    let mut by_level = ByLevel::default();
    let mut by_action: BTreeMap<String, usize> = BTreeMap::new();
    let mut recent_errors: Vec<Value> = Vec::new();
    let mut last_hour = 0usize;
    let mut last_24_hours = 0usize;
    let mut user_counts: HashMap<String, usize> = HashMap::new();
    let mut total = 0usize;
    let mut total_articles_created = 0usize;
    let mut total_articles_published = 0usize;
    let mut total_comments = 0usize;
    let mut total_likes = 0usize;
    let mut total_logins = 0usize;
    let mut total_registrations = 0usize;
    let mut durations: Vec<f64> = Vec::new();
    let mut slow_requests: Vec<SlowRequest> = Vec::new();

    for record in records.iter().filter(|r| !r.is_noise()) {
        total += 1;

        match record.level.as_deref() {
            Some("error") => by_level.error += 1,
            Some("warn") => by_level.warn += 1,
            Some("info") => by_level.info += 1,
            Some("debug") => by_level.debug += 1,
            _ => {}
        }

        if let Some(tag) = &record.tag {
            *by_action.entry(tag.clone()).or_insert(0) += 1;

            match tag.as_str() {
                "article_created" => total_articles_created += 1,
                "article_publish_toggled" => {
                    let published = record
                        .payload_field(fields::NEW_STATUS)
                        .and_then(Value::as_str)
                        .is_some_and(|s| s == "published");
                    if published {
                        total_articles_published += 1;
                    }
                }
                "comment_created" => total_comments += 1,
                "like" => total_likes += 1,
                "login_success" => total_logins += 1,
                "registration_success" => total_registrations += 1,
                _ => {}
            }
        }

        if let Some(ts) = record.timestamp {
            if ts > hour_ago {
                last_hour += 1;
            }
            if ts > day_ago {
                last_24_hours += 1;
                if record.level.as_deref() == Some("error") {
                    recent_errors.push(record.raw.clone());
                }
            }
        }

        if let Some(user_id) = &record.user_id {
            if user_id != "anonymous" {
                *user_counts.entry(user_id.clone()).or_insert(0) += 1;
            }
        }

        if let Some(duration) = record.duration {
            durations.push(duration);
            if duration > SLOW_REQUEST_THRESHOLD_MS && slow_requests.len() < 10 {
                slow_requests.push(SlowRequest {
                    url: record.url.clone(),
                    duration,
                    timestamp: record.timestamp_str().map(str::to_string),
                });
            }
        }
    }

    // Keep the most recent ten, still in original file order
    if recent_errors.len() > 10 {
        recent_errors.drain(..recent_errors.len() - 10);
    }

    let mut top_users: Vec<TopUser> = user_counts
        .into_iter()
        .map(|(id, count)| TopUser { id, count })
        .collect();
    top_users.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.id.cmp(&b.id)));
    top_users.truncate(10);

    let response_time_avg = if durations.is_empty() {
        "N/A".to_string()
    } else {
        let mean = durations.iter().sum::<f64>() / durations.len() as f64;
        format!("{}ms", mean.round() as i64)
    };

    let noise_removed = raw_total - total;
    let noise_percentage = if raw_total == 0 {
        "0%".to_string()
    } else {
        format!("{:.1}%", noise_removed as f64 * 100.0 / raw_total as f64)
    };

    StatsReport {
        total,
        raw_total,
        by_level,
        by_action,
        recent_errors,
        last_hour,
        last_24_hours,
        top_users,
        total_articles_created,
        total_articles_published,
        total_comments,
        total_likes,
        total_logins,
        total_registrations,
        response_time_avg,
        slow_requests,
        summary: NoiseSummary {
            meaningful_logs: total,
            noise_removed,
            noise_percentage,
        },
    }
}
