//! Wire field names of the event-log record schema.
//!
//! Producers are loosely typed, so these names are the single source of
//! truth for both writers (the request logger) and the normalization step.
//! Any of the payload fields may appear at the top level or nested under
//! [`MESSAGE`].
//!
//! ## Severity Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | error | Failed operations, surfaced in the recent-errors rollup |
//! | warn  | Denied access, suspicious activity |
//! | info  | User/content actions, request logging |
//! | debug | Database chatter, background jobs |

// ─── Envelope fields ───────────────────────────────────────────────────────

/// ISO-8601 write-time timestamp.
pub const TIMESTAMP: &str = "timestamp";

/// Severity: `error`, `warn`, `info`, or `debug`.
pub const LEVEL: &str = "level";

/// Free-form classification tag.
pub const TYPE: &str = "type";

/// Plain string, or a structured object carrying event-specific fields.
pub const MESSAGE: &str = "message";

// ─── Payload fields ────────────────────────────────────────────────────────

/// Acting user's identifier; the literal `anonymous` for public traffic.
pub const USER_ID: &str = "userId";

/// Wall-clock duration of the logged operation, milliseconds.
pub const DURATION: &str = "duration";

/// Request URL on `http_request` records.
pub const URL: &str = "url";

/// HTTP method on `http_request` records.
pub const METHOD: &str = "method";

/// Resulting status on `article_publish_toggled` records.
pub const NEW_STATUS: &str = "newStatus";
