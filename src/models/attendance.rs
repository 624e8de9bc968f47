use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Timestamps are stored as fixed-width RFC 3339 text so that lexical
/// order in SQLite equals chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEvent {
    pub id: i64,                  // ⇔ attendance.id
    pub member_id: i64,           // ⇔ attendance.member_id (FK members.id, ON DELETE CASCADE)
    pub timestamp: DateTime<Utc>, // ⇔ attendance.timestamp
    pub business_day: NaiveDate,  // ⇔ attendance.business_day (local YYYY-MM-DD)
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}
