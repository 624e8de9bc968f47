use crate::core::business_day::BusinessDay;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::{AttendanceEvent, format_timestamp};
use crate::models::member::Member;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const MEMBER_COLUMNS: &str = "id, full_name, community_number, qr_code, created_at";
const EVENT_COLUMNS: &str = "id, member_id, timestamp, business_day";

fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

fn parse_instant(idx: usize, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| conversion_error(idx, AppError::InvalidDate(raw.to_string())))
}

// ---------------------------
// Members
// ---------------------------

pub fn map_member(row: &Row) -> Result<Member> {
    let created_raw: String = row.get("created_at")?;

    Ok(Member {
        id: row.get("id")?,
        full_name: row.get("full_name")?,
        community_number: row.get("community_number")?,
        qr_code: row.get("qr_code")?,
        created_at: parse_instant(4, &created_raw)?,
    })
}

pub fn insert_member(
    conn: &Connection,
    full_name: &str,
    community_number: Option<&str>,
    qr_code: &str,
    created_at: DateTime<Utc>,
) -> AppResult<Member> {
    conn.execute(
        "INSERT INTO members (full_name, community_number, qr_code, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![full_name, community_number, qr_code, created_at.to_rfc3339()],
    )?;

    let id = conn.last_insert_rowid();
    find_member_by_id(conn, id)?
        .ok_or_else(|| AppError::Other(format!("member {id} vanished after insert")))
}

/// All members ordered by display name (ties broken by id).
pub fn load_members(conn: &Connection) -> AppResult<Vec<Member>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {MEMBER_COLUMNS} FROM members ORDER BY full_name ASC, id ASC"
    ))?;

    let rows = stmt.query_map([], map_member)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn find_member_by_id(conn: &Connection, id: i64) -> AppResult<Option<Member>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {MEMBER_COLUMNS} FROM members WHERE id = ?1"
    ))?;
    Ok(stmt.query_row([id], map_member).optional()?)
}

pub fn find_member_by_qr(conn: &Connection, qr_code: &str) -> AppResult<Option<Member>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {MEMBER_COLUMNS} FROM members WHERE qr_code = ?1"
    ))?;
    Ok(stmt.query_row([qr_code], map_member).optional()?)
}

/// Update name and community label; returns the number of rows touched.
pub fn update_member(
    conn: &Connection,
    id: i64,
    full_name: &str,
    community_number: Option<&str>,
) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE members SET full_name = ?1, community_number = ?2 WHERE id = ?3",
        params![full_name, community_number, id],
    )?;
    Ok(n)
}

/// Delete a member; attendance rows go with it through the foreign key.
pub fn delete_member(conn: &Connection, id: i64) -> AppResult<usize> {
    // The explicit delete keeps databases opened without foreign_keys=ON consistent.
    conn.execute("DELETE FROM attendance WHERE member_id = ?1", [id])?;
    let n = conn.execute("DELETE FROM members WHERE id = ?1", [id])?;
    Ok(n)
}

// ---------------------------
// Attendance
// ---------------------------

pub fn map_event(row: &Row) -> Result<AttendanceEvent> {
    let ts_raw: String = row.get("timestamp")?;
    let day_raw: String = row.get("business_day")?;

    let business_day = NaiveDate::parse_from_str(&day_raw, "%Y-%m-%d")
        .map_err(|_| conversion_error(3, AppError::InvalidDate(day_raw.clone())))?;

    Ok(AttendanceEvent {
        id: row.get("id")?,
        member_id: row.get("member_id")?,
        timestamp: parse_instant(2, &ts_raw)?,
        business_day,
    })
}

pub fn insert_event(
    conn: &Connection,
    member_id: i64,
    timestamp: DateTime<Utc>,
    business_day: NaiveDate,
) -> AppResult<AttendanceEvent> {
    conn.execute(
        "INSERT INTO attendance (member_id, timestamp, business_day)
         VALUES (?1, ?2, ?3)",
        params![
            member_id,
            format_timestamp(timestamp),
            business_day.format("%Y-%m-%d").to_string()
        ],
    )?;

    Ok(AttendanceEvent {
        id: conn.last_insert_rowid(),
        member_id,
        timestamp,
        business_day,
    })
}

/// Rows of one member that belong to a business day: the instant lies in
/// the window, or the stored `business_day` (the unique key) names the day.
/// The two differ only for rows written under another UTC offset.
const MEMBER_DAY_FILTER: &str = "member_id = ?1
     AND (business_day = ?2 OR (timestamp >= ?3 AND timestamp <= ?4))";

/// Events of one member inside a business day.
pub fn load_member_events_in(
    conn: &Connection,
    member_id: i64,
    window: &BusinessDay,
) -> AppResult<Vec<AttendanceEvent>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {EVENT_COLUMNS} FROM attendance
         WHERE {MEMBER_DAY_FILTER}
         ORDER BY timestamp ASC"
    ))?;

    let rows = stmt.query_map(
        params![
            member_id,
            window.date.format("%Y-%m-%d").to_string(),
            format_timestamp(window.start),
            format_timestamp(window.end)
        ],
        map_event,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Remove one member's events of a business day. Clears every row the
/// unique `(member_id, business_day)` index would collide with.
pub fn delete_member_events_in(
    conn: &Connection,
    member_id: i64,
    window: &BusinessDay,
) -> AppResult<usize> {
    let n = conn.execute(
        &format!("DELETE FROM attendance WHERE {MEMBER_DAY_FILTER}"),
        params![
            member_id,
            window.date.format("%Y-%m-%d").to_string(),
            format_timestamp(window.start),
            format_timestamp(window.end)
        ],
    )?;
    Ok(n)
}

/// Every event, most recent first.
pub fn load_events(conn: &Connection) -> AppResult<Vec<AttendanceEvent>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {EVENT_COLUMNS} FROM attendance ORDER BY timestamp DESC, id DESC"
    ))?;

    let rows = stmt.query_map([], map_event)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Events whose instant lies in `[start, end]`, oldest first.
pub fn load_events_between(
    conn: &Connection,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> AppResult<Vec<AttendanceEvent>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {EVENT_COLUMNS} FROM attendance
         WHERE timestamp >= ?1 AND timestamp <= ?2
         ORDER BY timestamp ASC, id ASC"
    ))?;

    let rows = stmt.query_map(
        params![format_timestamp(start), format_timestamp(end)],
        map_event,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn count_member_events(conn: &Connection, member_id: i64) -> AppResult<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM attendance WHERE member_id = ?1",
        [member_id],
        |row| row.get(0),
    )?;
    Ok(n)
}
