//! Report projections over the member directory and the attendance ledger.
//!
//! The projections are pure functions of their inputs: members, events, the
//! business clock, the meeting calendar and the reference "today".
//! [`ReportLogic`] only loads those inputs from the store.

use crate::core::business_day::{BusinessClock, format_dmy};
use crate::core::calendar::MeetingCalendar;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceEvent;
use crate::models::member::Member;
use crate::utils::date::all_days_of_month;
use crate::utils::formatting::{community_or, pad_member_id};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Verdict for one (member, meeting date) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    /// An event exists on that business day.
    Present,
    /// No event and the day is today or earlier.
    Absent,
    /// The day has not happened yet.
    Blank,
}

impl Cell {
    /// Symbol printed on the monthly sheet.
    pub fn symbol(&self) -> &'static str {
        match self {
            Cell::Present => "A",
            Cell::Absent => "F",
            Cell::Blank => "",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixRow {
    pub member: Member,
    pub cells: Vec<Cell>,
}

impl MatrixRow {
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|c| **c == cell).count()
    }
}

/// Members × meeting dates of one month.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceMatrix {
    pub year: i32,
    /// Zero-based month (0 = January).
    pub month: u32,
    pub today: NaiveDate,
    pub dates: Vec<NaiveDate>,
    pub rows: Vec<MatrixRow>,
}

impl AttendanceMatrix {
    /// Meeting dates as `DD/MM/YYYY`.
    pub fn date_labels(&self) -> Vec<String> {
        self.dates.iter().map(|d| format_dmy(*d)).collect()
    }

    pub fn cell(&self, member_id: i64, date: NaiveDate) -> Option<Cell> {
        let col = self.dates.iter().position(|d| *d == date)?;
        self.rows
            .iter()
            .find(|r| r.member.id == member_id)
            .and_then(|r| r.cells.get(col).copied())
    }
}

/// One attendance event flattened for export, rendered in local time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Fecha")]
    pub date: String,
    #[serde(rename = "Hora")]
    pub time: String,
    #[serde(rename = "Nombre")]
    pub name: String,
    #[serde(rename = "Comunidad")]
    pub community: String,
    #[serde(rename = "qrCode")]
    pub qr_code: String,
}

/// Members sorted by display name, ties broken by id.
fn sorted_members(members: &[Member]) -> Vec<Member> {
    let mut out = members.to_vec();
    out.sort_by(|a, b| a.full_name.cmp(&b.full_name).then(a.id.cmp(&b.id)));
    out
}

/// Build the monthly attendance matrix.
///
/// Attendance is matched by member id and by the local calendar date the
/// clock assigns to each event, the same rule the check-in service uses.
pub fn attendance_matrix(
    members: &[Member],
    events: &[AttendanceEvent],
    clock: &BusinessClock,
    calendar: &dyn MeetingCalendar,
    year: i32,
    month0: u32,
    today: NaiveDate,
) -> AppResult<AttendanceMatrix> {
    let dates = calendar.meeting_dates(year, month0)?;

    let attended: HashSet<(i64, NaiveDate)> = events
        .iter()
        .map(|ev| (ev.member_id, clock.local_date(ev.timestamp)))
        .collect();

    let rows = sorted_members(members)
        .into_iter()
        .map(|member| {
            let cells = dates
                .iter()
                .map(|d| {
                    if attended.contains(&(member.id, *d)) {
                        Cell::Present
                    } else if *d <= today {
                        Cell::Absent
                    } else {
                        Cell::Blank
                    }
                })
                .collect();
            MatrixRow { member, cells }
        })
        .collect();

    Ok(AttendanceMatrix {
        year,
        month: month0,
        today,
        dates,
        rows,
    })
}

/// Flatten events into report rows, most recent first.
/// Events whose member is unknown are skipped.
pub fn attendance_rows(
    members: &[Member],
    events: &[AttendanceEvent],
    clock: &BusinessClock,
) -> Vec<AttendanceRow> {
    let by_id: HashMap<i64, &Member> = members.iter().map(|m| (m.id, m)).collect();

    let mut sorted: Vec<&AttendanceEvent> = events.iter().collect();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));

    sorted
        .into_iter()
        .filter_map(|ev| {
            let member = by_id.get(&ev.member_id)?;
            Some(AttendanceRow {
                id: pad_member_id(member.id),
                date: clock.format_date(ev.timestamp),
                time: clock.format_time(ev.timestamp),
                name: member.full_name.clone(),
                community: community_or(member.community_number.as_deref(), "S/N"),
                qr_code: member.qr_code.clone(),
            })
        })
        .collect()
}

/// Store-backed entry points for the projections above.
pub struct ReportLogic;

impl ReportLogic {
    /// Matrix for `year`/`month0`, reading only the events of that month.
    pub fn matrix(
        pool: &mut DbPool,
        clock: &BusinessClock,
        calendar: &dyn MeetingCalendar,
        year: i32,
        month0: u32,
        today: NaiveDate,
    ) -> AppResult<AttendanceMatrix> {
        if month0 > 11 {
            return Err(AppError::Validation(format!(
                "month must be between 0 and 11, got {month0}"
            )));
        }

        let members = queries::load_members(&pool.conn)?;

        let days = all_days_of_month(year, month0 + 1).unwrap_or_default();
        let events = match (days.first(), days.last()) {
            (Some(first), Some(last)) => queries::load_events_between(
                &pool.conn,
                clock.window(*first).start,
                clock.window(*last).end,
            )?,
            _ => Vec::new(),
        };

        attendance_matrix(&members, &events, clock, calendar, year, month0, today)
    }

    /// Flat per-event rows over the whole ledger.
    pub fn rows(pool: &mut DbPool, clock: &BusinessClock) -> AppResult<Vec<AttendanceRow>> {
        let members = queries::load_members(&pool.conn)?;
        let events = queries::load_events(&pool.conn)?;
        Ok(attendance_rows(&members, &events, clock))
    }
}
