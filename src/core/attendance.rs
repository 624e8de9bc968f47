use crate::core::business_day::BusinessClock;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceEvent;
use chrono::NaiveDate;

pub struct AttendanceLogic;

impl AttendanceLogic {
    /// Remove a member's attendance for one local business day.
    /// Returns how many events were deleted.
    pub fn delete_for_day(
        pool: &mut DbPool,
        clock: &BusinessClock,
        member_id: i64,
        date: NaiveDate,
    ) -> AppResult<usize> {
        let window = clock.window(date);

        let tx = pool.conn.transaction()?;
        if queries::find_member_by_id(&tx, member_id)?.is_none() {
            return Err(AppError::MemberNotFound(format!("id {member_id}")));
        }

        let deleted = queries::delete_member_events_in(&tx, member_id, &window)?;
        ttlog(
            &tx,
            "attendance_del",
            &member_id.to_string(),
            &format!("Deleted {deleted} event(s) for {}", date.format("%d/%m/%Y")),
        )?;
        tx.commit()?;

        Ok(deleted)
    }

    /// Events of a member on one local business day.
    pub fn for_day(
        pool: &mut DbPool,
        clock: &BusinessClock,
        member_id: i64,
        date: NaiveDate,
    ) -> AppResult<Vec<AttendanceEvent>> {
        queries::load_member_events_in(&pool.conn, member_id, &clock.window(date))
    }
}
