//! Check-in: resolve a scan token and record at most one event per
//! member per business day ("last scan of the day wins").

use crate::core::business_day::BusinessClock;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::member::Member;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::TransactionBehavior;

/// Result of a successful check-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInOutcome {
    pub member: Member,
    pub recorded_at: DateTime<Utc>,
    pub business_day: NaiveDate,
    /// An earlier event of the same business day was replaced.
    pub updated: bool,
}

pub struct CheckInLogic;

impl CheckInLogic {
    /// Record a scan of `token`.
    ///
    /// With `explicit_date` the event is placed at local noon of that day
    /// (manual/retroactive entry); otherwise at `now`. Any event of the same
    /// member in the same business day is removed in the same transaction.
    pub fn apply(
        pool: &mut DbPool,
        clock: &BusinessClock,
        token: &str,
        explicit_date: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> AppResult<CheckInOutcome> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::Validation("QR Code required".into()));
        }

        let effective = match explicit_date {
            Some(date) => clock.local_noon(date),
            None => now,
        };
        let window = clock.window_containing(effective);

        // IMMEDIATE takes the write lock up front so two scans of the same
        // member serialize on the whole read-delete-insert sequence.
        let tx = pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let member = queries::find_member_by_qr(&tx, token)?
            .ok_or_else(|| AppError::MemberNotFound(format!("qr code '{token}'")))?;

        let replaced = queries::delete_member_events_in(&tx, member.id, &window)?;
        let event = queries::insert_event(&tx, member.id, effective, window.date)?;

        let verb = if replaced > 0 { "replaced" } else { "recorded" };
        ttlog(
            &tx,
            "checkin",
            &member.id.to_string(),
            &format!(
                "{} {} {}",
                member.full_name,
                verb,
                clock.format_date(event.timestamp)
            ),
        )?;

        tx.commit()?;

        Ok(CheckInOutcome {
            member,
            recorded_at: event.timestamp,
            business_day: window.date,
            updated: replaced > 0,
        })
    }
}
