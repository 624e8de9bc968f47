//! Best-effort outbound notifications.
//!
//! A check-in publishes a [`CheckInNotice`] to the [`Outbox`] after its
//! transaction commits. A worker thread hands notices to a [`Notifier`];
//! delivery failures are logged and never reach the caller.

mod http;
mod outbox;

pub use http::HttpNotifier;
pub use outbox::Outbox;

use crate::core::business_day::BusinessClock;
use crate::core::checkin::CheckInOutcome;
use crate::errors::AppResult;
use crate::utils::formatting::{community_or, pad_member_id};
use serde::Serialize;

/// Payload sent to the spreadsheet sync endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckInNotice {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Nombre")]
    pub name: String,
    #[serde(rename = "Comunidad")]
    pub community: String,
    #[serde(rename = "Fecha")]
    pub date: String,
    #[serde(rename = "Hora")]
    pub time: String,
    #[serde(rename = "actualizado")]
    pub updated: bool,
}

impl CheckInNotice {
    pub fn from_outcome(outcome: &CheckInOutcome, clock: &BusinessClock) -> Self {
        Self {
            id: pad_member_id(outcome.member.id),
            name: outcome.member.full_name.clone(),
            community: community_or(outcome.member.community_number.as_deref(), "S/N"),
            date: clock.format_date(outcome.recorded_at),
            time: clock.format_time(outcome.recorded_at),
            updated: outcome.updated,
        }
    }
}

/// Delivers one notice. Runs on the outbox worker thread.
pub trait Notifier: Send + 'static {
    fn send(&self, notice: &CheckInNotice) -> AppResult<()>;
}
