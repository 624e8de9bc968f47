//! Business-day boundaries in a fixed UTC offset.
//!
//! Every "which day is this instant" question in the crate goes through
//! [`BusinessClock`]: the check-in dedup window, the delete-by-day window
//! and the report's per-date attendance match all use the same rule.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta, Utc};

/// Default offset of the deployment: UTC-5 (Peru time).
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = -5;

/// Inclusive absolute-instant range covering one local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessDay {
    pub date: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusinessDay {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessClock {
    offset: FixedOffset,
}

impl BusinessClock {
    /// `utc_offset_hours` is signed hours east of UTC (`-5` for UTC-5).
    pub fn new(utc_offset_hours: i32) -> AppResult<Self> {
        if !(-23..=23).contains(&utc_offset_hours) {
            return Err(AppError::Config(format!(
                "utc_offset_hours must be between -23 and 23, got {utc_offset_hours}"
            )));
        }

        let offset = FixedOffset::east_opt(utc_offset_hours * 3600).ok_or_else(|| {
            AppError::Config(format!("invalid utc offset: {utc_offset_hours}"))
        })?;

        Ok(Self { offset })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Local calendar date that contains `instant`.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    /// Local "today" for the given wall-clock instant.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        self.local_date(now)
    }

    /// Window `[local 00:00, local 23:59:59.999]` of `date`, in UTC.
    pub fn window(&self, date: NaiveDate) -> BusinessDay {
        let start = self.at_local(date, NaiveTime::MIN);
        let end = start + TimeDelta::hours(24) - TimeDelta::milliseconds(1);
        BusinessDay { date, start, end }
    }

    /// Window of the business day containing `instant`.
    pub fn window_containing(&self, instant: DateTime<Utc>) -> BusinessDay {
        self.window(self.local_date(instant))
    }

    /// Window for an explicit day/month/year triple.
    ///
    /// Out-of-range components (31/04, 29/02 on a common year, month 13)
    /// are rejected with `InvalidDate`.
    pub fn window_for_dmy(&self, day: u32, month: u32, year: i32) -> AppResult<BusinessDay> {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| AppError::InvalidDate(format!("{day:02}/{month:02}/{year:04}")))?;
        Ok(self.window(date))
    }

    /// Fixed time of day used for retroactive entries: local noon.
    pub fn local_noon(&self, date: NaiveDate) -> DateTime<Utc> {
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN);
        self.at_local(date, noon)
    }

    /// `DD/MM/YYYY` of the local date containing `instant`.
    pub fn format_date(&self, instant: DateTime<Utc>) -> String {
        format_dmy(self.local_date(instant))
    }

    /// `HH:mm:ss` of `instant` in local time.
    pub fn format_time(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.offset)
            .format("%H:%M:%S")
            .to_string()
    }

    fn at_local(&self, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
        // A fixed offset has no gaps or folds, the mapping is always single.
        let local = date.and_time(time);
        let shift = TimeDelta::seconds(i64::from(self.offset.local_minus_utc()));
        (local - shift).and_utc()
    }
}

/// Parse a `DD/MM/YYYY` calendar date.
pub fn parse_dmy(s: &str) -> AppResult<NaiveDate> {
    let trimmed = s.trim();
    let parts: Vec<&str> = trimmed.split('/').collect();

    if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) || parts[2].len() != 4 {
        return Err(AppError::InvalidDate(format!(
            "'{trimmed}' (expected DD/MM/YYYY)"
        )));
    }

    let parse = |p: &str| {
        p.parse::<u32>()
            .map_err(|_| AppError::InvalidDate(format!("'{trimmed}' (expected DD/MM/YYYY)")))
    };

    let day = parse(parts[0])?;
    let month = parse(parts[1])?;
    let year = parse(parts[2])?;

    NaiveDate::from_ymd_opt(year as i32, month, day)
        .ok_or_else(|| AppError::InvalidDate(format!("'{trimmed}' does not exist")))
}

/// Format a calendar date as `DD/MM/YYYY`.
pub fn format_dmy(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
