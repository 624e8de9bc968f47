//! Meeting calendar: which days of a month attendance is expected.

use crate::errors::{AppError, AppResult};
use crate::utils::date::all_days_of_month;
use chrono::{Datelike, NaiveDate, Weekday};

/// Decides whether a calendar day is a meeting day.
pub trait MeetingCalendar {
    fn is_meeting_day(&self, date: NaiveDate) -> bool;

    /// Meeting days of a month, ascending. `month0` is zero-based (0 = January).
    fn meeting_dates(&self, year: i32, month0: u32) -> AppResult<Vec<NaiveDate>> {
        if month0 > 11 {
            return Err(AppError::Validation(format!(
                "month must be between 0 and 11, got {month0}"
            )));
        }

        let days = all_days_of_month(year, month0 + 1)
            .ok_or_else(|| AppError::InvalidDate(format!("{year:04}-{:02}", month0 + 1)))?;

        Ok(days
            .into_iter()
            .filter(|d| self.is_meeting_day(*d))
            .collect())
    }
}

/// Meets on a fixed set of weekdays (Tuesday and Saturday by default).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekdayCalendar {
    weekdays: Vec<Weekday>,
}

impl Default for WeekdayCalendar {
    fn default() -> Self {
        Self::new(vec![Weekday::Tue, Weekday::Sat])
    }
}

impl WeekdayCalendar {
    pub fn new(weekdays: Vec<Weekday>) -> Self {
        Self { weekdays }
    }

    /// Build from names such as `tue`, `Saturday`, `sat`.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> AppResult<Self> {
        let mut weekdays = Vec::with_capacity(names.len());

        for name in names {
            let name = name.as_ref().trim();
            let wd = name
                .parse::<Weekday>()
                .map_err(|_| AppError::Config(format!("invalid meeting day '{name}'")))?;
            if !weekdays.contains(&wd) {
                weekdays.push(wd);
            }
        }

        if weekdays.is_empty() {
            return Err(AppError::Config("meeting_days must not be empty".into()));
        }

        Ok(Self { weekdays })
    }

    pub fn weekdays(&self) -> &[Weekday] {
        &self.weekdays
    }
}

impl MeetingCalendar for WeekdayCalendar {
    fn is_meeting_day(&self, date: NaiveDate) -> bool {
        self.weekdays.contains(&date.weekday())
    }
}
