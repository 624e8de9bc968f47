use chrono::{Datelike, NaiveDate};

/// Spanish month labels used on report headers.
const MONTHS_ES: [&str; 12] = [
    "ENERO",
    "FEBRERO",
    "MARZO",
    "ABRIL",
    "MAYO",
    "JUNIO",
    "JULIO",
    "AGOSTO",
    "SEPTIEMBRE",
    "OCTUBRE",
    "NOVIEMBRE",
    "DICIEMBRE",
];

/// Every day of `month` (1-based), or `None` for an invalid year/month.
pub fn all_days_of_month(year: i32, month: u32) -> Option<Vec<NaiveDate>> {
    let mut out = Vec::new();
    let mut d = NaiveDate::from_ymd_opt(year, month, 1)?;

    while d.month() == month && d.year() == year {
        out.push(d);
        match d.succ_opt() {
            Some(next) => d = next,
            None => break,
        }
    }

    Some(out)
}

/// Upper-case Spanish month name for a zero-based month index.
pub fn month_name(month0: u32) -> &'static str {
    MONTHS_ES.get(month0 as usize).copied().unwrap_or("")
}
