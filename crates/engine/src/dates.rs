use chrono::{Datelike, NaiveDate};

/// Formats tried in order after separator cleanup. ISO first, then
/// day-first (home jurisdiction convention), then month-first.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%m-%d-%Y"];

/// Parse a date string leniently: `/` separators are normalized to `-`,
/// any time-of-day suffix is dropped, then each known format is tried.
///
/// Returns `None` when nothing matches. Callers must treat `None` as
/// "outside every window", never as an error.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = raw.trim().replace('/', "-");
    let date_part = cleaned.split(['T', ' ']).next().unwrap_or("");
    if date_part.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(date_part, f).ok())
}

/// Whole calendar months from `a` to `b`, ignoring day-of-month.
/// This is calendar arithmetic, not elapsed-day division: an 18-month-old
/// record minus one day is still in an 18-month window.
pub fn months_between(a: NaiveDate, b: NaiveDate) -> i32 {
    (b.year() - a.year()) * 12 + (b.month() as i32 - a.month() as i32)
}

/// Months elapsed from `date` to `as_of`. `None` means the date was
/// missing or unparseable and must fail every window check.
pub fn months_ago(date: Option<NaiveDate>, as_of: NaiveDate) -> Option<i32> {
    date.map(|d| months_between(d, as_of))
}

/// True when `date` falls within the trailing `lookback` months of `as_of`.
pub fn within_months(date: Option<NaiveDate>, as_of: NaiveDate, lookback: i32) -> bool {
    months_ago(date, as_of).map_or(false, |m| m <= lookback)
}
