//! Month cursor, timestamp parsing and the small date helpers the panel and
//! the terminal front end share.

use chrono::{
    DateTime, Datelike, Days, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime,
    NaiveTime, TimeDelta, TimeZone, Timelike,
};

use crate::error::{CalboardError, CalboardResult};

/// The date anchoring the visible month.
///
/// Only the year and month matter for fetching, but the day is kept so that
/// navigating back and forth behaves like the native date arithmetic the grid
/// expects (Jan 31 + 1 month lands on Mar 2 or 3, not Feb 28).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthCursor(NaiveDate);

impl MonthCursor {
    pub fn new(date: NaiveDate) -> Self {
        MonthCursor(date)
    }

    pub fn today() -> Self {
        MonthCursor(Local::now().date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Move by `months` calendar months, keeping the day of month and rolling
    /// any overflow into the following month.
    ///
    /// A shift past the range chrono can represent leaves the cursor unchanged.
    pub fn shift(&self, months: i32) -> Self {
        let total = i64::from(self.0.year()) * 12 + i64::from(self.0.month0()) + i64::from(months);
        let month = total.rem_euclid(12) as u32 + 1;

        i32::try_from(total.div_euclid(12))
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, month, 1))
            .and_then(|first| first.checked_add_days(Days::new(u64::from(self.0.day() - 1))))
            .map(MonthCursor)
            .unwrap_or(*self)
    }

    pub fn next(&self) -> Self {
        self.shift(1)
    }

    pub fn previous(&self) -> Self {
        self.shift(-1)
    }

    pub fn same_month(&self, date: NaiveDate) -> bool {
        self.0.year() == date.year() && self.0.month() == date.month()
    }

    /// "October 2025"
    pub fn label(&self) -> String {
        self.0.format("%B %Y").to_string()
    }

    /// Local midnight of the cursor date, as sent in the month preview query.
    pub fn query_timestamp(&self) -> String {
        at_local(self.0, NaiveTime::MIN).to_rfc3339()
    }

    /// First instant of this month and first instant of the next, in local time.
    pub fn month_bounds(&self) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
        let first = self.0.with_day(1).unwrap_or(self.0);
        let next = MonthCursor(first).next().date();
        (at_local(first, NaiveTime::MIN), at_local(next, NaiveTime::MIN))
    }
}

/// Parse an ISO-8601 timestamp from the store and move it to the local offset.
///
/// Accepts RFC 3339, Java zoned output with a trailing `[Region/City]`, and the
/// ISO-8601 basic format (`20251023T093000Z`).
pub fn parse_timestamp(field: &'static str, value: &str) -> CalboardResult<DateTime<FixedOffset>> {
    let malformed = || CalboardError::MalformedTimestamp {
        field,
        value: value.to_string(),
    };

    // Zone ids in brackets carry no information the numeric offset lacks
    let trimmed = match value.find('[') {
        Some(idx) if value.ends_with(']') => &value[..idx],
        _ => value,
    };

    let parsed = match DateTime::parse_from_rfc3339(trimmed) {
        Ok(dt) => dt,
        Err(_) => parse_iso8601(trimmed).ok_or_else(malformed)?,
    };

    Ok(to_local(parsed))
}

fn parse_iso8601(value: &str) -> Option<DateTime<FixedOffset>> {
    let parsed = iso8601::datetime(value).ok()?;

    let date = match parsed.date {
        iso8601::Date::YMD { year, month, day } => NaiveDate::from_ymd_opt(year, month, day)?,
        iso8601::Date::Ordinal { year, ddd } => NaiveDate::from_yo_opt(year, ddd)?,
        // The store never sends week dates
        iso8601::Date::Week { .. } => return None,
    };

    let time = NaiveTime::from_hms_milli_opt(
        parsed.time.hour,
        parsed.time.minute,
        parsed.time.second,
        parsed.time.millisecond,
    )?;

    let offset_secs = parsed.time.tz_offset_hours * 3600 + parsed.time.tz_offset_minutes * 60;
    let offset = FixedOffset::east_opt(offset_secs)?;

    offset
        .from_local_datetime(&date.and_time(time))
        .single()
}

/// Same instant, expressed in the machine's local offset.
pub fn to_local(dt: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    dt.with_timezone(&Local).fixed_offset()
}

/// Combine a calendar day and a wall-clock time in local time.
///
/// A time skipped by a DST jump is moved forward an hour.
pub fn at_local(day: NaiveDate, time: NaiveTime) -> DateTime<FixedOffset> {
    let naive = day.and_time(time);
    match naive.and_local_timezone(Local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.fixed_offset(),
        LocalResult::None => shifted_past_gap(naive),
    }
}

fn shifted_past_gap(naive: NaiveDateTime) -> DateTime<FixedOffset> {
    let later = naive + TimeDelta::hours(1);
    later
        .and_local_timezone(Local)
        .earliest()
        .unwrap_or_else(|| Local.from_utc_datetime(&naive))
        .fixed_offset()
}

/// Parse a 24h `HH:MM` form time.
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

pub fn minutes_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

pub fn format_hhmm(dt: &DateTime<FixedOffset>) -> String {
    dt.format("%H:%M").to_string()
}

/// "Wednesday, May 1, 2024"
pub fn format_day_label(day: NaiveDate) -> String {
    day.format("%A, %B %-d, %Y").to_string()
}

/// "09:00 - 10:00", or just the start time when there is no end.
pub fn format_time_range(start: &DateTime<FixedOffset>, end: Option<&DateTime<FixedOffset>>) -> String {
    match end {
        Some(end) => format!("{} - {}", format_hhmm(start), format_hhmm(end)),
        None => format_hhmm(start),
    }
}
