//! Parsing and formatting of the dates the tools stamp onto commits.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Error, Result};

const DAY_FORMAT: &str = "%Y-%m-%d";
const GIT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses a calendar day in `YYYY-MM-DD` form.
pub fn parse_day(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DAY_FORMAT).map_err(|_| Error::InvalidDate {
        raw: raw.to_string(),
        expected: "YYYY-MM-DD",
    })
}

/// Parses `YYYY-MM-DD` (midnight) or `YYYY-MM-DDTHH:MM[:SS]`.
///
/// A space is accepted in place of the `T` separator.
pub fn parse_commit_datetime(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt);
        }
    }

    match NaiveDate::parse_from_str(raw, DAY_FORMAT) {
        Ok(day) => Ok(day.and_time(NaiveTime::MIN)),
        Err(_) => Err(Error::InvalidDate {
            raw: raw.to_string(),
            expected: "YYYY-MM-DD or YYYY-MM-DDTHH:MM[:SS]",
        }),
    }
}

/// Every day from `start` to `end`, both included.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>> {
    if end < start {
        return Err(Error::InvalidRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    Ok(start.iter_days().take_while(|d| *d <= end).collect())
}

/// Formats a timestamp the way `GIT_AUTHOR_DATE`/`GIT_COMMITTER_DATE` expect.
pub fn git_timestamp(when: &NaiveDateTime) -> String {
    when.format(GIT_FORMAT).to_string()
}

/// 12:00:00 on `day`.
pub fn noon(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN) + Duration::hours(12)
}

/// Message used by a dated commit when none is given.
pub fn default_message(when: &NaiveDateTime) -> String {
    format!("Commit on {}", when.date())
}
