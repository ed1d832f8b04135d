//! Calendar projection: attach civil dates to day buckets.
//!
//! Dates are proleptic Gregorian civil dates (`chrono::NaiveDate`); no
//! time zone or DST adjustment is applied once a start date is fixed. The
//! zone only matters when resolving "today" for a missing start date.

use chrono::{Days, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::allocate::DayBucket;
use crate::error::PlanError;

/// A day bucket resolved onto a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledDay {
    pub day: u32,
    #[serde(with = "iso_date")]
    pub date: NaiveDate,
    pub topics: Vec<String>,
    pub planned_hours: u32,
}

/// Map each bucket to `start + (day - 1)` days.
///
/// Only fails when a date would fall outside the range `NaiveDate` can
/// represent.
pub fn project(buckets: Vec<DayBucket>, start: NaiveDate) -> Result<Vec<ScheduledDay>, PlanError> {
    buckets
        .into_iter()
        .map(|bucket| {
            let offset = u64::from(bucket.day.saturating_sub(1));
            let date = start.checked_add_days(Days::new(offset)).ok_or_else(|| {
                PlanError::invalid_argument(format!(
                    "day {} falls outside the supported calendar range",
                    bucket.day
                ))
            })?;
            Ok(ScheduledDay {
                day: bucket.day,
                date,
                topics: bucket.topics,
                planned_hours: bucket.planned_hours,
            })
        })
        .collect()
}

/// Parse a strict `YYYY-MM-DD` date.
///
/// Rejects anything that is not exactly four year digits, two month digits
/// and two day digits separated by `-`, and any triple that is not a real
/// date (month 13, February 30, ...).
pub fn parse_start_date(text: &str) -> Result<NaiveDate, PlanError> {
    let bytes = text.as_bytes();
    let well_shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !well_shaped {
        return Err(invalid_date());
    }

    // All components are ASCII digits at this point.
    let year: i32 = text[0..4].parse().map_err(|_| invalid_date())?;
    let month: u32 = text[5..7].parse().map_err(|_| invalid_date())?;
    let day: u32 = text[8..10].parse().map_err(|_| invalid_date())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid_date)
}

fn invalid_date() -> PlanError {
    PlanError::invalid_argument("invalid date format, expected YYYY-MM-DD")
}

/// The current civil date in `tz`.
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Serialize dates as `YYYY-MM-DD`; deserialize with the same strict parser
/// used for request input.
mod iso_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_start_date(&text).map_err(serde::de::Error::custom)
    }
}
