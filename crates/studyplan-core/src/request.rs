//! Schedule requests: the raw wire shape and its validated form.
//!
//! [`PlanRequest`] is what a boundary layer receives (JSON body, CLI flags).
//! [`PlanRequest::validate`] turns it into an [`AllocationRequest`] or a
//! [`PlanError`], checking everything up front so no schedule is ever
//! partially produced. Checks run in this order:
//! 1. `topics` present and non-blank (`EmptyInput`).
//! 2. `topics` is a string or list of strings (`InvalidArgument`).
//! 3. `topics` has at least one entry after normalization (`EmptyInput`).
//! 4. `days` positive and within [`MAX_DAYS`] (`InvalidArgument`).
//! 5. `hours_per_day` positive (`InvalidArgument`).
//! 6. `start_date` is strict `YYYY-MM-DD` (`InvalidArgument`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::allocate::{FillPolicy, validate_counts};
use crate::calendar::parse_start_date;
use crate::error::PlanError;
use crate::topics::TopicsInput;

/// Hours per day used when a request omits the field and no other default
/// is configured.
pub const DEFAULT_HOURS_PER_DAY: u32 = 2;

/// Upper bound on the number of days in one schedule (ten years).
pub const MAX_DAYS: u32 = 3650;

/// Defaults applied to fields a request leaves out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDefaults {
    pub hours_per_day: u32,
    pub fill_policy: FillPolicy,
}

impl Default for ScheduleDefaults {
    fn default() -> Self {
        Self {
            hours_per_day: DEFAULT_HOURS_PER_DAY,
            fill_policy: FillPolicy::default(),
        }
    }
}

/// Unvalidated schedule request as received from a caller.
///
/// Numeric fields are signed so negative input can be reported instead of
/// failing deserialization with an opaque error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    #[serde(default)]
    pub topics: Option<Value>,
    #[serde(default)]
    pub days: Option<i64>,
    #[serde(default, alias = "hoursPerDay")]
    pub hours_per_day: Option<i64>,
    #[serde(default, alias = "startDate")]
    pub start_date: Option<String>,
    #[serde(default, alias = "fillPolicy")]
    pub fill_policy: Option<FillPolicy>,
}

impl PlanRequest {
    /// Deserialize a request from an arbitrary JSON value, reporting shape
    /// problems as `InvalidArgument`.
    pub fn from_json(value: Value) -> Result<Self, PlanError> {
        if !value.is_object() {
            return Err(PlanError::invalid_argument("request body must be a JSON object"));
        }
        serde_json::from_value(value)
            .map_err(|e| PlanError::invalid_argument(format!("malformed request: {e}")))
    }

    /// Validate every field, filling omitted ones from `defaults`.
    pub fn validate(self, defaults: &ScheduleDefaults) -> Result<AllocationRequest, PlanError> {
        let raw_topics = match self.topics {
            None | Some(Value::Null) => return Err(topics_required()),
            Some(value) => TopicsInput::try_from(value)?,
        };
        if raw_topics.is_blank() {
            return Err(topics_required());
        }
        let topics = raw_topics.normalize();
        if topics.is_empty() {
            return Err(PlanError::empty_input(
                "'topics' contains no entries after trimming",
            ));
        }

        let days = positive(self.days.unwrap_or(0), "days must be positive")?;
        if days > MAX_DAYS {
            return Err(PlanError::invalid_argument(format!(
                "days must be at most {MAX_DAYS}"
            )));
        }

        let hours_per_day = match self.hours_per_day {
            Some(hours) => positive(hours, "hours per day must be positive")?,
            None => defaults.hours_per_day,
        };
        validate_counts(days, hours_per_day)?;

        let start_date = self
            .start_date
            .as_deref()
            .map(parse_start_date)
            .transpose()?;

        Ok(AllocationRequest {
            topics,
            days,
            hours_per_day,
            start_date,
            fill_policy: self.fill_policy.unwrap_or(defaults.fill_policy),
        })
    }
}

fn topics_required() -> PlanError {
    PlanError::empty_input("'topics' is required")
}

/// Convert a signed count into a positive `u32`, never clamping.
fn positive(value: i64, msg: &str) -> Result<u32, PlanError> {
    match u32::try_from(value) {
        Ok(n) if n > 0 => Ok(n),
        Ok(_) => Err(PlanError::invalid_argument(msg)),
        // Values beyond u32 are positive but still unusable as a count.
        Err(_) if value > 0 => Err(PlanError::invalid_argument(format!(
            "{value} is too large"
        ))),
        Err(_) => Err(PlanError::invalid_argument(msg)),
    }
}

/// A fully validated schedule request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationRequest {
    pub topics: Vec<String>,
    pub days: u32,
    pub hours_per_day: u32,
    /// `None` means "today" in the caller's configured zone.
    pub start_date: Option<NaiveDate>,
    pub fill_policy: FillPolicy,
}
