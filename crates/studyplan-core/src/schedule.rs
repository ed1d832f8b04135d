//! End-to-end schedule generation: allocate, then project onto dates.

use chrono::NaiveDate;
use tracing::debug;

use crate::allocate::allocate;
use crate::calendar::{ScheduledDay, project};
use crate::error::PlanError;
use crate::request::AllocationRequest;

/// Build the dated schedule for a validated request.
///
/// `today` is used only when the request carries no start date, which keeps
/// this function free of any clock.
pub fn generate_schedule(
    request: &AllocationRequest,
    today: NaiveDate,
) -> Result<Vec<ScheduledDay>, PlanError> {
    let start = request.start_date.unwrap_or(today);
    let buckets = allocate(
        &request.topics,
        request.days,
        request.hours_per_day,
        request.fill_policy,
    )?;
    let schedule = project(buckets, start)?;
    debug!(days = schedule.len(), %start, "schedule generated");
    Ok(schedule)
}

/// Aggregate figures for a generated schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSummary {
    pub days: usize,
    /// Days with at least one topic.
    pub study_days: usize,
    pub total_hours: u64,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl ScheduleSummary {
    pub fn of(schedule: &[ScheduledDay]) -> Self {
        Self {
            days: schedule.len(),
            study_days: schedule.iter().filter(|d| !d.topics.is_empty()).count(),
            total_hours: schedule.iter().map(|d| u64::from(d.planned_hours)).sum(),
            first_date: schedule.first().map(|d| d.date),
            last_date: schedule.last().map(|d| d.date),
        }
    }
}
