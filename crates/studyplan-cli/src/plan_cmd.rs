//! CLI handler for `studyplan plan`: generate a schedule and print it.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde_json::Value;

use studyplan_core::{
    PlanRequest, ScheduleSummary, ScheduledDay, generate_schedule, today_in,
};

use crate::config::StudyplanConfig;

/// How `studyplan plan` prints the schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned human-readable table with a summary line.
    #[default]
    Table,
    /// The same JSON array the HTTP API returns.
    Json,
}

/// Topic and scheduling arguments collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct PlanArgs {
    /// Comma-delimited topics (`--topics "a, b"`).
    pub topics: Option<String>,
    /// Repeated `--topic` values, used as an explicit list.
    pub topic: Vec<String>,
    pub days: i64,
    pub hours_per_day: Option<i64>,
    pub start_date: Option<String>,
    pub fill_policy: Option<studyplan_core::FillPolicy>,
}

impl PlanArgs {
    /// Build the same request shape the HTTP API accepts.
    pub fn into_request(self) -> PlanRequest {
        let topics = if !self.topic.is_empty() {
            Some(Value::Array(self.topic.into_iter().map(Value::String).collect()))
        } else {
            self.topics.map(Value::String)
        };
        PlanRequest {
            topics,
            days: Some(self.days),
            hours_per_day: self.hours_per_day,
            start_date: self.start_date,
            fill_policy: self.fill_policy,
        }
    }
}

// -----------------------------------------------------------------------
// Entry point
// -----------------------------------------------------------------------

pub fn run_plan(config: &StudyplanConfig, args: PlanArgs, format: OutputFormat) -> Result<()> {
    let request = args
        .into_request()
        .validate(&config.defaults)
        .context("invalid plan request")?;
    let schedule = generate_schedule(&request, today_in(config.timezone))
        .context("failed to generate schedule")?;

    tracing::debug!(days = schedule.len(), ?format, "printing schedule");

    let output = match format {
        OutputFormat::Table => render_table(&schedule),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&schedule).context("failed to serialize schedule")?
        }
    };
    println!("{output}");
    Ok(())
}

// -----------------------------------------------------------------------
// Rendering
// -----------------------------------------------------------------------

/// Render the schedule as an aligned table followed by a summary line.
pub fn render_table(schedule: &[ScheduledDay]) -> String {
    // Date is always 10 chars (YYYY-MM-DD).
    let day_w = schedule
        .iter()
        .map(|d| d.day.to_string().len())
        .max()
        .unwrap_or(3)
        .max(3);
    let date_w = 10;
    let hours_w = 5;

    let mut out = String::new();
    out.push_str(&format!(
        "{:<day_w$}  {:<date_w$}  {:>hours_w$}  TOPICS\n",
        "DAY", "DATE", "HOURS"
    ));
    out.push_str(&format!(
        "{}  {}  {}  {}\n",
        "-".repeat(day_w),
        "-".repeat(date_w),
        "-".repeat(hours_w),
        "-".repeat(6)
    ));

    for day in schedule {
        let topics = if day.topics.is_empty() {
            "(free)".to_string()
        } else {
            day.topics.join(", ")
        };
        out.push_str(&format!(
            "{:<day_w$}  {:<date_w$}  {:>hours_w$}  {}\n",
            day.day,
            day.date.format("%Y-%m-%d").to_string(),
            day.planned_hours,
            topics
        ));
    }

    let summary = ScheduleSummary::of(schedule);
    out.push('\n');
    out.push_str(&format!(
        "{} days ({} with topics), {} planned hours",
        summary.days, summary.study_days, summary.total_hours
    ));
    if let (Some(first), Some(last)) = (summary.first_date, summary.last_date) {
        out.push_str(&format!(", {first} to {last}"));
    }
    out
}
