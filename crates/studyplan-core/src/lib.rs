//! Study-plan allocation engine.
//!
//! Turns an ordered list of topics, a day count and a daily hour budget into
//! a day-by-day schedule pinned to calendar dates. Everything here is pure
//! and synchronous; the only clock access is [`calendar::today_in`], which
//! callers use to resolve a missing start date.

pub mod allocate;
pub mod calendar;
pub mod error;
pub mod request;
pub mod schedule;
pub mod topics;

pub use allocate::{DayBucket, FillPolicy, FillPolicyParseError, Regime, allocate};
pub use calendar::{ScheduledDay, parse_start_date, project, today_in};
pub use error::{ErrorKind, PlanError};
pub use request::{AllocationRequest, DEFAULT_HOURS_PER_DAY, MAX_DAYS, PlanRequest, ScheduleDefaults};
pub use schedule::{ScheduleSummary, generate_schedule};
pub use topics::{TopicsInput, split_delimited};
