//! Topic allocation: partition an ordered topic list into day buckets.
//!
//! Two regimes, picked by comparing topic count `T` to day count `D`:
//!
//! ```text
//! T >= D   balanced    D contiguous slices; the first T % D buckets get
//!                      one extra topic; every bucket spends hours_per_day
//! T <  D   undersupply one topic per day for days 1..=T, then the
//!                      remaining days follow the FillPolicy
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PlanError;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What to do with the days left over when there are fewer topics than days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillPolicy {
    /// Leftover days are free/review days: no topics, zero hours.
    #[default]
    PadWithEmptyDays,
    /// Leftover days repeat the topic list from the start.
    CycleTopics,
}

impl fmt::Display for FillPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::PadWithEmptyDays => "pad_with_empty_days",
            Self::CycleTopics => "cycle_topics",
        };
        f.write_str(s)
    }
}

impl FromStr for FillPolicy {
    type Err = FillPolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pad_with_empty_days" => Ok(Self::PadWithEmptyDays),
            "cycle_topics" => Ok(Self::CycleTopics),
            other => Err(FillPolicyParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`FillPolicy`] string.
#[derive(Debug, Clone)]
pub struct FillPolicyParseError(pub String);

impl fmt::Display for FillPolicyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid fill policy: {:?} (expected pad_with_empty_days or cycle_topics)",
            self.0
        )
    }
}

impl std::error::Error for FillPolicyParseError {}

/// Which branch of the allocation algorithm applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// At least as many topics as days.
    Balanced,
    /// Fewer topics than days.
    Undersupplied,
}

impl Regime {
    pub fn of(topic_count: usize, days: usize) -> Self {
        if topic_count >= days {
            Self::Balanced
        } else {
            Self::Undersupplied
        }
    }
}

/// Topics and hours assigned to one day of the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBucket {
    /// 1-based day index.
    pub day: u32,
    pub topics: Vec<String>,
    pub planned_hours: u32,
}

impl DayBucket {
    /// A day with no scheduled topics.
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Allocation
// ---------------------------------------------------------------------------

/// Partition `topics` into exactly `days` buckets.
///
/// Fails only when `days` or `hours_per_day` is zero. The topic count never
/// causes an error; an empty slice yields `days` empty buckets whose hours
/// depend on `policy`.
pub fn allocate(
    topics: &[String],
    days: u32,
    hours_per_day: u32,
    policy: FillPolicy,
) -> Result<Vec<DayBucket>, PlanError> {
    validate_counts(days, hours_per_day)?;

    let day_count = days as usize;
    let regime = Regime::of(topics.len(), day_count);
    debug!(
        topics = topics.len(),
        days,
        hours_per_day,
        ?regime,
        %policy,
        "allocating topics"
    );

    let buckets = match regime {
        Regime::Balanced => balanced(topics, day_count, hours_per_day),
        Regime::Undersupplied => undersupplied(topics, day_count, hours_per_day, policy),
    };

    Ok(buckets)
}

/// Reject zero day counts and zero hour budgets.
pub fn validate_counts(days: u32, hours_per_day: u32) -> Result<(), PlanError> {
    if days == 0 {
        return Err(PlanError::invalid_argument("days must be positive"));
    }
    if hours_per_day == 0 {
        return Err(PlanError::invalid_argument("hours per day must be positive"));
    }
    Ok(())
}

/// Split into `days` contiguous slices whose sizes differ by at most one.
fn balanced(topics: &[String], days: usize, hours_per_day: u32) -> Vec<DayBucket> {
    let base = topics.len() / days;
    let extra = topics.len() % days;

    let mut buckets = Vec::with_capacity(days);
    let mut start = 0;
    for i in 0..days {
        let size = if i < extra { base + 1 } else { base };
        let end = start + size;
        buckets.push(DayBucket {
            day: day_number(i),
            topics: topics[start..end].to_vec(),
            planned_hours: hours_per_day,
        });
        start = end;
    }
    buckets
}

/// One topic per day, then fill the rest according to `policy`.
fn undersupplied(
    topics: &[String],
    days: usize,
    hours_per_day: u32,
    policy: FillPolicy,
) -> Vec<DayBucket> {
    (0..days)
        .map(|i| {
            let (day_topics, planned_hours) = match topics.get(i) {
                Some(topic) => (vec![topic.clone()], hours_per_day),
                None => match policy {
                    FillPolicy::PadWithEmptyDays => (Vec::new(), 0),
                    FillPolicy::CycleTopics if topics.is_empty() => (Vec::new(), hours_per_day),
                    FillPolicy::CycleTopics => {
                        (vec![topics[i % topics.len()].clone()], hours_per_day)
                    }
                },
            };
            DayBucket {
                day: day_number(i),
                topics: day_topics,
                planned_hours,
            }
        })
        .collect()
}

/// 0-based position to 1-based day index. `days` is a `u32`, so every
/// position below it fits.
fn day_number(position: usize) -> u32 {
    position as u32 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topics(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sizes(buckets: &[DayBucket]) -> Vec<usize> {
        buckets.iter().map(|b| b.topics.len()).collect()
    }

    #[test]
    fn rejects_zero_days() {
        let err = allocate(&topics(&["a"]), 0, 2, FillPolicy::default()).unwrap_err();
        assert_eq!(err, PlanError::invalid_argument("days must be positive"));
    }

    #[test]
    fn rejects_zero_hours() {
        let err = allocate(&topics(&["a"]), 3, 0, FillPolicy::default()).unwrap_err();
        assert!(
            matches!(err, PlanError::InvalidArgument(ref m) if m.contains("hours per day")),
            "expected InvalidArgument, got: {err:?}"
        );
    }

    #[test]
    fn days_checked_before_hours() {
        let err = allocate(&[], 0, 0, FillPolicy::default()).unwrap_err();
        assert_eq!(err, PlanError::invalid_argument("days must be positive"));
    }

    #[test]
    fn remainder_goes_to_leading_buckets() {
        let buckets = allocate(
            &topics(&["a", "b", "c", "d", "e", "f", "g"]),
            3,
            1,
            FillPolicy::default(),
        )
        .unwrap();
        assert_eq!(sizes(&buckets), vec![3, 2, 2]);
        assert_eq!(buckets[0].topics, topics(&["a", "b", "c"]));
        assert_eq!(buckets[2].topics, topics(&["f", "g"]));
    }

    #[test]
    fn exact_division_is_even() {
        let buckets = allocate(
            &topics(&["a", "b", "c", "d", "e", "f"]),
            3,
            4,
            FillPolicy::default(),
        )
        .unwrap();
        assert_eq!(sizes(&buckets), vec![2, 2, 2]);
        assert!(buckets.iter().all(|b| b.planned_hours == 4));
    }

    #[test]
    fn equal_counts_give_one_topic_per_day() {
        let buckets = allocate(&topics(&["a", "b", "c"]), 3, 2, FillPolicy::CycleTopics).unwrap();
        assert_eq!(sizes(&buckets), vec![1, 1, 1]);
    }

    #[test]
    fn single_day_collapses_everything() {
        let all = topics(&["a", "b", "c", "d"]);
        let buckets = allocate(&all, 1, 3, FillPolicy::default()).unwrap();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].day, 1);
        assert_eq!(buckets[0].topics, all);
        assert_eq!(buckets[0].planned_hours, 3);
    }

    #[test]
    fn padding_leaves_free_days() {
        let buckets = allocate(&topics(&["a", "b"]), 4, 2, FillPolicy::PadWithEmptyDays).unwrap();
        assert_eq!(sizes(&buckets), vec![1, 1, 0, 0]);
        let hours: Vec<u32> = buckets.iter().map(|b| b.planned_hours).collect();
        assert_eq!(hours, vec![2, 2, 0, 0]);
        assert!(buckets[3].is_empty());
    }

    #[test]
    fn cycling_repeats_from_the_start() {
        let buckets = allocate(&topics(&["a", "b"]), 5, 1, FillPolicy::CycleTopics).unwrap();
        let firsts: Vec<&str> = buckets.iter().map(|b| b.topics[0].as_str()).collect();
        assert_eq!(firsts, vec!["a", "b", "a", "b", "a"]);
        assert!(buckets.iter().all(|b| b.planned_hours == 1));
    }

    #[test]
    fn no_topics_padded() {
        let buckets = allocate(&[], 3, 2, FillPolicy::PadWithEmptyDays).unwrap();
        assert_eq!(buckets.len(), 3);
        assert!(buckets.iter().all(|b| b.is_empty() && b.planned_hours == 0));
    }

    #[test]
    fn no_topics_cycled_keeps_budget() {
        let buckets = allocate(&[], 3, 2, FillPolicy::CycleTopics).unwrap();
        assert!(buckets.iter().all(|b| b.is_empty() && b.planned_hours == 2));
    }

    #[test]
    fn day_indices_are_contiguous() {
        for days in 1..=7u32 {
            let buckets = allocate(&topics(&["a", "b", "c"]), days, 1, FillPolicy::default()).unwrap();
            let indices: Vec<u32> = buckets.iter().map(|b| b.day).collect();
            assert_eq!(indices, (1..=days).collect::<Vec<_>>());
        }
    }

    #[test]
    fn regime_boundary() {
        assert_eq!(Regime::of(3, 3), Regime::Balanced);
        assert_eq!(Regime::of(2, 3), Regime::Undersupplied);
        assert_eq!(Regime::of(0, 1), Regime::Undersupplied);
    }

    #[test]
    fn fill_policy_parse_and_display() {
        for policy in [FillPolicy::PadWithEmptyDays, FillPolicy::CycleTopics] {
            let parsed: FillPolicy = policy.to_string().parse().unwrap();
            assert_eq!(parsed, policy);
        }
        let err = "repeat".parse::<FillPolicy>().unwrap_err();
        assert!(err.to_string().contains("\"repeat\""));
    }

    #[test]
    fn fill_policy_defaults_to_padding() {
        assert_eq!(FillPolicy::default(), FillPolicy::PadWithEmptyDays);
    }
}
