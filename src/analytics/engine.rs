use std::collections::BTreeMap;

use chrono::{DateTime, Weekday};
use serde::Serialize;
use tracing::warn;

use crate::storage::{Idea, VoteRecord};

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;

/// How many of the most-voted ideas appear in the time series.
pub const TOP_IDEAS: usize = 10;

/// One calendar week of the vote time series.
///
/// Field names are the compact wire names the charting consumer expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekBucket {
    /// Week-start instant as epoch seconds.
    #[serde(rename = "d")]
    pub week_start: i64,
    /// `[idea_id, votes in this week]` pairs, descending by count. Only
    /// ideas from the top-[`TOP_IDEAS`] inclusion set appear.
    #[serde(rename = "i")]
    pub entries: Vec<(i64, u64)>,
}

/// Per-idea engagement counts for the summary map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngagementSummary {
    /// Approving votes (option 1).
    #[serde(rename = "a")]
    pub approve: u64,
    /// Disapproving votes (option 0).
    #[serde(rename = "d")]
    pub disapprove: u64,
    /// All votes regardless of option.
    #[serde(rename = "c")]
    pub total: u64,
    /// Always 0. The charting consumer requires the field to exist.
    #[serde(rename = "u")]
    pub unused: u64,
    /// Idea title truncated to its first 20 characters.
    #[serde(rename = "n")]
    pub title: String,
}

impl EngagementSummary {
    fn new(title: &str) -> Self {
        Self {
            approve: 0,
            disapprove: 0,
            total: 0,
            unused: 0,
            title: title.chars().take(20).collect(),
        }
    }
}

/// Full aggregation output: the weekly time series and the per-idea summary
/// map. The summary covers every voted idea; the time series only the
/// top-[`TOP_IDEAS`] inclusion set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VoteFlow {
    /// Week buckets, ascending by week start.
    pub flow: Vec<WeekBucket>,
    /// Idea id to engagement summary. Integer keys serialize as JSON object
    /// keys.
    pub ideas: BTreeMap<i64, EngagementSummary>,
}

/// Aggregate a snapshot of ideas and their votes into the weekly vote flow.
///
/// Single bounded pass over every vote: counts accumulate keyed by
/// (week, idea, option) and per idea, then ideas are ranked by total votes
/// descending (stable, ties keep iteration order) and the top
/// [`TOP_IDEAS`] form the time-series inclusion set.
///
/// A vote whose timestamp fails RFC 3339 parsing is skipped and logged; it
/// contributes to neither buckets nor the summary.
pub fn aggregate<'a, I>(snapshot: I) -> VoteFlow
where
    I: IntoIterator<Item = (&'a Idea, &'a [VoteRecord])>,
{
    // week start -> idea id -> [oppose, support] counts
    let mut buckets: BTreeMap<i64, BTreeMap<i64, [u64; 2]>> = BTreeMap::new();
    let mut summaries: BTreeMap<i64, EngagementSummary> = BTreeMap::new();
    // Idea ids in first-vote iteration order, the ranking tie-break.
    let mut seen: Vec<i64> = Vec::new();

    for (idea, votes) in snapshot {
        for vote in votes {
            let Some(week_start) = week_start_epoch(&vote.updated_at) else {
                warn!(
                    idea_id = idea.id,
                    updated_at = %vote.updated_at,
                    "Skipping vote with malformed timestamp"
                );
                continue;
            };

            let summary = summaries.entry(idea.id).or_insert_with(|| {
                seen.push(idea.id);
                EngagementSummary::new(&idea.title)
            });
            summary.total += 1;
            match vote.option {
                1 => summary.approve += 1,
                0 => summary.disapprove += 1,
                _ => {}
            }

            if vote.option == 0 || vote.option == 1 {
                let counts = buckets
                    .entry(week_start)
                    .or_default()
                    .entry(idea.id)
                    .or_insert([0, 0]);
                counts[vote.option as usize] += 1;
            }
        }
    }

    // Most popular first; sort_by is stable so equal totals keep the
    // iteration order of `seen`.
    let mut ranked = seen;
    ranked.sort_by(|a, b| summaries[b].total.cmp(&summaries[a].total));
    let inclusion: Vec<i64> = ranked.into_iter().take(TOP_IDEAS).collect();

    let flow = buckets
        .into_iter()
        .map(|(week_start, per_idea)| {
            let mut entries: Vec<(i64, u64)> = inclusion
                .iter()
                .filter_map(|idea_id| {
                    per_idea
                        .get(idea_id)
                        .map(|counts| (*idea_id, counts[0] + counts[1]))
                })
                .collect();
            entries.sort_by(|a, b| b.1.cmp(&a.1));
            WeekBucket {
                week_start,
                entries,
            }
        })
        .collect();

    VoteFlow {
        flow,
        ideas: summaries,
    }
}

/// Epoch seconds of the Monday 00:00 UTC starting the week containing the
/// given RFC 3339 timestamp, or `None` if the timestamp does not parse.
pub fn week_start_epoch(timestamp: &str) -> Option<i64> {
    let parsed = DateTime::parse_from_rfc3339(timestamp).ok()?;
    let week = parsed.to_utc().date_naive().week(Weekday::Mon);
    Some(week.first_day().and_hms_opt(0, 0, 0)?.and_utc().timestamp())
}
