use serde::{Deserialize, Serialize};

use crate::catalog::{Criterion, Direction};
use crate::error::{RankingError, RankingResult};

#[cfg(test)]
#[path = "sort_tests.rs"]
mod sort_tests;

/// One link of the sort precedence chain: a criterion with its active
/// direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortEntry {
    /// The criterion being ordered by.
    pub criterion: Criterion,
    /// The active direction of the criterion.
    pub direction: Direction,
}

impl SortEntry {
    /// Display label of the active direction.
    pub fn label(&self) -> &'static str {
        self.criterion.label(self.direction)
    }
}

/// The full, deterministic sort precedence chain over ideas.
///
/// Invariant: exactly one entry per catalog criterion, so the length is
/// fixed at the catalog size. Only [`SortOrder::reorder`] mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortOrder(Vec<SortEntry>);

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder(
            Criterion::ALL
                .into_iter()
                .map(|criterion| SortEntry {
                    criterion,
                    direction: criterion.default_direction(),
                })
                .collect(),
        )
    }
}

impl SortOrder {
    /// The entries in precedence order.
    pub fn entries(&self) -> &[SortEntry] {
        &self.0
    }

    /// Whether this order covers every catalog criterion exactly once with
    /// a direction belonging to that criterion.
    pub fn is_valid(&self) -> bool {
        self.0.len() == Criterion::ALL.len()
            && Criterion::ALL.iter().all(|criterion| {
                self.0
                    .iter()
                    .filter(|entry| entry.criterion == *criterion)
                    .count()
                    == 1
            })
            && self
                .0
                .iter()
                .all(|entry| entry.criterion.has_direction(entry.direction))
    }

    /// Apply a reorder action for `key`.
    ///
    /// If the criterion sits at an index greater than zero it is moved to
    /// the front, preserving the relative order of the rest. If it already
    /// leads, its direction flips instead. Unknown keys fail with
    /// [`RankingError::UnknownCriterion`].
    pub fn reorder(&mut self, key: &str) -> RankingResult<()> {
        let criterion: Criterion = key.parse().map_err(|_| RankingError::UnknownCriterion {
            key: key.to_string(),
        })?;

        match self.0.iter().position(|entry| entry.criterion == criterion) {
            Some(0) => {
                let entry = &mut self.0[0];
                entry.direction = entry.criterion.toggled(entry.direction);
            }
            Some(i) => {
                let entry = self.0.remove(i);
                self.0.insert(0, entry);
            }
            None => {
                // Valid orders contain every criterion; a missing entry can
                // only come from corrupt state and is repaired by
                // reinsertion at the front.
                self.0.insert(
                    0,
                    SortEntry {
                        criterion,
                        direction: criterion.default_direction(),
                    },
                );
            }
        }

        Ok(())
    }

    /// The combined SQL ordering clause: each entry's expression in
    /// precedence order, with a final `id` tie-break so the total order over
    /// ideas is fully deterministic.
    pub fn order_clause(&self) -> String {
        let mut parts: Vec<&str> = self
            .0
            .iter()
            .map(|entry| entry.criterion.order_expr(entry.direction))
            .collect();
        parts.push("id ASC");
        parts.join(", ")
    }
}
