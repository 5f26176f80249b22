//! Per-session ranking state: sort-order rotation and filter selection.
//!
//! Both pieces of state are explicit values passed into and returned from
//! each operation; persistence between requests is the storage layer's
//! concern. Concurrent writes from the same session are last-write-wins.

mod filter;
mod sort;

pub use filter::*;
pub use sort::*;

use serde::{Deserialize, Serialize};

use crate::error::RankingResult;

/// Listing state persisted per session: the sort precedence chain and the
/// active filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionState {
    /// Full sort precedence chain.
    pub sort_order: SortOrder,
    /// Active listing filter.
    pub filter: FilterOption,
}

impl SessionState {
    /// Move the named criterion to the front of the sort order, or toggle
    /// its direction if it already leads. Fails on unknown keys.
    pub fn reorder(&mut self, key: &str) -> RankingResult<()> {
        self.sort_order.reorder(key)
    }

    /// Select the named filter. Fails on unknown keys.
    pub fn set_filter(&mut self, key: &str) -> RankingResult<FilterOption> {
        self.filter = parse_filter(key)?;
        Ok(self.filter)
    }

    /// Whether the sort order still covers the whole catalog with valid
    /// directions. Deserialized state that fails this check is discarded.
    pub fn is_valid(&self) -> bool {
        self.sort_order.is_valid()
    }
}
