//! Idea listing and lifecycle operations.
//!
//! Listing resolves the caller's per-session ranking state, applies any
//! requested reorder or filter change exactly once, persists the result,
//! and fetches one page of published ideas ordered by the combined
//! criterion chain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::ListingConfig;
use crate::error::{AppResult, StorageError};
use crate::ranking::{FilterOption, SortOrder};
use crate::storage::{Idea, IdeaChanges, NewIdea, SqliteStorage, Storage, VoteTally};

#[cfg(test)]
#[path = "service_tests.rs"]
mod service_tests;

/// Input parameters for the listing operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingParams {
    /// Session identity; a fresh one is generated when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Criterion key to move to the front (or toggle if already first).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reorder: Option<String>,
    /// Filter key to select.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Zero-based page number.
    #[serde(default)]
    pub page: u32,
}

/// One page of ranked ideas plus the session state that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct ListingResult {
    /// Session identity the state was persisted under.
    pub session_id: String,
    /// Zero-based page number.
    pub page: u32,
    /// The sort precedence chain after any reorder.
    pub sort_order: SortOrder,
    /// Label of the leading sort entry.
    pub sort_label: String,
    /// The active filter after any change.
    pub filter: FilterOption,
    /// Label of the active filter.
    pub filter_label: String,
    /// The page of ideas.
    pub ideas: Vec<Idea>,
}

/// One idea with its vote counts.
#[derive(Debug, Clone, Serialize)]
pub struct IdeaDetail {
    /// The idea.
    pub idea: Idea,
    /// Supporting votes.
    pub support_count: i64,
    /// Opposing votes.
    pub oppose_count: i64,
    /// Total counted votes.
    pub vote_count: i64,
}

/// Idea listing and lifecycle service.
#[derive(Clone)]
pub struct IdeaService {
    storage: SqliteStorage,
    listing: ListingConfig,
}

impl IdeaService {
    /// Create a new idea service
    pub fn new(storage: SqliteStorage, listing: ListingConfig) -> Self {
        Self { storage, listing }
    }

    /// List one page of published ideas under the session's ranking state.
    ///
    /// Reorder and filter actions are taken out of the request before they
    /// are applied, so each is applied at most once per request. Unknown
    /// keys fail the request and leave the persisted state untouched.
    pub async fn list(&self, mut params: ListingParams) -> AppResult<ListingResult> {
        let session_id = params
            .session_id
            .take()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut state = self
            .storage
            .get_session_state(&session_id)
            .await?
            .unwrap_or_default();

        let mut changed = false;
        if let Some(key) = params.reorder.take() {
            state.reorder(&key)?;
            changed = true;
        }
        if let Some(key) = params.filter.take() {
            state.set_filter(&key)?;
            changed = true;
        }
        if changed {
            self.storage.put_session_state(&session_id, &state).await?;
        }

        let order_clause = state.sort_order.order_clause();
        let offset = params.page.saturating_mul(self.listing.page_size);
        let ideas = self
            .storage
            .list_published(
                state.filter.state_predicate(),
                &order_clause,
                self.listing.page_size,
                offset,
            )
            .await?;

        debug!(
            session_id = %session_id,
            filter = %state.filter,
            page = params.page,
            ideas = ideas.len(),
            "Idea list resolved"
        );

        let leading = state.sort_order.entries()[0];
        Ok(ListingResult {
            session_id,
            page: params.page,
            sort_label: leading.label().to_string(),
            filter_label: state.filter.label().to_string(),
            sort_order: state.sort_order,
            filter: state.filter,
            ideas,
        })
    }

    /// Fetch one idea with its vote counts.
    pub async fn show(&self, id: i64) -> AppResult<IdeaDetail> {
        let idea = self
            .storage
            .get_idea(id)
            .await?
            .ok_or(StorageError::IdeaNotFound { idea_id: id })?;
        let tally: VoteTally = self.storage.vote_tally(id).await?;

        Ok(IdeaDetail {
            idea,
            support_count: tally.support,
            oppose_count: tally.oppose,
            vote_count: tally.total(),
        })
    }

    /// Create a new idea. State is always `idea` regardless of input.
    pub async fn create(&self, new: NewIdea) -> AppResult<Idea> {
        let idea = self.storage.create_idea(&new).await?;
        info!(idea_id = idea.id, title = %idea.title, "Idea created");
        Ok(idea)
    }

    /// Apply partial changes to an idea.
    pub async fn update(&self, id: i64, changes: IdeaChanges) -> AppResult<Idea> {
        let idea = self.storage.update_idea(id, &changes).await?;
        info!(idea_id = idea.id, title = %idea.title, "Idea updated");
        Ok(idea)
    }

    /// Record a vote on an idea and refresh its ranking aggregates.
    pub async fn record_vote(
        &self,
        idea_id: i64,
        voter: &str,
        option: i64,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        self.storage.record_vote(idea_id, voter, option, at).await?;
        debug!(idea_id, option, "Vote recorded");
        Ok(())
    }
}
