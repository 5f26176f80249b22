//! Vote-flow analytics: weekly bucketing and engagement ranking.
//!
//! The aggregation itself is a pure function over an (ideas, votes)
//! snapshot; this module adds the service that pulls the snapshot from
//! storage. The two repository fetches are not transactional, small skew
//! between them is acceptable for analytics.

mod engine;

pub use engine::*;

use std::time::Instant;

use tracing::info;

use crate::error::AppResult;
use crate::storage::{SqliteStorage, Storage, VoteRecord};

/// Produces the weekly vote-flow payload from stored ideas and votes.
#[derive(Clone)]
pub struct VoteFlowService {
    storage: SqliteStorage,
}

impl VoteFlowService {
    /// Create a new vote-flow service
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }

    /// Scan every idea and its votes and build the vote-flow payload.
    pub async fn vote_flow(&self) -> AppResult<VoteFlow> {
        let start = Instant::now();

        let ideas = self.storage.all_ideas().await?;

        let mut votes: Vec<Vec<VoteRecord>> = Vec::with_capacity(ideas.len());
        for idea in &ideas {
            votes.push(self.storage.votes_for_idea(idea.id).await?);
        }

        let snapshot = ideas
            .iter()
            .zip(votes.iter())
            .map(|(idea, votes)| (idea, votes.as_slice()));
        let flow = aggregate(snapshot);

        info!(
            ideas = ideas.len(),
            voted_ideas = flow.ideas.len(),
            weeks = flow.flow.len(),
            latency_ms = start.elapsed().as_millis() as i64,
            "Vote flow aggregated"
        );

        Ok(flow)
    }
}
