//! Storage layer for ideas, votes, and per-session listing state.
//!
//! This module plays three collaborator roles behind one trait: the idea
//! repository, the vote repository, and the session state store that keeps
//! each caller's sort order and filter between requests.

mod sqlite;

pub use sqlite::SqliteStorage;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageResult;
use crate::ranking::SessionState;

/// Lifecycle state of an idea.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdeaState {
    /// Freshly submitted idea.
    #[default]
    Idea,
    /// Draft being worked into a proposal.
    Draft,
    /// Formal proposal.
    Proposal,
    /// Enacted law.
    Law,
}

impl std::fmt::Display for IdeaState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdeaState::Idea => write!(f, "idea"),
            IdeaState::Draft => write!(f, "draft"),
            IdeaState::Proposal => write!(f, "proposal"),
            IdeaState::Law => write!(f, "law"),
        }
    }
}

impl std::str::FromStr for IdeaState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idea" => Ok(IdeaState::Idea),
            "draft" => Ok(IdeaState::Draft),
            "proposal" => Ok(IdeaState::Proposal),
            "law" => Ok(IdeaState::Law),
            _ => Err(format!("Unknown idea state: {}", s)),
        }
    }
}

/// A citizen idea with its ranking aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Idea {
    /// Row id.
    pub id: i64,
    /// Idea title.
    pub title: String,
    /// Idea body text.
    pub body: String,
    /// Author identifier.
    pub author: String,
    /// Lifecycle state.
    pub state: IdeaState,
    /// Whether the idea appears in public listings.
    pub published: bool,
    /// When the idea was created.
    pub created_at: DateTime<Utc>,
    /// Comment count aggregate.
    pub comment_count: i64,
    /// Total vote count aggregate.
    pub vote_count: i64,
    /// Fraction of supporting votes, 0.0 when unvoted.
    pub vote_proportion: f64,
    /// Distance of the support fraction from 0.5, 0.5 when unvoted.
    pub vote_proportion_away_mid: f64,
}

/// Fields for creating a new idea. State is always forced to `idea`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIdea {
    /// Idea title.
    pub title: String,
    /// Idea body text.
    #[serde(default)]
    pub body: String,
    /// Author identifier.
    #[serde(default)]
    pub author: String,
}

/// Partial update of an idea; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdeaChanges {
    /// New title, if any.
    pub title: Option<String>,
    /// New body, if any.
    pub body: Option<String>,
    /// New lifecycle state, if any.
    pub state: Option<IdeaState>,
}

/// A single stored vote.
///
/// The timestamp is carried as the raw stored string so the aggregation
/// engine can observe and skip malformed values instead of the read path
/// failing wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VoteRecord {
    /// Idea the vote belongs to.
    pub idea_id: i64,
    /// Vote option: 0 = oppose, 1 = support.
    pub option: i64,
    /// RFC 3339 timestamp as stored.
    pub updated_at: String,
}

/// Support/oppose counts for one idea.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct VoteTally {
    /// Votes with option 1.
    pub support: i64,
    /// Votes with option 0.
    pub oppose: i64,
}

impl VoteTally {
    /// Total counted votes.
    pub fn total(&self) -> i64 {
        self.support + self.oppose
    }
}

/// Persistence operations used by the listing and analytics services.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Insert a new idea in state `idea` and return it.
    async fn create_idea(&self, new: &NewIdea) -> StorageResult<Idea>;

    /// Fetch one idea by id.
    async fn get_idea(&self, id: i64) -> StorageResult<Option<Idea>>;

    /// Apply partial changes to an idea and return the updated row.
    async fn update_idea(&self, id: i64, changes: &IdeaChanges) -> StorageResult<Idea>;

    /// Fetch one page of published ideas, optionally restricted to a state,
    /// ordered by a catalog-built ordering clause.
    async fn list_published(
        &self,
        state: Option<IdeaState>,
        order_clause: &str,
        limit: u32,
        offset: u32,
    ) -> StorageResult<Vec<Idea>>;

    /// Fetch every idea, ascending by id.
    async fn all_ideas(&self) -> StorageResult<Vec<Idea>>;

    /// Record a vote and refresh the idea's ranking aggregates.
    async fn record_vote(
        &self,
        idea_id: i64,
        voter: &str,
        option: i64,
        at: DateTime<Utc>,
    ) -> StorageResult<()>;

    /// Fetch all votes for one idea.
    async fn votes_for_idea(&self, idea_id: i64) -> StorageResult<Vec<VoteRecord>>;

    /// Support/oppose counts for one idea.
    async fn vote_tally(&self, idea_id: i64) -> StorageResult<VoteTally>;

    /// Load the persisted listing state for a session, if any.
    async fn get_session_state(&self, session_id: &str) -> StorageResult<Option<SessionState>>;

    /// Persist the listing state for a session (last write wins).
    async fn put_session_state(
        &self,
        session_id: &str,
        state: &SessionState,
    ) -> StorageResult<()>;
}
