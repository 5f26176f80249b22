use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{info, warn};

use super::{Idea, IdeaChanges, IdeaState, NewIdea, Storage, VoteRecord, VoteTally};
use crate::config::DatabaseConfig;
use crate::error::{StorageError, StorageResult};
use crate::ranking::SessionState;

/// Static migrator that embeds migrations at compile time
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const IDEA_COLUMNS: &str = "id, title, body, author, state, published, created_at, \
     comment_count, vote_count, vote_proportion, vote_proportion_away_mid";

/// SQLite-backed storage implementation
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    pub async fn new(config: &DatabaseConfig) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = config.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Connection {
                message: format!("Failed to create database directory: {}", e),
            })?;
        }

        let database_url = format!("sqlite://{}?mode=rwc", config.path.display());

        let options = SqliteConnectOptions::from_str(&database_url)
            .map_err(|e| StorageError::Connection {
                message: format!("Invalid database URL: {}", e),
            })?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Connection {
                message: format!("Failed to connect to database: {}", e),
            })?;

        let storage = Self { pool };
        storage.run_migrations().await?;

        Ok(storage)
    }

    /// Create an in-memory instance, for tests.
    ///
    /// A single connection keeps the in-memory database alive for the
    /// pool's lifetime.
    pub async fn new_in_memory() -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(|e| {
            StorageError::Connection {
                message: format!("Invalid database URL: {}", e),
            }
        })?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Connection {
                message: format!("Failed to connect to database: {}", e),
            })?;

        let storage = Self { pool };
        storage.run_migrations().await?;

        Ok(storage)
    }

    /// Run database migrations using embedded sqlx migrations
    async fn run_migrations(&self) -> StorageResult<()> {
        info!("Running database migrations...");

        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Migration {
                message: format!("Failed to run migrations: {}", e),
            })?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get the underlying pool for advanced queries
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn create_idea(&self, new: &NewIdea) -> StorageResult<Idea> {
        let result = sqlx::query(
            r#"
            INSERT INTO ideas (title, body, author, state, published, created_at)
            VALUES (?, ?, ?, ?, 1, ?)
            "#,
        )
        .bind(&new.title)
        .bind(&new.body)
        .bind(&new.author)
        .bind(IdeaState::Idea.to_string())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_idea(id)
            .await?
            .ok_or(StorageError::IdeaNotFound { idea_id: id })
    }

    async fn get_idea(&self, id: i64) -> StorageResult<Option<Idea>> {
        let row: Option<IdeaRow> =
            sqlx::query_as(&format!("SELECT {} FROM ideas WHERE id = ?", IDEA_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Idea::try_from).transpose()
    }

    async fn update_idea(&self, id: i64, changes: &IdeaChanges) -> StorageResult<Idea> {
        let existing = self
            .get_idea(id)
            .await?
            .ok_or(StorageError::IdeaNotFound { idea_id: id })?;

        let title = changes.title.as_deref().unwrap_or(&existing.title);
        let body = changes.body.as_deref().unwrap_or(&existing.body);
        let state = changes.state.unwrap_or(existing.state);

        sqlx::query("UPDATE ideas SET title = ?, body = ?, state = ? WHERE id = ?")
            .bind(title)
            .bind(body)
            .bind(state.to_string())
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.get_idea(id)
            .await?
            .ok_or(StorageError::IdeaNotFound { idea_id: id })
    }

    async fn list_published(
        &self,
        state: Option<IdeaState>,
        order_clause: &str,
        limit: u32,
        offset: u32,
    ) -> StorageResult<Vec<Idea>> {
        // The order clause is assembled from fixed catalog fragments, no
        // caller input reaches it.
        let sql = match state {
            Some(_) => format!(
                "SELECT {} FROM ideas WHERE published = 1 AND state = ? ORDER BY {} LIMIT ? OFFSET ?",
                IDEA_COLUMNS, order_clause
            ),
            None => format!(
                "SELECT {} FROM ideas WHERE published = 1 ORDER BY {} LIMIT ? OFFSET ?",
                IDEA_COLUMNS, order_clause
            ),
        };

        let mut query = sqlx::query_as::<_, IdeaRow>(&sql);
        if let Some(state) = state {
            query = query.bind(state.to_string());
        }
        let rows = query.bind(limit).bind(offset).fetch_all(&self.pool).await?;

        rows.into_iter().map(Idea::try_from).collect()
    }

    async fn all_ideas(&self) -> StorageResult<Vec<Idea>> {
        let rows: Vec<IdeaRow> = sqlx::query_as(&format!(
            "SELECT {} FROM ideas ORDER BY id ASC",
            IDEA_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Idea::try_from).collect()
    }

    async fn record_vote(
        &self,
        idea_id: i64,
        voter: &str,
        option: i64,
        at: DateTime<Utc>,
    ) -> StorageResult<()> {
        self.get_idea(idea_id)
            .await?
            .ok_or(StorageError::IdeaNotFound { idea_id })?;

        sqlx::query("INSERT INTO votes (idea_id, voter, option, updated_at) VALUES (?, ?, ?, ?)")
            .bind(idea_id)
            .bind(voter)
            .bind(option)
            .bind(at.to_rfc3339())
            .execute(&self.pool)
            .await?;

        // Refresh the ranking aggregates the support and tilt criteria
        // order by.
        sqlx::query(
            r#"
            UPDATE ideas SET
                vote_count = (SELECT COUNT(*) FROM votes WHERE idea_id = ?1),
                vote_proportion = (SELECT COALESCE(AVG(option), 0.0) FROM votes WHERE idea_id = ?1),
                vote_proportion_away_mid =
                    (SELECT ABS(COALESCE(AVG(option), 0.5) - 0.5) FROM votes WHERE idea_id = ?1)
            WHERE id = ?1
            "#,
        )
        .bind(idea_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn votes_for_idea(&self, idea_id: i64) -> StorageResult<Vec<VoteRecord>> {
        let rows: Vec<VoteRecord> = sqlx::query_as(
            "SELECT idea_id, option, updated_at FROM votes WHERE idea_id = ? ORDER BY id ASC",
        )
        .bind(idea_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn vote_tally(&self, idea_id: i64) -> StorageResult<VoteTally> {
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT option, COUNT(*) FROM votes WHERE idea_id = ? GROUP BY option",
        )
        .bind(idea_id)
        .fetch_all(&self.pool)
        .await?;

        let mut tally = VoteTally::default();
        for (option, count) in rows {
            match option {
                1 => tally.support = count,
                0 => tally.oppose = count,
                _ => {}
            }
        }
        Ok(tally)
    }

    async fn get_session_state(&self, session_id: &str) -> StorageResult<Option<SessionState>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT state FROM sessions WHERE id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await?;

        let Some((json,)) = row else {
            return Ok(None);
        };

        match serde_json::from_str::<SessionState>(&json) {
            Ok(state) if state.is_valid() => Ok(Some(state)),
            Ok(_) => {
                warn!(session_id, "Discarding session state with invalid sort order");
                Ok(None)
            }
            Err(e) => {
                warn!(session_id, error = %e, "Discarding unreadable session state");
                Ok(None)
            }
        }
    }

    async fn put_session_state(
        &self,
        session_id: &str,
        state: &SessionState,
    ) -> StorageResult<()> {
        let json = serde_json::to_string(state).map_err(|e| StorageError::Query {
            message: format!("Failed to serialize session state: {}", e),
        })?;

        sqlx::query(
            r#"
            INSERT INTO sessions (id, state, updated_at) VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET state = excluded.state, updated_at = excluded.updated_at
            "#,
        )
        .bind(session_id)
        .bind(json)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Raw idea row as stored.
#[derive(Debug, sqlx::FromRow)]
struct IdeaRow {
    id: i64,
    title: String,
    body: String,
    author: String,
    state: String,
    published: bool,
    created_at: String,
    comment_count: i64,
    vote_count: i64,
    vote_proportion: f64,
    vote_proportion_away_mid: f64,
}

impl TryFrom<IdeaRow> for Idea {
    type Error = StorageError;

    fn try_from(row: IdeaRow) -> Result<Self, Self::Error> {
        let state = row.state.parse().map_err(|e| StorageError::Query {
            message: format!("Idea {} has invalid state: {}", row.id, e),
        })?;
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| StorageError::Query {
                message: format!("Idea {} has invalid created_at: {}", row.id, e),
            })?
            .to_utc();

        Ok(Idea {
            id: row.id,
            title: row.title,
            body: row.body,
            author: row.author,
            state,
            published: row.published,
            created_at,
            comment_count: row.comment_count,
            vote_count: row.vote_count,
            vote_proportion: row.vote_proportion,
            vote_proportion_away_mid: row.vote_proportion_away_mid,
        })
    }
}
