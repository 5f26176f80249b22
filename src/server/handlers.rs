use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::SharedState;
use crate::error::{RpcError, RpcResult};
use crate::ideas::ListingParams;
use crate::storage::{IdeaChanges, NewIdea};

/// Parameters for `ideas.show`.
#[derive(Debug, Deserialize)]
pub struct ShowParams {
    /// Idea id.
    pub id: i64,
}

/// Parameters for `ideas.update`.
#[derive(Debug, Deserialize)]
pub struct UpdateParams {
    /// Idea id.
    pub id: i64,
    /// Fields to change.
    #[serde(flatten)]
    pub changes: IdeaChanges,
}

/// Parameters for `votes.record`.
#[derive(Debug, Deserialize)]
pub struct VoteParams {
    /// Idea id.
    pub idea_id: i64,
    /// Voter identifier.
    #[serde(default)]
    pub voter: String,
    /// Vote option: 0 = oppose, 1 = support.
    pub option: i64,
}

/// Route method calls to the appropriate handlers
pub async fn handle_method(
    state: &SharedState,
    method: &str,
    params: Option<Value>,
) -> RpcResult<Value> {
    info!(method = %method, "Routing method call");

    match method {
        "ideas.list" => {
            execute(method, params, |p: ListingParams| state.ideas.list(p)).await
        }
        "ideas.show" => {
            execute(method, params, |p: ShowParams| state.ideas.show(p.id)).await
        }
        "ideas.create" => execute(method, params, |p: NewIdea| state.ideas.create(p)).await,
        "ideas.update" => {
            execute(method, params, |p: UpdateParams| {
                state.ideas.update(p.id, p.changes)
            })
            .await
        }
        "votes.record" => handle_record_vote(state, params).await,
        "votes.flow" => {
            let flow = state.analytics.vote_flow().await.map_err(RpcError::from)?;
            serde_json::to_value(flow).map_err(RpcError::Json)
        }
        _ => Err(RpcError::UnknownMethod {
            method: method.to_string(),
        }),
    }
}

/// Handle votes.record, rejecting non-binary options.
async fn handle_record_vote(state: &SharedState, params: Option<Value>) -> RpcResult<Value> {
    let p: VoteParams = parse_params("votes.record", params)?;
    if p.option != 0 && p.option != 1 {
        return Err(RpcError::InvalidParameters {
            method: "votes.record".to_string(),
            message: format!("option must be 0 or 1, got {}", p.option),
        });
    }

    state
        .ideas
        .record_vote(p.idea_id, &p.voter, p.option, Utc::now())
        .await
        .map_err(RpcError::from)?;

    Ok(serde_json::json!({ "recorded": true }))
}

/// Parse method parameters, treating absent params as an empty object.
fn parse_params<P: serde::de::DeserializeOwned>(
    method: &str,
    params: Option<Value>,
) -> RpcResult<P> {
    let value = params.unwrap_or_else(|| Value::Object(Default::default()));
    serde_json::from_value(value).map_err(|e| RpcError::InvalidParameters {
        method: method.to_string(),
        message: e.to_string(),
    })
}

/// Parse parameters, run the operation, and serialize its result.
async fn execute<P, R, F, Fut>(method: &str, params: Option<Value>, operation: F) -> RpcResult<Value>
where
    P: serde::de::DeserializeOwned,
    R: Serialize,
    F: FnOnce(P) -> Fut,
    Fut: std::future::Future<Output = crate::error::AppResult<R>>,
{
    let params: P = parse_params(method, params)?;

    let result = operation(params).await.map_err(RpcError::from)?;

    serde_json::to_value(result).map_err(RpcError::Json)
}
