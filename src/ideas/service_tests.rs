//! Unit tests for the idea listing service.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

use super::*;
use crate::catalog::{Criterion, Direction};
use crate::error::{AppError, RankingError};

async fn service() -> IdeaService {
    let storage = SqliteStorage::new_in_memory().await.unwrap();
    IdeaService::new(storage, ListingConfig { page_size: 30 })
}

fn new_idea(title: &str) -> NewIdea {
    NewIdea {
        title: title.to_string(),
        body: String::new(),
        author: "citizen".to_string(),
    }
}

fn listing(session_id: &str) -> ListingParams {
    ListingParams {
        session_id: Some(session_id.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_list_with_defaults() {
    let service = service().await;
    service.create(new_idea("one")).await.unwrap();
    service.create(new_idea("two")).await.unwrap();

    let result = service.list(ListingParams::default()).await.unwrap();

    assert!(!result.session_id.is_empty(), "session id must be generated");
    assert_eq!(result.sort_order, SortOrder::default());
    assert_eq!(result.filter, FilterOption::All);
    assert_eq!(result.sort_label, "Newest ideas");
    assert_eq!(result.ideas.len(), 2);
}

#[tokio::test]
async fn test_reorder_persists_across_requests() {
    let service = service().await;
    service.create(new_idea("idea")).await.unwrap();

    let mut params = listing("s1");
    params.reorder = Some("voted".to_string());
    let result = service.list(params).await.unwrap();

    let first = result.sort_order.entries()[0];
    assert_eq!(first.criterion, Criterion::Voted);
    assert_eq!(first.direction, Direction::Most);
    assert_eq!(result.sort_label, "Most votes");

    // A later request without a reorder action must not re-apply it.
    let result = service.list(listing("s1")).await.unwrap();
    let first = result.sort_order.entries()[0];
    assert_eq!(first.criterion, Criterion::Voted);
    assert_eq!(first.direction, Direction::Most, "direction must not toggle");
}

#[tokio::test]
async fn test_reorder_of_leading_criterion_toggles() {
    let service = service().await;

    let mut params = listing("s1");
    params.reorder = Some("voted".to_string());
    service.list(params).await.unwrap();

    let mut params = listing("s1");
    params.reorder = Some("voted".to_string());
    let result = service.list(params).await.unwrap();

    let first = result.sort_order.entries()[0];
    assert_eq!(first.criterion, Criterion::Voted);
    assert_eq!(first.direction, Direction::Least);
}

#[tokio::test]
async fn test_unknown_reorder_fails_and_preserves_state() {
    let service = service().await;

    let mut params = listing("s1");
    params.reorder = Some("voted".to_string());
    service.list(params).await.unwrap();

    let mut params = listing("s1");
    params.reorder = Some("flavor".to_string());
    let err = service.list(params).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Ranking(RankingError::UnknownCriterion { .. })
    ));

    // State from before the failed request is intact.
    let result = service.list(listing("s1")).await.unwrap();
    assert_eq!(result.sort_order.entries()[0].criterion, Criterion::Voted);
}

#[tokio::test]
async fn test_filter_persists_and_restricts() {
    let service = service().await;
    let kept = service.create(new_idea("proposal")).await.unwrap();
    service.create(new_idea("plain")).await.unwrap();
    service
        .update(
            kept.id,
            IdeaChanges {
                state: Some(crate::storage::IdeaState::Proposal),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let mut params = listing("s1");
    params.filter = Some("law_proposals".to_string());
    let result = service.list(params).await.unwrap();
    assert_eq!(result.filter, FilterOption::LawProposals);
    assert_eq!(result.filter_label, "Law proposals");
    assert_eq!(result.ideas.len(), 1);
    assert_eq!(result.ideas[0].id, kept.id);

    // Sticky on the next request.
    let result = service.list(listing("s1")).await.unwrap();
    assert_eq!(result.filter, FilterOption::LawProposals);
    assert_eq!(result.ideas.len(), 1);
}

#[tokio::test]
async fn test_unknown_filter_fails() {
    let service = service().await;

    let mut params = listing("s1");
    params.filter = Some("bogus".to_string());
    let err = service.list(params).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Ranking(RankingError::UnknownFilter { .. })
    ));
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let service = service().await;

    let mut params = listing("s1");
    params.reorder = Some("tilt".to_string());
    service.list(params).await.unwrap();

    let result = service.list(listing("s2")).await.unwrap();
    assert_eq!(result.sort_order, SortOrder::default());
}

#[tokio::test]
async fn test_reorder_changes_listing_order() {
    let service = service().await;
    let older = service.create(new_idea("older")).await.unwrap();
    let newer = service.create(new_idea("newer")).await.unwrap();
    let at = Utc.with_ymd_and_hms(2013, 1, 9, 12, 0, 0).unwrap();
    service.record_vote(older.id, "a", 1, at).await.unwrap();

    // Default order is newest first; with equal timestamps the id
    // tie-break applies, so disambiguate through the voted criterion.
    let mut params = listing("s1");
    params.reorder = Some("voted".to_string());
    let result = service.list(params).await.unwrap();
    assert_eq!(result.ideas[0].id, older.id);
    assert_eq!(result.ideas[1].id, newer.id);

    // Toggling to fewest votes flips the pair.
    let mut params = listing("s1");
    params.reorder = Some("voted".to_string());
    let result = service.list(params).await.unwrap();
    assert_eq!(result.ideas[0].id, newer.id);
}

#[tokio::test]
async fn test_pagination() {
    let storage = SqliteStorage::new_in_memory().await.unwrap();
    let service = IdeaService::new(storage, ListingConfig { page_size: 2 });
    for n in 0..5 {
        service.create(new_idea(&format!("idea {}", n))).await.unwrap();
    }

    let mut params = listing("s1");
    params.page = 2;
    let result = service.list(params).await.unwrap();
    assert_eq!(result.page, 2);
    assert_eq!(result.ideas.len(), 1);
}

#[tokio::test]
async fn test_show_reports_vote_counts() {
    let service = service().await;
    let idea = service.create(new_idea("detail")).await.unwrap();
    let at = Utc.with_ymd_and_hms(2013, 1, 9, 12, 0, 0).unwrap();
    service.record_vote(idea.id, "a", 1, at).await.unwrap();
    service.record_vote(idea.id, "b", 1, at).await.unwrap();
    service.record_vote(idea.id, "c", 0, at).await.unwrap();

    let detail = service.show(idea.id).await.unwrap();
    assert_eq!(detail.support_count, 2);
    assert_eq!(detail.oppose_count, 1);
    assert_eq!(detail.vote_count, 3);

    let err = service.show(9999).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Storage(StorageError::IdeaNotFound { idea_id: 9999 })
    ));
}

#[tokio::test]
async fn test_create_forces_idea_state() {
    let service = service().await;
    let idea = service.create(new_idea("fresh")).await.unwrap();
    assert_eq!(idea.state, crate::storage::IdeaState::Idea);
}
