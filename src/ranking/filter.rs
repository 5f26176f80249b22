use serde::{Deserialize, Serialize};

use crate::error::{RankingError, RankingResult};
use crate::storage::{Idea, IdeaState};

/// The single active predicate restricting which ideas are listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOption {
    /// No restriction.
    #[default]
    All,
    /// Ideas in state `idea`.
    Ideas,
    /// Ideas in state `draft`.
    Drafts,
    /// Ideas in state `proposal`.
    LawProposals,
    /// Ideas in state `proposal`. Deliberately the same predicate as
    /// [`FilterOption::LawProposals`]: the idea state model has no finer
    /// distinction between the two proposal kinds.
    ActionProposals,
    /// Ideas in state `law`.
    Laws,
}

impl FilterOption {
    /// All filter options in catalog order.
    pub const ALL: [FilterOption; 6] = [
        FilterOption::All,
        FilterOption::Ideas,
        FilterOption::Drafts,
        FilterOption::LawProposals,
        FilterOption::ActionProposals,
        FilterOption::Laws,
    ];

    /// The idea state this filter restricts to, or `None` for no
    /// restriction.
    pub fn state_predicate(self) -> Option<IdeaState> {
        match self {
            FilterOption::All => None,
            FilterOption::Ideas => Some(IdeaState::Idea),
            FilterOption::Drafts => Some(IdeaState::Draft),
            FilterOption::LawProposals | FilterOption::ActionProposals => {
                Some(IdeaState::Proposal)
            }
            FilterOption::Laws => Some(IdeaState::Law),
        }
    }

    /// Whether an idea passes this filter.
    pub fn matches(self, idea: &Idea) -> bool {
        match self.state_predicate() {
            None => true,
            Some(state) => idea.state == state,
        }
    }

    /// Display label for the listing payload.
    pub fn label(self) -> &'static str {
        match self {
            FilterOption::All => "All",
            FilterOption::Ideas => "Ideas",
            FilterOption::Drafts => "Drafts",
            FilterOption::LawProposals => "Law proposals",
            FilterOption::ActionProposals => "Action proposals",
            FilterOption::Laws => "Laws",
        }
    }
}

impl std::fmt::Display for FilterOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterOption::All => write!(f, "all"),
            FilterOption::Ideas => write!(f, "ideas"),
            FilterOption::Drafts => write!(f, "drafts"),
            FilterOption::LawProposals => write!(f, "law_proposals"),
            FilterOption::ActionProposals => write!(f, "action_proposals"),
            FilterOption::Laws => write!(f, "laws"),
        }
    }
}

/// Parse a filter key, failing with [`RankingError::UnknownFilter`] for keys
/// not in the catalog.
pub fn parse_filter(key: &str) -> RankingResult<FilterOption> {
    match key.to_lowercase().as_str() {
        "all" => Ok(FilterOption::All),
        "ideas" => Ok(FilterOption::Ideas),
        "drafts" => Ok(FilterOption::Drafts),
        "law_proposals" => Ok(FilterOption::LawProposals),
        "action_proposals" => Ok(FilterOption::ActionProposals),
        "laws" => Ok(FilterOption::Laws),
        _ => Err(RankingError::UnknownFilter {
            key: key.to_string(),
        }),
    }
}
