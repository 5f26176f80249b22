//! Static catalog of sort criteria and their directions.
//!
//! Every criterion has exactly two directions. A direction maps to an
//! ordering expression over the idea ranking aggregates and to a display
//! label for the listing payload.

use serde::{Deserialize, Serialize};

/// A named axis of comparison for ranking ideas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    /// Idea age (creation time).
    Age,
    /// Comment count.
    Comments,
    /// Raw vote count.
    Voted,
    /// Proportion of supporting votes.
    Support,
    /// Distance of the support proportion from the 50/50 midpoint.
    Tilt,
}

/// One of the two orientations of a criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Most recent first.
    Newest,
    /// Oldest first.
    Oldest,
    /// Highest count or proportion first.
    Most,
    /// Lowest count or proportion first.
    Least,
    /// Closest to a 50/50 vote split first.
    Even,
    /// Most clearly decided first.
    Polarized,
}

impl Criterion {
    /// All catalog criteria in default precedence order.
    pub const ALL: [Criterion; 5] = [
        Criterion::Age,
        Criterion::Comments,
        Criterion::Voted,
        Criterion::Support,
        Criterion::Tilt,
    ];

    /// The two directions of this criterion, default first.
    pub fn directions(self) -> [Direction; 2] {
        match self {
            Criterion::Age => [Direction::Newest, Direction::Oldest],
            Criterion::Comments | Criterion::Voted | Criterion::Support => {
                [Direction::Most, Direction::Least]
            }
            Criterion::Tilt => [Direction::Even, Direction::Polarized],
        }
    }

    /// The default (primary) direction of this criterion.
    pub fn default_direction(self) -> Direction {
        self.directions()[0]
    }

    /// The opposite of `direction` within this criterion.
    pub fn toggled(self, direction: Direction) -> Direction {
        let [primary, alternate] = self.directions();
        if direction == primary {
            alternate
        } else {
            primary
        }
    }

    /// Whether `direction` is one of this criterion's two directions.
    pub fn has_direction(self, direction: Direction) -> bool {
        self.directions().contains(&direction)
    }

    /// SQL ordering fragment for this criterion in the given direction.
    ///
    /// All fragments reference fixed idea columns; no caller input ever
    /// reaches this expression. Mismatched pairs are rejected when session
    /// state is loaded, so the fallback arm is never hit in practice.
    pub fn order_expr(self, direction: Direction) -> &'static str {
        match (self, direction) {
            (Criterion::Age, Direction::Newest) => "created_at DESC",
            (Criterion::Age, Direction::Oldest) => "created_at ASC",
            (Criterion::Comments, Direction::Most) => "comment_count DESC",
            (Criterion::Comments, Direction::Least) => "comment_count ASC",
            (Criterion::Voted, Direction::Most) => "vote_count DESC",
            (Criterion::Voted, Direction::Least) => "vote_count ASC",
            (Criterion::Support, Direction::Most) => "vote_proportion DESC",
            (Criterion::Support, Direction::Least) => "vote_proportion ASC",
            (Criterion::Tilt, Direction::Even) => "vote_proportion_away_mid ASC",
            (Criterion::Tilt, Direction::Polarized) => "vote_proportion_away_mid DESC",
            (criterion, _) => criterion.order_expr(criterion.default_direction()),
        }
    }

    /// Display label for this criterion in the given direction.
    pub fn label(self, direction: Direction) -> &'static str {
        match (self, direction) {
            (Criterion::Age, Direction::Newest) => "Newest ideas",
            (Criterion::Age, Direction::Oldest) => "Oldest ideas",
            (Criterion::Comments, Direction::Most) => "Most comments",
            (Criterion::Comments, Direction::Least) => "Fewest comments",
            (Criterion::Voted, Direction::Most) => "Most votes",
            (Criterion::Voted, Direction::Least) => "Fewest votes",
            (Criterion::Support, Direction::Most) => "Most support",
            (Criterion::Support, Direction::Least) => "Least support",
            (Criterion::Tilt, Direction::Even) => "Most divisive",
            (Criterion::Tilt, Direction::Polarized) => "Most clearly decided",
            (criterion, _) => criterion.label(criterion.default_direction()),
        }
    }
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Criterion::Age => write!(f, "age"),
            Criterion::Comments => write!(f, "comments"),
            Criterion::Voted => write!(f, "voted"),
            Criterion::Support => write!(f, "support"),
            Criterion::Tilt => write!(f, "tilt"),
        }
    }
}

impl std::str::FromStr for Criterion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "age" => Ok(Criterion::Age),
            "comments" => Ok(Criterion::Comments),
            "voted" => Ok(Criterion::Voted),
            "support" => Ok(Criterion::Support),
            "tilt" => Ok(Criterion::Tilt),
            _ => Err(format!("Unknown criterion: {}", s)),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Newest => write!(f, "newest"),
            Direction::Oldest => write!(f, "oldest"),
            Direction::Most => write!(f, "most"),
            Direction::Least => write!(f, "least"),
            Direction::Even => write!(f, "even"),
            Direction::Polarized => write!(f, "polarized"),
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newest" => Ok(Direction::Newest),
            "oldest" => Ok(Direction::Oldest),
            "most" => Ok(Direction::Most),
            "least" => Ok(Direction::Least),
            "even" => Ok(Direction::Even),
            "polarized" => Ok(Direction::Polarized),
            _ => Err(format!("Unknown direction: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_every_criterion_has_two_directions() {
        for criterion in Criterion::ALL {
            let [primary, alternate] = criterion.directions();
            assert_ne!(primary, alternate, "{} directions collide", criterion);
            assert_eq!(criterion.default_direction(), primary);
        }
    }

    #[test]
    fn test_toggle_is_an_involution() {
        for criterion in Criterion::ALL {
            for direction in criterion.directions() {
                let other = criterion.toggled(direction);
                assert_ne!(other, direction);
                assert_eq!(criterion.toggled(other), direction);
            }
        }
    }

    #[test]
    fn test_order_exprs_are_distinct_per_criterion() {
        for criterion in Criterion::ALL {
            let [primary, alternate] = criterion.directions();
            assert_ne!(
                criterion.order_expr(primary),
                criterion.order_expr(alternate),
                "{} directions map to the same ordering",
                criterion
            );
        }
    }

    #[test]
    fn test_criterion_round_trip() {
        for criterion in Criterion::ALL {
            let parsed = Criterion::from_str(&criterion.to_string()).unwrap();
            assert_eq!(parsed, criterion);
        }
        assert!(Criterion::from_str("flavor").is_err());
    }

    #[test]
    fn test_direction_round_trip() {
        for criterion in Criterion::ALL {
            for direction in criterion.directions() {
                let parsed = Direction::from_str(&direction.to_string()).unwrap();
                assert_eq!(parsed, direction);
            }
        }
        assert!(Direction::from_str("sideways").is_err());
    }

    #[test]
    fn test_labels_exist_for_all_pairs() {
        for criterion in Criterion::ALL {
            for direction in criterion.directions() {
                assert!(!criterion.label(direction).is_empty());
            }
        }
    }
}
