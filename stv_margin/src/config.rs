// ********* Input data structures ***********

use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::Display;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// The identifier of a candidate (also called an alternative).
///
/// In an election with `n` candidates, the candidates are numbered `1..=n`.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct CandidateId(pub u32);

impl Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A number of voters.
#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash, Default)]
pub struct VoteCount(pub u64);

impl VoteCount {
    pub const EMPTY: VoteCount = VoteCount(0);
}

// Counts come from input files: additions saturate at u64::MAX.

impl Sum for VoteCount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(VoteCount::EMPTY, |acc, vc| acc + vc)
    }
}

impl AddAssign for VoteCount {
    fn add_assign(&mut self, rhs: VoteCount) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Add for VoteCount {
    type Output = VoteCount;
    fn add(self: VoteCount, rhs: VoteCount) -> VoteCount {
        VoteCount(self.0.saturating_add(rhs.0))
    }
}

impl Display for VoteCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A group of voters who all cast the same ranking.
///
/// The ranking is read from the most preferred candidate to the least preferred one.
/// It may be empty, in which case these voters never count for anyone.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Ballot {
    pub count: VoteCount,
    pub ranking: Vec<CandidateId>,
}

impl Ballot {
    pub fn new(count: u64, ranking: &[u32]) -> Ballot {
        Ballot {
            count: VoteCount(count),
            ranking: ranking.iter().map(|c| CandidateId(*c)).collect(),
        }
    }
}

// ******** Output data structures *********

/// The outcome of the elimination rule.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct StvOutcome {
    /// The candidates eliminated in the last round. There may be more than one
    /// winner if they are tied at the end.
    pub winners: BTreeSet<CandidateId>,
    /// The candidates eliminated in each round, first round first.
    pub elimination_order: Vec<BTreeSet<CandidateId>>,
}

impl StvOutcome {
    /// The winner that stands for the whole winner set when a single
    /// candidate is needed. This is the smallest identifier.
    pub fn representative_winner(&self) -> Option<CandidateId> {
        self.winners.iter().next().cloned()
    }
}

/// Errors that prevent the analysis from starting.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum MarginErrors {
    EmptyProfile,
    UnknownCandidate(u32),
}

impl Error for MarginErrors {}

impl Display for MarginErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarginErrors::EmptyProfile => write!(f, "MarginError: no ballot in the profile"),
            MarginErrors::UnknownCandidate(c) => {
                write!(f, "MarginError: unknown candidate {}", c)
            }
        }
    }
}

// ********* Configuration **********

/// The rules that control the analysis.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AnalysisRules {
    /// The candidates taking part in the election are `1..=num_candidates`.
    pub num_candidates: u32,
    /// Candidates that are never considered as a target for a coalition
    /// (reserved options such as "none of the above").
    pub excluded_candidates: BTreeSet<CandidateId>,
    /// How far above the minimum adjustment the coalition search starts.
    pub ceiling_slack: u64,
    /// The coalition size reported when no coalition changes the winner.
    /// It is also the initial upper bound of the search.
    pub size_sentinel: u64,
}

impl AnalysisRules {
    pub const DEFAULT_CEILING_SLACK: u64 = 100;
    pub const DEFAULT_SIZE_SENTINEL: u64 = 1000;

    pub fn new(num_candidates: u32) -> AnalysisRules {
        AnalysisRules {
            num_candidates,
            excluded_candidates: BTreeSet::new(),
            ceiling_slack: AnalysisRules::DEFAULT_CEILING_SLACK,
            size_sentinel: AnalysisRules::DEFAULT_SIZE_SENTINEL,
        }
    }

    pub fn excluding(self, candidates: &[u32]) -> AnalysisRules {
        AnalysisRules {
            excluded_candidates: candidates.iter().map(|c| CandidateId(*c)).collect(),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_counts_saturate() {
        let big = VoteCount(u64::MAX - 1);
        assert_eq!(big + VoteCount(5), VoteCount(u64::MAX));
        let mut vc = big;
        vc += VoteCount(2);
        assert_eq!(vc, VoteCount(u64::MAX));
        let total: VoteCount = vec![big, VoteCount(3), VoteCount(1)].into_iter().sum();
        assert_eq!(total, VoteCount(u64::MAX));
        let total: VoteCount = vec![VoteCount(3), VoteCount(4)].into_iter().sum();
        assert_eq!(total, VoteCount(7));
    }
}
