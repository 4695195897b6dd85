pub use crate::config::*;
use crate::profile::Profile;

/// A builder for adding votes and checking them against the rules.
///
/// ```
/// pub use stv_margin::builder::Builder;
/// pub use stv_margin::AnalysisRules;
/// # use stv_margin::MarginErrors;
///
/// let mut builder = Builder::new(&AnalysisRules::new(3))?;
///
/// builder.add_vote_simple(&[2, 1])?;
/// builder.add_vote(&[3], 4)?;
/// let profile = builder.build()?;
/// assert_eq!(profile.total_weight().0, 5);
///
/// # Ok::<(), MarginErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: AnalysisRules,
    pub(crate) _ballots: Vec<Ballot>,
}

impl Builder {
    pub fn new(rules: &AnalysisRules) -> Result<Builder, MarginErrors> {
        Ok(Builder {
            _rules: rules.clone(),
            _ballots: Vec::new(),
        })
    }

    /// Adds the ranking of a single voter.
    pub fn add_vote_simple(&mut self, ranking: &[u32]) -> Result<(), MarginErrors> {
        self.add_vote(ranking, 1)
    }

    /// Adds a ranking cast by `count` voters.
    ///
    /// ranking: the candidates, from the most preferred to the least preferred. They must
    /// all be between 1 and the number of candidates of the rules. A number of candidates
    /// of zero disables this check.
    pub fn add_vote(&mut self, ranking: &[u32], count: u64) -> Result<(), MarginErrors> {
        self.add_ballot(&Ballot::new(count, ranking))
    }

    /// Adds a ballot. Ballots without any voter are ignored.
    pub fn add_ballot(&mut self, ballot: &Ballot) -> Result<(), MarginErrors> {
        let num_candidates = self._rules.num_candidates;
        if num_candidates > 0 {
            if let Some(cid) = ballot
                .ranking
                .iter()
                .find(|cid| cid.0 == 0 || cid.0 > num_candidates)
            {
                return Err(MarginErrors::UnknownCandidate(cid.0));
            }
        }
        if ballot.count > VoteCount::EMPTY {
            self._ballots.push(ballot.clone());
        }
        Ok(())
    }

    /// The profile, with the ballots in the order they were added.
    pub fn build(self) -> Result<Profile, MarginErrors> {
        if self._ballots.is_empty() {
            return Err(MarginErrors::EmptyProfile);
        }
        Ok(Profile::new(self._ballots))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_order_and_duplicates() {
        let mut b = Builder::new(&AnalysisRules::new(3)).unwrap();
        b.add_vote(&[1, 2], 3).unwrap();
        b.add_vote(&[], 2).unwrap();
        b.add_vote(&[1, 2], 1).unwrap();
        let p = b.build().unwrap();
        assert_eq!(
            p,
            Profile::from_pairs(&[(3, vec![1, 2]), (2, vec![]), (1, vec![1, 2])])
        );
    }

    #[test]
    fn rejects_unknown_candidates() {
        let mut b = Builder::new(&AnalysisRules::new(3)).unwrap();
        assert_eq!(b.add_vote(&[1, 4], 1), Err(MarginErrors::UnknownCandidate(4)));
        assert_eq!(b.add_vote(&[0], 1), Err(MarginErrors::UnknownCandidate(0)));

        let mut b = Builder::new(&AnalysisRules::new(0)).unwrap();
        assert_eq!(b.add_vote(&[40], 1), Ok(()));
    }

    #[test]
    fn empty_profile() {
        let mut b = Builder::new(&AnalysisRules::new(3)).unwrap();
        b.add_vote(&[1], 0).unwrap();
        assert_eq!(b.build(), Err(MarginErrors::EmptyProfile));
    }
}
