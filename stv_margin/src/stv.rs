use log::debug;

use std::collections::BTreeSet;

use crate::config::*;
use crate::profile::Profile;

/// The candidates `1..=num_candidates`.
pub(crate) fn all_candidates(num_candidates: u32) -> BTreeSet<CandidateId> {
    (1..=num_candidates).map(CandidateId).collect()
}

/// Runs the elimination rule over the candidates `1..=num_candidates`.
///
/// At each round, all the candidates with the lowest plurality score are eliminated
/// together. The candidates eliminated in the last round are the winners.
///
/// ```
/// use stv_margin::*;
///
/// let profile = Profile::from_pairs(&[(10, vec![1, 2]), (5, vec![2, 1]), (3, vec![])]);
/// let outcome = stv_rule(&profile, 2);
/// assert_eq!(outcome.representative_winner(), Some(CandidateId(1)));
/// assert_eq!(outcome.winners.len(), 1);
/// assert_eq!(outcome.elimination_order.len(), 2);
/// ```
pub fn stv_rule(profile: &Profile, num_candidates: u32) -> StvOutcome {
    let mut active = all_candidates(num_candidates);
    let mut elimination_order: Vec<BTreeSet<CandidateId>> = Vec::new();

    while !active.is_empty() {
        let tally = profile.plurality_scores(&active);
        // The tally covers all the active candidates, so it is not empty here.
        let min_score = match tally.values().min() {
            Some(vc) => *vc,
            None => break,
        };
        let to_eliminate: BTreeSet<CandidateId> = tally
            .iter()
            .filter_map(|(cid, vc)| if *vc == min_score { Some(*cid) } else { None })
            .collect();
        debug!(
            "stv_rule: round {}: tally: {:?} eliminated: {:?}",
            elimination_order.len() + 1,
            tally,
            to_eliminate
        );
        assert!(!to_eliminate.is_empty(), "No candidate eliminated");
        active.retain(|cid| !to_eliminate.contains(cid));
        elimination_order.push(to_eliminate);
    }

    let winners = elimination_order.last().cloned().unwrap_or_default();
    StvOutcome {
        winners,
        elimination_order,
    }
}
