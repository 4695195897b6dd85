use log::{debug, info};

use std::collections::BTreeSet;

use crate::config::*;
use crate::profile::Profile;
use crate::stv::{all_candidates, stv_rule};

/// Runs the elimination rule, but never eliminates `alternative`.
///
/// Returns, for each round, how many extra votes the alternative would have needed to
/// not be among the lowest candidates of this round (zero if it was not in danger).
///
/// When the alternative is among the lowest candidates, the candidates at the next
/// higher score are eliminated instead. If all the remaining candidates are tied with
/// the alternative, the others are eliminated and one extra vote is reported.
pub fn force_stv_winner(
    profile: &Profile,
    alternative: CandidateId,
    num_candidates: u32,
) -> Vec<VoteCount> {
    let mut active = all_candidates(num_candidates);
    let mut savior_sizes: Vec<VoteCount> = Vec::new();

    while active.len() > 1 {
        let tally = profile.plurality_scores(&active);
        let mut scores: Vec<VoteCount> = tally.values().cloned().collect();
        scores.sort();
        scores.dedup();
        let min_score = scores[0];

        let at_score = |score: VoteCount| -> BTreeSet<CandidateId> {
            tally
                .iter()
                .filter_map(|(cid, vc)| if *vc == score { Some(*cid) } else { None })
                .collect()
        };

        let mut to_eliminate = at_score(min_score);
        if to_eliminate.contains(&alternative) {
            let (new_min_score, spared) = match scores.get(1) {
                Some(next_score) => (*next_score, at_score(*next_score)),
                None => (min_score, to_eliminate),
            };
            to_eliminate = spared;
            to_eliminate.remove(&alternative);
            savior_sizes.push(VoteCount(
                (new_min_score.0 - min_score.0).saturating_add(1),
            ));
        } else {
            savior_sizes.push(VoteCount::EMPTY);
        }
        debug!(
            "force_stv_winner: alternative {}: tally: {:?} eliminated: {:?} savior size: {:?}",
            alternative,
            tally,
            to_eliminate,
            savior_sizes.last()
        );
        assert!(!to_eliminate.is_empty(), "No candidate eliminated");
        active.retain(|cid| !to_eliminate.contains(cid));
    }
    savior_sizes
}

/// Ranks all the losing candidates by the help they need to survive until the end.
///
/// For each candidate that is neither a winner nor excluded by the rules, the adjustment
/// is the largest savior size over all the rounds of [force_stv_winner]. The result is
/// sorted from the easiest candidate to rescue to the hardest.
///
/// This is a heuristic: the adjustment is necessary for the candidate to win, but not
/// always sufficient.
pub fn minimum_adjustment(
    profile: &Profile,
    rules: &AnalysisRules,
) -> Vec<(CandidateId, VoteCount)> {
    let outcome = stv_rule(profile, rules.num_candidates);
    info!("minimum_adjustment: winners: {:?}", outcome.winners);

    let mut adjustments: Vec<(CandidateId, VoteCount)> = profile
        .alternatives()
        .iter()
        .filter(|cid| {
            !outcome.winners.contains(*cid) && !rules.excluded_candidates.contains(*cid)
        })
        .map(|cid| {
            let savior_sizes = force_stv_winner(profile, *cid, rules.num_candidates);
            debug!("minimum_adjustment: {}: savior sizes: {:?}", cid, savior_sizes);
            let adjustment = savior_sizes.into_iter().max().unwrap_or_default();
            (*cid, adjustment)
        })
        .collect();
    adjustments.sort_by_key(|(_, adjustment)| *adjustment);
    info!("minimum_adjustment: adjustments: {:?}", adjustments);
    adjustments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn counts(vcs: &[u64]) -> Vec<VoteCount> {
        vcs.iter().map(|c| VoteCount(*c)).collect()
    }

    fn three_way() -> Profile {
        Profile::from_pairs(&[(10, vec![1, 2, 3]), (7, vec![2, 3, 1]), (5, vec![3, 2, 1])])
    }

    #[test]
    fn savior_sizes_per_round() {
        init();
        let p = three_way();
        // Round 1: 1 is safe. Round 2: 1 has 10 against 12.
        assert_eq!(force_stv_winner(&p, CandidateId(1), 3), counts(&[0, 3]));
        // Round 1: 3 has 5 against 7, then 2 is eliminated and 3 collects its votes.
        assert_eq!(force_stv_winner(&p, CandidateId(3), 3), counts(&[3, 0]));
    }

    #[test]
    fn winner_needs_no_help() {
        init();
        let p = three_way();
        assert_eq!(force_stv_winner(&p, CandidateId(2), 3), counts(&[0, 0]));

        let p = Profile::from_pairs(&[
            (3, vec![5, 1]),
            (8, vec![2, 4]),
            (1, vec![4]),
            (6, vec![1, 2, 3]),
        ]);
        let outcome = stv_rule(&p, 5);
        let winner = outcome.representative_winner().unwrap();
        let sizes = force_stv_winner(&p, winner, 5);
        let (last, rest) = sizes.split_last().unwrap();
        assert!(rest.iter().all(|s| *s == VoteCount::EMPTY));
        if outcome.winners.len() == 1 {
            assert_eq!(*last, VoteCount::EMPTY);
        }
    }

    #[test]
    fn next_distinct_score_is_used() {
        init();
        // Scores: 1 -> 2, 2 -> 2, 3 -> 6. 1 is spared, 3 is the next level.
        let p = Profile::from_pairs(&[(2, vec![1]), (2, vec![2]), (6, vec![3])]);
        let sizes = force_stv_winner(&p, CandidateId(1), 3);
        assert_eq!(sizes[0], VoteCount(5));
    }

    #[test]
    fn full_tie_spares_the_alternative() {
        init();
        let p = Profile::from_pairs(&[(2, vec![1]), (2, vec![2]), (2, vec![3])]);
        assert_eq!(force_stv_winner(&p, CandidateId(2), 3), counts(&[1]));
    }

    #[test]
    fn savior_size_saturates_on_huge_counts() {
        init();
        let p = Profile::from_pairs(&[(u64::MAX, vec![1])]);
        assert_eq!(force_stv_winner(&p, CandidateId(2), 2), counts(&[u64::MAX]));
    }

    #[test]
    fn single_candidate_has_no_round() {
        init();
        let p = three_way();
        assert!(force_stv_winner(&p, CandidateId(1), 1).is_empty());
    }

    #[test]
    fn adjustments_sorted_and_filtered() {
        init();
        let p = three_way();
        let rules = AnalysisRules::new(3);
        assert_eq!(
            minimum_adjustment(&p, &rules),
            vec![(CandidateId(1), VoteCount(3)), (CandidateId(3), VoteCount(3))]
        );

        let rules = AnalysisRules::new(3).excluding(&[1]);
        assert_eq!(
            minimum_adjustment(&p, &rules),
            vec![(CandidateId(3), VoteCount(3))]
        );
    }

    #[test]
    fn adjustments_easiest_first() {
        init();
        // 1 wins. Against 1 alone, 3 is 9 votes short and 2 is 11 votes short.
        let p = Profile::from_pairs(&[(12, vec![1]), (6, vec![2]), (4, vec![3, 1])]);
        let rules = AnalysisRules::new(3);
        assert_eq!(
            minimum_adjustment(&p, &rules),
            vec![(CandidateId(3), VoteCount(9)), (CandidateId(2), VoteCount(11))]
        );
    }
}
