use log::{debug, info};

use std::cmp::Reverse;

use crate::config::*;
use crate::profile::Profile;
use crate::stv::stv_rule;
use crate::survival::minimum_adjustment;

/// The best coalition found by [find_minimal_coalition].
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CoalitionSearch {
    /// The number of voters in the coalition, or the size sentinel of the rules if no
    /// coalition changes the winner.
    pub size: u64,
    /// The ballots of the coalition, as they are in the original profile.
    pub coalition: Option<Profile>,
    /// The candidate the coalition votes for.
    pub target: Option<CandidateId>,
}

// Where the downward search over coalition sizes stands after one trial.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum SearchStep {
    Descend,
    SkipAhead,
    Done,
}

/// True if `alternative` comes before `winner` in the ranking, or if neither appears.
///
/// Ballots that rank neither candidate are kept: these voters have no stated opinion
/// against the alternative.
pub fn ranks_at_or_above(
    ranking: &[CandidateId],
    alternative: CandidateId,
    winner: CandidateId,
) -> bool {
    for cid in ranking.iter() {
        if *cid == alternative {
            return true;
        }
        if *cid == winner {
            return false;
        }
    }
    true
}

/// How far down the ranking the alternative is: -1 for each position before it,
/// +1 for the position of the alternative and each position after it.
pub fn lower_rankedness(ranking: &[CandidateId], alternative: CandidateId) -> i64 {
    let mut badness: i64 = 0;
    let mut reached = false;
    for cid in ranking.iter() {
        if *cid == alternative {
            reached = true;
        }
        badness += if reached { 1 } else { -1 };
    }
    badness
}

/// Searches, for all the losing candidates, the smallest group of voters who would change
/// the winner by voting only for that candidate.
///
/// Candidates are tried from the easiest to rescue to the hardest (see
/// [minimum_adjustment]). For each of them, the coalition is drawn from the voters that
/// already prefer this candidate to the winner, and the search goes down from a ceiling
/// until the winner does not change anymore. This is a local search: the coalition
/// found is small but not guaranteed to be the smallest.
pub fn find_minimal_coalition(profile: &Profile, rules: &AnalysisRules) -> CoalitionSearch {
    let mut res = CoalitionSearch {
        size: rules.size_sentinel,
        coalition: None,
        target: None,
    };
    let winner = match stv_rule(profile, rules.num_candidates).representative_winner() {
        Some(cid) => cid,
        None => {
            info!("find_minimal_coalition: no winner, nothing to search");
            return res;
        }
    };
    info!("find_minimal_coalition: natural winner: {}", winner);

    for (alternative, adjustment) in minimum_adjustment(profile, rules) {
        let mut base = profile.clone();
        base.filter_ballots(|_, ranking| ranks_at_or_above(ranking, alternative, winner));
        base.order_ballots(|_, ranking| Reverse(lower_rankedness(ranking, alternative)));
        let base_weight = base.total_weight().0;

        let ceiling = adjustment
            .0
            .saturating_add(rules.ceiling_slack)
            .min(res.size)
            .min(base_weight);
        info!(
            "find_minimal_coalition: candidate {}: adjustment {}, {} possible voters, starting at {}",
            alternative, adjustment, base_weight, ceiling
        );

        let shared_ranking = [alternative];
        let mut k = ceiling;
        while k > 0 {
            let mut coalition = base.clone();
            coalition.take_n(VoteCount(k));
            let mut trial = profile.clone();
            trial.apply_coalition(&coalition, &shared_ranking);
            let new_winner = stv_rule(&trial, rules.num_candidates).representative_winner();
            let flipped = new_winner != Some(winner);

            if flipped && k < res.size {
                info!(
                    "find_minimal_coalition: {} voters for {} change the winner to {:?}",
                    k, alternative, new_winner
                );
                res = CoalitionSearch {
                    size: k,
                    coalition: Some(coalition),
                    target: Some(alternative),
                };
            }

            let step = if flipped {
                SearchStep::Descend
            } else if res.size > k + 1 && k < base_weight {
                SearchStep::SkipAhead
            } else {
                SearchStep::Done
            };
            debug!(
                "find_minimal_coalition: candidate {} size {}: new winner {:?}, best {}, next: {:?}",
                alternative, k, new_winner, res.size, step
            );
            match step {
                SearchStep::Descend => k -= 1,
                SearchStep::SkipAhead => k += 1,
                SearchStep::Done => break,
            }
        }
    }
    info!(
        "find_minimal_coalition: best size: {}, target: {:?}",
        res.size, res.target
    );
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn ranking(ids: &[u32]) -> Vec<CandidateId> {
        ids.iter().map(|c| CandidateId(*c)).collect()
    }

    fn three_way() -> Profile {
        Profile::from_pairs(&[(10, vec![1, 2, 3]), (7, vec![2, 3, 1]), (5, vec![3, 2, 1])])
    }

    #[test]
    fn at_or_above() {
        let a = CandidateId(3);
        let w = CandidateId(2);
        assert!(ranks_at_or_above(&ranking(&[3, 2]), a, w));
        assert!(ranks_at_or_above(&ranking(&[1, 3]), a, w));
        assert!(ranks_at_or_above(&ranking(&[1]), a, w));
        assert!(ranks_at_or_above(&ranking(&[]), a, w));
        assert!(!ranks_at_or_above(&ranking(&[2, 3]), a, w));
        assert!(!ranks_at_or_above(&ranking(&[1, 2]), a, w));
    }

    #[test]
    fn badness() {
        let a = CandidateId(3);
        assert_eq!(lower_rankedness(&ranking(&[3, 1, 2]), a), 3);
        assert_eq!(lower_rankedness(&ranking(&[1, 3, 2]), a), 1);
        assert_eq!(lower_rankedness(&ranking(&[1, 2, 3]), a), -1);
        assert_eq!(lower_rankedness(&ranking(&[1, 2]), a), -2);
        assert_eq!(lower_rankedness(&ranking(&[]), a), 0);
    }

    #[test]
    fn finds_smallest_flip() {
        init();
        let p = three_way();
        let rules = AnalysisRules::new(3);
        let res = find_minimal_coalition(&p, &rules);
        // Two voters of [3, 2, 1] voting for 3 alone tie 1 and 2 in the second round.
        assert_eq!(res.size, 2);
        assert_eq!(res.target, Some(CandidateId(3)));
        assert_eq!(res.coalition, Some(Profile::from_pairs(&[(2, vec![3, 2, 1])])));
    }

    #[test]
    fn returned_coalition_changes_the_winner() {
        init();
        let profiles = vec![
            three_way(),
            Profile::from_pairs(&[
                (9, vec![1, 2]),
                (8, vec![2, 3]),
                (6, vec![3, 2]),
                (4, vec![4, 3, 1]),
                (2, vec![]),
            ]),
        ];
        for p in profiles {
            let rules = AnalysisRules::new(4);
            let winner = stv_rule(&p, rules.num_candidates).representative_winner();
            let res = find_minimal_coalition(&p, &rules);
            if let (Some(coalition), Some(target)) = (res.coalition, res.target) {
                assert_eq!(coalition.total_weight(), VoteCount(res.size));
                let mut trial = p.clone();
                trial.apply_coalition(&coalition, &[target]);
                assert_eq!(trial.total_weight(), p.total_weight());
                let new_winner = stv_rule(&trial, rules.num_candidates).representative_winner();
                assert_ne!(new_winner, winner);
            }
        }
    }

    #[test]
    fn size_bounded_by_sentinel_and_possible_voters() {
        init();
        let profiles = vec![
            Profile::from_pairs(&[(30, vec![1]), (20, vec![2, 1]), (15, vec![3, 2])]),
            Profile::from_pairs(&[(6, vec![3, 2, 1]), (3, vec![1]), (7, vec![1, 2]), (6, vec![2, 3, 1])]),
        ];
        for p in profiles {
            let rules = AnalysisRules {
                ceiling_slack: 3,
                ..AnalysisRules::new(3)
            };
            let winner = stv_rule(&p, rules.num_candidates)
                .representative_winner()
                .unwrap();
            let res = find_minimal_coalition(&p, &rules);
            assert!(res.size <= rules.size_sentinel);
            if let Some(target) = res.target {
                let mut base = p.clone();
                base.filter_ballots(|_, ranking| ranks_at_or_above(ranking, target, winner));
                assert!(res.size <= base.total_weight().0);
            } else {
                assert_eq!(res.size, rules.size_sentinel);
            }
        }
    }

    #[test]
    fn climbs_above_the_starting_ceiling() {
        init();
        // 1 wins after 2 and 3 are eliminated together. 2 needs 5 more votes to
        // survive the first round, but 5 or 6 of its own supporters voting for it
        // alone change nothing: the search has to go up to 7.
        let p = Profile::from_pairs(&[
            (6, vec![3, 2, 1]),
            (3, vec![1]),
            (7, vec![1, 2]),
            (6, vec![2, 3, 1]),
        ]);
        let rules = AnalysisRules {
            ceiling_slack: 0,
            ..AnalysisRules::new(3)
        };
        assert_eq!(
            minimum_adjustment(&p, &rules),
            vec![(CandidateId(2), VoteCount(5)), (CandidateId(3), VoteCount(8))]
        );
        let res = find_minimal_coalition(&p, &rules);
        assert_eq!(res.size, 7);
        assert_eq!(res.target, Some(CandidateId(2)));
        assert_eq!(
            res.coalition,
            Some(Profile::from_pairs(&[(6, vec![2, 3, 1]), (1, vec![3, 2, 1])]))
        );
    }

    #[test]
    fn huge_slack_does_not_overflow() {
        init();
        let rules = AnalysisRules {
            ceiling_slack: u64::MAX,
            ..AnalysisRules::new(3)
        };
        let res = find_minimal_coalition(&three_way(), &rules);
        assert_eq!(res.size, 2);
        assert_eq!(res.target, Some(CandidateId(3)));
    }

    #[test]
    fn unbeatable_winner_returns_sentinel() {
        init();
        // Nobody prefers 2 to 1, and the supporters of 2 cannot do anything more.
        let p = Profile::from_pairs(&[(20, vec![1, 2]), (3, vec![2])]);
        let rules = AnalysisRules::new(2);
        let res = find_minimal_coalition(&p, &rules);
        assert_eq!(res.size, AnalysisRules::DEFAULT_SIZE_SENTINEL);
        assert_eq!(res.coalition, None);
        assert_eq!(res.target, None);
    }

    #[test]
    fn no_candidate_returns_sentinel() {
        init();
        let res = find_minimal_coalition(&three_way(), &AnalysisRules::new(0));
        assert_eq!(res.size, AnalysisRules::DEFAULT_SIZE_SENTINEL);
        assert_eq!(res.coalition, None);
    }

    #[test]
    fn search_leaves_profile_untouched() {
        init();
        let p = three_way();
        let before = p.clone();
        let _ = find_minimal_coalition(&p, &AnalysisRules::new(3));
        assert_eq!(p, before);
    }
}
