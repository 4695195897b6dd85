use log::{debug, warn};

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

use crate::config::*;

/// A collection of ballots, each with the number of voters who cast it.
///
/// The order of the ballots is significant: it is used by [Profile::take_n] to decide
/// which ballots are kept first.
///
/// A profile is a plain value. Cloning it produces a completely independent copy,
/// which is what the coalition search relies on to explore many hypothetical
/// elections from the same starting point.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    ballots: Vec<Ballot>,
    alternatives: BTreeSet<CandidateId>,
}

impl PartialEq for Profile {
    fn eq(&self, other: &Profile) -> bool {
        self.ballots == other.ballots
    }
}

impl Eq for Profile {}

impl Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for b in self.ballots.iter() {
            let ranks: Vec<String> = b.ranking.iter().map(|c| c.to_string()).collect();
            writeln!(f, "{}: {}", b.count, ranks.join(","))?;
        }
        Ok(())
    }
}

impl Profile {
    /// Creates a profile from ballots, kept in the given order.
    ///
    /// Identical rankings are not merged at construction.
    pub fn new(ballots: Vec<Ballot>) -> Profile {
        let alternatives = ballots
            .iter()
            .flat_map(|b| b.ranking.iter().cloned())
            .collect();
        Profile {
            ballots,
            alternatives,
        }
    }

    /// Creates a profile from (count, ranking) pairs.
    pub fn from_pairs(pairs: &[(u64, Vec<u32>)]) -> Profile {
        Profile::new(
            pairs
                .iter()
                .map(|(count, ranking)| Ballot::new(*count, ranking))
                .collect(),
        )
    }

    pub fn ballots(&self) -> &[Ballot] {
        &self.ballots
    }

    /// All the candidates that appear in at least one ranking.
    pub fn alternatives(&self) -> &BTreeSet<CandidateId> {
        &self.alternatives
    }

    /// The total number of voters.
    pub fn total_weight(&self) -> VoteCount {
        self.ballots.iter().map(|b| b.count).sum()
    }

    /// The number of distinct entries (not voters).
    pub fn num_ballots(&self) -> usize {
        self.ballots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ballots.is_empty()
    }

    /// Counts, for each active candidate, the voters for whom it is the most preferred
    /// active candidate.
    ///
    /// All the active candidates are in the tally, even without any vote.
    pub fn plurality_scores(
        &self,
        active: &BTreeSet<CandidateId>,
    ) -> BTreeMap<CandidateId, VoteCount> {
        let mut tally: BTreeMap<CandidateId, VoteCount> =
            active.iter().map(|cid| (*cid, VoteCount::EMPTY)).collect();
        for b in self.ballots.iter() {
            if let Some(vc) = b
                .ranking
                .iter()
                .find(|cid| active.contains(*cid))
                .and_then(|cid| tally.get_mut(cid))
            {
                *vc += b.count;
            }
        }
        tally
    }

    /// Adds voters for a ranking, merging them with an existing identical ranking.
    pub fn add_ballot(&mut self, count: VoteCount, ranking: &[CandidateId]) {
        self.alternatives.extend(ranking.iter().cloned());
        if let Some(b) = self.ballots.iter_mut().find(|b| b.ranking == ranking) {
            b.count += count;
        } else {
            self.ballots.push(Ballot {
                count,
                ranking: ranking.to_vec(),
            });
        }
    }

    /// Moves the voters of the coalition to a single shared ranking.
    ///
    /// Each coalition ballot is subtracted from the ballot with the same ranking in this
    /// profile. Coalition ballots that have no counterpart are skipped. The whole
    /// weight of the coalition is then added to `shared_ranking`.
    pub fn apply_coalition(&mut self, coalition: &Profile, shared_ranking: &[CandidateId]) {
        let coalition_weight = coalition.total_weight();
        if coalition_weight == VoteCount::EMPTY {
            return;
        }
        for cb in coalition.ballots.iter() {
            let mut remaining = cb.count.0;
            for b in self
                .ballots
                .iter_mut()
                .filter(|b| b.ranking == cb.ranking)
            {
                if remaining == 0 {
                    break;
                }
                let taken = remaining.min(b.count.0);
                b.count = VoteCount(b.count.0 - taken);
                remaining -= taken;
            }
            if remaining == cb.count.0 {
                debug!(
                    "apply_coalition: no ballot matching {:?}, skipping",
                    cb.ranking
                );
            } else if remaining > 0 {
                warn!(
                    "apply_coalition: {} voters of {:?} could not be removed",
                    remaining, cb.ranking
                );
            }
        }
        self.ballots.retain(|b| b.count > VoteCount::EMPTY);
        self.add_ballot(coalition_weight, shared_ranking);
    }

    /// Keeps the ballots for which the predicate holds.
    pub fn filter_ballots<F>(&mut self, mut predicate: F)
    where
        F: FnMut(VoteCount, &[CandidateId]) -> bool,
    {
        self.ballots.retain(|b| predicate(b.count, &b.ranking));
    }

    /// Reorders the ballots by key. The sort is stable.
    pub fn order_ballots<K, F>(&mut self, mut key: F)
    where
        K: Ord,
        F: FnMut(VoteCount, &[CandidateId]) -> K,
    {
        self.ballots.sort_by_key(|b| key(b.count, &b.ranking));
    }

    /// Removes a candidate from all the rankings.
    pub fn remove_alternative(&mut self, alternative: CandidateId) {
        for b in self.ballots.iter_mut() {
            b.ranking.retain(|cid| *cid != alternative);
        }
        self.alternatives.remove(&alternative);
    }

    /// Keeps only the voters who rank this candidate first.
    pub fn retain_first_choice(&mut self, alternative: CandidateId) {
        self.filter_ballots(|_, ranking| ranking.first() == Some(&alternative));
    }

    /// Keeps the first `n` voters, in ballot order, and discards the rest.
    ///
    /// The ballot that crosses the limit is cut to fit exactly.
    pub fn take_n(&mut self, n: VoteCount) {
        let mut left = n.0;
        let mut kept: Vec<Ballot> = Vec::new();
        for b in self.ballots.iter() {
            if left == 0 {
                break;
            }
            let count = b.count.0.min(left);
            kept.push(Ballot {
                count: VoteCount(count),
                ranking: b.ranking.clone(),
            });
            left -= count;
        }
        self.ballots = kept;
    }

    /// Reorders the ballots in a way that is hard to guess but reproducible with the same seed.
    ///
    /// It uses a cryptographic hash of the seed, the position and the content of each ballot.
    pub fn shuffle(&mut self, seed: u32) {
        let mut keyed: Vec<(String, Ballot)> = self
            .ballots
            .drain(..)
            .enumerate()
            .map(|(idx, b)| {
                let ranks: Vec<String> = b.ranking.iter().map(|c| c.to_string()).collect();
                let key = format!("{:08}{:08}{}:{}", seed, idx, b.count, ranks.join(","));
                (sha256::digest(key.as_str()), b)
            })
            .collect();
        keyed.sort_by(|(k1, _), (k2, _)| k1.cmp(k2));
        self.ballots = keyed.into_iter().map(|(_, b)| b).collect();
    }
}
