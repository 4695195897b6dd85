/*!
Outcome and margin analysis for single transferable vote (STV) elections.

Ballots are weighted rankings over candidates numbered `1..=n`. The crate computes:
- the outcome of the elimination rule, where all the candidates with the lowest
  plurality score are eliminated together at each round ([stv_rule]);
- for each losing candidate, how much help it would need to survive every round
  ([force_stv_winner], [minimum_adjustment]);
- a small group of real voters who would change the winner by voting for a single
  losing candidate ([find_minimal_coalition]).

```
use stv_margin::*;

let profile = Profile::from_pairs(&[(10, vec![1, 2, 3]), (7, vec![2, 3, 1]), (5, vec![3, 2, 1])]);
let rules = AnalysisRules::new(3);

let outcome = stv_rule(&profile, rules.num_candidates);
assert_eq!(outcome.representative_winner(), Some(CandidateId(2)));

let search = find_minimal_coalition(&profile, &rules);
assert_eq!(search.target, Some(CandidateId(3)));
assert_eq!(search.size, 2);
```

See the [manual] for the details of each step.
*/

mod coalition;
mod config;
mod profile;
mod stv;
mod survival;

pub mod builder;
pub mod manual;

pub use crate::coalition::*;
pub use crate::config::*;
pub use crate::profile::Profile;
pub use crate::stv::stv_rule;
pub use crate::survival::*;
