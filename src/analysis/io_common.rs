use std::path::Path;

use crate::analysis::ParsedBallot;

/// The name of the file, without directories and extension.
pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// The largest candidate found in the ballots, or zero if there is none.
pub fn max_candidate(ballots: &[ParsedBallot]) -> u32 {
    ballots
        .iter()
        .flat_map(|pb| pb.ranking.iter().cloned())
        .max()
        .unwrap_or(0)
}
