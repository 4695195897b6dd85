// Primitives for reading PrefLib ballot files (toi, soi, toc, soc).

use crate::analysis::*;

pub fn read_toi(path: &str) -> AnalysisResult<Vec<ParsedBallot>> {
    let contents = fs::read_to_string(path).context(OpeningInputSnafu { path })?;
    parse_toi(&contents)
}

/// Reads the `votes:ranking` lines. Comments and lines without a separator are skipped.
pub fn parse_toi(contents: &str) -> AnalysisResult<Vec<ParsedBallot>> {
    let mut res: Vec<ParsedBallot> = Vec::new();
    for (idx, line) in contents.lines().enumerate() {
        let lineno = idx + 1;
        if line.starts_with('#') {
            continue;
        }
        let (votes_part, ballot_part) = match line.split_once(':') {
            Some(parts) => parts,
            None => continue,
        };
        let votes_part = votes_part.trim();
        let count = votes_part
            .parse::<u64>()
            .ok()
            .context(ParsingVoteCountSnafu {
                lineno,
                text: votes_part,
            })?;

        let mut ranking: Vec<u32> = Vec::new();
        for token in ballot_part.trim().split(',') {
            // Only the digits matter: ties such as {1,2} are read as 1,2.
            let digits: String = token.chars().filter(|c| c.is_ascii_digit()).collect();
            if digits.is_empty() {
                continue;
            }
            let cid = digits
                .parse::<u32>()
                .ok()
                .context(ParsingCandidateSnafu {
                    lineno,
                    text: token.trim(),
                })?;
            ranking.push(cid);
        }
        debug!("parse_toi: lineno: {:?} count: {:?} ranking: {:?}", lineno, count, ranking);
        res.push(ParsedBallot {
            lineno,
            count,
            ranking,
        });
    }
    Ok(res)
}
