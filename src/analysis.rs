use log::{debug, info, warn};

use snafu::prelude::*;
use stv_margin::builder::Builder;
use stv_margin::*;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::analysis::config_reader::*;
use crate::args::Args;

mod io_common;
mod io_toi;

#[derive(Debug, Snafu)]
pub enum AnalysisError {
    #[snafu(display("Error opening file {path}"))]
    OpeningInput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening the JSON file"))]
    OpeningJson { source: std::io::Error },
    #[snafu(display("Error reading or writing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Line {lineno}: cannot read the number of votes {text:?}"))]
    ParsingVoteCount { lineno: usize, text: String },
    #[snafu(display("Line {lineno}: cannot read the candidate {text:?}"))]
    ParsingCandidate { lineno: usize, text: String },
    #[snafu(display("No ballot file: use --input or a configuration file"))]
    MissingInput {},
    #[snafu(display("Provider not implemented {provider:?}"))]
    UnknownProvider { provider: String },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Invalid ballots: {source}"))]
    InvalidProfile { source: MarginErrors },
    #[snafu(display("Difference detected between calculated summary and reference summary"))]
    ReferenceMismatch {},
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// A ballot, as parsed by the readers.
/// This is before checking the candidates against the rules.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedBallot {
    pub lineno: usize,
    pub count: u64,
    pub ranking: Vec<u32>,
}

pub mod config_reader {
    use crate::analysis::*;

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct OutputSettings {
        #[serde(rename = "contestName")]
        pub contest_name: String,
        #[serde(rename = "outputDirectory")]
        pub output_directory: Option<String>,
    }

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct BallotFile {
        pub provider: String,
        #[serde(rename = "filePath")]
        pub file_path: String,
    }

    #[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
    pub struct RulesConfig {
        #[serde(rename = "numCandidates")]
        pub num_candidates: Option<u32>,
        #[serde(rename = "excludedCandidates")]
        pub excluded_candidates: Option<Vec<u32>>,
        #[serde(rename = "shuffleSeed")]
        pub shuffle_seed: Option<u32>,
        #[serde(rename = "ceilingSlack")]
        pub ceiling_slack: Option<u64>,
        #[serde(rename = "sizeSentinel")]
        pub size_sentinel: Option<u64>,
    }

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct AnalysisConfig {
        #[serde(rename = "outputSettings")]
        pub output_settings: OutputSettings,
        #[serde(rename = "ballotFile")]
        pub ballot_file: BallotFile,
        #[serde(default)]
        pub rules: RulesConfig,
    }

    impl AnalysisConfig {
        /// The configuration used when only a ballot file is given.
        pub fn for_input(path: &str, provider: Option<String>) -> AnalysisConfig {
            AnalysisConfig {
                output_settings: OutputSettings {
                    contest_name: io_common::simplify_file_name(path),
                    output_directory: None,
                },
                ballot_file: BallotFile {
                    provider: provider.unwrap_or_else(|| "toi".to_string()),
                    file_path: path.to_string(),
                },
                rules: RulesConfig::default(),
            }
        }
    }

    /// The configuration, as written in the summary.
    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct OutputConfig {
        pub contest: String,
        #[serde(rename = "numCandidates")]
        pub num_candidates: u32,
        #[serde(rename = "excludedCandidates")]
        pub excluded_candidates: Vec<u32>,
        #[serde(rename = "shuffleSeed")]
        pub shuffle_seed: Option<u32>,
    }

    pub fn read_config(path: &str) -> AnalysisResult<AnalysisConfig> {
        let contents = fs::read_to_string(path).context(OpeningJsonSnafu {})?;
        let config: AnalysisConfig =
            serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
        info!("config: {:?}", config);
        Ok(config)
    }

    pub fn read_summary(path: &str) -> AnalysisResult<JSValue> {
        let contents = fs::read_to_string(path).context(OpeningJsonSnafu {})?;
        debug!("read content: {:?}", contents);
        let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
        Ok(js)
    }
}

/// What to do with the results of the analysis.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RunOptions {
    pub skip_search: bool,
    pub out: Option<String>,
    pub reference: Option<String>,
}

fn read_ranking_data(path: &str, provider: &str) -> AnalysisResult<Vec<ParsedBallot>> {
    info!("Attempting to read ballot file {:?}", path);
    match provider {
        "toi" | "soi" | "toc" | "soc" => io_toi::read_toi(path),
        x => UnknownProviderSnafu { provider: x }.fail(),
    }
}

fn build_rules(rules_config: &RulesConfig, ballots: &[ParsedBallot]) -> AnalysisRules {
    let num_candidates = rules_config
        .num_candidates
        .unwrap_or_else(|| io_common::max_candidate(ballots));
    AnalysisRules {
        num_candidates,
        excluded_candidates: rules_config
            .excluded_candidates
            .clone()
            .unwrap_or_default()
            .into_iter()
            .map(CandidateId)
            .collect(),
        ceiling_slack: rules_config
            .ceiling_slack
            .unwrap_or(AnalysisRules::DEFAULT_CEILING_SLACK),
        size_sentinel: rules_config
            .size_sentinel
            .unwrap_or(AnalysisRules::DEFAULT_SIZE_SENTINEL),
    }
}

fn build_profile(ballots: &[ParsedBallot], rules: &AnalysisRules) -> AnalysisResult<Profile> {
    let mut builder = Builder::new(rules).context(InvalidProfileSnafu {})?;
    for pb in ballots.iter() {
        if let Err(e) = builder.add_vote(&pb.ranking, pb.count) {
            warn!("build_profile: line {}: {}", pb.lineno, e);
            return Err(e).context(InvalidProfileSnafu {});
        }
    }
    builder.build().context(InvalidProfileSnafu {})
}

fn candidates_to_json<'a>(cids: impl Iterator<Item = &'a CandidateId>) -> Vec<u32> {
    cids.map(|c| c.0).collect()
}

fn ballots_to_json(profile: &Profile) -> Vec<JSValue> {
    profile
        .ballots()
        .iter()
        .map(|b| json!({"count": b.count.0, "ranking": candidates_to_json(b.ranking.iter())}))
        .collect()
}

fn results_to_json(
    profile: &Profile,
    outcome: &StvOutcome,
    adjustments: &[(CandidateId, VoteCount)],
    search: Option<&CoalitionSearch>,
) -> JSValue {
    let elimination_order: Vec<JSValue> = outcome
        .elimination_order
        .iter()
        .enumerate()
        .map(|(idx, round)| json!({"round": idx + 1, "eliminated": candidates_to_json(round.iter())}))
        .collect();
    let minimum_adjustment: Vec<JSValue> = adjustments
        .iter()
        .map(|(cid, adj)| json!({"candidate": cid.0, "adjustment": adj.0}))
        .collect();
    let coalition: Option<JSValue> = search.map(|s| {
        json!({
            "target": s.target.map(|c| c.0),
            "size": s.size,
            "ballots": s.coalition.as_ref().map(ballots_to_json).unwrap_or_default()
        })
    });
    json!({
        "totalVoters": profile.total_weight().0,
        "winners": candidates_to_json(outcome.winners.iter()),
        "eliminationOrder": elimination_order,
        "minimumAdjustment": minimum_adjustment,
        "coalition": coalition
    })
}

fn build_summary_js(
    config: &AnalysisConfig,
    rules: &AnalysisRules,
    results: JSValue,
) -> JSValue {
    let c = OutputConfig {
        contest: config.output_settings.contest_name.clone(),
        num_candidates: rules.num_candidates,
        excluded_candidates: candidates_to_json(rules.excluded_candidates.iter()),
        shuffle_seed: config.rules.shuffle_seed,
    };
    json!({
        "config": c,
        "results": results })
}

fn write_summary(
    pretty_js: &str,
    config: &AnalysisConfig,
    root: &Path,
    opts: &RunOptions,
) -> AnalysisResult<()> {
    let out_path: Option<PathBuf> = match opts.out.as_deref() {
        Some("stdout") => None,
        Some(p) => Some(PathBuf::from(p)),
        None => config.output_settings.output_directory.as_ref().map(|d| {
            root.join(d)
                .join(format!("{}_summary.json", config.output_settings.contest_name))
        }),
    };
    match out_path {
        Some(p) => {
            let path = p.display().to_string();
            info!("Writing summary to {:?}", path);
            if let Some(parent) = p.parent() {
                fs::create_dir_all(parent).context(WritingOutputSnafu { path: path.clone() })?;
            }
            fs::write(&p, pretty_js).context(WritingOutputSnafu { path })?;
        }
        None => println!("stats:{}", pretty_js),
    }
    Ok(())
}

/// Runs the full analysis and returns the summary.
///
/// root: the directory against which the ballot file path is resolved.
pub fn run_analysis(
    config: &AnalysisConfig,
    root: &Path,
    opts: &RunOptions,
) -> AnalysisResult<JSValue> {
    let p: PathBuf = root.join(&config.ballot_file.file_path);
    let parsed_ballots = read_ranking_data(&p.display().to_string(), &config.ballot_file.provider)?;
    let rules = build_rules(&config.rules, &parsed_ballots);
    info!("rules: {:?}", rules);

    let mut profile = build_profile(&parsed_ballots, &rules)?;
    if let Some(seed) = config.rules.shuffle_seed {
        profile.shuffle(seed);
    }
    info!(
        "Processing {} voters in {} ballots, alternatives: {:?}",
        profile.total_weight(),
        profile.num_ballots(),
        profile.alternatives()
    );

    let outcome = stv_rule(&profile, rules.num_candidates);
    info!("STV winners: {:?}", outcome.winners);
    for (idx, eliminated) in outcome.elimination_order.iter().enumerate() {
        info!("Round {}: eliminated {:?}", idx + 1, eliminated);
    }

    let adjustments = minimum_adjustment(&profile, &rules);
    let search = if opts.skip_search {
        None
    } else {
        Some(find_minimal_coalition(&profile, &rules))
    };
    if let Some(CoalitionSearch {
        size,
        coalition: Some(coalition),
        target: Some(target),
    }) = &search
    {
        info!("Best coalition: {} voters for {}:\n{}", size, target, coalition);
    }

    let results = results_to_json(&profile, &outcome, &adjustments, search.as_ref());
    let summary_js = build_summary_js(config, &rules, results);
    let pretty_js_stats =
        serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;
    write_summary(&pretty_js_stats, config, root, opts)?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &opts.reference {
        let summary_ref = read_summary(summary_p)?;
        info!("summary: {:?}", summary_ref);
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            return ReferenceMismatchSnafu {}.fail();
        }
    }

    Ok(summary_js)
}

/// Assembles the configuration from the configuration file and the command line, and
/// runs the analysis.
pub fn run_from_args(args: &Args) -> AnalysisResult<()> {
    let (mut config, mut root) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            (config, root)
        }
        None => {
            let input = args.input.as_deref().context(MissingInputSnafu {})?;
            (AnalysisConfig::for_input(input, None), PathBuf::new())
        }
    };

    // Command line options take precedence.
    if let Some(input) = &args.input {
        config.ballot_file.file_path = input.clone();
        root = PathBuf::new();
    }
    if let Some(provider) = &args.input_type {
        config.ballot_file.provider = provider.clone();
    }
    if let Some(n) = args.num_candidates {
        config.rules.num_candidates = Some(n);
    }
    if !args.exclude.is_empty() {
        config.rules.excluded_candidates = Some(args.exclude.clone());
    }
    if let Some(seed) = args.seed {
        config.rules.shuffle_seed = Some(seed);
    }

    let opts = RunOptions {
        skip_search: args.skip_search,
        out: args.out.clone(),
        reference: args.reference.clone(),
    };
    run_analysis(&config, &root, &opts).map(|_| ())
}
