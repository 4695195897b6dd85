use clap::Parser;

/// Single transferable vote analysis: outcome, minimum adjustments and the smallest
/// coalitions that change the winner.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the analysis (ballot file, rules, output).
    /// For more information about the file format, read the documentation of the manual.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference file containing the summary of the analysis in JSON format. If provided,
    /// stvmargin will check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the analysis will be written in JSON
    /// format to the given location. Setting this option overrides the output directory that may be
    /// specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) The ballot file. Setting this option overrides what may be specified
    /// with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default toi) The type of the input. Only the PrefLib 'votes:ranking' formats are supported
    /// (toi, soi, toc, soc).
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (number, optional) The candidates are numbered from 1 to this number. By default, the largest
    /// candidate found in the ballots.
    #[clap(short, long, value_parser)]
    pub num_candidates: Option<u32>,

    /// (number, repeated) A candidate that is never analyzed as a possible winner.
    #[clap(short, long, value_parser)]
    pub exclude: Vec<u32>,

    /// (number, optional) If specified, the ballots are shuffled with this seed before the search.
    #[clap(long, value_parser)]
    pub seed: Option<u32>,

    /// If passed as an argument, only the outcome and the minimum adjustments are computed.
    #[clap(long, takes_value = false)]
    pub skip_search: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
