use clap::Parser;

/// Tabulates the leaderboard and historical rankings of a music league from
/// its exported tables.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (directory path) The directory holding the four exported tables:
    /// competitors.csv, submissions.csv, votes.csv and rounds.csv.
    /// Individual table options below override the paths derived from it.
    #[clap(short, long, value_parser)]
    pub data_dir: Option<String>,

    /// (file path) The competitors table.
    #[clap(long, value_parser)]
    pub competitors: Option<String>,

    /// (file path) The submissions table.
    #[clap(long, value_parser)]
    pub submissions: Option<String>,

    /// (file path) The votes table.
    #[clap(long, value_parser)]
    pub votes: Option<String>,

    /// (file path) The rounds table.
    #[clap(long, value_parser)]
    pub rounds: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the league
    /// will be written in JSON format to the given location instead of the
    /// standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference summary in JSON format. If provided, leaguestat
    /// will check that the tabulated output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
