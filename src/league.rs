use log::{debug, info, warn};

use league_tally::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;

#[derive(Debug, Snafu)]
pub enum LeagueError {
    #[snafu(display("Error reading table {path}"))]
    OpeningTable {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing summary {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display(""))]
    OpeningJson { source: std::io::Error },
    #[snafu(display(""))]
    ParsingJson { source: serde_json::Error },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type LeagueResult<T> = Result<T, LeagueError>;

// The paths of the four source tables, after resolving the CLI options.
#[derive(Eq, PartialEq, Debug, Clone)]
struct TablePaths {
    competitors: PathBuf,
    submissions: PathBuf,
    votes: PathBuf,
    rounds: PathBuf,
}

fn resolve_table(
    name: &str,
    default_file: &str,
    data_dir: &Option<String>,
    over: &Option<String>,
) -> LeagueResult<PathBuf> {
    match (over, data_dir) {
        (Some(p), _) => Ok(PathBuf::from(p)),
        (None, Some(dir)) => Ok([dir.as_str(), default_file].iter().collect()),
        (None, None) => {
            whatever!("No path provided for the {} table (use --data-dir or --{})", name, name)
        }
    }
}

fn resolve_paths(args: &Args) -> LeagueResult<TablePaths> {
    Ok(TablePaths {
        competitors: resolve_table("competitors", "competitors.csv", &args.data_dir, &args.competitors)?,
        submissions: resolve_table("submissions", "submissions.csv", &args.data_dir, &args.submissions)?,
        votes: resolve_table("votes", "votes.csv", &args.data_dir, &args.votes)?,
        rounds: resolve_table("rounds", "rounds.csv", &args.data_dir, &args.rounds)?,
    })
}

fn read_table(path: &Path) -> LeagueResult<Vec<Vec<String>>> {
    info!("Reading table {:?}", path);
    let text = fs::read_to_string(path).context(OpeningTableSnafu {
        path: path.display().to_string(),
    })?;
    let rows = parse_delimited(&text);
    debug!("read_table: {:?}: {} rows", path, rows.len());
    Ok(rows)
}

fn read_summary(path: &str) -> LeagueResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu {})?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
struct OutputStats {
    #[serde(rename = "totalRounds")]
    total_rounds: u32,
    #[serde(rename = "totalVotes")]
    total_votes: u64,
    competitors: usize,
}

fn support_to_json(s: &Option<Support>) -> JSValue {
    match s {
        Some(x) => json!({"name": x.name, "points": x.points}),
        None => JSValue::Null,
    }
}

fn stats_to_json(stats: &LeagueStats) -> JSValue {
    let leaderboard: Vec<JSValue> = stats
        .leaderboard
        .iter()
        .map(|e| {
            json!({
                "id": e.id,
                "name": e.name,
                "points": e.points,
                "mostVotedFor": support_to_json(&e.most_voted_for),
                "mostSupportFrom": support_to_json(&e.most_support_from),
                "leastSupportFrom": support_to_json(&e.least_support_from),
            })
        })
        .collect();

    let history: Vec<JSValue> = stats
        .rankings_history
        .iter()
        .map(|snap| {
            let standings: Vec<JSValue> = snap
                .standings
                .iter()
                .map(|s| json!({"id": s.id, "name": s.name, "points": s.points, "rank": s.rank}))
                .collect();
            json!({
                "roundIndex": snap.round_index,
                "roundName": snap.round_name,
                "standings": standings,
            })
        })
        .collect();

    let patterns: Vec<JSValue> = stats
        .voting_patterns
        .iter()
        .map(|p| json!({"id": p.id, "name": p.name, "fivePointers": p.five_pointers}))
        .collect();

    let performance: Vec<JSValue> = stats
        .performance_metrics
        .iter()
        .map(|p| json!({"id": p.id, "name": p.name, "top3Finishes": p.top3_finishes}))
        .collect();

    let output_stats = OutputStats {
        total_rounds: stats.summary.total_rounds,
        total_votes: stats.summary.total_votes,
        competitors: stats.leaderboard.len(),
    };

    json!({
        "stats": output_stats,
        "leaderboard": leaderboard,
        "rankingsHistory": history,
        "votingPatterns": patterns,
        "performanceMetrics": performance,
    })
}

pub fn run_league(args: &Args) -> LeagueResult<()> {
    let paths = resolve_paths(args)?;

    // The four tables are independent of each other. They are read in a
    // fixed order here; everything after this point is one deterministic
    // sequential pass.
    let data = LeagueData::from_tables(
        &read_table(&paths.competitors)?,
        &read_table(&paths.submissions)?,
        &read_table(&paths.votes)?,
        &read_table(&paths.rounds)?,
    );
    info!(
        "run_league: {} competitors, {} submissions, {} votes, {} rounds",
        data.competitors.len(),
        data.submissions.len(),
        data.votes.len(),
        data.rounds.len()
    );

    let stats = run_league_stats(&data);

    let result_js = stats_to_json(&stats);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    match &args.out {
        Some(p) if p != "stdout" => {
            info!("Writing summary to {}", p);
            fs::write(p, &pretty_js_stats).context(WritingSummarySnafu { path: p.clone() })?;
        }
        _ => println!("{}", pretty_js_stats),
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &args.reference {
        let summary_ref = read_summary(summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    const COMPETITORS: &str = "ID,Name\nc1,Alice\nc2,Bob\n";
    const ROUNDS: &str = "ID,Created,Name\nr1,2024-01-01,Covers\nr2,2024-02-01,One Hit Wonders\n";
    const SUBMISSIONS: &str = "\
Spotify URI,Created,Title,Album,Submitter ID,Artist,Comment,Round ID
uri:1,2024-01-02,Song A,Album A,c1,Artist A,,r1
uri:2,2024-01-02,Song B,Album B,c2,Artist B,,r1
uri:3,2024-02-02,Song C,Album C,c1,Artist C,,r2
uri:4,2024-02-02,Song D,Album D,c2,Artist D,,r2
";
    const VOTES: &str = "\
Spotify URI,Voter ID,Created,Points Assigned,Comment,Round ID
uri:2,c1,2024-01-03,3,,r1
uri:1,c2,2024-01-03,5,,r1
uri:4,c1,2024-02-03,oops,,r2
";

    fn make_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("leaguestat-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_tables(dir: &Path) {
        fs::write(dir.join("competitors.csv"), COMPETITORS).unwrap();
        fs::write(dir.join("rounds.csv"), ROUNDS).unwrap();
        fs::write(dir.join("submissions.csv"), SUBMISSIONS).unwrap();
        fs::write(dir.join("votes.csv"), VOTES).unwrap();
    }

    #[test]
    fn typed_records_default_malformed_points_to_zero() {
        let rows = parse_delimited(VOTES);
        let data = LeagueData::from_tables(
            &parse_delimited(COMPETITORS),
            &parse_delimited(SUBMISSIONS),
            &rows,
            &parse_delimited(ROUNDS),
        );
        assert_eq!(data.votes.len(), 3);
        assert_eq!(data.votes[0].points, 3);
        assert_eq!(data.votes[2].points, 0);
        assert_eq!(data.votes[2].round_id, "r2");
        assert_eq!(data.submissions[0].submitter_id, "c1");
        assert_eq!(data.submissions[0].round_id, "r1");
    }

    #[test]
    fn end_to_end_summary_from_files() {
        let dir = make_dir("e2e");
        write_tables(&dir);
        let out = dir.join("summary.json");

        let args = Args::parse_from([
            "leaguestat",
            "--data-dir",
            dir.to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
        ]);
        run_league(&args).unwrap();

        let js: JSValue = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(js["stats"]["totalRounds"], json!(2));
        // The round 2 vote went to Bob, who cast no vote in round 2, so only
        // the two round 1 votes were credited.
        assert_eq!(js["stats"]["totalVotes"], json!(2));
        assert_eq!(js["stats"]["competitors"], json!(2));
        assert_eq!(js["leaderboard"][0]["name"], json!("Alice"));
        assert_eq!(js["leaderboard"][0]["points"], json!(5));
        assert_eq!(js["leaderboard"][1]["points"], json!(3));
        assert_eq!(js["rankingsHistory"][0]["standings"][0]["rank"], json!(1));
        assert_eq!(js["leaderboard"][0]["mostVotedFor"]["name"], json!("Bob"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn reference_mismatch_is_an_error() {
        let dir = make_dir("ref");
        write_tables(&dir);
        let reference = dir.join("reference.json");
        fs::write(&reference, "{\"stats\": {}}").unwrap();

        let args = Args::parse_from([
            "leaguestat",
            "--data-dir",
            dir.to_str().unwrap(),
            "--out",
            dir.join("out.json").to_str().unwrap(),
            "--reference",
            reference.to_str().unwrap(),
        ]);
        assert!(run_league(&args).is_err());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_table_is_fatal() {
        let dir = make_dir("missing");
        // No tables written: retrieval failure must abort the whole run.
        let args = Args::parse_from(["leaguestat", "--data-dir", dir.to_str().unwrap()]);
        let res = run_league(&args);
        assert!(matches!(res, Err(LeagueError::OpeningTable { .. })));

        fs::remove_dir_all(&dir).unwrap();
    }
}
