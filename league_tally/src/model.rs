// ********* Input data structures ***********

/// One row of the competitors table (columns 0 and 1: id, display name).
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CompetitorRecord {
    pub id: String,
    pub name: String,
}

/// One row of the rounds table (columns 0 and 2: id, name).
///
/// The position of the row in the table is the canonical chronological order
/// of the rounds. The tables carry no timestamp.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RoundRecord {
    pub id: String,
    pub name: String,
}

/// One row of the submissions table (columns 0, 4 and 7).
///
/// The uri is the stable key that links a vote back to its submitter.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SubmissionRecord {
    pub uri: String,
    pub submitter_id: String,
    pub round_id: String,
}

/// One row of the votes table (columns 0, 1, 3 and 5).
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VoteRecord {
    pub uri: String,
    pub voter_id: String,
    pub points: u32,
    pub round_id: String,
}

/// The four source tables, already lifted into typed records.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct LeagueData {
    pub competitors: Vec<CompetitorRecord>,
    pub submissions: Vec<SubmissionRecord>,
    pub votes: Vec<VoteRecord>,
    pub rounds: Vec<RoundRecord>,
}

fn field(row: &[String], idx: usize) -> String {
    row.get(idx).cloned().unwrap_or_default()
}

impl CompetitorRecord {
    pub fn from_row(row: &[String]) -> CompetitorRecord {
        CompetitorRecord {
            id: field(row, 0),
            name: field(row, 1),
        }
    }
}

impl RoundRecord {
    pub fn from_row(row: &[String]) -> RoundRecord {
        RoundRecord {
            id: field(row, 0),
            name: field(row, 2),
        }
    }
}

impl SubmissionRecord {
    pub fn from_row(row: &[String]) -> SubmissionRecord {
        SubmissionRecord {
            uri: field(row, 0),
            submitter_id: field(row, 4),
            round_id: field(row, 7),
        }
    }
}

impl VoteRecord {
    /// Numeric coercion happens here and nowhere else: a missing or
    /// malformed points field becomes 0.
    pub fn from_row(row: &[String]) -> VoteRecord {
        VoteRecord {
            uri: field(row, 0),
            voter_id: field(row, 1),
            points: row.get(3).and_then(|s| s.parse::<u32>().ok()).unwrap_or(0),
            round_id: field(row, 5),
        }
    }
}

impl LeagueData {
    /// Builds typed records from the raw parsed tables.
    ///
    /// Row 0 of every table is a header and is skipped.
    pub fn from_tables(
        competitors: &[Vec<String>],
        submissions: &[Vec<String>],
        votes: &[Vec<String>],
        rounds: &[Vec<String>],
    ) -> LeagueData {
        LeagueData {
            competitors: competitors
                .iter()
                .skip(1)
                .map(|r| CompetitorRecord::from_row(r))
                .collect(),
            submissions: submissions
                .iter()
                .skip(1)
                .map(|r| SubmissionRecord::from_row(r))
                .collect(),
            votes: votes.iter().skip(1).map(|r| VoteRecord::from_row(r)).collect(),
            rounds: rounds.iter().skip(1).map(|r| RoundRecord::from_row(r)).collect(),
        }
    }
}

// ******** Output data structures *********

/// One end of a voting relationship, with the cumulative points exchanged.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Support {
    pub name: String,
    pub points: u32,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LeaderboardEntry {
    pub id: String,
    pub name: String,
    pub points: u32,
    /// The recipient this competitor gave the most cumulative points to.
    pub most_voted_for: Option<Support>,
    /// The voter this competitor received the most cumulative points from.
    pub most_support_from: Option<Support>,
    /// The voter with the lowest non-zero cumulative points given to this
    /// competitor. Zero-point relationships are never selected.
    pub least_support_from: Option<Support>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Standing {
    pub id: String,
    pub name: String,
    pub points: u32,
    /// Dense rank, 1-based. Ties get distinct sequential ranks in sort order.
    pub rank: u32,
}

/// Cumulative standings after one round, restricted to the competitors who
/// have participated in that round or any earlier one.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RoundSnapshot {
    pub round_index: usize,
    pub round_name: String,
    pub standings: Vec<Standing>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PatternEntry {
    pub id: String,
    pub name: String,
    pub five_pointers: u32,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PerformanceEntry {
    pub id: String,
    pub name: String,
    pub top3_finishes: u32,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LeagueSummary {
    pub total_rounds: u32,
    /// The number of vote rows that were actually credited through the
    /// eligibility gate. Never exceeds the vote row count.
    pub total_votes: u64,
}

/// Everything the presentation layer consumes.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LeagueStats {
    pub leaderboard: Vec<LeaderboardEntry>,
    pub rankings_history: Vec<RoundSnapshot>,
    pub voting_patterns: Vec<PatternEntry>,
    pub performance_metrics: Vec<PerformanceEntry>,
    pub summary: LeagueSummary,
}
