pub use crate::model::*;

/// A builder for assembling league data without going through the delimited
/// text tables. Useful for tests and for embedding the engine in other tools.
///
/// ```
/// use league_tally::builder::LeagueBuilder;
/// use league_tally::run_league_stats;
///
/// let mut builder = LeagueBuilder::new();
/// builder
///     .competitor("anna", "Anna")
///     .competitor("bob", "Bob")
///     .round("r1", "Covers")
///     .submission("uri:1", "anna", "r1")
///     .submission("uri:2", "bob", "r1")
///     .vote("uri:2", "anna", 3, "r1")
///     .vote("uri:1", "bob", 5, "r1");
///
/// let stats = run_league_stats(&builder.build());
/// assert_eq!(stats.leaderboard[0].name, "Anna");
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct LeagueBuilder {
    data: LeagueData,
}

impl LeagueBuilder {
    pub fn new() -> LeagueBuilder {
        LeagueBuilder {
            data: LeagueData::default(),
        }
    }

    pub fn competitor(&mut self, id: &str, name: &str) -> &mut LeagueBuilder {
        self.data.competitors.push(CompetitorRecord {
            id: id.to_string(),
            name: name.to_string(),
        });
        self
    }

    /// Rounds are chronological in the order they are added.
    pub fn round(&mut self, id: &str, name: &str) -> &mut LeagueBuilder {
        self.data.rounds.push(RoundRecord {
            id: id.to_string(),
            name: name.to_string(),
        });
        self
    }

    pub fn submission(&mut self, uri: &str, submitter_id: &str, round_id: &str) -> &mut LeagueBuilder {
        self.data.submissions.push(SubmissionRecord {
            uri: uri.to_string(),
            submitter_id: submitter_id.to_string(),
            round_id: round_id.to_string(),
        });
        self
    }

    pub fn vote(&mut self, uri: &str, voter_id: &str, points: u32, round_id: &str) -> &mut LeagueBuilder {
        self.data.votes.push(VoteRecord {
            uri: uri.to_string(),
            voter_id: voter_id.to_string(),
            points,
            round_id: round_id.to_string(),
        });
        self
    }

    pub fn build(&self) -> LeagueData {
        self.data.clone()
    }
}
