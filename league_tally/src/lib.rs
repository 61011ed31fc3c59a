mod model;
mod parser;
pub mod builder;
pub mod manual;

use log::{debug, info};

use std::collections::{HashMap, HashSet};

pub use crate::model::*;
pub use crate::parser::parse_delimited;

// **** Private structures ****

/// A points accumulator that iterates in first-insertion order.
///
/// The strict-max and strict-min scans over these tallies resolve ties to the
/// first key encountered, so pinning iteration to insertion order is what
/// makes tie-breaks reproducible across runs. Lookups are linear, which is
/// fine for the handful of competitors a league has.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
struct OrderedTally {
    entries: Vec<(String, u32)>,
}

impl OrderedTally {
    fn new() -> OrderedTally {
        OrderedTally { entries: Vec::new() }
    }

    fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == id)
    }

    /// Registers a key with a zero count, keeping the first insertion.
    fn register(&mut self, id: &str) {
        if !self.contains(id) {
            self.entries.push((id.to_string(), 0));
        }
    }

    /// Adds to an already registered key. Unknown keys are ignored.
    fn add(&mut self, id: &str, points: u32) {
        if let Some(e) = self.entries.iter_mut().find(|(k, _)| k == id) {
            e.1 += points;
        }
    }

    /// Adds to a key, registering it on first sight.
    fn bump(&mut self, id: &str, points: u32) {
        match self.entries.iter_mut().find(|(k, _)| k == id) {
            Some(e) => e.1 += points,
            None => self.entries.push((id.to_string(), points)),
        }
    }

    fn iter(&self) -> impl Iterator<Item = &(String, u32)> {
        self.entries.iter()
    }
}

/// Lookup structures built in one pass per source table.
#[derive(Eq, PartialEq, Debug, Clone)]
struct LeagueIndex {
    /// Competitor id to display name. First occurrence wins on duplicates.
    competitor_name: HashMap<String, String>,
    /// Ids in competitor-table order.
    competitor_order: Vec<String>,
    /// Submission uri to (submitter id, round id). Last occurrence wins.
    submission_info: HashMap<String, (String, String)>,
    /// Competitors with at least one submission across the whole league.
    /// Fixed before any points are computed.
    active: HashSet<String>,
    /// The same set, in first-appearance order in the submissions table.
    active_order: Vec<String>,
    /// Submitter ids per round, in first-appearance order.
    submitters_per_round: HashMap<String, Vec<String>>,
    /// Everyone who cast at least one vote in a round.
    voters_per_round: HashMap<String, HashSet<String>>,
}

impl LeagueIndex {
    /// The central eligibility rule: a submitter only banks points from a
    /// round if they also cast at least one vote in that round. Skipping the
    /// voting phase forfeits everything the submission earned there.
    ///
    /// Note that the rule never looks at who the vote came from. This is the
    /// league's actual rule, not an approximation.
    fn is_eligible(&self, round_id: &str, submitter_id: &str) -> bool {
        self.voters_per_round
            .get(round_id)
            .map_or(false, |voters| voters.contains(submitter_id))
    }

    fn display_name(&self, id: &str) -> String {
        self.competitor_name
            .get(id)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string())
    }

    fn round_submitters(&self, round_id: &str) -> &[String] {
        match self.submitters_per_round.get(round_id) {
            Some(subs) => subs.as_slice(),
            None => &[],
        }
    }
}

fn build_index(data: &LeagueData) -> LeagueIndex {
    let mut competitor_name: HashMap<String, String> = HashMap::new();
    let mut competitor_order: Vec<String> = Vec::new();
    for c in data.competitors.iter() {
        if !competitor_name.contains_key(&c.id) {
            competitor_name.insert(c.id.clone(), c.name.clone());
            competitor_order.push(c.id.clone());
        }
    }

    let mut submission_info: HashMap<String, (String, String)> = HashMap::new();
    let mut active: HashSet<String> = HashSet::new();
    let mut active_order: Vec<String> = Vec::new();
    let mut submitters_per_round: HashMap<String, Vec<String>> = HashMap::new();
    for s in data.submissions.iter() {
        submission_info.insert(s.uri.clone(), (s.submitter_id.clone(), s.round_id.clone()));
        if !s.submitter_id.is_empty() && active.insert(s.submitter_id.clone()) {
            active_order.push(s.submitter_id.clone());
        }
        if !s.submitter_id.is_empty() && !s.round_id.is_empty() {
            let subs = submitters_per_round.entry(s.round_id.clone()).or_default();
            if !subs.contains(&s.submitter_id) {
                subs.push(s.submitter_id.clone());
            }
        }
    }

    let mut voters_per_round: HashMap<String, HashSet<String>> = HashMap::new();
    for v in data.votes.iter() {
        voters_per_round
            .entry(v.round_id.clone())
            .or_default()
            .insert(v.voter_id.clone());
    }

    debug!(
        "build_index: {} competitors ({} active), {} submissions, {} rounds with submitters",
        competitor_order.len(),
        active.len(),
        submission_info.len(),
        submitters_per_round.len()
    );

    LeagueIndex {
        competitor_name,
        competitor_order,
        submission_info,
        active,
        active_order,
        submitters_per_round,
        voters_per_round,
    }
}

/// The voter with the highest cumulative points in the tally, or None if the
/// tally is empty or all zero. Ties keep the first-inserted key.
fn strongest_link(tally: &OrderedTally) -> Option<(String, u32)> {
    let mut best: Option<(String, u32)> = None;
    for (id, pts) in tally.iter() {
        if *pts > best.as_ref().map_or(0, |b| b.1) {
            best = Some((id.clone(), *pts));
        }
    }
    best
}

/// The voter with the lowest non-zero cumulative points in the tally.
/// Zero-point relationships are excluded entirely, not treated as least.
fn weakest_link(tally: &OrderedTally) -> Option<(String, u32)> {
    let mut worst: Option<(String, u32)> = None;
    for (id, pts) in tally.iter() {
        if *pts > 0 && worst.as_ref().map_or(true, |w| *pts < w.1) {
            worst = Some((id.clone(), *pts));
        }
    }
    worst
}

fn support(idx: &LeagueIndex, link: Option<(String, u32)>) -> Option<Support> {
    link.map(|(id, points)| Support {
        name: idx.display_name(&id),
        points,
    })
}

/// One pass over the votes table: total points per active competitor, the
/// voter to submitter relationship maps, the credited-vote count and the
/// five-pointer generosity counters.
fn tally_votes(
    data: &LeagueData,
    idx: &LeagueIndex,
) -> (Vec<LeaderboardEntry>, Vec<PatternEntry>, u64) {
    // Accumulators are keyed in competitor-table order so that competitors
    // with equal totals surface in table order after the stable sort.
    let mut points = OrderedTally::new();
    let mut five_pointers = OrderedTally::new();
    for id in idx.competitor_order.iter() {
        if idx.active.contains(id) {
            points.register(id);
            five_pointers.register(id);
        }
    }

    let mut given: HashMap<String, OrderedTally> = HashMap::new();
    let mut received: HashMap<String, OrderedTally> = HashMap::new();

    let mut total_votes: u64 = 0;
    for v in data.votes.iter() {
        // Counts the intent to give the maximum, whether or not the points
        // end up credited.
        if v.points == 5 {
            five_pointers.add(&v.voter_id, 1);
        }

        let (submitter_id, submitted_round) = match idx.submission_info.get(&v.uri) {
            Some(info) => info,
            None => continue,
        };
        if submitted_round != &v.round_id {
            debug!(
                "tally_votes: vote on {} recorded against round {} but submitted in round {}",
                v.uri, v.round_id, submitted_round
            );
        }

        // Votes are scoped to the round recorded on the vote row itself.
        if points.contains(submitter_id) && idx.is_eligible(&v.round_id, submitter_id) {
            points.add(submitter_id, v.points);
            total_votes += 1;
        }

        // Relationship bookkeeping is independent of the gate above. Self
        // votes are not a relationship with someone else and are skipped.
        if !v.voter_id.is_empty() && !submitter_id.is_empty() && v.voter_id != *submitter_id {
            given
                .entry(v.voter_id.clone())
                .or_default()
                .bump(submitter_id, v.points);
            received
                .entry(submitter_id.clone())
                .or_default()
                .bump(&v.voter_id, v.points);
        }
    }

    let empty = OrderedTally::new();
    let mut leaderboard: Vec<LeaderboardEntry> = points
        .iter()
        .map(|(id, pts)| {
            let g = given.get(id).unwrap_or(&empty);
            let r = received.get(id).unwrap_or(&empty);
            LeaderboardEntry {
                id: id.clone(),
                name: idx.display_name(id),
                points: *pts,
                most_voted_for: support(idx, strongest_link(g)),
                most_support_from: support(idx, strongest_link(r)),
                least_support_from: support(idx, weakest_link(r)),
            }
        })
        .collect();
    // Stable: equal totals keep their prior relative order.
    leaderboard.sort_by(|a, b| b.points.cmp(&a.points));

    let mut patterns: Vec<PatternEntry> = five_pointers
        .iter()
        .map(|(id, count)| PatternEntry {
            id: id.clone(),
            name: idx.display_name(id),
            five_pointers: *count,
        })
        .collect();
    patterns.sort_by(|a, b| b.five_pointers.cmp(&a.five_pointers));

    (leaderboard, patterns, total_votes)
}

/// Cumulative standings after each round, in the chronological order given by
/// the rounds table.
///
/// A competitor enters the history the first round they both submitted and
/// voted, and stays in every later snapshot with whatever points they have
/// frozen at. Early snapshots therefore carry fewer entries than late ones.
fn rankings_history(data: &LeagueData, idx: &LeagueIndex) -> Vec<RoundSnapshot> {
    let mut cumulative = OrderedTally::new();
    for id in idx.active_order.iter() {
        cumulative.register(id);
    }
    let mut participated: HashSet<String> = HashSet::new();

    let mut history: Vec<RoundSnapshot> = Vec::new();
    for (round_index, round) in data.rounds.iter().enumerate() {
        for submitter_id in idx.round_submitters(&round.id) {
            if idx.is_eligible(&round.id, submitter_id) {
                participated.insert(submitter_id.clone());
            }
        }

        for v in data.votes.iter().filter(|v| v.round_id == round.id) {
            let (submitter_id, _) = match idx.submission_info.get(&v.uri) {
                Some(info) => info,
                None => continue,
            };
            if cumulative.contains(submitter_id) && idx.is_eligible(&round.id, submitter_id) {
                cumulative.add(submitter_id, v.points);
            }
        }

        let mut standings: Vec<Standing> = cumulative
            .iter()
            .filter(|(id, _)| participated.contains(id))
            .map(|(id, pts)| Standing {
                id: id.clone(),
                name: idx.display_name(id),
                points: *pts,
                rank: 0,
            })
            .collect();
        standings.sort_by(|a, b| b.points.cmp(&a.points));
        for (i, s) in standings.iter_mut().enumerate() {
            s.rank = (i + 1) as u32;
        }

        history.push(RoundSnapshot {
            round_index,
            round_name: round.name.clone(),
            standings,
        });
    }
    history
}

/// Top-3 finishes per competitor, from round-local standings.
///
/// This is a separate ranking from the cumulative history: the round-local
/// tally resets every round and only covers that round's votes.
fn performance_metrics(data: &LeagueData, idx: &LeagueIndex) -> Vec<PerformanceEntry> {
    let mut top3 = OrderedTally::new();
    for id in idx.active_order.iter() {
        top3.register(id);
    }

    for round in data.rounds.iter() {
        let mut round_points = OrderedTally::new();
        for submitter_id in idx.round_submitters(&round.id) {
            if idx.is_eligible(&round.id, submitter_id) {
                round_points.register(submitter_id);
            }
        }

        for v in data.votes.iter().filter(|v| v.round_id == round.id) {
            let (submitter_id, _) = match idx.submission_info.get(&v.uri) {
                Some(info) => info,
                None => continue,
            };
            if round_points.contains(submitter_id) && idx.is_eligible(&round.id, submitter_id) {
                round_points.add(submitter_id, v.points);
            }
        }

        let mut standings: Vec<(String, u32)> = round_points.iter().cloned().collect();
        standings.sort_by(|a, b| b.1.cmp(&a.1));
        for (id, _) in standings.iter().take(3) {
            top3.bump(id, 1);
        }
    }

    let mut res: Vec<PerformanceEntry> = top3
        .iter()
        .map(|(id, count)| PerformanceEntry {
            id: id.clone(),
            name: idx.display_name(id),
            top3_finishes: *count,
        })
        .collect();
    res.sort_by(|a, b| b.top3_finishes.cmp(&a.top3_finishes));
    res
}

/// Computes the full set of league statistics from the four source tables.
///
/// Everything is recomputed from scratch: there is no cached or shared state,
/// so the function is re-entrant and deterministic. Referential misses (a
/// vote pointing at an unknown submission, an id missing from the competitors
/// table) are absorbed as documented defaults, never surfaced as errors.
pub fn run_league_stats(data: &LeagueData) -> LeagueStats {
    info!(
        "run_league_stats: {} competitors, {} submissions, {} votes, {} rounds",
        data.competitors.len(),
        data.submissions.len(),
        data.votes.len(),
        data.rounds.len()
    );

    let idx = build_index(data);

    let (leaderboard, voting_patterns, total_votes) = tally_votes(data, &idx);
    let rankings_history = rankings_history(data, &idx);
    let performance_metrics = performance_metrics(data, &idx);

    info!(
        "run_league_stats: {} active competitors, {} credited votes",
        leaderboard.len(),
        total_votes
    );

    LeagueStats {
        leaderboard,
        rankings_history,
        voting_patterns,
        performance_metrics,
        summary: LeagueSummary {
            total_rounds: data.rounds.len() as u32,
            total_votes,
        },
    }
}
