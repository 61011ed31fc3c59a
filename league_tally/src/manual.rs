/*!

This is the long-form manual for `league_tally` and `leaguestat`.

## Input tables

The engine consumes four delimited text tables, as exported by the league
service. Row 0 of every table is a header and is skipped. Columns are
addressed by position, not by name:

| Table       | Columns used | Meaning                          |
|-------------|--------------|----------------------------------|
| competitors | 0, 1         | id, display name                 |
| submissions | 0, 4, 7      | uri, submitter id, round id      |
| votes       | 0, 1, 3, 5   | uri, voter id, points, round id  |
| rounds      | 0, 2         | id, name                         |

The position of a row in the rounds table is its chronological order. The
tables carry no timestamps.

Parsing is recovery oriented: quoted fields may contain commas, newlines and
doubled quotes, `\r` is discarded everywhere, blank rows are dropped and a
missing final newline is tolerated. A malformed points value is read as 0.

## League rules

* Only competitors with at least one submission are on the board.
* A submitter banks the points a submission earned in a round only if they
  also cast at least one vote in that round. Skipping the voting phase
  forfeits that round's points entirely, no matter how popular the entry was.
  The rule never looks at who the vote came from.
* Voting relationships ("most voted for", "most support from", "least support
  from") accumulate across all rounds, independently of the gate above.
  Self votes are excluded from relationships but still count toward the
  submitter's own total when eligible.
* "Least support from" only considers voters who gave a non-zero total.
* The rankings history is cumulative: a competitor enters it in the first
  round they both submitted and voted, and stays in every later snapshot.
* Top-3 finishes are counted against round-local standings, which reset
  every round.
* Five-pointer counts record the intent to give the maximum score, whether
  or not the points ended up credited.

## Output

The binary assembles a single JSON document with the leaderboard, the
round-by-round rankings history, the voting patterns, the performance
metrics and a totals block. See the `leaguestat --help` output for the
flags controlling where it is written.

*/
