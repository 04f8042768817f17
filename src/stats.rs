use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use tracing::{info, instrument};

use crate::db::models::{PlayerId, PlayerStats, RoundScore, ScoreRecord};

/// Folds score records into the per-player summary table handed to the
/// report renderer. Name resolution goes through the caller-supplied table;
/// unknown ids get a generated placeholder.
pub struct Aggregator<'a> {
    names: &'a HashMap<PlayerId, String>,
}

impl<'a> Aggregator<'a> {
    pub fn new(names: &'a HashMap<PlayerId, String>) -> Self {
        Self { names }
    }

    #[instrument(skip(self, records), fields(record_count = records.len()))]
    pub fn aggregate(&self, records: &[ScoreRecord]) -> BTreeMap<PlayerId, PlayerStats> {
        let mut builders: BTreeMap<PlayerId, StatsBuilder> = BTreeMap::new();
        for record in records {
            builders.entry(record.player_id).or_default().push(record);
        }

        let table: BTreeMap<PlayerId, PlayerStats> = builders
            .into_iter()
            .filter_map(|(player_id, builder)| {
                builder
                    .build(player_id, self.display_name(player_id))
                    .map(|stats| (player_id, stats))
            })
            .collect();

        info!(player_count = table.len(), "aggregation complete");
        table
    }

    fn display_name(&self, player_id: PlayerId) -> String {
        self.names
            .get(&player_id)
            .cloned()
            .unwrap_or_else(|| format!("Player {}", player_id))
    }
}

/// Accumulates one player's raw material (totals, rounds, date map) before
/// emitting an immutable `PlayerStats`.
#[derive(Debug, Default)]
struct StatsBuilder {
    totals: Vec<u32>,
    rounds: Vec<RoundScore>,
    scores_by_date: BTreeMap<NaiveDate, u32>,
}

impl StatsBuilder {
    fn push(&mut self, record: &ScoreRecord) {
        self.totals.push(record.total_score);
        self.rounds.extend(record.rounds.iter().copied());
        self.scores_by_date
            .insert(record.played_at, record.total_score);
    }

    fn build(self, player_id: PlayerId, name: String) -> Option<PlayerStats> {
        if self.totals.is_empty() {
            return None;
        }

        let games_played = self.totals.len() as u32;
        let score_sum: u64 = self.totals.iter().map(|s| u64::from(*s)).sum();
        let round_count = self.rounds.len() as f64;
        let location_sum: u32 = self.rounds.iter().map(|r| u32::from(r.location_score)).sum();
        let date_sum: u32 = self.rounds.iter().map(|r| u32::from(r.date_score)).sum();

        Some(PlayerStats {
            player_id,
            name,
            games_played,
            average_score: (score_sum as f64 / f64::from(games_played)).round() as u32,
            high_score: self.totals.iter().copied().max().unwrap_or(0),
            low_score: self.totals.iter().copied().min().unwrap_or(0),
            avg_location_score: round2(f64::from(location_sum) / round_count),
            avg_date_score: round2(f64::from(date_sum) / round_count),
            scores_by_date: self.scores_by_date,
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Message;
    use crate::parsing::extract_records;
    use crate::parsing::extract::tests::{game_message, result_text, DAY_MS, NOON_UTC};

    fn record(player_id: u64, played_at: NaiveDate, total: u32, rounds: &[(u8, u8)]) -> ScoreRecord {
        ScoreRecord {
            message_id: total as u64,
            player_id,
            played_at,
            total_score: total,
            rounds: rounds
                .iter()
                .map(|&(location_score, date_score)| RoundScore {
                    location_score,
                    date_score,
                })
                .collect(),
        }
    }

    fn day(offset: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1 + offset).unwrap()
    }

    #[test]
    fn aggregation_arithmetic() {
        let names = HashMap::new();
        let rounds = [(6, 3), (4, 2), (2, 1), (0, 0), (3, 4)];
        let records = vec![
            record(10, day(0), 100, &rounds),
            record(10, day(1), 200, &rounds),
            record(10, day(2), 300, &rounds),
        ];

        let table = Aggregator::new(&names).aggregate(&records);
        let stats = &table[&10];

        assert_eq!(stats.games_played, 3);
        assert_eq!(stats.average_score, 200);
        assert_eq!(stats.high_score, 300);
        assert_eq!(stats.low_score, 100);
        assert_eq!(stats.avg_location_score, 3.0);
        assert_eq!(stats.avg_date_score, 2.0);
        assert_eq!(stats.scores_by_date.len(), 3);
        assert_eq!(stats.scores_by_date[&day(1)], 200);
    }

    #[test]
    fn average_rounds_half_up() {
        let names = HashMap::new();
        let rounds = [(1, 1); 5];
        let records = vec![
            record(10, day(0), 101, &rounds),
            record(10, day(1), 102, &rounds),
        ];

        let table = Aggregator::new(&names).aggregate(&records);
        assert_eq!(table[&10].average_score, 102); // 101.5 rounds up
    }

    #[test]
    fn sub_scores_round_to_two_decimals() {
        let names = HashMap::new();
        // location sum 7 over 5 rounds = 1.4, date sum 8 over 5 = 1.6
        let records = vec![record(
            10,
            day(0),
            1_000,
            &[(2, 2), (2, 2), (1, 2), (1, 1), (1, 1)],
        )];

        let table = Aggregator::new(&names).aggregate(&records);
        assert_eq!(table[&10].avg_location_score, 1.4);
        assert_eq!(table[&10].avg_date_score, 1.6);
    }

    #[test]
    fn name_lookup_with_placeholder_fallback() {
        let names = HashMap::from([(10, "Alice".to_string())]);
        let rounds = [(1, 1); 5];
        let records = vec![
            record(10, day(0), 100, &rounds),
            record(11, day(0), 100, &rounds),
        ];

        let table = Aggregator::new(&names).aggregate(&records);
        assert_eq!(table[&10].name, "Alice");
        assert_eq!(table[&11].name, "Player 11");
    }

    #[test]
    fn players_without_records_are_omitted() {
        let names = HashMap::from([(99, "Ghost".to_string())]);
        let table = Aggregator::new(&names).aggregate(&[]);
        assert!(table.is_empty());
    }

    /// Full extractor -> aggregator pass over a synthetic two-channel feed:
    /// ten messages with one malformed result, one duplicate-day result, and
    /// plain chatter mixed in.
    #[test]
    fn pipeline_over_synthetic_history() {
        let truncated = result_text("33,000")
            .lines()
            .take(5)
            .collect::<Vec<_>>()
            .join("\n");

        let mut messages: Vec<Message> = vec![
            game_message(1, 10, NOON_UTC, result_text("30,000")),
            // same player, same day: ignored
            game_message(2, 10, NOON_UTC + 60_000, result_text("49,000")),
            game_message(3, 10, NOON_UTC + DAY_MS, result_text("20,000")),
            game_message(4, 10, NOON_UTC + 2 * DAY_MS, result_text("10,000")),
            // four rounds only: discarded whole
            game_message(5, 11, NOON_UTC, truncated),
            game_message(6, 11, NOON_UTC + 60_000, result_text("41,500")),
            game_message(7, 12, NOON_UTC, "nice!".into()),
            game_message(8, 12, NOON_UTC + DAY_MS, "rigged".into()),
            game_message(9, 11, NOON_UTC + DAY_MS, result_text("49,543")),
            // header with no round lines: discarded
            game_message(10, 13, NOON_UTC, "TimeGuessr #412 9,000/50,000".into()),
        ];
        for message in messages.iter_mut().skip(4) {
            // half the traffic on the second channel, irrelevant to results
            if message.id % 2 == 0 {
                message.channel_id = 2;
            }
        }
        messages.sort_by_key(|m| m.created_at);

        let records = extract_records(&messages);
        assert_eq!(records.len(), 5);

        let names = HashMap::from([(10, "Alice".to_string()), (11, "Bob".to_string())]);
        let table = Aggregator::new(&names).aggregate(&records);

        assert_eq!(table.len(), 2);

        let alice = &table[&10];
        assert_eq!(alice.name, "Alice");
        assert_eq!(alice.games_played, 3);
        assert_eq!(alice.average_score, 20_000);
        assert_eq!(alice.high_score, 30_000);
        assert_eq!(alice.low_score, 10_000);
        assert_eq!(alice.avg_location_score, 4.0);
        assert_eq!(alice.avg_date_score, 3.8);
        assert_eq!(alice.scores_by_date.len(), 3);

        let bob = &table[&11];
        assert_eq!(bob.name, "Bob");
        assert_eq!(bob.games_played, 2);
        assert_eq!(bob.average_score, 45_522); // 45,521.5 rounds up
        assert_eq!(bob.high_score, 49_543);
        assert_eq!(bob.low_score, 41_500);

        assert!(!table.contains_key(&12));
        assert!(!table.contains_key(&13));
    }
}
