use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, info, instrument};

use crate::constants::ROUNDS_PER_GAME;
use crate::db::models::{Message, PlayerId, RoundScore, ScoreRecord};
use crate::parsing::grammar;

/// Turn the merged message stream into structured score records.
///
/// Messages are expected in `created_at` order so the first-submission-of-day
/// rule is deterministic: once a (player, day) pair has produced a record,
/// later submissions for that day are ignored. A candidate that fails the
/// grammar anywhere (missing total, wrong round count) is discarded whole;
/// partial games are never recorded.
#[instrument(skip(messages), fields(message_count = messages.len()))]
pub fn extract_records(messages: &[Message]) -> Vec<ScoreRecord> {
    let mut consumed: HashSet<(PlayerId, NaiveDate)> = HashSet::new();
    let mut records = Vec::new();

    for message in messages {
        if !grammar::is_result_header(&message.text) {
            continue;
        }

        let played_at = message.created_date();
        if consumed.contains(&(message.author_id, played_at)) {
            debug!(
                message_id = message.id,
                player_id = message.author_id,
                %played_at,
                "duplicate submission for the day, keeping the first"
            );
            continue;
        }

        let Some(total_score) = grammar::total_score(&message.text) else {
            debug!(message_id = message.id, "candidate without a parsable total");
            continue;
        };

        let rounds: Vec<RoundScore> = message
            .text
            .lines()
            .filter_map(grammar::round_line)
            .collect();

        if rounds.len() != ROUNDS_PER_GAME {
            debug!(
                message_id = message.id,
                round_count = rounds.len(),
                "discarding result without exactly {} valid rounds",
                ROUNDS_PER_GAME
            );
            continue;
        }

        consumed.insert((message.author_id, played_at));
        records.push(ScoreRecord {
            message_id: message.id,
            player_id: message.author_id,
            played_at,
            total_score,
            rounds,
        });
    }

    info!(record_count = records.len(), "extraction complete");
    records
}
