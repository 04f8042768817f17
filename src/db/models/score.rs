use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::message::{MessageId, PlayerId};

/// Sub-scores for one of the five rounds in a daily game. Each side is the
/// sum over a 3-symbol marker cluster, so the range is 0..=6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundScore {
    pub location_score: u8,
    pub date_score: u8,
}

/// A fully parsed game result. Derived from the archive on every run, never
/// persisted; at most one per (player, day).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreRecord {
    pub message_id: MessageId,
    pub player_id: PlayerId,
    pub played_at: NaiveDate,
    pub total_score: u32,
    pub rounds: Vec<RoundScore>,
}

/// Per-player summary handed to the report renderer. This struct is the whole
/// contract with the dashboard template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStats {
    pub player_id: PlayerId,
    pub name: String,
    pub games_played: u32,
    pub average_score: u32,
    pub high_score: u32,
    pub low_score: u32,
    pub avg_location_score: f64,
    pub avg_date_score: f64,
    pub scores_by_date: BTreeMap<NaiveDate, u32>,
}
