use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

pub type MessageId = u64;
pub type ChannelId = u64;
pub type PlayerId = u64;

/// One chat post as returned by the paged list endpoint and as stored in a
/// channel archive. Immutable once fetched; identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "post_id")]
    pub id: MessageId,

    #[serde(default)]
    pub channel_id: ChannelId,

    #[serde(rename = "creator_id")]
    pub author_id: PlayerId,

    /// Creation time in epoch milliseconds.
    #[serde(rename = "create_at")]
    pub created_at: i64,

    #[serde(rename = "message", default)]
    pub text: String,
}

impl Message {
    /// Calendar date of the post in local time, floored to the day. Game-day
    /// dedup keys off this value.
    pub fn created_date(&self) -> NaiveDate {
        let utc = DateTime::from_timestamp_millis(self.created_at).unwrap_or_default();
        utc.with_timezone(&Local).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_date_floors_to_day() {
        let a = Message {
            id: 1,
            channel_id: 1,
            author_id: 1,
            // 2024-03-01T12:00:00Z
            created_at: 1_709_294_400_000,
            text: String::new(),
        };
        let b = Message {
            // same day, three hours later
            created_at: a.created_at + 3 * 60 * 60 * 1000,
            ..a.clone()
        };

        assert_eq!(a.created_date(), b.created_date());
    }
}
