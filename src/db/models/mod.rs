pub mod message;
pub mod score;

pub use message::{ChannelId, Message, MessageId, PlayerId};
pub use score::{PlayerStats, RoundScore, ScoreRecord};
