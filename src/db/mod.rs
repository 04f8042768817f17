use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::constants::ARCHIVE_FILE_PREFIX;
use crate::db::models::{ChannelId, Message};

pub mod models;

pub type StoreResult<T> = core::result::Result<T, StoreErr>;

#[derive(Debug, Error)]
pub enum StoreErr {
    #[error("archive io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Durable per-channel message archive. One JSON file per channel under the
/// configured data directory; writes are atomic (temp file then rename).
#[derive(Debug)]
pub struct MessageStore {
    data_dir: PathBuf,
}

impl MessageStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn archive_path(&self, channel_id: ChannelId) -> PathBuf {
        self.data_dir
            .join(format!("{}{}.json", ARCHIVE_FILE_PREFIX, channel_id))
    }

    /// Load the persisted archive for a channel. A missing file is an empty
    /// archive; a corrupt file is logged and also treated as empty so a bad
    /// write never wedges the whole run.
    #[instrument(skip(self))]
    pub fn load(&self, channel_id: ChannelId) -> Vec<Message> {
        let path = self.archive_path(channel_id);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no archive on disk yet");
                return Vec::new();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable archive, starting fresh");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Message>>(&raw) {
            Ok(messages) => {
                debug!(count = messages.len(), "loaded archive");
                messages
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt archive, starting fresh");
                Vec::new()
            }
        }
    }

    /// Canonicalize and persist a channel archive: dedupe by id (a later
    /// entry for the same id wins), sort ascending by creation time with id
    /// as the tie-break, then write atomically. Returns the canonical list.
    #[instrument(skip(self, messages), fields(incoming = messages.len()))]
    pub fn save(
        &self,
        channel_id: ChannelId,
        messages: Vec<Message>,
    ) -> StoreResult<Vec<Message>> {
        let mut by_id: BTreeMap<u64, Message> = BTreeMap::new();
        for message in messages {
            by_id.insert(message.id, message);
        }

        let mut canonical: Vec<Message> = by_id.into_values().collect();
        canonical.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        fs::create_dir_all(&self.data_dir)?;

        let path = self.archive_path(channel_id);
        let tmp = path.with_extension("json.tmp");
        let body = serde_json::to_string_pretty(&canonical)?;

        write_replace(&tmp, &path, &body)?;

        debug!(count = canonical.len(), path = %path.display(), "archive saved");
        Ok(canonical)
    }
}

fn write_replace(tmp: &Path, path: &Path, body: &str) -> StoreResult<()> {
    fs::write(tmp, body)?;
    if let Err(e) = fs::rename(tmp, path) {
        // never leave the temp file behind as ersatz state
        let _ = fs::remove_file(tmp);
        return Err(e.into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "guessr-board-store-{}-{}",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn message(id: u64, created_at: i64) -> Message {
        Message {
            id,
            channel_id: 7,
            author_id: 1,
            created_at,
            text: format!("message {}", id),
        }
    }

    #[test]
    fn save_dedupes_by_id_later_wins() {
        let store = MessageStore::new(scratch_dir("dedup"));

        let mut stale = message(10, 1_000);
        stale.text = "stale".into();
        let mut fresh = message(10, 1_000);
        fresh.text = "fresh".into();

        let saved = store.save(7, vec![stale, fresh]).unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].text, "fresh");
    }

    #[test]
    fn save_sorts_by_created_at() {
        let store = MessageStore::new(scratch_dir("sort"));

        let saved = store
            .save(7, vec![message(3, 3_000), message(1, 1_000), message(2, 2_000)])
            .unwrap();

        let times: Vec<i64> = saved.iter().map(|m| m.created_at).collect();
        assert_eq!(times, vec![1_000, 2_000, 3_000]);

        let ids: Vec<u64> = store.load(7).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let store = MessageStore::new(scratch_dir("atomic"));
        store.save(7, vec![message(1, 1_000)]).unwrap();

        assert!(store.archive_path(7).exists());
        assert!(!store.archive_path(7).with_extension("json.tmp").exists());
    }

    #[test]
    fn load_missing_archive_is_empty() {
        let store = MessageStore::new(scratch_dir("missing"));
        assert!(store.load(99).is_empty());
    }

    #[test]
    fn load_corrupt_archive_is_empty() {
        let dir = scratch_dir("corrupt");
        let store = MessageStore::new(&dir);

        fs::create_dir_all(&dir).unwrap();
        fs::write(store.archive_path(7), "{ not json").unwrap();

        assert!(store.load(7).is_empty());
    }
}
