use std::time::Duration;

use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

use crate::chat::client::{ChatErr, PageDirection, PageSource};
use crate::constants::{PAGE_DELAY_MS, PAGE_SIZE};
use crate::db::models::{ChannelId, Message};
use crate::db::{MessageStore, StoreErr};

pub type SyncResult<T> = core::result::Result<T, SyncErr>;

#[derive(Debug, Error)]
pub enum SyncErr {
    #[error(transparent)]
    Chat(#[from] ChatErr),

    #[error(transparent)]
    Store(#[from] StoreErr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Download a channel's entire history from scratch.
    Bootstrap,
    /// Extend an existing archive with messages newer than the watermark.
    Incremental,
}

/// Drives the paged chat API one channel at a time and lands the result in
/// the message store. The message id is the sole pagination cursor in both
/// directions; `created_at` only ever determines archive order.
pub struct Synchronizer<'a> {
    source: &'a dyn PageSource,
    store: &'a MessageStore,
    page_size: usize,
    page_delay: Duration,
}

impl<'a> Synchronizer<'a> {
    pub fn new(source: &'a dyn PageSource, store: &'a MessageStore) -> Self {
        Self {
            source,
            store,
            page_size: PAGE_SIZE,
            page_delay: Duration::from_millis(PAGE_DELAY_MS),
        }
    }

    /// Override the inter-page rate-limit delay.
    pub fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }

    /// Sync every channel sequentially, returning the union of their
    /// archives. A channel that fails is logged and skipped; the rest still
    /// run.
    #[instrument(skip(self, channels), fields(channel_count = channels.len()))]
    pub async fn run_all(&self, channels: &[ChannelId], mode: SyncMode) -> Vec<Message> {
        let mut all = Vec::new();

        for &channel_id in channels {
            let result = match mode {
                SyncMode::Bootstrap => self.bootstrap(channel_id).await,
                SyncMode::Incremental => self.update(channel_id).await,
            };

            match result {
                Ok(messages) => all.extend(messages),
                Err(e) => {
                    error!(channel_id, error = %e, "channel sync failed, continuing with the rest");
                }
            }
        }

        all
    }

    /// Walk backward from the newest message until the server stops making
    /// progress, then persist everything collected. A page failure mid-walk
    /// ends the walk and keeps what was accumulated.
    #[instrument(skip(self))]
    pub async fn bootstrap(&self, channel_id: ChannelId) -> SyncResult<Vec<Message>> {
        info!(channel_id, "starting full history download");

        let mut collected = self
            .source
            .fetch_page(channel_id, None, PageDirection::Before, self.page_size)
            .await?;

        if collected.is_empty() {
            warn!(channel_id, "channel has no messages");
            return Ok(Vec::new());
        }

        let Some(mut anchor) = collected.iter().map(|m| m.id).min() else {
            return Ok(Vec::new());
        };

        loop {
            sleep(self.page_delay).await;

            let page = match self
                .source
                .fetch_page(channel_id, Some(anchor), PageDirection::Before, self.page_size)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    warn!(channel_id, anchor, error = %e, "page fetch failed, keeping what was collected");
                    break;
                }
            };

            let Some(oldest) = page.iter().map(|m| m.id).min() else {
                debug!(channel_id, "empty page, reached the beginning of history");
                break;
            };

            if oldest == anchor {
                // the server returned no progress; treat as the beginning,
                // not an error
                debug!(channel_id, anchor, "anchor did not advance, assuming end of history");
                break;
            }

            collected.extend(page);
            anchor = oldest;
        }

        let saved = self.store.save(channel_id, collected)?;
        info!(channel_id, total = saved.len(), "full download complete");
        Ok(saved)
    }

    /// Walk forward from the stored watermark and merge anything new into
    /// the archive. Any page failure leaves the prior archive untouched.
    #[instrument(skip(self))]
    pub async fn update(&self, channel_id: ChannelId) -> SyncResult<Vec<Message>> {
        let existing = self.store.load(channel_id);
        let Some(mut anchor) = existing.iter().map(|m| m.id).max() else {
            info!(channel_id, "no local archive, falling back to a full download");
            return self.bootstrap(channel_id).await;
        };

        let mut fresh: Vec<Message> = Vec::new();

        loop {
            let page = match self
                .source
                .fetch_page(channel_id, Some(anchor), PageDirection::After, self.page_size)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    warn!(channel_id, anchor, error = %e, "page fetch failed, archive unchanged");
                    return Ok(existing);
                }
            };

            // server paging boundaries are not exact, drop anything at or
            // behind the anchor
            let page: Vec<Message> = page.into_iter().filter(|m| m.id > anchor).collect();
            if page.is_empty() {
                break;
            }

            if let Some(newest) = page.iter().map(|m| m.id).max() {
                anchor = newest;
            }
            fresh.extend(page);

            sleep(self.page_delay).await;
        }

        if fresh.is_empty() {
            info!(channel_id, "channel already up to date");
            return Ok(existing);
        }

        info!(channel_id, new_count = fresh.len(), "found new messages");
        let merged: Vec<Message> = existing.into_iter().chain(fresh).collect();
        Ok(self.store.save(channel_id, merged)?)
    }
}
