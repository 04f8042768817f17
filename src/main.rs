use clap::Parser;
use thiserror::Error;

use crate::chat::{ChatClient, ChatErr, SyncMode, Synchronizer};
use crate::config::{Config, ConfigErr, Credentials};
use crate::db::MessageStore;
use crate::report::ReportErr;
use crate::stats::Aggregator;

mod args;
mod chat;
mod config;
mod constants;
mod db;
mod parsing;
mod publish;
mod report;
mod stats;
mod util;

#[derive(Debug, Error)]
enum RunnerErr {
    #[error(transparent)]
    Config(#[from] ConfigErr),

    #[error(transparent)]
    Chat(#[from] ChatErr),

    #[error(transparent)]
    Report(#[from] ReportErr),

    #[error("no messages available across the configured channels")]
    NoMessages,

    #[error("no valid game results found in any channel")]
    NoRecords,
}

type Result<T> = core::result::Result<T, RunnerErr>;

#[tokio::main]
async fn main() -> Result<()> {
    util::tracing::build_subscriber();

    let cli = args::Cli::parse();
    let config = Config::load(&cli.config)?;
    let credentials = Credentials::from_env()?;

    let client = ChatClient::new(&credentials)?;
    let store = MessageStore::new(&config.data_dir);
    let synchronizer = Synchronizer::new(&client, &store);

    let mode = if cli.init {
        SyncMode::Bootstrap
    } else {
        SyncMode::Incremental
    };

    let mut messages = synchronizer.run_all(&config.channels, mode).await;
    if messages.is_empty() {
        return Err(RunnerErr::NoMessages);
    }

    // union of all channels, processed in creation order so the
    // first-of-day rule is deterministic
    messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

    let records = parsing::extract_records(&messages);
    if records.is_empty() {
        return Err(RunnerErr::NoRecords);
    }

    let table = Aggregator::new(&config.players).aggregate(&records);
    report::write_report(&cli.out, &table)?;

    if let Some(managed_repo) = &config.publish_repo
        && let Err(e) = publish::publish(&cli.out, managed_repo).await
    {
        // the dashboard is already on disk, a failed push is not fatal
        tracing::error!(error = %e, "publish step failed");
    }

    Ok(())
}
