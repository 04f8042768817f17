use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::db::models::{ChannelId, PlayerId};

pub type ConfigResult<T> = core::result::Result<T, ConfigErr>;

#[derive(Debug, Error)]
pub enum ConfigErr {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing environment variable: {0}")]
    MissingVar(&'static str),

    #[error("no channels configured")]
    NoChannels,
}

/// Operator configuration, read once and passed into constructors explicitly.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Channel ids to synchronize and scan for results.
    pub channels: Vec<ChannelId>,

    /// Player id to display-name table; unmapped ids get a placeholder.
    #[serde(default)]
    pub players: HashMap<PlayerId, String>,

    /// Directory holding the per-channel archive files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Name of the managed output repository folder. When the output path
    /// sits inside it, the publisher commits and pushes the result.
    #[serde(default)]
    pub publish_repo: Option<String>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Config {
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let raw = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;

        if config.channels.is_empty() {
            return Err(ConfigErr::NoChannels);
        }

        debug!(
            channels = config.channels.len(),
            players = config.players.len(),
            "config loaded"
        );
        Ok(config)
    }
}

/// Session credentials for the chat API, sourced from the environment (or a
/// `.env` file) so they never live next to the channel config.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub chat_api_url: String,
    pub chat_cookie: String,
    pub chat_token: String,
}

impl Credentials {
    pub fn from_env() -> ConfigResult<Self> {
        // a missing .env file is fine, the vars may come from the shell
        let _ = dotenvy::dotenv();

        Ok(Self {
            chat_api_url: require("CHAT_API_URL")?,
            chat_cookie: require("CHAT_COOKIE")?,
            chat_token: require("CHAT_TOKEN")?,
        })
    }
}

fn require(key: &'static str) -> ConfigResult<String> {
    std::env::var(key).map_err(|_| ConfigErr::MissingVar(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_parses_full_shape() {
        let raw = r#"{
            "channels": [463, 290],
            "players": { "1": "Alice", "2": "Bob" },
            "data_dir": "/var/lib/guessr-board",
            "publish_repo": "ToolsWebsite"
        }"#;

        let config: Config = serde_json::from_str(raw).unwrap();
        assert_eq!(config.channels, vec![463, 290]);
        assert_eq!(config.players[&1], "Alice");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/guessr-board"));
        assert_eq!(config.publish_repo.as_deref(), Some("ToolsWebsite"));
    }

    #[test]
    fn config_defaults_apply() {
        let config: Config = serde_json::from_str(r#"{ "channels": [463] }"#).unwrap();
        assert!(config.players.is_empty());
        assert_eq!(config.data_dir, PathBuf::from("."));
        assert!(config.publish_repo.is_none());
    }
}
