use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::constants::{DEFAULT_CONFIG, DEFAULT_OUTPUT};

#[derive(Parser, Debug)]
#[command(
    name = "guessr-board",
    about = "Synchronize chat history and render the TimeGuessr dashboard",
    group(ArgGroup::new("mode").required(true).args(["init", "update"]))
)]
pub struct Cli {
    /// Download the full message history for every configured channel
    #[arg(long)]
    pub init: bool,

    /// Extend existing archives with messages newer than the stored watermark
    #[arg(long)]
    pub update: bool,

    /// Path to the JSON config file
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Output path for the rendered dashboard
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub out: PathBuf,
}
