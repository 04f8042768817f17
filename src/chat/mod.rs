pub mod client;
pub mod sync;

pub use client::{ChatClient, ChatErr};
pub use sync::{SyncMode, Synchronizer};
