//! Errors that stop the bot as a whole. Problems with a single command are
//! answered in chat instead and never surface here.

use thiserror::Error;

use crate::config::ConfigError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("player store error: {0}")]
    Store(#[from] StoreError),
    #[error("cannot format config: {0}")]
    Json(#[from] serde_json::Error),
}
