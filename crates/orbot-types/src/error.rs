use std::path::PathBuf;

use thiserror::Error;

/// Errors from the persistent counter store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("counter file '{path}' is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize counters: {0}")]
    Serialize(serde_json::Error),

    #[error("counter file '{path}' I/O error: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors from the remote console collaborator.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("failed to connect to remote console at '{addr}': {source}")]
    Connect {
        addr: String,
        source: std::io::Error,
    },

    #[error("remote console rejected the password")]
    AuthFailed,

    #[error("malformed console packet: {0}")]
    Malformed(String),

    #[error("remote console I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("remote console timed out")]
    Timeout,
}

/// Errors from the claim flow.
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("no player with that username is on the server")]
    PlayerNotFound,

    #[error("console error: {0}")]
    Console(#[from] ConsoleError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
