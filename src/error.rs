//! Error types for the game's I/O boundaries.
//!
//! The simulation itself never fails; only commentary requests and browser
//! storage can go wrong, and both are recovered locally by the caller.

use std::fmt;

use crate::commentary::{FALLBACK_EMPTY, FALLBACK_NETWORK, FALLBACK_NO_KEY};

/// Why a commentary request produced no text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentaryError {
    /// No API key configured; the request is never sent
    MissingCredential,
    /// Transport failure (offline, CORS, aborted)
    Network(String),
    /// Non-success HTTP status
    Status(u16),
    /// Response body was not the expected JSON shape
    Malformed(String),
    /// Service answered but with no text
    EmptyResponse,
}

impl CommentaryError {
    /// Fixed text shown in place of the commentary
    pub fn fallback_text(&self) -> &'static str {
        match self {
            CommentaryError::MissingCredential => FALLBACK_NO_KEY,
            CommentaryError::EmptyResponse => FALLBACK_EMPTY,
            CommentaryError::Network(_)
            | CommentaryError::Status(_)
            | CommentaryError::Malformed(_) => FALLBACK_NETWORK,
        }
    }
}

impl fmt::Display for CommentaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommentaryError::MissingCredential => write!(f, "no commentary API key configured"),
            CommentaryError::Network(msg) => write!(f, "commentary request failed: {msg}"),
            CommentaryError::Status(code) => write!(f, "commentary service returned HTTP {code}"),
            CommentaryError::Malformed(msg) => write!(f, "malformed commentary response: {msg}"),
            CommentaryError::EmptyResponse => write!(f, "commentary response contained no text"),
        }
    }
}

impl std::error::Error for CommentaryError {}

/// LocalStorage failures (loading never fails, it falls back to defaults)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// No window or storage access denied (private mode, native build)
    Unavailable,
    Serialize(String),
    Write(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable => write!(f, "local storage unavailable"),
            StorageError::Serialize(msg) => write!(f, "failed to serialize: {msg}"),
            StorageError::Write(msg) => write!(f, "failed to write local storage: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}
