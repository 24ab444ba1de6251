//! Crate-wide error type.
//!
//! Everything the library can fail with is one of these kinds; the CLI layer
//! wraps them in `anyhow` context, the library itself never prints.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A save-time validation rule failed. The message names the offending
    /// entity and location; nothing has been written to disk.
    #[error("{0}")]
    Validation(String),

    /// A JSON record is structurally wrong (missing required key, wrong
    /// shape, ragged layout, ...).
    #[error("malformed {entity}: {detail}")]
    MalformedRecord { entity: String, detail: String },

    /// A layout character has no tileset entry.
    #[error("unknown layout symbol `{symbol}` in room `{room}`")]
    UnknownSymbol { symbol: char, room: String },

    /// Script source failed syntactic validation.
    #[error("script parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// More distinct tiles in one room than the symbol alphabet supports.
    #[error("room `{room}` has {count} tiles, the layout alphabet supports {max}")]
    ScaleLimitExceeded { room: String, count: usize, max: usize },

    /// The manifest's spawn room matches no loaded room.
    #[error("spawn room `{0}` not found among loaded rooms")]
    SpawnRoomNotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn malformed(entity: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        Error::MalformedRecord {
            entity: entity.into(),
            detail: detail.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
