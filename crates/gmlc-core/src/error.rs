use std::path::PathBuf;

use crate::token::Location;

/// Errors produced by the scanner, parser, and project loader.
///
/// All error flows are value-returning; nothing in the front-end unwinds.
/// Parser-internal rule rejection is not an `Error`: alternatives signal
/// "not applicable" with `Option` and only the final watermark diagnostic
/// surfaces here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unexpected character {found:?} at {loc}")]
    UnexpectedChar { loc: Location, found: char },

    #[error("unterminated string literal starting at {loc}")]
    UnterminatedString { loc: Location },

    #[error("scanner made no progress at {loc}")]
    ScannerStuck { loc: Location },

    #[error("failed at token {token} at {loc}")]
    ParseFailed { token: String, loc: Location },

    #[error("unknown resource type {kind:?} in {path}")]
    UnknownResourceType { path: PathBuf, kind: String },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
