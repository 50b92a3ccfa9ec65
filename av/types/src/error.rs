/*!
    Error taxonomy for the muxing session.
*/

use thiserror::Error;

use crate::StreamType;

/// One variant per failing step; none are retried, any failure aborts
/// the whole session.
#[derive(Debug, Clone, Error)]
pub enum Error {
    // ── Input side ────────────────────────────────────────────────────
    #[error("failed to open source: {0}")]
    SourceOpen(String),
    #[error("failed to read stream info: {0}")]
    Probe(String),
    #[error("no {0} stream in source")]
    NoMatchingStream(StreamType),

    // ── Output setup ──────────────────────────────────────────────────
    #[error("failed to create output context: {0}")]
    OutputCreate(String),
    #[error("failed to create output stream: {0}")]
    StreamCreate(String),
    #[error("failed to copy codec parameters: {0}")]
    ParameterCopy(String),
    #[error("failed to open output sink: {0}")]
    SinkOpen(String),
    #[error("failed to write container header: {0}")]
    HeaderWrite(String),

    // ── Muxing loop ───────────────────────────────────────────────────
    #[error("failed to write packet: {0}")]
    Write(String),
}

pub type Result<T> = std::result::Result<T, Error>;
