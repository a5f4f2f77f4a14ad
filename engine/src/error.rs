//! Error types for the Trellis engine.

use crate::RowId;
use thiserror::Error;

/// All possible errors from the Trellis engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A local edit targeted an id the store has never seen. Edits never
    /// create rows; only remote updates do.
    #[error("row not found: {0}")]
    RowNotFound(RowId),

    /// A transport payload carried no string `id` field.
    #[error("update payload missing a string \"id\" field")]
    MissingRowId,

    /// A transport payload was not a JSON object.
    #[error("invalid update payload: {0}")]
    InvalidUpdate(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
