// deck/src/error.rs

//! Error types for deck parsing and merging.

use thiserror::Error;

/// Result type alias for deck operations.
pub type Result<T> = std::result::Result<T, DeckError>;

/// Errors raised while applying override directives to a deck.
///
/// Existing deck lines are never rejected; lines that do not parse as
/// directives are carried through verbatim. Every variant here points at
/// an override supplied by the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeckError {
    #[error("invalid directive (expected KEY=VALUE): \"{0}\"")]
    MissingAssignment(String),
    #[error("invalid parameter-field directive (expected a leading numeric index): \"{0}\"")]
    MissingParamIndex(String),
}
