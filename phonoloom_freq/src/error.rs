// Typed failures for frequency-trie queries.

use thiserror::Error;

/// Failures raised by lookup and probability queries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FreqError {
    #[error("no recorded path: {0}")]
    PathNotFound(String),

    #[error("conditioning path {0} has a zero total; probability is undefined")]
    DivisionByZero(String),
}
