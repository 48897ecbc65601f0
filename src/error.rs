//! Error types and result alias for the crate.
//!
//! Only configuration problems are hard errors: an empty brush or an
//! invalid pattern string fails fast before a pass starts. Conditions that
//! arise mid-pass (degenerate guides, missing surface hits, spacing
//! underflow) are recoverable by contract and degrade to documented
//! fallbacks instead of surfacing here.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("brush has no item templates")]
    EmptyBrush,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
