use image::ImageError;
use std::num::ParseIntError;
use thiserror::Error;

/// Why a `#RRGGBB` string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseColorError {
    #[error("hex color must start with '#'")]
    MissingHash,

    #[error("hex color must be 7 characters long, got {0}")]
    InvalidLength(usize),

    #[error("invalid hex digits in {0:?}")]
    InvalidDigit(String),
}

impl From<ParseIntError> for ParseColorError {
    fn from(err: ParseIntError) -> Self {
        ParseColorError::InvalidDigit(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid color: {0}")]
    Parse(#[from] ParseColorError),

    #[error("palette line {line}: {source}")]
    Palette {
        line: usize,
        #[source]
        source: ParseColorError,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("failed to decode image: {0}")]
    Decode(#[from] ImageError),

    #[error("failed to encode image: {0}")]
    Encode(#[source] ImageError),
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::InvalidConfiguration(msg.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
