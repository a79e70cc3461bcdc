//! Error type shared by input parsing and the exporters.
//!
//! The optimisation core never fails once it holds a valid instance; every
//! variant here comes from reading points or writing results.

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("parse error{}: {message}", .line.map(|l| format!(" on line {l}")).unwrap_or_default())]
    Parse {
        line: Option<usize>,
        message: String,
    },
    #[error("input declares {declared} points but only {found} coordinate pairs were found")]
    MissingCoordinates { declared: usize, found: usize },
    #[error("{count} points exceed the supported limit of {limit} (distance matrix is O(n^2))")]
    TooManyPoints { count: usize, limit: usize },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            line: None,
            message: message.into(),
        }
    }

    pub fn parse_at(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line: Some(line),
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_mentions_line() {
        let err = Error::parse_at(7, "invalid x coordinate");
        assert_eq!(err.to_string(), "parse error on line 7: invalid x coordinate");

        let err = Error::parse("empty input");
        assert_eq!(err.to_string(), "parse error: empty input");
    }

    #[test]
    fn test_capacity_error_message() {
        let err = Error::TooManyPoints { count: 6000, limit: 5000 };
        assert!(err.to_string().contains("6000"));
        assert!(err.to_string().contains("5000"));
    }
}
