//! Reading status and the canonical rating scale.
//!
//! Ratings are integers on a 0–10 scale. `0` is the unrated placeholder used by
//! shelf entries that are not finished yet; a finished book must carry 1–10.
//! Five-star inputs convert by doubling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lowest score a finished book may carry.
pub const MIN_FINISHED_SCORE: i32 = 1;
/// Highest score on the canonical scale.
pub const MAX_SCORE: i32 = 10;
/// Minimum score that counts as "liked" for collaborative filtering.
pub const LIKED_THRESHOLD: i32 = 7;

/// Where a book sits on a user's shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    ToRead,
    CurrentlyReading,
    #[default]
    FinishedReading,
}

impl ReadingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ToRead => "to_read",
            Self::CurrentlyReading => "currently_reading",
            Self::FinishedReading => "finished_reading",
        }
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reading status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for ReadingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "to_read" => Ok(Self::ToRead),
            "currently_reading" => Ok(Self::CurrentlyReading),
            "finished_reading" => Ok(Self::FinishedReading),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScoreError {
    #[error("rating must be between 1 and 10 for finished books")]
    FinishedOutOfRange,
    #[error("rating must be between 0 and 10")]
    OutOfRange,
}

/// Check `score` against the rules for `status`.
pub fn validate_score(status: ReadingStatus, score: i32) -> Result<i32, ScoreError> {
    match status {
        ReadingStatus::FinishedReading if !(MIN_FINISHED_SCORE..=MAX_SCORE).contains(&score) => {
            Err(ScoreError::FinishedOutOfRange)
        }
        _ if !(0..=MAX_SCORE).contains(&score) => Err(ScoreError::OutOfRange),
        _ => Ok(score),
    }
}

/// Convert a 0–5 star value to the canonical 0–10 scale.
pub fn from_five_star(stars: i32) -> Result<i32, ScoreError> {
    if !(0..=5).contains(&stars) {
        return Err(ScoreError::OutOfRange);
    }
    Ok(stars * 2)
}
