//! Newtype wrappers for domain identifiers.
//!
//! All identifiers are database serials, so only strictly positive values parse.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Why an identifier failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("identifier is not a number")]
    NotANumber,
    #[error("identifier must be positive")]
    NotPositive,
}

fn parse_positive(s: &str) -> Result<i32, IdParseError> {
    let value: i32 = s.trim().parse().map_err(|_| IdParseError::NotANumber)?;
    if value <= 0 {
        return Err(IdParseError::NotPositive);
    }
    Ok(value)
}

macro_rules! serial_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_positive(s).map(Self)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

serial_id!(
    /// Identifies a user account.
    UserId
);

serial_id!(
    /// Identifies a book in the catalogue.
    BookId
);

serial_id!(
    /// Identifies a single rating row (one user's rating of one book).
    RatingId
);

serial_id!(
    /// Identifies a comment on a rating.
    CommentId
);
