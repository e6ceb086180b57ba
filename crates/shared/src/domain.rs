use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(StudentId);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotAStudentId;

impl fmt::Display for NotAStudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("not a plain numeric student id")
    }
}

impl std::error::Error for NotAStudentId {}

/// Trimmed, non-empty and all ASCII digits, whether or not it fits an id.
pub fn is_plain_numeric(raw: &str) -> bool {
    let digits = raw.trim();
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

impl FromStr for StudentId {
    type Err = NotAStudentId;

    /// Only plain digit strings (surrounding whitespace allowed) are ids;
    /// signs, decimals and exponents are free text.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if !is_plain_numeric(raw) {
            return Err(NotAStudentId);
        }
        raw.trim()
            .parse::<i64>()
            .map(StudentId)
            .map_err(|_| NotAStudentId)
    }
}
