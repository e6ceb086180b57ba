//! Field naming shared with the attendance page markup.
//!
//! Every roster row renders a text input named `N-<suffix>`, a suggestion
//! list whose element id is that same name, and a hidden input named
//! `I` + the text input's name that carries the resolved student id.

use std::fmt;

use crate::error::RosterError;

pub const NAME_PREFIX: &str = "N-";
pub const ID_PREFIX: &str = "I";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldName(String);

impl FieldName {
    pub fn parse(raw: &str) -> Result<Self, RosterError> {
        match raw.strip_prefix(NAME_PREFIX) {
            Some(suffix) if !suffix.is_empty() && !suffix.chars().any(char::is_whitespace) => {
                Ok(Self(raw.to_string()))
            }
            _ => Err(RosterError::InvalidFieldName(raw.to_string())),
        }
    }

    /// Conventional name of the `n`-th row (1-based): `N-0001`.
    pub fn numbered(n: usize) -> Self {
        Self(format!("{NAME_PREFIX}{n:04}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Element id of the row's suggestion list.
    pub fn list_id(&self) -> &str {
        &self.0
    }

    pub fn id_field_name(&self) -> String {
        format!("{ID_PREFIX}{}", self.0)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
