use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("student lookup request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("student lookup returned HTTP {status}")]
    Status { status: u16 },
    #[error("student lookup returned an unreadable body: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("invalid student lookup url '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("no student directory configured")]
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("roster has no row {0}")]
    UnknownRow(usize),
    #[error("roster has no name input '{0}'")]
    UnknownField(String),
    #[error("'{0}' is not a roster name input (expected an N- prefix)")]
    InvalidFieldName(String),
    #[error("name input '{0}' appears twice in the roster")]
    DuplicateField(String),
}
