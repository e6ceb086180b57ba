//! Roster input controller for the attendance entry page: student pickers
//! backed by the server's `/students` filter, duplicate rejection across the
//! roster, and compaction of trailing empty rows.

pub mod controller;
pub mod error;
pub mod form;
pub mod lookup;
pub mod row;
pub mod session;

pub use controller::{
    ControllerConfig, DuplicateStudent, FilterOutcome, LookupApplied, LookupTicket,
    RosterController, DEFAULT_MIN_FILTER_CHARS,
};
pub use error::{LookupError, RosterError};
pub use form::FieldName;
pub use lookup::{HttpStudentDirectory, MissingStudentDirectory, StudentDirectory};
pub use row::RosterRow;
pub use session::{RosterEvent, RosterSession};
