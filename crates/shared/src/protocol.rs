use serde::{Deserialize, Serialize};

use crate::domain::StudentId;

/// One row of the `/students` lookup response: the id that gets submitted
/// and the label shown in the name input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub id: StudentId,
    pub name: String,
}

impl StudentSummary {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: StudentId(id),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentFilterQuery {
    pub filter: String,
}
