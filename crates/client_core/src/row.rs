use shared::{domain::StudentId, protocol::StudentSummary};

use crate::form::FieldName;

/// View-model of one roster table row.
///
/// `hidden_id` is `Some` exactly when `visible_text` shows a confirmed
/// selection's label rather than free-typed filter text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    pub(crate) field: FieldName,
    pub(crate) visible_text: String,
    pub(crate) hidden_id: Option<StudentId>,
    pub(crate) suggestions: Vec<StudentSummary>,
    pub(crate) hidden: bool,
    pub(crate) lookup_generation: u64,
}

impl RosterRow {
    pub fn new(field: FieldName) -> Self {
        Self {
            field,
            visible_text: String::new(),
            hidden_id: None,
            suggestions: Vec::new(),
            hidden: false,
            lookup_generation: 0,
        }
    }

    pub fn field(&self) -> &FieldName {
        &self.field
    }

    pub fn visible_text(&self) -> &str {
        &self.visible_text
    }

    pub fn hidden_id(&self) -> Option<StudentId> {
        self.hidden_id
    }

    /// Value of the hidden identifier input as it would be submitted.
    pub fn hidden_id_value(&self) -> String {
        self.hidden_id.map(|id| id.to_string()).unwrap_or_default()
    }

    pub fn suggestions(&self) -> &[StudentSummary] {
        &self.suggestions
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_blank(&self) -> bool {
        self.visible_text.trim().is_empty()
    }

    pub fn lookup_generation(&self) -> u64 {
        self.lookup_generation
    }

    pub(crate) fn suggestion(&self, id: StudentId) -> Option<&StudentSummary> {
        self.suggestions.iter().find(|s| s.id == id)
    }

    pub(crate) fn clear_selection(&mut self) {
        self.visible_text.clear();
        self.hidden_id = None;
    }
}
