use std::collections::HashSet;

use shared::{
    domain::{is_plain_numeric, StudentId},
    protocol::StudentSummary,
};
use tracing::{debug, info, warn};

use crate::{error::LookupError, error::RosterError, form::FieldName, row::RosterRow};

/// The lookup endpoint rejects shorter filters.
pub const DEFAULT_MIN_FILTER_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    pub min_filter_chars: usize,
}

impl ControllerConfig {
    /// Shorter filters are never sent, whatever was configured.
    pub fn effective_min_filter_chars(&self) -> usize {
        self.min_filter_chars.max(DEFAULT_MIN_FILTER_CHARS)
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            min_filter_chars: DEFAULT_MIN_FILTER_CHARS,
        }
    }
}

/// A lookup the caller must perform on behalf of a row. Only the ticket
/// matching the row's latest text change may update its suggestions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    pub row: usize,
    pub generation: u64,
    pub filter: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateStudent {
    pub row: usize,
    pub id: StudentId,
    pub held_by: usize,
}

impl DuplicateStudent {
    /// Alert text shown to the teacher.
    pub fn message(&self) -> String {
        format!("Ученик с номером {} уже есть в списке!", self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    Selected(StudentSummary),
    Rejected(DuplicateStudent),
    /// Digits that do not name one of the row's suggestions.
    Unmatched(String),
    Lookup(LookupTicket),
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupApplied {
    Updated(usize),
    Failed,
    Stale,
}

#[derive(Debug, Clone)]
pub struct RosterController {
    rows: Vec<RosterRow>,
    config: ControllerConfig,
}

impl RosterController {
    pub fn new(
        fields: impl IntoIterator<Item = FieldName>,
        config: ControllerConfig,
    ) -> Result<Self, RosterError> {
        let mut seen = HashSet::new();
        let mut rows = Vec::new();
        for field in fields {
            if !seen.insert(field.clone()) {
                return Err(RosterError::DuplicateField(field.to_string()));
            }
            rows.push(RosterRow::new(field));
        }
        let mut controller = Self { rows, config };
        controller.recompute_visibility();
        Ok(controller)
    }

    /// A roster of `count` rows named `N-0001`, `N-0002`, ...
    pub fn with_rows(count: usize, config: ControllerConfig) -> Self {
        let mut controller = Self {
            rows: (1..=count).map(|n| RosterRow::new(FieldName::numbered(n))).collect(),
            config,
        };
        controller.recompute_visibility();
        controller
    }

    pub fn config(&self) -> ControllerConfig {
        self.config
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[RosterRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Result<&RosterRow, RosterError> {
        self.rows.get(index).ok_or(RosterError::UnknownRow(index))
    }

    pub fn row_index(&self, field: &str) -> Result<usize, RosterError> {
        self.rows
            .iter()
            .position(|row| row.field.as_str() == field)
            .ok_or_else(|| RosterError::UnknownField(field.to_string()))
    }

    /// Row whose hidden input currently holds `id`.
    pub fn holder_of(&self, id: StudentId) -> Option<usize> {
        self.rows.iter().position(|row| row.hidden_id == Some(id))
    }

    /// Text change on a row's name input.
    pub fn on_filter_changed(
        &mut self,
        index: usize,
        text: &str,
    ) -> Result<FilterOutcome, RosterError> {
        let min_filter_chars = self.config.effective_min_filter_chars();
        let row = self
            .rows
            .get_mut(index)
            .ok_or(RosterError::UnknownRow(index))?;
        row.visible_text = text.to_string();
        row.hidden_id = None;
        row.lookup_generation += 1;

        let outcome = if is_plain_numeric(text) {
            match text.parse::<StudentId>() {
                Ok(id) => self.resolve_numeric(index, id, text.trim()),
                Err(_) => FilterOutcome::Unmatched(text.trim().to_string()),
            }
        } else if text.chars().count() >= min_filter_chars {
            FilterOutcome::Lookup(LookupTicket {
                row: index,
                generation: row.lookup_generation,
                filter: text.to_string(),
            })
        } else {
            row.suggestions.clear();
            FilterOutcome::Cleared
        };

        self.recompute_visibility();
        Ok(outcome)
    }

    fn resolve_numeric(&mut self, index: usize, id: StudentId, digits: &str) -> FilterOutcome {
        let Some(summary) = self.rows[index].suggestion(id).cloned() else {
            debug!(row = index, student_id = %id, "numeric input does not match a suggestion");
            return FilterOutcome::Unmatched(digits.to_string());
        };

        let holder = self
            .rows
            .iter()
            .enumerate()
            .find(|(other, row)| *other != index && row.hidden_id == Some(id))
            .map(|(other, _)| other);

        if let Some(held_by) = holder {
            self.rows[index].clear_selection();
            info!(row = index, held_by, student_id = %id, "rejected duplicate student");
            return FilterOutcome::Rejected(DuplicateStudent {
                row: index,
                id,
                held_by,
            });
        }

        let row = &mut self.rows[index];
        row.visible_text = summary.name.clone();
        row.hidden_id = Some(id);
        row.suggestions.clear();
        debug!(row = index, student_id = %id, "confirmed student selection");
        FilterOutcome::Selected(summary)
    }

    /// Applies the result of a lookup issued for `ticket`.
    pub fn apply_lookup(
        &mut self,
        ticket: &LookupTicket,
        result: Result<Vec<StudentSummary>, LookupError>,
    ) -> Result<LookupApplied, RosterError> {
        let row = self
            .rows
            .get_mut(ticket.row)
            .ok_or(RosterError::UnknownRow(ticket.row))?;

        if row.lookup_generation != ticket.generation {
            debug!(
                row = ticket.row,
                filter = %ticket.filter,
                generation = ticket.generation,
                current = row.lookup_generation,
                "discarding stale student lookup"
            );
            return Ok(LookupApplied::Stale);
        }

        match result {
            Ok(students) => {
                let count = students.len();
                row.suggestions = students;
                debug!(row = ticket.row, filter = %ticket.filter, count, "suggestions replaced");
                Ok(LookupApplied::Updated(count))
            }
            Err(err) => {
                warn!(
                    row = ticket.row,
                    filter = %ticket.filter,
                    error = %err,
                    "student lookup failed"
                );
                Ok(LookupApplied::Failed)
            }
        }
    }

    /// Direct pick from a row's suggestion list.
    ///
    /// The picked entry is reported but not written into the row: list
    /// picks do not yet flow into the text/id synchronization.
    pub fn on_suggestion_picked(
        &self,
        index: usize,
        value: &str,
    ) -> Result<Option<StudentSummary>, RosterError> {
        let row = self.row(index)?;
        let picked = value
            .parse::<StudentId>()
            .ok()
            .and_then(|id| row.suggestion(id))
            .cloned();
        debug!(
            row = index,
            list = row.field.list_id(),
            value,
            picked = ?picked,
            "suggestion picked"
        );
        Ok(picked)
    }

    /// Hides the trailing run of empty rows, leaving one empty row visible
    /// after the last filled one. Returns the hidden row indices.
    pub fn recompute_visibility(&mut self) -> Vec<usize> {
        let mut boundary = 0;
        for i in (1..self.rows.len()).rev() {
            if self.rows[i - 1].is_blank() && self.rows[i].is_blank() {
                self.rows[i].hidden = true;
            } else {
                boundary = i;
                break;
            }
        }
        for row in self.rows.iter_mut().take(boundary + 1) {
            row.hidden = false;
        }
        self.hidden_rows()
    }

    pub fn hidden_rows(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.hidden)
            .map(|(index, _)| index)
            .collect()
    }

    /// `(hidden input name, value)` pairs as the form submits them.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        self.rows
            .iter()
            .map(|row| (row.field.id_field_name(), row.hidden_id_value()))
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
