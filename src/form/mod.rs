//! Form state manager
//!
//! The working form is an immutable [`FormState`] value. Every edit is a
//! [`FormAction`] applied by [`FormState::apply`], which returns the next state
//! and leaves the previous one untouched. Compliance percentages are derived
//! from the rows on read.

mod session;

pub use session::FormSession;

use crate::models::{CaseRecord, Choice, EvaluationRow, MetadataField, Phase};
use serde::{Deserialize, Serialize};

/// A single edit to the working form
#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    /// Replace one header field
    SetField(MetadataField, String),

    /// Answer one row for one phase
    Select {
        row: usize,
        phase: Phase,
        choice: Choice,
    },

    /// Attach a draft id (after the first save)
    AssignId(String),

    /// Replace the form with a resumed draft
    Load { id: String, record: CaseRecord },

    /// Start a blank form
    Reset,
}

/// Snapshot of the working form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    /// Draft id, once the form has been saved or resumed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub record: CaseRecord,
}

impl FormState {
    /// Blank form with one unset row per catalog item
    pub fn new(row_count: usize) -> Self {
        Self {
            id: None,
            record: CaseRecord::new(row_count),
        }
    }

    pub fn row_count(&self) -> usize {
        self.record.rows.len()
    }

    pub fn rows(&self) -> &[EvaluationRow] {
        &self.record.rows
    }

    pub fn initial_compliance_pct(&self) -> u8 {
        self.record.initial_compliance_pct()
    }

    pub fn final_compliance_pct(&self) -> u8 {
        self.record.final_compliance_pct()
    }

    /// Compute the next state. Never fails: a row index outside the form
    /// returns the state unchanged.
    pub fn apply(&self, action: FormAction) -> FormState {
        let mut next = self.clone();
        match action {
            FormAction::SetField(field, value) => {
                next.record.employee = next.record.employee.with(field, value);
            }
            FormAction::Select { row, phase, choice } => match next.record.rows.get_mut(row) {
                Some(slot) => *slot = slot.select(phase, choice),
                None => {
                    tracing::debug!(row, rows = self.row_count(), "ignoring selection outside the form");
                }
            },
            FormAction::AssignId(id) => {
                next.id = Some(id);
            }
            FormAction::Load { id, record } => {
                let rows = self.row_count();
                next = FormState {
                    id: Some(id),
                    record: record.normalized(rows),
                };
            }
            FormAction::Reset => {
                next = FormState::new(self.row_count());
            }
        }
        next
    }

    /// Fold a sequence of actions
    pub fn apply_all(&self, actions: impl IntoIterator<Item = FormAction>) -> FormState {
        actions
            .into_iter()
            .fold(self.clone(), |state, action| state.apply(action))
    }
}
