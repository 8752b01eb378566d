//! FormSession - the working form persisted between CLI invocations

use super::{FormAction, FormState};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const FORM_FILE: &str = "current_form.json";

/// Working form backed by `<data_dir>/current_form.json`
pub struct FormSession {
    path: PathBuf,
    state: FormState,
    dirty: bool,
}

impl FormSession {
    /// Load the working form, or start a blank one with `row_count` rows.
    ///
    /// A stored form is normalized to the current catalog length.
    pub fn load(data_dir: &Path, row_count: usize) -> Result<Self> {
        let path = data_dir.join(FORM_FILE);

        let state = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let stored: FormState = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            FormState {
                id: stored.id,
                record: stored.record.normalized(row_count),
            }
        } else {
            FormState::new(row_count)
        };

        Ok(Self {
            path,
            state,
            dirty: false,
        })
    }

    /// Save the working form
    pub fn save(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content =
            serde_json::to_string_pretty(&self.state).context("Failed to serialize form")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        self.dirty = false;
        Ok(())
    }

    /// Save only if dirty
    pub fn save_if_dirty(&mut self) -> Result<()> {
        if self.dirty {
            self.save()?;
        }
        Ok(())
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply an edit and mark the session dirty if anything changed
    pub fn dispatch(&mut self, action: FormAction) -> &FormState {
        let next = self.state.apply(action);
        if next != self.state {
            self.state = next;
            self.dirty = true;
        }
        &self.state
    }
}
