//! FormStore — single source of truth for one wizard session's Record and
//! step cursor.
//!
//! Navigation policy lives in [`super::state`]; the store only applies it.
//! Field updates perform no content validation (incomplete input is handled
//! by the forward gates, not by errors), but an unknown field name or a
//! type-mismatched value is an integration bug and fails fast.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::FieldError;

use super::model::{Record, Role};
use super::state::{self, WizardStep};

/// Read-only view of a session's current state.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub record: Record,
    pub step: WizardStep,
}

/// Holds the accumulating [`Record`] and the step cursor for one wizard
/// session.
#[derive(Debug, Clone, Default)]
pub struct FormStore {
    record: Record,
    step: WizardStep,
}

impl FormStore {
    /// Fresh session: empty record, cursor on RoleSelection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a single Record field from a JSON value.
    ///
    /// Accepted field names are the Record's serde field names. A role
    /// change can invalidate the current step, so the step invariant is
    /// re-checked after every successful update.
    pub fn update_field(&mut self, field: &str, value: Value) -> Result<(), FieldError> {
        match field {
            "role" => {
                self.record.role = if value.is_null() {
                    None
                } else {
                    Some(parse_value::<Role>(field, value)?)
                };
            }
            "full_name" => self.record.full_name = text_value(field, value)?,
            "email" => self.record.email = text_value(field, value)?,
            "department" => self.record.department = text_value(field, value)?,
            "designation" => self.record.designation = text_value(field, value)?,
            "phone" => {
                self.record.phone = if value.is_null() {
                    None
                } else {
                    Some(text_value(field, value)?)
                };
            }
            "setup_resources_requested" => {
                self.record.setup_resources_requested = bool_value(field, value)?;
            }
            "selected_resources" => {
                self.record.selected_resources = parse_value(field, value)?;
            }
            _ => {
                return Err(FieldError::UnknownField {
                    name: field.to_string(),
                });
            }
        }
        self.restore_step_invariant();
        Ok(())
    }

    /// Move to the next visible step. Returns whether the cursor moved.
    ///
    /// Blocked navigation is a no-op, not an error: callers consult
    /// [`Self::is_advance_allowed`] to disable the trigger.
    pub fn advance(&mut self) -> bool {
        if !state::advance_allowed(self.step, &self.record) {
            return false;
        }
        let next = state::next_step(self.step, &self.record);
        if next == self.step {
            return false;
        }
        debug!(from = %self.step, to = %next, "Wizard advanced");
        self.step = next;
        true
    }

    /// Move to the previous visible step. Returns whether the cursor moved.
    /// Retreat is never gated.
    pub fn retreat(&mut self) -> bool {
        let prev = state::prev_step(self.step, &self.record);
        if prev == self.step {
            return false;
        }
        debug!(from = %self.step, to = %prev, "Wizard retreated");
        self.step = prev;
        true
    }

    /// Read-only clone of the current (Record, step) pair.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            record: self.record.clone(),
            step: self.step,
        }
    }

    /// Whether the current step's forward gate is satisfied.
    pub fn is_advance_allowed(&self) -> bool {
        state::advance_allowed(self.step, &self.record)
    }

    /// Ordered steps valid for the current role.
    pub fn visible_steps(&self) -> Vec<WizardStep> {
        state::visible_steps(&self.record)
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Re-check the cursor against the Record after a field update.
    ///
    /// A role change away from DepartmentHead while on DepartmentSetup
    /// leaves the cursor on a step the role can no longer reach; it is
    /// forced forward to Confirmation. Idempotent, and cheap enough to run
    /// after every update.
    fn restore_step_invariant(&mut self) {
        if self.step == WizardStep::DepartmentSetup && !self.record.is_department_head() {
            debug!("Role no longer reaches DepartmentSetup, forcing cursor to Confirmation");
            self.step = WizardStep::Confirmation;
        }
    }
}

fn text_value(field: &str, value: Value) -> Result<String, FieldError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(FieldError::InvalidValue {
            field: field.to_string(),
            message: format!("expected a string, got {other}"),
        }),
    }
}

fn bool_value(field: &str, value: Value) -> Result<bool, FieldError> {
    value.as_bool().ok_or_else(|| FieldError::InvalidValue {
        field: field.to_string(),
        message: format!("expected a boolean, got {value}"),
    })
}

fn parse_value<T: serde::de::DeserializeOwned>(
    field: &str,
    value: Value,
) -> Result<T, FieldError> {
    serde_json::from_value(value).map_err(|e| FieldError::InvalidValue {
        field: field.to_string(),
        message: e.to_string(),
    })
}
