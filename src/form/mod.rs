//! Dynamic form state and submission
//!
//! [`FormState`] owns the values being typed, the errors from the last
//! submit attempt, and the submission phase. It never touches the terminal;
//! the form pane reads it to draw and the app feeds it keystrokes and clock
//! ticks.
//!
//! Submission is a small state machine:
//!
//! ```text
//! Idle --begin_submit(valid)--> Submitting{ready_at} --poll(now >= ready_at)--> Idle
//!                                                     (values handed out, success shown)
//! ```
//!
//! While submitting, further submits are refused and inputs are ignored.

pub mod validation;

pub use validation::{sanitize_tel, validate, validate_field, FieldErrors, ValidationError};

use crate::schema::{Field, FieldType, FormConfig};
use rustc_hash::FxHashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Simulated round trip before a submission is accepted
pub const SUBMIT_DELAY: Duration = Duration::from_secs(1);

/// How long the success banner stays up
pub const SUCCESS_DURATION: Duration = Duration::from_secs(3);

pub const SUCCESS_MESSAGE: &str = "¡Empleado registrado exitosamente!";

/// Field id -> current input
pub type FormValues = FxHashMap<String, String>;

/// Values handed to record creation, in schema order
pub type Submission = Vec<(String, String)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Submitting { ready_at: Instant, values: Submission },
}

/// Result of pressing the submit control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation passed; the submission completes after [`SUBMIT_DELAY`]
    Accepted,
    /// Validation failed for this many fields
    Invalid(usize),
    /// A submission is already in flight
    Busy,
}

#[derive(Debug, Clone)]
pub struct FormState {
    values: FormValues,
    errors: FieldErrors,
    phase: SubmitPhase,
    success_until: Option<Instant>,
}

fn blank_values(config: &FormConfig) -> FormValues {
    config
        .fields
        .iter()
        .map(|field| (field.id.clone(), String::new()))
        .collect()
}

impl FormState {
    /// Start with an empty string for every field
    pub fn new(config: &FormConfig) -> Self {
        FormState {
            values: blank_values(config),
            errors: FieldErrors::default(),
            phase: SubmitPhase::Idle,
            success_until: None,
        }
    }

    /// Add blank values for new fields and drop values of removed ones
    pub fn sync_with(&mut self, config: &FormConfig) {
        for field in &config.fields {
            self.values.entry(field.id.clone()).or_default();
        }
        self.values.retain(|id, _| config.contains(id));
        self.errors.retain(|id, _| config.contains(id));
    }

    pub fn value(&self, field_id: &str) -> &str {
        self.values.get(field_id).map(String::as_str).unwrap_or("")
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn error(&self, field_id: &str) -> Option<&ValidationError> {
        self.errors.get(field_id)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, SubmitPhase::Submitting { .. })
    }

    pub fn phase(&self) -> &SubmitPhase {
        &self.phase
    }

    pub fn show_success(&self, now: Instant) -> bool {
        self.success_until.is_some_and(|until| now < until)
    }

    /// Store a new input for `field`.
    ///
    /// Phone fields are sanitized on every keystroke. Any error left from
    /// the last submit is cleared for this field.
    pub fn set_value(&mut self, field: &Field, raw: &str) {
        if self.is_submitting() {
            return;
        }
        let value = if field.field_type == FieldType::Tel {
            sanitize_tel(raw)
        } else {
            raw.to_string()
        };
        self.values.insert(field.id.clone(), value);
        self.errors.remove(&field.id);
    }

    /// Append one typed character
    pub fn push_char(&mut self, field: &Field, c: char) {
        let mut value = self.value(&field.id).to_string();
        value.push(c);
        self.set_value(field, &value);
    }

    /// Remove the last character
    pub fn pop_char(&mut self, field: &Field) {
        let mut value = self.value(&field.id).to_string();
        value.pop();
        self.set_value(field, &value);
    }

    /// Step a select field through its options; `forward` picks direction
    pub fn cycle_option(&mut self, field: &Field, forward: bool) {
        if field.options.is_empty() {
            return;
        }
        let len = field.options.len();
        let current = field
            .options
            .iter()
            .position(|opt| opt.value == self.value(&field.id));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        let value = field.options[next].value.clone();
        self.set_value(field, &value);
    }

    /// Validate and, if clean, start the submission delay
    pub fn begin_submit(&mut self, config: &FormConfig, now: Instant) -> SubmitOutcome {
        if self.is_submitting() {
            return SubmitOutcome::Busy;
        }

        self.errors = validate(config, &self.values);
        if !self.errors.is_empty() {
            debug!(errors = self.errors.len(), "form has validation errors");
            return SubmitOutcome::Invalid(self.errors.len());
        }

        let values = config
            .fields
            .iter()
            .map(|field| (field.id.clone(), self.value(&field.id).to_string()))
            .collect();
        self.phase = SubmitPhase::Submitting {
            ready_at: now + SUBMIT_DELAY,
            values,
        };
        SubmitOutcome::Accepted
    }

    /// Advance the clock.
    ///
    /// Returns the submitted values once the delay has elapsed; the inputs
    /// are then reset and the success banner raised.
    pub fn poll(&mut self, config: &FormConfig, now: Instant) -> Option<Submission> {
        if self.success_until.is_some_and(|until| now >= until) {
            self.success_until = None;
        }

        let ready = matches!(&self.phase, SubmitPhase::Submitting { ready_at, .. } if now >= *ready_at);
        if !ready {
            return None;
        }

        match std::mem::replace(&mut self.phase, SubmitPhase::Idle) {
            SubmitPhase::Submitting { values, .. } => {
                self.values = blank_values(config);
                self.errors.clear();
                self.success_until = Some(now + SUCCESS_DURATION);
                Some(values)
            }
            SubmitPhase::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::default_config;

    #[test]
    fn test_new_state_has_blank_value_per_field() {
        let config = default_config();
        let state = FormState::new(&config);
        assert_eq!(state.values().len(), config.fields.len());
        assert!(state.values().values().all(String::is_empty));
    }

    #[test]
    fn test_cycle_option_wraps() {
        let config = default_config();
        let genero = config.field("genero").unwrap().clone();
        let mut state = FormState::new(&config);
        state.cycle_option(&genero, true);
        assert_eq!(state.value("genero"), "masculino");
        state.cycle_option(&genero, true);
        assert_eq!(state.value("genero"), "femenino");
        state.cycle_option(&genero, true);
        assert_eq!(state.value("genero"), "masculino");
        state.cycle_option(&genero, false);
        assert_eq!(state.value("genero"), "femenino");
    }

    #[test]
    fn test_cycle_option_without_options_is_noop() {
        let config = default_config();
        let departamento = config.field("departamento").unwrap().clone();
        let mut state = FormState::new(&config);
        state.cycle_option(&departamento, true);
        assert_eq!(state.value("departamento"), "");
    }

    #[test]
    fn test_success_banner_expires() {
        let config = default_config();
        let mut state = FormState::new(&config);
        for (id, value) in [("nombres", "Ana"), ("apellidos", "Pérez"), ("genero", "femenino")] {
            let field = config.field(id).unwrap().clone();
            state.set_value(&field, value);
        }
        let t0 = Instant::now();
        assert_eq!(state.begin_submit(&config, t0), SubmitOutcome::Accepted);
        let done = t0 + SUBMIT_DELAY;
        assert!(state.poll(&config, done).is_some());
        assert!(state.show_success(done + Duration::from_secs(2)));
        state.poll(&config, done + SUCCESS_DURATION);
        assert!(!state.show_success(done + SUCCESS_DURATION));
    }
}
