//! Create/edit form input.
//!
//! Forms hold raw text exactly as typed. `validate` checks required fields,
//! parses numbers and maps blank optional fields to `None` (sent as JSON
//! `null`). All field problems are reported together.

mod activity;
mod museum;
mod organization;

pub use activity::{ActivityForm, ActivityUpdateForm, MetricFields};
pub use museum::MuseumForm;
pub use organization::OrganizationForm;

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every invalid field of one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", render(.errors))]
pub struct FormErrors {
    pub errors: Vec<FieldError>,
}

fn render(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl FormErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// `Ok(value)` if nothing was collected.
    pub fn finish<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    /// Required non-blank text, trimmed.
    pub(crate) fn required(&mut self, field: &'static str, raw: &str) -> String {
        let value = raw.trim();
        if value.is_empty() {
            self.push(field, "required");
        }
        value.to_string()
    }

    /// Optional number; blank is `None`, zero stays zero.
    pub(crate) fn optional_number<T: FromStr>(&mut self, field: &'static str, raw: &str) -> Option<T> {
        let value = raw.trim();
        if value.is_empty() {
            return None;
        }
        match value.parse() {
            Ok(n) => Some(n),
            Err(_) => {
                self.push(field, format!("{:?} is not a number", value));
                None
            }
        }
    }

    /// Optional float; `NaN` and infinities parse but cannot be sent as JSON.
    pub(crate) fn optional_float(&mut self, field: &'static str, raw: &str) -> Option<f64> {
        let value: f64 = self.optional_number(field, raw)?;
        if value.is_finite() {
            Some(value)
        } else {
            self.push(field, format!("{:?} is not a finite number", raw.trim()));
            None
        }
    }

    pub(crate) fn required_number<T: FromStr>(&mut self, field: &'static str, raw: &str) -> Option<T> {
        if raw.trim().is_empty() {
            self.push(field, "required");
            return None;
        }
        self.optional_number(field, raw)
    }
}

/// Blank text as `None`, otherwise trimmed.
pub(crate) fn optional_text(raw: &str) -> Option<String> {
    let value = raw.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Render an optional value back into an editable field.
pub(crate) fn field_text<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
