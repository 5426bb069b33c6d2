//! Per-field validation rules run on submit

use crate::schema::{Field, FieldType, FormConfig};
use regex::Regex;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::OnceLock;

/// Number of digits a phone number must have
pub const TEL_DIGITS: usize = 8;

/// Field id -> error, at most one per field
pub type FieldErrors = FxHashMap<String, ValidationError>;

/// A failed rule for one field; `Display` is the message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Required { label: String },
    TooShort { label: String, min_length: u32 },
    InvalidPhone { label: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Required { label } => write!(f, "{} es obligatorio", label),
            ValidationError::TooShort { label, min_length } => {
                write!(f, "{} debe tener al menos {} caracteres", label, min_length)
            }
            ValidationError::InvalidPhone { label } => write!(
                f,
                "{} debe contener exactamente {} dígitos numéricos",
                label, TEL_DIGITS
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^[0-9]{8}$").expect("phone pattern is valid"))
}

/// Keep only ASCII digits, at most eight of them
pub fn sanitize_tel(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit())
        .take(TEL_DIGITS)
        .collect()
}

/// Check one value against its field's rules.
///
/// Rules are tried in order (required, minimum length, phone format) and the
/// first failure wins.
pub fn validate_field(field: &Field, value: &str) -> Option<ValidationError> {
    if field.required && value.trim().is_empty() {
        return Some(ValidationError::Required {
            label: field.label.clone(),
        });
    }

    if let Some(min_length) = field.min_length.filter(|n| *n > 0) {
        if !value.is_empty() && (value.chars().count() as u32) < min_length {
            return Some(ValidationError::TooShort {
                label: field.label.clone(),
                min_length,
            });
        }
    }

    if field.field_type == FieldType::Tel && !value.is_empty() && !phone_regex().is_match(value) {
        return Some(ValidationError::InvalidPhone {
            label: field.label.clone(),
        });
    }

    None
}

/// Validate every field of the schema; missing values count as empty
pub fn validate(config: &FormConfig, values: &FxHashMap<String, String>) -> FieldErrors {
    config
        .fields
        .iter()
        .filter_map(|field| {
            let value = values.get(&field.id).map(String::as_str).unwrap_or("");
            validate_field(field, value).map(|err| (field.id.clone(), err))
        })
        .collect()
}
