//! Form schema model
//!
//! A [`FormConfig`] is an ordered list of [`Field`] definitions. Every other
//! part of the crate reads it: the form renders one input per field, the
//! records viewer resolves labels and option values through it, and the
//! [`editor`] produces replacement configs from it.

pub mod editor;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ids of the fields that ship with the system and cannot be removed
pub const PROTECTED_FIELD_IDS: [&str; 5] =
    ["nombres", "apellidos", "direccion", "genero", "departamento"];

/// Id of the select field whose options come from the department lookup
pub const DEPARTMENT_FIELD_ID: &str = "departamento";

/// Returns true for one of the five default fields
pub fn is_default_field(field_id: &str) -> bool {
    PROTECTED_FIELD_IDS.contains(&field_id)
}

/// One choice of a select field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        SelectOption {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Kind of input a field renders as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Email,
    Tel,
    Number,
    Date,
    Textarea,
    Select,
}

impl FieldType {
    /// All types, in the order the editor offers them
    pub const ALL: [FieldType; 7] = [
        FieldType::Text,
        FieldType::Email,
        FieldType::Tel,
        FieldType::Number,
        FieldType::Date,
        FieldType::Textarea,
        FieldType::Select,
    ];

    /// Wire name (`text`, `tel`, ...)
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Tel => "tel",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
        }
    }

    /// Human-readable name shown in the type picker
    pub fn display_name(self) -> &'static str {
        match self {
            FieldType::Text => "Texto",
            FieldType::Email => "Email",
            FieldType::Tel => "Teléfono",
            FieldType::Number => "Número",
            FieldType::Date => "Fecha",
            FieldType::Textarea => "Área de texto",
            FieldType::Select => "Lista desplegable",
        }
    }

    /// Whether a minimum length makes sense for this type
    pub fn supports_min_length(self) -> bool {
        matches!(self, FieldType::Text | FieldType::Textarea)
    }

    /// Next type in picker order (wraps)
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous type in picker order (wraps)
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation rules carried alongside the top-level flags
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validations {
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
}

/// Declarative description of one form input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default)]
    pub options: Vec<SelectOption>,
    #[serde(default)]
    pub validations: Validations,
}

impl Field {
    /// Build a field whose `validations` mirror `required` and `min_length`
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        field_type: FieldType,
        required: bool,
        min_length: Option<u32>,
    ) -> Self {
        Field {
            id: id.into(),
            label: label.into(),
            field_type,
            required,
            min_length,
            options: Vec::new(),
            validations: Validations {
                required,
                min_length,
            },
        }
    }

    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    /// Look up the label of the option whose value is `value`
    pub fn option_label(&self, value: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|opt| opt.value == value)
            .map(|opt| opt.label.as_str())
    }

    /// Copy `required` and `min_length` into `validations`; only text
    /// fields carry a minimum length there
    pub fn sync_validations(&mut self) {
        self.validations.required = self.required;
        self.validations.min_length = if self.field_type == FieldType::Text {
            self.min_length.filter(|n| *n > 0)
        } else {
            None
        };
    }
}

/// The whole form schema; order is render and display order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FormConfig {
    pub fields: Vec<Field>,
}

impl FormConfig {
    pub fn new(fields: Vec<Field>) -> Self {
        FormConfig { fields }
    }

    pub fn field(&self, field_id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == field_id)
    }

    pub fn contains(&self, field_id: &str) -> bool {
        self.field(field_id).is_some()
    }

    /// First id that appears more than once, if any
    pub fn duplicate_id(&self) -> Option<&str> {
        let mut seen = FxHashSet::default();
        self.fields
            .iter()
            .map(|f| f.id.as_str())
            .find(|id| !seen.insert(*id))
    }

    /// Replace the options of one field, returning the new config
    pub fn with_options_for(&self, field_id: &str, options: Vec<SelectOption>) -> FormConfig {
        let fields = self
            .fields
            .iter()
            .map(|field| {
                if field.id == field_id {
                    Field {
                        options: options.clone(),
                        ..field.clone()
                    }
                } else {
                    field.clone()
                }
            })
            .collect();
        FormConfig { fields }
    }
}

/// The schema the application starts with
pub fn default_config() -> FormConfig {
    FormConfig::new(vec![
        Field::new("nombres", "Nombres", FieldType::Text, true, Some(2)),
        Field::new("apellidos", "Apellidos", FieldType::Text, true, Some(2)),
        Field::new("direccion", "Direccion", FieldType::Textarea, false, None),
        Field::new("genero", "Genero", FieldType::Select, true, None).with_options(vec![
            SelectOption::new("masculino", "Masculino"),
            SelectOption::new("femenino", "Femenino"),
        ]),
        Field::new(DEPARTMENT_FIELD_ID, "Departamento", FieldType::Select, false, None),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_all_protected_fields() {
        let config = default_config();
        for id in PROTECTED_FIELD_IDS {
            assert!(config.contains(id), "missing default field {}", id);
        }
        assert_eq!(config.fields.len(), 5);
    }

    #[test]
    fn test_field_type_cycle_wraps() {
        assert_eq!(FieldType::Select.next(), FieldType::Text);
        assert_eq!(FieldType::Text.prev(), FieldType::Select);
        assert_eq!(FieldType::Tel.next(), FieldType::Number);
    }

    #[test]
    fn test_field_deserializes_from_camel_case() {
        let json = r#"{
            "id": "telefono",
            "label": "Teléfono",
            "type": "tel",
            "required": true,
            "minLength": 8,
            "options": [],
            "validations": { "required": true, "minLength": 8 }
        }"#;
        let field: Field = serde_json::from_str(json).unwrap();
        assert_eq!(field.field_type, FieldType::Tel);
        assert_eq!(field.min_length, Some(8));
        assert_eq!(field.validations.min_length, Some(8));
    }

    #[test]
    fn test_with_options_for_only_touches_target() {
        let config = default_config();
        let updated =
            config.with_options_for(DEPARTMENT_FIELD_ID, vec![SelectOption::new("1", "Ahuachapán")]);
        assert_eq!(updated.field(DEPARTMENT_FIELD_ID).unwrap().options.len(), 1);
        assert_eq!(updated.field("genero"), config.field("genero"));
    }

    #[test]
    fn test_duplicate_id() {
        let mut config = default_config();
        assert_eq!(config.duplicate_id(), None);
        config
            .fields
            .push(Field::new("genero", "Otro", FieldType::Tel, false, None));
        assert_eq!(config.duplicate_id(), Some("genero"));
    }

    #[test]
    fn test_sync_validations_keeps_min_length_for_text_only() {
        let mut field = Field::new("notas", "Notas", FieldType::Textarea, true, Some(5));
        field.sync_validations();
        assert!(field.validations.required);
        assert_eq!(field.validations.min_length, None);

        field.field_type = FieldType::Text;
        field.sync_validations();
        assert_eq!(field.validations.min_length, Some(5));
    }
}
