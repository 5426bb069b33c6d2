//! Schema editing operations
//!
//! Every operation takes the current [`FormConfig`] and returns a whole new
//! one; the caller swaps it in. Protection of default fields against
//! deletion lives in [`remove_field`]. Protection of their `required` and
//! minimum-length settings is the UI's job: it consults [`is_locked`] and
//! never issues those updates.

use super::{is_default_field, Field, FieldType, FormConfig, SelectOption, Validations};
use tracing::{info, warn};

/// A single property of a field that the editor can replace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldProperty {
    Label(String),
    FieldType(FieldType),
    Required(bool),
    MinLength(Option<u32>),
    Options(Vec<SelectOption>),
}

impl FieldProperty {
    fn name(&self) -> &'static str {
        match self {
            FieldProperty::Label(_) => "label",
            FieldProperty::FieldType(_) => "type",
            FieldProperty::Required(_) => "required",
            FieldProperty::MinLength(_) => "minLength",
            FieldProperty::Options(_) => "options",
        }
    }
}

/// Whether the editor should refuse to offer `property` for this field
pub fn is_locked(field_id: &str, property: &FieldProperty) -> bool {
    is_default_field(field_id)
        && matches!(
            property,
            FieldProperty::Required(_) | FieldProperty::MinLength(_)
        )
}

/// Replace one property on the field with id `field_id`.
///
/// Unknown ids leave the config unchanged.
pub fn update_field_property(
    config: &FormConfig,
    field_id: &str,
    property: FieldProperty,
) -> FormConfig {
    if !config.contains(field_id) {
        return config.clone();
    }
    info!(field = field_id, property = property.name(), "updating field property");

    let fields = config
        .fields
        .iter()
        .map(|field| {
            if field.id != field_id {
                return field.clone();
            }
            let mut updated = field.clone();
            match &property {
                FieldProperty::Label(label) => updated.label = label.clone(),
                FieldProperty::FieldType(field_type) => updated.field_type = *field_type,
                FieldProperty::Required(required) => updated.required = *required,
                FieldProperty::MinLength(min_length) => updated.min_length = *min_length,
                FieldProperty::Options(options) => updated.options = options.clone(),
            }
            updated.sync_validations();
            updated
        })
        .collect();

    FormConfig { fields }
}

/// Remove a field unless it is one of the default fields.
///
/// Attempts on default fields are ignored without an error.
pub fn remove_field(config: &FormConfig, field_id: &str) -> FormConfig {
    if is_default_field(field_id) {
        warn!(field = field_id, "refusing to remove default field");
        return config.clone();
    }

    let fields: Vec<Field> = config
        .fields
        .iter()
        .filter(|field| field.id != field_id)
        .cloned()
        .collect();
    if fields.len() != config.fields.len() {
        info!(field = field_id, "removed field");
    }
    FormConfig { fields }
}

/// Lowercase the id and replace each run of whitespace with `_`
pub fn normalize_id(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut in_space = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// The field being composed in the "add field" flow
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DraftField {
    pub id: String,
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    pub min_length: u32,
    pub options: Vec<SelectOption>,
}

impl DraftField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an option; both parts must be non-empty
    pub fn add_option(&mut self, value: &str, label: &str) -> bool {
        if value.is_empty() || label.is_empty() {
            return false;
        }
        self.options.push(SelectOption::new(value, label));
        true
    }

    pub fn remove_option(&mut self, index: usize) {
        if index < self.options.len() {
            self.options.remove(index);
        }
    }

    pub fn reset(&mut self) {
        *self = DraftField::default();
    }

    fn to_field(&self) -> Field {
        let min_length = if self.field_type.supports_min_length() && self.min_length > 0 {
            Some(self.min_length)
        } else {
            None
        };
        let options = if self.field_type == FieldType::Select {
            self.options.clone()
        } else {
            Vec::new()
        };

        let mut field = Field {
            id: normalize_id(self.id.trim()),
            label: self.label.trim().to_string(),
            field_type: self.field_type,
            required: self.required,
            min_length,
            options,
            validations: Validations::default(),
        };
        field.sync_validations();
        field
    }
}

/// Inline errors for the add-field dialog
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DraftErrors {
    pub id: Option<String>,
    pub label: Option<String>,
}

impl DraftErrors {
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.label.is_none()
    }
}

pub const ID_REQUIRED: &str = "El ID del campo es requerido";
pub const LABEL_REQUIRED: &str = "La etiqueta es requerida";
pub const ID_DUPLICATE: &str = "Ya existe un campo con ese ID";

/// Validate the draft and append it to the schema.
///
/// On success the draft is reset to blank defaults. On failure the draft is
/// left as typed so the operator can correct it.
pub fn add_new_field(config: &FormConfig, draft: &mut DraftField) -> Result<FormConfig, DraftErrors> {
    let mut errors = DraftErrors::default();

    if draft.id.trim().is_empty() {
        errors.id = Some(ID_REQUIRED.to_string());
    } else if config.contains(&normalize_id(draft.id.trim())) {
        errors.id = Some(ID_DUPLICATE.to_string());
    }
    if draft.label.trim().is_empty() {
        errors.label = Some(LABEL_REQUIRED.to_string());
    }

    if !errors.is_empty() {
        warn!(?errors, "rejected new field");
        return Err(errors);
    }

    let field = draft.to_field();
    info!(field = %field.id, field_type = %field.field_type, "added field");

    let mut fields = config.fields.clone();
    fields.push(field);
    draft.reset();
    Ok(FormConfig { fields })
}
