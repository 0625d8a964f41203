use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce::coerce_strict;
use crate::error::JsonFormError;
use crate::parse::is_valid_field_name;
use crate::types::ValueKind;

/// The contents of the add/edit field form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: ValueKind,
    /// Text typed into the value box; ignored for objects, arrays and null.
    #[serde(default)]
    pub raw_value: String,
    /// For arrays: seed the new array with one default element of this kind.
    #[serde(default)]
    pub element_kind: Option<ValueKind>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        FieldSpec {
            name: name.into(),
            kind,
            raw_value: String::new(),
            element_kind: None,
        }
    }

    pub fn with_value(mut self, raw_value: impl Into<String>) -> Self {
        self.raw_value = raw_value.into();
        self
    }

    pub fn with_element_kind(mut self, element_kind: ValueKind) -> Self {
        self.element_kind = Some(element_kind);
        self
    }

    /// The validated, trimmed field name.
    pub fn validated_name(&self) -> Result<&str, JsonFormError> {
        validate_field_name(&self.name)
    }

    /// Builds the field's value, rejecting non-numeric input for numbers.
    pub fn build_value(&self) -> Result<Value, JsonFormError> {
        match self.kind {
            ValueKind::Array => Ok(Value::Array(
                self.element_kind
                    .iter()
                    .map(ValueKind::default_value)
                    .collect(),
            )),
            kind => coerce_strict(&self.raw_value, kind),
        }
    }
}

/// Checks a field name against `[A-Za-z_$][A-Za-z0-9_$]*` after trimming.
///
/// ```rust
/// use jsonform::{validate_field_name, JsonFormError};
///
/// assert_eq!(validate_field_name(" _ok1 "), Ok("_ok1"));
/// assert_eq!(validate_field_name("1bad"), Err(JsonFormError::InvalidName("1bad".to_string())));
/// assert_eq!(validate_field_name("  "), Err(JsonFormError::EmptyName));
/// ```
pub fn validate_field_name(name: &str) -> Result<&str, JsonFormError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(JsonFormError::EmptyName);
    }
    if !is_valid_field_name(name) {
        return Err(JsonFormError::InvalidName(name.to_string()));
    }
    Ok(name)
}
