//! The editor session: the single owner of the document being edited.
//!
//! Every operation either completes fully or returns an error with the document
//! exactly as it was. Callers re-render (outline, preview) after each call.

use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use crate::coerce::coerce;
use crate::config::Config;
use crate::error::JsonFormError;
use crate::field::FieldSpec;
use crate::manipulators::{append_value, merge_value, remove_value, set_value};
use crate::outline::{outline, OutlineRow};
use crate::resolve::{resolve, resolve_kind};
use crate::types::{Assignment, Path, PathToken, Separator, ToPath, ValueKind};

#[derive(Debug, Clone)]
pub struct EditorSession {
    document: Value,
    // The document as last imported, cleared or sampled
    baseline: Value,
    separator: Separator,
    indent_size: usize,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    /// A session editing an empty object.
    pub fn new() -> Self {
        Self::with_document(Value::Object(Map::new()))
    }

    pub fn with_document(document: Value) -> Self {
        EditorSession {
            baseline: document.clone(),
            document,
            separator: Separator::Dot,
            indent_size: 2,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, JsonFormError> {
        let mut session = Self::new();
        session.separator = config.separator()?;
        session.indent_size = config.indent_size;
        if config.load_sample {
            session.load_sample();
        }
        Ok(session)
    }

    /// Rejects separators that would clash with the rest of the path syntax.
    pub fn set_separator(&mut self, separator: Separator) -> Result<(), JsonFormError> {
        self.separator = Separator::checked(separator.as_char())?;
        Ok(())
    }

    pub fn separator(&self) -> Separator {
        self.separator
    }

    pub fn set_indent_size(&mut self, indent_size: usize) {
        self.indent_size = indent_size;
    }

    pub fn indent_size(&self) -> usize {
        self.indent_size
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Parses a path string with this session's separator.
    pub fn path<P: ToPath + ?Sized>(&self, path: &P) -> Result<Path, JsonFormError> {
        path.to_path(self.separator)
    }

    /// Formats a path with this session's separator.
    pub fn display_path(&self, path: &Path) -> String {
        path.display_with(self.separator)
    }

    /// Returns the value at `path`.
    pub fn get<P: ToPath + ?Sized>(&self, path: &P) -> Result<&Value, JsonFormError> {
        let path = self.path(path)?;
        Ok(resolve(&self.document, path.tokens())?)
    }

    /// Sets `value` at `path`, creating missing intermediate containers.
    pub fn set<P: ToPath + ?Sized>(&mut self, path: &P, value: Value) -> Result<(), JsonFormError> {
        let path = self.path(path)?;
        set_value(&mut self.document, path.tokens(), value)?;
        debug!(path = %path, "set value");
        Ok(())
    }

    /// Removes the value at `path` and returns it.
    pub fn delete<P: ToPath + ?Sized>(&mut self, path: &P) -> Result<Value, JsonFormError> {
        let path = self.path(path)?;
        let removed = remove_value(&mut self.document, path.tokens())?;
        debug!(path = %path, "deleted value");
        Ok(removed)
    }

    /// Appends `value` to the array at `path` and returns its index.
    pub fn insert<P: ToPath + ?Sized>(&mut self, path: &P, value: Value) -> Result<usize, JsonFormError> {
        let path = self.path(path)?;
        let index = append_value(&mut self.document, path.tokens(), value)?;
        debug!(path = %path, index, "appended value");
        Ok(index)
    }

    /// Deep-merges `value` into whatever is at `path`.
    pub fn merge<P: ToPath + ?Sized>(&mut self, path: &P, value: Value) -> Result<(), JsonFormError> {
        let path = self.path(path)?;
        merge_value(&mut self.document, path.tokens(), value)?;
        debug!(path = %path, "merged value");
        Ok(())
    }

    /// Applies a `path[:type]=value` expression and returns the path it set.
    pub fn assign(&mut self, expression: &str) -> Result<Path, JsonFormError> {
        let assignment = Assignment::from_str_with_separator(expression, self.separator)?;
        let value = assignment.value()?;
        let path = assignment.path();
        self.set(&path, value)?;
        Ok(path)
    }

    /// Adds a new named field to the object at `parent`.
    ///
    /// Rejects invalid names and names already present in the parent.
    pub fn add_field<P: ToPath + ?Sized>(&mut self, parent: &P, spec: &FieldSpec) -> Result<Path, JsonFormError> {
        let parent = self.path(parent)?;
        let name = spec.validated_name()?;
        let object = resolve_kind(&self.document, parent.tokens(), ValueKind::Object)?;
        if object.get(name).is_some() {
            return Err(JsonFormError::DuplicateName(name.to_string()));
        }
        let value = spec.build_value()?;

        let path = parent.join_key(name);
        set_value(&mut self.document, path.tokens(), value)?;
        debug!(path = %path, kind = %spec.kind, "added field");
        Ok(path)
    }

    /// Replaces the field at `path` with the form's value, renaming it if the
    /// form carries a different name.
    ///
    /// A rename onto the name of another existing sibling overwrites that sibling.
    /// Array elements have no name; they are updated in place. Objects and arrays
    /// keep their children when the form does not change their type.
    pub fn edit_field<P: ToPath + ?Sized>(&mut self, path: &P, spec: &FieldSpec) -> Result<Path, JsonFormError> {
        let path = self.path(path)?;
        let current = resolve(&self.document, path.tokens())?;
        let value = if spec.kind.is_container() && spec.kind == ValueKind::of(current) {
            current.clone()
        } else {
            spec.build_value()?
        };

        let target = match (path.parent(), path.last()) {
            (Some(parent), Some(PathToken::Key(old))) => {
                let name = spec.validated_name()?;
                if old == name {
                    path.clone()
                } else {
                    parent.join_key(name)
                }
            }
            _ => path.clone(),
        };

        if target != path {
            remove_value(&mut self.document, path.tokens())?;
            debug!(from = %path, to = %target, "renamed field");
        }
        set_value(&mut self.document, target.tokens(), value)?;
        debug!(path = %target, kind = %spec.kind, "edited field");
        Ok(target)
    }

    /// Inline edit of a scalar: `raw` is coerced to the kind the value already has.
    /// A `null` takes the text as a string.
    pub fn update_value<P: ToPath + ?Sized>(&mut self, path: &P, raw: &str) -> Result<&Value, JsonFormError> {
        let path = self.path(path)?;
        let kind = match ValueKind::of(resolve(&self.document, path.tokens())?) {
            ValueKind::Null => ValueKind::String,
            kind if kind.is_container() => {
                return Err(JsonFormError::NotScalar {
                    path: self.display_path(&path),
                    kind,
                })
            }
            kind => kind,
        };
        set_value(&mut self.document, path.tokens(), coerce(raw, kind))?;
        debug!(path = %path, %kind, "updated value");
        Ok(resolve(&self.document, path.tokens())?)
    }

    /// Appends a default element to the array at `path`.
    ///
    /// Without an explicit kind the new element copies the kind of the first
    /// element, and an empty array gets an empty string.
    pub fn append_item<P: ToPath + ?Sized>(
        &mut self,
        path: &P,
        kind: Option<ValueKind>,
    ) -> Result<usize, JsonFormError> {
        let path = self.path(path)?;
        let array = resolve_kind(&self.document, path.tokens(), ValueKind::Array)?;
        let kind = kind
            .or_else(|| array.as_array().and_then(|items| items.first()).map(ValueKind::of))
            .unwrap_or(ValueKind::String);
        self.insert(&path, kind.default_value())
    }

    /// Removes element `index` from the array at `path`.
    pub fn remove_item<P: ToPath + ?Sized>(&mut self, path: &P, index: usize) -> Result<Value, JsonFormError> {
        let path = self.path(path)?;
        resolve_kind(&self.document, path.tokens(), ValueKind::Array)?;
        self.delete(&path.join_index(index))
    }

    /// Checks that `text` is well-formed JSON without importing it.
    pub fn validate_import(text: &str) -> Result<Value, JsonFormError> {
        serde_json::from_str(text).map_err(|e| JsonFormError::MalformedJson(e.to_string()))
    }

    /// Replaces the document with the JSON in `text`.
    ///
    /// On a syntax error the current document is kept.
    pub fn import(&mut self, text: &str) -> Result<(), JsonFormError> {
        match Self::validate_import(text) {
            Ok(document) => {
                self.replace_document(document);
                info!(bytes = text.len(), "imported document");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "rejected import");
                Err(err)
            }
        }
    }

    /// The document as indented JSON text.
    pub fn export(&self) -> Result<String, JsonFormError> {
        to_json_string(&self.document, self.indent_size)
    }

    /// The live preview text; identical to [`EditorSession::export`].
    pub fn preview(&self) -> String {
        self.export().unwrap_or_else(|err| format!("<{}>", err))
    }

    /// Confirms the document serializes to JSON.
    pub fn validate(&self) -> Result<(), JsonFormError> {
        serde_json::to_string(&self.document)
            .map(|_| ())
            .map_err(|e| JsonFormError::Serialize(e.to_string()))
    }

    /// Resets the document to an empty object.
    pub fn clear(&mut self) {
        self.replace_document(Value::Object(Map::new()));
        info!("cleared document");
    }

    /// Loads the built-in sample document.
    pub fn load_sample(&mut self) {
        self.replace_document(sample_document());
        info!("loaded sample document");
    }

    /// The edits made since the document was last imported, cleared or sampled,
    /// as an RFC 6902 JSON Patch.
    pub fn changes(&self) -> json_patch::Patch {
        json_patch::diff(&self.baseline, &self.document)
    }

    pub fn outline(&self) -> Vec<OutlineRow> {
        outline(&self.document)
    }

    fn replace_document(&mut self, document: Value) {
        self.baseline = document.clone();
        self.document = document;
    }
}

/// Serializes `value` with `indent` spaces per level; `0` yields compact JSON.
pub fn to_json_string(value: &Value, indent: usize) -> Result<String, JsonFormError> {
    if indent == 0 {
        return serde_json::to_string(value).map_err(|e| JsonFormError::Serialize(e.to_string()));
    }
    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| JsonFormError::Serialize(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| JsonFormError::Serialize(e.to_string()))
}

/// The document shown by the `sample` command.
pub fn sample_document() -> Value {
    json!({
        "id": 1,
        "name": "Ali Demir",
        "email": "ali.demir@example.com",
        "phone": "+90 532 123 45 67",
        "addresses": [
            {
                "type": "home",
                "street": "Atatürk Cad. No:45",
                "city": "İstanbul",
                "country": "Türkiye",
                "postalCode": "34000"
            },
            {
                "type": "work",
                "street": "Teknopark Sok. No:12",
                "city": "İstanbul",
                "country": "Türkiye",
                "postalCode": "34906"
            }
        ],
        "roles": ["developer", "admin"]
    })
}
