//! # jsonform
//!
//! A path-addressed editor for JSON documents: the model behind a form-style JSON
//! builder where every field shows its path, type and value, and edits keep a
//! formatted preview in sync.
//!
//! Paths borrow jq/JavaScript syntax: keys joined by `.` and array positions in
//! brackets, e.g. `addresses[0].city`. The empty path is the document root.
//!
//! ## Features
//!
//! - **Path resolution:** parse a path and walk it, with distinct errors for
//!   missing steps and steps that cannot be indexed.
//! - **Tree mutation:** set (creating missing containers on the way), delete,
//!   append, and deep-merge at a path. A rejected operation never leaves the
//!   document half-changed.
//! - **Typed fields:** turn form text plus a type tag into a JSON value, with
//!   field-name validation and duplicate detection.
//! - **Import/export:** replace the document from JSON text, export it indented,
//!   and list the edits since the last import as a JSON Patch.
//! - **Custom Separators:** keys can be separated by `Separator::Dot` (`.`),
//!   `Separator::Slash` (`/`), or `Separator::Custom(char)`.
//!
//! ## Examples
//!
//! ### Building a document:
//!
//! ```rust
//! use jsonform::{EditorSession, FieldSpec, ValueKind};
//! use serde_json::json;
//!
//! let mut session = EditorSession::new();
//! session.add_field("", &FieldSpec::new("name", ValueKind::String).with_value("Ali")).unwrap();
//! session
//!     .add_field("", &FieldSpec::new("roles", ValueKind::Array).with_element_kind(ValueKind::String))
//!     .unwrap();
//! session.set("roles[0]", json!("developer")).unwrap();
//! session.set("address.city", json!("İstanbul")).unwrap();
//!
//! assert_eq!(
//!     session.document(),
//!     &json!({
//!         "name": "Ali",
//!         "roles": ["developer"],
//!         "address": {"city": "İstanbul"}
//!     })
//! );
//! ```
//!
//! ### Rejected edits leave the document alone
//!
//! ```rust
//! use jsonform::{EditorSession, JsonFormError};
//! use serde_json::json;
//!
//! let mut session = EditorSession::with_document(json!({"id": 1}));
//!
//! assert!(matches!(session.import("{not json"), Err(JsonFormError::MalformedJson(_))));
//! assert!(session.set("id.nested", json!(true)).is_err());
//! assert_eq!(session.document(), &json!({"id": 1}));
//! ```
//!
//! ### Assignment expressions
//!
//! ```rust
//! use jsonform::EditorSession;
//! use serde_json::json;
//!
//! let mut session = EditorSession::new();
//! session.assign("settings.theme.size:number=12").unwrap();
//! session.assign("settings.theme.font=Helvetica").unwrap();
//!
//! assert_eq!(
//!     session.document(),
//!     &json!({"settings": {"theme": {"size": 12, "font": "Helvetica"}}})
//! );
//! ```

pub mod coerce;
pub mod config;
mod error;
mod field;
mod manipulators;
pub mod outline;
mod parse;
pub mod repl;
mod resolve;
pub mod session;
mod types;

pub use coerce::{coerce, coerce_strict, infer_value};
pub use error::{JsonFormError, ResolveError};
pub use field::{validate_field_name, FieldSpec};
pub use manipulators::{
    append_value, insert_value, merge_json, merge_value, remove_value, set_value, MAX_ARRAY_GAP,
};
pub use outline::{outline, OutlineRow};
pub use parse::{is_valid_field_name, parse_assignment, parse_path};
pub use resolve::{locate, resolve, resolve_kind, resolve_mut};
pub use session::{sample_document, to_json_string, EditorSession};
pub use types::{Assignment, Path, PathToken, Separator, ToPath, ValueKind};
