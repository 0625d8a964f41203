use thiserror::Error;

use crate::types::ValueKind;

/// Errors reported by the editor. None of them are fatal, and a rejected
/// operation never leaves the document partially mutated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JsonFormError {
    #[error("Field name is required")]
    EmptyName,
    #[error("Invalid field name `{0}`: only letters, digits, `_` and `$` are allowed, and it may not start with a digit")]
    InvalidName(String),
    #[error("Field `{0}` already exists")]
    DuplicateName(String),
    #[error("Invalid number value `{0}`")]
    InvalidNumber(String),
    #[error("Malformed JSON: {0}")]
    MalformedJson(String),
    #[error("Invalid path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },
    #[error("`{0}` cannot separate path keys: whitespace, `\\` and the characters `[`, `]`, `\"`, `=`, `:` are reserved")]
    InvalidSeparator(char),
    #[error("Unknown value type `{0}` (expected string, number, boolean, array, object or null)")]
    UnknownKind(String),
    #[error("`{path}` is {kind}; only scalar values can be edited inline")]
    NotScalar { path: String, kind: ValueKind },
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("Patch error: {0}")]
    Patch(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
}

/// Failures to walk a path through the document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Path `{path}` not found")]
    NotFound { path: String },
    #[error("`{path}` is {kind} and cannot be indexed by `{step}`")]
    NotIndexable {
        path: String,
        kind: ValueKind,
        step: String,
    },
    #[error("`{path}` is {found}, expected {expected}")]
    ExpectedKind {
        path: String,
        expected: ValueKind,
        found: ValueKind,
    },
    #[error("Index {index} at `{path}` is too far past the end of an array of length {len}")]
    IndexTooFar {
        path: String,
        index: usize,
        len: usize,
    },
    #[error("The document root cannot be removed")]
    RootNotRemovable,
}
