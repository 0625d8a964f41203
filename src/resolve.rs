use serde_json::Value;

use crate::error::ResolveError;
use crate::types::{Path, PathToken, ValueKind};

/// Walks `tokens` from `root` and returns the value they address.
///
/// ## Errors
///
/// * `ResolveError::NotFound` if a key is missing or an index is past the end.
/// * `ResolveError::NotIndexable` if a step meets a scalar, a key meets an array,
///   or an index meets an object.
///
/// ## Example
///
/// ```rust
/// use jsonform::{resolve, Path};
/// use serde_json::json;
///
/// let doc = json!({"addresses": [{"city": "Istanbul"}]});
/// let path: Path = "addresses[0].city".parse().unwrap();
/// assert_eq!(resolve(&doc, path.tokens()), Ok(&json!("Istanbul")));
/// ```
pub fn resolve<'v>(root: &'v Value, tokens: &[PathToken]) -> Result<&'v Value, ResolveError> {
    let mut current = root;
    for (depth, token) in tokens.iter().enumerate() {
        current = match (current, token) {
            (Value::Object(map), PathToken::Key(key)) => map.get(key),
            (Value::Array(items), PathToken::Index(index)) => items.get(*index),
            (other, token) => return Err(not_indexable(tokens, depth, other, token)),
        }
        .ok_or_else(|| not_found(tokens, depth))?;
    }
    Ok(current)
}

/// Mutable counterpart of [`resolve`].
pub fn resolve_mut<'v>(
    root: &'v mut Value,
    tokens: &[PathToken],
) -> Result<&'v mut Value, ResolveError> {
    let mut current = root;
    for (depth, token) in tokens.iter().enumerate() {
        current = match (current, token) {
            (Value::Object(map), PathToken::Key(key)) => map.get_mut(key),
            (Value::Array(items), PathToken::Index(index)) => items.get_mut(*index),
            (other, token) => return Err(not_indexable(tokens, depth, other, token)),
        }
        .ok_or_else(|| not_found(tokens, depth))?;
    }
    Ok(current)
}

/// Resolves the container holding the last step of `tokens`.
///
/// Returns the parent value together with the final step, or
/// `ResolveError::RootNotRemovable` for the root path, which has no parent.
pub fn locate<'v, 't>(
    root: &'v Value,
    tokens: &'t [PathToken],
) -> Result<(&'v Value, &'t PathToken), ResolveError> {
    let (last, parent_tokens) = tokens.split_last().ok_or(ResolveError::RootNotRemovable)?;
    let parent = resolve(root, parent_tokens)?;
    match (parent, last) {
        (Value::Object(_), PathToken::Key(_)) | (Value::Array(_), PathToken::Index(_)) => {
            Ok((parent, last))
        }
        (other, token) => Err(not_indexable(tokens, parent_tokens.len(), other, token)),
    }
}

/// Resolves `tokens` and checks that the value found is of `expected` kind.
pub fn resolve_kind<'v>(
    root: &'v Value,
    tokens: &[PathToken],
    expected: ValueKind,
) -> Result<&'v Value, ResolveError> {
    let found = resolve(root, tokens)?;
    let kind = ValueKind::of(found);
    if kind == expected {
        Ok(found)
    } else {
        Err(ResolveError::ExpectedKind {
            path: display_prefix(tokens, tokens.len()),
            expected,
            found: kind,
        })
    }
}

pub(crate) fn not_found(tokens: &[PathToken], depth: usize) -> ResolveError {
    ResolveError::NotFound {
        path: display_prefix(tokens, depth + 1),
    }
}

pub(crate) fn not_indexable(
    tokens: &[PathToken],
    depth: usize,
    value: &Value,
    token: &PathToken,
) -> ResolveError {
    ResolveError::NotIndexable {
        path: display_prefix(tokens, depth),
        kind: ValueKind::of(value),
        step: match token {
            PathToken::Key(key) => key.clone(),
            PathToken::Index(index) => format!("[{}]", index),
        },
    }
}

pub(crate) fn index_too_far(tokens: &[PathToken], depth: usize, index: usize, len: usize) -> ResolveError {
    ResolveError::IndexTooFar {
        path: display_prefix(tokens, depth),
        index,
        len,
    }
}

fn display_prefix(tokens: &[PathToken], len: usize) -> String {
    let path = Path::new(tokens[..len.min(tokens.len())].to_vec());
    if path.is_root() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}
