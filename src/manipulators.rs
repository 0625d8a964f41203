use json_patch::{AddOperation, Patch, PatchOperation, RemoveOperation};
use jsonptr::Token;
use serde_json::{Map, Value};

use crate::error::{JsonFormError, ResolveError};
use crate::resolve::{index_too_far, locate, not_indexable, resolve, resolve_kind, resolve_mut};
use crate::types::{Path, PathToken, ValueKind};

/// How many `null`s an insert may pad an array with to reach its index.
pub const MAX_ARRAY_GAP: usize = 1024;

/// Inserts a value into the JSON object at the specified path tokens.
///
/// Missing containers along the way are created: an array if the next token is an
/// index, an object otherwise. Arrays are padded with `null` up to the index, by at
/// most [`MAX_ARRAY_GAP`] elements. Whatever sits at a step of the wrong kind is
/// replaced; use [`set_value`] to reject that instead.
///
/// # Arguments
///
/// * `json_obj` - The JSON object to insert into.
/// * `tokens` - The path tokens representing where to insert.
/// * `value` - The value to insert.
///
/// # Errors
///
/// `ResolveError::IndexTooFar` if an index lies more than [`MAX_ARRAY_GAP`]
/// elements past the end of its array. The check runs before anything is written.
pub fn insert_value(json_obj: &mut Value, tokens: &[PathToken], value: Value) -> Result<(), ResolveError> {
    check_gaps(json_obj, tokens)?;
    insert_unchecked(json_obj, tokens, value);
    Ok(())
}

fn insert_unchecked(json_obj: &mut Value, tokens: &[PathToken], value: Value) {
    let Some((first, rest)) = tokens.split_first() else {
        *json_obj = value;
        return;
    };

    match first {
        PathToken::Key(key) => {
            if !json_obj.is_object() {
                *json_obj = Value::Object(Map::new());
            }
            if let Value::Object(map) = json_obj {
                let entry = map.entry(key.clone()).or_insert(Value::Null);
                insert_unchecked(entry, rest, value);
            }
        }
        PathToken::Index(index) => {
            if !json_obj.is_array() {
                *json_obj = Value::Array(vec![]);
            }
            if let Value::Array(array) = json_obj {
                // Extend the array if necessary
                if let Some(len) = index.checked_add(1).filter(|len| *len > array.len()) {
                    array.resize(len, Value::Null);
                }
                if let Some(slot) = array.get_mut(*index) {
                    insert_unchecked(slot, rest, value);
                }
            }
        }
    }
}

/// Sets `value` at `tokens`, creating missing intermediate containers.
///
/// A missing or `null` step is created; a step that exists with the wrong kind is
/// rejected with `ResolveError::NotIndexable` and the document is left as it was.
pub fn set_value(json_obj: &mut Value, tokens: &[PathToken], value: Value) -> Result<(), ResolveError> {
    check_settable(json_obj, tokens)?;
    insert_value(json_obj, tokens, value)
}

fn check_settable(root: &Value, tokens: &[PathToken]) -> Result<(), ResolveError> {
    let mut current = Some(root);
    for (depth, token) in tokens.iter().enumerate() {
        current = match (current, token) {
            (None | Some(Value::Null), _) => return Ok(()),
            (Some(Value::Object(map)), PathToken::Key(key)) => map.get(key),
            (Some(Value::Array(items)), PathToken::Index(index)) => items.get(*index),
            (Some(other), token) => return Err(not_indexable(tokens, depth, other, token)),
        };
    }
    Ok(())
}

/// Rejects any index that would pad its array by more than [`MAX_ARRAY_GAP`].
/// Steps that will be created, or replaced for being of the wrong kind, count as
/// empty arrays.
fn check_gaps(root: &Value, tokens: &[PathToken]) -> Result<(), ResolveError> {
    let mut current = Some(root);
    for (depth, token) in tokens.iter().enumerate() {
        current = match (current, token) {
            (Some(Value::Object(map)), PathToken::Key(key)) => map.get(key),
            (_, PathToken::Key(_)) => None,
            (current, PathToken::Index(index)) => {
                let items = current.and_then(Value::as_array);
                let len = items.map_or(0, Vec::len);
                if index.saturating_sub(len) > MAX_ARRAY_GAP {
                    return Err(index_too_far(tokens, depth, *index, len));
                }
                items.and_then(|items| items.get(*index))
            }
        };
    }
    Ok(())
}

/// Removes the value at `tokens` and returns it.
///
/// Object members are removed by key, array elements are spliced out so later
/// elements shift down.
pub fn remove_value(json_obj: &mut Value, tokens: &[PathToken]) -> Result<Value, JsonFormError> {
    locate(json_obj, tokens)?;
    let removed = resolve(json_obj, tokens)?.clone();

    let path = Path::new(tokens.to_vec()).to_pointer();
    apply_patch(json_obj, PatchOperation::Remove(RemoveOperation { path }))?;
    Ok(removed)
}

/// Appends `value` to the array at `tokens`.
pub fn append_value(json_obj: &mut Value, tokens: &[PathToken], value: Value) -> Result<usize, JsonFormError> {
    let len = resolve_kind(json_obj, tokens, ValueKind::Array)?
        .as_array()
        .map_or(0, Vec::len);

    let mut path = Path::new(tokens.to_vec()).to_pointer();
    path.push_back(Token::new("-"));
    apply_patch(json_obj, PatchOperation::Add(AddOperation { path, value }))?;
    Ok(len)
}

/// Deep-merges `value` into whatever is at `tokens`, creating the path if needed.
pub fn merge_value(json_obj: &mut Value, tokens: &[PathToken], value: Value) -> Result<(), ResolveError> {
    check_settable(json_obj, tokens)?;
    match resolve_mut(json_obj, tokens) {
        Ok(target) => {
            let mut value = value;
            merge_json(target, &mut value);
        }
        Err(_) => insert_value(json_obj, tokens, value)?,
    }
    Ok(())
}

/// Merges two JSON values.
///
/// # Arguments
///
/// * `a` - The original JSON value.
/// * `b` - The new JSON value to merge in.
pub fn merge_json(a: &mut Value, b: &mut Value) {
    match (a, b) {
        (Value::Object(a_map), Value::Object(b_map)) => {
            for (k, v) in b_map.iter_mut() {
                merge_json(a_map.entry(k.clone()).or_insert(Value::Null), v);
            }
        }
        (Value::Array(a_array), Value::Array(b_array)) => {
            for (i, v) in b_array.iter_mut().enumerate() {
                if i < a_array.len() {
                    merge_json(&mut a_array[i], v);
                } else {
                    a_array.push(v.take());
                }
            }
        }
        (a, b_value) => {
            *a = b_value.take();
        }
    }
}

fn apply_patch(json_obj: &mut Value, operation: PatchOperation) -> Result<(), JsonFormError> {
    let patch = Patch(vec![operation]);
    json_patch::patch(json_obj, &patch).map_err(|e| JsonFormError::Patch(e.to_string()))
}
