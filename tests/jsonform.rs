use jsonform::{
    sample_document, EditorSession, FieldSpec, JsonFormError, Path, ResolveError, Separator,
    ValueKind,
};
use serde_json::json;
use yare::parameterized;

fn session() -> EditorSession {
    EditorSession::with_document(json!({
        "name": "Ali",
        "age": 30,
        "active": true,
        "tags": ["a", "b"],
        "address": {"city": "İstanbul"},
        "empty": [],
        "nothing": null
    }))
}

#[test]
fn test_new_session_is_empty_object() {
    let session = EditorSession::new();
    assert_eq!(session.document(), &json!({}));
    assert_eq!(session.export().unwrap(), "{}");
}

#[test]
fn test_export_round_trips() {
    let mut session = EditorSession::with_document(sample_document());
    let text = session.export().unwrap();
    let reparsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(&reparsed, session.document());

    session.import(&text).unwrap();
    assert_eq!(session.document(), &sample_document());
}

#[parameterized(
    two_spaces = { 2, "{\n  \"a\": [\n    1\n  ]\n}" },
    four_spaces = { 4, "{\n    \"a\": [\n        1\n    ]\n}" },
    compact = { 0, "{\"a\":[1]}" },
)]
fn test_export_indent(indent: usize, expected: &str) {
    let mut session = EditorSession::with_document(json!({"a": [1]}));
    session.set_indent_size(indent);
    assert_eq!(session.export().unwrap(), expected);
    assert_eq!(session.preview(), expected);
}

#[test]
fn test_import_malformed_keeps_document() {
    let mut session = session();
    let before = session.document().clone();
    let result = session.import("{not json");
    assert!(matches!(result, Err(JsonFormError::MalformedJson(_))));
    assert_eq!(session.document(), &before);
}

#[test]
fn test_import_replaces_document_wholesale() {
    let mut session = session();
    session.import("[1, {\"x\": null}]").unwrap();
    assert_eq!(session.document(), &json!([1, {"x": null}]));
    assert_eq!(session.get("[1].x").unwrap(), &json!(null));
}

#[test]
fn test_validate_import_does_not_import() {
    assert!(EditorSession::validate_import("{\"ok\": true}").is_ok());
    assert!(matches!(
        EditorSession::validate_import("[1,"),
        Err(JsonFormError::MalformedJson(_))
    ));
}

#[parameterized(
    top_level = { "fresh", json!(1) },
    nested_new = { "address.zip.code", json!("34000") },
    into_array = { "tags[1]", json!("z") },
    new_array = { "matrix[0][0]", json!(0) },
    over_null = { "nothing.x", json!(false) },
)]
fn test_set_then_get(path: &str, value: serde_json::Value) {
    let mut session = session();
    session.set(path, value.clone()).unwrap();
    assert_eq!(session.get(path).unwrap(), &value);
}

#[test]
fn test_delete_then_get_is_not_found() {
    let mut session = session();
    assert_eq!(session.delete("address.city").unwrap(), json!("İstanbul"));
    assert_eq!(
        session.get("address.city"),
        Err(JsonFormError::Resolve(ResolveError::NotFound {
            path: "address.city".to_string()
        }))
    );
}

#[test]
fn test_append_then_delete_restores_empty_array() {
    let mut session = session();
    let before = session.document().clone();
    let index = session.insert("empty", json!("x")).unwrap();
    assert_eq!(index, 0);
    session.delete("empty[0]").unwrap();
    assert_eq!(session.document(), &before);
}

#[parameterized(
    max_index = { "a[18446744073709551615]" },
    huge_index = { "tags[10000000000]" },
)]
fn test_set_huge_index_is_an_error(path: &str) {
    let mut session = session();
    let before = session.document().clone();
    assert!(matches!(
        session.set(path, json!(1)),
        Err(JsonFormError::Resolve(ResolveError::IndexTooFar { .. }))
    ));
    assert!(matches!(
        session.assign(&format!("{}=1", path)),
        Err(JsonFormError::Resolve(ResolveError::IndexTooFar { .. }))
    ));
    assert_eq!(session.document(), &before);
}

#[test]
fn test_invalid_path_is_reported() {
    let mut session = session();
    assert!(matches!(
        session.set("a..b", json!(1)),
        Err(JsonFormError::InvalidPath { .. })
    ));
}

#[parameterized(
    string = { FieldSpec::new("title", ValueKind::String).with_value("Dr"), json!("Dr") },
    number = { FieldSpec::new("score", ValueKind::Number).with_value("9.5"), json!(9.5) },
    empty_number = { FieldSpec::new("count", ValueKind::Number), json!(0) },
    boolean = { FieldSpec::new("admin", ValueKind::Boolean).with_value("true"), json!(true) },
    object = { FieldSpec::new("meta", ValueKind::Object), json!({}) },
    null = { FieldSpec::new("gone", ValueKind::Null), json!(null) },
    empty_array = { FieldSpec::new("list", ValueKind::Array), json!([]) },
    seeded_array = { FieldSpec::new("list", ValueKind::Array).with_element_kind(ValueKind::Number), json!([0]) },
    trimmed_name = { FieldSpec::new("  padded ", ValueKind::String), json!("") },
)]
fn test_add_field(spec: FieldSpec, expected: serde_json::Value) {
    let mut session = session();
    let path = session.add_field("", &spec).unwrap();
    assert_eq!(path.to_string(), spec.name.trim());
    assert_eq!(session.get(&path).unwrap(), &expected);
}

#[test]
fn test_add_field_nested() {
    let mut session = session();
    let spec = FieldSpec::new("zip", ValueKind::String).with_value("34000");
    let path = session.add_field("address", &spec).unwrap();
    assert_eq!(path, "address.zip".parse::<Path>().unwrap());
    assert_eq!(session.document()["address"], json!({"city": "İstanbul", "zip": "34000"}));
}

#[parameterized(
    empty_name = { "", ValueKind::String, "", JsonFormError::EmptyName },
    blank_name = { "   ", ValueKind::String, "", JsonFormError::EmptyName },
    leading_digit = { "1bad", ValueKind::String, "", JsonFormError::InvalidName("1bad".to_string()) },
    dash = { "bad-name", ValueKind::String, "", JsonFormError::InvalidName("bad-name".to_string()) },
    duplicate = { "name", ValueKind::String, "x", JsonFormError::DuplicateName("name".to_string()) },
    bad_number = { "n", ValueKind::Number, "12abc", JsonFormError::InvalidNumber("12abc".to_string()) },
)]
fn test_add_field_rejections(name: &str, kind: ValueKind, raw: &str, expected: JsonFormError) {
    let mut session = session();
    let before = session.document().clone();
    let spec = FieldSpec::new(name, kind).with_value(raw);
    assert_eq!(session.add_field("", &spec), Err(expected));
    assert_eq!(session.document(), &before);
}

#[test]
fn test_add_field_accepts_underscore_name() {
    let mut session = session();
    assert!(session
        .add_field("", &FieldSpec::new("_ok1", ValueKind::Null))
        .is_ok());
}

#[test]
fn test_add_field_requires_object_parent() {
    let mut session = session();
    let result = session.add_field("tags", &FieldSpec::new("x", ValueKind::String));
    assert_eq!(
        result,
        Err(JsonFormError::Resolve(ResolveError::ExpectedKind {
            path: "tags".to_string(),
            expected: ValueKind::Object,
            found: ValueKind::Array,
        }))
    );
}

#[test]
fn test_edit_field_in_place() {
    let mut session = session();
    let spec = FieldSpec::new("age", ValueKind::Number).with_value("31");
    let path = session.edit_field("age", &spec).unwrap();
    assert_eq!(path.to_string(), "age");
    assert_eq!(session.get("age").unwrap(), &json!(31));
}

#[test]
fn test_edit_field_rename_moves_value() {
    let mut session = session();
    let spec = FieldSpec::new("city_name", ValueKind::String).with_value("Ankara");
    let path = session.edit_field("address.city", &spec).unwrap();
    assert_eq!(path.to_string(), "address.city_name");
    assert_eq!(session.document()["address"], json!({"city_name": "Ankara"}));
}

#[test]
fn test_edit_field_rename_onto_sibling_overwrites() {
    let mut session = session();
    let spec = FieldSpec::new("age", ValueKind::String).with_value("Ali");
    session.edit_field("name", &spec).unwrap();
    assert!(session.get("name").is_err());
    assert_eq!(session.get("age").unwrap(), &json!("Ali"));
}

#[test]
fn test_edit_container_keeps_children() {
    let mut session = session();
    let spec = FieldSpec::new("location", ValueKind::Object);
    session.edit_field("address", &spec).unwrap();
    assert_eq!(session.get("location").unwrap(), &json!({"city": "İstanbul"}));
}

#[test]
fn test_edit_array_element_ignores_name() {
    let mut session = session();
    let spec = FieldSpec::new("", ValueKind::String).with_value("c");
    let path = session.edit_field("tags[1]", &spec).unwrap();
    assert_eq!(path.to_string(), "tags[1]");
    assert_eq!(session.get("tags").unwrap(), &json!(["a", "c"]));
}

#[test]
fn test_edit_field_rejects_bad_name_without_mutating() {
    let mut session = session();
    let before = session.document().clone();
    let spec = FieldSpec::new("9lives", ValueKind::String).with_value("x");
    assert_eq!(
        session.edit_field("name", &spec),
        Err(JsonFormError::InvalidName("9lives".to_string()))
    );
    assert_eq!(session.document(), &before);
}

#[parameterized(
    number = { "age", "41", json!(41) },
    number_fallback = { "age", "forty", json!(0) },
    boolean_true = { "active", "true", json!(true) },
    boolean_false = { "active", "nope", json!(false) },
    string = { "name", "Veli", json!("Veli") },
    array_element = { "tags[0]", "z", json!("z") },
    null_takes_text = { "nothing", "now set", json!("now set") },
)]
fn test_update_value(path: &str, raw: &str, expected: serde_json::Value) {
    let mut session = session();
    assert_eq!(session.update_value(path, raw).unwrap(), &expected);
    assert_eq!(session.get(path).unwrap(), &expected);
}

#[test]
fn test_update_value_rejects_containers() {
    let mut session = session();
    assert_eq!(
        session.update_value("address", "x"),
        Err(JsonFormError::NotScalar {
            path: "address".to_string(),
            kind: ValueKind::Object,
        })
    );
}

#[parameterized(
    inferred_from_first = { "tags", None, json!(["a", "b", ""]) },
    explicit_kind = { "tags", Some(ValueKind::Object), json!(["a", "b", {}]) },
    empty_defaults_to_string = { "empty", None, json!([""]) },
    empty_with_kind = { "empty", Some(ValueKind::Array), json!([[]]) },
)]
fn test_append_item(path: &str, kind: Option<ValueKind>, expected: serde_json::Value) {
    let mut session = session();
    session.append_item(path, kind).unwrap();
    assert_eq!(session.get(path).unwrap(), &expected);
}

#[test]
fn test_append_item_infers_number() {
    let mut session = EditorSession::with_document(json!({"scores": [10, 20]}));
    assert_eq!(session.append_item("scores", None).unwrap(), 2);
    assert_eq!(session.document(), &json!({"scores": [10, 20, 0]}));
}

#[test]
fn test_remove_item() {
    let mut session = session();
    assert_eq!(session.remove_item("tags", 0).unwrap(), json!("a"));
    assert_eq!(session.get("tags").unwrap(), &json!(["b"]));
    assert!(session.remove_item("tags", 5).is_err());
    assert!(session.remove_item("address", 0).is_err());
}

#[test]
fn test_assign_typed_and_inferred() {
    let mut session = session();
    session.assign("address.zip:string=34000").unwrap();
    session.assign("address.floor=3").unwrap();
    assert_eq!(
        session.document()["address"],
        json!({"city": "İstanbul", "zip": "34000", "floor": 3})
    );
}

#[test]
fn test_merge_keeps_existing_keys() {
    let mut session = session();
    session
        .merge("address", json!({"country": "Türkiye"}))
        .unwrap();
    assert_eq!(
        session.document()["address"],
        json!({"city": "İstanbul", "country": "Türkiye"})
    );
}

#[test]
fn test_clear_and_sample() {
    let mut session = session();
    session.clear();
    assert_eq!(session.document(), &json!({}));
    session.load_sample();
    assert_eq!(session.get("addresses[1].type").unwrap(), &json!("work"));
    assert_eq!(session.get("roles").unwrap(), &json!(["developer", "admin"]));
}

#[test]
fn test_changes_since_import() {
    let mut session = EditorSession::new();
    session.import("{\"a\": 1, \"b\": [1]}").unwrap();
    assert!(session.changes().0.is_empty());

    session.set("a", json!(2)).unwrap();
    session.delete("b").unwrap();
    let patch = serde_json::to_value(session.changes()).unwrap();
    let ops = patch.as_array().unwrap();
    assert_eq!(ops.len(), 2);
    assert!(ops.contains(&json!({"op": "replace", "path": "/a", "value": 2})));
    assert!(ops.contains(&json!({"op": "remove", "path": "/b"})));

    session.clear();
    assert!(session.changes().0.is_empty());
}

#[test]
fn test_slash_separator_session() {
    let mut session = EditorSession::new();
    session.set_separator(Separator::Slash).unwrap();
    session.set("server/ports[0]", json!(8080)).unwrap();
    session.set("a.b", json!(1)).unwrap();
    assert_eq!(
        session.document(),
        &json!({"server": {"ports": [8080]}, "a.b": 1})
    );
}

#[test]
fn test_outline_rows() {
    let session = EditorSession::with_document(json!({
        "name": "Ali",
        "roles": ["dev"],
        "address": {"city": "X"}
    }));
    let rows: Vec<_> = session
        .outline()
        .iter()
        .map(|row| (row.path.to_string(), row.depth, row.label.clone(), row.kind))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("name".to_string(), 0, "name".to_string(), ValueKind::String),
            ("roles".to_string(), 0, "roles".to_string(), ValueKind::Array),
            ("roles[0]".to_string(), 1, "[0]".to_string(), ValueKind::String),
            ("address".to_string(), 0, "address".to_string(), ValueKind::Object),
            ("address.city".to_string(), 1, "city".to_string(), ValueKind::String),
        ]
    );
    assert_eq!(session.outline()[1].render(2), "roles (Array, 1)");
    assert_eq!(session.outline()[2].render(2), "  [0] (String) \"dev\"");
}
