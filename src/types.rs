use std::fmt;
use std::str::FromStr;

use jsonptr::{PointerBuf, Token};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce::{coerce_strict, infer_value};
use crate::error::JsonFormError;
use crate::manipulators::insert_value;
use crate::parse::{parse_assignment, parse_path};

/// A single step of a [`Path`]: a key into an object or an index into an array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PathToken {
    Key(String),
    Index(usize),
}

impl From<&str> for PathToken {
    fn from(key: &str) -> Self {
        PathToken::Key(key.to_string())
    }
}

impl From<String> for PathToken {
    fn from(key: String) -> Self {
        PathToken::Key(key)
    }
}

impl From<usize> for PathToken {
    fn from(index: usize) -> Self {
        PathToken::Index(index)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Separator {
    #[default]
    Dot,
    Slash,
    Custom(char),
}

impl Separator {
    /// Accepts `c` unless it already means something in a path or on a command line.
    ///
    /// ```rust
    /// use jsonform::{JsonFormError, Separator};
    ///
    /// assert_eq!(Separator::checked('|'), Ok(Separator::Custom('|')));
    /// assert_eq!(Separator::checked('='), Err(JsonFormError::InvalidSeparator('=')));
    /// ```
    pub fn checked(c: char) -> Result<Self, JsonFormError> {
        if RESERVED_KEY_CHARS.contains(&c) || c.is_whitespace() || c == '\\' {
            return Err(JsonFormError::InvalidSeparator(c));
        }
        Ok(Separator::from(c))
    }

    pub fn as_char(&self) -> char {
        match self {
            Separator::Dot => '.',
            Separator::Slash => '/',
            Separator::Custom(c) => *c,
        }
    }
}

impl From<char> for Separator {
    fn from(c: char) -> Self {
        match c {
            '.' => Separator::Dot,
            '/' => Separator::Slash,
            c => Separator::Custom(c),
        }
    }
}

/// An address inside a JSON document, from the root down.
///
/// The textual form mirrors what the editor shows next to each field:
/// keys joined by the separator and array positions in brackets, e.g.
/// `addresses[0].city`. The empty path is the document root.
///
/// ## Example
///
/// ```rust
/// use jsonform::{Path, PathToken};
///
/// let path: Path = "addresses[0].city".parse().unwrap();
/// assert_eq!(
///     path.tokens(),
///     &[
///         PathToken::Key("addresses".to_string()),
///         PathToken::Index(0),
///         PathToken::Key("city".to_string()),
///     ]
/// );
/// assert_eq!(path.to_string(), "addresses[0].city");
/// assert_eq!(path.to_pointer().to_string(), "/addresses/0/city");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Path {
    tokens: Vec<PathToken>,
}

impl Path {
    /// The empty path, addressing the document root.
    pub fn root() -> Self {
        Path { tokens: Vec::new() }
    }

    pub fn new(tokens: Vec<PathToken>) -> Self {
        Path { tokens }
    }

    /// Parses a path using the given separator between keys.
    pub fn parse_with_separator(input: &str, separator: Separator) -> Result<Self, JsonFormError> {
        parse_path(input, separator).map(Path::new)
    }

    pub fn tokens(&self) -> &[PathToken] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<PathToken> {
        self.tokens
    }

    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The final step, if this is not the root.
    pub fn last(&self) -> Option<&PathToken> {
        self.tokens.last()
    }

    /// The path of the containing node, or `None` for the root.
    pub fn parent(&self) -> Option<Path> {
        self.tokens
            .split_last()
            .map(|(_, parent)| Path::new(parent.to_vec()))
    }

    /// Returns a new path one key deeper.
    pub fn join_key(&self, key: impl Into<String>) -> Path {
        let mut tokens = self.tokens.clone();
        tokens.push(PathToken::Key(key.into()));
        Path::new(tokens)
    }

    /// Returns a new path one array position deeper.
    pub fn join_index(&self, index: usize) -> Path {
        let mut tokens = self.tokens.clone();
        tokens.push(PathToken::Index(index));
        Path::new(tokens)
    }

    /// Converts the path into an RFC 6901 JSON Pointer.
    pub fn to_pointer(&self) -> PointerBuf {
        PointerBuf::from_tokens(self.tokens.iter().map(|token| match token {
            PathToken::Key(key) => Token::new(key.as_str()),
            PathToken::Index(index) => Token::new(index.to_string()),
        }))
    }

    /// Formats the path using the given separator between keys.
    pub fn display_with(&self, separator: Separator) -> String {
        let sep = separator.as_char();
        let mut out = String::new();
        for token in &self.tokens {
            match token {
                PathToken::Key(key) => {
                    if !out.is_empty() {
                        out.push(sep);
                    }
                    write_key(&mut out, key, sep);
                }
                PathToken::Index(index) => {
                    out.push('[');
                    out.push_str(&index.to_string());
                    out.push(']');
                }
            }
        }
        out
    }
}

/// Characters that end a bare key in the path grammar, besides the separator.
pub(crate) const RESERVED_KEY_CHARS: [char; 5] = ['[', ']', '"', '=', ':'];

pub(crate) fn is_bare_key_char(c: char, separator: char) -> bool {
    c != separator && !RESERVED_KEY_CHARS.contains(&c)
}

fn write_key(out: &mut String, key: &str, separator: char) {
    if !key.is_empty() && key.chars().all(|c| is_bare_key_char(c, separator)) {
        out.push_str(key);
        return;
    }
    out.push('"');
    for c in key.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
}

impl FromStr for Path {
    type Err = JsonFormError;

    /// Parses a path using the default separator of `Separator::Dot`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Path::parse_with_separator(input, Separator::Dot)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_with(Separator::Dot))
    }
}

impl From<Vec<PathToken>> for Path {
    fn from(tokens: Vec<PathToken>) -> Self {
        Path::new(tokens)
    }
}

/// Anything the editor accepts where a path is expected: path strings, which are
/// parsed with the session's separator, or already-built [`Path`]s.
pub trait ToPath {
    fn to_path(&self, separator: Separator) -> Result<Path, JsonFormError>;
}

impl ToPath for str {
    fn to_path(&self, separator: Separator) -> Result<Path, JsonFormError> {
        Path::parse_with_separator(self, separator)
    }
}

impl ToPath for String {
    fn to_path(&self, separator: Separator) -> Result<Path, JsonFormError> {
        Path::parse_with_separator(self, separator)
    }
}

impl ToPath for Path {
    fn to_path(&self, _separator: Separator) -> Result<Path, JsonFormError> {
        Ok(self.clone())
    }
}

/// A parsed assignment expression, `path[:type]=value`.
///
/// Without a type the value is inferred: anything that parses as JSON is taken as
/// JSON, everything else becomes a string.
///
/// ## Example
///
/// ```rust
/// use jsonform::Assignment;
/// use serde_json::json;
///
/// let assignment: Assignment = "roles[1]:number=42".parse().unwrap();
/// assert_eq!(assignment.as_json().unwrap(), json!({"roles": [null, 42]}));
///
/// let assignment: Assignment = "name=Ali Demir".parse().unwrap();
/// assert_eq!(assignment.value().unwrap(), json!("Ali Demir"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assignment {
    // The path tokens on the left-hand side of the assignment
    pub tokens: Vec<PathToken>,
    // The declared type, if any
    pub kind: Option<ValueKind>,
    // The raw text on the right-hand side of the assignment
    pub raw: String,
}

impl FromStr for Assignment {
    type Err = JsonFormError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        parse_assignment(input, Separator::Dot)
    }
}

impl Assignment {
    pub fn from_str_with_separator(input: &str, separator: Separator) -> Result<Self, JsonFormError> {
        parse_assignment(input, separator)
    }

    pub fn path(&self) -> Path {
        Path::new(self.tokens.clone())
    }

    /// The typed right-hand side. A declared type is coerced strictly, so
    /// `n:number=abc` is an `InvalidNumber` error rather than zero.
    pub fn value(&self) -> Result<Value, JsonFormError> {
        match self.kind {
            Some(kind) => coerce_strict(&self.raw, kind),
            None => Ok(infer_value(&self.raw)),
        }
    }

    /// Builds a new document holding only this assignment.
    pub fn as_json(&self) -> Result<Value, JsonFormError> {
        let mut json_obj = Value::Null;
        insert_value(&mut json_obj, &self.tokens, self.value()?)?;
        Ok(json_obj)
    }
}

/// The type tag of a JSON value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    Array,
    Object,
    Null,
}

impl ValueKind {
    pub const ALL: [ValueKind; 6] = [
        ValueKind::String,
        ValueKind::Number,
        ValueKind::Boolean,
        ValueKind::Array,
        ValueKind::Object,
        ValueKind::Null,
    ];

    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// The label shown in the editor's type badge.
    pub fn label(&self) -> &'static str {
        match self {
            ValueKind::String => "String",
            ValueKind::Number => "Number",
            ValueKind::Boolean => "Boolean",
            ValueKind::Array => "Array",
            ValueKind::Object => "Object",
            ValueKind::Null => "Null",
        }
    }

    /// The value a freshly created field or array element of this kind starts with.
    pub fn default_value(&self) -> Value {
        match self {
            ValueKind::String => Value::String(String::new()),
            ValueKind::Number => Value::from(0),
            ValueKind::Boolean => Value::Bool(false),
            ValueKind::Array => Value::Array(Vec::new()),
            ValueKind::Object => Value::Object(serde_json::Map::new()),
            ValueKind::Null => Value::Null,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, ValueKind::Array | ValueKind::Object)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ValueKind {
    type Err = JsonFormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" | "str" => Ok(ValueKind::String),
            "number" | "num" => Ok(ValueKind::Number),
            "boolean" | "bool" => Ok(ValueKind::Boolean),
            "array" => Ok(ValueKind::Array),
            "object" => Ok(ValueKind::Object),
            "null" => Ok(ValueKind::Null),
            _ => Err(JsonFormError::UnknownKind(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_of_root_is_none() {
        assert_eq!(Path::root().parent(), None);
    }

    #[test]
    fn parent_drops_last_step() {
        let path = Path::root().join_key("a").join_index(2);
        assert_eq!(path.parent(), Some(Path::root().join_key("a")));
        assert_eq!(path.last(), Some(&PathToken::Index(2)));
    }

    #[test]
    fn keys_needing_quotes_are_quoted() {
        let path = Path::new(vec!["a.b".into(), "".into(), "say \"hi\"".into()]);
        assert_eq!(path.to_string(), r#""a.b".""."say \"hi\"""#);
    }

    #[test]
    fn slash_separator_leaves_dots_bare() {
        let path = Path::new(vec!["a.b".into(), 1.into(), "c".into()]);
        assert_eq!(path.display_with(Separator::Slash), "a.b[1]/c");
    }

    #[test]
    fn pointer_escapes_tokens() {
        let path = Path::new(vec!["a/b".into(), "m~n".into()]);
        assert_eq!(path.to_pointer().to_string(), "/a~1b/m~0n");
    }

    #[test]
    fn value_kind_names() {
        assert_eq!("bool".parse::<ValueKind>(), Ok(ValueKind::Boolean));
        assert_eq!("Object".parse::<ValueKind>(), Ok(ValueKind::Object));
        assert_eq!(
            "date".parse::<ValueKind>(),
            Err(JsonFormError::UnknownKind("date".to_string()))
        );
        assert_eq!(ValueKind::of(&Value::Null).label(), "Null");
    }
}
