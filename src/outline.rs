use serde_json::Value;

use crate::types::{Path, ValueKind};

/// One line of the rendered tree.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineRow {
    pub path: Path,
    pub depth: usize,
    /// The member name, or `[i]` for array elements.
    pub label: String,
    pub kind: ValueKind,
    /// Number of children, for objects and arrays.
    pub len: Option<usize>,
    /// Display text, for scalars.
    pub scalar: Option<String>,
}

impl OutlineRow {
    /// Renders the row as indented text, e.g. `  [0] (String) "home"`.
    pub fn render(&self, indent: usize) -> String {
        let pad = " ".repeat(self.depth * indent);
        match (&self.scalar, self.len) {
            (Some(text), _) => format!("{}{} ({}) {}", pad, self.label, self.kind, text),
            (None, Some(len)) => format!("{}{} ({}, {})", pad, self.label, self.kind, len),
            (None, None) => format!("{}{} ({})", pad, self.label, self.kind),
        }
    }
}

/// Flattens every node below the root into rows, depth first, in document order.
pub fn outline(root: &Value) -> Vec<OutlineRow> {
    let mut rows = Vec::new();
    push_children(root, &Path::root(), 0, &mut rows);
    rows
}

fn push_children(node: &Value, path: &Path, depth: usize, rows: &mut Vec<OutlineRow>) {
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                push_row(child, path.join_key(key.as_str()), key.clone(), depth, rows);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                push_row(child, path.join_index(index), format!("[{}]", index), depth, rows);
            }
        }
        _ => {}
    }
}

fn push_row(node: &Value, path: Path, label: String, depth: usize, rows: &mut Vec<OutlineRow>) {
    let (len, scalar) = match node {
        Value::Object(map) => (Some(map.len()), None),
        Value::Array(items) => (Some(items.len()), None),
        scalar => (None, Some(scalar.to_string())),
    };
    rows.push(OutlineRow {
        path: path.clone(),
        depth,
        label,
        kind: ValueKind::of(node),
        len,
        scalar,
    });
    push_children(node, &path, depth + 1, rows);
}
