//! Line-oriented command interpreter over an [`EditorSession`].
//!
//! Each input line is one command, e.g. `add --in addresses[0] zip string 34000`
//! or `set roles[2]=ops`. Errors are returned to the caller for display and never
//! end the session.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::field::FieldSpec;
use crate::session::{to_json_string, EditorSession};
use crate::types::{Path, PathToken, ValueKind};

#[derive(Parser, Debug)]
#[command(multicall = true)]
struct CommandLine {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the value at a path (the whole document by default)
    Get { path: Option<String> },
    /// Assign a value: `set path[:type]=value`
    Set {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        expression: Vec<String>,
    },
    /// Add a named field to an object
    Add {
        /// Object to add the field to (the root by default)
        #[arg(long = "in", default_value = "")]
        parent: String,
        /// Seed a new array with one element of this type
        #[arg(long)]
        element: Option<ValueKind>,
        name: String,
        kind: ValueKind,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Replace a field's value, optionally renaming it
    Edit {
        /// New name for the field
        #[arg(long)]
        name: Option<String>,
        path: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Change a scalar in place, keeping its type
    Update {
        path: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Delete the value at a path
    #[command(alias = "delete")]
    Rm { path: String },
    /// Append a default element to an array
    Push { path: String, kind: Option<ValueKind> },
    /// Replace the document with JSON read from a file
    Import { file: PathBuf },
    /// Print the document, or write it to a file
    Export { file: Option<PathBuf> },
    /// Copy the document to the clipboard
    Copy,
    /// Show the document as a tree
    Tree,
    /// Check that the document is valid JSON
    Validate,
    /// Reset the document to an empty object
    Clear,
    /// Load the sample document
    Sample,
    /// Show the edits since the last import as a JSON Patch
    Changes,
    /// Leave the editor
    #[command(alias = "exit")]
    Quit,
}

/// What the caller should do after a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Continue(Option<String>),
    Quit,
}

pub struct Repl {
    session: EditorSession,
}

impl Repl {
    pub fn new(session: EditorSession) -> Self {
        Repl { session }
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn into_session(self) -> EditorSession {
        self.session
    }

    /// Runs one input line. Blank lines and `#` comments do nothing.
    pub fn execute(&mut self, line: &str) -> Result<Outcome> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Outcome::Continue(None));
        }

        let command = match CommandLine::try_parse_from(split_words(line)) {
            Ok(parsed) => parsed.command,
            Err(err) => match err.kind() {
                ErrorKind::DisplayHelp
                | ErrorKind::DisplayVersion
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                    return Ok(Outcome::Continue(Some(err.render().to_string())))
                }
                _ => return Err(err.into()),
            },
        };
        debug!(?command, "executing command");
        self.run(command)
    }

    fn run(&mut self, command: Command) -> Result<Outcome> {
        let session = &mut self.session;
        let message = match command {
            Command::Get { path } => {
                let value = session.get(path.as_deref().unwrap_or(""))?;
                to_json_string(value, session.indent_size())?
            }
            Command::Set { expression } => {
                let path = session.assign(&expression.join(" "))?;
                format!("set {}", describe(session, &path))
            }
            Command::Add {
                parent,
                element,
                name,
                kind,
                value,
            } => {
                let mut spec = FieldSpec::new(name, kind).with_value(unquote(&value.join(" ")));
                spec.element_kind = element;
                let path = session.add_field(parent.as_str(), &spec)?;
                format!("added {}", describe(session, &path))
            }
            Command::Edit { name, path, value } => {
                let path = session.path(path.as_str())?;
                let kind = ValueKind::of(session.get(&path)?);
                let name = match (name, path.last()) {
                    (Some(name), _) => name,
                    (None, Some(PathToken::Key(key))) => key.clone(),
                    (None, _) => String::new(),
                };
                let spec = FieldSpec::new(name, kind).with_value(unquote(&value.join(" ")));
                let path = session.edit_field(&path, &spec)?;
                format!("edited {}", describe(session, &path))
            }
            Command::Update { path, value } => {
                let updated = session.update_value(path.as_str(), &unquote(&value.join(" ")))?;
                updated.to_string()
            }
            Command::Rm { path } => {
                let path = session.path(path.as_str())?;
                session.delete(&path)?;
                format!("removed {}", describe(session, &path))
            }
            Command::Push { path, kind } => {
                let path = session.path(path.as_str())?;
                let index = session.append_item(&path, kind)?;
                format!("appended {}", describe(session, &path.join_index(index)))
            }
            Command::Import { file } => {
                let text = fs::read_to_string(&file)
                    .with_context(|| format!("Failed to read {}", file.display()))?;
                session.import(&text)?;
                format!("imported {}", file.display())
            }
            Command::Export { file: None } => session.export()?,
            Command::Export { file: Some(file) } => {
                let mut text = session.export()?;
                text.push('\n');
                fs::write(&file, text)
                    .with_context(|| format!("Failed to write {}", file.display()))?;
                format!("wrote {}", file.display())
            }
            Command::Copy => {
                copy_to_clipboard(session.export()?)?;
                "copied document to clipboard".to_string()
            }
            Command::Tree => {
                let rows = session.outline();
                if rows.is_empty() {
                    format!("(empty {})", ValueKind::of(session.document()))
                } else {
                    rows.iter()
                        .map(|row| row.render(session.indent_size().max(1)))
                        .collect::<Vec<_>>()
                        .join("\n")
                }
            }
            Command::Validate => {
                session.validate()?;
                "document is valid JSON".to_string()
            }
            Command::Clear => {
                session.clear();
                "cleared document".to_string()
            }
            Command::Sample => {
                session.load_sample();
                "loaded sample document".to_string()
            }
            Command::Changes => {
                let patch = serde_json::to_value(session.changes())?;
                to_json_string(&patch, session.indent_size())?
            }
            Command::Quit => return Ok(Outcome::Quit),
        };
        Ok(Outcome::Continue(Some(message)))
    }
}

fn describe(session: &EditorSession, path: &Path) -> String {
    if path.is_root() {
        "<root>".to_string()
    } else {
        session.display_path(path)
    }
}

/// Splits a line on whitespace, keeping double-quoted runs (quotes included)
/// together so quoted path keys and JSON strings survive.
fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;

    for c in line.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => {
                current.push(c);
                escaped = true;
            }
            '"' => {
                current.push(c);
                in_quotes = !in_quotes;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// A form value wrapped in double quotes is read as a JSON string literal.
fn unquote(raw: &str) -> String {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        if let Ok(s) = serde_json::from_str::<String>(raw) {
            return s;
        }
    }
    raw.to_string()
}

#[cfg(feature = "clipboard")]
fn copy_to_clipboard(text: String) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("Failed to open the clipboard")?;
    clipboard
        .set_text(text)
        .context("Failed to copy to the clipboard")?;
    Ok(())
}

#[cfg(not(feature = "clipboard"))]
fn copy_to_clipboard(_text: String) -> Result<()> {
    anyhow::bail!("clipboard support is not enabled in this build")
}
