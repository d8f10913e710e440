//! CLI output formatting.
//!
//! JSON is rendered with syntax highlighting:
//! - Keys: Cyan
//! - Strings: Green
//! - Numbers: Yellow
//! - Booleans/Null: Magenta

use std::fmt::Write;

use colored::Colorize;
use serde_json::Value;

use crate::wallpaper::{HistoryEntry, SourceKind, TickOutcome};

const INDENT: &str = "  ";

/// Prints a JSON value with syntax highlighting.
pub fn print_highlighted_json(value: &Value) { println!("{}", highlight_json(value)); }

/// Renders a JSON value as pretty-printed, highlighted text.
#[must_use]
pub fn highlight_json(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0);
    out
}

fn write_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Null => out.push_str(&"null".magenta().to_string()),
        Value::Bool(flag) => out.push_str(&flag.to_string().magenta().to_string()),
        Value::Number(number) => out.push_str(&number.to_string().yellow().to_string()),
        Value::String(text) => out.push_str(&quote(text).green().to_string()),
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Array(items) => {
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                push_indent(out, depth + 1);
                write_value(out, item, depth + 1);
                out.push_str(if i + 1 < items.len() { ",\n" } else { "\n" });
            }
            push_indent(out, depth);
            out.push(']');
        }
        Value::Object(map) => {
            out.push_str("{\n");
            for (i, (key, item)) in map.iter().enumerate() {
                push_indent(out, depth + 1);
                let _ = write!(out, "{}: ", quote(key).cyan());
                write_value(out, item, depth + 1);
                out.push_str(if i + 1 < map.len() { ",\n" } else { "\n" });
            }
            push_indent(out, depth);
            out.push('}');
        }
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{text}\""))
}

/// Prints history entries, newest first, with their index.
pub fn print_history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("No wallpapers applied yet.");
        return;
    }

    for (index, entry) in entries.iter().enumerate() {
        println!("{:>4}  {}  {}", index, entry.timestamp.dimmed(), entry.display_text);
    }
}

/// Prints the result of a manual tick.
pub fn print_outcome(outcome: &TickOutcome) {
    match outcome {
        TickOutcome::Applied(_) => println!("{}", outcome.to_string().green()),
        TickOutcome::SetFailed { .. } => println!("{}", outcome.to_string().red()),
        TickOutcome::NoCandidates
        | TickOutcome::EmptyDirectory(_)
        | TickOutcome::RemoteUnavailable(_) => println!("{}", outcome.to_string().yellow()),
    }
}

/// Prints configured sources with what they currently point at.
pub fn print_sources(sources: &[(String, SourceKind)]) {
    if sources.is_empty() {
        println!("No sources configured.");
        return;
    }

    for (source, kind) in sources {
        let label = format!("{:<12}", format!("[{}]", kind.name()));
        let label = match kind {
            SourceKind::Missing => label.red(),
            SourceKind::Remote => label.magenta(),
            SourceKind::File | SourceKind::Directory => label.cyan(),
        };
        println!("{label} {source}");
    }
}
