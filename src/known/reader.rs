//! Reader for the known-definitions text format.
//!
//! ```text
//! # comment
//! [elements]
//! obj         x, y, type
//! floatatom   x, y, width, lower, upper, \
//!             label_pos, label, receive, send
//! [objects]
//! bang
//! ```

use std::collections::BTreeMap;

use crate::error::{PdError, Result};

/// Entries of one section, keyed by name.
pub type Section = BTreeMap<String, Vec<String>>;

/// Every section read from a definitions source, keyed by section name.
pub type Sections = BTreeMap<String, Section>;

const CONTINUATION: char = '\\';
const VALUE_SEP: char = ',';

/// Parse definition lines into sections.
///
/// Fails if an entry appears before the first section header.
pub fn read_known_lines<S: AsRef<str>>(lines: &[S]) -> Result<Sections> {
    let mut sections = Sections::new();
    let mut current: Option<String> = None;

    for (line_no, line) in joined_lines(lines) {
        if let Some(name) = section_header(&line) {
            sections.entry(name.to_string()).or_default();
            current = Some(name.to_string());
            continue;
        }

        let Some(section) = current.as_ref().and_then(|name| sections.get_mut(name)) else {
            return Err(PdError::Format {
                message: format!("No section header before \"{}\"", line),
                line: Some(line_no + 1),
                help: Some("Start the file with [elements], [objects] or [aliases]".to_string()),
            });
        };

        let (key, values) = split_entry(&line);
        section.insert(key.to_string(), values);
    }

    Ok(sections)
}

/// Yield (first physical line index, logical line) pairs.
///
/// Lines are trimmed, blank and `#` comment lines are dropped, and a line
/// ending in `\` is joined to the next one with a single space.
fn joined_lines<S: AsRef<str>>(lines: &[S]) -> Vec<(usize, String)> {
    let mut joined = Vec::new();
    let mut pending: Vec<&str> = Vec::new();
    let mut start = 0;

    for (line_no, line) in lines.iter().enumerate() {
        let line = line.as_ref().trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if pending.is_empty() {
            start = line_no;
        }

        match line.strip_suffix(CONTINUATION) {
            Some(head) => pending.push(head),
            None => {
                pending.push(line);
                joined.push((start, pending.join(" ")));
                pending.clear();
            }
        }
    }

    // A continuation on the final line has nothing to join with.
    if !pending.is_empty() {
        joined.push((start, pending.join(" ")));
    }

    joined
}

fn section_header(line: &str) -> Option<&str> {
    line.strip_prefix('[')?.strip_suffix(']')
}

/// Split `key  a, b, c` into the key and its trimmed values.
fn split_entry(line: &str) -> (&str, Vec<String>) {
    match line.split_once(char::is_whitespace) {
        Some((key, rest)) => {
            let values = rest
                .split(VALUE_SEP)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect();
            (key, values)
        }
        None => (line, Vec::new()),
    }
}
