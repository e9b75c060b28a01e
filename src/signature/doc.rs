//! Per-parameter help text from a signature's doc block
//!
//! A line of the form `  name: description` (after indentation is
//! normalized) documents `name`. Only single-line descriptions are seen.

use regex::Regex;
use std::collections::HashMap;

/// Normalize the indentation of a doc block
///
/// The first line is stripped of leading whitespace, the common indent of
/// the remaining lines is removed, and leading and trailing blank lines are
/// dropped.
pub fn normalize_doc(doc: &str) -> String {
    let lines: Vec<&str> = doc.lines().collect();
    let indent = lines
        .iter()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);

    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            out.push(line.trim().to_string());
        } else if line.trim().is_empty() {
            out.push(String::new());
        } else {
            let stripped: String = line.chars().skip(indent).collect();
            out.push(stripped.trim_end().to_string());
        }
    }

    while out.first().is_some_and(|l| l.is_empty()) {
        out.remove(0);
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

/// First paragraph of a doc block, joined onto one line
pub fn summary(doc: &str) -> String {
    normalize_doc(doc)
        .lines()
        .take_while(|l| !l.trim().is_empty())
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Map each documented parameter name to its description
///
/// Names without a matching line are absent from the result. The first
/// matching line wins.
pub fn param_helps<S: AsRef<str>>(doc: &str, names: &[S]) -> HashMap<String, String> {
    let normalized = normalize_doc(doc);
    let mut helps = HashMap::new();

    for name in names {
        let name = name.as_ref();
        let re = match Regex::new(&format!(r"  {}:(.*)$", regex::escape(name))) {
            Ok(re) => re,
            Err(_) => continue,
        };

        let found = normalized
            .lines()
            .find_map(|line| re.captures(line).map(|caps| caps[1].trim().to_string()));

        if let Some(text) = found {
            helps.insert(name.to_string(), text);
        }
    }

    helps
}
