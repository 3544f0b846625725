//! JSON normalizer: recovers a `CaseMap` from model output that is only
//! *supposed* to be JSON.
//!
//! Repairs are tried in a fixed order, each applied on top of the previous one:
//! `TrimWhitespace` → `StripCodeFence` → `StripQuotes` → `ExtractObject`.
//! A step that leaves the text unchanged is skipped. The first candidate that
//! parses into an object of strings wins, and the step that produced it is
//! reported back so callers can log which heuristic fired.

use std::fmt;

use serde_json::error::Category;
use thiserror::Error;

use crate::generation::CaseMap;

/// The heuristic that made the model output parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repair {
    /// Output was already valid.
    None,
    /// Whitespace JSON itself rejects (NBSP, BOM, ideographic space).
    TrimWhitespace,
    StripCodeFence,
    /// A single stray quote around the object (known Ollama JSON-mode quirk).
    StripQuotes,
    /// Lenient: the span between the first `{` and the last `}`.
    ExtractObject,
}

impl fmt::Display for Repair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Repair::None => "none",
            Repair::TrimWhitespace => "trim_whitespace",
            Repair::StripCodeFence => "strip_code_fence",
            Repair::StripQuotes => "strip_quotes",
            Repair::ExtractObject => "extract_object",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("model output is not valid JSON: {0}")]
    Syntax(String),

    #[error("model output is not an object of strings: {0}")]
    Shape(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub cases: CaseMap,
    pub repair: Repair,
}

const REPAIRS: [(Repair, fn(&str) -> &str); 4] = [
    (Repair::TrimWhitespace, trim_whitespace),
    (Repair::StripCodeFence, strip_code_fence),
    (Repair::StripQuotes, strip_wrapping_quote),
    (Repair::ExtractObject, extract_object),
];

/// Parses model output into a `CaseMap`, repairing it if needed.
/// On failure the error describes the *unrepaired* output.
pub fn normalize_cases(raw: &str) -> Result<Normalized, NormalizeError> {
    let first_error = match parse_cases(raw) {
        Ok(cases) => {
            return Ok(Normalized {
                cases,
                repair: Repair::None,
            })
        }
        Err(e) => e,
    };

    let mut candidate = raw;
    for (repair, apply) in REPAIRS {
        let next = apply(candidate);
        if next == candidate {
            continue;
        }
        candidate = next;
        if let Ok(cases) = parse_cases(candidate) {
            return Ok(Normalized { cases, repair });
        }
    }

    Err(first_error)
}

/// Deserializes straight into the map so keys keep the model's order.
fn parse_cases(text: &str) -> Result<CaseMap, NormalizeError> {
    serde_json::from_str(text).map_err(|e| match e.classify() {
        Category::Data => NormalizeError::Shape(e.to_string()),
        Category::Syntax | Category::Eof | Category::Io => NormalizeError::Syntax(e.to_string()),
    })
}

/// Trims Unicode whitespace and byte-order marks; the strict parse only skips ASCII whitespace.
fn trim_whitespace(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

fn is_quote(c: char) -> bool {
    matches!(c, '\'' | '"' | '`')
}

/// Trims whitespace, then removes at most one quote character from each end.
pub fn strip_wrapping_quote(text: &str) -> &str {
    let text = text.trim();
    let text = text.strip_prefix(is_quote).unwrap_or(text);
    text.strip_suffix(is_quote).unwrap_or(text)
}

/// Strips ```json ... ``` or ``` ... ``` code fences.
fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let stripped = stripped.trim_start();
    stripped
        .strip_suffix("```")
        .map(str::trim)
        .unwrap_or(stripped)
}

fn extract_object(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}
