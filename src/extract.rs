//! List Extractor
//!
//! Turns free-form model output into an ordered list of hypotheses.
//!
//! A line is an item when, once trimmed, it starts with an ASCII digit or a
//! `-`. The leading marker (`1.`, `2)`, `-`, ...) is everything up to the first
//! whitespace run; the rest of the line is the item. A marker with nothing
//! after it is kept whole.
//!
//! In the default [`ExtractionMode::Marked`] mode every other line is dropped,
//! including plain prose that might itself be a valid hypothesis. A response
//! with no enumerated lines therefore yields an empty list.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::Hypothesis;
use crate::types::ExtractionError;

/// How lines without an enumeration marker are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Only enumerated (`1.`) or bulleted (`-`) lines become items.
    #[default]
    Marked,
    /// Enumerated lines lose their marker; any other non-empty line is kept whole.
    Lenient,
}

/// Extract hypotheses using the default [`ExtractionMode::Marked`] rules.
pub fn extract_hypotheses(text: &str) -> Vec<Hypothesis> {
    extract_hypotheses_with(text, ExtractionMode::Marked)
}

/// Extract hypotheses from `text`, preserving the order lines appear in.
///
/// Never fails: a line that cannot be turned into a hypothesis is logged and
/// skipped, and the remaining lines are still processed.
pub fn extract_hypotheses_with(text: &str, mode: ExtractionMode) -> Vec<Hypothesis> {
    let mut hypotheses = Vec::new();

    for (idx, raw) in text.split('\n').enumerate() {
        match parse_line(raw, idx + 1, mode) {
            Ok(Some(hypothesis)) => hypotheses.push(hypothesis),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Skipping unparseable hypothesis line"),
        }
    }

    debug!(count = hypotheses.len(), ?mode, "Extracted hypotheses");
    hypotheses
}

fn parse_line(
    raw: &str,
    line: usize,
    mode: ExtractionMode,
) -> Result<Option<Hypothesis>, ExtractionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if !is_enumerated(trimmed) {
        return match mode {
            ExtractionMode::Marked => Ok(None),
            ExtractionMode::Lenient => Hypothesis::at_line(trimmed, line).map(Some),
        };
    }

    let item = match trimmed.split_once(char::is_whitespace) {
        Some((_marker, rest)) => rest.trim(),
        None => trimmed,
    };
    Hypothesis::at_line(item, line).map(Some)
}

fn is_enumerated(line: &str) -> bool {
    line.starts_with(|c: char| c.is_ascii_digit()) || line.starts_with('-')
}

/// Render items as `"{i}. {text}"` lines, numbered from 1.
pub fn render_numbered_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}
