//! Best-effort recovery of structured JSON from free-form model output.
//!
//! Strategies run in order, each only when the previous one fails:
//! 1. the whole trimmed text,
//! 2. the interior of the first fenced code block (optionally tagged `json`),
//! 3. the span from the first `{` to the last `}`.
//!
//! Only objects and arrays count as structured; a bare scalar such as `42`
//! or `"ok"` falls through. When nothing parses the raw text comes back
//! verbatim as [`Extraction::Unstructured`]. [`extract_structured`] never
//! fails.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*\n(.*?)\n```").expect("fenced block pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    Direct,
    FencedBlock,
    BraceSpan,
}

/// Callers branch on the variant, never on whether `data` looks empty.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Structured {
        data: Value,
        strategy: ExtractionStrategy,
    },
    Unstructured {
        raw: String,
    },
}

impl Extraction {
    pub fn strategy(&self) -> Option<ExtractionStrategy> {
        match self {
            Extraction::Structured { strategy, .. } => Some(*strategy),
            Extraction::Unstructured { .. } => None,
        }
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            Extraction::Structured { data, .. } => Some(data),
            Extraction::Unstructured { .. } => None,
        }
    }
}

pub fn extract_structured(raw: &str) -> Extraction {
    let text = raw.trim();

    let attempts = [
        (ExtractionStrategy::Direct, Some(text)),
        (ExtractionStrategy::FencedBlock, fenced_interior(text)),
        (ExtractionStrategy::BraceSpan, brace_span(text)),
    ];
    for (strategy, candidate) in attempts {
        if let Some(data) = candidate.and_then(parse_container) {
            return Extraction::Structured { data, strategy };
        }
    }

    Extraction::Unstructured {
        raw: raw.to_string(),
    }
}

fn fenced_interior(text: &str) -> Option<&str> {
    FENCED_BLOCK
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn parse_container(candidate: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Some(value),
        _ => None,
    }
}
