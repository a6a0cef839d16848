//! Picks the sub-sections of a reference document that a prompt needs.
//!
//! Every selector returns an empty string when its document is empty or no
//! section matches; the caller then omits the block. Selectors never fail.

use crate::references::document::{strip_ordinal, title_matches};
use crate::references::{Document, Section};

use super::duration::SegmentPlan;
use super::keywords::{first_match, KeywordTable, DEFAULT_SINGLE_TEMPLATE, SINGLE_TEMPLATE_KEYWORDS};

/// Chinese numerals used by the nine top-level vocabulary sections.
const VOCABULARY_NUMERALS: [&str; 9] = ["一", "二", "三", "四", "五", "六", "七", "八", "九"];

/// Shot size, camera move, angle, transition, rhythm.
pub const STORYBOARD_VOCABULARY: &[usize] = &[1, 2, 3, 4, 5];
/// Style, tone, lighting, mood.
pub const PROMPT_VOCABULARY: &[usize] = &[6, 7, 8, 9];

const MAX_EXAMPLES: usize = 2;
const EXAMPLE_SEPARATOR: &str = "\n\n---\n\n";

/// Generic keyword-driven selection: first table match, then the section
/// at `level` titled with that label.
pub fn select_section(doc: &Document, level: usize, table: &KeywordTable, free_text: &str) -> String {
    first_match(table, free_text)
        .and_then(|label| doc.find(level, label))
        .map(|section| section.content.clone())
        .unwrap_or_default()
}

/// Requested vocabulary sections (1-9), in the requested order.
pub fn select_vocabulary(doc: &Document, numbers: &[usize]) -> String {
    let parts: Vec<&str> = numbers
        .iter()
        .filter_map(|&n| VOCABULARY_NUMERALS.get(n.checked_sub(1)?))
        .filter_map(|numeral| doc.find(2, numeral))
        .map(|section| section.content.as_str())
        .collect();
    parts.join("\n\n")
}

/// Single-segment template for a scene type, defaulting to 模板A.
///
/// A document without the expected headings is injected whole.
pub fn select_single_template(doc: &Document, scene_type: &str) -> String {
    let label = first_match(SINGLE_TEMPLATE_KEYWORDS, scene_type).unwrap_or(DEFAULT_SINGLE_TEMPLATE);
    section_or_whole(doc, label)
}

/// Multi-segment template for the duration tier.
pub fn select_multi_template(doc: &Document, plan: SegmentPlan) -> String {
    match plan.multi_template_label() {
        Some(label) => section_or_whole(doc, label),
        None => String::new(),
    }
}

/// Split rules (from 拆段规则表 up to the first per-duration template)
/// followed by the connection anchor guide.
pub fn select_split_rules(doc: &Document) -> String {
    let mut parts: Vec<&str> = doc
        .at_level(2)
        .skip_while(|s| !title_matches(&s.title, "拆段规则表"))
        .take_while(|s| !is_duration_heading(s))
        .map(|s| s.content.as_str())
        .collect();

    if let Some(anchors) = doc.find(2, "衔接锚点设计指南") {
        parts.push(&anchors.content);
    }
    parts.join("\n\n")
}

/// Narrative structure entry (`### N. 名称`) for a structure name.
///
/// Tries the full name, the part before a ` — ` description, the name
/// without `-`, and the name without `型`, each as a title prefix.
pub fn select_narrative_structure(doc: &Document, name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return String::new();
    }

    let head = name
        .split([' ', '—', '–'])
        .next()
        .unwrap_or(name)
        .trim();
    let candidates = [
        name.to_string(),
        head.to_string(),
        name.replace('-', ""),
        name.replace('型', ""),
        head.replace('-', ""),
        head.replace('型', ""),
    ];

    candidates
        .iter()
        .filter(|c| !c.is_empty())
        .find_map(|candidate| {
            doc.at_level(3)
                .find(|s| strip_ordinal(&s.title).starts_with(candidate.as_str()))
        })
        .map(|s| s.content.clone())
        .unwrap_or_default()
}

/// Up to two worked examples: `##` sections mentioning 示例. Falls back to
/// the first `##` section when none do.
pub fn select_examples(doc: &Document) -> String {
    let examples: Vec<&str> = doc
        .at_level(2)
        .filter(|s| s.content.contains("示例"))
        .take(MAX_EXAMPLES)
        .map(|s| s.content.as_str())
        .collect();

    if !examples.is_empty() {
        return examples.join(EXAMPLE_SEPARATOR);
    }
    doc.at_level(2)
        .next()
        .map(|s| s.content.clone())
        .unwrap_or_default()
}

fn section_or_whole(doc: &Document, label: &str) -> String {
    match doc.find(2, label) {
        Some(section) => section.content.clone(),
        None => doc.raw().trim().to_string(),
    }
}

/// `30秒…`, `45秒…`: the per-duration templates that end the split rules.
fn is_duration_heading(section: &Section) -> bool {
    let digits = section.title.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0 && section.title[digits..].starts_with('秒')
}
