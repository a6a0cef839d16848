//! Heading-structured view of a markdown reference document.
//!
//! A document is tokenized once into an ordered list of sections. Each
//! section spans from its heading line up to the next heading of the same
//! or a shallower level, so a `##` section contains its `###` children.
//! Lines inside fenced code blocks are never treated as headings.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub level: usize,
    /// Heading text without the leading `#` marks, trimmed.
    pub title: String,
    /// Heading line through the end of the region, trimmed.
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    raw: String,
    sections: Vec<Section>,
}

struct HeadingLine {
    offset: usize,
    level: usize,
    title: String,
}

impl Document {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let headings = scan_headings(&raw);

        let sections = headings
            .iter()
            .enumerate()
            .map(|(i, heading)| {
                let end = headings[i + 1..]
                    .iter()
                    .find(|next| next.level <= heading.level)
                    .map(|next| next.offset)
                    .unwrap_or(raw.len());
                Section {
                    level: heading.level,
                    title: heading.title.clone(),
                    content: raw[heading.offset..end].trim().to_string(),
                }
            })
            .collect();

        Self { raw, sections }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.trim().is_empty()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn at_level(&self, level: usize) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(move |s| s.level == level)
    }

    /// First section at `level` whose title is `label`, allowing trailing
    /// punctuation or a description after it (see [`title_matches`]).
    pub fn find(&self, level: usize, label: &str) -> Option<&Section> {
        self.at_level(level).find(|s| title_matches(&s.title, label))
    }
}

/// `true` when `title` is `label`, or starts with `label` followed by a
/// non-alphanumeric character. Full-width and half-width colons compare equal.
///
/// `模板B` matches `模板B：电商产品型` and `模板B:` but not `模板BC`.
pub fn title_matches(title: &str, label: &str) -> bool {
    let title = normalize_punctuation(title.trim());
    let label = normalize_punctuation(label.trim());
    if label.is_empty() {
        return false;
    }

    match title.strip_prefix(label.as_str()) {
        Some(rest) => rest.chars().next().map_or(true, |c| !c.is_alphanumeric()),
        None => false,
    }
}

/// Drops a leading ordinal such as `3.` or `3、` from a heading title.
pub fn strip_ordinal(title: &str) -> &str {
    let digits = title.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return title;
    }
    let rest = &title[digits..];
    match rest.chars().next() {
        Some(c @ ('.' | '、' | '．')) => rest[c.len_utf8()..].trim_start(),
        _ => title,
    }
}

fn normalize_punctuation(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '：' => ':',
            '（' => '(',
            '）' => ')',
            other => other,
        })
        .collect()
}

fn scan_headings(raw: &str) -> Vec<HeadingLine> {
    let mut headings = Vec::new();
    let mut in_fence = false;
    let mut offset = 0;

    for line in raw.split_inclusive('\n') {
        let start = offset;
        offset += line.len();

        let trimmed = line.trim_end();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some((level, title)) = parse_heading(trimmed) {
            headings.push(HeadingLine {
                offset: start,
                level,
                title,
            });
        }
    }

    headings
}

fn parse_heading(line: &str) -> Option<(usize, String)> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &line[level..];
    if !rest.is_empty() && !rest.starts_with(' ') && !rest.starts_with('\t') {
        return None;
    }
    Some((level, rest.trim().to_string()))
}
