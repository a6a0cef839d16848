use std::sync::LazyLock;

use regex::Regex;

pub const DEFAULT_DURATION_SECONDS: u32 = 15;

static MINUTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9０-９]+)\s*分").expect("minutes pattern is valid"));
static FIRST_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9０-９]+").expect("integer pattern is valid"));

/// Converts a free-text duration to seconds.
///
/// `N分…` counts minutes, otherwise the first integer run counts seconds,
/// otherwise 15. Full-width digits (`４５秒`) count like ASCII ones. `"1分钟"` → 60, `"45秒"` → 45, `"30s"` → 30, `""` → 15.
pub fn parse_duration_seconds(text: &str) -> u32 {
    if let Some(caps) = MINUTES.captures(text) {
        return parse_saturating(&caps[1]).saturating_mul(60);
    }
    if let Some(m) = FIRST_INTEGER.find(text) {
        return parse_saturating(m.as_str());
    }
    DEFAULT_DURATION_SECONDS
}

fn parse_saturating(digits: &str) -> u32 {
    digits
        .chars()
        .filter_map(digit_value)
        .try_fold(0u32, |acc, d| acc.checked_mul(10)?.checked_add(d))
        .unwrap_or(u32::MAX)
}

fn digit_value(c: char) -> Option<u32> {
    match c {
        '０'..='９' => Some(c as u32 - '０' as u32),
        _ => c.to_digit(10),
    }
}

/// How a video of a given length is split into platform generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentPlan {
    /// ≤15 s: one generation.
    Single,
    /// 16–30 s: two segments, the second by video extension.
    TwoPart,
    /// 31–45 s: three independently generated segments.
    ThreePart,
    /// 46 s and up: four segments.
    FourPart,
}

impl SegmentPlan {
    pub fn for_seconds(seconds: u32) -> Self {
        match seconds {
            0..=15 => SegmentPlan::Single,
            16..=30 => SegmentPlan::TwoPart,
            31..=45 => SegmentPlan::ThreePart,
            _ => SegmentPlan::FourPart,
        }
    }

    pub fn is_single(self) -> bool {
        self == SegmentPlan::Single
    }

    /// Section label in `templates/multi-segment.md`. Single-segment videos
    /// use the single-video templates instead.
    pub fn multi_template_label(self) -> Option<&'static str> {
        match self {
            SegmentPlan::Single => None,
            SegmentPlan::TwoPart => Some("30秒双段模板"),
            SegmentPlan::ThreePart => Some("45秒三段模板"),
            SegmentPlan::FourPart => Some("60秒四段模板"),
        }
    }
}
