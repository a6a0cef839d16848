//! Ordered keyword tables mapping free-text scene types to section labels.
//!
//! Tie-break rule: the FIRST entry (in declaration order) whose keyword
//! occurs anywhere in the input wins. Not the longest, not the most specific.
//! When extending a table, put a keyword before any shorter keyword it
//! contains, or it will be shadowed; `test_every_keyword_maps_to_its_label`
//! catches that.

pub type KeywordTable = [(&'static str, &'static str)];

/// Single-segment storyboard templates in `templates/single-video.md`.
/// No match falls back to [`DEFAULT_SINGLE_TEMPLATE`].
pub const SINGLE_TEMPLATE_KEYWORDS: &KeywordTable = &[
    ("电商", "模板B"),
    ("广告", "模板B"),
    ("产品", "模板B"),
    ("仙侠", "模板C"),
    ("武侠", "模板C"),
    ("动作", "模板C"),
    ("格斗", "模板C"),
    ("舞蹈", "模板C"),
    ("游戏", "模板C"),
    ("风景", "模板D"),
    ("旅拍", "模板D"),
    ("旅游", "模板D"),
    ("旅行", "模板D"),
    ("城市", "模板D"),
    ("短剧", "模板E"),
    ("对白", "模板E"),
    ("对话", "模板E"),
    ("情景", "模板E"),
];

pub const DEFAULT_SINGLE_TEMPLATE: &str = "模板A";

/// Scene-specific storyboard templates in `templates/scene-templates.md`.
pub const SCENE_TEMPLATE_KEYWORDS: &KeywordTable = &[
    ("电商", "场景1：电商/广告"),
    ("广告", "场景1：电商/广告"),
    ("产品", "场景1：电商/广告"),
    ("仙侠", "场景2：AI漫剧/仙侠"),
    ("漫剧", "场景2：AI漫剧/仙侠"),
    ("武侠", "场景2：AI漫剧/仙侠"),
    ("短剧", "场景3：短剧/对白"),
    ("对白", "场景3：短剧/对白"),
    ("对话", "场景3：短剧/对白"),
    ("科普", "场景4：科普教学"),
    ("教学", "场景4：科普教学"),
    ("教程", "场景4：科普教学"),
    ("MV", "场景5：MV/音乐卡点"),
    ("音乐", "场景5：MV/音乐卡点"),
    ("卡点", "场景5：MV/音乐卡点"),
    ("种草", "场景6：短视频/种草"),
    ("短视频", "场景6：短视频/种草"),
    ("Vlog", "场景6：短视频/种草"),
    ("vlog", "场景6：短视频/种草"),
];

/// Prompt-phase scene strategies in `references/scene-strategies.md`.
pub const SCENE_STRATEGY_KEYWORDS: &KeywordTable = &[
    ("电商", "电商/广告"),
    ("广告", "电商/广告"),
    ("产品", "电商/广告"),
    ("仙侠", "AI漫剧/仙侠"),
    ("漫剧", "AI漫剧/仙侠"),
    ("武侠", "AI漫剧/仙侠"),
    ("短剧", "短剧/对白"),
    ("对白", "短剧/对白"),
    ("对话", "短剧/对白"),
    ("科普", "科普教学"),
    ("教学", "科普教学"),
    ("教程", "科普教学"),
    ("MV", "MV/音乐卡点"),
    ("音乐", "MV/音乐卡点"),
    ("卡点", "MV/音乐卡点"),
    ("种草", "短视频/种草"),
    ("短视频", "短视频/种草"),
    ("Vlog", "短视频/种草"),
    ("vlog", "短视频/种草"),
];

/// Label of the first table entry whose keyword occurs in `text`.
pub fn first_match(table: &KeywordTable, text: &str) -> Option<&'static str> {
    if text.is_empty() {
        return None;
    }
    table
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|&(_, label)| label)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLES: &[(&str, &KeywordTable)] = &[
        ("single", SINGLE_TEMPLATE_KEYWORDS),
        ("scene_template", SCENE_TEMPLATE_KEYWORDS),
        ("scene_strategy", SCENE_STRATEGY_KEYWORDS),
    ];

    #[test]
    fn test_every_keyword_maps_to_its_label() {
        for (name, table) in TABLES {
            for (keyword, label) in table.iter() {
                assert_eq!(
                    first_match(table, keyword),
                    Some(*label),
                    "{name}: keyword {keyword} is shadowed by an earlier entry"
                );
            }
        }
    }

    #[test]
    fn test_first_entry_wins_over_later_match() {
        // 电商 precedes 广告; both map to the same label but order decides.
        assert_eq!(
            first_match(SCENE_TEMPLATE_KEYWORDS, "我要拍一个电商广告"),
            Some("场景1：电商/广告")
        );
        // 仙侠 (模板C) is declared before 短剧 (模板E).
        assert_eq!(first_match(SINGLE_TEMPLATE_KEYWORDS, "短剧仙侠"), Some("模板C"));
    }

    #[test]
    fn test_order_not_length_decides() {
        assert_eq!(first_match(SINGLE_TEMPLATE_KEYWORDS, "纯旅拍vlog"), Some("模板D"));
        assert_eq!(
            first_match(SCENE_TEMPLATE_KEYWORDS, "纯旅拍vlog"),
            Some("场景6：短视频/种草")
        );
        // 音乐 comes before 短视频 even though 短视频 is longer.
        assert_eq!(
            first_match(SCENE_STRATEGY_KEYWORDS, "短视频音乐"),
            Some("MV/音乐卡点")
        );
    }

    #[test]
    fn test_no_match_and_empty_input() {
        assert_eq!(first_match(SCENE_TEMPLATE_KEYWORDS, "纪录片"), None);
        assert_eq!(first_match(SCENE_TEMPLATE_KEYWORDS, ""), None);
    }

    #[test]
    fn test_keyword_match_is_case_sensitive() {
        assert_eq!(first_match(SCENE_STRATEGY_KEYWORDS, "VLOG"), None);
        assert_eq!(first_match(SCENE_STRATEGY_KEYWORDS, "mv"), None);
    }
}
