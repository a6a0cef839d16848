// Shared prompt fragments.
// Each phase keeps its own prompts.rs alongside it; this file holds the
// fragments more than one phase appends.

/// Closing requirements for every JSON output format block.
pub const JSON_VALIDITY_RULES: &str = "\
- JSON 必须合法（转义双引号、无尾逗号）
- 直接输出 JSON，不要用 markdown 代码块包裹";

/// Opening sentence of every JSON output format block.
pub const JSON_ONLY_PREAMBLE: &str =
    "你必须输出合法的 JSON，格式如下（不要输出任何 JSON 以外的内容）：";

/// Platform generation limit restated wherever segment timing matters.
pub const FIFTEEN_SECOND_RULE: &str = "即梦每次生成固定 15 秒";

/// Speaker attribution format shared by storyboard and prompt rules.
pub const SPEAKER_FORMAT: &str = "角色A：\"台词内容\"";
