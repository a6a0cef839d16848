//! String builders shared by the phase assemblers.

use super::project::{Asset, Project};

/// Accumulates a system prompt block by block. A block whose body is blank
/// is dropped together with its heading.
#[derive(Debug)]
pub struct PromptBuilder {
    out: String,
}

impl PromptBuilder {
    pub fn new(role: &str) -> Self {
        Self {
            out: role.trim_end().to_string(),
        }
    }

    /// Appends `## heading` followed by `body`.
    pub fn section(mut self, heading: &str, body: &str) -> Self {
        let body = body.trim();
        if !body.is_empty() {
            self.out.push_str("\n\n## ");
            self.out.push_str(heading);
            self.out.push_str("\n\n");
            self.out.push_str(body);
        }
        self
    }

    /// Appends a block that carries its own heading.
    pub fn block(mut self, body: &str) -> Self {
        let body = body.trim();
        if !body.is_empty() {
            self.out.push_str("\n\n");
            self.out.push_str(body);
        }
        self
    }

    pub fn build(self) -> String {
        self.out
    }
}

/// Which labeled project lines a user message carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSet {
    /// Every field including 主题.
    Full,
    /// Every field except 主题.
    WithoutTopic,
}

/// Line-per-field user message. Absent fields render their placeholder so
/// the line order is stable.
#[derive(Debug)]
pub struct UserMessage {
    lines: Vec<String>,
}

impl UserMessage {
    pub fn new(header: &str) -> Self {
        Self {
            lines: vec![format!("{header}\n")],
        }
    }

    pub fn project(mut self, project: &Project, fields: FieldSet) -> Self {
        let p = project;
        self.label("项目标题", p.title.as_deref(), "未命名");
        if fields == FieldSet::Full {
            self.label("主题", p.topic.as_deref(), "未指定");
        }
        self.label("总时长", p.duration.as_deref(), "15秒");
        self.label("宽高比", p.aspect_ratio.as_deref(), "16:9");
        self.label("视觉风格", p.style.as_deref(), "电影写实");
        self.label("叙事结构", p.narrative_structure.as_deref(), "起承转合");
        self.label("场景类型", p.scene_type.as_deref(), "通用");
        self.label("声音需求", p.sound_requirements.as_deref(), "未指定");
        self.label("质感取向", p.texture_feel.as_deref(), "精致制作感");
        self.label("目标平台", p.target_platform.as_deref(), "未指定");
        self
    }

    /// `- @图片N 名称（类型）：描述`, N counting from 1.
    pub fn assets(mut self, assets: &[Asset]) -> Self {
        if assets.is_empty() {
            return self;
        }
        self.lines.push("\n**素材清单**：".to_string());
        for (i, asset) in assets.iter().enumerate() {
            self.lines.push(format!(
                "- @图片{} {}（{}）：{}",
                i + 1,
                asset.name.as_deref().unwrap_or("未命名"),
                asset.kind.as_deref().unwrap_or("未知"),
                asset.description.as_deref().unwrap_or(""),
            ));
        }
        self
    }

    /// Multi-line block: label on its own line, body below.
    pub fn block(mut self, label: &str, body: Option<&str>) -> Self {
        if let Some(body) = body.filter(|b| !b.trim().is_empty()) {
            self.lines.push(format!("\n**{label}**：\n{body}"));
        }
        self
    }

    /// Single-line note, skipped when empty.
    pub fn note(mut self, label: &str, body: Option<&str>) -> Self {
        if let Some(body) = body.filter(|b| !b.trim().is_empty()) {
            self.lines.push(format!("\n**{label}**：{body}"));
        }
        self
    }

    pub fn line(mut self, text: &str) -> Self {
        self.lines.push(text.to_string());
        self
    }

    pub fn build(self) -> String {
        self.lines.join("\n")
    }

    fn label(&mut self, label: &str, value: Option<&str>, placeholder: &str) {
        self.lines
            .push(format!("**{label}**：{}", value.unwrap_or(placeholder)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_sections_are_dropped_with_heading() {
        let prompt = PromptBuilder::new("# 角色")
            .section("词汇", "  \n")
            .section("模板", "模板正文")
            .block("")
            .block("## 规则\n\n1. x")
            .build();
        assert_eq!(prompt, "# 角色\n\n## 模板\n\n模板正文\n\n## 规则\n\n1. x");
    }

    #[test]
    fn test_placeholders_keep_line_order() {
        let message = UserMessage::new("头")
            .project(&Project::default(), FieldSet::Full)
            .build();
        let lines: Vec<&str> = message.lines().collect();
        assert_eq!(lines[0], "头");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "**项目标题**：未命名");
        assert_eq!(lines[3], "**主题**：未指定");
        assert_eq!(lines[4], "**总时长**：15秒");
        assert_eq!(lines[11], "**目标平台**：未指定");
        assert_eq!(lines.len(), 12);
    }

    #[test]
    fn test_without_topic_skips_only_topic() {
        let project = Project {
            topic: Some("山".to_string()),
            ..Project::default()
        };
        let message = UserMessage::new("头")
            .project(&project, FieldSet::WithoutTopic)
            .build();
        assert!(!message.contains("主题"));
        assert!(message.contains("**总时长**：15秒"));
    }

    #[test]
    fn test_assets_are_numbered_from_one() {
        let assets = vec![
            Asset::from_spec("女主|character|长发"),
            Asset::default(),
        ];
        let message = UserMessage::new("头").assets(&assets).build();
        assert!(message.contains("- @图片1 女主（character）：长发"));
        assert!(message.contains("- @图片2 未命名（未知）："));
    }

    #[test]
    fn test_blank_notes_are_skipped() {
        let message = UserMessage::new("头")
            .note("额外要求", Some("  "))
            .block("分镜脚本", None)
            .build();
        assert_eq!(message, "头\n");
    }
}
