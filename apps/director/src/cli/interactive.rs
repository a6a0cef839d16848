//! Terminal dialogue: numbered menus, free-text answers and the
//! storyboard confirm loop.
//!
//! Generic over the reader and writer so sessions can be scripted in tests.

use std::io::{BufRead, Write};

use crate::errors::AppError;
use crate::generation::{GenerationRequest, Project};

pub const DIVIDER: &str = "============================================================";
pub const RULE: &str = "────────────────────────────────────────";

pub const DURATION_OPTIONS: &[&str] = &[
    "15 秒（单段）",
    "30 秒（2 段）",
    "45 秒（3 段）",
    "60 秒（4 段）",
];

pub const ASPECT_RATIO_OPTIONS: &[&str] = &[
    "9:16 竖屏（抖音 / 小红书）",
    "16:9 横屏（B站 / YouTube）",
    "1:1 方形",
];

pub const SCENE_TYPE_OPTIONS: &[&str] = &[
    "电商/广告",
    "AI漫剧/仙侠",
    "短剧/对白",
    "科普教学",
    "MV/音乐卡点",
    "短视频/种草",
    "通用叙事",
];

pub const NARRATIVE_OPTIONS: &[&str] = &[
    "起承转合 — 经典四段式，万能结构",
    "Hook-反转 — 开头即高潮，靠反转传播",
    "对比型 — Before/After 强反差",
    "悬念型 — 问题驱动，逐步揭秘",
    "教程型 — 结果先行，步骤简洁",
    "情绪浪潮型 — 情绪曲线驱动节奏",
    "POV 代入型 — 第一人称视角",
    "日常切片型 — 生活片段，不刻意叙事",
    "AIDA 营销型 — 注意→兴趣→欲望→行动",
    "清单盘点型 — 列表式，条目化呈现",
];

pub const STYLE_OPTIONS: &[&str] = &[
    "电影写实 — 真实世界、电影级光影",
    "日系清新 — 柔光自然色调",
    "赛博朋克 — 霓虹、高科技、雨夜",
    "中国风水墨 — 水墨画风格、留白写意",
    "商业广告 — 精致布光、产品摄影",
    "3D CG 渲染 — 三维渲染、光追",
    "复古胶片 — 胶片颗粒、褪色暖调",
    "纪录片风格 — 手持跟拍、自然光",
    "Vlog 手持 — 生活感、随性",
    "氛围感 / 情绪向 — 情绪驱动画面",
];

pub const SOUND_OPTIONS: &[&str] = &[
    "BGM + 环境音（无人声）",
    "旁白 + BGM",
    "台词对白 + BGM + 环境音",
    "纯 BGM",
    "无声",
];

pub const ASSET_OPTIONS: &[&str] = &[
    "没有素材，纯文本生成",
    "有角色参考图",
    "有场景参考图",
    "有角色图 + 场景图",
    "有参考视频",
];

/// Answer to the storyboard confirm prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Regenerate,
    Revise(String),
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn say(&mut self, text: &str) -> Result<(), AppError> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    /// Prints `prompt` and reads one trimmed line. End of input ends the
    /// session.
    pub fn ask(&mut self, prompt: &str) -> Result<String, AppError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(AppError::Input("输入已结束，会话终止。".to_string()));
        }
        Ok(line.trim().to_string())
    }

    /// Numbered menu with `0` for custom input. Re-prompts until the answer
    /// is valid.
    pub fn choose(&mut self, title: &str, options: &[&str]) -> Result<String, AppError> {
        writeln!(self.output, "\n{title}")?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}. {option}", i + 1)?;
        }
        writeln!(self.output, "  0. 自定义")?;

        loop {
            let answer = self.ask("\n请选择 (输入数字): ")?;
            if answer == "0" {
                let custom = self.ask("请输入: ")?;
                if !custom.is_empty() {
                    return Ok(custom);
                }
                self.say("输入不能为空，请重试")?;
                continue;
            }
            let picked = answer
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| options.get(i));
            match picked {
                Some(option) => return Ok(option.to_string()),
                None => self.say("输入无效，请重试")?,
            }
        }
    }

    pub fn confirm_storyboard(&mut self) -> Result<Decision, AppError> {
        loop {
            writeln!(self.output, "\n{RULE}")?;
            writeln!(self.output, "  y = 满意，继续生成提示词")?;
            writeln!(self.output, "  n = 不满意，重新生成")?;
            writeln!(self.output, "  e = 给出修改意见")?;

            match self.ask("\n对分镜是否满意？ (y/n/e): ")?.to_lowercase().as_str() {
                "y" => return Ok(Decision::Accept),
                "n" => return Ok(Decision::Regenerate),
                "e" => {
                    let feedback = self.ask("请输入修改意见: ")?;
                    if !feedback.is_empty() {
                        return Ok(Decision::Revise(feedback));
                    }
                }
                _ => self.say("请输入 y、n 或 e")?,
            }
        }
    }

    /// Walks the parameter menus and builds the generation request.
    pub fn collect_request(&mut self) -> Result<GenerationRequest, AppError> {
        self.say(DIVIDER)?;
        self.say("  Seedance Director — 豆包 AI 视频导演")?;
        self.say(DIVIDER)?;
        self.say("\n请描述你的视频创意（可以简单也可以详细）：")?;

        let idea = self.ask("> ")?;
        if idea.is_empty() {
            return Err(AppError::Input("创意描述不能为空".to_string()));
        }

        let project = Project {
            topic: Some(idea),
            duration: Some(self.choose("视频时长：", DURATION_OPTIONS)?),
            aspect_ratio: Some(self.choose("宽高比：", ASPECT_RATIO_OPTIONS)?),
            scene_type: Some(self.choose("场景类型：", SCENE_TYPE_OPTIONS)?),
            narrative_structure: Some(self.choose("叙事结构：", NARRATIVE_OPTIONS)?),
            style: Some(self.choose("视觉风格：", STYLE_OPTIONS)?),
            sound_requirements: Some(self.choose("声音需求：", SOUND_OPTIONS)?),
            ..Project::default()
        };
        let assets = self.choose("素材情况：", ASSET_OPTIONS)?;

        let mut request = GenerationRequest::new(project);
        request.user_notes = Some(format!("素材情况：{assets}"));
        Ok(request)
    }

    pub fn echo_request(&mut self, request: &GenerationRequest) -> Result<(), AppError> {
        let p = &request.project;
        let field = |v: &Option<String>| v.clone().unwrap_or_default();
        self.say(&format!("\n{DIVIDER}\n  参数确认\n{DIVIDER}"))?;
        self.say(&format!("- 创意描述：{}", field(&p.topic)))?;
        self.say(&format!("- 时长：{}", field(&p.duration)))?;
        self.say(&format!("- 宽高比：{}", field(&p.aspect_ratio)))?;
        self.say(&format!("- 场景类型：{}", field(&p.scene_type)))?;
        self.say(&format!("- 叙事结构：{}", field(&p.narrative_structure)))?;
        self.say(&format!("- 视觉风格：{}", field(&p.style)))?;
        self.say(&format!("- 声音需求：{}", field(&p.sound_requirements)))?;
        if let Some(notes) = &request.user_notes {
            self.say(&format!("- {notes}"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(script: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    fn transcript(p: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.output).unwrap()
    }

    #[test]
    fn test_choose_by_number() {
        let mut p = prompter("3\n");
        assert_eq!(p.choose("宽高比：", ASPECT_RATIO_OPTIONS).unwrap(), "1:1 方形");
        let out = transcript(p);
        assert!(out.contains("  1. 9:16 竖屏（抖音 / 小红书）"));
        assert!(out.contains("  0. 自定义"));
    }

    #[test]
    fn test_choose_retries_invalid_then_custom() {
        let mut p = prompter("9\nabc\n0\n\n0\n21:9 超宽\n");
        assert_eq!(p.choose("宽高比：", ASPECT_RATIO_OPTIONS).unwrap(), "21:9 超宽");
        let out = transcript(p);
        assert_eq!(out.matches("输入无效，请重试").count(), 2);
        assert!(out.contains("输入不能为空，请重试"));
    }

    #[test]
    fn test_end_of_input_is_input_error() {
        let mut p = prompter("");
        let err = p.choose("时长：", DURATION_OPTIONS).unwrap_err();
        assert_eq!(err.error_type(), "input_error");
    }

    #[test]
    fn test_confirm_loop() {
        let mut p = prompter("x\ne\n\nE\n更快一点\n");
        assert_eq!(
            p.confirm_storyboard().unwrap(),
            Decision::Revise("更快一点".to_string())
        );
        assert!(transcript(p).contains("请输入 y、n 或 e"));

        assert_eq!(prompter("Y\n").confirm_storyboard().unwrap(), Decision::Accept);
        assert_eq!(prompter("n\n").confirm_storyboard().unwrap(), Decision::Regenerate);
    }

    #[test]
    fn test_collect_request_from_menus() {
        let mut p = prompter("雨夜车站重逢\n3\n1\n2\n1\n1\n3\n2\n");
        let request = p.collect_request().unwrap();
        let project = &request.project;
        assert_eq!(project.topic.as_deref(), Some("雨夜车站重逢"));
        assert_eq!(project.duration.as_deref(), Some("45 秒（3 段）"));
        assert_eq!(project.aspect_ratio.as_deref(), Some("9:16 竖屏（抖音 / 小红书）"));
        assert_eq!(project.scene_type.as_deref(), Some("AI漫剧/仙侠"));
        assert_eq!(project.narrative_structure.as_deref(), Some(NARRATIVE_OPTIONS[0]));
        assert_eq!(project.style.as_deref(), Some(STYLE_OPTIONS[0]));
        assert_eq!(project.sound_requirements.as_deref(), Some(SOUND_OPTIONS[2]));
        assert_eq!(request.user_notes.as_deref(), Some("素材情况：有角色参考图"));
    }

    #[test]
    fn test_empty_idea_is_rejected() {
        let err = prompter("\n").collect_request().unwrap_err();
        assert_eq!(err.user_message(), "创意描述不能为空");
    }
}
