//! Command-line surface of the director.

pub mod commands;
pub mod interactive;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::config::{ChatSettings, ConfigError};
use crate::generation::{Asset, GenerationRequest, Project};

/// Seedance Director - storyboards and Seedance prompts via an
/// OpenAI-compatible chat API
#[derive(Debug, Parser)]
#[command(name = "director", version, about, long_about = None)]
pub struct Cli {
    /// Reference skill directory (default: bundled skill/)
    #[arg(long, env = "DIRECTOR_SKILL_DIR", global = true)]
    pub skill_dir: Option<PathBuf>,

    /// API key (overrides ARK_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Model or endpoint id (overrides ARK_MODEL)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// API base URL (overrides ARK_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Read one JSON request on stdin, write one JSON result on stdout
    Bridge {
        /// Echo the assembled prompts instead of calling the API
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate a storyboard
    Storyboard {
        #[command(flatten)]
        project: ProjectArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Convert a storyboard into Seedance prompts
    Prompt {
        #[command(flatten)]
        project: ProjectArgs,
        /// Storyboard markdown to convert
        #[arg(long)]
        storyboard: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Storyboard, then prompts, written into one directory
    Full {
        #[command(flatten)]
        project: ProjectArgs,
        /// Output directory
        #[arg(short = 'd', long, default_value = ".")]
        dir: PathBuf,
        /// Echo model output to stderr as it arrives
        #[arg(long)]
        stream: bool,
    },

    /// Guided session with menus and a confirm/revise loop
    Interactive,
}

#[derive(Debug, Clone, Default, Args)]
pub struct OutputArgs {
    /// Write the result to this file instead of stdout
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
    /// Echo model output to stderr as it arrives
    #[arg(long)]
    pub stream: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ProjectArgs {
    /// Project title
    #[arg(long)]
    pub title: Option<String>,
    /// Topic or creative brief
    #[arg(long, alias = "brief")]
    pub topic: Option<String>,
    /// Total duration, e.g. 15秒, 45秒, 1分钟
    #[arg(long)]
    pub duration: Option<String>,
    /// Aspect ratio, e.g. 9:16
    #[arg(long)]
    pub aspect_ratio: Option<String>,
    /// Visual style
    #[arg(long)]
    pub style: Option<String>,
    /// Narrative structure name, e.g. 起承转合
    #[arg(long)]
    pub narrative: Option<String>,
    /// Scene type, e.g. 电商, 仙侠, 短剧
    #[arg(long)]
    pub scene_type: Option<String>,
    /// Sound requirements
    #[arg(long)]
    pub sound: Option<String>,
    /// Texture feel: 真实生活感 or 精致制作感
    #[arg(long)]
    pub texture: Option<String>,
    /// Target platform
    #[arg(long)]
    pub platform: Option<String>,
    /// Extra requirements appended to the request
    #[arg(long)]
    pub notes: Option<String>,
    /// Reference asset as 'name|type|description' (repeatable)
    #[arg(long = "asset")]
    pub assets: Vec<String>,
    /// JSON file with project fields; flags override its values
    #[arg(long)]
    pub project_file: Option<PathBuf>,
}

impl ProjectArgs {
    pub fn to_project(&self) -> Project {
        Project {
            title: self.title.clone(),
            topic: self.topic.clone(),
            duration: self.duration.clone(),
            aspect_ratio: self.aspect_ratio.clone(),
            style: self.style.clone(),
            narrative_structure: self.narrative.clone(),
            scene_type: self.scene_type.clone(),
            sound_requirements: self.sound.clone(),
            texture_feel: self.texture.clone(),
            target_platform: self.platform.clone(),
        }
    }

    /// Flags merged over `--project-file`.
    ///
    /// The file may be a bare project object or a full request with
    /// `project`, `assets` and `userNotes`.
    pub fn to_request(&self) -> anyhow::Result<GenerationRequest> {
        let base = match &self.project_file {
            Some(path) => load_request_file(path)?,
            None => GenerationRequest::default(),
        };

        let mut request = GenerationRequest {
            project: self.to_project().or(base.project),
            assets: base.assets,
            user_notes: self.notes.clone().or(base.user_notes),
            storyboard: base.storyboard,
        };
        if !self.assets.is_empty() {
            request.assets = self.assets.iter().map(|s| Asset::from_spec(s)).collect();
        }
        Ok(request)
    }
}

fn load_request_file(path: &Path) -> anyhow::Result<GenerationRequest> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("无法读取项目文件 {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("项目文件 {} 不是合法 JSON", path.display()))?;

    if value.get("project").is_some() {
        Ok(serde_json::from_value(value)?)
    } else {
        Ok(GenerationRequest::new(serde_json::from_value(value)?))
    }
}

impl Cli {
    /// Chat settings from the environment with flag overrides applied.
    pub fn chat_settings(&self) -> Result<ChatSettings, ConfigError> {
        let settings = match &self.api_key {
            Some(flag) => ChatSettings::from_lookup(|key| match key {
                "ARK_API_KEY" => Some(flag.clone()),
                _ => std::env::var(key).ok(),
            })?,
            None => ChatSettings::from_env()?,
        };
        Ok(settings.with_overrides(self.model.as_deref(), self.base_url.as_deref()))
    }
}
