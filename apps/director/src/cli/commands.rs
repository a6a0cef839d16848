//! Subcommand runners. Each one drives the generation pipeline once (or,
//! interactively, once per user decision) and persists or prints the text.

use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use crate::bridge::{self, BridgeResponse};
use crate::config::{ChatSettings, ConfigError};
use crate::errors::AppError;
use crate::generation::pipeline::{self, assemble_prompt, assemble_revision, assemble_storyboard};
use crate::generation::{extract_structured, AssembledPrompt, Extraction, GenerationRequest};
use crate::llm_client::{ChatBackend, ChatClient};
use crate::references::ReferenceStore;
use crate::render::render_viewer;

use super::interactive::{Decision, Prompter, DIVIDER, RULE};
use super::OutputArgs;

pub const STORYBOARD_FILE: &str = "storyboard.md";
pub const PROMPT_FILE: &str = "seedance-prompt.md";

// ────────────────────────────────────────────────────────────────────────────
// bridge
// ────────────────────────────────────────────────────────────────────────────

/// Reads stdin to the end and prints exactly one JSON object.
pub async fn run_bridge(
    store: &ReferenceStore,
    settings: Result<ChatSettings, ConfigError>,
    dry_run: bool,
) -> Result<(), AppError> {
    let mut input = String::new();
    let response = match tokio::io::stdin().read_to_string(&mut input).await {
        Ok(_) => {
            let client = settings.map(ChatClient::new);
            let backend = match &client {
                Ok(client) => Ok(client as &dyn ChatBackend),
                Err(e) => Err(e.clone()),
            };
            bridge::handle(&input, dry_run, store, backend).await
        }
        Err(e) => BridgeResponse::failure(&AppError::Input(format!("读取 stdin 失败：{e}"))),
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(response.render().as_bytes())?;
    stdout.flush()?;
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// storyboard / prompt / full
// ────────────────────────────────────────────────────────────────────────────

pub async fn run_storyboard(
    store: &ReferenceStore,
    backend: &dyn ChatBackend,
    request: &GenerationRequest,
    output: &OutputArgs,
) -> Result<(), AppError> {
    let prompt = assemble_storyboard(store, request);
    let text = generate(backend, &prompt, output.stream).await?;
    emit(&text, output)
}

pub async fn run_prompt(
    store: &ReferenceStore,
    backend: &dyn ChatBackend,
    mut request: GenerationRequest,
    storyboard: &Path,
    output: &OutputArgs,
) -> Result<(), AppError> {
    let text = fs::read_to_string(storyboard).map_err(|e| {
        AppError::Input(format!("无法读取分镜文件 {}：{e}", storyboard.display()))
    })?;
    request.storyboard = Some(text);

    let prompt = assemble_prompt(store, &request);
    let text = generate(backend, &prompt, output.stream).await?;
    emit(&text, output)
}

/// What `full` wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullArtifacts {
    pub storyboard: PathBuf,
    pub prompt: PathBuf,
    pub viewer: Option<PathBuf>,
}

/// Storyboard then prompts; the viewer page goes to `viewer_dir` when the
/// prompt reply carries JSON.
pub async fn run_full(
    store: &ReferenceStore,
    backend: &dyn ChatBackend,
    mut request: GenerationRequest,
    dir: &Path,
    viewer_dir: &Path,
    stream: bool,
) -> Result<FullArtifacts, AppError> {
    fs::create_dir_all(dir)?;

    let storyboard = generate(backend, &assemble_storyboard(store, &request), stream).await?;
    let storyboard_path = dir.join(STORYBOARD_FILE);
    fs::write(&storyboard_path, &storyboard)?;
    info!("Storyboard written to {}", storyboard_path.display());

    request.storyboard = Some(storyboard);
    let prompts = generate(backend, &assemble_prompt(store, &request), stream).await?;
    let prompt_path = dir.join(PROMPT_FILE);
    fs::write(&prompt_path, &prompts)?;
    info!("Prompts written to {}", prompt_path.display());

    let viewer = match extract_prompts(&prompts).data() {
        Some(data) => render_viewer(store, data, viewer_dir)?,
        None => None,
    };

    Ok(FullArtifacts {
        storyboard: storyboard_path,
        prompt: prompt_path,
        viewer,
    })
}

/// Streams to stderr when asked; always returns the full text.
async fn generate(
    backend: &dyn ChatBackend,
    prompt: &AssembledPrompt,
    stream: bool,
) -> Result<String, AppError> {
    let mut stderr = io::stderr();
    let text = pipeline::run(backend, prompt, stream, &mut stderr).await?;
    if stream {
        writeln!(stderr)?;
    }
    Ok(text)
}

fn extract_prompts(prompts: &str) -> Extraction {
    let extraction = extract_structured(prompts);
    match extraction.strategy() {
        Some(strategy) => debug!(?strategy, "Extracted structured prompts"),
        None => info!("Prompt reply is not JSON; skipping viewer"),
    }
    extraction
}

fn emit(text: &str, output: &OutputArgs) -> Result<(), AppError> {
    if let Some(path) = &output.output {
        fs::write(path, text)?;
        eprintln!("已写入 {}", path.display());
        return Ok(());
    }

    // The stream already showed the text on this terminal.
    if output.stream && io::stdout().is_terminal() && io::stderr().is_terminal() {
        return Ok(());
    }
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{text}")?;
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// interactive
// ────────────────────────────────────────────────────────────────────────────

/// Full guided session. Model output streams into the prompter's writer.
pub async fn run_interactive<R, W>(
    store: &ReferenceStore,
    backend: &dyn ChatBackend,
    prompter: &mut Prompter<R, W>,
    viewer_dir: &Path,
) -> Result<(), AppError>
where
    R: BufRead,
    W: Write + Send,
{
    let mut request = prompter.collect_request()?;
    prompter.echo_request(&request)?;

    prompter.say(&format!("\n{RULE}\n⏳ 正在生成分镜脚本…\n"))?;
    let mut storyboard = stream_into(backend, &assemble_storyboard(store, &request), prompter).await?;

    loop {
        match prompter.confirm_storyboard()? {
            Decision::Accept => break,
            Decision::Regenerate => {
                prompter.say(&format!("\n{RULE}\n⏳ 正在生成分镜脚本…\n"))?;
                storyboard =
                    stream_into(backend, &assemble_storyboard(store, &request), prompter).await?;
            }
            Decision::Revise(feedback) => {
                prompter.say(&format!("\n{RULE}\n⏳ 正在修改分镜脚本…\n"))?;
                request.storyboard = Some(storyboard);
                let revision = assemble_revision(store, &request, &feedback);
                storyboard = stream_into(backend, &revision, prompter).await?;
            }
        }
    }

    request.storyboard = Some(storyboard);
    prompter.say(&format!("\n{RULE}\n⏳ 正在生成即梦提示词…\n"))?;
    let prompts = stream_into(backend, &assemble_prompt(store, &request), prompter).await?;

    match extract_prompts(&prompts).data() {
        Some(data) => match render_viewer(store, data, viewer_dir)? {
            Some(path) => {
                prompter.say(&format!("\n✅ 可视化页面已生成：{}", path.display()))?;
                prompter.say("   请在浏览器中打开该文件")?;
            }
            None => prompter.say("⚠️  HTML 模板文件未找到，跳过 HTML 生成")?,
        },
        None => {
            prompter.say("\n⚠️  未能从响应中提取 JSON 数据，HTML 页面未生成")?;
            prompter.say("   你可以复制上方的提示词直接粘贴到即梦平台使用")?;
        }
    }

    prompter.say(&format!("\n{DIVIDER}\n  完成！祝拍摄顺利 🎬\n{DIVIDER}"))?;
    Ok(())
}

async fn stream_into<R: BufRead, W: Write + Send>(
    backend: &dyn ChatBackend,
    prompt: &AssembledPrompt,
    prompter: &mut Prompter<R, W>,
) -> Result<String, AppError> {
    let text = pipeline::run(backend, prompt, true, prompter.output()).await?;
    prompter.say("")?;
    Ok(text)
}
