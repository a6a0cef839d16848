mod bridge;
mod cli;
mod config;
mod errors;
mod generation;
mod llm_client;
mod references;
mod render;
mod selection;

use std::io;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::commands;
use crate::cli::interactive::Prompter;
use crate::cli::{Cli, Commands, ProjectArgs};
use crate::config::Config;
use crate::errors::AppError;
use crate::generation::GenerationRequest;
use crate::llm_client::ChatClient;
use crate::references::ReferenceStore;

#[tokio::main]
async fn main() -> ExitCode {
    // Before clap reads env-backed flags
    let config = Config::from_env();

    // Logs go to stderr; stdout carries results only
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.log_level))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            warn!(error_type = e.error_type(), "Command failed: {e:?}");
            eprintln!("错误：{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: Config) -> Result<(), AppError> {
    let skill_dir = cli.skill_dir.clone().unwrap_or(config.skill_dir);
    let store = ReferenceStore::new(skill_dir);
    info!(
        "Seedance Director v{} (skill: {})",
        env!("CARGO_PKG_VERSION"),
        store.root().display()
    );

    match &cli.command {
        Commands::Bridge { dry_run } => {
            commands::run_bridge(&store, cli.chat_settings(), *dry_run).await
        }
        Commands::Storyboard { project, output } => {
            let client = connect(&cli)?;
            let request = request_from(project)?;
            commands::run_storyboard(&store, &client, &request, output).await
        }
        Commands::Prompt {
            project,
            storyboard,
            output,
        } => {
            let client = connect(&cli)?;
            let request = request_from(project)?;
            commands::run_prompt(&store, &client, request, storyboard, output).await
        }
        Commands::Full {
            project,
            dir,
            stream,
        } => {
            let client = connect(&cli)?;
            let request = request_from(project)?;
            let artifacts =
                commands::run_full(&store, &client, request, dir, Path::new("."), *stream).await?;
            println!("分镜脚本：{}", artifacts.storyboard.display());
            println!("即梦提示词：{}", artifacts.prompt.display());
            if let Some(viewer) = artifacts.viewer {
                println!("可视化页面：{}", viewer.display());
            }
            Ok(())
        }
        Commands::Interactive => {
            let client = connect(&cli)?;
            let mut prompter = Prompter::new(io::stdin().lock(), io::stdout());
            commands::run_interactive(&store, &client, &mut prompter, Path::new(".")).await
        }
    }
}

fn request_from(project: &ProjectArgs) -> Result<GenerationRequest, AppError> {
    project
        .to_request()
        .map_err(|e| AppError::Input(format!("{e:#}")))
}

fn connect(cli: &Cli) -> Result<ChatClient, AppError> {
    let client = ChatClient::new(cli.chat_settings()?);
    info!("Chat client initialized (model: {})", client.model());
    Ok(client)
}
