//! stdin-JSON → stdout-JSON bridge for programmatic callers.
//!
//! Exactly one JSON object comes out per invocation, whatever happens:
//! input errors, configuration errors, API failures and even panics are
//! classified into `{"success": false, "error", "error_type"}`.

use std::io;
use std::panic::AssertUnwindSafe;

use anyhow::anyhow;
use futures::FutureExt;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{error, info, warn};

use crate::config::ConfigError;
use crate::errors::AppError;
use crate::generation::pipeline::{self, assemble_prompt, assemble_storyboard};
use crate::generation::{extract_structured, AssembledPrompt, Extraction, GenerationRequest, Phase};
use crate::llm_client::ChatBackend;
use crate::references::ReferenceStore;

pub const PARSE_WARNING: &str = "豆包返回内容非标准 JSON，已返回原始文本";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BridgeResponse {
    Success {
        success: bool,
        data: Value,
    },
    Failure {
        success: bool,
        error: String,
        error_type: &'static str,
    },
    DryRun {
        dry_run: bool,
        system_prompt: String,
        user_message: String,
        system_prompt_length: usize,
        user_message_length: usize,
    },
}

impl BridgeResponse {
    pub fn success(data: Value) -> Self {
        BridgeResponse::Success {
            success: true,
            data,
        }
    }

    pub fn failure(error: &AppError) -> Self {
        BridgeResponse::Failure {
            success: false,
            error: error.user_message(),
            error_type: error.error_type(),
        }
    }

    pub fn dry_run(prompt: AssembledPrompt) -> Self {
        BridgeResponse::DryRun {
            dry_run: true,
            system_prompt_length: prompt.system.chars().count(),
            user_message_length: prompt.user.chars().count(),
            system_prompt: prompt.system,
            user_message: prompt.user,
        }
    }

    /// Pretty JSON plus a trailing newline, ready for stdout.
    pub fn render(&self) -> String {
        match serde_json::to_string_pretty(self) {
            Ok(mut text) => {
                text.push('\n');
                text
            }
            Err(e) => {
                warn!("Failed to serialize bridge response: {e}");
                "{\"success\": false, \"error\": \"内部错误\", \"error_type\": \"internal_error\"}\n"
                    .to_string()
            }
        }
    }
}

/// Handles one bridge request. `backend` carries the configuration error
/// when no API key is set; it is consulted only outside dry-run.
pub async fn handle(
    input: &str,
    dry_run: bool,
    store: &ReferenceStore,
    backend: Result<&dyn ChatBackend, ConfigError>,
) -> BridgeResponse {
    let outcome = AssertUnwindSafe(respond(input, dry_run, store, backend))
        .catch_unwind()
        .await;
    match outcome {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            warn!(error_type = e.error_type(), "Bridge request failed: {e}");
            BridgeResponse::failure(&e)
        }
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!("Bridge request panicked: {message}");
            BridgeResponse::failure(&AppError::Internal(anyhow!(message)))
        }
    }
}

async fn respond(
    input: &str,
    dry_run: bool,
    store: &ReferenceStore,
    backend: Result<&dyn ChatBackend, ConfigError>,
) -> Result<BridgeResponse, AppError> {
    let (phase, request) = parse_input(input)?;
    let prompt = match phase {
        Phase::Prompt => assemble_prompt(store, &request),
        Phase::Storyboard | Phase::Revision => assemble_storyboard(store, &request),
    };

    if dry_run {
        return Ok(BridgeResponse::dry_run(prompt));
    }

    let backend = backend?;
    let raw = pipeline::run(backend, &prompt, false, &mut io::sink()).await?;
    Ok(shape(phase, extract_structured(&raw)))
}

/// Validates the envelope: non-empty, JSON, and a known `mode`.
pub fn parse_input(input: &str) -> Result<(Phase, GenerationRequest), AppError> {
    if input.trim().is_empty() {
        return Err(AppError::Input(
            "未收到输入。请通过 stdin 传入 JSON 数据。".to_string(),
        ));
    }

    let value: Value = serde_json::from_str(input).map_err(malformed)?;
    let mode = value.get("mode");
    let phase = mode
        .and_then(Value::as_str)
        .and_then(Phase::from_mode)
        .ok_or_else(|| {
            let shown = match mode {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => "null".to_string(),
            };
            AppError::Input(format!(
                "无效的 mode：'{shown}'。必须为 'storyboard' 或 'prompt'。"
            ))
        })?;

    let request = serde_json::from_value(value).map_err(malformed)?;
    Ok((phase, request))
}

fn malformed(e: serde_json::Error) -> AppError {
    AppError::Input(format!("输入 JSON 解析失败：{e}"))
}

/// Gives every structured reply a uniform `segments` shape.
fn shape(phase: Phase, extraction: Extraction) -> BridgeResponse {
    match extraction {
        Extraction::Unstructured { raw } => {
            info!("Reply is not JSON; returning raw text");
            BridgeResponse::success(json!({
                "rawText": raw,
                "parseWarning": PARSE_WARNING,
            }))
        }
        Extraction::Structured { data, strategy } => {
            info!(?strategy, "Extracted structured reply");
            BridgeResponse::success(wrap_segments(phase, data))
        }
    }
}

fn wrap_segments(phase: Phase, data: Value) -> Value {
    if data.get("segments").is_some() {
        return data;
    }
    let segments = match data {
        Value::Object(map) if map.is_empty() => Value::Array(Vec::new()),
        Value::Array(items) => Value::Array(items),
        other => Value::Array(vec![other]),
    };

    let mut out = Map::new();
    out.insert("segments".to_string(), segments);
    if phase == Phase::Prompt {
        out.insert("operationGuide".to_string(), json!([]));
        out.insert("tips".to_string(), json!([]));
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::bundled_skill_dir;
    use crate::llm_client::fake::FakeBackend;
    use crate::llm_client::{ChatPrompt, LlmError};
    use async_trait::async_trait;
    use std::io::Write;

    fn empty_store() -> (tempfile::TempDir, ReferenceStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ReferenceStore::new(dir.path());
        (dir, store)
    }

    async fn call(input: &str, backend: &FakeBackend) -> BridgeResponse {
        let (_dir, store) = empty_store();
        handle(input, false, &store, Ok(backend)).await
    }

    fn error_of(response: &BridgeResponse) -> (&str, &str) {
        match response {
            BridgeResponse::Failure {
                error, error_type, ..
            } => (error.as_str(), *error_type),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    fn data_of(response: BridgeResponse) -> Value {
        match response {
            BridgeResponse::Success { success, data } => {
                assert!(success);
                data
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_input() {
        let backend = FakeBackend::default();
        let response = call("  \n", &backend).await;
        assert_eq!(
            error_of(&response),
            ("未收到输入。请通过 stdin 传入 JSON 数据。", "input_error")
        );
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let response = call("{\"mode\": ", &FakeBackend::default()).await;
        let (message, kind) = error_of(&response);
        assert_eq!(kind, "input_error");
        assert!(message.starts_with("输入 JSON 解析失败："));
    }

    #[tokio::test]
    async fn test_invalid_mode() {
        let response = call(r#"{"mode": "video"}"#, &FakeBackend::default()).await;
        assert_eq!(
            error_of(&response),
            ("无效的 mode：'video'。必须为 'storyboard' 或 'prompt'。", "input_error")
        );

        let response = call(r#"{"project": {}}"#, &FakeBackend::default()).await;
        assert_eq!(error_of(&response).1, "input_error");
        assert!(error_of(&response).0.contains("'null'"));
    }

    #[tokio::test]
    async fn test_missing_key_is_config_error_before_any_call() {
        let (_dir, store) = empty_store();
        let response = handle(
            r#"{"mode": "storyboard"}"#,
            false,
            &store,
            Err(ConfigError::Missing("ARK_API_KEY")),
        )
        .await;
        let (message, kind) = error_of(&response);
        assert_eq!(kind, "config_error");
        assert!(message.contains("ARK_API_KEY"));
    }

    #[tokio::test]
    async fn test_dry_run_needs_no_key() {
        let (_dir, store) = empty_store();
        let response = handle(
            r#"{"mode": "prompt", "project": {"title": "回家"}}"#,
            true,
            &store,
            Err(ConfigError::Missing("ARK_API_KEY")),
        )
        .await;
        match response {
            BridgeResponse::DryRun {
                dry_run,
                user_message,
                user_message_length,
                ..
            } => {
                assert!(dry_run);
                assert!(user_message.contains("**项目标题**：回家"));
                assert_eq!(user_message_length, user_message.chars().count());
            }
            other => panic!("expected dry run, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dry_run_xianxia_forty_five_seconds() {
        let store = ReferenceStore::new(bundled_skill_dir());
        let backend = FakeBackend::default();
        let input = r#"{"mode":"storyboard","project":{"duration":"45秒","sceneType":"仙侠"}}"#;
        let response = handle(input, true, &store, Ok(&backend)).await;

        let rendered: Value = serde_json::from_str(&response.render()).unwrap();
        assert_eq!(rendered["dry_run"], true);
        let system = rendered["system_prompt"].as_str().unwrap();
        assert!(system.contains("三段"));
        assert!(system.contains("AI漫剧/仙侠"));
        assert!(rendered["user_message"].as_str().unwrap().contains("**总时长**：45秒"));
        assert_eq!(
            rendered["system_prompt_length"],
            system.chars().count() as u64
        );
        assert!(backend.calls().is_empty(), "dry run must not call the API");
    }

    #[tokio::test]
    async fn test_fenced_segments_pass_through() {
        let backend = FakeBackend::replying(["```json\n{\"segments\":[]}\n```"]);
        let data = data_of(call(r#"{"mode":"storyboard"}"#, &backend).await);
        assert_eq!(data, json!({"segments": []}));
        assert_eq!(backend.calls()[0].temperature, 0.7);
    }

    #[tokio::test]
    async fn test_object_without_segments_is_wrapped() {
        let backend =
            FakeBackend::replying(["Sure, here you go: {\"project\":{\"title\":\"x\"}} thanks"]);
        let data = data_of(call(r#"{"mode":"storyboard"}"#, &backend).await);
        assert_eq!(data, json!({"segments": [{"project": {"title": "x"}}]}));
    }

    #[tokio::test]
    async fn test_prompt_mode_wrap_adds_guide_and_tips() {
        let backend = FakeBackend::replying(["{}"]);
        let input = r#"{"mode":"prompt","storyboard":"| 001 |"}"#;
        let data = data_of(call(input, &backend).await);
        assert_eq!(data, json!({"segments": [], "operationGuide": [], "tips": []}));
        assert_eq!(backend.calls()[0].temperature, 0.5);
        assert!(backend.calls()[0].user.contains("| 001 |"));
    }

    #[tokio::test]
    async fn test_top_level_array_becomes_segments() {
        let backend = FakeBackend::replying(["[{\"number\": 1}, {\"number\": 2}]"]);
        let data = data_of(call(r#"{"mode":"storyboard"}"#, &backend).await);
        assert_eq!(data, json!({"segments": [{"number": 1}, {"number": 2}]}));
    }

    #[tokio::test]
    async fn test_unstructured_reply_is_success_with_warning() {
        let backend = FakeBackend::replying(["抱歉，我只能给出文字版分镜。"]);
        let data = data_of(call(r#"{"mode":"storyboard"}"#, &backend).await);
        assert_eq!(data["rawText"], "抱歉，我只能给出文字版分镜。");
        assert_eq!(data["parseWarning"], PARSE_WARNING);
    }

    #[tokio::test]
    async fn test_api_failures_are_classified() {
        let cases = [
            (
                LlmError::Auth {
                    status: 401,
                    message: "bad key".to_string(),
                },
                "auth_error",
            ),
            (LlmError::RateLimited("slow down".to_string()), "rate_limit_error"),
            (LlmError::Timeout, "timeout_error"),
            (
                LlmError::Api {
                    status: 500,
                    message: "boom".to_string(),
                },
                "api_error",
            ),
        ];
        for (error, expected) in cases {
            let backend = FakeBackend::failing(error);
            let response = call(r#"{"mode":"prompt"}"#, &backend).await;
            assert_eq!(error_of(&response).1, expected);
        }
    }

    struct PanickingBackend;

    #[async_trait]
    impl ChatBackend for PanickingBackend {
        async fn chat(
            &self,
            _prompt: &ChatPrompt<'_>,
            _echo: &mut (dyn Write + Send),
        ) -> Result<String, LlmError> {
            panic!("backend exploded");
        }
    }

    #[tokio::test]
    async fn test_panic_becomes_internal_error() {
        let (_dir, store) = empty_store();
        let response = handle(r#"{"mode":"storyboard"}"#, false, &store, Ok(&PanickingBackend)).await;
        let (message, kind) = error_of(&response);
        assert_eq!(kind, "internal_error");
        assert!(message.contains("backend exploded"));
    }

    #[test]
    fn test_render_is_pretty_and_keeps_chinese() {
        let rendered = BridgeResponse::success(json!({"rawText": "分镜"})).render();
        assert!(rendered.ends_with("}\n"));
        assert!(rendered.contains("\n  \"success\": true"));
        assert!(rendered.contains("分镜"));

        let failure = BridgeResponse::failure(&AppError::Input("坏了".to_string())).render();
        let value: Value = serde_json::from_str(&failure).unwrap();
        assert_eq!(value, json!({"success": false, "error": "坏了", "error_type": "input_error"}));
    }
}
