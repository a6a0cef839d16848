/// Chat client — the single point of entry for all chat completion calls.
///
/// Speaks the OpenAI-compatible `/chat/completions` protocol exposed by the
/// ARK endpoint. One request per call, no retries: every failure is
/// classified and handed back to the caller.
use std::io::Write;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ChatSettings;

#[cfg(test)]
pub mod fake;
pub mod prompts;
pub mod sse;

use sse::{SseDecoder, SseEvent};

const REQUEST_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("authentication failed (status {status}): {message}")]
    Auth { status: u16, message: String },

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("request timed out")]
    Timeout,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model returned empty content")]
    EmptyContent,
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Http(err)
        }
    }
}

/// One system + user exchange with its sampling parameters.
#[derive(Debug, Clone, Copy)]
pub struct ChatPrompt<'a> {
    pub system: &'a str,
    pub user: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stream: bool,
}

/// Anything that can turn a prompt into model text.
///
/// `echo` receives streamed deltas as they arrive; non-streaming backends
/// leave it untouched.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat(
        &self,
        prompt: &ChatPrompt<'_>,
        echo: &mut (dyn Write + Send),
    ) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking: Option<ThinkingOption>,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThinkingOption {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default, deserialize_with = "null_as_empty")]
    choices: Vec<ChunkChoice>,
}

/// `"choices": null` reads as no choices.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    delta: Option<Delta>,
}

#[derive(Debug, Deserialize)]
struct Delta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Models in the doubao-seed-2 family reason before answering unless told
/// not to; creative generation gains nothing from it.
pub fn thinking_for_model(model: &str) -> Option<ThinkingOption> {
    model
        .contains("seed-2")
        .then_some(ThinkingOption { kind: "disabled" })
}

/// The chat completion client used by every generation phase.
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    settings: ChatSettings,
}

impl ChatClient {
    pub fn new(settings: ChatSettings) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            settings,
        }
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    pub fn build_request<'a>(&'a self, prompt: &ChatPrompt<'a>) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt.user,
                },
            ],
            temperature: prompt.temperature,
            max_tokens: prompt.max_tokens,
            stream: prompt.stream,
            thinking: thinking_for_model(&self.settings.model),
        }
    }

    /// Sends the request and turns any non-2xx status into a classified error.
    async fn send(&self, body: &ChatCompletionRequest<'_>) -> Result<reqwest::Response, LlmError> {
        info!(
            "Chat request: model={}, stream={}, max_tokens={}",
            body.model, body.stream, body.max_tokens
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.settings.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        warn!("Chat API returned {}: {}", status, text);
        Err(classify_status(status, text))
    }

    /// Single request/response call; returns `choices[0].message.content`.
    pub async fn complete(&self, prompt: &ChatPrompt<'_>) -> Result<String, LlmError> {
        let mut body = self.build_request(prompt);
        body.stream = false;

        let raw = self.send(&body).await?.text().await?;
        parse_completion(&raw)
    }

    /// Streaming call: deltas are written to `echo` as they arrive and the
    /// concatenated text is returned once the stream ends.
    pub async fn complete_streaming(
        &self,
        prompt: &ChatPrompt<'_>,
        echo: &mut (dyn Write + Send),
    ) -> Result<String, LlmError> {
        let mut body = self.build_request(prompt);
        body.stream = true;

        let response = self.send(&body).await?;
        drain_stream(Box::pin(response.bytes_stream()), echo).await
    }
}

/// Text of `choices[0].message.content` from a non-streaming response body.
fn parse_completion(raw: &str) -> Result<String, LlmError> {
    let response: ChatCompletionResponse = serde_json::from_str(raw)?;

    if let Some(usage) = &response.usage {
        debug!(
            "Chat call succeeded: prompt_tokens={:?}, completion_tokens={:?}",
            usage.prompt_tokens, usage.completion_tokens
        );
    }

    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .filter(|c| !c.is_empty())
        .ok_or(LlmError::EmptyContent)
}

/// Feeds network chunks through the SSE decoder until `[DONE]` or the end
/// of the stream.
async fn drain_stream<S, E>(mut chunks: S, echo: &mut (dyn Write + Send)) -> Result<String, LlmError>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    LlmError: From<E>,
{
    let mut decoder = SseDecoder::new();
    let mut text = String::new();
    let mut finished = false;

    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        for event in decoder.push(&chunk) {
            if absorb_event(event, &mut text, echo)? {
                finished = true;
                break;
            }
        }
        if finished {
            break;
        }
    }

    if !finished {
        for event in decoder.finish() {
            if absorb_event(event, &mut text, echo)? {
                break;
            }
        }
    }

    if text.is_empty() {
        return Err(LlmError::EmptyContent);
    }
    debug!("Stream finished: {} chars", text.chars().count());
    Ok(text)
}

#[async_trait]
impl ChatBackend for ChatClient {
    async fn chat(
        &self,
        prompt: &ChatPrompt<'_>,
        echo: &mut (dyn Write + Send),
    ) -> Result<String, LlmError> {
        if prompt.stream {
            self.complete_streaming(prompt, echo).await
        } else {
            self.complete(prompt).await
        }
    }
}

/// Maps an unsuccessful HTTP status to its error bucket.
fn classify_status(status: StatusCode, body: String) -> LlmError {
    let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Auth {
            status: status.as_u16(),
            message,
        },
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => LlmError::Timeout,
        _ => LlmError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

/// Applies one SSE event to the running text. Returns `true` on `[DONE]`.
fn absorb_event(
    event: SseEvent,
    text: &mut String,
    echo: &mut (dyn Write + Send),
) -> Result<bool, LlmError> {
    let data = match event {
        SseEvent::Done => return Ok(true),
        SseEvent::Data(data) => data,
    };

    let chunk: ChatCompletionChunk = serde_json::from_str(&data)?;
    let delta = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta)
        .and_then(|d| d.content);

    if let Some(delta) = delta.filter(|d| !d.is_empty()) {
        write_echo(echo, &delta);
        text.push_str(&delta);
    }
    Ok(false)
}

fn write_echo(echo: &mut (dyn Write + Send), text: &str) {
    if let Err(e) = echo.write_all(text.as_bytes()).and_then(|_| echo.flush()) {
        debug!("Failed to echo stream delta: {e}");
    }
}
