//! Scripted [`ChatBackend`] for tests.

use std::collections::VecDeque;
use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ChatBackend, ChatPrompt, LlmError};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stream: bool,
}

/// Replies with queued results in order; an exhausted queue yields
/// `EmptyContent`. Streaming calls echo the reply text.
#[derive(Debug, Default)]
pub struct FakeBackend {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeBackend {
    pub fn replying(replies: impl IntoIterator<Item = &'static str>) -> Self {
        let backend = Self::default();
        for reply in replies {
            backend.push(Ok(reply.to_string()));
        }
        backend
    }

    pub fn failing(error: LlmError) -> Self {
        let backend = Self::default();
        backend.push(Err(error));
        backend
    }

    pub fn push(&self, reply: Result<String, LlmError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for FakeBackend {
    async fn chat(
        &self,
        prompt: &ChatPrompt<'_>,
        echo: &mut (dyn Write + Send),
    ) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            system: prompt.system.to_string(),
            user: prompt.user.to_string(),
            temperature: prompt.temperature,
            max_tokens: prompt.max_tokens,
            stream: prompt.stream,
        });
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent));
        if let (true, Ok(text)) = (prompt.stream, &reply) {
            echo.write_all(text.as_bytes()).unwrap();
        }
        reply
    }
}
