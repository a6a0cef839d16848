//! Generation pipeline — assemble prompts, call the model, hand back text.
//!
//! Flow: request → phase assembler (reference store + selectors) →
//!       ChatBackend → raw text. Extraction is left to the caller, which
//!       decides how to present an unstructured reply.

use std::io::Write;

use tracing::info;

use crate::llm_client::{ChatBackend, ChatPrompt, LlmError};
use crate::references::ReferenceStore;

use super::project::GenerationRequest;
use super::{revision, seedance, storyboard};

pub const MAX_TOKENS: u32 = 8192;

/// One model call of the director workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Storyboard,
    Prompt,
    Revision,
}

impl Phase {
    /// Bridge `mode` value. Revision is reachable only from the CLI.
    pub fn from_mode(mode: &str) -> Option<Self> {
        match mode {
            "storyboard" => Some(Phase::Storyboard),
            "prompt" => Some(Phase::Prompt),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Storyboard => "storyboard",
            Phase::Prompt => "prompt",
            Phase::Revision => "revision",
        }
    }

    pub fn temperature(self) -> f32 {
        match self {
            Phase::Storyboard | Phase::Revision => 0.7,
            Phase::Prompt => 0.5,
        }
    }
}

/// A ready-to-send system + user pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPrompt {
    pub phase: Phase,
    pub system: String,
    pub user: String,
}

impl AssembledPrompt {
    pub fn chat_prompt(&self, stream: bool) -> ChatPrompt<'_> {
        ChatPrompt {
            system: &self.system,
            user: &self.user,
            temperature: self.phase.temperature(),
            max_tokens: MAX_TOKENS,
            stream,
        }
    }

    fn log_sizes(&self) {
        info!(
            phase = self.phase.as_str(),
            system_chars = self.system.chars().count(),
            user_chars = self.user.chars().count(),
            "Assembled prompt"
        );
    }
}

pub fn assemble_storyboard(store: &ReferenceStore, request: &GenerationRequest) -> AssembledPrompt {
    let prompt = AssembledPrompt {
        phase: Phase::Storyboard,
        system: storyboard::build_system_prompt(store, &request.project),
        user: storyboard::build_user_message(request),
    };
    prompt.log_sizes();
    prompt
}

pub fn assemble_prompt(store: &ReferenceStore, request: &GenerationRequest) -> AssembledPrompt {
    let prompt = AssembledPrompt {
        phase: Phase::Prompt,
        system: seedance::build_system_prompt(store, &request.project),
        user: seedance::build_user_message(request),
    };
    prompt.log_sizes();
    prompt
}

pub fn assemble_revision(
    store: &ReferenceStore,
    request: &GenerationRequest,
    feedback: &str,
) -> AssembledPrompt {
    let prompt = AssembledPrompt {
        phase: Phase::Revision,
        system: revision::build_system_prompt(store),
        user: revision::build_user_message(request, feedback),
    };
    prompt.log_sizes();
    prompt
}

/// Sends one prompt. Streamed deltas go to `echo`.
pub async fn run(
    backend: &dyn ChatBackend,
    prompt: &AssembledPrompt,
    stream: bool,
    echo: &mut (dyn Write + Send),
) -> Result<String, LlmError> {
    info!(phase = prompt.phase.as_str(), stream, "Calling chat backend");
    let text = backend.chat(&prompt.chat_prompt(stream), echo).await?;
    info!(
        phase = prompt.phase.as_str(),
        response_chars = text.chars().count(),
        "Model reply received"
    );
    Ok(text)
}
