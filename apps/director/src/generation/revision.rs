use crate::references::{ReferenceDoc, ReferenceStore};
use crate::selection::sections::{select_vocabulary, STORYBOARD_VOCABULARY};

use super::message::{FieldSet, PromptBuilder, UserMessage};
use super::project::GenerationRequest;
use super::prompts;

/// Revision system prompt: the role plus shot vocabulary only.
pub fn build_system_prompt(store: &ReferenceStore) -> String {
    let vocabulary = select_vocabulary(&store.load(ReferenceDoc::Vocabulary), STORYBOARD_VOCABULARY);
    PromptBuilder::new(prompts::REVISION_ROLE)
        .section(prompts::REVISION_VOCABULARY_HEADING, &vocabulary)
        .build()
}

/// `request.storyboard` is the draft being revised.
pub fn build_user_message(request: &GenerationRequest, feedback: &str) -> String {
    UserMessage::new(prompts::REVISION_REQUEST_HEADER)
        .project(&request.project, FieldSet::Full)
        .assets(&request.assets)
        .block("当前分镜脚本", request.storyboard.as_deref())
        .block("修改意见", Some(feedback))
        .line("")
        .line(prompts::REVISION_CLOSING)
        .build()
}
