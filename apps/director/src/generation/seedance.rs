use crate::references::{ReferenceDoc, ReferenceStore};
use crate::selection::keywords::SCENE_STRATEGY_KEYWORDS;
use crate::selection::sections::{select_examples, select_section, select_vocabulary, PROMPT_VOCABULARY};
use crate::selection::{parse_duration_seconds, SegmentPlan};

use super::message::{FieldSet, PromptBuilder, UserMessage};
use super::project::{GenerationRequest, Project};
use super::prompts;
use super::storyboard::examples_for;

/// Seedance prompt-phase system prompt.
pub fn build_system_prompt(store: &ReferenceStore, project: &Project) -> String {
    let plan = SegmentPlan::for_seconds(parse_duration_seconds(project.duration_text()));

    let platform = store.load(ReferenceDoc::PlatformCapabilities);
    let vocabulary = select_vocabulary(&store.load(ReferenceDoc::Vocabulary), PROMPT_VOCABULARY);
    let strategy = select_section(
        &store.load(ReferenceDoc::SceneStrategies),
        3,
        SCENE_STRATEGY_KEYWORDS,
        project.scene_type_text(),
    );
    let examples = select_examples(&store.load(examples_for(plan)));

    PromptBuilder::new(prompts::SEEDANCE_ROLE)
        .section(prompts::PLATFORM_HEADING, platform.raw())
        .section(prompts::SEEDANCE_VOCABULARY_HEADING, &vocabulary)
        .section(prompts::SCENE_STRATEGY_HEADING, &strategy)
        .section(prompts::SEEDANCE_EXAMPLES_HEADING, &examples)
        .block(&prompts::six_section_format())
        .block(prompts::OPERATION_GUIDE)
        .block(prompts::TEXTURE_FEEL_TABLE)
        .block(&prompts::seedance_output_format())
        .block(&prompts::seedance_key_rules())
        .build()
}

pub fn build_user_message(request: &GenerationRequest) -> String {
    UserMessage::new(prompts::SEEDANCE_REQUEST_HEADER)
        .project(&request.project, FieldSet::WithoutTopic)
        .assets(&request.assets)
        .block("分镜脚本", request.storyboard.as_deref())
        .note("额外要求", request.user_notes.as_deref())
        .build()
}
