use crate::references::{ReferenceDoc, ReferenceStore};
use crate::selection::keywords::SCENE_TEMPLATE_KEYWORDS;
use crate::selection::sections::{
    select_examples, select_multi_template, select_narrative_structure, select_section,
    select_single_template, select_split_rules, select_vocabulary, STORYBOARD_VOCABULARY,
};
use crate::selection::{parse_duration_seconds, SegmentPlan};

use super::message::{FieldSet, PromptBuilder, UserMessage};
use super::project::{GenerationRequest, Project};
use super::prompts;

/// Examples document for a duration tier.
pub fn examples_for(plan: SegmentPlan) -> ReferenceDoc {
    if plan.is_single() {
        ReferenceDoc::SingleExamples
    } else {
        ReferenceDoc::MultiExamples
    }
}

/// Storyboard system prompt. Block order is fixed: later blocks clarify
/// the reference material before them.
pub fn build_system_prompt(store: &ReferenceStore, project: &Project) -> String {
    let plan = SegmentPlan::for_seconds(parse_duration_seconds(project.duration_text()));
    let scene_type = project.scene_type_text();

    let vocabulary = select_vocabulary(&store.load(ReferenceDoc::Vocabulary), STORYBOARD_VOCABULARY);
    let template = if plan.is_single() {
        select_single_template(&store.load(ReferenceDoc::SingleVideoTemplates), scene_type)
    } else {
        select_multi_template(&store.load(ReferenceDoc::MultiSegmentTemplates), plan)
    };
    let scene_template = select_section(
        &store.load(ReferenceDoc::SceneTemplates),
        2,
        SCENE_TEMPLATE_KEYWORDS,
        scene_type,
    );
    let narrative = select_narrative_structure(
        &store.load(ReferenceDoc::NarrativeStructures),
        project.narrative_text(),
    );
    let split_rules = if plan.is_single() {
        String::new()
    } else {
        select_split_rules(&store.load(ReferenceDoc::MultiSegmentTemplates))
    };
    let examples = select_examples(&store.load(examples_for(plan)));

    PromptBuilder::new(prompts::STORYBOARD_ROLE)
        .section(prompts::STORYBOARD_VOCABULARY_HEADING, &vocabulary)
        .section(prompts::TEMPLATE_HEADING, &template)
        .section(prompts::SCENE_TEMPLATE_HEADING, &scene_template)
        .section(prompts::NARRATIVE_HEADING, &narrative)
        .section(prompts::SPLIT_RULES_HEADING, &split_rules)
        .section(prompts::STORYBOARD_EXAMPLES_HEADING, &examples)
        .block(&prompts::storyboard_output_format(plan.is_single()))
        .block(&prompts::storyboard_key_rules())
        .build()
}

pub fn build_user_message(request: &GenerationRequest) -> String {
    UserMessage::new(prompts::STORYBOARD_REQUEST_HEADER)
        .project(&request.project, FieldSet::Full)
        .assets(&request.assets)
        .note("额外要求", request.user_notes.as_deref())
        .build()
}
