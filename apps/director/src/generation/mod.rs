// Generation: storyboard, Seedance prompt and revision prompts, plus
// recovery of structured JSON from the model's reply.
// All LLM calls go through llm_client; reference text comes from the
// reference store via the selection module.

pub mod extractor;
pub mod message;
pub mod pipeline;
pub mod project;
pub mod prompts;
pub mod revision;
pub mod seedance;
pub mod storyboard;

pub use extractor::{extract_structured, Extraction};
pub use pipeline::{AssembledPrompt, Phase};
pub use project::{Asset, GenerationRequest, Project};
