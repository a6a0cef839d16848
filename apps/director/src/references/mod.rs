// Reference store: the static markdown knowledge injected into prompts.

pub mod document;
pub mod store;

pub use document::{Document, Section};
pub use store::{ReferenceDoc, ReferenceStore};
