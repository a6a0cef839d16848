use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use super::document::Document;

/// The static reference documents the prompt assemblers draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceDoc {
    Vocabulary,
    NarrativeStructures,
    SceneStrategies,
    PlatformCapabilities,
    SingleVideoTemplates,
    MultiSegmentTemplates,
    SceneTemplates,
    SingleExamples,
    MultiExamples,
}

impl ReferenceDoc {
    pub fn relative_path(self) -> &'static str {
        match self {
            ReferenceDoc::Vocabulary => "references/vocabulary.md",
            ReferenceDoc::NarrativeStructures => "references/narrative-structures.md",
            ReferenceDoc::SceneStrategies => "references/scene-strategies.md",
            ReferenceDoc::PlatformCapabilities => "references/platform-capabilities.md",
            ReferenceDoc::SingleVideoTemplates => "templates/single-video.md",
            ReferenceDoc::MultiSegmentTemplates => "templates/multi-segment.md",
            ReferenceDoc::SceneTemplates => "templates/scene-templates.md",
            ReferenceDoc::SingleExamples => "examples/single-examples.md",
            ReferenceDoc::MultiExamples => "examples/multi-examples.md",
        }
    }
}

/// Loads reference documents from a skill directory, tokenizing each at most
/// once per process.
///
/// A missing or unreadable document is an empty [`Document`], never an
/// error: the assembled prompt omits that block.
#[derive(Debug)]
pub struct ReferenceStore {
    root: PathBuf,
    cache: Mutex<HashMap<ReferenceDoc, Arc<Document>>>,
}

impl ReferenceStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn load(&self, doc: ReferenceDoc) -> Arc<Document> {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache
            .entry(doc)
            .or_insert_with(|| {
                let parsed = self
                    .read(doc.relative_path())
                    .map(Document::parse)
                    .unwrap_or_else(Document::empty);
                if parsed.is_empty() {
                    debug!("{} is empty; its block is omitted", doc.relative_path());
                } else {
                    debug!(
                        sections = parsed.sections().len(),
                        "Parsed {}",
                        doc.relative_path()
                    );
                }
                Arc::new(parsed)
            })
            .clone()
    }

    /// Reads any file under the skill directory; `None` when absent.
    pub fn read(&self, relative: &str) -> Option<String> {
        let path = self.root.join(relative);
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                debug!("Loaded reference {} ({} bytes)", path.display(), text.len());
                Some(text)
            }
            Err(e) => {
                warn!("Reference {} unavailable: {e}", path.display());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::bundled_skill_dir;

    #[test]
    fn test_missing_document_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReferenceStore::new(dir.path());
        assert!(store.load(ReferenceDoc::Vocabulary).is_empty());
        assert!(store.read("templates/output.html").is_none());
    }

    #[test]
    fn test_document_cached_after_first_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("references")).unwrap();
        let path = dir.path().join("references/vocabulary.md");
        std::fs::write(&path, "## 一、景别\n\n远景\n").unwrap();

        let store = ReferenceStore::new(dir.path());
        let first = store.load(ReferenceDoc::Vocabulary);
        std::fs::write(&path, "## 一、改过了\n").unwrap();
        let second = store.load(ReferenceDoc::Vocabulary);

        assert!(Arc::ptr_eq(&first, &second));
        assert!(second.raw().contains("远景"));
    }

    #[test]
    fn test_every_bundled_document_present() {
        let store = ReferenceStore::new(bundled_skill_dir());
        for doc in [
            ReferenceDoc::Vocabulary,
            ReferenceDoc::NarrativeStructures,
            ReferenceDoc::SceneStrategies,
            ReferenceDoc::PlatformCapabilities,
            ReferenceDoc::SingleVideoTemplates,
            ReferenceDoc::MultiSegmentTemplates,
            ReferenceDoc::SceneTemplates,
            ReferenceDoc::SingleExamples,
            ReferenceDoc::MultiExamples,
        ] {
            assert!(!store.load(doc).is_empty(), "{} is missing", doc.relative_path());
        }
    }
}
