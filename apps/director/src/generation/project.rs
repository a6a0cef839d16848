//! Caller-supplied project description. Every field is free text matched
//! heuristically downstream; nothing is validated against an enum.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// e.g. "15秒", "1分钟".
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub narrative_structure: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub scene_type: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub sound_requirements: Option<String>,
    /// 质感取向, e.g. "真实生活感" vs "精致制作感".
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub texture_feel: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub target_platform: Option<String>,
}

impl Project {
    pub fn duration_text(&self) -> &str {
        self.duration.as_deref().unwrap_or("15秒")
    }

    pub fn scene_type_text(&self) -> &str {
        self.scene_type.as_deref().unwrap_or("")
    }

    pub fn narrative_text(&self) -> &str {
        self.narrative_structure.as_deref().unwrap_or("")
    }

    /// Fills every unset field of `self` from `other`.
    pub fn or(self, other: Project) -> Project {
        Project {
            title: self.title.or(other.title),
            topic: self.topic.or(other.topic),
            duration: self.duration.or(other.duration),
            aspect_ratio: self.aspect_ratio.or(other.aspect_ratio),
            style: self.style.or(other.style),
            narrative_structure: self.narrative_structure.or(other.narrative_structure),
            scene_type: self.scene_type.or(other.scene_type),
            sound_requirements: self.sound_requirements.or(other.sound_requirements),
            texture_feel: self.texture_feel.or(other.texture_feel),
            target_platform: self.target_platform.or(other.target_platform),
        }
    }
}

/// Reference material listed in prompts as `@图片N`. Never checked against
/// real files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Asset {
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    /// character / scene / keyframe
    #[serde(rename = "type", deserialize_with = "lenient_text")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub description: Option<String>,
}

impl Asset {
    /// Parses the CLI form `name|type|description`; missing parts stay unset.
    pub fn from_spec(spec: &str) -> Self {
        let mut parts = spec.splitn(3, '|').map(|p| p.trim()).map(|p| {
            (!p.is_empty()).then(|| p.to_string())
        });
        Asset {
            name: parts.next().flatten(),
            kind: parts.next().flatten(),
            description: parts.next().flatten(),
        }
    }
}

/// Everything one generation call is assembled from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationRequest {
    pub project: Project,
    pub assets: Vec<Asset>,
    #[serde(deserialize_with = "lenient_text")]
    pub user_notes: Option<String>,
    /// Storyboard text the prompt phase converts.
    #[serde(deserialize_with = "lenient_text")]
    pub storyboard: Option<String>,
}

impl GenerationRequest {
    pub fn new(project: Project) -> Self {
        Self {
            project,
            ..Self::default()
        }
    }
}

/// Accepts any JSON value: null stays unset, strings pass through, other
/// values keep their JSON text.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}
