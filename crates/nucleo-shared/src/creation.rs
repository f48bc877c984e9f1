//! Learner creations: art, chatbots, vision analyses and the like.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::NucleoError;

/// What kind of artifact a creation is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CreationKind {
    Art,
    Music,
    NeuralNetwork,
    Chatbot,
    Story,
    VisionAnalysis,
    GenerativeExploration,
}

impl CreationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreationKind::Art => "art",
            CreationKind::Music => "music",
            CreationKind::NeuralNetwork => "neural-network",
            CreationKind::Chatbot => "chatbot",
            CreationKind::Story => "story",
            CreationKind::VisionAnalysis => "vision-analysis",
            CreationKind::GenerativeExploration => "generative-exploration",
        }
    }
}

impl fmt::Display for CreationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CreationKind {
    type Err = NucleoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "art" => Ok(CreationKind::Art),
            "music" => Ok(CreationKind::Music),
            "neural-network" => Ok(CreationKind::NeuralNetwork),
            "chatbot" => Ok(CreationKind::Chatbot),
            "story" => Ok(CreationKind::Story),
            "vision-analysis" => Ok(CreationKind::VisionAnalysis),
            "generative-exploration" => Ok(CreationKind::GenerativeExploration),
            _ => Err(NucleoError::InvalidValue {
                field: "creation kind",
                value: s.to_string(),
            }),
        }
    }
}

/// A saved artifact of learner activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creation {
    pub id: Uuid,
    pub kind: CreationKind,
    pub title: String,
    pub description: String,
    /// Opaque payload owned by the producing module
    #[serde(default)]
    pub data: serde_json::Value,
    pub thumbnail: String,
    pub likes: u32,
    pub remixes: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_public: bool,
    #[serde(default)]
    pub collaborators: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Creation {
    pub fn new(kind: CreationKind, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kind,
            title: title.into(),
            description: String::new(),
            data: serde_json::Value::Null,
            thumbnail: String::new(),
            likes: 0,
            remixes: 0,
            tags: Vec::new(),
            is_public: false,
            collaborators: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = thumbnail.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn public(mut self) -> Self {
        self.is_public = true;
        self
    }

    /// Merge a patch and bump `updated_at`
    pub fn apply(&mut self, patch: &CreationPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(data) = &patch.data {
            self.data = data.clone();
        }
        if let Some(thumbnail) = &patch.thumbnail {
            self.thumbnail = thumbnail.clone();
        }
        if let Some(remixes) = patch.remixes {
            self.remixes = remixes;
        }
        if let Some(tags) = &patch.tags {
            self.tags = tags.clone();
        }
        if let Some(is_public) = patch.is_public {
            self.is_public = is_public;
        }
        if let Some(collaborators) = &patch.collaborators {
            self.collaborators = collaborators.clone();
        }
        self.updated_at = Utc::now();
    }
}

/// Partial update for a creation. Identity, kind, likes and creation time
/// are not patchable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreationPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub data: Option<serde_json::Value>,
    pub thumbnail: Option<String>,
    pub remixes: Option<u32>,
    pub tags: Option<Vec<String>>,
    pub is_public: Option<bool>,
    pub collaborators: Option<Vec<String>>,
}
