//! Collaboration session placeholder.
//!
//! There is no synchronization protocol behind this: the store only keeps
//! local bookkeeping of the session record and the connected peer ids.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    StudyGroup,
    CreativeLab,
    EthicsDebate,
    NeuralBuild,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Paused,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaborationSession {
    pub id: String,
    pub name: String,
    pub kind: SessionKind,
    /// Participant ids
    pub participants: Vec<String>,
    pub max_participants: u32,
    pub current_module: String,
    pub is_public: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub status: SessionStatus,
    /// Opaque state shared between participants
    #[serde(default)]
    pub shared_state: serde_json::Value,
}

impl CollaborationSession {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: SessionKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            participants: Vec::new(),
            max_participants: 4,
            current_module: String::new(),
            is_public: false,
            created_by: String::new(),
            created_at: Utc::now(),
            status: SessionStatus::Active,
            shared_state: serde_json::Value::Null,
        }
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() as u32 >= self.max_participants
    }
}
