//! The full state tree owned by the progress store.

use crate::achievements::Achievement;
use crate::collaboration::CollaborationSession;
use crate::content::{EthicsCase, ImpactProject};
use crate::creation::Creation;
use crate::curriculum::{initial_modules, ModuleProgress};
use crate::profile::UserProfile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BACKGROUND_MUSIC: &str = "ambient";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub user_profile: UserProfile,

    /// Index into `module_progress` of the module being played
    pub current_module: usize,
    /// Fixed at six entries, in curriculum order
    pub module_progress: Vec<ModuleProgress>,
    /// Global badge list, one entry per id
    pub achievements: Vec<Achievement>,

    pub game_started: bool,
    pub game_completed: bool,
    pub start_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub collaboration_session: Option<CollaborationSession>,
    #[serde(default)]
    pub is_collaborating: bool,
    #[serde(default)]
    pub connected_peers: Vec<String>,

    #[serde(default)]
    pub community_creations: Vec<Creation>,
    #[serde(default)]
    pub followed_users: Vec<String>,

    #[serde(default)]
    pub current_narration: Option<String>,
    #[serde(default)]
    pub is_narrating: bool,
    pub background_music: String,

    #[serde(default)]
    pub impact_projects: Vec<ImpactProject>,
    #[serde(default)]
    pub ethics_cases: Vec<EthicsCase>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            user_profile: UserProfile::default(),
            current_module: 0,
            module_progress: initial_modules(),
            achievements: Vec::new(),
            game_started: false,
            game_completed: false,
            start_time: None,
            collaboration_session: None,
            is_collaborating: false,
            connected_peers: Vec::new(),
            community_creations: Vec::new(),
            followed_users: Vec::new(),
            current_narration: None,
            is_narrating: false,
            background_music: DEFAULT_BACKGROUND_MUSIC.to_string(),
            impact_projects: Vec::new(),
            ethics_cases: Vec::new(),
        }
    }
}

impl GameState {
    /// Fresh state that keeps only the learner's display name
    pub fn fresh_for(name: impl Into<String>) -> Self {
        let mut state = Self::default();
        state.user_profile.name = name.into();
        state
    }

    pub fn completed_modules(&self) -> usize {
        self.module_progress.iter().filter(|m| m.completed).count()
    }

    pub fn all_modules_completed(&self) -> bool {
        !self.module_progress.is_empty() && self.module_progress.iter().all(|m| m.completed)
    }

    pub fn find_module(&self, id: &str) -> Option<&ModuleProgress> {
        self.module_progress.iter().find(|m| m.id == id)
    }

    pub fn all_creations(&self) -> impl Iterator<Item = &Creation> {
        self.module_progress.iter().flat_map(|m| m.creations.iter())
    }

    pub fn all_decisions(&self) -> impl Iterator<Item = &crate::decisions::EthicalDecision> {
        self.module_progress.iter().flat_map(|m| m.decisions.iter())
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a.id == id)
    }
}
