//! Learner profile, avatar and preferences.
//!
//! The profile is created once with placeholder values and then mutated
//! only through the store. Partial updates go through the typed patch
//! structs below so a caller can never clobber a nested record by accident.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Starting neurotoken balance for a fresh profile
pub const STARTING_NEUROTOKENS: u64 = 100;

/// Display titles by level: 1, 2, 3, then 4 and above
pub const LEVEL_TITLES: [&str; 4] = [
    "Explorador de IA",
    "Aprendiz Colaborativo",
    "Creador Consciente",
    "Guardián de la Inteligencia",
];

/// Map a profile level to its display title.
pub fn level_title(level: u32) -> &'static str {
    match level {
        0 | 1 => LEVEL_TITLES[0],
        2 => LEVEL_TITLES[1],
        3 => LEVEL_TITLES[2],
        _ => LEVEL_TITLES[3],
    }
}

/// Identity and cumulative stats for the single local learner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub avatar: Avatar,
    /// Derived from completed modules: floor(completed / 2) + 1
    pub level: u32,
    /// Currency balance
    pub neurotokens: u64,
    pub total_score: u64,
    pub collaboration_score: u64,
    pub creativity_score: u64,
    pub ethics_score: u64,
    pub social_impact_points: i64,
    pub joined_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub preferences: UserPreferences,
}

impl Default for UserProfile {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            avatar: Avatar::default(),
            level: 1,
            neurotokens: STARTING_NEUROTOKENS,
            total_score: 0,
            collaboration_score: 0,
            creativity_score: 0,
            ethics_score: 0,
            social_impact_points: 0,
            joined_at: now,
            last_active: now,
            preferences: UserPreferences::default(),
        }
    }
}

impl UserProfile {
    /// Display title for the current level
    pub fn level_title(&self) -> &'static str {
        level_title(self.level)
    }

    /// Merge a patch and refresh the last-active timestamp
    pub fn apply(&mut self, patch: ProfilePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(score) = patch.collaboration_score {
            self.collaboration_score = score;
        }
        if let Some(points) = patch.social_impact_points {
            self.social_impact_points = points;
        }
        self.last_active = Utc::now();
    }
}

/// Partial update for the profile's directly editable fields.
///
/// Level, balance and the accumulated scores only change through store
/// operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub collaboration_score: Option<u64>,
    pub social_impact_points: Option<i64>,
}

impl ProfilePatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

/// Cosmetic avatar description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    pub skin: String,
    pub hair: String,
    pub eyes: String,
    pub clothing: String,
    #[serde(default)]
    pub accessories: Vec<String>,
    #[serde(default)]
    pub cultural_elements: Vec<String>,
    #[serde(default)]
    pub accessibility_features: Vec<String>,
    /// Mood name -> expression asset
    #[serde(default)]
    pub expressions: BTreeMap<String, String>,
}

impl Default for Avatar {
    fn default() -> Self {
        let expressions = [
            ("default", "friendly"),
            ("happy", "bright-smile"),
            ("focused", "concentrated"),
            ("surprised", "wide-eyes"),
            ("thoughtful", "chin-rest"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            skin: "medium".to_string(),
            hair: "curly-black".to_string(),
            eyes: "brown".to_string(),
            clothing: "casual-modern".to_string(),
            accessories: Vec::new(),
            cultural_elements: vec!["colombia-flag-pin".to_string()],
            accessibility_features: Vec::new(),
            expressions,
        }
    }
}

impl Avatar {
    pub fn apply(&mut self, patch: AvatarPatch) {
        if let Some(skin) = patch.skin {
            self.skin = skin;
        }
        if let Some(hair) = patch.hair {
            self.hair = hair;
        }
        if let Some(eyes) = patch.eyes {
            self.eyes = eyes;
        }
        if let Some(clothing) = patch.clothing {
            self.clothing = clothing;
        }
        if let Some(accessories) = patch.accessories {
            self.accessories = accessories;
        }
        if let Some(elements) = patch.cultural_elements {
            self.cultural_elements = elements;
        }
        if let Some(features) = patch.accessibility_features {
            self.accessibility_features = features;
        }
        // Expressions merge per mood rather than replacing the map
        if let Some(expressions) = patch.expressions {
            self.expressions.extend(expressions);
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvatarPatch {
    pub skin: Option<String>,
    pub hair: Option<String>,
    pub eyes: Option<String>,
    pub clothing: Option<String>,
    pub accessories: Option<Vec<String>>,
    pub cultural_elements: Option<Vec<String>>,
    pub accessibility_features: Option<Vec<String>>,
    pub expressions: Option<BTreeMap<String, String>>,
}

/// Narration locale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NarrationLanguage {
    #[serde(rename = "es-CO")]
    EsCo,
    #[serde(rename = "es-ES")]
    EsEs,
    #[serde(rename = "es-MX")]
    EsMx,
}

/// Who may see and join the learner's work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollaborationMode {
    Open,
    Friends,
    Private,
}

/// Audio, accessibility and collaboration-visibility settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub audio_enabled: bool,
    /// 0.0 - 1.0
    pub audio_volume: f32,
    pub narration_enabled: bool,
    pub narration_language: NarrationLanguage,
    /// 0.5 - 2.0
    pub voice_speed: f32,
    pub accessibility_mode: bool,
    pub high_contrast_mode: bool,
    pub reduced_motion: bool,
    pub subtitles_enabled: bool,
    pub collaboration_mode: CollaborationMode,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            audio_enabled: true,
            audio_volume: 0.7,
            narration_enabled: true,
            narration_language: NarrationLanguage::EsCo,
            voice_speed: 1.0,
            accessibility_mode: false,
            high_contrast_mode: false,
            reduced_motion: false,
            subtitles_enabled: false,
            collaboration_mode: CollaborationMode::Open,
        }
    }
}

impl UserPreferences {
    /// Merge a patch. Out-of-range numbers are clamped, never rejected.
    pub fn apply(&mut self, patch: PreferencesPatch) {
        if let Some(v) = patch.audio_enabled {
            self.audio_enabled = v;
        }
        if let Some(v) = patch.audio_volume {
            self.audio_volume = v.clamp(0.0, 1.0);
        }
        if let Some(v) = patch.narration_enabled {
            self.narration_enabled = v;
        }
        if let Some(v) = patch.narration_language {
            self.narration_language = v;
        }
        if let Some(v) = patch.voice_speed {
            self.voice_speed = v.clamp(0.5, 2.0);
        }
        if let Some(v) = patch.accessibility_mode {
            self.accessibility_mode = v;
        }
        if let Some(v) = patch.high_contrast_mode {
            self.high_contrast_mode = v;
        }
        if let Some(v) = patch.reduced_motion {
            self.reduced_motion = v;
        }
        if let Some(v) = patch.subtitles_enabled {
            self.subtitles_enabled = v;
        }
        if let Some(v) = patch.collaboration_mode {
            self.collaboration_mode = v;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferencesPatch {
    pub audio_enabled: Option<bool>,
    pub audio_volume: Option<f32>,
    pub narration_enabled: Option<bool>,
    pub narration_language: Option<NarrationLanguage>,
    pub voice_speed: Option<f32>,
    pub accessibility_mode: Option<bool>,
    pub high_contrast_mode: Option<bool>,
    pub reduced_motion: Option<bool>,
    pub subtitles_enabled: Option<bool>,
    pub collaboration_mode: Option<CollaborationMode>,
}
