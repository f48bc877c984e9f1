//! The fixed six-module curriculum and per-module progress.

use crate::creation::Creation;
use crate::decisions::EthicalDecision;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// Progress through one curriculum module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleProgress {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub difficulty: Difficulty,
    /// Estimated duration in minutes
    pub estimated_minutes: u32,
    pub completed: bool,
    /// Best score so far, never above `max_score`
    pub score: u32,
    pub max_score: u32,
    /// Cumulative time spent, in seconds
    pub time_spent_secs: u64,
    /// Achievement ids unlocked in this module, no duplicates
    pub achievements: Vec<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub collaborative_session: Option<String>,
    #[serde(default)]
    pub creations: Vec<Creation>,
    #[serde(default)]
    pub decisions: Vec<EthicalDecision>,
}

impl ModuleProgress {
    fn fresh(
        id: &str,
        name: &str,
        description: &str,
        icon: &str,
        difficulty: Difficulty,
        estimated_minutes: u32,
        max_score: u32,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            difficulty,
            estimated_minutes,
            completed: false,
            score: 0,
            max_score,
            time_spent_secs: 0,
            achievements: Vec::new(),
            started_at: None,
            completed_at: None,
            collaborative_session: None,
            creations: Vec::new(),
            decisions: Vec::new(),
        }
    }

    /// Record an attempt score. Keeps the best result, capped at `max_score`.
    pub fn record_score(&mut self, score: u32) {
        self.score = self.score.max(score.min(self.max_score));
    }

    /// Union new achievement ids into the module list, keeping first-seen order
    pub fn merge_achievements<'a>(&mut self, ids: impl IntoIterator<Item = &'a String>) {
        for id in ids {
            if !self.achievements.contains(id) {
                self.achievements.push(id.clone());
            }
        }
    }
}

/// What a module reports when the learner finishes one attempt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleOutcome {
    pub score: u32,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub creations: Vec<Creation>,
    #[serde(default)]
    pub decisions: Vec<EthicalDecision>,
}

impl ModuleOutcome {
    pub fn scored(score: u32) -> Self {
        Self {
            score,
            ..Default::default()
        }
    }

    pub fn with_achievements<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.achievements.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn with_creations(mut self, creations: impl IntoIterator<Item = Creation>) -> Self {
        self.creations.extend(creations);
        self
    }

    pub fn with_decisions(mut self, decisions: impl IntoIterator<Item = EthicalDecision>) -> Self {
        self.decisions.extend(decisions);
        self
    }

    /// Neurotokens this outcome is worth: score/10 + 50 per achievement
    /// + 25 per creation
    pub fn neurotoken_reward(&self) -> u64 {
        u64::from(self.score / 10)
            + 50 * self.achievements.len() as u64
            + 25 * self.creations.len() as u64
    }
}

/// Module ids in curriculum order
pub const MODULE_IDS: [&str; 6] = [
    "fundamentals",
    "conversational",
    "computer-vision",
    "generative",
    "neural-networks",
    "ethics",
];

/// The curriculum as it looks before the learner has done anything
pub fn initial_modules() -> Vec<ModuleProgress> {
    vec![
        ModuleProgress::fresh(
            "fundamentals",
            "Fundamentos de IA Interactivos",
            "Laboratorio completo de tipos de IA con simulaciones reales",
            "🧠",
            Difficulty::Beginner,
            25,
            500,
        ),
        ModuleProgress::fresh(
            "conversational",
            "IA Conversacional Avanzada",
            "Constructor de chatbots y simulador NLP real",
            "💬",
            Difficulty::Intermediate,
            30,
            600,
        ),
        ModuleProgress::fresh(
            "computer-vision",
            "Visión por Computadora Creativa",
            "Detector de objetos real y analizador de arte",
            "👁️",
            Difficulty::Intermediate,
            30,
            600,
        ),
        ModuleProgress::fresh(
            "generative",
            "IA Generativa Multimodal",
            "Estudio completo con 8 algoritmos generativos",
            "🎨",
            Difficulty::Advanced,
            35,
            700,
        ),
        ModuleProgress::fresh(
            "neural-networks",
            "Redes Neuronales 3D",
            "Constructor inmersivo con arquitecturas famosas",
            "🕸️",
            Difficulty::Advanced,
            30,
            600,
        ),
        ModuleProgress::fresh(
            "ethics",
            "Ética IA - Casos Reales Medellín",
            "Simulador de decisiones urbanas y debates colaborativos",
            "⚖️",
            Difficulty::Advanced,
            25,
            500,
        ),
    ]
}
