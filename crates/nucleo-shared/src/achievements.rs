//! Achievement badges and the rarity reward table.
//!
//! Modules report achievement ids when they finish; the global badge list
//! holds full `Achievement` records, each unlocked at most once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rarity tier, which decides the neurotoken reward on unlock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Neurotokens credited when an achievement of this tier is unlocked
    pub const fn reward(self) -> u64 {
        match self {
            Rarity::Common => 25,
            Rarity::Rare => 50,
            Rarity::Epic => 100,
            Rarity::Legendary => 250,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    Technical,
    Creative,
    Collaborative,
    Ethical,
    Local,
}

/// An unlocked badge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: AchievementCategory,
    pub rarity: Rarity,
    pub unlocked_at: DateTime<Utc>,
    #[serde(default)]
    pub progress: Option<u32>,
    #[serde(default)]
    pub max_progress: Option<u32>,
}

impl Achievement {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: AchievementCategory,
        rarity: Rarity,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            icon: "🏆".to_string(),
            category,
            rarity,
            unlocked_at: Utc::now(),
            progress: None,
            max_progress: None,
        }
    }
}

/// Static description of a badge modules can award
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: AchievementCategory,
    pub rarity: Rarity,
}

impl BadgeSpec {
    const fn new(
        id: &'static str,
        name: &'static str,
        description: &'static str,
        icon: &'static str,
        category: AchievementCategory,
        rarity: Rarity,
    ) -> Self {
        Self { id, name, description, icon, category, rarity }
    }

    /// Stamp an unlocked record from this spec
    pub fn unlock(&self) -> Achievement {
        Achievement {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            icon: self.icon.to_string(),
            category: self.category,
            rarity: self.rarity,
            unlocked_at: Utc::now(),
            progress: None,
            max_progress: None,
        }
    }
}

use AchievementCategory::*;
use Rarity::*;

/// Every badge the course modules award
pub const BADGES: &[BadgeSpec] = &[
    // Fundamentals
    BadgeSpec::new("high-accuracy-trainer", "Entrenador Preciso", "Train a model above 80% accuracy", "🎯", Technical, Common),
    BadgeSpec::new("simulation-master", "Maestro de Simulación", "Run two or more training simulations", "⚡", Technical, Rare),
    BadgeSpec::new("fundamentals-expert", "Experto en Fundamentos", "Score above 200 in fundamentals", "🧠", Technical, Rare),
    // Conversational
    BadgeSpec::new("conversational-expert", "Experto Conversacional", "Exchange five or more chatbot messages", "💬", Technical, Common),
    BadgeSpec::new("positive-communicator", "Comunicador Positivo", "Keep a conversation mostly positive", "😊", Collaborative, Common),
    // Computer vision
    BadgeSpec::new("object-detector", "Detector de Objetos", "Run the object detector", "🔍", Technical, Common),
    BadgeSpec::new("vision-expert", "Experto en Visión", "Detect objects in an image", "👁️", Technical, Rare),
    BadgeSpec::new("filter-artist", "Artista de Filtros", "Apply an image filter", "🖌️", Creative, Common),
    // Generative
    BadgeSpec::new("digital-artist", "Artista Digital", "Generate algorithmic art", "🎨", Creative, Common),
    BadgeSpec::new("text-generator", "Generador de Texto", "Generate text", "✍️", Creative, Common),
    BadgeSpec::new("prolific-creator", "Creador Prolífico", "Save two or more creations", "🌟", Creative, Epic),
    BadgeSpec::new("generative-artist", "Artista Generativo", "Finish with a generated artwork", "🖼️", Creative, Rare),
    // Neural networks
    BadgeSpec::new("neural-architect", "Arquitecto Neuronal", "Build a network architecture", "🕸️", Technical, Rare),
    BadgeSpec::new("neural-networks-master", "Maestro de Redes", "Finish the neural networks module", "🏗️", Technical, Epic),
    // Ethics
    BadgeSpec::new("ethical-decision-maker", "Decisor Ético", "Decide an ethics case", "⚖️", Ethical, Common),
    BadgeSpec::new("global-ethics-expert", "Experto en Ética Global", "Finish the ethics module", "🌍", Ethical, Epic),
    // Course
    BadgeSpec::new("course-graduate", "Guardián Graduado", "Complete every module", "🎓", Local, Legendary),
];

/// Look up a badge by id
pub fn badge(id: &str) -> Option<&'static BadgeSpec> {
    BADGES.iter().find(|b| b.id == id)
}

/// Format a single achievement for notification
pub fn format_achievement_unlock(ach: &Achievement) -> String {
    format!(
        "{} Achievement unlocked: {} - {} (+{} neurotokens)",
        ach.icon,
        ach.name,
        ach.description,
        ach.rarity.reward()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_table() {
        assert_eq!(Rarity::Common.reward(), 25);
        assert_eq!(Rarity::Rare.reward(), 50);
        assert_eq!(Rarity::Epic.reward(), 100);
        assert_eq!(Rarity::Legendary.reward(), 250);
    }

    #[test]
    fn test_badge_ids_unique() {
        let mut ids: Vec<_> = BADGES.iter().map(|b| b.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), BADGES.len());
    }

    #[test]
    fn test_badge_lookup() {
        let spec = badge("high-accuracy-trainer").unwrap();
        let ach = spec.unlock();
        assert_eq!(ach.id, "high-accuracy-trainer");
        assert_eq!(ach.rarity, Rarity::Common);
        assert!(badge("nope").is_none());
    }

    #[test]
    fn test_format_unlock() {
        let ach = badge("course-graduate").unwrap().unlock();
        let line = format_achievement_unlock(&ach);
        assert!(line.contains("Guardián Graduado"));
        assert!(line.contains("+250"));
    }
}
