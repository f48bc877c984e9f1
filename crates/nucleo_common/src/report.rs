//! End-of-course summary.

use crate::store::ProgressStore;
use nucleo_shared::DecisionStats;
use serde::Serialize;
use std::fmt;

/// Bucket for the summed module scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    Completed,
    Good,
    VeryGood,
    Excellent,
}

impl PerformanceTier {
    pub fn for_score(total: u64) -> Self {
        match total {
            t if t >= 1000 => PerformanceTier::Excellent,
            t if t >= 800 => PerformanceTier::VeryGood,
            t if t >= 600 => PerformanceTier::Good,
            _ => PerformanceTier::Completed,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PerformanceTier::Excellent => "Excelente",
            PerformanceTier::VeryGood => "Muy Bueno",
            PerformanceTier::Good => "Bueno",
            PerformanceTier::Completed => "Completado",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            PerformanceTier::Excellent => "🌟",
            PerformanceTier::VeryGood => "⭐",
            PerformanceTier::Good => "✨",
            PerformanceTier::Completed => "✅",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleLine {
    pub name: String,
    pub score: u32,
    pub max_score: u32,
    pub completed: bool,
}

/// Snapshot of how the course went
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionReport {
    pub learner: String,
    /// Sum of module scores
    pub total_score: u64,
    pub play_minutes: i64,
    pub level: u32,
    pub level_title: &'static str,
    pub neurotokens: u64,
    pub achievements: usize,
    pub completion_percentage: f64,
    pub modules: Vec<ModuleLine>,
    pub ethics: DecisionStats,
    pub social_impact: i64,
    pub tier: PerformanceTier,
}

impl CompletionReport {
    pub fn build(store: &ProgressStore) -> Self {
        let total_score: u64 = store.modules().iter().map(|m| u64::from(m.score)).sum();
        let profile = store.user_profile();

        Self {
            learner: profile.name.clone(),
            total_score,
            play_minutes: store.total_play_time().num_minutes(),
            level: profile.level,
            level_title: store.user_level_title(),
            neurotokens: profile.neurotokens,
            achievements: store.achievements().len(),
            completion_percentage: store.completion_percentage(),
            modules: store
                .modules()
                .iter()
                .map(|m| ModuleLine {
                    name: m.name.clone(),
                    score: m.score,
                    max_score: m.max_score,
                    completed: m.completed,
                })
                .collect(),
            ethics: store.ethical_decision_stats(),
            social_impact: store.social_impact_score(),
            tier: PerformanceTier::for_score(total_score),
        }
    }

    /// Short text for sharing outside the app
    pub fn share_text(&self) -> String {
        format!(
            "¡Completé Educación IA Global de Nucleo Colectivo! 🎉\n\n\
             Puntuación: {}\nNivel: {}\nLogros: {}\n\n\
             #NucleoColectivo #EducacionIA #IAGlobal",
            self.total_score, self.level_title, self.achievements
        )
    }
}

impl fmt::Display for CompletionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.tier.emoji(), self.tier.label())?;
        writeln!(f)?;
        writeln!(f, "  Total score:     {}", self.total_score)?;
        writeln!(f, "  Level:           {} ({})", self.level, self.level_title)?;
        writeln!(f, "  Achievements:    {}", self.achievements)?;
        writeln!(f, "  Minutes played:  {}", self.play_minutes)?;
        writeln!(f, "  Neurotokens:     {}", self.neurotokens)?;
        writeln!(f, "  Completion:      {:.2}%", self.completion_percentage)?;
        writeln!(f)?;
        for module in &self.modules {
            let mark = if module.completed { "✓" } else { " " };
            writeln!(f, "  [{}] {:<40} {}/{}", mark, module.name, module.score, module.max_score)?;
        }
        writeln!(f)?;
        writeln!(f, "  Social impact:   {}", self.social_impact)?;
        writeln!(f, "  Positive ethical decisions: {}", self.ethics.positive)?;
        write!(f, "  Average responsibility:     {}%", self.ethics.average_social_score.round())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nucleo_shared::ModuleOutcome;

    #[test]
    fn test_tiers() {
        assert_eq!(PerformanceTier::for_score(0), PerformanceTier::Completed);
        assert_eq!(PerformanceTier::for_score(599), PerformanceTier::Completed);
        assert_eq!(PerformanceTier::for_score(600), PerformanceTier::Good);
        assert_eq!(PerformanceTier::for_score(800), PerformanceTier::VeryGood);
        assert_eq!(PerformanceTier::for_score(1000), PerformanceTier::Excellent);
    }

    #[test]
    fn test_report_sums_module_scores() {
        let mut store = ProgressStore::new();
        store.complete_module("fundamentals", ModuleOutcome::scored(450));
        store.complete_module("ethics", ModuleOutcome::scored(400));

        let report = CompletionReport::build(&store);
        assert_eq!(report.total_score, 850);
        assert_eq!(report.tier, PerformanceTier::VeryGood);
        assert_eq!(report.play_minutes, 0);
        assert_eq!(report.level_title, "Aprendiz Colaborativo");
        assert!(report.share_text().contains("Puntuación: 850"));
        assert!(report.to_string().contains("Muy Bueno"));
    }
}
