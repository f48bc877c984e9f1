//! Scripted model-training simulations from the fundamentals module.
//!
//! A run is a plain iterator of ticks; callers decide the pacing. The
//! reported accuracy creeps up with some noise and always lands exactly
//! on the scenario's target on the last tick.

use crate::course::ModuleAttempt;
use nucleo_shared::{NucleoError, Result};
use rand::Rng;
use serde::Serialize;

/// Points for a correct quiz answer
pub const QUIZ_POINTS: u32 = 20;
/// Runs above this accuracy earn `high-accuracy-trainer`
pub const HIGH_ACCURACY: u32 = 80;
/// Simulations needed for `simulation-master`
pub const SIMULATIONS_FOR_MASTER: usize = 2;
/// Module score above which `fundamentals-expert` is awarded
pub const EXPERT_SCORE: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrainingScenario {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub data_types: &'static [&'static str],
    /// Final accuracy, in percent
    pub target_accuracy: u32,
    /// Number of ticks in a run
    pub steps: u32,
}

pub const SCENARIOS: &[TrainingScenario] = &[
    TrainingScenario {
        id: "image-classifier",
        name: "Clasificador de Imágenes",
        description: "Entrenar una IA para reconocer objetos cotidianos",
        data_types: &["Fotos de gatos", "Fotos de perros", "Fotos de carros", "Fotos de flores"],
        target_accuracy: 85,
        steps: 30,
    },
    TrainingScenario {
        id: "sentiment-analyzer",
        name: "Analizador de Sentimientos",
        description: "IA que detecta emociones en texto",
        data_types: &["Comentarios positivos", "Comentarios negativos", "Comentarios neutrales"],
        target_accuracy: 78,
        steps: 25,
    },
    TrainingScenario {
        id: "music-recommender",
        name: "Recomendador Musical",
        description: "Sistema que sugiere música según preferencias",
        data_types: &["Historial de reproducción", "Géneros preferidos", "Hora del día", "Estado de ánimo"],
        target_accuracy: 72,
        steps: 35,
    },
];

impl TrainingScenario {
    pub fn find(id: &str) -> Result<&'static TrainingScenario> {
        SCENARIOS
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| NucleoError::UnknownScenario(id.to_string()))
    }

    pub fn run<R: Rng>(&'static self, rng: R) -> TrainingRun<R> {
        TrainingRun::new(self, rng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrainingTick {
    pub step: u32,
    /// Percent of the run done
    pub progress: f64,
    pub accuracy: u32,
}

/// Iterator over one simulated training run
#[derive(Debug)]
pub struct TrainingRun<R> {
    scenario: &'static TrainingScenario,
    rng: R,
    step: u32,
}

impl<R: Rng> TrainingRun<R> {
    pub fn new(scenario: &'static TrainingScenario, rng: R) -> Self {
        Self { scenario, rng, step: 0 }
    }

    /// Drain the remaining ticks and report the result
    pub fn finish(mut self) -> TrainingOutcome {
        for _ in self.by_ref() {}
        TrainingOutcome::for_scenario(self.scenario)
    }
}

impl<R: Rng> Iterator for TrainingRun<R> {
    type Item = TrainingTick;

    fn next(&mut self) -> Option<TrainingTick> {
        let steps = self.scenario.steps;
        if self.step >= steps {
            return None;
        }
        self.step += 1;

        let target = self.scenario.target_accuracy;
        let progress = 100.0 * f64::from(self.step) / f64::from(steps);
        let accuracy = if self.step == steps {
            target
        } else {
            let noise: f64 = self.rng.gen_range(0.0..10.0);
            let raw = (progress / 100.0 * f64::from(target) + noise).floor() as u32;
            raw.min(target)
        };

        Some(TrainingTick {
            step: self.step,
            progress,
            accuracy,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.scenario.steps - self.step) as usize;
        (left, Some(left))
    }
}

/// What a finished run is worth
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainingOutcome {
    pub scenario_id: &'static str,
    pub final_accuracy: u32,
    pub steps: u32,
    pub points: u32,
    pub achievements: Vec<&'static str>,
}

impl TrainingOutcome {
    fn for_scenario(scenario: &TrainingScenario) -> Self {
        let accuracy = scenario.target_accuracy;
        let mut achievements = Vec::new();
        if accuracy > HIGH_ACCURACY {
            achievements.push("high-accuracy-trainer");
        }
        Self {
            scenario_id: scenario.id,
            final_accuracy: accuracy,
            steps: scenario.steps,
            points: accuracy * 2,
            achievements,
        }
    }
}

/// The fundamentals module's scoring: simulations plus a short quiz
#[derive(Debug, Clone, Default)]
pub struct FundamentalsLab {
    attempt: ModuleAttempt,
    simulations: Vec<TrainingOutcome>,
}

impl FundamentalsLab {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn simulations(&self) -> &[TrainingOutcome] {
        &self.simulations
    }

    pub fn score(&self) -> u32 {
        self.attempt.score()
    }

    pub fn record_simulation(&mut self, outcome: TrainingOutcome) {
        self.attempt.add_points(outcome.points);
        for id in &outcome.achievements {
            self.attempt.award(*id);
        }
        self.simulations.push(outcome);
    }

    pub fn answer_quiz(&mut self, correct: bool) {
        if correct {
            self.attempt.add_points(QUIZ_POINTS);
        }
    }

    /// Close the lab, adding the end-of-module badges
    pub fn into_attempt(mut self) -> ModuleAttempt {
        if self.simulations.len() >= SIMULATIONS_FOR_MASTER {
            self.attempt.award("simulation-master");
        }
        if self.attempt.score() > EXPERT_SCORE {
            self.attempt.award("fundamentals-expert");
        }
        self.attempt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_unknown_scenario() {
        let err = TrainingScenario::find("weather-oracle").unwrap_err();
        assert_eq!(err.code(), "unknown_scenario");
    }

    #[test]
    fn test_run_shape() {
        for scenario in SCENARIOS {
            let ticks: Vec<_> = scenario.run(StdRng::seed_from_u64(7)).collect();
            assert_eq!(ticks.len() as u32, scenario.steps);
            assert!(ticks.iter().all(|t| t.accuracy <= scenario.target_accuracy));
            let last = ticks.last().unwrap();
            assert_eq!(last.accuracy, scenario.target_accuracy);
            assert_eq!(last.progress, 100.0);
        }
    }

    #[test]
    fn test_outcome_points_and_badge() {
        let image = TrainingScenario::find("image-classifier").unwrap();
        let outcome = image.run(StdRng::seed_from_u64(1)).finish();
        assert_eq!(outcome.points, 170);
        assert_eq!(outcome.achievements, vec!["high-accuracy-trainer"]);

        let music = TrainingScenario::find("music-recommender").unwrap();
        let outcome = music.run(StdRng::seed_from_u64(1)).finish();
        assert_eq!(outcome.points, 144);
        assert!(outcome.achievements.is_empty());
    }

    #[test]
    fn test_lab_bonus_rules() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut lab = FundamentalsLab::new();
        lab.record_simulation(TrainingScenario::find("image-classifier").unwrap().run(&mut rng).finish());
        lab.answer_quiz(true);
        lab.answer_quiz(false);
        assert_eq!(lab.score(), 190);
        let attempt = lab.clone().into_attempt();
        assert!(!attempt.has_award("simulation-master"));
        assert!(!attempt.has_award("fundamentals-expert"));

        lab.record_simulation(TrainingScenario::find("sentiment-analyzer").unwrap().run(&mut rng).finish());
        let attempt = lab.into_attempt();
        assert_eq!(attempt.score(), 190 + 156);
        assert!(attempt.has_award("simulation-master"));
        assert!(attempt.has_award("fundamentals-expert"));
        assert!(attempt.has_award("high-accuracy-trainer"));
    }
}
