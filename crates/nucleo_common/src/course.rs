//! Module-by-module course flow on top of the store.
//!
//! A module attempt collects points, badge ids, creations and decisions
//! while the learner works through it; finishing the attempt hands the
//! payload to the store, pays the completion bonus and moves on.

use crate::store::ProgressStore;
use chrono::Utc;
use nucleo_shared::{Creation, EthicalDecision, ModuleOutcome};
use tracing::{debug, info};

/// Neurotokens paid on top of the module reward for finishing a module
pub const COMPLETION_BONUS: u64 = 100;
/// Badge unlocked when the last module is finished
pub const GRADUATE_BADGE: &str = "course-graduate";

/// One pass through a module, before it is handed to the store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleAttempt {
    score: u32,
    achievements: Vec<String>,
    creations: Vec<Creation>,
    decisions: Vec<EthicalDecision>,
}

impl ModuleAttempt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn achievements(&self) -> &[String] {
        &self.achievements
    }

    pub fn add_points(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Award a badge id; repeats are ignored
    pub fn award(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !self.achievements.contains(&id) {
            self.achievements.push(id);
        }
    }

    pub fn has_award(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a == id)
    }

    pub fn add_creation(&mut self, creation: Creation) {
        self.creations.push(creation);
    }

    pub fn creation_count(&self) -> usize {
        self.creations.len()
    }

    pub fn add_decision(&mut self, decision: EthicalDecision) {
        self.decisions.push(decision);
    }

    /// The completion payload handed to the store
    pub fn into_outcome(self) -> ModuleOutcome {
        ModuleOutcome {
            score: self.score,
            achievements: self.achievements,
            creations: self.creations,
            decisions: self.decisions,
        }
    }
}

/// Where the course goes after a module is finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseStep {
    /// Continue with the module at this index
    Advance(usize),
    /// Every module is completed
    CourseComplete,
}

/// Drives the active module of a store through completion
pub struct CourseSession<'a> {
    store: &'a mut ProgressStore,
}

impl<'a> CourseSession<'a> {
    pub fn new(store: &'a mut ProgressStore) -> Self {
        Self { store }
    }

    /// Finish the active module with `attempt`.
    ///
    /// Time since the module was visited (or last completed) is logged,
    /// the attempt is recorded, the completion bonus is paid and the
    /// pointer moves to the next module still to do.
    pub fn finish_current(&mut self, attempt: ModuleAttempt) -> CourseStep {
        let index = self.store.state().current_module;
        let Some(module) = self.store.current_module() else {
            return self.next_step(index);
        };
        let id = module.id.clone();
        let name = module.name.clone();
        let since = match (module.started_at, module.completed_at) {
            (Some(start), Some(done)) => Some(start.max(done)),
            (start, done) => start.or(done),
        };

        if let Some(since) = since {
            self.store.log_time(&id, Utc::now() - since);
        }
        self.store.complete_module(&id, attempt.into_outcome());
        self.store
            .add_neurotokens(COMPLETION_BONUS, &format!("Completed {}", name));

        let step = self.next_step(index);
        match step {
            CourseStep::Advance(next) => {
                self.store.set_current_module(next);
            }
            CourseStep::CourseComplete => {
                info!("Course complete");
                self.store.unlock_catalog_achievement(GRADUATE_BADGE);
            }
        }
        step
    }

    /// Finish `module_id` with `attempt`, but only while it is the active
    /// module. Returns `None`, changing nothing, otherwise.
    pub fn finish_module(&mut self, module_id: &str, attempt: ModuleAttempt) -> Option<CourseStep> {
        let active = self.store.current_module().map(|m| m.id.as_str());
        if active != Some(module_id) {
            debug!("finish_module: {} is not the active module ({:?})", module_id, active);
            return None;
        }
        Some(self.finish_current(attempt))
    }

    /// Next incomplete module after `index`, wrapping around
    fn next_step(&self, index: usize) -> CourseStep {
        let modules = self.store.modules();
        if self.store.state().all_modules_completed() {
            return CourseStep::CourseComplete;
        }
        let count = modules.len();
        (1..=count)
            .map(|offset| (index + offset) % count)
            .find(|&i| !modules[i].completed)
            .map(CourseStep::Advance)
            .unwrap_or(CourseStep::CourseComplete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_dedups_awards() {
        let mut attempt = ModuleAttempt::new();
        attempt.add_points(40);
        attempt.add_points(20);
        attempt.award("high-accuracy-trainer");
        attempt.award("high-accuracy-trainer");
        assert_eq!(attempt.score(), 60);
        assert_eq!(attempt.achievements().len(), 1);

        let outcome = attempt.into_outcome();
        assert_eq!(outcome.score, 60);
        assert_eq!(outcome.achievements, vec!["high-accuracy-trainer"]);
    }

    #[test]
    fn test_finish_pays_bonus_and_advances() {
        let mut store = ProgressStore::new();
        store.set_current_module(0);
        let mut session = CourseSession::new(&mut store);

        let mut attempt = ModuleAttempt::new();
        attempt.add_points(220);
        attempt.award("high-accuracy-trainer");
        assert_eq!(session.finish_current(attempt), CourseStep::Advance(1));

        assert_eq!(store.user_profile().neurotokens, 172 + COMPLETION_BONUS);
        assert_eq!(store.state().current_module, 1);
        assert!(store.modules()[1].started_at.is_some());
    }

    #[test]
    fn test_skips_completed_modules() {
        let mut store = ProgressStore::new();
        store.complete_module("conversational", ModuleOutcome::scored(10));
        let mut session = CourseSession::new(&mut store);
        assert_eq!(session.finish_current(ModuleAttempt::new()), CourseStep::Advance(2));
    }

    #[test]
    fn test_finish_module_requires_it_to_be_active() {
        let mut store = ProgressStore::new();
        store.set_current_module(5);
        let before = store.state().clone();

        let mut attempt = ModuleAttempt::new();
        attempt.add_points(170);
        attempt.award("high-accuracy-trainer");
        let mut session = CourseSession::new(&mut store);
        assert_eq!(session.finish_module("fundamentals", attempt.clone()), None);
        assert_eq!(store.state(), &before);
        assert!(!store.modules()[5].completed);

        store.set_current_module(0);
        let mut session = CourseSession::new(&mut store);
        assert_eq!(
            session.finish_module("fundamentals", attempt),
            Some(CourseStep::Advance(1))
        );
        assert!(store.modules()[0].completed);
        assert!(!store.modules()[5].completed);
        assert!(store.modules()[5].achievements.is_empty());
    }

    #[test]
    fn test_last_module_completes_course() {
        let mut store = ProgressStore::new();
        for id in ["fundamentals", "conversational", "computer-vision", "generative", "neural-networks"] {
            store.complete_module(id, ModuleOutcome::scored(0));
        }
        store.set_current_module(5);
        let mut session = CourseSession::new(&mut store);
        assert_eq!(session.finish_current(ModuleAttempt::new()), CourseStep::CourseComplete);

        assert!(store.state().game_completed);
        assert!(store.state().has_achievement(GRADUATE_BADGE));
        assert_eq!(store.state().current_module, 5);
    }
}
