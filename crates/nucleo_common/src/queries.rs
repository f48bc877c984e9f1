//! Derived values computed from the current state on demand.

use crate::store::ProgressStore;
use chrono::{Duration, Utc};
use nucleo_shared::{Creation, CreationKind, DecisionStats};

/// Social impact credited per public creation
pub const PUBLIC_CREATION_IMPACT: i64 = 10;
/// Social impact credited per connected peer
pub const PEER_IMPACT: i64 = 25;

impl ProgressStore {
    /// Time since the game was started, zero if it never was
    pub fn total_play_time(&self) -> Duration {
        match self.state().start_time {
            Some(start) => (Utc::now() - start).max(Duration::zero()),
            None => Duration::zero(),
        }
    }

    /// Share of completed modules, 0.0 to 100.0
    pub fn completion_percentage(&self) -> f64 {
        let total = self.modules().len();
        if total == 0 {
            return 0.0;
        }
        100.0 * self.state().completed_modules() as f64 / total as f64
    }

    pub fn user_level_title(&self) -> &'static str {
        self.user_profile().level_title()
    }

    /// Every creation saved in any module with the given kind
    pub fn creations_by_type(&self, kind: CreationKind) -> Vec<&Creation> {
        self.state().all_creations().filter(|c| c.kind == kind).collect()
    }

    pub fn ethical_decision_stats(&self) -> DecisionStats {
        DecisionStats::from_decisions(self.state().all_decisions())
    }

    /// Decisions' social scores plus credit for public creations and peers
    pub fn social_impact_score(&self) -> i64 {
        let state = self.state();
        let decisions: i64 = state.all_decisions().map(|d| d.social_score).sum();
        let public = state.all_creations().filter(|c| c.is_public).count() as i64;
        let peers = state.connected_peers.len() as i64;
        decisions + PUBLIC_CREATION_IMPACT * public + PEER_IMPACT * peers
    }
}
