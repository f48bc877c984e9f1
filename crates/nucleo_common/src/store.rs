//! The progress store: sole owner and mutator of the learner's state.
//!
//! Every mutation runs to completion before returning. Operations on ids
//! the store does not know about are silent no-ops. After each effective
//! mutation the state version is bumped, the state is written back to the
//! attached backend (failures are logged, not returned) and observers are
//! notified in subscription order.

use crate::observer::{StateObserver, SubscriptionId};
use crate::persistence::{load_state, save_state, LoadOutcome, StateBackend};
use chrono::{Duration, Utc};
use nucleo_shared::achievements::badge;
use nucleo_shared::{
    Achievement, AvatarPatch, CollaborationSession, Creation, CreationPatch, EthicsCase, GameState,
    ImpactProject, ModuleOutcome, ModuleProgress, PreferencesPatch, ProfilePatch, Result,
    STORAGE_KEY,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// How a store talks to its backend
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub storage_key: String,
    /// Write back after every mutation
    pub autosave: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            autosave: true,
        }
    }
}

pub struct ProgressStore {
    state: GameState,
    backend: Option<Box<dyn StateBackend>>,
    options: StoreOptions,
    load_outcome: LoadOutcome,
    state_version: u64,
    observers: Vec<(SubscriptionId, Box<dyn StateObserver>)>,
    next_subscription: u64,
}

impl Default for ProgressStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProgressStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressStore")
            .field("state_version", &self.state_version)
            .field("backend", &self.backend.as_ref().map(|b| b.describe()))
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl ProgressStore {
    /// In-memory store with default state and no persistence
    pub fn new() -> Self {
        Self::from_state(GameState::default())
    }

    pub fn from_state(state: GameState) -> Self {
        Self {
            state,
            backend: None,
            options: StoreOptions::default(),
            load_outcome: LoadOutcome::Fresh,
            state_version: 0,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Open a store backed by `backend`, restoring any saved state
    pub fn open(backend: impl StateBackend + 'static) -> Result<Self> {
        Self::open_with(backend, StoreOptions::default())
    }

    pub fn open_with(backend: impl StateBackend + 'static, options: StoreOptions) -> Result<Self> {
        let (state, load_outcome) = load_state(&backend, &options.storage_key)?;
        debug!("Opened store at {} ({:?})", backend.describe(), load_outcome);
        Ok(Self {
            state,
            backend: Some(Box::new(backend)),
            options,
            load_outcome,
            state_version: 0,
            observers: Vec::new(),
            next_subscription: 0,
        })
    }

    // ========== Read access ==========

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn user_profile(&self) -> &nucleo_shared::UserProfile {
        &self.state.user_profile
    }

    pub fn modules(&self) -> &[ModuleProgress] {
        &self.state.module_progress
    }

    pub fn module(&self, id: &str) -> Option<&ModuleProgress> {
        self.state.find_module(id)
    }

    /// The active module, if the pointer is in range
    pub fn current_module(&self) -> Option<&ModuleProgress> {
        self.state.module_progress.get(self.state.current_module)
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.state.achievements
    }

    pub fn community_creations(&self) -> &[Creation] {
        &self.state.community_creations
    }

    pub fn connected_peers(&self) -> &[String] {
        &self.state.connected_peers
    }

    /// Bumped once per effective mutation since the store was opened
    pub fn state_version(&self) -> u64 {
        self.state_version
    }

    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    pub fn backend_description(&self) -> Option<String> {
        self.backend.as_ref().map(|b| b.describe())
    }

    // ========== Observers ==========

    pub fn subscribe(&mut self, observer: impl StateObserver + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if the subscription was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    // ========== Persistence ==========

    /// Write the current state now and report the result
    pub fn flush(&self) -> Result<()> {
        match &self.backend {
            Some(backend) => save_state(backend.as_ref(), &self.options.storage_key, &self.state),
            None => Ok(()),
        }
    }

    fn commit(&mut self) {
        self.state_version += 1;
        if self.options.autosave {
            if let Err(e) = self.flush() {
                warn!("State write-back failed: {}", e);
            }
        }
        for (_, observer) in &self.observers {
            observer.state_changed(self.state_version, &self.state);
        }
    }

    fn module_mut(&mut self, id: &str) -> Option<&mut ModuleProgress> {
        self.state.module_progress.iter_mut().find(|m| m.id == id)
    }

    // ========== Profile ==========

    pub fn update_user_profile(&mut self, patch: ProfilePatch) {
        self.state.user_profile.apply(patch);
        self.commit();
    }

    pub fn update_avatar(&mut self, patch: AvatarPatch) {
        self.state.user_profile.avatar.apply(patch);
        self.commit();
    }

    pub fn update_preferences(&mut self, patch: PreferencesPatch) {
        self.state.user_profile.preferences.apply(patch);
        self.commit();
    }

    // ========== Game flow ==========

    /// Mark the game started. Calling again restarts the play timer.
    pub fn start_game(&mut self) {
        self.state.game_started = true;
        self.state.start_time = Some(Utc::now());
        info!("Game started");
        self.commit();
    }

    /// Apply one finished attempt of `module_id`. Returns false and changes
    /// nothing when the id is unknown.
    pub fn complete_module(&mut self, module_id: &str, outcome: ModuleOutcome) -> bool {
        let tokens = outcome.neurotoken_reward();
        let ModuleOutcome {
            score,
            achievements,
            creations,
            decisions,
        } = outcome;

        let creation_count = creations.len() as u64;
        let decision_count = decisions.len() as u64;

        let Some(module) = self.module_mut(module_id) else {
            debug!("complete_module: unknown module {}", module_id);
            return false;
        };
        module.completed = true;
        module.record_score(score);
        module.completed_at = Some(Utc::now());
        module.merge_achievements(&achievements);
        module.creations.extend(creations);
        module.decisions.extend(decisions);

        let completed = self.state.completed_modules();
        let profile = &mut self.state.user_profile;
        profile.total_score = profile.total_score.saturating_add(u64::from(score));
        profile.creativity_score = profile
            .creativity_score
            .saturating_add(creation_count.saturating_mul(10));
        profile.ethics_score = profile
            .ethics_score
            .saturating_add(decision_count.saturating_mul(5));
        profile.level = (completed / 2) as u32 + 1;
        profile.neurotokens = profile.neurotokens.saturating_add(tokens);

        self.state.game_completed = self.state.all_modules_completed();

        info!(
            "Completed module {} with score {} (+{} neurotokens, level {})",
            module_id, score, tokens, self.state.user_profile.level
        );
        if self.state.game_completed {
            info!("Every module completed");
        }
        self.commit();
        true
    }

    /// Point at module `index`, stamping its start time on first visit.
    /// Out-of-range indices are ignored.
    pub fn set_current_module(&mut self, index: usize) -> bool {
        let Some(module) = self.state.module_progress.get_mut(index) else {
            debug!("set_current_module: index {} out of range", index);
            return false;
        };
        if module.started_at.is_none() {
            module.started_at = Some(Utc::now());
        }
        self.state.current_module = index;
        self.commit();
        true
    }

    /// Add to a module's cumulative time spent
    pub fn log_time(&mut self, module_id: &str, spent: Duration) -> bool {
        let secs = spent.num_seconds().max(0) as u64;
        match self.module_mut(module_id) {
            Some(module) => {
                module.time_spent_secs = module.time_spent_secs.saturating_add(secs);
                self.commit();
                true
            }
            None => false,
        }
    }

    /// Replace everything with fresh state, keeping only the learner's name.
    /// The profile gets a new id.
    pub fn reset_game(&mut self) {
        let name = std::mem::take(&mut self.state.user_profile.name);
        self.state = GameState::fresh_for(name);
        info!("Game reset for profile {}", self.state.user_profile.id);
        self.commit();
    }

    // ========== Achievements & currency ==========

    /// Unlock an achievement once; the rarity reward is credited only on
    /// the first unlock. Returns whether it was new.
    pub fn add_achievement(&mut self, achievement: Achievement) -> bool {
        if self.state.has_achievement(&achievement.id) {
            debug!("Achievement {} already unlocked", achievement.id);
            return false;
        }
        let reward = achievement.rarity.reward();
        info!("Achievement unlocked: {} (+{} neurotokens)", achievement.id, reward);
        self.state.achievements.push(achievement);
        let profile = &mut self.state.user_profile;
        profile.neurotokens = profile.neurotokens.saturating_add(reward);
        self.commit();
        true
    }

    /// Unlock a badge from the catalog by id
    pub fn unlock_catalog_achievement(&mut self, id: &str) -> bool {
        match badge(id) {
            Some(spec) => self.add_achievement(spec.unlock()),
            None => {
                debug!("No catalog badge {}", id);
                false
            }
        }
    }

    /// Credit the balance. Crediting past `u64::MAX` pins the balance there.
    pub fn add_neurotokens(&mut self, amount: u64, reason: &str) {
        let profile = &mut self.state.user_profile;
        profile.neurotokens = profile.neurotokens.saturating_add(amount);
        info!("+{} neurotokens: {}", amount, reason);
        self.commit();
    }

    /// Debit the balance if it covers `amount`
    pub fn spend_neurotokens(&mut self, amount: u64, item: &str) -> bool {
        let balance = self.state.user_profile.neurotokens;
        if balance < amount {
            debug!("Cannot spend {} on {}: balance {}", amount, item, balance);
            return false;
        }
        self.state.user_profile.neurotokens = balance - amount;
        info!("-{} neurotokens: {}", amount, item);
        self.commit();
        true
    }

    // ========== Creations & community ==========

    /// Save a creation into the active module, and into the community
    /// gallery when it is public
    pub fn add_creation(&mut self, creation: Creation) {
        if creation.is_public {
            self.state.community_creations.push(creation.clone());
        }
        let index = self.state.current_module;
        if let Some(module) = self.state.module_progress.get_mut(index) {
            module.creations.push(creation);
        }
        self.commit();
    }

    /// Patch a creation wherever a copy of it lives. Returns false when no
    /// copy was found.
    pub fn update_creation(&mut self, id: Uuid, patch: &CreationPatch) -> bool {
        let mut found = false;
        let owned = self
            .state
            .module_progress
            .iter_mut()
            .flat_map(|m| m.creations.iter_mut());
        for creation in owned.chain(self.state.community_creations.iter_mut()) {
            if creation.id == id {
                creation.apply(patch);
                found = true;
            }
        }
        if found {
            self.commit();
        } else {
            debug!("update_creation: unknown creation {}", id);
        }
        found
    }

    /// Like a community creation. The owning module's copy is kept in step.
    pub fn like_creation(&mut self, id: Uuid) -> bool {
        let Some(shared) = self.state.community_creations.iter_mut().find(|c| c.id == id) else {
            debug!("like_creation: {} is not in the community gallery", id);
            return false;
        };
        shared.likes = shared.likes.saturating_add(1);
        let likes = shared.likes;
        for creation in self
            .state
            .module_progress
            .iter_mut()
            .flat_map(|m| m.creations.iter_mut())
            .filter(|c| c.id == id)
        {
            creation.likes = likes;
        }
        self.commit();
        true
    }

    pub fn follow_user(&mut self, user_id: &str) -> bool {
        if self.state.followed_users.iter().any(|u| u == user_id) {
            return false;
        }
        self.state.followed_users.push(user_id.to_string());
        self.commit();
        true
    }

    pub fn unfollow_user(&mut self, user_id: &str) -> bool {
        let before = self.state.followed_users.len();
        self.state.followed_users.retain(|u| u != user_id);
        if self.state.followed_users.len() == before {
            return false;
        }
        self.commit();
        true
    }

    // ========== Collaboration (local bookkeeping only) ==========

    pub fn start_collaboration(&mut self, session: CollaborationSession) {
        info!("Collaboration session {} started", session.id);
        self.state.collaboration_session = Some(session);
        self.state.is_collaborating = true;
        self.commit();
    }

    /// Flag the learner as collaborating. When the current session has this
    /// id and room left, the learner is listed as a participant.
    pub fn join_collaboration(&mut self, session_id: &str) {
        let me = self.state.user_profile.id.to_string();
        if let Some(session) = self.state.collaboration_session.as_mut() {
            if session.id == session_id && !session.participants.contains(&me) && !session.is_full() {
                session.participants.push(me);
            }
        }
        self.state.is_collaborating = true;
        self.commit();
    }

    pub fn leave_collaboration(&mut self) {
        self.state.collaboration_session = None;
        self.state.is_collaborating = false;
        self.state.connected_peers.clear();
        self.commit();
    }

    /// Replace the session's shared state. No-op without a session.
    pub fn update_collaboration_state(&mut self, shared_state: serde_json::Value) -> bool {
        match self.state.collaboration_session.as_mut() {
            Some(session) => {
                session.shared_state = shared_state;
                self.commit();
                true
            }
            None => false,
        }
    }

    pub fn add_peer(&mut self, peer_id: &str) -> bool {
        if self.state.connected_peers.iter().any(|p| p == peer_id) {
            return false;
        }
        self.state.connected_peers.push(peer_id.to_string());
        self.commit();
        true
    }

    pub fn remove_peer(&mut self, peer_id: &str) -> bool {
        let before = self.state.connected_peers.len();
        self.state.connected_peers.retain(|p| p != peer_id);
        if self.state.connected_peers.len() == before {
            return false;
        }
        self.commit();
        true
    }

    // ========== Narration, music, content ==========

    pub fn start_narration(&mut self, text: impl Into<String>) {
        self.state.current_narration = Some(text.into());
        self.state.is_narrating = true;
        self.commit();
    }

    pub fn stop_narration(&mut self) {
        self.state.current_narration = None;
        self.state.is_narrating = false;
        self.commit();
    }

    pub fn set_background_music(&mut self, track: impl Into<String>) {
        self.state.background_music = track.into();
        self.commit();
    }

    pub fn load_impact_projects(&mut self, projects: Vec<ImpactProject>) {
        self.state.impact_projects = projects;
        self.commit();
    }

    pub fn load_ethics_cases(&mut self, cases: Vec<EthicsCase>) {
        self.state.ethics_cases = cases;
        self.commit();
    }
}
