//! Tests for the progress store contract, persistence and notification.

use nucleo_common::model::{
    Achievement, AchievementCategory, Creation, CreationKind, CreationPatch, GameState,
    ModuleOutcome, ProfilePatch, Rarity, STORAGE_KEY,
};
use nucleo_common::persistence::save_state;
use nucleo_common::{
    FileBackend, LoadOutcome, MemoryBackend, ProgressStore, StateBackend, StoreOptions,
};
use std::cell::RefCell;
use std::rc::Rc;
use tempfile::tempdir;

fn achievement(id: &str) -> Achievement {
    Achievement::new(id, "Badge", AchievementCategory::Technical, Rarity::Rare)
}

#[test]
fn test_achievement_unlock_is_idempotent() {
    let mut store = ProgressStore::new();
    assert!(store.add_achievement(achievement("first-steps")));
    assert!(!store.add_achievement(achievement("first-steps")));

    assert_eq!(store.achievements().len(), 1);
    assert_eq!(store.user_profile().neurotokens, 150);
}

#[test]
fn test_module_score_is_monotonic() {
    let mut store = ProgressStore::new();
    store.complete_module("fundamentals", ModuleOutcome::scored(50));
    store.complete_module("fundamentals", ModuleOutcome::scored(30));
    assert_eq!(store.module("fundamentals").unwrap().score, 50);
    store.complete_module("fundamentals", ModuleOutcome::scored(80));
    assert_eq!(store.module("fundamentals").unwrap().score, 80);
}

#[test]
fn test_game_completed_only_when_all_modules_done() {
    let mut store = ProgressStore::new();
    let ids: Vec<String> = store.modules().iter().map(|m| m.id.clone()).collect();
    for (i, id) in ids.iter().enumerate() {
        assert!(!store.state().game_completed, "completed after {} modules", i);
        store.complete_module(id, ModuleOutcome::scored(10));
    }
    assert!(store.state().game_completed);
    assert_eq!(store.completion_percentage(), 100.0);
    assert_eq!(store.user_profile().level, 4);
    assert_eq!(store.user_level_title(), "Guardián de la Inteligencia");
}

#[test]
fn test_spend_guard() {
    let mut store = ProgressStore::new();
    assert!(!store.spend_neurotokens(101, "hat"));
    assert_eq!(store.user_profile().neurotokens, 100);
    assert!(store.spend_neurotokens(100, "hat"));
    assert_eq!(store.user_profile().neurotokens, 0);

    store.add_neurotokens(30, "gift");
    assert_eq!(store.user_profile().neurotokens, 30);
}

#[test]
fn test_empty_ethics_stats() {
    let stats = ProgressStore::new().ethical_decision_stats();
    assert_eq!((stats.positive, stats.negative, stats.neutral, stats.total), (0, 0, 0, 0));
    assert_eq!(stats.average_social_score, 0.0);
}

#[test]
fn test_reset_keeps_name_only() {
    let mut store = ProgressStore::new();
    store.update_user_profile(ProfilePatch::name("Valentina"));
    store.complete_module("ethics", ModuleOutcome::scored(300));
    store.start_game();
    let old_id = store.user_profile().id;

    store.reset_game();

    assert_eq!(store.user_profile().name, "Valentina");
    assert_ne!(store.user_profile().id, old_id);
    assert!(store.modules().iter().all(|m| !m.completed && m.score == 0));
    assert!(!store.state().game_started);
    assert_eq!(store.user_profile().neurotokens, 100);
}

#[test]
fn test_end_to_end_first_module() {
    let mut store = ProgressStore::new();
    store.complete_module(
        "fundamentals",
        ModuleOutcome::scored(220).with_achievements(["high-accuracy-trainer"]),
    );

    let module = &store.modules()[0];
    assert!(module.completed);
    assert_eq!(module.score, 220);
    assert_eq!(
        module.achievements.iter().filter(|a| *a == "high-accuracy-trainer").count(),
        1
    );
    assert_eq!(store.user_profile().total_score, 220);
    assert_eq!(store.user_profile().neurotokens, 172);
    assert!((store.completion_percentage() - 16.67).abs() < 0.01);
}

#[test]
fn test_state_version_counts_effective_mutations() {
    let mut store = ProgressStore::new();
    store.start_game();
    store.complete_module("astrology", ModuleOutcome::scored(10));
    store.spend_neurotokens(1_000, "castle");
    store.like_creation(uuid_for_test());
    assert_eq!(store.state_version(), 1);

    store.add_neurotokens(5, "bonus");
    assert_eq!(store.state_version(), 2);
}

fn uuid_for_test() -> uuid::Uuid {
    Creation::new(CreationKind::Music, "unsaved").id
}

#[test]
fn test_observers_see_each_change() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut store = ProgressStore::new();

    let sink = Rc::clone(&seen);
    let id = store.subscribe(move |version: u64, state: &GameState| {
        sink.borrow_mut().push((version, state.user_profile.neurotokens));
    });

    store.add_neurotokens(10, "a");
    store.spend_neurotokens(500, "too much");
    store.add_neurotokens(10, "b");
    assert_eq!(*seen.borrow(), vec![(1, 110), (2, 120)]);

    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
    store.add_neurotokens(10, "c");
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn test_write_back_on_every_change() {
    let backend = MemoryBackend::new();
    let mut store = ProgressStore::open(backend.clone()).unwrap();
    assert_eq!(store.load_outcome(), &LoadOutcome::Fresh);
    assert!(backend.load(STORAGE_KEY).unwrap().is_none());

    store.update_user_profile(ProfilePatch::name("Julián"));
    store.complete_module("generative", ModuleOutcome::scored(200));

    let reopened = ProgressStore::open(backend).unwrap();
    assert_eq!(reopened.load_outcome(), &LoadOutcome::Restored);
    assert_eq!(reopened.user_profile().name, "Julián");
    assert_eq!(reopened.module("generative").unwrap().score, 200);
}

#[test]
fn test_autosave_off_requires_flush() {
    let backend = MemoryBackend::new();
    let options = StoreOptions {
        autosave: false,
        ..Default::default()
    };
    let mut store = ProgressStore::open_with(backend.clone(), options).unwrap();
    store.add_neurotokens(50, "quiet");
    assert!(backend.load(STORAGE_KEY).unwrap().is_none());

    store.flush().unwrap();
    let reopened = ProgressStore::open(backend).unwrap();
    assert_eq!(reopened.user_profile().neurotokens, 150);
}

#[test]
fn test_old_schema_is_set_aside() {
    let backend = MemoryBackend::new();
    backend
        .save(STORAGE_KEY, r#"{"version":2,"state":{"userProfile":{}}}"#)
        .unwrap();

    let store = ProgressStore::open(backend.clone()).unwrap();
    assert!(matches!(
        store.load_outcome(),
        LoadOutcome::Reset { found_version: Some(2), .. }
    ));
    assert_eq!(store.user_profile().neurotokens, 100);
    assert!(store.modules().iter().all(|m| !m.completed));
    assert!(backend.keys().contains(&format!("{}.v2.bak", STORAGE_KEY)));
}

#[test]
fn test_file_backed_store() {
    let dir = tempdir().unwrap();
    let backend = FileBackend::new(dir.path());

    let mut store = ProgressStore::open(backend.clone()).unwrap();
    store.set_current_module(1);
    store.add_creation(Creation::new(CreationKind::Chatbot, "Parcero bot").public());
    assert!(backend.path_for(STORAGE_KEY).exists());

    let reopened = ProgressStore::open(backend.clone()).unwrap();
    assert_eq!(reopened.state().current_module, 1);
    assert_eq!(reopened.community_creations().len(), 1);
    assert_eq!(reopened.state(), store.state());

    // A state saved by hand is picked up too
    let mut edited = reopened.state().clone();
    edited.user_profile.neurotokens = 999;
    save_state(&backend, STORAGE_KEY, &edited).unwrap();
    assert_eq!(ProgressStore::open(backend).unwrap().user_profile().neurotokens, 999);
}

#[test]
fn test_unparseable_v3_state_is_set_aside() {
    let backend = MemoryBackend::new();
    let blob = r#"{"version":3,"state":{"user_profile":{"name":42}}}"#;
    backend.save(STORAGE_KEY, blob).unwrap();

    let store = ProgressStore::open(backend.clone()).unwrap();
    let backup_key = format!("{}.v3.bak", STORAGE_KEY);
    assert_eq!(
        store.load_outcome(),
        &LoadOutcome::Reset {
            found_version: Some(3),
            backup_key: backup_key.clone(),
        }
    );
    assert_eq!(backend.load(&backup_key).unwrap().as_deref(), Some(blob));
    assert_eq!(store.modules().len(), 6);
}

#[test]
fn test_resized_curriculum_is_set_aside() {
    let backend = MemoryBackend::new();
    let mut state = GameState::fresh_for("Camila");
    state.module_progress.truncate(1);
    state.current_module = 4;
    save_state(&backend, STORAGE_KEY, &state).unwrap();

    let mut store = ProgressStore::open(backend.clone()).unwrap();
    assert!(matches!(
        store.load_outcome(),
        LoadOutcome::Reset { found_version: Some(3), .. }
    ));
    assert_eq!(store.modules().len(), 6);
    assert_eq!(store.state().current_module, 0);
    assert!(backend.keys().contains(&format!("{}.v3.bak", STORAGE_KEY)));

    store.complete_module("fundamentals", ModuleOutcome::scored(100));
    assert!(!store.state().game_completed);
    assert!((store.completion_percentage() - 16.67).abs() < 0.01);
}

#[test]
fn test_completion_with_creations_credits_creativity() {
    let mut store = ProgressStore::new();
    let outcome = ModuleOutcome::scored(95).with_creations([
        Creation::new(CreationKind::Art, "mural"),
        Creation::new(CreationKind::Music, "cumbia"),
        Creation::new(CreationKind::Story, "cuento"),
    ]);
    assert!(store.complete_module("generative", outcome));

    assert_eq!(store.user_profile().creativity_score, 30);
    // 9 for the score, 25 per creation, on top of the starting 100
    assert_eq!(store.user_profile().neurotokens, 100 + 9 + 75);
    assert_eq!(store.module("generative").unwrap().creations.len(), 3);
}

#[test]
fn test_update_creation_leaves_likes_alone() {
    let mut store = ProgressStore::new();
    let creation = Creation::new(CreationKind::Art, "retrato").public();
    let id = creation.id;
    store.add_creation(creation);
    store.like_creation(id);
    store.like_creation(id);

    let patch = CreationPatch {
        title: Some("autorretrato".to_string()),
        is_public: Some(true),
        ..Default::default()
    };
    assert!(store.update_creation(id, &patch));

    let shared = &store.community_creations()[0];
    assert_eq!(shared.title, "autorretrato");
    assert_eq!(shared.likes, 2);
    assert_eq!(store.modules()[0].creations[0].likes, 2);
}
