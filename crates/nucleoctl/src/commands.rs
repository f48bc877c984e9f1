//! Command handlers for nucleoctl.

use anyhow::{Context as _, Result};
use indicatif::{ProgressBar, ProgressStyle};
use nucleo_common::model::achievements::{badge, format_achievement_unlock};
use nucleo_common::model::curriculum::MODULE_IDS;
use nucleo_common::model::{Creation, CreationKind, EthicalDecision, Impact, ProfilePatch};
use nucleo_common::{
    CompletionReport, CourseSession, CourseStep, FileBackend, FundamentalsLab, LoadOutcome,
    ModuleAttempt, NucleoConfig, ProgressStore, StoreOptions, TrainingScenario,
};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use crate::output::{print_json, Painter};

/// Pacing of the training animation
const TICK: Duration = Duration::from_millis(100);

pub struct Context {
    config: NucleoConfig,
    data_dir: Option<PathBuf>,
    json: bool,
    painter: Painter,
}

impl Context {
    pub fn new(config: NucleoConfig, data_dir: Option<PathBuf>, json: bool) -> Self {
        let painter = Painter::new(config.output.color);
        Self {
            config,
            data_dir,
            json,
            painter,
        }
    }

    fn open_store(&self) -> Result<ProgressStore> {
        let dir = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => self.config.data_dir()?,
        };
        debug!("Opening progress store in {}", dir.display());
        let options = StoreOptions {
            autosave: self.config.storage.autosave,
            ..Default::default()
        };
        let store = ProgressStore::open_with(FileBackend::new(&dir), options)
            .with_context(|| format!("Failed to open progress in {}", dir.display()))?;

        if let LoadOutcome::Reset { found_version, backup_key } = store.load_outcome() {
            eprintln!(
                "{} saved progress (version {}) is not compatible and was moved to {}",
                self.painter.warn("note:"),
                found_version.map_or("unknown".to_string(), |v| v.to_string()),
                backup_key
            );
        }
        Ok(store)
    }

    /// Persist explicitly when autosave is off
    fn close(&self, store: &ProgressStore) -> Result<()> {
        if !self.config.storage.autosave {
            store.flush().context("Failed to save progress")?;
        }
        Ok(())
    }

    /// Print the state snapshot in JSON mode, or `line` otherwise
    fn done(&self, store: &ProgressStore, line: &str) -> Result<()> {
        self.close(store)?;
        if self.json {
            print_json(store.state())
        } else {
            println!("{}", line);
            Ok(())
        }
    }
}

/// Parse `scenario:choice:impact:social`
pub fn parse_decision(raw: &str) -> std::result::Result<EthicalDecision, String> {
    let parts: Vec<&str> = raw.split(':').collect();
    let [scenario, choice, impact, social] = parts.as_slice() else {
        return Err(format!("expected scenario:choice:impact:social, got '{}'", raw));
    };
    let impact: Impact = impact.parse().map_err(|e| format!("{}", e))?;
    let social: i64 = social
        .parse()
        .map_err(|_| format!("social score must be an integer, got '{}'", social))?;
    Ok(EthicalDecision::new(*scenario, *choice, impact, social))
}

/// Parse `kind:title[:public]`
pub fn parse_creation(raw: &str) -> std::result::Result<Creation, String> {
    let mut parts = raw.splitn(3, ':');
    let (Some(kind), Some(title)) = (parts.next(), parts.next()) else {
        return Err(format!("expected kind:title[:public], got '{}'", raw));
    };
    let kind: CreationKind = kind.parse().map_err(|e| format!("{}", e))?;
    if title.trim().is_empty() {
        return Err("creation title cannot be empty".to_string());
    }
    let creation = Creation::new(kind, title.trim());
    match parts.next() {
        None => Ok(creation),
        Some("public") => Ok(creation.public()),
        Some(other) => Err(format!("expected 'public' after the title, got '{}'", other)),
    }
}

pub fn status(ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    if ctx.json {
        return print_json(store.state());
    }

    let p = &ctx.painter;
    let profile = store.user_profile();
    let name = if profile.name.is_empty() { "(sin nombre)" } else { profile.name.as_str() };

    println!();
    println!("{}", p.header("Nucleo Colectivo IA"));
    p.rule();
    p.kv("learner", name);
    p.kv("level", &format!("{} ({})", profile.level, store.user_level_title()));
    p.kv("neurotokens", &profile.neurotokens.to_string());
    p.kv("total_score", &profile.total_score.to_string());
    p.kv("completion", &format!("{:.2}%", store.completion_percentage()));
    p.kv("achievements", &store.achievements().len().to_string());
    if store.state().game_started {
        p.kv("play_time", &format!("{} min", store.total_play_time().num_minutes()));
    } else {
        p.kv("play_time", &p.dim("not started"));
    }
    println!();

    let current = store.state().current_module;
    for (i, module) in store.modules().iter().enumerate() {
        let mark = if module.completed { p.ok("✓") } else { " ".to_string() };
        let pointer = if i == current { ">" } else { " " };
        println!(
            "{} [{}] {} {} {:<40} {}/{}",
            pointer, mark, i, module.icon, module.name, module.score, module.max_score
        );
    }
    p.rule();
    if let Some(dir) = store.backend_description() {
        println!("{}", p.dim(&format!("data: {}", dir)));
    }
    Ok(())
}

pub fn start(ctx: &Context, name: Option<String>) -> Result<()> {
    let mut store = ctx.open_store()?;
    if let Some(name) = name {
        store.update_user_profile(ProfilePatch::name(name));
    }
    store.start_game();
    if store.current_module().and_then(|m| m.started_at).is_none() {
        let index = store.state().current_module;
        store.set_current_module(index);
    }
    let line = format!("Game started. Current module: {}", current_name(&store));
    ctx.done(&store, &line)
}

pub fn visit(ctx: &Context, index: usize) -> Result<()> {
    let mut store = ctx.open_store()?;
    if !store.set_current_module(index) {
        anyhow::bail!(
            "No module at index {} (valid: 0-{})",
            index,
            store.modules().len().saturating_sub(1)
        );
    }
    let line = format!("Now in module {}", current_name(&store));
    ctx.done(&store, &line)
}

pub fn complete(
    ctx: &Context,
    score: u32,
    achievements: Vec<String>,
    decisions: Vec<EthicalDecision>,
    creations: Vec<Creation>,
) -> Result<()> {
    let mut attempt = ModuleAttempt::new();
    attempt.add_points(score);
    for id in achievements {
        attempt.award(id);
    }
    for decision in decisions {
        attempt.add_decision(decision);
    }
    for creation in creations {
        attempt.add_creation(creation);
    }

    let mut store = ctx.open_store()?;
    let active = store.current_module().map(|m| m.id.clone()).unwrap_or_default();
    finish_module(ctx, &mut store, &active, attempt)
}

fn finish_module(
    ctx: &Context,
    store: &mut ProgressStore,
    module_id: &str,
    attempt: ModuleAttempt,
) -> Result<()> {
    let finished = current_name(store);
    let before = store.user_profile().neurotokens;
    let awarded: Vec<String> = attempt.achievements().to_vec();

    let Some(step) = CourseSession::new(store).finish_module(module_id, attempt) else {
        let index = MODULE_IDS.iter().position(|id| *id == module_id).unwrap_or_default();
        anyhow::bail!(
            "The active module is {}, not {}. Run `nucleoctl visit {}` first.",
            finished,
            module_id,
            index
        );
    };

    let gained = store.user_profile().neurotokens.saturating_sub(before);
    let mut line = format!(
        "{} {} (+{} neurotokens)",
        ctx.painter.ok("Completed"),
        finished,
        gained
    );
    for id in &awarded {
        if let Some(spec) = badge(id) {
            line.push_str(&format!("\n  badge: {} {}", spec.icon, spec.name));
        }
    }
    match step {
        CourseStep::Advance(_) => {
            line.push_str(&format!("\nNext module: {}", current_name(store)));
        }
        CourseStep::CourseComplete => {
            line.push_str("\nEvery module is complete. Run `nucleoctl report`.");
        }
    }
    ctx.done(store, &line)
}

pub fn train(ctx: &Context, scenario_id: &str, finish: bool) -> Result<()> {
    let scenario = TrainingScenario::find(scenario_id)?;
    let mut run = scenario.run(rand::thread_rng());

    let outcome = if ctx.json {
        run.finish()
    } else {
        println!("{} {}", ctx.painter.header("Training"), scenario.name);
        println!("{}", ctx.painter.dim(&scenario.data_types.join(", ")));
        let bar = ProgressBar::new(u64::from(scenario.steps));
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40.magenta/blue} {pos}/{len} {msg}")
                .context("Invalid progress template")?
                .progress_chars("█▓░"),
        );
        for tick in run.by_ref() {
            bar.set_position(u64::from(tick.step));
            bar.set_message(format!("accuracy {}%", tick.accuracy));
            thread::sleep(TICK);
        }
        bar.finish();
        run.finish()
    };

    if !finish {
        if ctx.json {
            return print_json(&outcome);
        }
        println!(
            "Final accuracy {}% - worth {} points",
            outcome.final_accuracy, outcome.points
        );
        for id in &outcome.achievements {
            if let Some(spec) = badge(id) {
                println!("  badge: {} {}", spec.icon, spec.name);
            }
        }
        return Ok(());
    }

    // Training results only count toward the fundamentals module
    let mut lab = FundamentalsLab::new();
    lab.record_simulation(outcome);
    let mut store = ctx.open_store()?;
    finish_module(ctx, &mut store, MODULE_IDS[0], lab.into_attempt())
}

pub fn unlock(ctx: &Context, id: &str) -> Result<()> {
    let spec = badge(id).with_context(|| format!("Unknown badge '{}'", id))?;
    let mut store = ctx.open_store()?;
    let line = if store.unlock_catalog_achievement(id) {
        format_achievement_unlock(&spec.unlock())
    } else {
        format!("Badge {} was already unlocked", spec.name)
    };
    ctx.done(&store, &line)
}

pub fn add_tokens(ctx: &Context, amount: u64, reason: &str) -> Result<()> {
    let mut store = ctx.open_store()?;
    store.add_neurotokens(amount, reason);
    let line = format!("Balance: {} neurotokens", store.user_profile().neurotokens);
    ctx.done(&store, &line)
}

pub fn spend_tokens(ctx: &Context, amount: u64, item: &str) -> Result<()> {
    let mut store = ctx.open_store()?;
    if !store.spend_neurotokens(amount, item) {
        anyhow::bail!(
            "Not enough neurotokens for {} ({} needed, {} available)",
            item,
            amount,
            store.user_profile().neurotokens
        );
    }
    let line = format!("Balance: {} neurotokens", store.user_profile().neurotokens);
    ctx.done(&store, &line)
}

pub fn create(
    ctx: &Context,
    kind: CreationKind,
    title: String,
    description: Option<String>,
    public: bool,
) -> Result<()> {
    let mut creation = Creation::new(kind, title);
    if let Some(description) = description {
        creation = creation.with_description(description);
    }
    if public {
        creation = creation.public();
    }
    let id = creation.id;

    let mut store = ctx.open_store()?;
    store.add_creation(creation);
    let line = format!("Saved {} {} in {}", kind, id, current_name(&store));
    ctx.done(&store, &line)
}

pub fn like(ctx: &Context, id: Uuid) -> Result<()> {
    let mut store = ctx.open_store()?;
    if !store.like_creation(id) {
        anyhow::bail!("No community creation with id {}", id);
    }
    ctx.done(&store, "Liked")
}

pub fn follow(ctx: &Context, user: &str, follow: bool) -> Result<()> {
    let mut store = ctx.open_store()?;
    let changed = if follow {
        store.follow_user(user)
    } else {
        store.unfollow_user(user)
    };
    let line = match (follow, changed) {
        (true, true) => format!("Following {}", user),
        (true, false) => format!("Already following {}", user),
        (false, true) => format!("Unfollowed {}", user),
        (false, false) => format!("Not following {}", user),
    };
    ctx.done(&store, &line)
}

pub fn peer(ctx: &Context, id: &str, add: bool) -> Result<()> {
    let mut store = ctx.open_store()?;
    if add {
        store.add_peer(id);
    } else {
        store.remove_peer(id);
    }
    let line = format!("{} connected peer(s)", store.connected_peers().len());
    ctx.done(&store, &line)
}

pub fn report(ctx: &Context, share: bool) -> Result<()> {
    let store = ctx.open_store()?;
    let report = CompletionReport::build(&store);
    if ctx.json {
        return print_json(&report);
    }
    if share {
        println!("{}", report.share_text());
        return Ok(());
    }
    if !store.state().game_completed {
        println!("{}", ctx.painter.warn("The course is not finished yet."));
    }
    println!("{}", report);
    Ok(())
}

pub fn reset(ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    store.reset_game();
    ctx.done(&store, "Progress reset")
}

pub fn config(mut ctx: Context, set: Option<String>) -> Result<()> {
    if let Some(assignment) = set {
        let (key, value) = assignment
            .split_once('=')
            .with_context(|| format!("Expected key=value, got '{}'", assignment))?;
        let config = &mut ctx.config;
        match key.trim() {
            "storage.data_dir" => config.storage.data_dir = Some(PathBuf::from(value.trim())),
            "storage.autosave" => {
                config.storage.autosave = value
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid autosave value '{}'", value))?
            }
            "logging.level" => config.logging.level = value.trim().to_string(),
            "output.color" => config.set_color_mode(value.trim())?,
            other => anyhow::bail!(
                "Unknown key '{}'. Valid keys: storage.data_dir, storage.autosave, logging.level, output.color",
                other
            ),
        }
        config.save()?;
    }

    if ctx.json {
        return print_json(&ctx.config);
    }
    let p = &ctx.painter;
    let data_dir = ctx.config.data_dir()?;
    p.kv("data_dir", &data_dir.display().to_string());
    p.kv("autosave", &ctx.config.storage.autosave.to_string());
    p.kv("log_level", &ctx.config.logging.level);
    p.kv("color", &format!("{:?}", ctx.config.output.color).to_lowercase());
    if let Ok(path) = NucleoConfig::user_config_path() {
        println!("{}", p.dim(&format!("config: {}", path.display())));
    }
    Ok(())
}

fn current_name(store: &ProgressStore) -> String {
    store
        .current_module()
        .map(|m| format!("{} {}", m.icon, m.name))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decision() {
        let decision = parse_decision("metro-cameras:audit:positive:15").unwrap();
        assert_eq!(decision.scenario_id, "metro-cameras");
        assert_eq!(decision.choice, "audit");
        assert_eq!(decision.impact, Impact::Positive);
        assert_eq!(decision.social_score, 15);

        let decision = parse_decision("a:b:negative:-5").unwrap();
        assert_eq!(decision.social_score, -5);
    }

    #[test]
    fn test_parse_decision_rejects_bad_input() {
        assert!(parse_decision("a:b:positive").is_err());
        assert!(parse_decision("a:b:great:1").is_err());
        assert!(parse_decision("a:b:positive:lots").is_err());
    }

    #[test]
    fn test_parse_creation() {
        let creation = parse_creation("chatbot:Parcero bot").unwrap();
        assert_eq!(creation.kind, CreationKind::Chatbot);
        assert_eq!(creation.title, "Parcero bot");
        assert!(!creation.is_public);

        let creation = parse_creation("vision_analysis:Metro:public").unwrap();
        assert_eq!(creation.kind, CreationKind::VisionAnalysis);
        assert!(creation.is_public);
    }

    #[test]
    fn test_parse_creation_rejects_bad_input() {
        assert!(parse_creation("art").is_err());
        assert!(parse_creation("sculpture:David").is_err());
        assert!(parse_creation("art: ").is_err());
        assert!(parse_creation("art:Mural:private").is_err());
    }

    #[test]
    fn test_complete_attaches_creations() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(NucleoConfig::default(), Some(dir.path().to_path_buf()), true);
        let creations = vec![
            parse_creation("art:Mural:public").unwrap(),
            parse_creation("story:Cuento").unwrap(),
        ];
        complete(&ctx, 95, Vec::new(), Vec::new(), creations).unwrap();

        let store = ctx.open_store().unwrap();
        let profile = store.user_profile();
        assert_eq!(profile.creativity_score, 20);
        assert_eq!(profile.neurotokens, 100 + 9 + 50 + 100);
        assert_eq!(store.modules()[0].creations.len(), 2);
    }

    #[test]
    fn test_train_finish_needs_fundamentals_active() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(NucleoConfig::default(), Some(dir.path().to_path_buf()), true);
        let mut store = ctx.open_store().unwrap();
        store.set_current_module(5);

        let mut attempt = ModuleAttempt::new();
        attempt.add_points(170);
        assert!(finish_module(&ctx, &mut store, MODULE_IDS[0], attempt.clone()).is_err());
        assert!(!store.modules()[5].completed);
        assert!(!store.modules()[0].completed);

        store.set_current_module(0);
        finish_module(&ctx, &mut store, MODULE_IDS[0], attempt).unwrap();
        assert!(store.modules()[0].completed);
        assert_eq!(store.module("fundamentals").unwrap().score, 170);
    }
}
