//! Shared data model for the Nucleo learning course.
//!
//! Everything the progress store owns lives here: the learner profile, the
//! fixed curriculum, creations, achievements, ethical decisions and the
//! collaboration placeholder. No I/O happens in this crate beyond serde.

pub mod achievements;
pub mod collaboration;
pub mod content;
pub mod creation;
pub mod curriculum;
pub mod decisions;
pub mod error;
pub mod profile;
pub mod state;

pub use achievements::{Achievement, AchievementCategory, Rarity};
pub use collaboration::{CollaborationSession, SessionKind, SessionStatus};
pub use content::{EthicsCase, EthicsOption, ImpactProject};
pub use creation::{Creation, CreationKind, CreationPatch};
pub use curriculum::{Difficulty, ModuleOutcome, ModuleProgress};
pub use decisions::{DecisionStats, EthicalDecision, Impact};
pub use error::{NucleoError, Result};
pub use profile::{Avatar, AvatarPatch, PreferencesPatch, ProfilePatch, UserPreferences, UserProfile};
pub use state::GameState;

/// Key the whole state blob is persisted under.
pub const STORAGE_KEY: &str = "nucleo-colectivo-ia-v3-game-state";

/// Schema version written into every persisted blob.
pub const SCHEMA_VERSION: u32 = 3;
