//! Progress store and its collaborators for the Nucleo learning course.
//!
//! `ProgressStore` is the single owner of the learner's state. Everything
//! else in this crate either feeds it (course flow, module labs, training),
//! keeps it durable (persistence) or reads from it (completion report).

pub mod config;
pub mod course;
pub mod labs;
pub mod observer;
pub mod persistence;
pub mod queries;
pub mod report;
pub mod store;
pub mod training;

pub use config::NucleoConfig;
pub use course::{CourseSession, CourseStep, ModuleAttempt};
pub use labs::{ConversationLab, EthicsLab, GenerativeLab, NeuralLab, Personality, VisionLab};
pub use observer::{StateObserver, SubscriptionId};
pub use persistence::{FileBackend, LoadOutcome, MemoryBackend, StateBackend};
pub use report::{CompletionReport, PerformanceTier};
pub use store::{ProgressStore, StoreOptions};
pub use training::{FundamentalsLab, TrainingOutcome, TrainingRun, TrainingScenario, TrainingTick};

pub use nucleo_shared as model;
