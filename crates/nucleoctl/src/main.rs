//! Nucleo Control - terminal client for the Nucleo learning course
//!
//! Every invocation opens the local progress store, applies one command
//! and exits. State is written back on each change.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use nucleo_common::model::{Creation, CreationKind, EthicalDecision};
use nucleo_common::NucleoConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Log filter override, e.g. NUCLEO_LOG=nucleo_common=debug
const LOG_ENV: &str = "NUCLEO_LOG";

#[derive(Parser)]
#[command(name = "nucleoctl")]
#[command(about = "Nucleo Colectivo - interactive AI course", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding the saved progress
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log store activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the learner profile and module progress
    Status,

    /// Start (or restart the timer of) the game
    Start {
        /// Set the learner's display name
        #[arg(long)]
        name: Option<String>,
    },

    /// Make the module at INDEX the active one
    Visit { index: usize },

    /// Finish the active module
    Complete {
        #[arg(long)]
        score: u32,

        /// Badge id earned in this attempt (repeatable)
        #[arg(long = "achievement")]
        achievements: Vec<String>,

        /// Ethical decision as scenario:choice:impact:social (repeatable)
        #[arg(long = "decision", value_parser = commands::parse_decision)]
        decisions: Vec<EthicalDecision>,

        /// Creation as kind:title or kind:title:public (repeatable)
        #[arg(long = "creation", value_parser = commands::parse_creation)]
        creations: Vec<Creation>,
    },

    /// Run a training simulation
    Train {
        /// image-classifier, sentiment-analyzer or music-recommender
        scenario: String,

        /// Finish the fundamentals module with the simulation's result;
        /// fundamentals must be the active module
        #[arg(long)]
        finish: bool,
    },

    /// Unlock a badge from the catalog
    Unlock { id: String },

    /// Credit or spend neurotokens
    Tokens {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Save a creation into the active module
    Create {
        kind: CreationKind,
        title: String,

        #[arg(long)]
        description: Option<String>,

        /// Share it in the community gallery
        #[arg(long)]
        public: bool,
    },

    /// Like a community creation
    Like { id: uuid::Uuid },

    /// Follow another learner
    Follow { user: String },

    /// Stop following a learner
    Unfollow { user: String },

    /// Track connected collaboration peers
    Peer {
        #[command(subcommand)]
        action: PeerAction,
    },

    /// Show the completion report
    Report {
        /// Print the share text instead
        #[arg(long)]
        share: bool,
    },

    /// Start over, keeping only the learner's name
    Reset,

    /// Show or change configuration
    Config {
        /// Set a configuration value (key=value)
        #[arg(long)]
        set: Option<String>,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    Add { amount: u64, reason: String },
    Spend { amount: u64, item: String },
}

#[derive(Subcommand)]
enum PeerAction {
    Add { id: String },
    Remove { id: String },
}

fn init_logging(config: &NucleoConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.logging.level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = NucleoConfig::load()?;
    init_logging(&config, cli.verbose);

    let ctx = commands::Context::new(config, cli.data_dir, cli.json);

    match cli.command {
        Commands::Status => commands::status(&ctx),
        Commands::Start { name } => commands::start(&ctx, name),
        Commands::Visit { index } => commands::visit(&ctx, index),
        Commands::Complete {
            score,
            achievements,
            decisions,
            creations,
        } => commands::complete(&ctx, score, achievements, decisions, creations),
        Commands::Train { scenario, finish } => commands::train(&ctx, &scenario, finish),
        Commands::Unlock { id } => commands::unlock(&ctx, &id),
        Commands::Tokens { action } => match action {
            TokenAction::Add { amount, reason } => commands::add_tokens(&ctx, amount, &reason),
            TokenAction::Spend { amount, item } => commands::spend_tokens(&ctx, amount, &item),
        },
        Commands::Create { kind, title, description, public } => {
            commands::create(&ctx, kind, title, description, public)
        }
        Commands::Like { id } => commands::like(&ctx, id),
        Commands::Follow { user } => commands::follow(&ctx, &user, true),
        Commands::Unfollow { user } => commands::follow(&ctx, &user, false),
        Commands::Peer { action } => match action {
            PeerAction::Add { id } => commands::peer(&ctx, &id, true),
            PeerAction::Remove { id } => commands::peer(&ctx, &id, false),
        },
        Commands::Report { share } => commands::report(&ctx, share),
        Commands::Reset => commands::reset(&ctx),
        Commands::Config { set } => commands::config(ctx, set),
    }
}
