//! Content libraries the ethics and community screens read from.

use crate::decisions::{EthicalDecision, Impact};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Completed,
    Planned,
}

/// A real-world community AI project showcased in the course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactProject {
    pub id: String,
    pub name: String,
    pub organization: String,
    pub description: String,
    #[serde(default)]
    pub ai_technology: Vec<String>,
    pub social_impact: String,
    pub status: ProjectStatus,
    pub participants: u32,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseContext {
    Medellin,
    Colombia,
    Global,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    High,
    Medium,
    Low,
}

impl Rating {
    /// How a choice with this social impact is classified
    pub fn impact(&self) -> Impact {
        match self {
            Rating::High => Impact::Positive,
            Rating::Medium => Impact::Neutral,
            Rating::Low => Impact::Negative,
        }
    }

    pub fn social_score(&self) -> i64 {
        match self {
            Rating::High => 20,
            Rating::Medium => 10,
            Rating::Low => -10,
        }
    }
}

/// One answer to an ethics case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EthicsOption {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub consequences: Vec<String>,
    #[serde(default)]
    pub ethical_principles: Vec<String>,
    pub social_impact: Rating,
    pub technical_feasibility: Rating,
}

/// A case study learners decide in the ethics module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EthicsCase {
    pub id: String,
    pub title: String,
    pub scenario: String,
    pub context: CaseContext,
    #[serde(default)]
    pub stakeholders: Vec<String>,
    pub options: Vec<EthicsOption>,
    #[serde(default)]
    pub real_outcome: Option<String>,
    #[serde(default)]
    pub discussion_points: Vec<String>,
}

impl EthicsCase {
    pub fn option(&self, option_id: &str) -> Option<&EthicsOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    /// Record choosing `option_id`, scored by the option's social impact.
    /// `None` when the case has no such option.
    pub fn decide(&self, option_id: &str, reasoning: &str) -> Option<EthicalDecision> {
        let option = self.option(option_id)?;
        let rating = option.social_impact;
        Some(
            EthicalDecision::new(&self.id, &option.id, rating.impact(), rating.social_score())
                .with_reasoning(reasoning),
        )
    }
}
