//! Ethical decisions recorded in scenario modules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::NucleoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Positive,
    Negative,
    Neutral,
}

impl FromStr for Impact {
    type Err = NucleoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "positive" | "+" => Ok(Impact::Positive),
            "negative" | "-" => Ok(Impact::Negative),
            "neutral" | "0" => Ok(Impact::Neutral),
            _ => Err(NucleoError::InvalidValue {
                field: "impact",
                value: s.to_string(),
            }),
        }
    }
}

/// A scenario choice and its social-impact contribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EthicalDecision {
    pub scenario_id: String,
    pub choice: String,
    #[serde(default)]
    pub reasoning: String,
    pub impact: Impact,
    pub social_score: i64,
    pub timestamp: DateTime<Utc>,
}

impl EthicalDecision {
    pub fn new(
        scenario_id: impl Into<String>,
        choice: impl Into<String>,
        impact: Impact,
        social_score: i64,
    ) -> Self {
        Self {
            scenario_id: scenario_id.into(),
            choice: choice.into(),
            reasoning: String::new(),
            impact,
            social_score,
            timestamp: Utc::now(),
        }
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }
}

/// Aggregate view over every recorded decision
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionStats {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub average_social_score: f64,
    pub total: usize,
}

impl DecisionStats {
    pub fn from_decisions<'a>(decisions: impl IntoIterator<Item = &'a EthicalDecision>) -> Self {
        let mut stats = Self::default();
        let mut social_sum = 0i64;

        for decision in decisions {
            match decision.impact {
                Impact::Positive => stats.positive += 1,
                Impact::Negative => stats.negative += 1,
                Impact::Neutral => stats.neutral += 1,
            }
            social_sum += decision.social_score;
            stats.total += 1;
        }

        stats.average_social_score = if stats.total == 0 {
            0.0
        } else {
            social_sum as f64 / stats.total as f64
        };
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats() {
        let none: Vec<EthicalDecision> = Vec::new();
        let stats = DecisionStats::from_decisions(&none);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_social_score, 0.0);
        assert!(!stats.average_social_score.is_nan());
    }

    #[test]
    fn test_stats_counts() {
        let decisions = vec![
            EthicalDecision::new("surveillance", "ban", Impact::Positive, 30),
            EthicalDecision::new("surveillance", "allow", Impact::Negative, -10),
            EthicalDecision::new("hiring", "audit", Impact::Positive, 20),
            EthicalDecision::new("hiring", "ignore", Impact::Neutral, 0),
        ];
        let stats = DecisionStats::from_decisions(&decisions);
        assert_eq!(stats.positive, 2);
        assert_eq!(stats.negative, 1);
        assert_eq!(stats.neutral, 1);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.average_social_score, 10.0);
    }

    #[test]
    fn test_impact_parsing() {
        assert_eq!("Positive".parse::<Impact>().unwrap(), Impact::Positive);
        assert!("maybe".parse::<Impact>().is_err());
    }
}
