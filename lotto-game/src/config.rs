//! Tunable engine configuration with serde defaults and validation.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{EVENT_CHANCE_PCT, PROFILE_CANDIDATES, TICKET_COST, WEEKS_PER_MONTH};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Daily chance, in percent, that any life event is considered.
    #[serde(default = "EngineConfig::default_event_chance_pct")]
    pub event_chance_pct: f64,
    /// Multiplier turning weekly income and expenses into a monthly settlement.
    #[serde(default = "EngineConfig::default_weeks_per_month")]
    pub weeks_per_month: f64,
    #[serde(default = "EngineConfig::default_ticket_cost")]
    pub ticket_cost: f64,
    #[serde(default = "EngineConfig::default_candidate_count")]
    pub candidate_count: usize,
}

impl EngineConfig {
    #[must_use]
    pub const fn default_event_chance_pct() -> f64 {
        EVENT_CHANCE_PCT
    }

    #[must_use]
    pub const fn default_weeks_per_month() -> f64 {
        WEEKS_PER_MONTH
    }

    #[must_use]
    pub const fn default_ticket_cost() -> f64 {
        TICKET_COST
    }

    #[must_use]
    pub const fn default_candidate_count() -> usize {
        PROFILE_CANDIDATES
    }

    /// Parse a configuration overlay from JSON, filling omitted fields with
    /// defaults, and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error when the JSON is malformed or a field is out of bounds.
    pub fn from_json(json: &str) -> Result<Self, EngineConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns `EngineConfigError` when any field violates its bounds.
    pub fn validate(&self) -> Result<(), EngineConfigError> {
        if !self.event_chance_pct.is_finite() || !(0.0..=100.0).contains(&self.event_chance_pct) {
            return Err(EngineConfigError::RangeViolation {
                field: "event_chance_pct",
                min: 0.0,
                max: 100.0,
                value: self.event_chance_pct,
            });
        }
        if !self.weeks_per_month.is_finite() || self.weeks_per_month <= 0.0 {
            return Err(EngineConfigError::MinViolation {
                field: "weeks_per_month",
                min: 0.0,
                value: self.weeks_per_month,
            });
        }
        if !self.ticket_cost.is_finite() || self.ticket_cost <= 0.0 {
            return Err(EngineConfigError::MinViolation {
                field: "ticket_cost",
                min: 0.0,
                value: self.ticket_cost,
            });
        }
        if self.candidate_count == 0 {
            return Err(EngineConfigError::NoCandidates);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            event_chance_pct: Self::default_event_chance_pct(),
            weeks_per_month: Self::default_weeks_per_month(),
            ticket_cost: Self::default_ticket_cost(),
            candidate_count: Self::default_candidate_count(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineConfigError {
    #[error("engine config JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be greater than {min:.2} (got {value:.2})")]
    MinViolation {
        field: &'static str,
        min: f64,
        value: f64,
    },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("candidate_count must be at least 1")]
    NoCandidates,
}
