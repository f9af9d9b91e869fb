//! Life event catalog: definitions, eligibility conditions, and application.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;
use thiserror::Error;

use crate::profile::{PlayerProfile, SocialStatus};

const DEFAULT_EVENTS_DATA: &str = include_str!("../assets/data/events.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Positive,
    Negative,
    Neutral,
}

/// Eligibility predicate over a player profile, expressed as data so the
/// catalog can live in a JSON asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    NotSocialStatus { status: SocialStatus },
    SocialStatusIn { statuses: Vec<SocialStatus> },
    /// Strictly greater than `min`.
    KarmaAbove { min: f64 },
    All { conditions: Vec<Condition> },
}

impl Condition {
    #[must_use]
    pub fn holds_for(&self, profile: &PlayerProfile) -> bool {
        match self {
            Self::NotSocialStatus { status } => profile.social_status != *status,
            Self::SocialStatusIn { statuses } => statuses.contains(&profile.social_status),
            Self::KarmaAbove { min } => profile.karma > *min,
            Self::All { conditions } => conditions.iter().all(|c| c.holds_for(profile)),
        }
    }
}

/// Immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: String,
    pub category: EventCategory,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub karma_effect: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub money_effect: Option<f64>,
    /// Catalog-relative weight; weights are not normalized to any total.
    pub probability: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl GameEvent {
    #[must_use]
    pub fn is_eligible(&self, profile: &PlayerProfile) -> bool {
        self.condition
            .as_ref()
            .is_none_or(|condition| condition.holds_for(profile))
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("event catalog JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
    #[error("event at position {index} has an empty id")]
    EmptyId { index: usize },
    #[error("duplicate event id `{id}`")]
    DuplicateId { id: String },
    #[error("event `{id}` has invalid weight {weight}")]
    InvalidWeight { id: String, weight: f64 },
}

/// Ordered table of every possible life event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventCatalog {
    #[serde(default)]
    pub events: Vec<GameEvent>,
}

impl EventCatalog {
    #[must_use]
    pub const fn empty() -> Self {
        Self { events: Vec::new() }
    }

    /// Build a catalog from already-constructed events.
    ///
    /// # Errors
    ///
    /// Returns an error if any event fails validation.
    pub fn from_events(events: Vec<GameEvent>) -> Result<Self, CatalogError> {
        let catalog = Self { events };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse and validate a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or an event fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check ids are present and unique and weights are usable.
    ///
    /// # Errors
    ///
    /// Returns the first violation found, in catalog order.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for (index, event) in self.events.iter().enumerate() {
            if event.id.trim().is_empty() {
                return Err(CatalogError::EmptyId { index });
            }
            if !seen.insert(event.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    id: event.id.clone(),
                });
            }
            if !event.probability.is_finite() || event.probability < 0.0 {
                return Err(CatalogError::InvalidWeight {
                    id: event.id.clone(),
                    weight: event.probability,
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<&GameEvent> {
        self.events.iter().find(|event| event.id == id)
    }

    pub fn by_category(&self, category: EventCategory) -> impl Iterator<Item = &GameEvent> {
        self.events
            .iter()
            .filter(move |event| event.category == category)
    }

    /// Events whose condition holds for `profile`, in catalog order.
    pub fn eligible<'a, 'p>(
        &'a self,
        profile: &'p PlayerProfile,
    ) -> impl Iterator<Item = &'a GameEvent> + use<'a, 'p> {
        self.events
            .iter()
            .filter(move |event| event.is_eligible(profile))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GameEvent> {
        self.events.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<'a> IntoIterator for &'a EventCatalog {
    type Item = &'a GameEvent;
    type IntoIter = std::slice::Iter<'a, GameEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Parse the catalog embedded in the crate.
///
/// # Errors
///
/// Returns an error if the embedded asset fails to parse or validate.
pub fn load_builtin_catalog() -> Result<EventCatalog, CatalogError> {
    EventCatalog::from_json(DEFAULT_EVENTS_DATA)
}

/// Shared copy of the embedded catalog. Falls back to an empty catalog if the
/// asset is unusable, which disables events rather than aborting.
#[must_use]
pub fn builtin_catalog() -> &'static EventCatalog {
    static CATALOG: OnceLock<EventCatalog> = OnceLock::new();
    CATALOG.get_or_init(|| {
        load_builtin_catalog().unwrap_or_else(|err| {
            log::error!("embedded event catalog rejected: {err}");
            EventCatalog::empty()
        })
    })
}

/// Apply an event's karma and money effects to a profile.
#[must_use]
pub fn apply_event(profile: &PlayerProfile, event: &GameEvent) -> PlayerProfile {
    let mut updated = profile.clone();
    if let Some(karma) = event.karma_effect {
        updated = updated.apply_karma(karma);
    }
    if let Some(money) = event.money_effect {
        updated = updated.apply_balance(money);
    }
    updated
}
