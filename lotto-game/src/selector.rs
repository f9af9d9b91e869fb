//! Daily event gate and weighted selection over the eligible catalog.
//!
//! Two independent probability spaces are involved: a fixed-chance gate
//! decides whether anything happens today, and only then the catalog weights
//! decide what happens. Weights are relative to the eligible pool and never
//! normalized against the gate.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::EVENT_POOL_ID;
use crate::events::{EventCatalog, GameEvent};
use crate::profile::PlayerProfile;

/// Explainability telemetry for a weighted pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDecisionTrace {
    /// Identifier for the selection pool.
    pub pool_id: String,
    /// Random draw used to select from the weighted pool, in `[0, total)`.
    pub roll: f64,
    pub total_weight: f64,
    /// Eligible candidates in catalog order.
    pub candidates: Vec<WeightedCandidate>,
    pub chosen_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedCandidate {
    pub id: String,
    pub weight: f64,
    pub cumulative: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventPick<'a> {
    pub event: &'a GameEvent,
    pub trace: EventDecisionTrace,
}

/// Bernoulli trial deciding whether any event is considered today.
pub fn roll_event_gate<R>(chance_pct: f64, rng: &mut R) -> bool
where
    R: Rng + ?Sized,
{
    let chance = if chance_pct.is_finite() {
        (chance_pct / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    };
    rng.r#gen::<f64>() < chance
}

/// Pick at most one eligible event, weighted by `probability`.
pub fn select_event<'a, R>(
    catalog: &'a EventCatalog,
    profile: &PlayerProfile,
    rng: &mut R,
) -> Option<&'a GameEvent>
where
    R: Rng + ?Sized,
{
    select_event_with_trace(catalog, profile, rng).map(|pick| pick.event)
}

/// Same as [`select_event`], also returning the decision trace.
pub fn select_event_with_trace<'a, R>(
    catalog: &'a EventCatalog,
    profile: &PlayerProfile,
    rng: &mut R,
) -> Option<EventPick<'a>>
where
    R: Rng + ?Sized,
{
    let eligible: Vec<&GameEvent> = catalog.eligible(profile).collect();
    if eligible.is_empty() {
        return None;
    }

    let total_weight: f64 = eligible
        .iter()
        .map(|event| event.probability.max(0.0))
        .sum();
    if total_weight <= 0.0 {
        return None;
    }

    let roll = rng.r#gen::<f64>() * total_weight;
    let mut cumulative = 0.0_f64;
    let mut candidates = Vec::with_capacity(eligible.len());
    let mut chosen: Option<&GameEvent> = None;
    let mut last_positive: Option<&GameEvent> = None;

    for event in eligible.iter().copied() {
        let weight = event.probability.max(0.0);
        cumulative += weight;
        candidates.push(WeightedCandidate {
            id: event.id.clone(),
            weight,
            cumulative,
        });
        // Zero-weight entries can never be selected, even when roll is 0.
        if weight <= 0.0 {
            continue;
        }
        last_positive = Some(event);
        if chosen.is_none() && cumulative >= roll {
            chosen = Some(event);
        }
    }

    let event = chosen.or(last_positive)?;
    log::trace!(
        "event pick | roll {roll:.3}/{total_weight:.3} among {} -> {}",
        eligible.len(),
        event.id
    );

    Some(EventPick {
        event,
        trace: EventDecisionTrace {
            pool_id: String::from(EVENT_POOL_ID),
            roll,
            total_weight,
            candidates,
            chosen_id: event.id.clone(),
        },
    })
}
