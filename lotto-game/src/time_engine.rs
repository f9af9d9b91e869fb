//! Day-by-day simulation: monthly settlement, draw-day signalling, and life events.
use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::VecDeque;

use crate::calendar::SimClock;
use crate::constants::WEEKS_PER_MONTH;
use crate::events::{EventCatalog, GameEvent, apply_event};
use crate::profile::PlayerProfile;
use crate::selector::{roll_event_gate, select_event_with_trace};

/// Decides, once per simulated day, whether a life event happens and which.
pub trait EventSource {
    fn roll(&mut self, profile: &PlayerProfile) -> Option<GameEvent>;
}

/// Production source: the fixed-chance gate followed by the weighted selector.
#[derive(Debug)]
pub struct CatalogEvents<'a, R: ?Sized> {
    catalog: &'a EventCatalog,
    chance_pct: f64,
    rng: &'a mut R,
}

impl<'a, R> CatalogEvents<'a, R>
where
    R: Rng + ?Sized,
{
    pub fn new(catalog: &'a EventCatalog, chance_pct: f64, rng: &'a mut R) -> Self {
        Self {
            catalog,
            chance_pct,
            rng,
        }
    }
}

impl<R> EventSource for CatalogEvents<'_, R>
where
    R: Rng + ?Sized,
{
    fn roll(&mut self, profile: &PlayerProfile) -> Option<GameEvent> {
        if !roll_event_gate(self.chance_pct, &mut *self.rng) {
            return None;
        }
        let pick = select_event_with_trace(self.catalog, profile, &mut *self.rng)?;
        log::debug!(
            "event gate passed | chose {} (roll {:.2} of {:.2})",
            pick.trace.chosen_id,
            pick.trace.roll,
            pick.trace.total_weight
        );
        Some(pick.event.clone())
    }
}

/// Never fires. Used when events are switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEvents;

impl EventSource for NoEvents {
    fn roll(&mut self, _profile: &PlayerProfile) -> Option<GameEvent> {
        None
    }
}

/// Replays a fixed per-day script; quiet once the script runs out.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEvents {
    script: VecDeque<Option<GameEvent>>,
}

impl ScriptedEvents {
    #[must_use]
    pub fn new(script: impl IntoIterator<Item = Option<GameEvent>>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }
}

impl EventSource for ScriptedEvents {
    fn roll(&mut self, _profile: &PlayerProfile) -> Option<GameEvent> {
        self.script.pop_front().flatten()
    }
}

/// Something that happened on a simulated day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Occurrence {
    /// Monthly settlement; `net` may be negative.
    Salary { income: f64, expenses: f64, net: f64 },
    DrawDay,
    Event {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        karma: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        money: Option<f64>,
    },
}

pub type OccurrenceSet = SmallVec<[Occurrence; 3]>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayReport {
    pub date: NaiveDate,
    #[serde(default)]
    pub occurrences: OccurrenceSet,
}

impl DayReport {
    #[must_use]
    pub fn is_draw_day(&self) -> bool {
        self.occurrences
            .iter()
            .any(|o| matches!(o, Occurrence::DrawDay))
    }

    #[must_use]
    pub fn salary(&self) -> Option<f64> {
        self.occurrences.iter().find_map(|o| match o {
            Occurrence::Salary { net, .. } => Some(*net),
            _ => None,
        })
    }

    #[must_use]
    pub fn event_id(&self) -> Option<&str> {
        self.occurrences.iter().find_map(|o| match o {
            Occurrence::Event { id, .. } => Some(id.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvanceOutcome {
    pub clock: SimClock,
    pub profile: PlayerProfile,
    pub days: Vec<DayReport>,
}

impl AdvanceOutcome {
    #[must_use]
    pub fn salary_days(&self) -> usize {
        self.days.iter().filter(|d| d.salary().is_some()).count()
    }

    #[must_use]
    pub fn draw_days(&self) -> usize {
        self.days.iter().filter(|d| d.is_draw_day()).count()
    }

    #[must_use]
    pub fn events_fired(&self) -> usize {
        self.days.iter().filter(|d| d.event_id().is_some()).count()
    }

    /// Whether the final simulated day is a draw day.
    #[must_use]
    pub fn ends_on_draw_day(&self) -> bool {
        self.days.last().is_some_and(DayReport::is_draw_day)
    }
}

/// Advance `days` days using the default monthly scale.
pub fn advance<E>(
    clock: SimClock,
    profile: &PlayerProfile,
    days: u32,
    events: &mut E,
) -> AdvanceOutcome
where
    E: EventSource + ?Sized,
{
    advance_with_scale(clock, profile, days, WEEKS_PER_MONTH, events)
}

/// Advance one day at a time. Each day: move the clock, settle on the first
/// of the month, flag draw weekdays, then give the event source a chance.
pub fn advance_with_scale<E>(
    clock: SimClock,
    profile: &PlayerProfile,
    days: u32,
    weeks_per_month: f64,
    events: &mut E,
) -> AdvanceOutcome
where
    E: EventSource + ?Sized,
{
    let mut clock = clock;
    let mut profile = profile.clone();
    let mut reports = Vec::with_capacity(days as usize);

    for _ in 0..days {
        clock = clock.next_day();
        let mut occurrences = OccurrenceSet::new();

        if clock.is_salary_day() {
            let income = profile.weekly_income * weeks_per_month;
            let expenses = profile.fixed_expenses * weeks_per_month;
            let net = income - expenses;
            profile = profile.apply_balance(net);
            log::debug!(
                "{} salary settled | income {income:.2} expenses {expenses:.2} net {net:+.2}",
                clock.date()
            );
            occurrences.push(Occurrence::Salary {
                income,
                expenses,
                net,
            });
        }

        if clock.is_draw_day() {
            occurrences.push(Occurrence::DrawDay);
        }

        if let Some(event) = events.roll(&profile) {
            profile = apply_event(&profile, &event);
            log::debug!(
                "{} event {} | karma {:?} money {:?}",
                clock.date(),
                event.id,
                event.karma_effect,
                event.money_effect
            );
            occurrences.push(Occurrence::Event {
                id: event.id,
                karma: event.karma_effect,
                money: event.money_effect,
            });
        }

        reports.push(DayReport {
            date: clock.date(),
            occurrences,
        });
    }

    AdvanceOutcome {
        clock,
        profile,
        days: reports,
    }
}
