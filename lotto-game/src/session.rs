//! Player-facing session binding a chosen profile to its simulated calendar.
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use thiserror::Error;

use crate::calendar::{self, SimClock};
use crate::config::EngineConfig;
use crate::draw::{self, DrawNumbers, PrizeTier, Ticket};
use crate::events::EventCatalog;
use crate::profile::{PlayerProfile, offer_candidates};
use crate::rng::RngBundle;
use crate::stats::PlayStats;
use crate::time_engine::{AdvanceOutcome, CatalogEvents, advance_with_scale};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlayError {
    #[error("no player profile has been chosen")]
    NoProfile,
    #[error("insufficient funds: balance {balance:.2} is below the ticket cost {cost:.2}")]
    InsufficientFunds { balance: f64, cost: f64 },
}

/// Result of one played ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketOutcome {
    pub numbers: Ticket,
    pub drawn: DrawNumbers,
    pub matches: usize,
    pub tier: PrizeTier,
    pub payout: f64,
    /// Large enough a win to celebrate.
    pub celebration: bool,
}

/// Persistable part of a session: everything except the RNG streams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub profile: Option<PlayerProfile>,
    pub clock: SimClock,
    pub stats: PlayStats,
}

/// High-level session binding the clock, the chosen profile, and play
/// statistics to a catalog and a set of seeded random streams.
#[derive(Debug)]
pub struct LotterySession {
    seed: u64,
    clock: SimClock,
    profile: Option<PlayerProfile>,
    stats: PlayStats,
    config: EngineConfig,
    catalog: EventCatalog,
    rngs: Rc<RngBundle>,
}

impl LotterySession {
    /// Fresh session with no profile chosen yet.
    #[must_use]
    pub fn new(seed: u64, start: SimClock, catalog: EventCatalog, config: EngineConfig) -> Self {
        log::info!("session created | seed {seed:#x} start {}", start.date());
        Self {
            seed,
            clock: start,
            profile: None,
            stats: PlayStats::default(),
            config,
            catalog,
            rngs: Rc::new(RngBundle::from_user_seed(seed)),
        }
    }

    /// Resume from a stored snapshot. Random streams restart from `seed`.
    #[must_use]
    pub fn from_snapshot(
        snapshot: SessionSnapshot,
        seed: u64,
        catalog: EventCatalog,
        config: EngineConfig,
    ) -> Self {
        let mut session = Self::new(seed, snapshot.clock, catalog, config);
        session.profile = snapshot.profile;
        session.stats = snapshot.stats;
        session
    }

    /// Candidate profiles for the player to pick from.
    #[must_use]
    pub fn offer_profiles(&self) -> Vec<PlayerProfile> {
        let mut rng = self.rngs.profiles();
        offer_candidates(&mut *rng, self.config.candidate_count)
    }

    pub fn choose_profile(&mut self, profile: PlayerProfile) {
        log::info!(
            "profile chosen | {} ({}) balance {:.2}",
            profile.name,
            profile.social_status.label(),
            profile.balance
        );
        self.profile = Some(profile);
    }

    /// Forget the profile. Clock and stats are kept.
    pub fn reset_profile(&mut self) {
        log::info!("profile reset");
        self.profile = None;
    }

    pub fn reset_stats(&mut self) {
        self.stats = PlayStats::reset();
    }

    /// Run the time engine for `days` days with live events.
    ///
    /// # Errors
    ///
    /// Returns `PlayError::NoProfile` when no profile has been chosen.
    pub fn advance_days(&mut self, days: u32) -> Result<AdvanceOutcome, PlayError> {
        let profile = self.profile.as_ref().ok_or(PlayError::NoProfile)?;
        let outcome = {
            let mut rng = self.rngs.events();
            let mut source =
                CatalogEvents::new(&self.catalog, self.config.event_chance_pct, &mut *rng);
            advance_with_scale(
                self.clock,
                profile,
                days,
                self.config.weeks_per_month,
                &mut source,
            )
        };
        self.clock = outcome.clock;
        self.profile = Some(outcome.profile.clone());
        Ok(outcome)
    }

    /// Jump straight to the next draw day.
    ///
    /// # Errors
    ///
    /// Returns `PlayError::NoProfile` when no profile has been chosen.
    pub fn advance_to_next_draw(&mut self) -> Result<AdvanceOutcome, PlayError> {
        self.advance_days(calendar::days_until_next_draw(&self.clock))
    }

    /// Charge a ticket, run a draw, and pay out any winnings.
    ///
    /// # Errors
    ///
    /// Returns `PlayError::NoProfile` without a profile and
    /// `PlayError::InsufficientFunds` when the balance cannot cover the ticket.
    /// Neither case changes any state.
    pub fn play_ticket(&mut self, ticket: Ticket) -> Result<TicketOutcome, PlayError> {
        let cost = self.config.ticket_cost;
        let profile = self.profile.as_ref().ok_or(PlayError::NoProfile)?;
        if !profile.can_afford(cost) {
            return Err(PlayError::InsufficientFunds {
                balance: profile.balance,
                cost,
            });
        }

        let mut profile = profile.record_ticket_played(cost);
        let mut stats = self.stats.record_play(cost);

        let drawn = draw::draw_numbers(&mut *self.rngs.draws());
        let matches = draw::count_matches(ticket.numbers(), &drawn);
        let tier = PrizeTier::from_matches(matches);
        let payout = tier.payout();
        if payout > 0.0 {
            profile = profile.record_winnings(payout);
            stats = stats.record_win(payout);
        }
        log::debug!(
            "ticket {:?} vs {drawn:?} | {matches} matches, payout {payout:.2}",
            ticket.numbers()
        );

        self.profile = Some(profile);
        self.stats = stats;
        Ok(TicketOutcome {
            numbers: ticket,
            drawn,
            matches,
            tier,
            payout,
            celebration: draw::is_celebration(payout),
        })
    }

    /// Random valid ticket from the quick-pick stream.
    #[must_use]
    pub fn quick_pick(&self) -> Ticket {
        draw::quick_pick(&mut *self.rngs.picks())
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            profile: self.profile.clone(),
            clock: self.clock,
            stats: self.stats,
        }
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub const fn clock(&self) -> SimClock {
        self.clock
    }

    #[must_use]
    pub const fn profile(&self) -> Option<&PlayerProfile> {
        self.profile.as_ref()
    }

    #[must_use]
    pub const fn stats(&self) -> PlayStats {
        self.stats
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    /// Shared handle to the session's random streams.
    #[must_use]
    pub fn rng_bundle(&self) -> Rc<RngBundle> {
        Rc::clone(&self.rngs)
    }

    #[must_use]
    pub fn days_until_next_draw(&self) -> u32 {
        calendar::days_until_next_draw(&self.clock)
    }

    #[must_use]
    pub fn days_until_salary(&self) -> u32 {
        calendar::days_until_salary(&self.clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FLOAT_EPSILON;
    use crate::events::builtin_catalog;
    use crate::profile::fixture_profile;
    use chrono::NaiveDate;

    fn start() -> SimClock {
        SimClock::at_date(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())
    }

    fn session(seed: u64) -> LotterySession {
        LotterySession::new(seed, start(), builtin_catalog().clone(), EngineConfig::default())
    }

    #[test]
    fn offers_three_reproducible_candidates() {
        let a = session(42).offer_profiles();
        let b = session(42).offer_profiles();
        assert_eq!(a.len(), 3);
        assert_eq!(a, b);
        assert_ne!(a, session(43).offer_profiles());
    }

    #[test]
    fn actions_without_profile_are_rejected() {
        let mut s = session(1);
        assert_eq!(s.advance_days(3).unwrap_err(), PlayError::NoProfile);
        let ticket = s.quick_pick();
        assert_eq!(s.play_ticket(ticket).unwrap_err(), PlayError::NoProfile);
        assert_eq!(s.clock(), start());
    }

    #[test]
    fn insufficient_funds_leaves_state_untouched() {
        let mut s = session(2);
        s.choose_profile(PlayerProfile {
            balance: 0.5,
            ..fixture_profile()
        });
        let before = s.snapshot();
        let ticket = Ticket::new(&[1, 2, 3, 4, 5, 6]).unwrap();
        let err = s.play_ticket(ticket).unwrap_err();
        assert_eq!(
            err,
            PlayError::InsufficientFunds {
                balance: 0.5,
                cost: 1.0
            }
        );
        assert_eq!(s.snapshot(), before);
        assert_eq!(s.rng_bundle().draws().draws(), 0);
    }

    #[test]
    fn exact_balance_can_still_play() {
        let mut s = session(3);
        s.choose_profile(PlayerProfile {
            balance: 1.0,
            ..fixture_profile()
        });
        let ticket = s.quick_pick();
        assert!(s.play_ticket(ticket).is_ok());
    }

    #[test]
    fn played_ticket_updates_profile_and_stats_consistently() {
        let mut s = session(4);
        s.choose_profile(fixture_profile());
        let mut expected_balance = 100.0;
        for _ in 0..25 {
            let ticket = s.quick_pick();
            let outcome = s.play_ticket(ticket).unwrap();
            expected_balance += outcome.payout - 1.0;
            assert_eq!(outcome.tier, PrizeTier::from_matches(outcome.matches));
            assert_eq!(outcome.celebration, outcome.payout >= 50.0);
            assert_eq!(
                outcome.matches,
                draw::count_matches(outcome.numbers.numbers(), &outcome.drawn)
            );
        }
        let profile = s.profile().unwrap();
        assert_eq!(profile.played_tickets, 25);
        assert_eq!(s.stats().games, 25);
        assert!((profile.balance - expected_balance).abs() < FLOAT_EPSILON);
        assert!((profile.money_spent - s.stats().spent).abs() < FLOAT_EPSILON);
        assert!((profile.money_won - s.stats().won).abs() < FLOAT_EPSILON);
    }

    #[test]
    fn advancing_moves_clock_and_profile() {
        let mut s = session(5);
        s.choose_profile(fixture_profile());
        let outcome = s.advance_days(30).unwrap();
        assert_eq!(s.clock(), outcome.clock);
        assert_eq!(s.profile(), Some(&outcome.profile));
        assert_eq!(s.clock().date(), NaiveDate::from_ymd_opt(2024, 2, 9).unwrap());

        s.advance_to_next_draw().unwrap();
        assert!(s.clock().is_draw_day());
    }

    #[test]
    fn disabled_events_give_pure_settlement() {
        let config = EngineConfig {
            event_chance_pct: 0.0,
            ..EngineConfig::default()
        };
        let mut s = LotterySession::new(6, start(), builtin_catalog().clone(), config);
        s.choose_profile(fixture_profile());
        let outcome = s.advance_days(35).unwrap();
        assert_eq!(outcome.events_fired(), 0);
        assert!((s.profile().unwrap().balance - 500.0).abs() < FLOAT_EPSILON);
    }

    #[test]
    fn reset_profile_keeps_clock_and_stats() {
        let mut s = session(7);
        s.choose_profile(fixture_profile());
        let ticket = s.quick_pick();
        s.play_ticket(ticket).unwrap();
        s.advance_days(2).unwrap();
        let clock = s.clock();
        s.reset_profile();
        assert!(s.profile().is_none());
        assert_eq!(s.clock(), clock);
        assert_eq!(s.stats().games, 1);

        s.reset_stats();
        assert_eq!(s.stats(), PlayStats::default());
    }

    #[test]
    fn snapshot_restores_into_new_session() {
        let mut s = session(8);
        s.choose_profile(fixture_profile());
        s.advance_days(12).unwrap();
        let snapshot = s.snapshot();
        let restored = LotterySession::from_snapshot(
            snapshot.clone(),
            8,
            builtin_catalog().clone(),
            EngineConfig::default(),
        );
        assert_eq!(restored.snapshot(), snapshot);
    }

    #[test]
    fn sessions_do_not_share_streams() {
        let mut a = session(9);
        let b = session(9);
        a.choose_profile(fixture_profile());
        for _ in 0..10 {
            let ticket = a.quick_pick();
            a.play_ticket(ticket).unwrap();
        }
        assert_eq!(b.rng_bundle().draws().draws(), 0);
        assert_eq!(b.rng_bundle().picks().draws(), 0);
    }
}
