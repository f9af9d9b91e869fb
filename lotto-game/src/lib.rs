//! Lotto Game Engine
//!
//! Platform-agnostic core logic for the lotto life simulation: a player
//! profile earns and spends over simulated calendar days, meets random life
//! events, and buys tickets for a 6-of-90 draw.
//! This crate has no UI or platform-specific dependencies.

use anyhow::Context;

pub mod calendar;
pub mod config;
pub mod constants;
pub mod draw;
pub mod events;
pub mod profile;
pub mod rng;
pub mod selector;
pub mod session;
pub mod stats;
pub mod storage;
pub mod time_engine;

#[cfg(test)]
mod testkit;

// Re-export commonly used types
pub use calendar::{SimClock, days_until_next_draw, days_until_salary, next_draw_date};
pub use config::{EngineConfig, EngineConfigError};
pub use draw::{
    DrawNumbers, PrizeTier, Ticket, TicketError, count_matches, draw_numbers, is_celebration,
    payout, quick_pick,
};
pub use events::{
    CatalogError, Condition, EventCatalog, EventCategory, GameEvent, apply_event, builtin_catalog,
};
pub use profile::{
    KarmaTier, MaritalStatus, PlayerProfile, ProfileError, SocialStatus, generate_random_profile,
};
pub use rng::{CountingRng, RngBundle, Stream, StreamRng};
pub use selector::{EventDecisionTrace, EventPick, roll_event_gate, select_event};
pub use session::{LotterySession, PlayError, SessionSnapshot, TicketOutcome};
pub use stats::PlayStats;
pub use storage::{EmbeddedDataLoader, MemoryStorage};
pub use time_engine::{
    AdvanceOutcome, CatalogEvents, DayReport, EventSource, NoEvents, Occurrence, ScriptedEvents,
    advance,
};

use constants::{KEY_CLOCK, KEY_PROFILE, KEY_STATS};

/// Trait for abstracting data loading operations
/// Platform-specific implementations should provide this
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the life event catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or fails validation.
    fn load_event_catalog(&self) -> Result<EventCatalog, Self::Error>;

    /// Load engine tuning. Defaults to the built-in constants.
    ///
    /// # Errors
    ///
    /// Returns an error if a platform-provided configuration cannot be read.
    fn load_engine_config(&self) -> Result<EngineConfig, Self::Error> {
        Ok(EngineConfig::default())
    }
}

/// Flat key-value persistence port, one value per snapshot key.
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

/// Main game engine for creating, saving, and restoring sessions
pub struct GameEngine<L, S>
where
    L: DataLoader,
    S: GameStorage,
{
    data_loader: L,
    storage: S,
}

impl<L, S> GameEngine<L, S>
where
    L: DataLoader,
    S: GameStorage,
{
    /// Create a new game engine with the provided data loader and storage
    pub const fn new(data_loader: L, storage: S) -> Self {
        Self {
            data_loader,
            storage,
        }
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Start a fresh session with no profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog or configuration cannot be loaded.
    pub fn create_session(&self, seed: u64, start: SimClock) -> Result<LotterySession, L::Error> {
        let catalog = self.data_loader.load_event_catalog()?;
        let config = self.data_loader.load_engine_config()?;
        Ok(LotterySession::new(seed, start, catalog, config))
    }

    /// Persist the session's profile, clock, and stats under their keys.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be encoded or written.
    pub fn save_session(&self, session: &LotterySession) -> Result<(), anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        self.save_snapshot(&session.snapshot())
    }

    /// Persist a snapshot. A missing profile removes the profile key.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be encoded or written.
    pub fn save_snapshot(&self, snapshot: &SessionSnapshot) -> Result<(), anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        if let Some(profile) = &snapshot.profile {
            let encoded = serde_json::to_string(profile).context("encoding player profile")?;
            self.storage
                .write(KEY_PROFILE, &encoded)
                .map_err(Into::into)?;
        } else {
            self.storage.remove(KEY_PROFILE).map_err(Into::into)?;
        }
        self.storage
            .write(KEY_CLOCK, &snapshot.clock.to_iso_string())
            .map_err(Into::into)?;
        let stats = serde_json::to_string(&snapshot.stats).context("encoding play stats")?;
        self.storage.write(KEY_STATS, &stats).map_err(Into::into)?;
        log::debug!("session saved | clock {}", snapshot.clock.date());
        Ok(())
    }

    /// Read back whatever was stored. Missing or malformed values fall back
    /// to "absent": no profile, the `start` clock, and zeroed stats.
    ///
    /// # Errors
    ///
    /// Returns an error only if the backing store itself fails.
    pub fn load_snapshot(&self, start: SimClock) -> Result<SessionSnapshot, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        let profile = self
            .storage
            .read(KEY_PROFILE)
            .map_err(Into::into)?
            .and_then(|raw| match serde_json::from_str::<PlayerProfile>(&raw) {
                Ok(profile) => match profile.validate() {
                    Ok(()) => Some(profile),
                    Err(err) => {
                        log::warn!("discarding invalid {KEY_PROFILE}: {err}");
                        None
                    }
                },
                Err(err) => {
                    log::warn!("discarding malformed {KEY_PROFILE}: {err}");
                    None
                }
            });

        let clock = self
            .storage
            .read(KEY_CLOCK)
            .map_err(Into::into)?
            .and_then(|raw| match SimClock::parse_iso(&raw) {
                Ok(clock) => Some(clock),
                Err(err) => {
                    log::warn!("discarding malformed {KEY_CLOCK}: {err}");
                    None
                }
            })
            .unwrap_or(start);

        let stats = self
            .storage
            .read(KEY_STATS)
            .map_err(Into::into)?
            .and_then(|raw| match serde_json::from_str::<PlayStats>(&raw) {
                Ok(stats) => Some(stats),
                Err(err) => {
                    log::warn!("discarding malformed {KEY_STATS}: {err}");
                    None
                }
            })
            .unwrap_or_default();

        Ok(SessionSnapshot {
            profile,
            clock,
            stats,
        })
    }

    /// Restore a session from storage with freshly loaded catalog data.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or storage fails.
    pub fn load_session(&self, seed: u64, start: SimClock) -> Result<LotterySession, anyhow::Error>
    where
        L::Error: Into<anyhow::Error>,
        S::Error: Into<anyhow::Error>,
    {
        let snapshot = self.load_snapshot(start)?;
        let catalog = self.data_loader.load_event_catalog().map_err(Into::into)?;
        let config = self.data_loader.load_engine_config().map_err(Into::into)?;
        log::info!(
            "session restored | profile {} clock {}",
            snapshot.profile.as_ref().map_or("<none>", |p| p.name.as_str()),
            snapshot.clock.date()
        );
        Ok(LotterySession::from_snapshot(snapshot, seed, catalog, config))
    }

    /// Delete the stored profile; clock and stats stay.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be removed.
    pub fn reset_profile(&self) -> Result<(), S::Error> {
        self.storage.remove(KEY_PROFILE)
    }

    /// Delete the stored stats.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be removed.
    pub fn reset_stats(&self) -> Result<(), S::Error> {
        self.storage.remove(KEY_STATS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::convert::Infallible;

    #[derive(Clone, Copy, Default)]
    struct QuietLoader;

    impl DataLoader for QuietLoader {
        type Error = Infallible;

        fn load_event_catalog(&self) -> Result<EventCatalog, Self::Error> {
            Ok(EventCatalog::empty())
        }

        fn load_engine_config(&self) -> Result<EngineConfig, Self::Error> {
            Ok(EngineConfig {
                event_chance_pct: 0.0,
                ..EngineConfig::default()
            })
        }
    }

    fn start() -> SimClock {
        SimClock::at_date(NaiveDate::from_ymd_opt(2024, 5, 20).unwrap())
    }

    #[test]
    fn engine_creates_and_roundtrips_session() {
        let storage = MemoryStorage::new();
        let engine = GameEngine::new(EmbeddedDataLoader, storage.clone());
        let mut session = engine.create_session(0xABCD, start()).unwrap();
        assert_eq!(session.catalog().len(), 13);
        let chosen = session.offer_profiles().remove(0);
        session.choose_profile(chosen);
        session.advance_days(10).unwrap();
        let ticket = session.quick_pick();
        if session.play_ticket(ticket).is_err() {
            // A run of bad events may have emptied the balance.
            assert!(session.profile().unwrap().balance < 1.0);
        }
        engine.save_session(&session).unwrap();
        assert!(storage.contains(KEY_PROFILE));

        let restored = engine.load_session(0xABCD, start()).unwrap();
        assert_eq!(restored.snapshot(), session.snapshot());
    }

    #[test]
    fn empty_storage_loads_as_absent() {
        let engine = GameEngine::new(QuietLoader, MemoryStorage::new());
        let snapshot = engine.load_snapshot(start()).unwrap();
        assert!(snapshot.profile.is_none());
        assert_eq!(snapshot.clock, start());
        assert_eq!(snapshot.stats, PlayStats::default());
    }

    #[test]
    fn malformed_values_load_as_absent() {
        let storage = MemoryStorage::new();
        storage.write(KEY_PROFILE, "{\"name\": 3").unwrap();
        storage.write(KEY_CLOCK, "not a date").unwrap();
        storage.write(KEY_STATS, r#"{"spent": "lots"}"#).unwrap();
        let engine = GameEngine::new(QuietLoader, storage);
        let session = engine.load_session(1, start()).unwrap();
        assert!(session.profile().is_none());
        assert_eq!(session.clock(), start());
        assert_eq!(session.stats(), PlayStats::default());
    }

    #[test]
    fn out_of_range_profile_loads_as_absent() {
        let storage = MemoryStorage::new();
        storage
            .write(
                KEY_PROFILE,
                r#"{"name":"Eva Neri","age":50,"city":"Pisa","socialStatus":"rich",
                    "maritalStatus":"single","balance":10.0,"weeklyIncome":-500.0,
                    "fixedExpenses":100.0,"karma":42.0,"playedTickets":1,
                    "moneySpent":-5.0,"moneyWon":0.0}"#,
            )
            .unwrap();
        let engine = GameEngine::new(QuietLoader, storage);
        let snapshot = engine.load_snapshot(start()).unwrap();
        assert!(snapshot.profile.is_none());
    }

    #[test]
    fn hyphenated_social_status_profile_loads() {
        let storage = MemoryStorage::new();
        storage
            .write(
                KEY_PROFILE,
                r#"{"name":"Eva Neri","age":50,"city":"Pisa","socialStatus":"middle-class",
                    "maritalStatus":"widowed","balance":10.0,"weeklyIncome":400.0,
                    "fixedExpenses":250.0,"karma":5.0}"#,
            )
            .unwrap();
        let engine = GameEngine::new(QuietLoader, storage);
        let profile = engine.load_snapshot(start()).unwrap().profile.unwrap();
        assert_eq!(profile.social_status, SocialStatus::MiddleClass);
        assert_eq!(profile.played_tickets, 0);
    }

    #[test]
    fn clock_is_stored_as_plain_rfc3339() {
        let storage = MemoryStorage::new();
        let engine = GameEngine::new(QuietLoader, storage.clone());
        let session = engine.create_session(2, start()).unwrap();
        engine.save_session(&session).unwrap();
        let raw = storage.read(KEY_CLOCK).unwrap().unwrap();
        assert!(raw.starts_with("2024-05-20T00:00:00"));
        assert!(!storage.contains(KEY_PROFILE));
    }

    #[test]
    fn resets_remove_only_their_key() {
        let storage = MemoryStorage::new();
        let engine = GameEngine::new(QuietLoader, storage.clone());
        let mut session = engine.create_session(3, start()).unwrap();
        session.choose_profile(session.offer_profiles().remove(0));
        let ticket = session.quick_pick();
        session.play_ticket(ticket).unwrap();
        engine.save_session(&session).unwrap();

        engine.reset_profile().unwrap();
        assert!(!storage.contains(KEY_PROFILE));
        assert!(storage.contains(KEY_STATS));
        assert!(storage.contains(KEY_CLOCK));

        engine.reset_stats().unwrap();
        assert!(!storage.contains(KEY_STATS));
        let restored = engine.load_session(3, start()).unwrap();
        assert!(restored.profile().is_none());
        assert_eq!(restored.stats().games, 0);
    }

    #[test]
    fn saving_without_profile_clears_stale_profile() {
        let storage = MemoryStorage::new();
        let engine = GameEngine::new(QuietLoader, storage.clone());
        let mut session = engine.create_session(4, start()).unwrap();
        session.choose_profile(session.offer_profiles().remove(0));
        engine.save_session(&session).unwrap();
        session.reset_profile();
        engine.save_session(&session).unwrap();
        assert!(!storage.contains(KEY_PROFILE));
    }
}
