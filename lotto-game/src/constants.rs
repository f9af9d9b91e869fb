//! Centralized balance and tuning constants for the lotto simulation.
//!
//! These values define the deterministic math for the core simulation.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control, rather than through external
//! JSON assets.

use chrono::Weekday;

// Ticket and draw ----------------------------------------------------------
pub const TICKET_COST: f64 = 1.0;
pub const NUMBERS_PER_TICKET: usize = 6;
pub const MIN_NUMBER: u8 = 1;
pub const MAX_NUMBER: u8 = 90;

// Payout table, keyed by match count.
pub const PAYOUT_SIX: f64 = 10_000_000.0;
pub const PAYOUT_FIVE: f64 = 50_000.0;
pub const PAYOUT_FOUR: f64 = 1_000.0;
pub const PAYOUT_THREE: f64 = 50.0;

/// Payouts at or above this amount trigger the celebration flag.
pub const CELEBRATION_THRESHOLD: f64 = 50.0;

// Calendar -----------------------------------------------------------------
/// Weekdays on which a draw takes place.
pub const DRAW_WEEKDAYS: [Weekday; 4] = [Weekday::Tue, Weekday::Thu, Weekday::Fri, Weekday::Sat];
/// Upper bound for the next-draw lookahead.
pub const DRAW_LOOKAHEAD_DAYS: u32 = 7;
/// Weekly income and expenses are settled at this multiple on salary days.
pub const WEEKS_PER_MONTH: f64 = 4.0;

// Events -------------------------------------------------------------------
/// Chance (percent) that any event is considered on a given day.
pub const EVENT_CHANCE_PCT: f64 = 40.0;
pub(crate) const EVENT_POOL_ID: &str = "lotto.life_events";

// Profile ------------------------------------------------------------------
pub const KARMA_MIN: f64 = 0.0;
pub const KARMA_MAX: f64 = 10.0;
pub(crate) const KARMA_LOW_MAX: f64 = 3.0;
pub(crate) const KARMA_NEUTRAL_MAX: f64 = 6.0;
pub const PROFILE_CANDIDATES: usize = 3;

pub(crate) const FIRST_NAMES: [&str; 10] = [
    "Marco", "Giuseppe", "Antonio", "Giovanni", "Francesco", "Maria", "Anna", "Lucia", "Giovanna",
    "Rosa",
];
pub(crate) const LAST_NAMES: [&str; 11] = [
    "Rossi", "Bianchi", "Esposito", "Romano", "Colombo", "Ricci", "Marino", "Greco", "Bruno",
    "Gallo", "Ferrari",
];
pub(crate) const CITIES: [&str; 10] = [
    "Roma", "Milano", "Napoli", "Torino", "Palermo", "Bologna", "Firenze", "Bari", "Catania",
    "Venezia",
];

// Storage keys -------------------------------------------------------------
pub const KEY_PROFILE: &str = "player_profile";
pub const KEY_CLOCK: &str = "game_current_date";
pub const KEY_STATS: &str = "lotto_stats";

pub const FLOAT_EPSILON: f64 = 1e-9;
