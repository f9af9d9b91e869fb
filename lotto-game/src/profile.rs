//! Player profile model, random generation, and pure transforms.
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    CITIES, FIRST_NAMES, KARMA_LOW_MAX, KARMA_MAX, KARMA_MIN, KARMA_NEUTRAL_MAX, LAST_NAMES,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SocialStatus {
    Poor,
    MiddleClass,
    WellOff,
    Rich,
}

impl SocialStatus {
    /// Map a uniform roll in `[0, 1)` onto the population distribution.
    #[must_use]
    pub fn from_roll(roll: f64) -> Self {
        if roll < 0.2 {
            Self::Poor
        } else if roll < 0.7 {
            Self::MiddleClass
        } else if roll < 0.95 {
            Self::WellOff
        } else {
            Self::Rich
        }
    }

    /// Base weekly income and the width of the random spread added on top.
    #[must_use]
    pub const fn income_band(self) -> (u32, u32) {
        match self {
            Self::Poor => (150, 100),
            Self::MiddleClass => (300, 150),
            Self::WellOff => (500, 300),
            Self::Rich => (1_000, 1_000),
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Poor => "poor",
            Self::MiddleClass => "middle-class",
            Self::WellOff => "well-off",
            Self::Rich => "rich",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    Single,
    Married,
    Widowed,
    Divorced,
}

impl MaritalStatus {
    #[must_use]
    pub fn from_roll(roll: f64) -> Self {
        if roll < 0.4 {
            Self::Single
        } else if roll < 0.75 {
            Self::Married
        } else if roll < 0.9 {
            Self::Divorced
        } else {
            Self::Widowed
        }
    }
}

/// Presentation bucket for the karma meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KarmaTier {
    Low,
    Neutral,
    High,
}

/// Player economic and social attributes plus running statistics.
///
/// Values are replaced rather than mutated: every transform returns a new
/// profile, which keeps undo and replay trivial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub name: String,
    pub age: u32,
    pub city: String,
    pub social_status: SocialStatus,
    pub marital_status: MaritalStatus,
    /// Signed balance; no floor is enforced.
    pub balance: f64,
    pub weekly_income: f64,
    pub fixed_expenses: f64,
    /// Always within `[KARMA_MIN, KARMA_MAX]`.
    pub karma: f64,
    #[serde(default)]
    pub played_tickets: u32,
    #[serde(default)]
    pub money_spent: f64,
    #[serde(default)]
    pub money_won: f64,
}

/// Clamp a karma value into range. NaN collapses to the lower bound.
#[must_use]
pub fn clamp_karma(value: f64) -> f64 {
    if value.is_nan() {
        return KARMA_MIN;
    }
    value.clamp(KARMA_MIN, KARMA_MAX)
}

impl PlayerProfile {
    #[must_use]
    pub fn apply_karma(&self, delta: f64) -> Self {
        let karma = if delta.is_nan() {
            self.karma
        } else {
            clamp_karma(self.karma + delta)
        };
        Self {
            karma,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn apply_balance(&self, delta: f64) -> Self {
        Self {
            balance: self.balance + delta,
            ..self.clone()
        }
    }

    /// Charge a ticket: balance drops by `cost`, counters grow.
    #[must_use]
    pub fn record_ticket_played(&self, cost: f64) -> Self {
        Self {
            balance: self.balance - cost,
            played_tickets: self.played_tickets.saturating_add(1),
            money_spent: self.money_spent + cost,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn record_winnings(&self, amount: f64) -> Self {
        Self {
            balance: self.balance + amount,
            money_won: self.money_won + amount,
            ..self.clone()
        }
    }

    /// Weekly income minus weekly fixed expenses.
    #[must_use]
    pub fn weekly_net(&self) -> f64 {
        self.weekly_income - self.fixed_expenses
    }

    /// Lifetime lottery result (winnings minus ticket spend).
    #[must_use]
    pub fn net_result(&self) -> f64 {
        self.money_won - self.money_spent
    }

    #[must_use]
    pub fn karma_tier(&self) -> KarmaTier {
        if self.karma <= KARMA_LOW_MAX {
            KarmaTier::Low
        } else if self.karma <= KARMA_NEUTRAL_MAX {
            KarmaTier::Neutral
        } else {
            KarmaTier::High
        }
    }

    #[must_use]
    pub fn can_afford(&self, cost: f64) -> bool {
        self.balance >= cost
    }

    /// Check the invariants a stored profile must satisfy before it is trusted.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError` naming the first field that is out of bounds.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if !self.balance.is_finite() {
            return Err(ProfileError::NotFinite { field: "balance" });
        }
        if !self.karma.is_finite() || !(KARMA_MIN..=KARMA_MAX).contains(&self.karma) {
            return Err(ProfileError::RangeViolation {
                field: "karma",
                min: KARMA_MIN,
                max: KARMA_MAX,
                value: self.karma,
            });
        }
        for (field, value) in [
            ("weeklyIncome", self.weekly_income),
            ("fixedExpenses", self.fixed_expenses),
            ("moneySpent", self.money_spent),
            ("moneyWon", self.money_won),
        ] {
            if !value.is_finite() {
                return Err(ProfileError::NotFinite { field });
            }
            if value < 0.0 {
                return Err(ProfileError::Negative { field, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} must not be negative (got {value:.2})")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
}

/// Generate a random profile the way a new player is offered one.
pub fn generate_random_profile<R>(rng: &mut R) -> PlayerProfile
where
    R: Rng + ?Sized,
{
    let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
    let city = CITIES[rng.gen_range(0..CITIES.len())];
    let age = rng.gen_range(20..70);

    let social_status = SocialStatus::from_roll(rng.r#gen::<f64>());
    let marital_status = MaritalStatus::from_roll(rng.r#gen::<f64>());

    let (base, spread) = social_status.income_band();
    let weekly_income = f64::from(base + rng.gen_range(0..spread));
    let fixed_expenses = (weekly_income * (0.5 + rng.r#gen::<f64>() * 0.3)).floor();

    // Two to five weeks of net income to start with.
    let weeks = rng.gen_range(2_u32..6);
    let balance = (weekly_income - fixed_expenses) * f64::from(weeks);
    let karma = f64::from(rng.gen_range(5_u32..9));

    PlayerProfile {
        name: format!("{first} {last}"),
        age,
        city: city.to_string(),
        social_status,
        marital_status,
        balance,
        weekly_income,
        fixed_expenses,
        karma,
        played_tickets: 0,
        money_spent: 0.0,
        money_won: 0.0,
    }
}

/// Produce `count` independent candidates for the player to choose from.
pub fn offer_candidates<R>(rng: &mut R, count: usize) -> Vec<PlayerProfile>
where
    R: Rng + ?Sized,
{
    (0..count).map(|_| generate_random_profile(rng)).collect()
}

#[cfg(test)]
pub(crate) fn fixture_profile() -> PlayerProfile {
    PlayerProfile {
        name: String::from("Anna Rossi"),
        age: 34,
        city: String::from("Bologna"),
        social_status: SocialStatus::MiddleClass,
        marital_status: MaritalStatus::Single,
        balance: 100.0,
        weekly_income: 300.0,
        fixed_expenses: 200.0,
        karma: 6.0,
        played_tickets: 0,
        money_spent: 0.0,
        money_won: 0.0,
    }
}
