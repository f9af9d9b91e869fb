//! 6-of-90 draw generation, ticket validation, and the payout table.
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    CELEBRATION_THRESHOLD, MAX_NUMBER, MIN_NUMBER, NUMBERS_PER_TICKET, PAYOUT_FIVE, PAYOUT_FOUR,
    PAYOUT_SIX, PAYOUT_THREE,
};

/// Six sorted, distinct numbers.
pub type DrawNumbers = [u8; NUMBERS_PER_TICKET];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TicketError {
    #[error("a ticket needs exactly {expected} numbers (got {got})")]
    WrongCount { expected: usize, got: usize },
    #[error("number {value} is outside {min}..={max}")]
    OutOfRange { value: u8, min: u8, max: u8 },
    #[error("number {value} was chosen more than once")]
    Duplicate { value: u8 },
}

/// A validated player selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Ticket {
    numbers: DrawNumbers,
}

impl Ticket {
    /// Validate a raw selection at the boundary.
    ///
    /// # Errors
    ///
    /// Returns an error for the wrong count, out-of-range values, or repeats.
    pub fn new(numbers: &[u8]) -> Result<Self, TicketError> {
        if numbers.len() != NUMBERS_PER_TICKET {
            return Err(TicketError::WrongCount {
                expected: NUMBERS_PER_TICKET,
                got: numbers.len(),
            });
        }
        let mut sorted = [0_u8; NUMBERS_PER_TICKET];
        sorted.copy_from_slice(numbers);
        sorted.sort_unstable();
        for (idx, value) in sorted.iter().copied().enumerate() {
            if !(MIN_NUMBER..=MAX_NUMBER).contains(&value) {
                return Err(TicketError::OutOfRange {
                    value,
                    min: MIN_NUMBER,
                    max: MAX_NUMBER,
                });
            }
            if idx > 0 && sorted[idx - 1] == value {
                return Err(TicketError::Duplicate { value });
            }
        }
        Ok(Self { numbers: sorted })
    }

    #[must_use]
    pub const fn numbers(&self) -> &DrawNumbers {
        &self.numbers
    }
}

impl TryFrom<Vec<u8>> for Ticket {
    type Error = TicketError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Ticket> for Vec<u8> {
    fn from(ticket: Ticket) -> Self {
        ticket.numbers.to_vec()
    }
}

/// Payout bracket for a match count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrizeTier {
    Jackpot,
    Five,
    Four,
    Three,
    None,
}

impl PrizeTier {
    #[must_use]
    pub const fn from_matches(matches: usize) -> Self {
        match matches {
            6 => Self::Jackpot,
            5 => Self::Five,
            4 => Self::Four,
            3 => Self::Three,
            _ => Self::None,
        }
    }

    #[must_use]
    pub const fn payout(self) -> f64 {
        match self {
            Self::Jackpot => PAYOUT_SIX,
            Self::Five => PAYOUT_FIVE,
            Self::Four => PAYOUT_FOUR,
            Self::Three => PAYOUT_THREE,
            Self::None => 0.0,
        }
    }
}

/// Draw six distinct numbers in `[1, 90]` by rejection sampling, sorted.
pub fn draw_numbers<R>(rng: &mut R) -> DrawNumbers
where
    R: Rng + ?Sized,
{
    let mut picked: Vec<u8> = Vec::with_capacity(NUMBERS_PER_TICKET);
    while picked.len() < NUMBERS_PER_TICKET {
        let candidate = rng.gen_range(MIN_NUMBER..=MAX_NUMBER);
        if !picked.contains(&candidate) {
            picked.push(candidate);
        }
    }
    picked.sort_unstable();
    let mut numbers = [0_u8; NUMBERS_PER_TICKET];
    numbers.copy_from_slice(&picked);
    numbers
}

/// A random valid ticket, drawn the same way as the official draw.
pub fn quick_pick<R>(rng: &mut R) -> Ticket
where
    R: Rng + ?Sized,
{
    Ticket {
        numbers: draw_numbers(rng),
    }
}

/// Number of player numbers present in the drawn set.
#[must_use]
pub fn count_matches(player: &[u8], drawn: &[u8]) -> usize {
    player.iter().filter(|n| drawn.contains(n)).count()
}

/// Fixed payout for a player selection against a draw.
#[must_use]
pub fn payout(player: &[u8], drawn: &[u8]) -> f64 {
    PrizeTier::from_matches(count_matches(player, drawn)).payout()
}

#[must_use]
pub fn is_celebration(amount: f64) -> bool {
    amount >= CELEBRATION_THRESHOLD
}
