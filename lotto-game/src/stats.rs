//! Aggregate play statistics, tracked separately from the profile counters.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayStats {
    #[serde(default)]
    pub spent: f64,
    #[serde(default)]
    pub won: f64,
    #[serde(default)]
    pub games: u32,
}

impl PlayStats {
    #[must_use]
    pub fn record_play(self, cost: f64) -> Self {
        Self {
            spent: self.spent + cost,
            games: self.games.saturating_add(1),
            ..self
        }
    }

    #[must_use]
    pub fn record_win(self, amount: f64) -> Self {
        Self {
            won: self.won + amount,
            ..self
        }
    }

    #[must_use]
    pub fn profit(&self) -> f64 {
        self.won - self.spent
    }

    /// Winnings as a percentage of spend; zero before anything was spent.
    #[must_use]
    pub fn return_rate_pct(&self) -> f64 {
        if self.spent > 0.0 {
            self.won / self.spent * 100.0
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn reset() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plays_and_wins_accumulate() {
        let stats = PlayStats::default()
            .record_play(1.0)
            .record_play(1.0)
            .record_play(1.0)
            .record_play(1.0)
            .record_win(50.0);
        assert_eq!(stats.games, 4);
        assert!((stats.spent - 4.0).abs() < f64::EPSILON);
        assert!((stats.profit() - 46.0).abs() < f64::EPSILON);
        assert!((stats.return_rate_pct() - 1_250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn return_rate_is_zero_without_spend() {
        assert!(PlayStats::default().return_rate_pct().abs() < f64::EPSILON);
        assert_eq!(PlayStats::reset(), PlayStats::default());
    }

    #[test]
    fn stats_snapshot_shape() {
        let json = serde_json::to_value(PlayStats::default().record_play(1.0)).unwrap();
        assert_eq!(json, serde_json::json!({"spent": 1.0, "won": 0.0, "games": 1}));
        let partial: PlayStats = serde_json::from_str(r#"{"games": 2}"#).unwrap();
        assert_eq!(partial.games, 2);
    }
}
