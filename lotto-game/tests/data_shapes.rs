use chrono::NaiveDate;
use std::collections::HashSet;
use lotto_game::events::load_builtin_catalog;
use lotto_game::{
    EmbeddedDataLoader, EventCategory, GameEngine, GameStorage, MaritalStatus, MemoryStorage,
    PlayStats, PlayerProfile, SessionSnapshot, SimClock, SocialStatus,
};
use serde_json::Value;

#[test]
fn builtin_catalog_asset_is_well_formed() {
    let catalog = load_builtin_catalog().unwrap();
    let mut seen = HashSet::new();
    for event in &catalog {
        assert!(seen.insert(event.id.clone()), "duplicate {}", event.id);
        assert!(event.probability > 0.0, "{} has no weight", event.id);
        assert!(!event.title.is_empty());
        if event.category == EventCategory::Neutral {
            assert!(event.money_effect.is_none(), "{} moves money", event.id);
        }
    }
}

#[test]
fn stored_values_use_flat_snapshot_shapes() {
    let storage = MemoryStorage::new();
    let engine = GameEngine::new(EmbeddedDataLoader, storage.clone());
    let profile = PlayerProfile {
        name: String::from("Luca Bruno"),
        age: 41,
        city: String::from("Torino"),
        social_status: SocialStatus::WellOff,
        marital_status: MaritalStatus::Married,
        balance: 640.0,
        weekly_income: 620.0,
        fixed_expenses: 400.0,
        karma: 7.0,
        played_tickets: 2,
        money_spent: 2.0,
        money_won: 0.0,
    };
    let snapshot = SessionSnapshot {
        profile: Some(profile),
        clock: SimClock::at_date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
        stats: PlayStats {
            spent: 2.0,
            won: 0.0,
            games: 2,
        },
    };
    engine.save_snapshot(&snapshot).unwrap();

    let raw_profile: Value =
        serde_json::from_str(&storage.read("player_profile").unwrap().unwrap()).unwrap();
    let keys: Vec<&str> = raw_profile
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    for key in [
        "name",
        "age",
        "city",
        "socialStatus",
        "maritalStatus",
        "balance",
        "weeklyIncome",
        "fixedExpenses",
        "karma",
        "playedTickets",
        "moneySpent",
        "moneyWon",
    ] {
        assert!(keys.contains(&key), "missing {key}");
    }
    assert_eq!(raw_profile["socialStatus"], "well-off");

    let raw_stats: Value =
        serde_json::from_str(&storage.read("lotto_stats").unwrap().unwrap()).unwrap();
    assert_eq!(raw_stats, serde_json::json!({"spent": 2.0, "won": 0.0, "games": 2}));

    let raw_clock = storage.read("game_current_date").unwrap().unwrap();
    assert!(raw_clock.starts_with("2025-01-01T00:00:00"));

    let restored = engine
        .load_snapshot(SimClock::at_date(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()))
        .unwrap();
    assert_eq!(restored, snapshot);
}
