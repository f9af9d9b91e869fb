use chrono::NaiveDate;
use lotto_game::{
    EmbeddedDataLoader, EngineConfig, GameEngine, GameStorage, LotterySession, MemoryStorage,
    NoEvents, PlayError, PlayerProfile, SimClock, Ticket, advance, builtin_catalog,
    days_until_next_draw, payout,
};

fn start() -> SimClock {
    SimClock::at_date(NaiveDate::from_ymd_opt(2025, 3, 3).unwrap())
}

fn chosen_session(seed: u64) -> LotterySession {
    let mut session =
        LotterySession::new(seed, start(), builtin_catalog().clone(), EngineConfig::default());
    let candidates = session.offer_profiles();
    assert_eq!(candidates.len(), 3);
    session.choose_profile(candidates[1].clone());
    session
}

#[test]
fn month_of_play_keeps_books_balanced() {
    for seed in [1_u64, 0xBEEF, 0x00C0_FFEE] {
        let mut session = chosen_session(seed);
        let mut played = 0_u32;
        for _ in 0..12 {
            session.advance_to_next_draw().unwrap();
            assert!(session.clock().is_draw_day());
            let ticket = session.quick_pick();
            match session.play_ticket(ticket) {
                Ok(outcome) => {
                    played += 1;
                    assert!(
                        (outcome.payout - payout(outcome.numbers.numbers(), &outcome.drawn)).abs()
                            < f64::EPSILON
                    );
                }
                Err(PlayError::InsufficientFunds { balance, cost }) => {
                    assert!(balance < cost);
                }
                Err(other) => panic!("unexpected error {other}"),
            }
        }
        let profile = session.profile().unwrap();
        let stats = session.stats();
        assert_eq!(profile.played_tickets, played);
        assert_eq!(stats.games, played);
        assert!((0.0..=10.0).contains(&profile.karma));
        assert!((profile.net_result() - stats.profit()).abs() < 1e-6);
    }
}

#[test]
fn spending_down_to_zero_then_rejecting() {
    let mut session = chosen_session(5);
    let profile = PlayerProfile {
        balance: 3.0,
        ..session.profile().unwrap().clone()
    };
    session.choose_profile(profile);
    let ticket = Ticket::new(&[10, 20, 30, 40, 50, 60]).unwrap();
    let mut accepted = 0;
    while session.profile().unwrap().balance >= 1.0 && accepted < 1_000 {
        session.play_ticket(ticket).unwrap();
        accepted += 1;
    }
    let before = session.snapshot();
    assert!(matches!(
        session.play_ticket(ticket),
        Err(PlayError::InsufficientFunds { .. })
    ));
    assert_eq!(session.snapshot(), before);
}

#[test]
fn thirty_five_quiet_days_across_month_end() {
    let profile = PlayerProfile {
        balance: 100.0,
        weekly_income: 300.0,
        fixed_expenses: 200.0,
        ..chosen_session(9).profile().unwrap().clone()
    };
    let from = SimClock::at_date(NaiveDate::from_ymd_opt(2025, 4, 12).unwrap());
    let outcome = advance(from, &profile, 35, &mut NoEvents);
    assert_eq!(outcome.salary_days(), 1);
    assert!((outcome.profile.balance - 500.0).abs() < 1e-9);
}

#[test]
fn draw_lookahead_is_always_short() {
    let mut clock = start();
    for _ in 0..365 {
        assert!((1..=3).contains(&days_until_next_draw(&clock)));
        clock = clock.next_day();
    }
}

#[test]
fn persisted_session_survives_engine_restart() {
    let storage = MemoryStorage::new();
    let engine = GameEngine::new(EmbeddedDataLoader, storage.clone());
    let mut session = engine.create_session(77, start()).unwrap();
    session.choose_profile(session.offer_profiles().remove(2));
    session.advance_days(40).unwrap();
    engine.save_session(&session).unwrap();

    let reopened = GameEngine::new(EmbeddedDataLoader, storage.clone());
    let restored = reopened.load_session(77, start()).unwrap();
    assert_eq!(restored.snapshot(), session.snapshot());

    storage.write("player_profile", "garbage").unwrap();
    let degraded = reopened.load_session(77, start()).unwrap();
    assert!(degraded.profile().is_none());
    assert_eq!(degraded.clock(), session.clock());
}
