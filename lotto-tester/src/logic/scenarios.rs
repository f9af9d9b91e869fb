//! Named logic scenarios exercising the game engine end to end.
use anyhow::{Context, Result, bail, ensure};
use chrono::{Datelike, NaiveDate};
use lotto_game::constants::{CELEBRATION_THRESHOLD, KARMA_MAX, KARMA_MIN, KEY_PROFILE};
use lotto_game::{
    EmbeddedDataLoader, EngineConfig, GameEngine, GameStorage, LotterySession, MemoryStorage,
    PlayError, PlayerProfile, SimClock, days_until_next_draw,
};

const FLOAT_TOLERANCE: f64 = 1e-6;

/// Inputs shared by every scenario run.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioCtx {
    pub seed: u64,
    pub start: SimClock,
}

/// What a passing run did, for verbose output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub days_simulated: u32,
    pub tickets_played: u32,
    pub final_balance: Option<f64>,
}

pub type ScenarioFn = fn(&ScenarioCtx) -> Result<RunSummary>;

#[derive(Debug, Clone, Copy)]
pub struct LogicScenario {
    pub name: &'static str,
    pub description: &'static str,
    pub run: ScenarioFn,
}

const SCENARIOS: &[LogicScenario] = &[
    LogicScenario {
        name: "smoke",
        description: "Choose a profile, live a month, play on draw days",
        run: smoke,
    },
    LogicScenario {
        name: "salary",
        description: "Quiet quarter: balance equals the settlement sum",
        run: salary,
    },
    LogicScenario {
        name: "draw-days",
        description: "Jumping to the next draw always lands on a draw day",
        run: draw_days,
    },
    LogicScenario {
        name: "ticket-spree",
        description: "Play until broke; the rejection changes nothing",
        run: ticket_spree,
    },
    LogicScenario {
        name: "long-run",
        description: "A simulated year with events and tickets",
        run: long_run,
    },
    LogicScenario {
        name: "persistence",
        description: "Save and restore through the storage port",
        run: persistence,
    },
];

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    SCENARIOS.iter().map(|s| (s.name, s.description)).collect()
}

#[must_use]
pub fn get_scenario(name: &str) -> Option<LogicScenario> {
    SCENARIOS.iter().copied().find(|s| s.name == name)
}

/// Expand `all` into every scenario name, keeping the rest in order.
#[must_use]
pub fn expand_scenarios(requested: &[String]) -> Vec<String> {
    let mut expanded: Vec<String> = Vec::new();
    for name in requested {
        if name == "all" {
            for scenario in SCENARIOS {
                if !expanded.iter().any(|n| n == scenario.name) {
                    expanded.push(scenario.name.to_string());
                }
            }
        } else if !expanded.contains(name) {
            expanded.push(name.clone());
        }
    }
    expanded
}

fn engine() -> GameEngine<EmbeddedDataLoader, MemoryStorage> {
    GameEngine::new(EmbeddedDataLoader, MemoryStorage::new())
}

fn session_with_profile(ctx: &ScenarioCtx) -> Result<LotterySession> {
    let mut session = engine()
        .create_session(ctx.seed, ctx.start)
        .context("creating session")?;
    let candidates = session.offer_profiles();
    ensure!(
        candidates.len() == session.config().candidate_count,
        "expected {} candidates, got {}",
        session.config().candidate_count,
        candidates.len()
    );
    let chosen = candidates
        .into_iter()
        .next()
        .context("no candidate profiles offered")?;
    session.choose_profile(chosen);
    Ok(session)
}

fn current_profile(session: &LotterySession) -> Result<&PlayerProfile> {
    session.profile().context("session lost its profile")
}

fn check_profile_invariants(session: &LotterySession) -> Result<()> {
    let profile = current_profile(session)?;
    let stats = session.stats();
    ensure!(
        (KARMA_MIN..=KARMA_MAX).contains(&profile.karma),
        "karma {} out of range",
        profile.karma
    );
    ensure!(
        profile.played_tickets == stats.games,
        "profile counts {} tickets but stats count {}",
        profile.played_tickets,
        stats.games
    );
    ensure!(
        (profile.net_result() - stats.profit()).abs() < FLOAT_TOLERANCE,
        "profile net {} disagrees with stats profit {}",
        profile.net_result(),
        stats.profit()
    );
    Ok(())
}

/// Play one quick-pick ticket if affordable. Returns whether it was played.
fn try_play(session: &mut LotterySession) -> Result<bool> {
    let ticket = session.quick_pick();
    match session.play_ticket(ticket) {
        Ok(outcome) => {
            ensure!(
                outcome.celebration == (outcome.payout >= CELEBRATION_THRESHOLD),
                "celebration flag disagrees with payout {}",
                outcome.payout
            );
            Ok(true)
        }
        Err(PlayError::InsufficientFunds { .. }) => Ok(false),
        Err(err) => Err(err.into()),
    }
}

fn smoke(ctx: &ScenarioCtx) -> Result<RunSummary> {
    let mut session = session_with_profile(ctx)?;
    let mut days = 0;
    let mut tickets = 0;
    while days < 30 {
        let outcome = session.advance_to_next_draw()?;
        days += u32::try_from(outcome.days.len()).unwrap_or(u32::MAX);
        ensure!(outcome.ends_on_draw_day(), "did not land on a draw day");
        if try_play(&mut session)? {
            tickets += 1;
        }
        check_profile_invariants(&session)?;
    }
    Ok(RunSummary {
        days_simulated: days,
        tickets_played: tickets,
        final_balance: Some(current_profile(&session)?.balance),
    })
}

fn months_crossed(start: NaiveDate, days: u32) -> u32 {
    let mut date = start;
    let mut firsts = 0;
    for _ in 0..days {
        let Some(next) = date.succ_opt() else { break };
        date = next;
        if date.day() == 1 {
            firsts += 1;
        }
    }
    firsts
}

fn salary(ctx: &ScenarioCtx) -> Result<RunSummary> {
    const DAYS: u32 = 92;
    let config = EngineConfig {
        event_chance_pct: 0.0,
        ..EngineConfig::default()
    };
    let mut session = LotterySession::new(
        ctx.seed,
        ctx.start,
        lotto_game::builtin_catalog().clone(),
        config,
    );
    let profile = session
        .offer_profiles()
        .into_iter()
        .next()
        .context("no candidate profiles offered")?;
    let opening = profile.balance;
    let monthly = profile.weekly_net() * session.config().weeks_per_month;
    session.choose_profile(profile);

    let outcome = session.advance_days(DAYS)?;
    let expected_months = months_crossed(ctx.start.date(), DAYS);
    let settled = u32::try_from(outcome.salary_days()).unwrap_or(u32::MAX);
    ensure!(
        settled == expected_months,
        "settled {settled} times, expected {expected_months}"
    );
    ensure!(outcome.events_fired() == 0, "events fired while disabled");

    let expected = opening + monthly * f64::from(expected_months);
    let balance = current_profile(&session)?.balance;
    ensure!(
        (balance - expected).abs() < FLOAT_TOLERANCE,
        "balance {balance:.2} != expected {expected:.2}"
    );
    Ok(RunSummary {
        days_simulated: DAYS,
        tickets_played: 0,
        final_balance: Some(balance),
    })
}

fn draw_days(ctx: &ScenarioCtx) -> Result<RunSummary> {
    let mut session = session_with_profile(ctx)?;
    let mut days = 0;
    for _ in 0..100 {
        let step = days_until_next_draw(&session.clock());
        ensure!((1..=3).contains(&step), "lookahead {step} outside 1..=3");
        session.advance_days(step)?;
        ensure!(
            session.clock().is_draw_day(),
            "{} ({:?}) is not a draw day",
            session.clock().date(),
            session.clock().weekday()
        );
        days += step;
    }
    Ok(RunSummary {
        days_simulated: days,
        tickets_played: 0,
        final_balance: None,
    })
}

fn ticket_spree(ctx: &ScenarioCtx) -> Result<RunSummary> {
    const MAX_TICKETS: u32 = 100_000;
    let mut session = session_with_profile(ctx)?;
    let short_on_cash = PlayerProfile {
        balance: current_profile(&session)?.balance.min(40.0),
        ..current_profile(&session)?.clone()
    };
    session.choose_profile(short_on_cash);

    let cost = session.config().ticket_cost;
    let mut played = 0_u32;
    loop {
        if played >= MAX_TICKETS {
            bail!("still solvent after {MAX_TICKETS} tickets");
        }
        let before = session.snapshot();
        let ticket = session.quick_pick();
        match session.play_ticket(ticket) {
            Ok(_) => played += 1,
            Err(PlayError::InsufficientFunds { balance, cost: needed }) => {
                ensure!(balance < needed, "rejected with balance {balance} >= {needed}");
                ensure!(session.snapshot() == before, "rejection mutated state");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    let profile = current_profile(&session)?;
    ensure!(profile.played_tickets == played, "ticket counter drifted");
    ensure!(
        (profile.money_spent - f64::from(played) * cost).abs() < FLOAT_TOLERANCE,
        "spent {} for {played} tickets",
        profile.money_spent
    );
    check_profile_invariants(&session)?;
    Ok(RunSummary {
        days_simulated: 0,
        tickets_played: played,
        final_balance: Some(profile.balance),
    })
}

fn long_run(ctx: &ScenarioCtx) -> Result<RunSummary> {
    const DAYS: u32 = 365;
    let mut session = session_with_profile(ctx)?;
    let mut tickets = 0;
    let mut last_played = 0;
    let mut last_spent = 0.0;
    for _ in 0..DAYS {
        let outcome = session.advance_days(1)?;
        if outcome.ends_on_draw_day() && try_play(&mut session)? {
            tickets += 1;
        }
        check_profile_invariants(&session)?;
        let profile = current_profile(&session)?;
        ensure!(
            profile.played_tickets >= last_played && profile.money_spent >= last_spent,
            "counters went backwards"
        );
        last_played = profile.played_tickets;
        last_spent = profile.money_spent;
    }
    Ok(RunSummary {
        days_simulated: DAYS,
        tickets_played: tickets,
        final_balance: Some(current_profile(&session)?.balance),
    })
}

fn persistence(ctx: &ScenarioCtx) -> Result<RunSummary> {
    let storage = MemoryStorage::new();
    let engine = GameEngine::new(EmbeddedDataLoader, storage.clone());
    let mut session = engine.create_session(ctx.seed, ctx.start)?;
    session.choose_profile(
        session
            .offer_profiles()
            .into_iter()
            .next()
            .context("no candidate profiles offered")?,
    );
    session.advance_days(45)?;
    let played = u32::from(try_play(&mut session)?);
    engine.save_session(&session)?;

    let restored = engine.load_session(ctx.seed, ctx.start)?;
    ensure!(
        restored.snapshot() == session.snapshot(),
        "restored snapshot differs"
    );

    storage.write(KEY_PROFILE, "{not json")?;
    let degraded = engine.load_session(ctx.seed, ctx.start)?;
    ensure!(
        degraded.profile().is_none(),
        "malformed profile should load as absent"
    );
    ensure!(degraded.clock() == session.clock(), "clock was not kept");

    engine.reset_stats()?;
    let cleared = engine.load_session(ctx.seed, ctx.start)?;
    ensure!(cleared.stats().games == 0, "stats survived a reset");

    Ok(RunSummary {
        days_simulated: 45,
        tickets_played: played,
        final_balance: current_profile(&session).ok().map(|p| p.balance),
    })
}
