//! Game session: wallet, board layout and drops in flight
//!
//! The session owns everything that changes between drops. Each drop gets its
//! own `Ball` and a shared handle to the layout it started on, so rebuilding
//! the board never disturbs a ball already falling.

use std::sync::Arc;

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_AUTO_DROPS_PER_TICK, MAX_DROP_STEPS, MIN_BET};
use crate::error::{Error, Result};
use crate::round_cents;
use crate::settings::Settings;
use crate::sim::{
    Ball, Board, BoardConfig, MultiplierTable, MultiplierTier, Outcome, PhysicsConstants,
    StepResult, resolve, seeded_rng, step,
};

/// Board plus its multiplier table, rebuilt together
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub board: Board,
    pub multipliers: MultiplierTable,
}

impl Layout {
    pub fn build(rows: u32, viewport_width: f32, config: BoardConfig) -> Result<Self> {
        let board = Board::build_with(rows, viewport_width, config)?;
        let multipliers = MultiplierTable::generate(rows);
        Ok(Self { board, multipliers })
    }
}

/// Reject zero, negative and non-finite wagers
pub fn validate_wager(wager: f64) -> Result<()> {
    if !wager.is_finite() || wager <= 0.0 {
        return Err(Error::InvalidWager(wager));
    }
    Ok(())
}

/// Player balance and current bet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    balance: f64,
    bet: f64,
}

impl Wallet {
    pub fn new(balance: f64, bet: f64) -> Self {
        Self { balance, bet }
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn bet(&self) -> f64 {
        self.bet
    }

    pub fn can_afford(&self, wager: f64) -> bool {
        self.balance >= wager
    }

    /// Take a wager from the balance; nothing changes on error
    pub fn debit(&mut self, wager: f64) -> Result<()> {
        validate_wager(wager)?;
        if !self.can_afford(wager) {
            return Err(Error::InsufficientFunds {
                balance: self.balance,
                wager,
            });
        }
        self.balance -= wager;
        Ok(())
    }

    pub fn credit(&mut self, amount: f64) {
        self.balance += amount;
    }

    /// Top up the balance, returning the new balance
    pub fn add_funds(&mut self, amount: f64) -> Result<f64> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::config(format!("top-up must be positive, got {amount}")));
        }
        self.balance += amount;
        Ok(self.balance)
    }

    pub fn set_bet(&mut self, bet: f64) -> Result<()> {
        validate_wager(bet)?;
        self.bet = bet;
        Ok(())
    }

    /// Halve the bet, never below one cent
    pub fn halve_bet(&mut self) -> f64 {
        self.bet = round_cents((self.bet / 2.0).max(MIN_BET));
        self.bet
    }

    pub fn double_bet(&mut self) -> f64 {
        self.bet = round_cents(self.bet * 2.0);
        self.bet
    }
}

/// Fixed-interval drop trigger driven by elapsed time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoDrop {
    pub enabled: bool,
    interval_ms: f32,
    accumulated_ms: f32,
}

impl AutoDrop {
    pub fn new(interval_ms: f32) -> Result<Self> {
        let mut auto = Self {
            enabled: false,
            interval_ms: 0.0,
            accumulated_ms: 0.0,
        };
        auto.set_interval(interval_ms)?;
        Ok(auto)
    }

    pub fn interval_ms(&self) -> f32 {
        self.interval_ms
    }

    /// Change the interval and restart the countdown
    pub fn set_interval(&mut self, interval_ms: f32) -> Result<()> {
        if !interval_ms.is_finite() || interval_ms <= 0.0 {
            return Err(Error::config(format!(
                "auto-drop interval must be positive, got {interval_ms}"
            )));
        }
        self.interval_ms = interval_ms;
        self.accumulated_ms = 0.0;
        Ok(())
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.accumulated_ms = 0.0;
        }
        self.enabled = enabled;
    }

    /// Number of drops that became due during `elapsed_ms`
    ///
    /// At most `MAX_AUTO_DROPS_PER_TICK`; a longer backlog is discarded and
    /// the countdown restarts.
    pub fn advance(&mut self, elapsed_ms: f32) -> u32 {
        if !self.enabled || !elapsed_ms.is_finite() || elapsed_ms <= 0.0 {
            return 0;
        }
        self.accumulated_ms += elapsed_ms;
        let due = (self.accumulated_ms / self.interval_ms).floor();
        if due >= MAX_AUTO_DROPS_PER_TICK as f32 {
            self.accumulated_ms = 0.0;
            return MAX_AUTO_DROPS_PER_TICK;
        }
        self.accumulated_ms -= due * self.interval_ms;
        due as u32
    }
}

/// Progress of a drop after one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropStatus {
    InFlight { x: f32, y: f32 },
    Finished(Outcome),
}

/// A ball in flight together with the layout it was dropped on
#[derive(Debug, Clone)]
pub struct ActiveDrop {
    number: u64,
    layout: Arc<Layout>,
    physics: PhysicsConstants,
    ball: Ball,
    finished: bool,
}

impl ActiveDrop {
    /// 1-based drop number within the session
    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn layout(&self) -> &Arc<Layout> {
        &self.layout
    }

    pub fn wager(&self) -> f64 {
        self.ball.wager
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance the ball one step, resolving the outcome once it lands
    ///
    /// Any error ends the drop; further steps are rejected.
    pub fn step<R: Rng + ?Sized>(&mut self, elapsed_ms: f32, rng: &mut R) -> Result<DropStatus> {
        if self.finished {
            return Err(Error::simulation(format!("drop #{} already finished", self.number)));
        }

        let result = step(&self.layout.board, &self.physics, &mut self.ball, elapsed_ms, rng);
        match result {
            Ok(StepResult::InFlight { x, y }) => {
                if self.ball.steps >= MAX_DROP_STEPS {
                    self.finished = true;
                    return Err(Error::simulation(format!(
                        "drop #{} still in flight after {} steps",
                        self.number, self.ball.steps
                    )));
                }
                Ok(DropStatus::InFlight { x, y })
            }
            Ok(StepResult::Landed { x }) => {
                self.finished = true;
                let outcome = resolve(&self.layout.board, &self.layout.multipliers, x, self.ball.wager);
                Ok(DropStatus::Finished(outcome))
            }
            Err(e) => {
                self.finished = true;
                Err(e)
            }
        }
    }
}

/// Most recent scored landing, for the multiplier notification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LastHit {
    pub drop_number: u64,
    pub slot_index: usize,
    pub multiplier: f64,
    pub tier: MultiplierTier,
}

/// Running totals for a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total_dropped: u64,
    pub balance: f64,
    pub total_wagered: f64,
    pub total_paid_out: f64,
    pub scored: u64,
    pub no_score: u64,
    pub failed: u64,
    pub abandoned: u64,
}

/// A player's game session
#[derive(Debug)]
pub struct Session {
    settings: Settings,
    wallet: Wallet,
    layout: Arc<Layout>,
    rng: Pcg32,
    auto_drop: AutoDrop,
    last_hit: Option<LastHit>,
    summary: SessionSummary,
}

impl Session {
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;
        let layout = Layout::build(settings.rows, settings.viewport_width, settings.board)?;
        let rng = seeded_rng(settings.seed);
        let wallet = Wallet::new(settings.starting_balance, settings.bet);
        let auto_drop = AutoDrop::new(settings.auto_drop_interval_ms)?;

        log::info!(
            "Session started: {} rows, balance {:.2}, bet {:.2}, seed {:?}",
            settings.rows,
            wallet.balance(),
            wallet.bet(),
            settings.seed
        );

        Ok(Self {
            settings,
            wallet,
            layout: Arc::new(layout),
            rng,
            auto_drop,
            last_hit: None,
            summary: SessionSummary::default(),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn layout(&self) -> &Arc<Layout> {
        &self.layout
    }

    /// Slot and multiplier of the latest scored drop; no-score drops leave it
    pub fn last_hit(&self) -> Option<LastHit> {
        self.last_hit
    }

    pub fn auto_drop(&self) -> &AutoDrop {
        &self.auto_drop
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            balance: self.wallet.balance(),
            ..self.summary
        }
    }

    /// Rebuild board and multipliers; the old layout stays on error
    ///
    /// Drops already in flight keep the layout they started on.
    pub fn set_rows(&mut self, rows: u32) -> Result<()> {
        match Layout::build(rows, self.settings.viewport_width, self.settings.board) {
            Ok(layout) => {
                self.layout = Arc::new(layout);
                self.settings.rows = rows;
                log::info!("Board rebuilt with {} rows", rows);
                Ok(())
            }
            Err(e) => {
                log::warn!("Board rebuild rejected: {}", e);
                Err(e)
            }
        }
    }

    pub fn set_bet(&mut self, bet: f64) -> Result<()> {
        self.wallet.set_bet(bet)
    }

    pub fn halve_bet(&mut self) -> f64 {
        self.wallet.halve_bet()
    }

    pub fn double_bet(&mut self) -> f64 {
        self.wallet.double_bet()
    }

    /// Add the configured top-up amount
    pub fn add_funds(&mut self) -> Result<f64> {
        let balance = self.wallet.add_funds(self.settings.top_up_amount)?;
        log::info!("Balance topped up to {:.2}", balance);
        Ok(balance)
    }

    pub fn set_auto_drop(&mut self, enabled: bool) {
        self.auto_drop.set_enabled(enabled);
        log::info!("Auto-drop {}", if enabled { "on" } else { "off" });
    }

    pub fn set_auto_interval(&mut self, interval_ms: f32) -> Result<()> {
        self.auto_drop.set_interval(interval_ms)?;
        self.settings.auto_drop_interval_ms = interval_ms;
        Ok(())
    }

    /// Start a drop with the current bet
    pub fn start_drop(&mut self) -> Result<ActiveDrop> {
        self.start_drop_with(self.wallet.bet())
    }

    /// Start a drop with an explicit wager
    ///
    /// The wager is checked and debited before the ball exists; a rejected
    /// drop leaves the session untouched.
    pub fn start_drop_with(&mut self, wager: f64) -> Result<ActiveDrop> {
        if let Err(e) = self.wallet.debit(wager) {
            log::warn!("Drop rejected: {}", e);
            return Err(e);
        }

        self.summary.total_dropped += 1;
        self.summary.total_wagered += wager;

        let ball = Ball::spawn(&self.layout.board, &self.settings.physics, wager, &mut self.rng);
        log::debug!(
            "Drop #{} started at x={:.2}, vx={:.3}, wager {:.2}",
            self.summary.total_dropped,
            ball.pos.x,
            ball.vel.x,
            wager
        );

        Ok(ActiveDrop {
            number: self.summary.total_dropped,
            layout: Arc::clone(&self.layout),
            physics: self.settings.physics,
            ball,
            finished: false,
        })
    }

    /// Step a drop with the session RNG, paying out when it lands
    pub fn advance(&mut self, drop: &mut ActiveDrop, elapsed_ms: f32) -> Result<DropStatus> {
        if drop.is_finished() {
            return Err(Error::simulation(format!("drop #{} already finished", drop.number())));
        }
        match drop.step(elapsed_ms, &mut self.rng) {
            Ok(DropStatus::Finished(outcome)) => {
                self.settle(drop, &outcome);
                Ok(DropStatus::Finished(outcome))
            }
            Ok(status) => Ok(status),
            Err(e) => {
                self.summary.failed += 1;
                log::warn!("Drop #{} failed: {}", drop.number(), e);
                Err(e)
            }
        }
    }

    /// Run a whole drop at the nominal frame rate
    pub fn play_drop(&mut self) -> Result<Outcome> {
        let mut drop = self.start_drop()?;
        let frame_ms = self.settings.physics.nominal_frame_ms;
        loop {
            if let DropStatus::Finished(outcome) = self.advance(&mut drop, frame_ms)? {
                return Ok(outcome);
            }
        }
    }

    /// Discard a drop without payout
    pub fn abandon(&mut self, drop: ActiveDrop) {
        if !drop.is_finished() {
            self.summary.abandoned += 1;
            log::info!("Drop #{} abandoned", drop.number());
        }
    }

    /// Start any auto-drops that became due
    ///
    /// Only as many as the balance covers are started. Due drops that cannot
    /// be started are discarded, not carried into the next tick.
    pub fn tick_auto(&mut self, elapsed_ms: f32) -> Vec<ActiveDrop> {
        let due = self.auto_drop.advance(elapsed_ms);
        if due == 0 {
            return Vec::new();
        }

        let affordable = (self.wallet.balance() / self.wallet.bet()).floor();
        let count = if affordable.is_finite() && affordable >= 0.0 {
            due.min(affordable.min(u32::MAX as f64) as u32)
        } else {
            0
        };
        if count < due {
            log::info!(
                "Auto-drop: {} due, balance {:.2} covers {}",
                due,
                self.wallet.balance(),
                count
            );
        }

        let mut started = Vec::new();
        for _ in 0..count {
            match self.start_drop() {
                Ok(drop) => started.push(drop),
                Err(e) => {
                    log::warn!("Auto-drop stopped after {} of {}: {}", started.len(), due, e);
                    break;
                }
            }
        }
        started
    }

    fn settle(&mut self, drop: &ActiveDrop, outcome: &Outcome) {
        match *outcome {
            Outcome::Scored {
                slot_index,
                multiplier,
                payout,
            } => {
                self.wallet.credit(payout);
                self.summary.scored += 1;
                self.summary.total_paid_out += payout;
                let tier = MultiplierTier::of(multiplier);
                self.last_hit = Some(LastHit {
                    drop_number: drop.number(),
                    slot_index,
                    multiplier,
                    tier,
                });
                log::info!(
                    "Drop #{} hit slot {} at {}x ({}): paid {:.2}, balance {:.2}",
                    drop.number(),
                    slot_index,
                    multiplier,
                    tier.as_str(),
                    payout,
                    self.wallet.balance()
                );
            }
            Outcome::NoScore => {
                self.summary.no_score += 1;
                log::info!(
                    "Drop #{} landed outside the slots, balance {:.2}",
                    drop.number(),
                    self.wallet.balance()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::NOMINAL_FRAME_MS;

    fn seeded(seed: u64) -> Session {
        Session::new(Settings {
            seed: Some(seed),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_new_session() {
        let session = seeded(1);
        assert_eq!(session.wallet().balance(), 150.0);
        assert_eq!(session.wallet().bet(), 10.0);
        assert_eq!(session.layout().board.row_count, 12);
        assert_eq!(session.layout().multipliers.len(), 12);
        assert_eq!(session.summary().total_dropped, 0);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = Settings {
            rows: 0,
            ..Default::default()
        };
        assert!(matches!(Session::new(settings), Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_start_drop_debits_wager() {
        let mut session = seeded(2);
        let drop = session.start_drop().unwrap();
        assert_eq!(drop.number(), 1);
        assert_eq!(drop.wager(), 10.0);
        assert_eq!(session.wallet().balance(), 140.0);
        assert_eq!(session.summary().total_dropped, 1);
        assert_eq!(session.summary().total_wagered, 10.0);
    }

    #[test]
    fn test_invalid_wager_mutates_nothing() {
        let mut session = seeded(3);
        let layout = Arc::clone(session.layout());

        for wager in [0.0, -5.0, f64::NAN] {
            let result = session.start_drop_with(wager);
            assert!(matches!(result, Err(Error::InvalidWager(_))));
        }

        assert_eq!(session.wallet().balance(), 150.0);
        assert_eq!(session.summary(), SessionSummary {
            balance: 150.0,
            ..Default::default()
        });
        assert!(Arc::ptr_eq(&layout, session.layout()));
    }

    #[test]
    fn test_insufficient_funds() {
        let mut session = Session::new(Settings {
            starting_balance: 5.0,
            seed: Some(4),
            ..Default::default()
        })
        .unwrap();

        assert!(matches!(
            session.start_drop(),
            Err(Error::InsufficientFunds { .. })
        ));
        assert_eq!(session.wallet().balance(), 5.0);
        assert_eq!(session.summary().total_dropped, 0);
    }

    #[test]
    fn test_play_drop_settles_payout() {
        let mut session = seeded(5);
        let outcome = session.play_drop().unwrap();

        let expected = 140.0 + outcome.payout();
        assert!((session.wallet().balance() - expected).abs() < 1e-9);

        let summary = session.summary();
        assert_eq!(summary.total_dropped, 1);
        assert_eq!(summary.scored + summary.no_score, 1);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn test_many_drops_all_finish() {
        let mut session = Session::new(Settings {
            starting_balance: 1_000.0,
            seed: Some(6),
            ..Default::default()
        })
        .unwrap();

        let mut paid = 0.0;
        for _ in 0..20 {
            let outcome = session.play_drop().unwrap();
            if let Outcome::Scored { slot_index, multiplier, payout } = outcome {
                assert!(slot_index < 12);
                assert_eq!(session.layout().multipliers.get(slot_index), Some(multiplier));
                assert_eq!(payout, 10.0 * multiplier);
            }
            paid += outcome.payout();
        }

        let summary = session.summary();
        assert_eq!(summary.total_dropped, 20);
        assert_eq!(summary.scored + summary.no_score, 20);
        assert!((summary.total_paid_out - paid).abs() < 1e-9);
        assert!((summary.balance - (1_000.0 - 200.0 + paid)).abs() < 1e-9);
    }

    #[test]
    fn test_seeded_sessions_repeat() {
        let mut a = seeded(7);
        let mut b = seeded(7);
        for _ in 0..5 {
            assert_eq!(a.play_drop().unwrap(), b.play_drop().unwrap());
        }
        assert_eq!(a.wallet(), b.wallet());
    }

    #[test]
    fn test_set_rows() {
        let mut session = seeded(8);
        let before = Arc::clone(session.layout());

        assert!(session.set_rows(0).is_err());
        assert!(session.set_rows(99).is_err());
        assert!(Arc::ptr_eq(&before, session.layout()));

        session.set_rows(8).unwrap();
        assert_eq!(session.layout().board.row_count, 8);
        assert_eq!(session.layout().multipliers.len(), 8);
        assert_eq!(session.settings().rows, 8);
    }

    #[test]
    fn test_in_flight_drop_keeps_old_layout() {
        let mut session = seeded(9);
        let mut drop = session.start_drop().unwrap();
        session.advance(&mut drop, NOMINAL_FRAME_MS).unwrap();

        session.set_rows(4).unwrap();
        assert_eq!(drop.layout().board.row_count, 12);

        let outcome = loop {
            if let DropStatus::Finished(outcome) = session.advance(&mut drop, NOMINAL_FRAME_MS).unwrap() {
                break outcome;
            }
        };
        if let Outcome::Scored { slot_index, .. } = outcome {
            assert!(slot_index < 12);
        }

        // New drops use the new board
        let next = session.start_drop().unwrap();
        assert_eq!(next.layout().board.row_count, 4);
    }

    #[test]
    fn test_finished_drop_rejects_steps() {
        let mut session = seeded(10);
        let mut drop = session.start_drop().unwrap();
        while !matches!(session.advance(&mut drop, NOMINAL_FRAME_MS).unwrap(), DropStatus::Finished(_)) {}

        assert!(drop.is_finished());
        assert!(matches!(
            session.advance(&mut drop, NOMINAL_FRAME_MS),
            Err(Error::Simulation(_))
        ));
        assert_eq!(session.summary().failed, 0);
    }

    #[test]
    fn test_failed_step_pays_nothing() {
        let mut session = seeded(11);
        let mut drop = session.start_drop().unwrap();

        assert!(session.advance(&mut drop, f32::NAN).is_err());
        assert!(drop.is_finished());
        assert_eq!(session.wallet().balance(), 140.0);
        assert_eq!(session.summary().failed, 1);
    }

    #[test]
    fn test_abandon_keeps_wager() {
        let mut session = seeded(12);
        let drop = session.start_drop().unwrap();
        session.abandon(drop);

        assert_eq!(session.wallet().balance(), 140.0);
        assert_eq!(session.summary().abandoned, 1);
    }

    #[test]
    fn test_bet_adjustments() {
        let mut session = seeded(13);
        assert_eq!(session.halve_bet(), 5.0);
        assert_eq!(session.double_bet(), 10.0);

        assert!(matches!(session.set_bet(-1.0), Err(Error::InvalidWager(_))));
        assert_eq!(session.wallet().bet(), 10.0);

        session.set_bet(0.015).unwrap();
        assert_eq!(session.halve_bet(), 0.01);
        assert_eq!(session.halve_bet(), 0.01);
        assert_eq!(session.double_bet(), 0.02);
    }

    #[test]
    fn test_add_funds() {
        let mut session = seeded(14);
        assert_eq!(session.add_funds().unwrap(), 250.0);

        let mut wallet = Wallet::new(0.0, 1.0);
        assert!(wallet.add_funds(-3.0).is_err());
        assert_eq!(wallet.balance(), 0.0);
    }

    #[test]
    fn test_auto_drop_schedule() {
        let mut auto = AutoDrop::new(100.0).unwrap();
        assert_eq!(auto.advance(500.0), 0, "disabled schedule never fires");

        auto.set_enabled(true);
        assert_eq!(auto.advance(50.0), 0);
        assert_eq!(auto.advance(60.0), 1);
        assert_eq!(auto.advance(290.0), 3);

        // Changing the interval restarts the countdown
        auto.advance(90.0);
        auto.set_interval(200.0).unwrap();
        assert_eq!(auto.advance(150.0), 0);
        assert_eq!(auto.advance(50.0), 1);

        assert!(auto.set_interval(0.0).is_err());
        assert_eq!(auto.interval_ms(), 200.0);
    }

    #[test]
    fn test_auto_drop_rejects_bad_interval() {
        assert!(matches!(AutoDrop::new(0.0), Err(Error::InvalidConfiguration(_))));
        assert!(AutoDrop::new(-5.0).is_err());
        assert!(AutoDrop::new(f32::NAN).is_err());
    }

    #[test]
    fn test_auto_drop_backlog_is_capped() {
        let mut auto = AutoDrop::new(1.0).unwrap();
        auto.set_enabled(true);
        assert_eq!(auto.advance(1.0e9), MAX_AUTO_DROPS_PER_TICK);

        // The backlog is gone, not replayed on later ticks
        assert_eq!(auto.advance(0.5), 0);
        assert_eq!(auto.advance(0.5), 1);
    }

    #[test]
    fn test_tick_auto_starts_due_drops() {
        let mut session = seeded(15);
        session.set_auto_interval(100.0).unwrap();
        assert!(session.tick_auto(1_000.0).is_empty());

        session.set_auto_drop(true);
        let drops = session.tick_auto(250.0);
        assert_eq!(drops.len(), 2);
        assert_eq!(session.wallet().balance(), 130.0);
        assert_ne!(drops[0].number(), drops[1].number());
    }

    #[test]
    fn test_tick_auto_stops_when_broke() {
        let mut session = Session::new(Settings {
            starting_balance: 15.0,
            auto_drop_interval_ms: 100.0,
            seed: Some(16),
            ..Default::default()
        })
        .unwrap();
        session.set_auto_drop(true);

        let drops = session.tick_auto(300.0);
        assert_eq!(drops.len(), 1);
        assert_eq!(session.wallet().balance(), 5.0);
    }

    #[test]
    fn test_tick_auto_long_pause_starts_only_affordable_drops() {
        let mut session = Session::new(Settings {
            auto_drop_interval_ms: 1.0,
            seed: Some(18),
            ..Default::default()
        })
        .unwrap();
        session.set_auto_drop(true);

        let drops = session.tick_auto(1.0e9);
        assert_eq!(drops.len(), 15);
        assert_eq!(session.wallet().balance(), 0.0);
        assert_eq!(session.summary().total_dropped, 15);

        assert!(session.tick_auto(1.0e9).is_empty());
        assert_eq!(session.summary().total_dropped, 15);
    }

    #[test]
    fn test_tick_auto_caps_drops_per_tick() {
        let mut session = Session::new(Settings {
            starting_balance: 1_000.0,
            auto_drop_interval_ms: 1.0,
            seed: Some(19),
            ..Default::default()
        })
        .unwrap();
        session.set_auto_drop(true);

        let drops = session.tick_auto(1.0e9);
        assert_eq!(drops.len(), MAX_AUTO_DROPS_PER_TICK as usize);
        assert_eq!(session.wallet().balance(), 1_000.0 - 10.0 * drops.len() as f64);
    }

    #[test]
    fn test_drop_that_never_lands_fails() {
        let mut session = Session::new(Settings {
            physics: PhysicsConstants {
                gravity: 1e-6,
                ..Default::default()
            },
            seed: Some(20),
            ..Default::default()
        })
        .unwrap();

        assert!(matches!(session.play_drop(), Err(Error::Simulation(_))));
        let summary = session.summary();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.scored + summary.no_score, 0);
        assert_eq!(session.wallet().balance(), 140.0);
    }

    #[test]
    fn test_last_hit_follows_scored_drops() {
        let mut session = Session::new(Settings {
            starting_balance: 1_000.0,
            seed: Some(21),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(session.last_hit(), None);

        for _ in 0..50 {
            let before = session.last_hit();
            match session.play_drop().unwrap() {
                Outcome::Scored { slot_index, multiplier, .. } => {
                    let hit = session.last_hit().unwrap();
                    assert_eq!(hit.drop_number, session.summary().total_dropped);
                    assert_eq!(hit.slot_index, slot_index);
                    assert_eq!(hit.multiplier, multiplier);
                    assert_eq!(hit.tier, MultiplierTier::of(multiplier));
                }
                Outcome::NoScore => assert_eq!(session.last_hit(), before),
            }
        }
        assert!(session.summary().scored > 0);
    }

    #[test]
    fn test_concurrent_drops_are_independent() {
        let mut session = Session::new(Settings {
            starting_balance: 100.0,
            seed: Some(17),
            ..Default::default()
        })
        .unwrap();

        let mut drops: Vec<_> = (0..3).map(|_| session.start_drop().unwrap()).collect();
        let mut finished = 0;
        while finished < drops.len() {
            finished = 0;
            for drop in &mut drops {
                if drop.is_finished() {
                    finished += 1;
                    continue;
                }
                session.advance(drop, NOMINAL_FRAME_MS).unwrap();
            }
        }

        let summary = session.summary();
        assert_eq!(summary.scored + summary.no_score, 3);
        assert!((summary.balance - (70.0 + summary.total_paid_out)).abs() < 1e-9);
    }
}
