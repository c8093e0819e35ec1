use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

use crate::board::Board;
use crate::clock::{SessionClock, TimerAction, TimerId};
use crate::error::GameError;
use crate::game_config::GameConfig;
use crate::stats::{HistoryStore, StatsRecorder};
use crate::symbols::SymbolGenerator;
use crate::target::Target;

/// Boundary to whatever presents the game. The session never touches
/// screens or widgets directly; these four calls are its whole view surface.
pub trait ViewController {
    fn show_peek_affordance(&mut self);
    fn hide_peek_affordance(&mut self);
    fn report_lives_remaining(&mut self, lives: u32);
    fn present_summary(&mut self, text: &str);
}

/// View that swallows everything, for headless sessions.
#[derive(Debug, Default)]
pub struct NullView;

impl ViewController for NullView {
    fn show_peek_affordance(&mut self) {}
    fn hide_peek_affordance(&mut self) {}
    fn report_lives_remaining(&mut self, _lives: u32) {}
    fn present_summary(&mut self, _text: &str) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed,
    Aborted,
}

/// What one pointer event resolved to. A click on empty space and a click on
/// an out-of-order target are both misses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Hit,
    Miss,
}

/// One play-through from setup to finish/abort: owns the board, the symbol
/// series, the timer registry, and the click statistics, and drives every
/// state transition between them.
pub struct GameSession {
    config: GameConfig,
    pub board: Board,
    generator: SymbolGenerator,
    clock: SessionClock,
    stats: StatsRecorder,
    store: Option<Box<dyn HistoryStore>>,
    lives_remaining: Option<u32>,
    auto_spawn: Option<TimerId>,
    outcome: Option<SessionOutcome>,
    rng: StdRng,
}

impl GameSession {
    /// Setup -> Running: place the initial targets, arm the visibility and
    /// auto-spawn timers, and surface lives/peek state through the view.
    pub fn new(
        config: GameConfig,
        width: u32,
        height: u32,
        now: Instant,
        view: &mut dyn ViewController,
        store: Option<Box<dyn HistoryStore>>,
    ) -> Result<Self, GameError> {
        let generator = config.symbol_generator.build();
        let mut session = Self {
            stats: StatsRecorder::new(config.clone()),
            board: Board::new(width, height),
            generator,
            clock: SessionClock::new(),
            store,
            // 0 lives means unlimited.
            lives_remaining: config.lives.filter(|lives| *lives > 0),
            auto_spawn: None,
            outcome: None,
            rng: StdRng::from_entropy(),
            config,
        };

        for _ in 0..session.config.amount {
            session.add_number()?;
        }

        if session.config.enable_show_button.is_some() {
            view.show_peek_affordance();
        }
        if let Some(lives) = session.lives_remaining {
            view.report_lives_remaining(lives);
        }
        if let Some(secs) = session.config.hide_numbers_after {
            session.schedule(TimerAction::HideLabels, secs, now)?;
        }
        session.reset_auto_spawn(now)?;

        Ok(session)
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        self.outcome
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn stats(&self) -> &StatsRecorder {
        &self.stats
    }

    pub fn lives_remaining(&self) -> Option<u32> {
        self.lives_remaining
    }

    /// Spawns one target with the next symbol. Silent no-op once the series
    /// is exhausted; a board with no free spot left is fatal.
    fn add_number(&mut self) -> Result<(), GameError> {
        if self.generator.is_last() {
            return Ok(());
        }
        let (x, y) = self.board.find_free_spot(&mut self.rng)?;
        let label = self.generator.next();
        let color = self.generator.color();
        self.board.targets.add(Target::new(x, y, label, color));
        Ok(())
    }

    /// Delay 0 applies the action synchronously instead of registering it.
    fn schedule(&mut self, action: TimerAction, secs: u32, now: Instant) -> Result<(), GameError> {
        if secs == 0 {
            self.apply(action)
        } else {
            self.clock
                .after(action, Duration::from_secs(u64::from(secs)), now);
            Ok(())
        }
    }

    /// At most one auto-spawn interval is live per session: re-arming always
    /// replaces the previous one, which is how a miss delays the next
    /// automatic spawn.
    fn reset_auto_spawn(&mut self, now: Instant) -> Result<(), GameError> {
        let Some(secs) = self.config.auto_add_number_interval else {
            return Ok(());
        };
        if let Some(previous) = self.auto_spawn.take() {
            self.clock.cancel(previous);
        }
        if secs == 0 {
            // An interval of zero fires once, synchronously.
            self.add_number()
        } else {
            self.auto_spawn = Some(self.clock.every(
                TimerAction::AutoSpawn,
                Duration::from_secs(u64::from(secs)),
                now,
            ));
            Ok(())
        }
    }

    fn apply(&mut self, action: TimerAction) -> Result<(), GameError> {
        match action {
            TimerAction::HideLabels => self.board.numbers_hidden = true,
            TimerAction::RevealLabels => self.board.numbers_hidden = false,
            TimerAction::AutoSpawn => self.add_number()?,
        }
        Ok(())
    }

    /// Fires every due timer. Call once per event-loop tick.
    pub fn on_tick(&mut self, now: Instant) -> Result<(), GameError> {
        if self.is_finished() {
            return Ok(());
        }
        for action in self.clock.fire_due(now) {
            self.apply(action)?;
        }
        Ok(())
    }

    /// Resolves one pointer event in board pixel space. All state mutations
    /// land synchronously before this returns, so the next redraw always
    /// reflects a consistent post-click state.
    pub fn on_click(
        &mut self,
        x: i32,
        y: i32,
        now: Instant,
        view: &mut dyn ViewController,
    ) -> Result<ClickOutcome, GameError> {
        if self.is_finished() {
            return Ok(ClickOutcome::Miss);
        }

        self.stats.click();
        if self.config.hide_after_first_click {
            self.board.numbers_hidden = true;
        }

        let hit_label = self
            .board
            .targets
            .find_hit(x, y)?
            .map(|target| target.label.clone());

        if let Some(label) = hit_label {
            if self.board.targets.tap_target(&label) {
                self.stats.correct(&label);
                if self.board.targets.all_cleared() {
                    self.finish(SessionOutcome::Completed, view);
                } else if self.config.add_number_on_target_hit {
                    self.add_number()?;
                }
                return Ok(ClickOutcome::Hit);
            }
        }

        // Miss: empty space, or a real target that is not the queue front.
        if self.config.add_number_on_misclick {
            self.add_number()?;
        }
        if let Some(remaining) = self.lives_remaining.as_mut() {
            *remaining -= 1;
            let left = *remaining;
            view.report_lives_remaining(left);
            if left == 0 {
                self.finish(SessionOutcome::Completed, view);
                return Ok(ClickOutcome::Miss);
            }
        }
        if let Some(secs) = self.config.show_numbers_on_misclick {
            self.board.numbers_hidden = false;
            self.schedule(TimerAction::HideLabels, secs, now)?;
        }
        self.reset_auto_spawn(now)?;

        Ok(ClickOutcome::Miss)
    }

    /// Peek control: spawn one extra target, reveal every label, re-hide
    /// after the configured reveal duration. Independent of the session's
    /// own hide schedule.
    pub fn on_peek(&mut self, now: Instant) -> Result<(), GameError> {
        let Some(secs) = self.config.enable_show_button else {
            return Ok(());
        };
        if self.is_finished() {
            return Ok(());
        }
        self.add_number()?;
        self.board.numbers_hidden = false;
        self.schedule(TimerAction::HideLabels, secs, now)
    }

    /// Running -> Finished (terminal). Cancels every outstanding timer,
    /// finalizes the stats, and hands the summary to the view. Repeat calls
    /// are no-ops. Store write failures do not interrupt teardown.
    pub fn finish(&mut self, outcome: SessionOutcome, view: &mut dyn ViewController) {
        if self.outcome.is_some() {
            return;
        }
        self.outcome = Some(outcome);
        self.auto_spawn = None;
        self.clock.cancel_all();
        let _ = self.stats.finish(self.store.as_deref());
        if self.config.enable_show_button.is_some() {
            view.hide_peek_affordance();
        }
        if outcome == SessionOutcome::Completed {
            view.present_summary(&self.stats.summary_text());
        }
    }
}
