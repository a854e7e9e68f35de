//! Simulation loop driver
//!
//! Owns the game state, the RNG and the pacing bookkeeping. Each iteration:
//! poll input, wait out the minimum tick interval, step paddles and physics
//! with a clamped delta, then hand a frame to the presenter.

use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::renderer::{Frame, build_frame};
use crate::settings::{Settings, SettingsError};
use crate::sim::{GameEvent, GameState, PaddleInput, Score, SimError, TickReport, tick};

/// Loop state. There is no way back from `Terminated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// Every ball has been lost
    Terminated,
}

/// Input sampled at the top of a tick
#[derive(Debug, Clone, Default)]
pub struct InputFrame {
    /// Stop the loop before simulating this tick
    pub quit: bool,
    /// Control state per paddle, in paddle order
    pub paddles: Vec<PaddleInput>,
}

/// Source of per-tick input (keyboard, AI, scripted tests)
pub trait InputAdapter {
    fn poll(&mut self, state: &GameState) -> InputFrame;
}

/// Consumer of finished frames
pub trait Presenter {
    fn present(&mut self, frame: &Frame, events: &[GameEvent]);
}

/// Monotonic time source used for pacing
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin
    fn now(&self) -> Duration;
    /// Block until `duration` has passed
    fn sleep(&mut self, duration: Duration);
}

/// Wall-clock time
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Clock that only moves when told to; sleeping advances it instantly
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Duration,
}

impl ManualClock {
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, duration: Duration) {
        self.now += duration;
    }
}

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    AllBallsLost,
    Quit,
}

/// Summary of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub reason: StopReason,
    pub ticks: u64,
    pub score: Score,
}

/// Runs one match from start to termination
pub struct Driver<R: Rng = Pcg32> {
    settings: Settings,
    state: GameState,
    rng: R,
    run_state: RunState,
    last_tick: Option<Duration>,
}

impl Driver<Pcg32> {
    /// Validate settings and seed the jitter RNG (fresh seed unless configured)
    pub fn new(settings: Settings) -> Result<Self, SettingsError> {
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!("Jitter RNG seed: {}", seed);
        Self::with_rng(settings, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> Driver<R> {
    /// Build a driver around a caller-supplied RNG
    pub fn with_rng(settings: Settings, rng: R) -> Result<Self, SettingsError> {
        settings.validate()?;
        let state = GameState::new(&settings);
        Ok(Self {
            settings,
            state,
            rng,
            run_state: RunState::Running,
            last_tick: None,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Wait until the minimum tick interval has passed, then return the
    /// elapsed time since the previous tick clamped to `max_dt`.
    pub fn pace(&mut self, clock: &mut impl Clock) -> f32 {
        let min_interval = Duration::from_millis(self.settings.min_tick_interval_ms);
        let last = match self.last_tick {
            Some(last) => last,
            // First tick: pretend a full interval already elapsed
            None => clock.now().saturating_sub(min_interval),
        };

        let deadline = last + min_interval;
        let now = clock.now();
        if now < deadline {
            clock.sleep(deadline - now);
        }

        let now = clock.now();
        self.last_tick = Some(now);
        let dt = now.saturating_sub(last).as_secs_f32().min(self.settings.max_dt);
        log::trace!("tick dt = {:.4}s", dt);
        dt
    }

    /// Apply input, move paddles and run the physics for one step
    pub fn step(&mut self, input: &InputFrame, dt: f32) -> Result<TickReport, SimError> {
        if self.run_state == RunState::Terminated {
            return Ok(TickReport {
                events: Vec::new(),
                terminated: true,
            });
        }

        if self.state.apply_controls(&input.paddles) {
            log::info!("Score reset: a benched paddle entered play");
        }
        self.state.advance_paddles(dt, &self.settings);

        let report = tick(&mut self.state, &self.settings, dt, &mut self.rng)?;
        if report.terminated {
            self.run_state = RunState::Terminated;
        }
        Ok(report)
    }

    /// Drawable frame for the current state
    pub fn frame(&self) -> Frame {
        build_frame(&self.state, &self.settings)
    }

    /// Run until every ball is lost or the input asks to quit
    pub fn run(
        &mut self,
        clock: &mut impl Clock,
        input: &mut impl InputAdapter,
        presenter: &mut impl Presenter,
    ) -> Result<RunSummary, SimError> {
        log::info!("Starting {} match", self.settings.variant.as_str());

        let reason = loop {
            if self.run_state == RunState::Terminated {
                break StopReason::AllBallsLost;
            }

            let frame_input = input.poll(&self.state);
            if frame_input.quit {
                log::info!("Quit requested at tick {}", self.state.time_ticks);
                break StopReason::Quit;
            }

            let dt = self.pace(clock);
            let report = self.step(&frame_input, dt)?;
            presenter.present(&self.frame(), &report.events);
        };

        let summary = RunSummary {
            reason,
            ticks: self.state.time_ticks,
            score: self.state.score,
        };
        log::info!(
            "Match over ({:?}) after {} ticks, goals conceded {:?}",
            summary.reason,
            summary.ticks,
            summary.score.conceded
        );
        Ok(summary)
    }
}
