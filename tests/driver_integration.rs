use brick_pong::driver::{ManualClock, RunSummary, StopReason};
use brick_pong::renderer::{Frame, ShapeKind};
use brick_pong::settings::BallSpec;
use brick_pong::sim::{GameEvent, GameState, PaddleInput};
use brick_pong::*;
use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Records everything handed to it
#[derive(Default)]
struct Recorder {
    frames: Vec<Frame>,
    events: Vec<GameEvent>,
}

impl Presenter for Recorder {
    fn present(&mut self, frame: &Frame, events: &[GameEvent]) {
        self.frames.push(frame.clone());
        self.events.extend_from_slice(events);
    }
}

/// Presses nothing; quits after `limit` polls
struct Idle {
    polls: u64,
    limit: u64,
}

impl InputAdapter for Idle {
    fn poll(&mut self, state: &GameState) -> InputFrame {
        self.polls += 1;
        InputFrame {
            quit: self.polls > self.limit,
            paddles: vec![PaddleInput::default(); state.paddles.len()],
        }
    }
}

/// Waits for the first goal, then brings the benched right paddle in
#[derive(Default)]
struct Challenger {
    joined_at: Option<u64>,
}

impl InputAdapter for Challenger {
    fn poll(&mut self, state: &GameState) -> InputFrame {
        let mut paddles = vec![PaddleInput::default(); state.paddles.len()];
        if let Some(tick) = self.joined_at {
            return InputFrame {
                quit: state.time_ticks > tick + 2,
                paddles,
            };
        }
        if state.score.conceded[0] > 0 {
            paddles[1].positive = true;
            self.joined_at = Some(state.time_ticks);
        }
        InputFrame {
            quit: state.time_ticks > 1000,
            paddles,
        }
    }
}

fn run_with(settings: Settings, seed: u64, input: &mut impl InputAdapter) -> (RunSummary, Recorder) {
    let mut driver = Driver::with_rng(settings, Pcg32::seed_from_u64(seed)).unwrap();
    let mut clock = ManualClock::default();
    let mut recorder = Recorder::default();
    let summary = driver.run(&mut clock, input, &mut recorder).unwrap();
    (summary, recorder)
}

#[test]
fn test_unguarded_breakout_runs_to_termination() {
    let mut settings = Settings::for_variant(Variant::Breakout);
    settings.paddles.clear();

    let mut input = Idle { polls: 0, limit: 10_000 };
    let (summary, recorder) = run_with(settings, 7, &mut input);

    assert_eq!(summary.reason, StopReason::AllBallsLost);
    assert_eq!(summary.ticks, recorder.frames.len() as u64);
    // An exit edge loses the ball without scoring
    assert_eq!(summary.score.conceded, [0, 0]);
    assert!(
        recorder
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::BallLost { .. }))
    );
    assert_eq!(recorder.frames.last().unwrap().count(ShapeKind::Ball), 0);
}

#[test]
fn test_autopilot_run_respects_ball_cap() {
    let settings = Settings::for_variant(Variant::Breakout);
    let max_balls = settings.max_balls;

    let mut pilot = AutoPilot::with_limit(3_000);
    let (summary, recorder) = run_with(settings, 42, &mut pilot);

    assert_eq!(summary.ticks, recorder.frames.len() as u64);
    for frame in &recorder.frames {
        assert!(frame.count(ShapeKind::Ball) <= max_balls);
    }
    // Every hit lands on a block that existed at the start
    let blocks = Settings::for_variant(Variant::Breakout)
        .layout
        .map(|l| l.block_rects(15.0).len())
        .unwrap_or(0);
    let destroyed = recorder
        .events
        .iter()
        .filter(|e| matches!(e, GameEvent::BlockDestroyed { .. }))
        .count();
    assert!(destroyed <= blocks);
}

#[test]
fn test_same_seed_same_match() {
    let settings = Settings::for_variant(Variant::Breakout);

    let (a, rec_a) = run_with(settings.clone(), 99, &mut AutoPilot::with_limit(1_500));
    let (b, rec_b) = run_with(settings, 99, &mut AutoPilot::with_limit(1_500));

    assert_eq!(a, b);
    assert_eq!(rec_a.events, rec_b.events);
    assert_eq!(rec_a.frames, rec_b.frames);
}

#[test]
fn test_versus_challenger_resets_score() {
    let mut settings = Settings::for_variant(Variant::Versus);
    // A second ball keeps the match alive after the first goal
    settings.balls.push(BallSpec {
        pos: Vec2::new(400.0, 100.0),
        vel: Vec2::new(1.0, 200.0),
        size: 15.0,
    });

    let mut challenger = Challenger::default();
    let (summary, recorder) = run_with(settings, 5, &mut challenger);

    assert!(challenger.joined_at.is_some());
    assert!(recorder.events.iter().any(|e| matches!(
        e,
        GameEvent::Goal {
            edge: sim::Edge::Left,
            ..
        }
    )));
    assert_eq!(summary.reason, StopReason::Quit);
    assert_eq!(summary.score.conceded, [0, 0]);
    // Both paddles are drawn once the challenger is in
    assert_eq!(recorder.frames.last().unwrap().count(ShapeKind::Paddle), 2);
}

#[test]
fn test_settings_file_round_trip_drives_a_match() {
    let path = std::env::temp_dir().join(format!("brick-pong-{}.json", std::process::id()));
    let mut settings = Settings::for_variant(Variant::Versus);
    settings.seed = Some(11);
    settings.save(&path).unwrap();

    let loaded = Settings::load(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded.seed, Some(11));
    assert_eq!(loaded.paddles.len(), 2);

    let mut driver = Driver::new(loaded).unwrap();
    let mut clock = ManualClock::default();
    let mut recorder = Recorder::default();
    let mut input = Idle { polls: 0, limit: 5 };
    let summary = driver.run(&mut clock, &mut input, &mut recorder).unwrap();
    assert_eq!(summary.reason, StopReason::Quit);
    assert_eq!(summary.ticks, 5);
    assert_eq!(driver.run_state(), RunState::Running);
}
