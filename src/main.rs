//! Brick Pong entry point
//!
//! Runs a headless match driven by the autopilot and reports it through the
//! log. Usage: `brick-pong [breakout|versus|<settings.json>] [max-ticks]`.

use std::process::ExitCode;

use brick_pong::driver::{Presenter, SystemClock};
use brick_pong::renderer::{Frame, ShapeKind};
use brick_pong::sim::GameEvent;
use brick_pong::{AutoPilot, Driver, Settings, SettingsError, Variant};

/// Presenter that narrates the match through `log`
#[derive(Default)]
struct LogPresenter {
    frames: u64,
}

impl Presenter for LogPresenter {
    fn present(&mut self, frame: &Frame, events: &[GameEvent]) {
        self.frames += 1;
        for event in events {
            match event {
                GameEvent::BallSpawned { parent, ball } => {
                    log::info!("Ball {} split into {}", parent, ball)
                }
                GameEvent::Goal { edge, score } => {
                    log::info!("GOAL past {:?}! conceded {:?}", edge, score.conceded)
                }
                other => log::trace!("{:?}", other),
            }
        }
        // Once a second at 60 fps
        if self.frames % 60 == 0 {
            log::debug!(
                "frame {}: {} balls, {} blocks, {} paddles",
                self.frames,
                frame.count(ShapeKind::Ball),
                frame.count(ShapeKind::Block),
                frame.count(ShapeKind::Paddle)
            );
        }
    }
}

fn load_settings(arg: Option<&str>) -> Result<Settings, SettingsError> {
    match arg {
        None => Ok(Settings::default()),
        Some(name) => match Variant::from_str(name) {
            Some(variant) => Ok(Settings::for_variant(variant)),
            None => Settings::load(name),
        },
    }
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Brick Pong (native, headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = match load_settings(args.first().map(String::as_str)) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Could not load settings: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let limit = match args.get(1).map(|s| s.parse::<u64>()) {
        None => None,
        Some(Ok(n)) => Some(n),
        Some(Err(e)) => {
            log::error!("Invalid tick limit {:?}: {}", args[1], e);
            return ExitCode::FAILURE;
        }
    };

    let mut driver = match Driver::new(settings) {
        Ok(driver) => driver,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut pilot = limit.map(AutoPilot::with_limit).unwrap_or_default();
    let mut presenter = LogPresenter::default();
    let mut clock = SystemClock::default();

    match driver.run(&mut clock, &mut pilot, &mut presenter) {
        Ok(summary) => {
            println!(
                "{:?} after {} ticks, goals conceded {:?}",
                summary.reason, summary.ticks, summary.score.conceded
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Simulation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
