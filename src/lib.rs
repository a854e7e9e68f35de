//! Brick Pong - a Pong/Breakout hybrid
//!
//! Core modules:
//! - `sim`: Simulation core (entities, collisions, spawning, scoring)
//! - `autopilot`: Demo-mode AI input
//! - `driver`: Loop driver (clock, pacing, input -> physics -> present)
//! - `renderer`: Maps simulation state to drawable rectangles
//! - `settings`: The single configuration record and game presets

pub mod autopilot;
pub mod driver;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use autopilot::AutoPilot;
pub use driver::{Clock, Driver, InputAdapter, InputFrame, Presenter, RunState};
pub use settings::{Settings, SettingsError, Variant};

use glam::Vec2;

/// Game configuration constants (defaults for [`Settings`])
pub mod consts {
    /// Playfield dimensions
    pub const FIELD_WIDTH: f32 = 640.0;
    pub const FIELD_HEIGHT: f32 = 480.0;
    /// Wall thickness, also the default ball size and paddle height
    pub const THICKNESS: f32 = 15.0;

    /// Consecutive hits a ball must exceed before it splits
    pub const SPAWN_HIT_THRESHOLD: u32 = 3;
    /// Hits a block must exceed before it is destroyed
    pub const DESTRUCTION_HIT_THRESHOLD: u32 = 3;
    /// Hard ceiling on live balls
    pub const MAX_BALLS: usize = 3;

    /// Ball acceleration per hit, as a fraction of its launch speed per axis
    pub const ACCELERATION_RATIO: f32 = 0.05;

    /// Frame pacing
    pub const MIN_TICK_INTERVAL_MS: u64 = 16;
    pub const MAX_DT: f32 = 0.05;

    /// Paddle defaults
    pub const PADDLE_LENGTH: f32 = 100.0;
    pub const PADDLE_SPEED: f32 = 300.0;

    /// Ball launch velocity
    pub const BALL_START_VX: f32 = 100.0;
    pub const BALL_START_VY: f32 = 200.0;
}

/// Per-axis acceleration magnitude for a ball launched with `vel`
#[inline]
pub fn acceleration_for(vel: Vec2, ratio: f32) -> Vec2 {
    vel.abs() * ratio
}
