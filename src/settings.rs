//! Game settings
//!
//! Every tunable of a match lives in one [`Settings`] record. Presets cover
//! the two shipped variants; anything else can be loaded from JSON.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::geometry::Edge;
use crate::sim::layout::BlockLayout;
use crate::sim::state::{Controls, PaddleRole};

/// Game variant presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// One paddle at the bottom, blocks at the top, bottom edge is a miss
    #[default]
    Breakout,
    /// Two goal-keeping paddles on the left/right edges
    Versus,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Breakout => "Breakout",
            Variant::Versus => "Versus",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "breakout" | "arkanoid" => Some(Variant::Breakout),
            "versus" | "pong" | "vs" => Some(Variant::Versus),
            _ => None,
        }
    }
}

/// How an edge of the playfield treats a ball reaching it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryKind {
    /// Thick wall: the ball bounces off it
    Wall,
    /// The ball is lost, nobody scores
    Exit,
    /// The ball is lost and the side owning this edge concedes a goal
    Goal,
}

/// Boundary behaviour for each playfield edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundaries {
    pub left: BoundaryKind,
    pub right: BoundaryKind,
    pub top: BoundaryKind,
    pub bottom: BoundaryKind,
}

impl Boundaries {
    pub fn kind(&self, edge: Edge) -> BoundaryKind {
        match edge {
            Edge::Left => self.left,
            Edge::Right => self.right,
            Edge::Top => self.top,
            Edge::Bottom => self.bottom,
        }
    }
}

/// Initial paddle placement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaddleSpec {
    /// Edge the paddle guards; decides its axis of motion
    pub edge: Edge,
    pub role: PaddleRole,
    pub center: Vec2,
    /// Extent along the axis of motion
    pub length: f32,
    /// Extent across the axis of motion
    pub thickness: f32,
    /// Pixels per second
    pub speed: f32,
    /// Benched paddles are inactive until one of their controls is pressed
    pub active: bool,
    pub controls: Controls,
}

/// Initial ball placement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallSpec {
    /// Top-left corner of the ball's box
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
}

/// Settings errors
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Match configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Preset these settings were derived from
    pub variant: Variant,

    // === Playfield ===
    pub field_width: f32,
    pub field_height: f32,
    /// Wall thickness; walls sit inside the field
    pub thickness: f32,
    pub boundaries: Boundaries,

    // === Entities ===
    pub paddles: Vec<PaddleSpec>,
    pub balls: Vec<BallSpec>,
    /// Block grid, if this variant has blocks
    pub layout: Option<BlockLayout>,

    // === Rules ===
    /// A ball splits once its consecutive hits exceed this
    pub spawn_hit_threshold: u32,
    /// A block is destroyed once its hits exceed this
    pub destruction_hit_threshold: u32,
    /// Hard cap on live balls
    pub max_balls: usize,
    /// Per-hit speed-up as a fraction of the ball's launch speed
    pub acceleration_ratio: f32,

    // === Timing ===
    pub min_tick_interval_ms: u64,
    /// Upper bound on a single simulation step (seconds)
    pub max_dt: f32,

    /// RNG seed for spawn jitter; a fresh one is drawn per process if unset
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::for_variant(Variant::default())
    }
}

impl Settings {
    /// Build the preset for a game variant
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Breakout => Self::breakout(),
            Variant::Versus => Self::versus(),
        }
    }

    fn base(variant: Variant) -> Self {
        Self {
            variant,
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            thickness: THICKNESS,
            boundaries: Boundaries {
                left: BoundaryKind::Wall,
                right: BoundaryKind::Wall,
                top: BoundaryKind::Wall,
                bottom: BoundaryKind::Wall,
            },
            paddles: Vec::new(),
            balls: vec![BallSpec {
                pos: Vec2::new(
                    FIELD_WIDTH / 2.0 - THICKNESS / 2.0,
                    FIELD_HEIGHT / 2.0 - THICKNESS / 2.0,
                ),
                vel: Vec2::new(BALL_START_VX, BALL_START_VY),
                size: THICKNESS,
            }],
            layout: None,
            spawn_hit_threshold: SPAWN_HIT_THRESHOLD,
            destruction_hit_threshold: DESTRUCTION_HIT_THRESHOLD,
            max_balls: MAX_BALLS,
            acceleration_ratio: ACCELERATION_RATIO,
            min_tick_interval_ms: MIN_TICK_INTERVAL_MS,
            max_dt: MAX_DT,
            seed: None,
        }
    }

    fn breakout() -> Self {
        let mut settings = Self::base(Variant::Breakout);
        settings.boundaries.bottom = BoundaryKind::Exit;
        settings.paddles.push(PaddleSpec {
            edge: Edge::Bottom,
            role: PaddleRole::Wall,
            center: Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT - 1.5 * THICKNESS),
            length: PADDLE_LENGTH,
            thickness: THICKNESS,
            speed: PADDLE_SPEED,
            active: true,
            controls: Controls::new("A", "D"),
        });
        settings.layout = Some(BlockLayout::classic(FIELD_WIDTH, FIELD_HEIGHT, THICKNESS));
        settings
    }

    fn versus() -> Self {
        let mut settings = Self::base(Variant::Versus);
        settings.boundaries.left = BoundaryKind::Goal;
        settings.boundaries.right = BoundaryKind::Goal;
        settings.balls[0].vel = Vec2::new(-BALL_START_VY, BALL_START_VX);

        let paddle = |edge: Edge, x: f32, active: bool, controls: Controls| PaddleSpec {
            edge,
            role: PaddleRole::Goal,
            center: Vec2::new(x, FIELD_HEIGHT / 2.0),
            length: PADDLE_LENGTH,
            thickness: THICKNESS,
            speed: PADDLE_SPEED,
            active,
            controls,
        };
        settings
            .paddles
            .push(paddle(Edge::Left, 2.0 * THICKNESS, true, Controls::new("W", "S")));
        // Right paddle waits on the bench until someone presses its keys
        settings.paddles.push(paddle(
            Edge::Right,
            FIELD_WIDTH - 2.0 * THICKNESS,
            false,
            Controls::new("Up", "Down"),
        ));
        settings
    }

    /// Playfield size as a vector
    pub fn field(&self) -> Vec2 {
        Vec2::new(self.field_width, self.field_height)
    }

    /// Check the record for values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |msg: String| Err(SettingsError::Invalid(msg));

        if self.field_width <= 0.0 || self.field_height <= 0.0 {
            return invalid(format!(
                "playfield must be positive, got {}x{}",
                self.field_width, self.field_height
            ));
        }
        if self.thickness < 0.0 || 2.0 * self.thickness >= self.field_width.min(self.field_height) {
            return invalid(format!("wall thickness {} does not fit the field", self.thickness));
        }
        if self.max_balls == 0 {
            return invalid("max_balls must be at least 1".into());
        }
        if self.balls.is_empty() {
            return invalid("at least one ball is required".into());
        }
        if self.balls.len() > self.max_balls {
            return invalid(format!(
                "{} initial balls exceed the cap of {}",
                self.balls.len(),
                self.max_balls
            ));
        }
        for (i, ball) in self.balls.iter().enumerate() {
            if ball.vel.x == 0.0 || ball.vel.y == 0.0 {
                return invalid(format!("ball {i} has a zero velocity component"));
            }
            if ball.size <= 0.0 {
                return invalid(format!("ball {i} has non-positive size"));
            }
        }
        for (i, paddle) in self.paddles.iter().enumerate() {
            if paddle.length <= 0.0 || paddle.thickness <= 0.0 || paddle.speed < 0.0 {
                return invalid(format!("paddle {i} has invalid dimensions or speed"));
            }
            let span = match paddle.edge {
                Edge::Top | Edge::Bottom => self.field_width,
                Edge::Left | Edge::Right => self.field_height,
            };
            if paddle.length > span - 2.0 * self.thickness {
                return invalid(format!("paddle {i} is longer than its track"));
            }
        }
        if let Some(layout) = &self.layout {
            layout.validate().map_err(SettingsError::Invalid)?;
        }
        if self.max_dt <= 0.0 {
            return invalid("max_dt must be positive".into());
        }
        Ok(())
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded {} settings from {}", settings.variant.as_str(), path.display());
        Ok(settings)
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        Settings::for_variant(Variant::Breakout).validate().unwrap();
        Settings::for_variant(Variant::Versus).validate().unwrap();
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!(Variant::from_str("PONG"), Some(Variant::Versus));
        assert_eq!(Variant::from_str("breakout"), Some(Variant::Breakout));
        assert_eq!(Variant::from_str("tetris"), None);
        assert_eq!(Variant::Versus.as_str(), "Versus");
    }

    #[test]
    fn test_breakout_preset_shape() {
        let settings = Settings::for_variant(Variant::Breakout);
        assert_eq!(settings.paddles.len(), 1);
        assert_eq!(settings.boundaries.kind(Edge::Bottom), BoundaryKind::Exit);
        assert_eq!(settings.boundaries.kind(Edge::Top), BoundaryKind::Wall);
        assert!(settings.layout.is_some());
    }

    #[test]
    fn test_versus_preset_benches_right_paddle() {
        let settings = Settings::for_variant(Variant::Versus);
        assert_eq!(settings.paddles.len(), 2);
        assert!(settings.paddles[0].active);
        assert!(!settings.paddles[1].active);
        assert_eq!(settings.boundaries.kind(Edge::Left), BoundaryKind::Goal);
        assert!(settings.layout.is_none());
    }

    #[test]
    fn test_validate_rejects_zero_velocity() {
        let mut settings = Settings::default();
        settings.balls[0].vel.x = 0.0;
        assert!(matches!(settings.validate(), Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_too_many_balls() {
        let mut settings = Settings::default();
        settings.max_balls = 1;
        settings.balls.push(settings.balls[0].clone());
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_json_roundtrip_through_file() {
        let path = std::env::temp_dir().join(format!("brick_pong_settings_{}.json", std::process::id()));
        let mut settings = Settings::for_variant(Variant::Versus);
        settings.seed = Some(42);
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded.variant, Variant::Versus);
        assert_eq!(loaded.seed, Some(42));
        assert_eq!(loaded.paddles.len(), 2);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Settings::load("/nonexistent/brick-pong.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
