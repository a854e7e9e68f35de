//! Game state and core simulation types
//!
//! All entities are plain records; the tick engine is the only thing that
//! mutates balls and blocks during a step.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Axis, Edge, Rect};
use crate::acceleration_for;
use crate::settings::{BallSpec, PaddleSpec, Settings};

/// How a paddle responds to a ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaddleRole {
    /// Acts as a moving wall segment: reflects and speeds the ball up on both axes
    Wall,
    /// Guards a goal line: reflects and speeds the ball up along its normal only
    Goal,
}

/// Names of the two controls a paddle listens to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    /// Moves the paddle toward smaller coordinates (left/up)
    pub negative: String,
    /// Moves the paddle toward larger coordinates (right/down)
    pub positive: String,
}

impl Controls {
    pub fn new(negative: &str, positive: &str) -> Self {
        Self {
            negative: negative.to_string(),
            positive: positive.to_string(),
        }
    }
}

/// Pressed state of a paddle's two controls for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaddleInput {
    pub negative: bool,
    pub positive: bool,
}

impl PaddleInput {
    /// Movement direction; both pressed cancel out
    pub fn direction(&self) -> i8 {
        self.positive as i8 - self.negative as i8
    }

    pub fn any(&self) -> bool {
        self.negative || self.positive
    }
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    /// Top-left corner of the collision box
    pub pos: Vec2,
    pub vel: Vec2,
    /// Unsigned per-axis speed-up applied on every qualifying hit
    pub accel: Vec2,
    pub size: Vec2,
    pub on_screen: bool,
    /// Hits since the last split
    pub hits: u32,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, size: f32, acceleration_ratio: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            accel: acceleration_for(vel, acceleration_ratio),
            size: Vec2::splat(size),
            on_screen: true,
            hits: 0,
        }
    }

    fn from_spec(id: u32, spec: &BallSpec, acceleration_ratio: f32) -> Self {
        Self::new(id, spec.pos, spec.vel, spec.size, acceleration_ratio)
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Explicit Euler step
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }
}

/// A player paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub id: u32,
    /// Field edge this paddle guards
    pub edge: Edge,
    pub role: PaddleRole,
    pub center: Vec2,
    /// Width and height of the paddle box
    pub size: Vec2,
    /// Pixels per second
    pub speed: f32,
    /// -1, 0 or +1 along the axis of motion
    pub dir: i8,
    /// Benched paddles neither move nor collide
    pub on_screen: bool,
    pub controls: Controls,
}

impl Paddle {
    fn from_spec(id: u32, spec: &PaddleSpec) -> Self {
        let size = match spec.edge {
            Edge::Top | Edge::Bottom => Vec2::new(spec.length, spec.thickness),
            Edge::Left | Edge::Right => Vec2::new(spec.thickness, spec.length),
        };
        Self {
            id,
            edge: spec.edge,
            role: spec.role,
            center: spec.center,
            size,
            speed: spec.speed,
            dir: 0,
            on_screen: spec.active,
            controls: spec.controls.clone(),
        }
    }

    /// Axis the paddle slides along (parallel to the edge it guards)
    pub fn motion_axis(&self) -> Axis {
        self.edge.normal_axis().other()
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.center, self.size)
    }

    /// Move along the track and clamp inside the walls
    pub fn advance(&mut self, dt: f32, field: Vec2, thickness: f32) {
        let axis = self.motion_axis();
        let half = axis.of(self.size) / 2.0;
        let lo = thickness + half;
        let hi = (axis.of(field) - thickness - half).max(lo);

        let pos = axis.of_mut(&mut self.center);
        *pos += self.dir as f32 * self.speed * dt;
        *pos = pos.clamp(lo, hi);
    }
}

/// A destructible block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    pub rect: Rect,
    pub on_screen: bool,
    pub hits: u32,
}

/// Goals conceded per side (slot 0: left/top, slot 1: right/bottom)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub conceded: [u32; 2],
}

impl Score {
    pub fn record(&mut self, edge: Edge) {
        self.conceded[edge.score_slot()] += 1;
    }

    pub fn reset(&mut self) {
        self.conceded = [0, 0];
    }
}

/// Things that happened during a tick, for presenters and logs
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    PaddleHit { ball: u32, paddle: u32 },
    BlockHit { ball: u32, block: u32 },
    BlockDestroyed { block: u32 },
    WallBounce { ball: u32, edge: Edge },
    BallSpawned { parent: u32, ball: u32 },
    /// Split was due but the live-ball cap was reached
    SpawnSuppressed { ball: u32 },
    BallLost { ball: u32, edge: Edge },
    Goal { edge: Edge, score: Score },
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Simulation tick counter
    pub time_ticks: u64,
    pub paddles: Vec<Paddle>,
    /// Live balls (sorted by id)
    pub balls: Vec<Ball>,
    /// Live blocks (sorted by id)
    pub blocks: Vec<Block>,
    pub score: Score,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Build the match-start state described by `settings`
    pub fn new(settings: &Settings) -> Self {
        let mut state = Self {
            time_ticks: 0,
            paddles: Vec::new(),
            balls: Vec::new(),
            blocks: Vec::new(),
            score: Score::default(),
            next_id: 1,
        };

        for spec in &settings.paddles {
            let id = state.next_entity_id();
            state.paddles.push(Paddle::from_spec(id, spec));
        }
        for spec in &settings.balls {
            let id = state.next_entity_id();
            state
                .balls
                .push(Ball::from_spec(id, spec, settings.acceleration_ratio));
        }
        if let Some(layout) = &settings.layout {
            for rect in layout.block_rects(settings.thickness) {
                let id = state.next_entity_id();
                state.blocks.push(Block {
                    id,
                    rect,
                    on_screen: true,
                    hits: 0,
                });
            }
        }

        log::info!(
            "{} match: {} paddles, {} balls, {} blocks",
            settings.variant.as_str(),
            state.paddles.len(),
            state.balls.len(),
            state.blocks.len()
        );
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Apply this tick's control state to the paddles.
    ///
    /// Missing entries count as nothing pressed. Pressing either control of
    /// a benched paddle brings it into play and resets the score. Returns
    /// whether that reset happened.
    pub fn apply_controls(&mut self, inputs: &[PaddleInput]) -> bool {
        let mut reset = false;
        for (i, paddle) in self.paddles.iter_mut().enumerate() {
            let input = inputs.get(i).copied().unwrap_or_default();
            paddle.dir = input.direction();
            if input.any() && !paddle.on_screen {
                paddle.on_screen = true;
                reset = true;
                log::info!("Paddle {} joined the match", paddle.id);
            }
        }
        if reset {
            self.score.reset();
        }
        reset
    }

    /// Move every active paddle by its direction for `dt` seconds
    pub fn advance_paddles(&mut self, dt: f32, settings: &Settings) {
        let field = settings.field();
        for paddle in self.paddles.iter_mut().filter(|p| p.on_screen) {
            paddle.advance(dt, field, settings.thickness);
        }
    }

    /// Ensure deterministic iteration order
    pub fn normalize_order(&mut self) {
        self.balls.sort_by_key(|b| b.id);
        self.blocks.sort_by_key(|b| b.id);
    }

    pub fn live_balls(&self) -> usize {
        self.balls.iter().filter(|b| b.on_screen).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Variant;
    use proptest::prelude::*;

    #[test]
    fn test_new_breakout_state() {
        let settings = Settings::for_variant(Variant::Breakout);
        let state = GameState::new(&settings);
        assert_eq!(state.paddles.len(), 1);
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.blocks.len(), 7);
        assert_eq!(state.score, Score::default());

        // Ball accel derives from launch speed
        let ball = &state.balls[0];
        assert!((ball.accel.x - 5.0).abs() < 1e-4);
        assert!((ball.accel.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_entity_ids_unique() {
        let settings = Settings::for_variant(Variant::Breakout);
        let state = GameState::new(&settings);
        let mut ids: Vec<u32> = state
            .paddles
            .iter()
            .map(|p| p.id)
            .chain(state.balls.iter().map(|b| b.id))
            .chain(state.blocks.iter().map(|b| b.id))
            .collect();
        let n = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), n);
    }

    #[test]
    fn test_paddle_input_direction() {
        let none = PaddleInput::default();
        let both = PaddleInput {
            negative: true,
            positive: true,
        };
        let left = PaddleInput {
            negative: true,
            positive: false,
        };
        assert_eq!(none.direction(), 0);
        assert_eq!(both.direction(), 0);
        assert_eq!(left.direction(), -1);
    }

    #[test]
    fn test_benched_paddle_activation_resets_score() {
        let settings = Settings::for_variant(Variant::Versus);
        let mut state = GameState::new(&settings);
        state.score.conceded = [2, 5];

        // Active paddle moving does not reset
        let inputs = [
            PaddleInput {
                negative: true,
                positive: false,
            },
            PaddleInput::default(),
        ];
        assert!(!state.apply_controls(&inputs));
        assert_eq!(state.score.conceded, [2, 5]);

        // Benched paddle pressed: edge-triggered reset
        let inputs = [
            PaddleInput::default(),
            PaddleInput {
                negative: false,
                positive: true,
            },
        ];
        assert!(state.apply_controls(&inputs));
        assert!(state.paddles[1].on_screen);
        assert_eq!(state.score.conceded, [0, 0]);

        // Holding the key does not retrigger
        state.score.conceded = [1, 0];
        assert!(!state.apply_controls(&inputs));
        assert_eq!(state.score.conceded, [1, 0]);
    }

    #[test]
    fn test_benched_paddle_does_not_move() {
        let settings = Settings::for_variant(Variant::Versus);
        let mut state = GameState::new(&settings);
        let start = state.paddles[1].center;
        state.paddles[1].dir = 1;
        state.advance_paddles(0.05, &settings);
        assert_eq!(state.paddles[1].center, start);
    }

    #[test]
    fn test_score_slots() {
        let mut score = Score::default();
        score.record(Edge::Left);
        score.record(Edge::Right);
        score.record(Edge::Right);
        assert_eq!(score.conceded, [1, 2]);
        score.reset();
        assert_eq!(score.conceded, [0, 0]);
    }

    proptest! {
        #[test]
        fn paddle_stays_inside_walls(
            dirs in proptest::collection::vec(-1i8..=1, 1..200),
            dt in 0.0f32..0.05,
            vertical in any::<bool>(),
        ) {
            let variant = if vertical { Variant::Versus } else { Variant::Breakout };
            let settings = Settings::for_variant(variant);
            let mut state = GameState::new(&settings);
            let t = settings.thickness;
            let field = settings.field();

            for dir in dirs {
                let paddle = &mut state.paddles[0];
                paddle.dir = dir;
                paddle.advance(dt, field, t);

                let axis = paddle.motion_axis();
                let rect = paddle.rect();
                prop_assert!(axis.of(rect.min()) >= t - 1e-3);
                prop_assert!(axis.of(rect.max()) <= axis.of(field) - t + 1e-3);
            }
        }
    }
}
