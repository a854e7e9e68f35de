//! Demo-mode input: an AI that plays every active paddle

use crate::driver::{InputAdapter, InputFrame};
use crate::sim::{Ball, GameState, Paddle, PaddleInput};

/// Tracks the most dangerous ball with each active paddle
#[derive(Debug, Clone)]
pub struct AutoPilot {
    /// Ignore offsets smaller than this to avoid jitter around the target
    pub dead_zone: f32,
    /// How far ahead (seconds) to lead the ball
    pub lookahead: f32,
    /// Ask to quit after this many polls
    pub quit_after: Option<u64>,
    polls: u64,
}

impl Default for AutoPilot {
    fn default() -> Self {
        Self {
            dead_zone: 8.0,
            lookahead: 0.1,
            quit_after: None,
            polls: 0,
        }
    }
}

impl AutoPilot {
    pub fn with_limit(quit_after: u64) -> Self {
        Self {
            quit_after: Some(quit_after),
            ..Default::default()
        }
    }

    /// Ball heading for this paddle's edge that will get there first
    fn most_dangerous<'a>(paddle: &Paddle, balls: &'a [Ball]) -> Option<&'a Ball> {
        let normal = paddle.edge.normal_axis();
        let line = normal.of(paddle.center);
        balls
            .iter()
            .filter(|b| b.on_screen && paddle.edge.is_approached_by(b.vel))
            .min_by(|a, b| {
                let ta = (line - normal.of(a.center())).abs() / normal.of(a.vel).abs();
                let tb = (line - normal.of(b.center())).abs() / normal.of(b.vel).abs();
                ta.partial_cmp(&tb).unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    fn steer(&self, paddle: &Paddle, balls: &[Ball]) -> PaddleInput {
        if !paddle.on_screen {
            return PaddleInput::default();
        }
        let Some(ball) = Self::most_dangerous(paddle, balls) else {
            return PaddleInput::default();
        };

        let axis = paddle.motion_axis();
        let target = axis.of(ball.center() + ball.vel * self.lookahead);
        let offset = target - axis.of(paddle.center);
        PaddleInput {
            negative: offset < -self.dead_zone,
            positive: offset > self.dead_zone,
        }
    }
}

impl InputAdapter for AutoPilot {
    fn poll(&mut self, state: &GameState) -> InputFrame {
        self.polls += 1;
        InputFrame {
            quit: self.quit_after.is_some_and(|limit| self.polls > limit),
            paddles: state
                .paddles
                .iter()
                .map(|p| self.steer(p, &state.balls))
                .collect(),
        }
    }
}
