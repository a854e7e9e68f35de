//! Collision detection and response
//!
//! Every response reflects one or both velocity components and then applies
//! the acceleration rule: the ball gains its unsigned `accel` magnitude in
//! the direction it is currently travelling. There is no slowdown path.

use glam::Vec2;

use super::error::SimError;
use super::geometry::{Axis, Edge};
use super::state::{Ball, Block, Paddle, PaddleRole};
use crate::settings::{BoundaryKind, Settings};

/// Sign of a velocity component. Zero has no direction to reflect.
#[inline]
pub fn velocity_sign(v: f32, ball: u32, axis: Axis) -> Result<f32, SimError> {
    if v == 0.0 || !v.is_finite() {
        return Err(SimError::InvalidVelocityState { ball, axis });
    }
    Ok(v.signum())
}

/// Speed the ball up along `axis` by its accel magnitude
pub fn accelerate(ball: &mut Ball, axis: Axis) -> Result<(), SimError> {
    let sign = velocity_sign(axis.of(ball.vel), ball.id, axis)?;
    *axis.of_mut(&mut ball.vel) += sign * axis.of(ball.accel);
    Ok(())
}

/// Flip one velocity component
#[inline]
pub fn reflect(ball: &mut Ball, axis: Axis) {
    *axis.of_mut(&mut ball.vel) *= -1.0;
}

/// Check and resolve a ball against an active paddle.
///
/// The paddle only responds while the ball is heading toward the edge it
/// guards, so a ball already reflected this tick is left alone. Returns the
/// reflected axis on contact.
pub fn ball_paddle_collision(ball: &mut Ball, paddle: &Paddle) -> Result<Option<Axis>, SimError> {
    if !paddle.on_screen
        || !paddle.edge.is_approached_by(ball.vel)
        || !ball.rect().overlaps(&paddle.rect())
    {
        return Ok(None);
    }

    let normal = paddle.edge.normal_axis();
    ball.hits += 1;
    reflect(ball, normal);
    match paddle.role {
        PaddleRole::Wall => {
            accelerate(ball, Axis::X)?;
            accelerate(ball, Axis::Y)?;
        }
        PaddleRole::Goal => accelerate(ball, normal)?,
    }
    Ok(Some(normal))
}

/// One axis flip during block resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reflection {
    pub axis: Axis,
    /// Ball velocity right after this flip, before any later one
    pub vel: Vec2,
}

/// Outcome of a ball striking a block
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BlockCollision {
    /// Axes reflected, in resolution order (horizontal first)
    pub reflected: [Option<Reflection>; 2],
    /// The block crossed its destruction threshold
    pub destroyed: bool,
}

/// Check and resolve a ball against a live block.
///
/// Both hit counters go up and both axes speed up. Then each axis is
/// resolved independently by asking which of the block's near edges the
/// ball's leading half crossed, so a corner hit reflects both.
pub fn ball_block_collision(
    ball: &mut Ball,
    block: &mut Block,
    destruction_threshold: u32,
) -> Result<Option<BlockCollision>, SimError> {
    if !block.on_screen || !ball.rect().overlaps(&block.rect) {
        return Ok(None);
    }

    ball.hits += 1;
    block.hits += 1;
    accelerate(ball, Axis::X)?;
    accelerate(ball, Axis::Y)?;

    let b = ball.rect();
    let half = ball.size / 2.0;
    let r = block.rect;
    let mut result = BlockCollision::default();

    // Horizontal: entered through the block's left or right face
    if (b.right() - half.x < r.left() && ball.vel.x > 0.0)
        || (b.left() + half.x > r.right() && ball.vel.x < 0.0)
    {
        reflect(ball, Axis::X);
        result.reflected[0] = Some(Reflection {
            axis: Axis::X,
            vel: ball.vel,
        });
    }

    // Vertical: entered through the top or bottom face
    if (b.bottom() - half.y < r.top() && ball.vel.y > 0.0)
        || (b.top() + half.y > r.bottom() && ball.vel.y < 0.0)
    {
        reflect(ball, Axis::Y);
        result.reflected[1] = Some(Reflection {
            axis: Axis::Y,
            vel: ball.vel,
        });
    }

    if block.hits > destruction_threshold {
        block.on_screen = false;
        result.destroyed = true;
    }

    Ok(Some(result))
}

/// What happened at a playfield edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOutcome {
    Bounce(Edge),
    /// Ball left through an exit edge
    Lost(Edge),
    /// Ball crossed a goal line
    Goal(Edge),
}

/// Ball box coordinate along `edge`'s normal, on the side facing `edge`
fn leading_coord(ball: &Ball, edge: Edge) -> f32 {
    let r = ball.rect();
    match edge {
        Edge::Left => r.left(),
        Edge::Right => r.right(),
        Edge::Top => r.top(),
        Edge::Bottom => r.bottom(),
    }
}

/// Where on `edge` a ball counts as having reached it
fn edge_line(edge: Edge, kind: BoundaryKind, field: Vec2, thickness: f32) -> f32 {
    // Walls are drawn inside the field; exits and goals sit on its border
    let inset = match kind {
        BoundaryKind::Wall => thickness,
        BoundaryKind::Exit | BoundaryKind::Goal => 0.0,
    };
    match edge {
        Edge::Left | Edge::Top => inset,
        Edge::Right => field.x - inset,
        Edge::Bottom => field.y - inset,
    }
}

/// Check and resolve a ball against the four playfield edges.
///
/// Left/right are tested as a pair, then top/bottom; at most one edge per
/// pair can fire since the ball must be moving toward it. Wall bounces
/// increment the hit counter and speed the ball up along that axis.
pub fn ball_edge_collisions(
    ball: &mut Ball,
    settings: &Settings,
) -> Result<Vec<EdgeOutcome>, SimError> {
    let field = settings.field();
    let mut outcomes = Vec::new();

    for pair in [[Edge::Left, Edge::Right], [Edge::Top, Edge::Bottom]] {
        for edge in pair {
            if !edge.is_approached_by(ball.vel) {
                continue;
            }
            let kind = settings.boundaries.kind(edge);
            let line = edge_line(edge, kind, field, settings.thickness);
            let reached = (leading_coord(ball, edge) - line) * edge.outward_sign() >= 0.0;
            if !reached {
                continue;
            }

            match kind {
                BoundaryKind::Wall => {
                    let axis = edge.normal_axis();
                    ball.hits += 1;
                    reflect(ball, axis);
                    accelerate(ball, axis)?;
                    outcomes.push(EdgeOutcome::Bounce(edge));
                }
                BoundaryKind::Exit => {
                    ball.on_screen = false;
                    outcomes.push(EdgeOutcome::Lost(edge));
                }
                BoundaryKind::Goal => {
                    ball.on_screen = false;
                    outcomes.push(EdgeOutcome::Goal(edge));
                }
            }
            break;
        }
    }

    Ok(outcomes)
}
