//! Simulation tick
//!
//! Advances every live ball by one bounded step and resolves it against
//! paddles, blocks and the playfield edges, in that order. Balls never
//! collide with each other.
//!
//! Lost balls and destroyed blocks are only flagged during the pass; they
//! are pruned afterwards. Splits are queued and join the live set after the
//! pass as well, so they are first simulated on the next tick.

use glam::Vec2;
use rand::Rng;

use super::collision::{EdgeOutcome, ball_block_collision, ball_edge_collisions, ball_paddle_collision};
use super::error::SimError;
use super::geometry::Axis;
use super::state::{Ball, GameEvent, GameState};
use crate::settings::Settings;

/// Result of one tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub events: Vec<GameEvent>,
    /// No balls remain; the match is over
    pub terminated: bool,
}

/// A split waiting for its entity ID
#[derive(Debug, Clone, Copy)]
struct PendingSpawn {
    parent: u32,
    pos: Vec2,
    vel: Vec2,
    size: f32,
}

/// Queues splits while keeping the live-ball count under the cap
struct SpawnQueue {
    live: usize,
    pending: Vec<PendingSpawn>,
}

impl SpawnQueue {
    fn new(live: usize) -> Self {
        Self {
            live,
            pending: Vec::new(),
        }
    }

    fn ball_lost(&mut self) {
        self.live = self.live.saturating_sub(1);
    }

    /// Split `ball` if its hit count is past the threshold and there is room.
    /// `parent_vel` is the ball's velocity right after the `reflected` flip.
    fn check<R: Rng>(
        &mut self,
        ball: &mut Ball,
        reflected: Axis,
        parent_vel: Vec2,
        settings: &Settings,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) {
        if !ball.on_screen || ball.hits <= settings.spawn_hit_threshold {
            return;
        }
        if self.live >= settings.max_balls {
            log::debug!("Ball {} split suppressed at cap {}", ball.id, settings.max_balls);
            events.push(GameEvent::SpawnSuppressed { ball: ball.id });
            return;
        }

        ball.hits = 0;
        self.live += 1;
        self.pending.push(PendingSpawn {
            parent: ball.id,
            pos: ball.pos,
            vel: spawn_velocity(parent_vel, reflected, ball.accel, rng),
            size: ball.size.x,
        });
    }
}

/// Uniform sample in `[-magnitude/2, magnitude/2]`
fn jitter<R: Rng>(magnitude: f32, rng: &mut R) -> f32 {
    let half = 0.5 * magnitude.abs();
    if half > 0.0 {
        rng.random_range(-half..=half)
    } else {
        0.0
    }
}

/// Velocity of a ball split off a parent that just reflected along `reflected`.
///
/// The child keeps the reflected component and mirrors the other one, then
/// each axis is perturbed by up to half the parent's accel magnitude.
pub fn spawn_velocity<R: Rng>(parent_vel: Vec2, reflected: Axis, accel: Vec2, rng: &mut R) -> Vec2 {
    let mirrored = match reflected {
        Axis::X => Vec2::new(parent_vel.x, -parent_vel.y),
        Axis::Y => Vec2::new(-parent_vel.x, parent_vel.y),
    };
    mirrored + Vec2::new(jitter(accel.x, rng), jitter(accel.y, rng))
}

/// Advance the game state by `dt` seconds
pub fn tick<R: Rng>(
    state: &mut GameState,
    settings: &Settings,
    dt: f32,
    rng: &mut R,
) -> Result<TickReport, SimError> {
    state.time_ticks += 1;

    let mut events = Vec::new();
    let mut spawns = SpawnQueue::new(state.live_balls());

    let GameState {
        balls,
        blocks,
        paddles,
        score,
        ..
    } = &mut *state;

    for ball in balls.iter_mut().filter(|b| b.on_screen) {
        ball.integrate(dt);

        // --- PADDLES ---
        for paddle in paddles.iter() {
            if let Some(axis) = ball_paddle_collision(ball, paddle)? {
                events.push(GameEvent::PaddleHit {
                    ball: ball.id,
                    paddle: paddle.id,
                });
                let vel = ball.vel;
                spawns.check(ball, axis, vel, settings, rng, &mut events);
            }
        }

        // --- BLOCKS ---
        for block in blocks.iter_mut() {
            let Some(hit) = ball_block_collision(ball, block, settings.destruction_hit_threshold)?
            else {
                continue;
            };
            events.push(GameEvent::BlockHit {
                ball: ball.id,
                block: block.id,
            });
            for flip in hit.reflected.into_iter().flatten() {
                spawns.check(ball, flip.axis, flip.vel, settings, rng, &mut events);
            }
            if hit.destroyed {
                log::info!("Block {} destroyed after {} hits", block.id, block.hits);
                events.push(GameEvent::BlockDestroyed { block: block.id });
            }
        }

        // --- EDGES ---
        for outcome in ball_edge_collisions(ball, settings)? {
            match outcome {
                EdgeOutcome::Bounce(edge) => {
                    events.push(GameEvent::WallBounce { ball: ball.id, edge });
                    let vel = ball.vel;
                    spawns.check(ball, edge.normal_axis(), vel, settings, rng, &mut events);
                }
                EdgeOutcome::Lost(edge) => {
                    log::info!("Ball {} lost through {:?} edge", ball.id, edge);
                    events.push(GameEvent::BallLost { ball: ball.id, edge });
                    spawns.ball_lost();
                }
                EdgeOutcome::Goal(edge) => {
                    score.record(edge);
                    log::info!("Goal on {:?} edge, score now {:?}", edge, score.conceded);
                    events.push(GameEvent::BallLost { ball: ball.id, edge });
                    events.push(GameEvent::Goal {
                        edge,
                        score: *score,
                    });
                    spawns.ball_lost();
                }
            }
        }
    }

    // Prune after the pass, then admit the splits
    state.balls.retain(|b| b.on_screen);
    state.blocks.retain(|b| b.on_screen);

    for spawn in spawns.pending {
        let id = state.next_entity_id();
        log::debug!("Ball {} split off ball {} with velocity {}", id, spawn.parent, spawn.vel);
        state.balls.push(Ball::new(
            id,
            spawn.pos,
            spawn.vel,
            spawn.size,
            settings.acceleration_ratio,
        ));
        events.push(GameEvent::BallSpawned {
            parent: spawn.parent,
            ball: id,
        });
    }

    // Ensure deterministic ordering
    state.normalize_order();

    let terminated = state.balls.is_empty();
    if terminated {
        log::info!("All balls lost after {} ticks", state.time_ticks);
    }

    Ok(TickReport { events, terminated })
}
