//! Simulation module
//!
//! All gameplay logic lives here:
//! - Explicit timestep passed in by the driver
//! - Injected RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod state;
pub mod tick;

pub use collision::{BlockCollision, EdgeOutcome, Reflection};
pub use error::SimError;
pub use geometry::{Axis, Edge, Rect};
pub use layout::BlockLayout;
pub use state::{
    Ball, Block, Controls, GameEvent, GameState, Paddle, PaddleInput, PaddleRole, Score,
};
pub use tick::{TickReport, spawn_velocity, tick};
