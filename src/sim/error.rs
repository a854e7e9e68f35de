//! Simulation errors

use thiserror::Error;

use super::geometry::Axis;

/// Errors raised by the simulation core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// A velocity component hit exactly zero where its sign was required
    #[error("ball {ball} has zero {axis} velocity; reflection has no direction")]
    InvalidVelocityState { ball: u32, axis: Axis },
}
