//! Presentation mapping
//!
//! Turns simulation state into a flat list of colored rectangles plus the
//! score. Drawing them is up to whatever window/terminal backend consumes it.

pub mod shapes;

pub use shapes::{DrawRect, Frame, ShapeKind, build_frame, colors};
