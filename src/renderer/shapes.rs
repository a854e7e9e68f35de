//! Shape generation for the playfield

use crate::settings::{BoundaryKind, Settings};
use crate::sim::geometry::{Edge, Rect};
use crate::sim::state::{GameState, Score};

/// Colors for game elements (RGBA)
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
    pub const WALL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const PADDLE: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
    pub const BALL: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const BLOCK: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
}

/// What a rectangle depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Wall,
    Paddle,
    Ball,
    Block,
}

/// One filled rectangle to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRect {
    pub rect: Rect,
    pub kind: ShapeKind,
    pub color: [f32; 4],
}

impl DrawRect {
    fn new(rect: Rect, kind: ShapeKind) -> Self {
        let color = match kind {
            ShapeKind::Wall => colors::WALL,
            ShapeKind::Paddle => colors::PADDLE,
            ShapeKind::Ball => colors::BALL,
            ShapeKind::Block => colors::BLOCK,
        };
        Self { rect, kind, color }
    }
}

/// Everything a presenter needs for one tick, back to front
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub background: [f32; 4],
    pub rects: Vec<DrawRect>,
    pub score: Score,
}

impl Frame {
    pub fn count(&self, kind: ShapeKind) -> usize {
        self.rects.iter().filter(|r| r.kind == kind).count()
    }
}

/// Rectangle of the wall along `edge`
fn wall_rect(edge: Edge, settings: &Settings) -> Rect {
    let (w, h, t) = (settings.field_width, settings.field_height, settings.thickness);
    match edge {
        Edge::Left => Rect::new(0.0, 0.0, t, h),
        Edge::Right => Rect::new(w - t, 0.0, t, h),
        Edge::Top => Rect::new(0.0, 0.0, w, t),
        Edge::Bottom => Rect::new(0.0, h - t, w, t),
    }
}

/// Build the drawable frame for the current state.
///
/// Only walls, active paddles and on-screen balls/blocks are emitted.
pub fn build_frame(state: &GameState, settings: &Settings) -> Frame {
    let mut rects = Vec::with_capacity(4 + state.paddles.len() + state.balls.len() + state.blocks.len());

    rects.extend(
        Edge::ALL
            .into_iter()
            .filter(|&e| settings.boundaries.kind(e) == BoundaryKind::Wall)
            .map(|e| DrawRect::new(wall_rect(e, settings), ShapeKind::Wall)),
    );
    rects.extend(
        state
            .blocks
            .iter()
            .filter(|b| b.on_screen)
            .map(|b| DrawRect::new(b.rect, ShapeKind::Block)),
    );
    rects.extend(
        state
            .paddles
            .iter()
            .filter(|p| p.on_screen)
            .map(|p| DrawRect::new(p.rect(), ShapeKind::Paddle)),
    );
    rects.extend(
        state
            .balls
            .iter()
            .filter(|b| b.on_screen)
            .map(|b| DrawRect::new(b.rect(), ShapeKind::Ball)),
    );

    Frame {
        background: colors::BACKGROUND,
        rects,
        score: state.score,
    }
}
