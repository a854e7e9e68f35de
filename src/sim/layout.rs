//! Block layout grid
//!
//! A static 0/1 matrix mapped onto a region in the top-left of the playfield
//! (anchored just inside the walls). Each `1` cell becomes one block, inset
//! from its cell by a quarter of the wall thickness on every side.

use serde::{Deserialize, Serialize};

use super::geometry::Rect;

/// Static block pattern plus the region it covers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockLayout {
    /// Row-major grid of 0/1 flags
    pub matrix: Vec<Vec<u8>>,
    /// Width of the region the grid is stretched across
    pub region_width: f32,
    /// Height of the region the grid is stretched across
    pub region_height: f32,
}

impl BlockLayout {
    /// The stock 5x7 pattern over the top third of the field
    pub fn classic(field_width: f32, field_height: f32, thickness: f32) -> Self {
        Self {
            matrix: vec![
                vec![0, 0, 0, 0, 0, 0, 0],
                vec![0, 1, 1, 0, 1, 1, 0],
                vec![0, 0, 0, 0, 0, 0, 0],
                vec![0, 0, 1, 1, 1, 0, 0],
                vec![0, 0, 0, 0, 0, 0, 0],
            ],
            region_width: field_width - 2.0 * thickness,
            region_height: field_height / 3.0 - thickness,
        }
    }

    /// Number of rows
    pub fn matrix_height(&self) -> usize {
        self.matrix.len()
    }

    /// Number of columns
    pub fn matrix_width(&self) -> usize {
        self.matrix.first().map_or(0, Vec::len)
    }

    pub fn validate(&self) -> Result<(), String> {
        let width = self.matrix_width();
        if width == 0 {
            return Err("block layout has no cells".into());
        }
        if let Some(i) = self.matrix.iter().position(|row| row.len() != width) {
            return Err(format!("block layout row {i} does not have {width} cells"));
        }
        if self.matrix.iter().flatten().any(|&c| c > 1) {
            return Err("block layout cells must be 0 or 1".into());
        }
        if self.region_width <= 0.0 || self.region_height <= 0.0 {
            return Err("block layout region must be positive".into());
        }
        Ok(())
    }

    /// Rectangles of every filled cell, in row-major order
    pub fn block_rects(&self, thickness: f32) -> Vec<Rect> {
        let cols = self.matrix_width();
        let rows = self.matrix_height();
        if cols == 0 || rows == 0 {
            return Vec::new();
        }

        let cell_w = self.region_width / cols as f32;
        let cell_h = self.region_height / rows as f32;
        let (left, top) = (thickness, thickness);
        let inset = thickness / 4.0;

        self.matrix
            .iter()
            .enumerate()
            .flat_map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, cell)| **cell == 1)
                    .map(move |(j, _)| {
                        Rect::new(
                            left + j as f32 * cell_w + inset,
                            top + i as f32 * cell_h + inset,
                            cell_w - thickness / 2.0,
                            cell_h - thickness / 2.0,
                        )
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_layout_block_count() {
        let layout = BlockLayout::classic(640.0, 480.0, 15.0);
        assert_eq!(layout.matrix_height(), 5);
        assert_eq!(layout.matrix_width(), 7);
        assert_eq!(layout.block_rects(15.0).len(), 7);
        layout.validate().unwrap();
    }

    #[test]
    fn test_cell_geometry() {
        let layout = BlockLayout {
            matrix: vec![vec![1, 0], vec![0, 1]],
            region_width: 200.0,
            region_height: 100.0,
        };
        let rects = layout.block_rects(8.0);
        assert_eq!(rects.len(), 2);

        // Cell (0,0): origin (8,8) plus 2px inset, cell 100x50 minus 4px
        assert_eq!(rects[0], Rect::new(10.0, 10.0, 96.0, 46.0));
        // Cell (1,1)
        assert_eq!(rects[1], Rect::new(110.0, 60.0, 96.0, 46.0));
    }

    #[test]
    fn test_blocks_stay_inside_region() {
        let layout = BlockLayout::classic(640.0, 480.0, 15.0);
        let region = Rect::new(15.0, 15.0, layout.region_width, layout.region_height);
        for rect in layout.block_rects(15.0) {
            assert!(region.contains_rect(&rect), "{rect:?} escapes {region:?}");
        }
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let layout = BlockLayout {
            matrix: vec![vec![1, 1, 1], vec![1, 1]],
            region_width: 100.0,
            region_height: 100.0,
        };
        assert!(layout.validate().is_err());
    }

    #[test]
    fn test_non_binary_cell_rejected() {
        let layout = BlockLayout {
            matrix: vec![vec![0, 2]],
            region_width: 100.0,
            region_height: 100.0,
        };
        assert!(layout.validate().is_err());
    }
}
