use serde::{Deserialize, Serialize};

use crate::math::{Vec3, round_half_up};
use crate::shape::Offset;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct BoardDims {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
}

impl Default for BoardDims {
    fn default() -> Self {
        Self {
            width: 5,
            height: 10,
            depth: 5,
        }
    }
}

/// Largest extent accepted along any axis.
pub const MAX_BOARD_DIM: usize = 255;

impl BoardDims {
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 || self.depth == 0 {
            return Err(format!("board dims must be non-zero, got {self:?}"));
        }
        if [self.width, self.height, self.depth].iter().any(|&d| d > MAX_BOARD_DIM) {
            return Err(format!(
                "board dims must be at most {MAX_BOARD_DIM} per axis, got {self:?}"
            ));
        }
        self.cell_count()
            .ok_or_else(|| format!("board {self:?} has too many cells"))?;
        if self.width % 2 == 0 || self.depth % 2 == 0 {
            return Err(format!(
                "board width and depth must be odd to centre on the origin, got {self:?}"
            ));
        }
        Ok(())
    }

    pub fn cell_count(&self) -> Option<usize> {
        self.width.checked_mul(self.height)?.checked_mul(self.depth)
    }

    fn half_width(&self) -> i32 {
        (self.width / 2) as i32
    }

    fn half_depth(&self) -> i32 {
        (self.depth / 2) as i32
    }
}

/// Maps a continuous world point to its lattice cell: horizontal axes round,
/// the vertical axis floors.
pub fn world_cell(point: Vec3) -> [i32; 3] {
    [
        round_half_up(point.x),
        point.y.floor() as i32,
        round_half_up(point.z),
    ]
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LockReport {
    pub written: usize,
    pub dropped: usize,
}

/// Permanent occupancy, indexed `[y][x][z]` after shifting x and z so the
/// grid is centred on the world origin.
#[derive(Clone, Debug)]
pub struct Board {
    dims: BoardDims,
    cells: Vec<bool>,
}

impl Board {
    /// Axes longer than `MAX_BOARD_DIM` are cut down to it; `validate`
    /// rejects such dims up front.
    pub fn new(dims: BoardDims) -> Self {
        let dims = BoardDims {
            width: dims.width.min(MAX_BOARD_DIM),
            height: dims.height.min(MAX_BOARD_DIM),
            depth: dims.depth.min(MAX_BOARD_DIM),
        };
        Self {
            dims,
            cells: vec![false; dims.width * dims.height * dims.depth],
        }
    }

    pub fn dims(&self) -> BoardDims {
        self.dims
    }

    pub fn is_within_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        let (hw, hd) = (self.dims.half_width(), self.dims.half_depth());
        (-hw..=hw).contains(&x) && (0..self.dims.height as i32).contains(&y) && (-hd..=hd).contains(&z)
    }

    fn index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if !self.is_within_bounds(x, y, z) {
            return None;
        }
        let bx = (x + self.dims.half_width()) as usize;
        let bz = (z + self.dims.half_depth()) as usize;
        Some((y as usize * self.dims.width + bx) * self.dims.depth + bz)
    }

    pub fn is_occupied(&self, x: i32, y: i32, z: i32) -> bool {
        match self.index(x, y, z) {
            Some(i) => self.cells[i],
            None => true,
        }
    }

    /// Writes each `offset + position` cell. Cells that land outside the grid
    /// are counted as dropped and skipped.
    pub fn lock(&mut self, offsets: &[Offset], position: Vec3) -> LockReport {
        let cells: Vec<[i32; 3]> = offsets
            .iter()
            .map(|o| world_cell(position + Vec3::from_offset(*o)))
            .collect();
        self.lock_cells(&cells)
    }

    pub fn lock_cells(&mut self, cells: &[[i32; 3]]) -> LockReport {
        let mut report = LockReport::default();
        for &[x, y, z] in cells {
            match self.index(x, y, z) {
                Some(i) => {
                    self.cells[i] = true;
                    report.written += 1;
                }
                None => report.dropped += 1,
            }
        }
        report
    }

    pub fn occupied_cells(&self) -> Vec<[i32; 3]> {
        let (hw, hd) = (self.dims.half_width(), self.dims.half_depth());
        let mut out = Vec::new();
        for y in 0..self.dims.height as i32 {
            for x in -hw..=hw {
                for z in -hd..=hd {
                    if self.is_occupied(x, y, z) {
                        out.push([x, y, z]);
                    }
                }
            }
        }
        out
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}
