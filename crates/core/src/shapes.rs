//! Shapes module - polyomino matrices and rotation sets
//!
//! A shape is an immutable boolean matrix (max 4x4) identified by content,
//! not by reference. Each family has a canonical base orientation; the full
//! rotation set is derived once by successive 90-degree clockwise rotation,
//! deduplicated by structural equality. Symmetric families yield fewer than
//! four members (a square yields 1, a bar yields 2).

use arrayvec::ArrayVec;

use gridfall_types::{FamilyId, MAX_SHAPE_DIM};

/// An immutable polyomino matrix
///
/// Storage is a fixed 4x4 grid; cells outside `width` x `height` are always
/// false, so derived equality is structural equality over the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    width: u8,
    height: u8,
    cells: [[bool; MAX_SHAPE_DIM]; MAX_SHAPE_DIM],
}

impl Shape {
    /// Build a shape from a rectangular 0/1 row pattern
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        debug_assert!(!rows.is_empty() && rows.len() <= MAX_SHAPE_DIM);
        debug_assert!(rows.iter().all(|r| r.len() == rows[0].len()));

        let height = rows.len() as u8;
        let width = rows.first().map(|r| r.len()).unwrap_or(0) as u8;
        let mut cells = [[false; MAX_SHAPE_DIM]; MAX_SHAPE_DIM];
        for (r, row) in rows.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                cells[r][c] = v != 0;
            }
        }

        Self {
            width,
            height,
            cells,
        }
    }

    /// Width in columns
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Height in rows
    pub fn height(&self) -> u8 {
        self.height
    }

    /// Whether the cell at (row, col) is occupied
    ///
    /// Out-of-range coordinates read as empty.
    pub fn is_set(&self, row: usize, col: usize) -> bool {
        row < MAX_SHAPE_DIM && col < MAX_SHAPE_DIM && self.cells[row][col]
    }

    /// Number of occupied cells (the scoring unit for a placement)
    pub fn block_count(&self) -> u32 {
        let mut count = 0;
        for row in &self.cells {
            for &cell in row {
                if cell {
                    count += 1;
                }
            }
        }
        count
    }

    /// Iterate occupied (row, col) offsets
    pub fn offsets(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        (0..self.height).flat_map(move |r| {
            (0..self.width).filter_map(move |c| {
                if self.cells[r as usize][c as usize] {
                    Some((r, c))
                } else {
                    None
                }
            })
        })
    }

    /// Rotate 90 degrees clockwise
    ///
    /// An RxC matrix becomes CxR, with cell (r, c) landing at (c, R-1-r).
    pub fn rotate_cw(&self) -> Shape {
        let mut cells = [[false; MAX_SHAPE_DIM]; MAX_SHAPE_DIM];
        let rows = self.height as usize;
        let cols = self.width as usize;

        for r in 0..rows {
            for c in 0..cols {
                cells[c][rows - 1 - r] = self.cells[r][c];
            }
        }

        Shape {
            width: self.height,
            height: self.width,
            cells,
        }
    }
}

/// Canonical base orientation for a family
pub fn base_shape(family: FamilyId) -> Shape {
    match family {
        FamilyId::I => Shape::from_rows(&[&[1, 1, 1, 1]]),
        FamilyId::O1 => Shape::from_rows(&[&[1]]),
        FamilyId::O2 => Shape::from_rows(&[&[1, 1], &[1, 1]]),
        FamilyId::O3 => Shape::from_rows(&[&[1, 1, 1], &[1, 1, 1], &[1, 1, 1]]),
        FamilyId::T => Shape::from_rows(&[&[0, 1, 0], &[1, 1, 1]]),
        FamilyId::S => Shape::from_rows(&[&[0, 1, 1], &[1, 1, 0]]),
        FamilyId::Z => Shape::from_rows(&[&[1, 1, 0], &[0, 1, 1]]),
        FamilyId::J => Shape::from_rows(&[&[1, 0, 0], &[1, 1, 1]]),
        FamilyId::L => Shape::from_rows(&[&[0, 0, 1], &[1, 1, 1]]),
        FamilyId::U => Shape::from_rows(&[&[1, 0, 1], &[1, 1, 1]]),
        FamilyId::L5 => Shape::from_rows(&[&[1, 0, 0], &[1, 0, 0], &[1, 1, 1]]),
    }
}

/// All distinct rotations of a base shape (1, 2, or 4 members)
///
/// Applies clockwise rotation up to four times, collecting by structural
/// equality. Pure and deterministic.
pub fn all_rotations(base: &Shape) -> ArrayVec<Shape, 4> {
    let mut rotations: ArrayVec<Shape, 4> = ArrayVec::new();
    let mut current = *base;

    for _ in 0..4 {
        if !rotations.contains(&current) {
            rotations.push(current);
        }
        current = current.rotate_cw();
    }

    rotations
}

/// Precomputed rotation sets for every family
///
/// Generated once at startup and immutable thereafter.
#[derive(Debug, Clone)]
pub struct RotationTable {
    sets: [ArrayVec<Shape, 4>; FamilyId::COUNT],
}

impl RotationTable {
    pub fn new() -> Self {
        Self {
            sets: std::array::from_fn(|i| all_rotations(&base_shape(FamilyId::ALL[i]))),
        }
    }

    /// Rotation set for a family (never empty)
    pub fn rotations(&self, family: FamilyId) -> &[Shape] {
        &self.sets[family.index()]
    }
}

impl Default for RotationTable {
    fn default() -> Self {
        Self::new()
    }
}
