//! Tile pyramid graph
//!
//! Rows are numbered from the apex (row 0) down; row `r` holds columns `0..=r`.
//! Movement is diagonal only:
//!
//! ```text
//!   up-left  (r-1, c-1)    up-right   (r-1, c)
//!   down-left (r+1, c)     down-right (r+1, c+1)
//! ```

use serde::{Deserialize, Serialize};

use super::tile::Tile;

/// Coordinate on (or just off) the pyramid.
///
/// Signed so that off-pyramid slots such as the side disks can be named too;
/// whether an index is a real tile is decided by [`Pyramid::contains`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileIndex {
    pub row: i32,
    pub column: i32,
}

impl TileIndex {
    pub const APEX: TileIndex = TileIndex { row: 0, column: 0 };

    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// Raw neighbour coordinate, without bounds checks
    pub fn offset(self, direction: Direction) -> Self {
        let (dr, dc) = direction.delta();
        Self::new(self.row + dr, self.column + dc)
    }

    /// Straight-line distance in (row, column) space
    pub fn distance_to(self, other: TileIndex) -> f32 {
        let dr = (self.row - other.row) as f32;
        let dc = (self.column - other.column) as f32;
        dr.hypot(dc)
    }
}

/// One of the four diagonal hops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    /// Directions a falling enemy may take
    pub const DOWNWARD: [Direction; 2] = [Direction::DownLeft, Direction::DownRight];

    /// (row, column) delta
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::UpLeft => (-1, -1),
            Direction::UpRight => (-1, 0),
            Direction::DownLeft => (1, 0),
            Direction::DownRight => (1, 1),
        }
    }

    /// The hop that undoes this one
    pub fn opposite(self) -> Direction {
        match self {
            Direction::UpLeft => Direction::DownRight,
            Direction::UpRight => Direction::DownLeft,
            Direction::DownLeft => Direction::UpRight,
            Direction::DownRight => Direction::UpLeft,
        }
    }
}

/// Triangular tile grid stored row-major in a flat arena.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pyramid {
    rows: u32,
    tiles: Vec<Tile>,
}

impl Pyramid {
    /// Build a pyramid with every tile at step 0 for the given round.
    ///
    /// Row count is validated by [`crate::Settings::validate`]; a zero-row
    /// pyramid is simply empty.
    pub fn new(rows: u32, round: u32) -> Self {
        let mut tiles = Vec::with_capacity(Self::count_for_rows(rows));
        for row in 0..rows as i32 {
            for column in 0..=row {
                tiles.push(Tile::new(TileIndex::new(row, column), round));
            }
        }
        Self { rows, tiles }
    }

    /// Number of tiles in a pyramid of the given height
    pub fn count_for_rows(rows: u32) -> usize {
        let rows = rows as usize;
        rows * (rows + 1) / 2
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the index names a real tile
    pub fn contains(&self, index: TileIndex) -> bool {
        index.row >= 0 && index.row < self.rows as i32 && index.column >= 0 && index.column <= index.row
    }

    /// Neighbour in the given direction, or `None` when that hop leaves the pyramid
    pub fn adjacency(&self, index: TileIndex, direction: Direction) -> Option<TileIndex> {
        let next = index.offset(direction);
        self.contains(next).then_some(next)
    }

    /// All on-pyramid neighbours of a tile
    pub fn neighbors(&self, index: TileIndex) -> impl Iterator<Item = (Direction, TileIndex)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |d| self.adjacency(index, d).map(|next| (d, next)))
    }

    fn slot(&self, index: TileIndex) -> Option<usize> {
        if !self.contains(index) {
            return None;
        }
        let row = index.row as usize;
        Some(row * (row + 1) / 2 + index.column as usize)
    }

    pub fn tile(&self, index: TileIndex) -> Option<&Tile> {
        let slot = self.slot(index)?;
        Some(&self.tiles[slot])
    }

    pub fn tile_mut(&mut self, index: TileIndex) -> Option<&mut Tile> {
        let slot = self.slot(index)?;
        Some(&mut self.tiles[slot])
    }

    /// Tiles in row-major order
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tiles of one row, left to right
    pub fn row(&self, row: u32) -> &[Tile] {
        if row >= self.rows {
            return &[];
        }
        let start = Self::count_for_rows(row);
        &self.tiles[start..start + row as usize + 1]
    }

    /// Advance the tile under a landing hop. Returns the score earned.
    pub fn advance(&mut self, index: TileIndex, round: u32, step_points: u64) -> u64 {
        self.tile_mut(index)
            .map(|tile| tile.advance(round, step_points))
            .unwrap_or(0)
    }

    /// Step one tile back toward its starting color
    pub fn revert(&mut self, index: TileIndex) {
        if let Some(tile) = self.tile_mut(index) {
            tile.revert();
        }
    }

    /// Clear every tile for a new round
    pub fn reset_all(&mut self, round: u32) {
        for tile in &mut self.tiles {
            tile.reset(round);
        }
    }

    /// Paint every tile back to its starting color without touching step progress
    pub fn revert_visuals(&mut self) {
        for tile in &mut self.tiles {
            tile.revert_visual();
        }
    }

    /// Level-complete predicate
    pub fn is_complete(&self) -> bool {
        self.tiles.iter().all(Tile::is_complete)
    }
}
