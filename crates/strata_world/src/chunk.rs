//! # Chunk System
//!
//! The world is organized into fixed-size chunks so that:
//! - Only chunks near the player are resident
//! - Generation happens one chunk at a time, on demand
//! - Spatial queries only touch the chunks a rectangle overlaps
//!
//! ## Chunk Format
//!
//! Chunks are 12x12 blocks. Each cell holds an optional `Block`.
//! Coordinates follow screen convention: local row 0 is the top row.

use crate::block::{Block, BlockKind, BlockOrigin};
use crate::world::WorldMode;

/// Chunk width/height in blocks.
pub const CHUNK_SIZE: i32 = 12;

/// Chunk width/height as an index bound.
const CHUNK_CELLS: usize = CHUNK_SIZE as usize;

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not blocks).
    pub x: i32,
    /// Y coordinate (in chunks, not blocks).
    pub y: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Converts world block indices to the owning chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn from_block_index(block_x: i32, block_y: i32) -> Self {
        Self {
            x: block_x.div_euclid(CHUNK_SIZE),
            y: block_y.div_euclid(CHUNK_SIZE),
        }
    }

    /// Converts a pixel position to the owning chunk coordinate.
    #[inline]
    #[must_use]
    pub fn from_pixel(px: f32, py: f32, block_size: i32) -> Self {
        Self::new(
            chunk_index_for_pixel(px, block_size),
            chunk_index_for_pixel(py, block_size),
        )
    }

    /// Returns the world block index of the chunk's top-left cell.
    #[inline]
    #[must_use]
    pub const fn first_block(self) -> (i32, i32) {
        (self.x * CHUNK_SIZE, self.y * CHUNK_SIZE)
    }

    /// Returns the world pixel position of the chunk's origin.
    #[inline]
    #[must_use]
    pub const fn origin_px(self, block_size: i32) -> (i32, i32) {
        (
            self.x * CHUNK_SIZE * block_size,
            self.y * CHUNK_SIZE * block_size,
        )
    }

    /// Chebyshev distance to another chunk, per axis.
    #[inline]
    #[must_use]
    pub const fn axis_distance(self, other: Self) -> (i32, i32) {
        ((self.x - other.x).abs(), (self.y - other.y).abs())
    }
}

/// Converts a single pixel coordinate to a chunk index (floor division).
#[inline]
#[must_use]
pub fn chunk_index_for_pixel(pixel: f32, block_size: i32) -> i32 {
    (pixel / (CHUNK_SIZE * block_size) as f32).floor() as i32
}

/// Position of a cell inside a chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LocalPos {
    /// Column, 0..12.
    pub x: i32,
    /// Row, 0..12.
    pub y: i32,
}

impl LocalPos {
    /// Creates a local position. Bounds are checked at the point of use.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Splits world block indices into chunk coordinate and local position.
    #[inline]
    #[must_use]
    pub const fn from_block_index(block_x: i32, block_y: i32) -> (ChunkCoord, Self) {
        (
            ChunkCoord::from_block_index(block_x, block_y),
            Self {
                x: block_x.rem_euclid(CHUNK_SIZE),
                y: block_y.rem_euclid(CHUNK_SIZE),
            },
        )
    }

    /// Returns true if the position lies inside a chunk.
    #[inline]
    #[must_use]
    pub const fn in_bounds(self) -> bool {
        self.x >= 0 && self.x < CHUNK_SIZE && self.y >= 0 && self.y < CHUNK_SIZE
    }
}

/// Generation state of a chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkState {
    /// Created but never filled by a generator.
    Empty,
    /// Filled by the generator of the given mode.
    Generated(WorldMode),
}

/// A chunk of world data.
///
/// Contains a 12x12 grid of optional blocks plus its generation state.
#[derive(Clone, Debug)]
pub struct Chunk {
    /// Chunk position in the world.
    coord: ChunkCoord,
    /// Pixel size of every block in this chunk.
    block_size: i32,
    /// Block data (indexed as [y][x]).
    cells: [[Option<Block>; CHUNK_CELLS]; CHUNK_CELLS],
    /// Generation state.
    state: ChunkState,
}

impl Chunk {
    /// Creates a new empty chunk at the given coordinates.
    #[must_use]
    pub fn new(coord: ChunkCoord, block_size: i32) -> Self {
        Self {
            coord,
            block_size,
            cells: [[None; CHUNK_CELLS]; CHUNK_CELLS],
            state: ChunkState::Empty,
        }
    }

    /// Chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Block size in pixels.
    #[inline]
    #[must_use]
    pub const fn block_size(&self) -> i32 {
        self.block_size
    }

    /// Current generation state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> ChunkState {
        self.state
    }

    /// Returns true once a generator has filled this chunk.
    #[inline]
    #[must_use]
    pub const fn is_generated(&self) -> bool {
        matches!(self.state, ChunkState::Generated(_))
    }

    /// Records that the chunk was filled under `mode`.
    pub fn mark_generated(&mut self, mode: WorldMode) {
        self.state = ChunkState::Generated(mode);
    }

    /// Gets the block at a local position.
    #[inline]
    #[must_use]
    pub fn get(&self, pos: LocalPos) -> Option<&Block> {
        if pos.in_bounds() {
            self.cells[pos.y as usize][pos.x as usize].as_ref()
        } else {
            None
        }
    }

    /// Gets the kind of the block at a local position.
    #[inline]
    #[must_use]
    pub fn kind_at(&self, x: i32, y: i32) -> Option<BlockKind> {
        self.get(LocalPos::new(x, y)).map(|block| block.kind)
    }

    /// Returns true if a block occupies the local position.
    #[inline]
    #[must_use]
    pub fn has(&self, x: i32, y: i32) -> bool {
        self.get(LocalPos::new(x, y)).is_some()
    }

    /// Writes a block of `kind` at a local position, replacing any occupant.
    ///
    /// Positions outside the chunk are ignored.
    pub fn set(&mut self, pos: LocalPos, kind: BlockKind, origin: BlockOrigin) {
        if !pos.in_bounds() {
            return;
        }
        let (origin_x, origin_y) = self.coord.origin_px(self.block_size);
        let block = Block::new(
            origin_x + pos.x * self.block_size,
            origin_y + pos.y * self.block_size,
            kind,
            origin,
        );
        self.cells[pos.y as usize][pos.x as usize] = Some(block);
    }

    /// Stamps a generated block at `(x, y)`.
    #[inline]
    pub fn stamp(&mut self, x: i32, y: i32, kind: BlockKind) {
        self.set(LocalPos::new(x, y), kind, BlockOrigin::Generated);
    }

    /// Stamps a generated block at `(x, y)` only if the cell is empty.
    #[inline]
    pub fn stamp_if_empty(&mut self, x: i32, y: i32, kind: BlockKind) {
        if !self.has(x, y) {
            self.stamp(x, y, kind);
        }
    }

    /// Removes and returns the block at a local position.
    pub fn remove(&mut self, pos: LocalPos) -> Option<Block> {
        if pos.in_bounds() {
            self.cells[pos.y as usize][pos.x as usize].take()
        } else {
            None
        }
    }

    /// Iterates over occupied cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (LocalPos, &Block)> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter().enumerate().filter_map(move |(x, cell)| {
                cell.as_ref()
                    .map(|block| (LocalPos::new(x as i32, y as i32), block))
            })
        })
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| cell.is_some()).count()
    }

    /// Lowest and highest `ground` row among local rows `1..=3`, if any.
    ///
    /// These rows make up the normal world's platform band.
    #[must_use]
    pub fn platform_rows(&self) -> Option<(i32, i32)> {
        self.iter()
            .filter(|(pos, block)| block.kind == BlockKind::Ground && (1..=3).contains(&pos.y))
            .fold(None, |acc, (pos, _)| match acc {
                None => Some((pos.y, pos.y)),
                Some((lo, hi)) => Some((lo.min(pos.y), hi.max(pos.y))),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_coord_from_block() {
        assert_eq!(ChunkCoord::from_block_index(0, 0), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_block_index(11, 11), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_block_index(12, 12), ChunkCoord::new(1, 1));
        assert_eq!(ChunkCoord::from_block_index(-1, -1), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::from_block_index(-12, -12), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::from_block_index(-13, -13), ChunkCoord::new(-2, -2));
    }

    #[test]
    fn test_local_pos_is_floor_mod() {
        let (coord, local) = LocalPos::from_block_index(-1, 13);
        assert_eq!(coord, ChunkCoord::new(-1, 1));
        assert_eq!(local, LocalPos::new(11, 1));
    }

    #[test]
    fn test_chunk_index_for_negative_pixels() {
        assert_eq!(chunk_index_for_pixel(0.0, 32), 0);
        assert_eq!(chunk_index_for_pixel(383.9, 32), 0);
        assert_eq!(chunk_index_for_pixel(384.0, 32), 1);
        assert_eq!(chunk_index_for_pixel(-0.5, 32), -1);
        assert_eq!(chunk_index_for_pixel(-384.0, 32), -1);
        assert_eq!(chunk_index_for_pixel(-384.5, 32), -2);
    }

    #[test]
    fn test_block_positions_align_to_chunk_origin() {
        let mut chunk = Chunk::new(ChunkCoord::new(-1, 2), 32);
        chunk.stamp(3, 4, BlockKind::Ground);
        let block = chunk.get(LocalPos::new(3, 4)).unwrap();
        assert_eq!(block.x, -12 * 32 + 3 * 32);
        assert_eq!(block.y, 24 * 32 + 4 * 32);
    }

    #[test]
    fn test_out_of_bounds_writes_are_ignored() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), 32);
        chunk.stamp(12, 0, BlockKind::Ground);
        chunk.stamp(0, -1, BlockKind::Ground);
        assert_eq!(chunk.block_count(), 0);
        assert!(chunk.remove(LocalPos::new(-1, 0)).is_none());
    }

    #[test]
    fn test_platform_rows() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), 32);
        assert_eq!(chunk.platform_rows(), None);
        chunk.stamp(0, 2, BlockKind::Ground);
        chunk.stamp(5, 3, BlockKind::Ground);
        chunk.stamp(5, 4, BlockKind::Ground);
        chunk.stamp(6, 1, BlockKind::Water);
        assert_eq!(chunk.platform_rows(), Some((2, 3)));
    }

    #[test]
    fn test_state_transitions() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), 32);
        assert_eq!(chunk.state(), ChunkState::Empty);
        chunk.mark_generated(WorldMode::Alternate);
        assert!(chunk.is_generated());
        assert_eq!(chunk.state(), ChunkState::Generated(WorldMode::Alternate));
    }
}
