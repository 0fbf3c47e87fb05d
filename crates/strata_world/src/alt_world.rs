//! # Alternate World Generation
//!
//! The alternate world is a fixed `ground` band (absolute block rows 50 to
//! 99) with one `rock` structure per chunk rising above it. Structures are
//! described in absolute rows; each chunk stamps only the slice that falls
//! inside it.
//!
//! Every chunk seeds its own child generator from its coordinate, so the
//! content of a chunk never depends on generation order and never touches
//! the world's shared stream.

use rand::Rng;

use crate::block::BlockKind;
use crate::chunk::{Chunk, ChunkCoord, CHUNK_SIZE};
use crate::seed::alt_world_rng;

/// First (highest) absolute row of the ground band.
pub const GROUND_TOP_ROW: i32 = 50;

/// Last (lowest) absolute row of the ground band.
pub const GROUND_BOTTOM_ROW: i32 = 99;

/// Chunk the alternate world spawns around.
pub const SPAWN_CHUNK: ChunkCoord = ChunkCoord::new(0, 2);

/// Rock structure archetype.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StructureKind {
    /// Thin columns of varying height.
    Pillars,
    /// A deck held up by support columns.
    Bridge,
    /// Dense random fill.
    Maze,
    /// Short thin columns.
    Spikes,
    /// One wide, tall block.
    Tower,
    /// Sparse random fill reaching high.
    Chaos,
}

impl StructureKind {
    /// Every archetype, in draw order.
    pub const ALL: [Self; 6] = [
        Self::Pillars,
        Self::Bridge,
        Self::Maze,
        Self::Spikes,
        Self::Tower,
        Self::Chaos,
    ];
}

/// Stamps the part of an absolute-row structure that lies in one chunk.
struct Slice<'a> {
    chunk: &'a mut Chunk,
    first_row: i32,
}

impl Slice<'_> {
    fn stamp(&mut self, x: i32, row: i32, kind: BlockKind) {
        self.chunk.stamp(x, row - self.first_row, kind);
    }

    /// Stamps rows `[top, bottom)` of column `x`.
    fn column(&mut self, x: i32, top: i32, bottom: i32) {
        for row in top..bottom {
            self.stamp(x, row, BlockKind::Rock);
        }
    }
}

/// Generator for alternate-world chunks.
#[derive(Clone, Copy, Debug, Default)]
pub struct AltWorldGenerator;

impl AltWorldGenerator {
    /// Creates a generator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Fills `chunk` and returns the archetype that was rolled for it.
    pub fn generate(&self, chunk: &mut Chunk) -> StructureKind {
        let coord = chunk.coord();
        let (_, first_row) = coord.first_block();
        let mut slice = Slice { chunk, first_row };

        let band_top = GROUND_TOP_ROW.max(first_row);
        let band_bottom = GROUND_BOTTOM_ROW.min(first_row + CHUNK_SIZE - 1);
        for row in band_top..=band_bottom {
            for x in 0..CHUNK_SIZE {
                slice.stamp(x, row, BlockKind::Ground);
            }
        }

        let mut rng = alt_world_rng(coord);
        let kind = StructureKind::ALL[rng.gen_range(0..StructureKind::ALL.len())];
        match kind {
            StructureKind::Pillars => Self::pillars(&mut slice, &mut rng),
            StructureKind::Bridge => Self::bridge(&mut slice, &mut rng),
            StructureKind::Maze => Self::scatter(&mut slice, &mut rng, 10..=30, 0.6),
            StructureKind::Spikes => Self::spikes(&mut slice, &mut rng),
            StructureKind::Tower => Self::tower(&mut slice, &mut rng),
            StructureKind::Chaos => Self::scatter(&mut slice, &mut rng, 20..=40, 0.4),
        }
        kind
    }

    fn pillars<R: Rng + ?Sized>(slice: &mut Slice<'_>, rng: &mut R) {
        let base = GROUND_TOP_ROW - 1;
        for _ in 0..rng.gen_range(2..=4) {
            let x = rng.gen_range(0..=11);
            let height = rng.gen_range(5..=20);
            slice.column(x, base - height, base);
        }
    }

    fn bridge<R: Rng + ?Sized>(slice: &mut Slice<'_>, rng: &mut R) {
        let start = rng.gen_range(0..=5);
        let width = rng.gen_range(4..=8);
        let deck = GROUND_TOP_ROW - rng.gen_range(3..=8);
        for x in start..(start + width).min(CHUNK_SIZE) {
            slice.stamp(x, deck, BlockKind::Rock);
            slice.column(x, deck + 1, GROUND_TOP_ROW);
        }
    }

    fn spikes<R: Rng + ?Sized>(slice: &mut Slice<'_>, rng: &mut R) {
        let base = GROUND_TOP_ROW - 1;
        for _ in 0..rng.gen_range(3..=6) {
            let x = rng.gen_range(0..=11);
            let height = rng.gen_range(3..=10);
            slice.column(x, base - height, base);
        }
    }

    fn tower<R: Rng + ?Sized>(slice: &mut Slice<'_>, rng: &mut R) {
        let start = rng.gen_range(2..=9);
        let width = rng.gen_range(2..=4);
        let height = rng.gen_range(15..=30);
        let base = GROUND_TOP_ROW - 1;
        for x in start..(start + width).min(CHUNK_SIZE) {
            slice.column(x, base - height, base);
        }
    }

    /// Per column, fills a band of random depth with cells of probability `fill`.
    fn scatter<R: Rng + ?Sized>(
        slice: &mut Slice<'_>,
        rng: &mut R,
        depth: std::ops::RangeInclusive<i32>,
        fill: f64,
    ) {
        for x in 0..CHUNK_SIZE {
            let top = GROUND_TOP_ROW - rng.gen_range(depth.clone());
            for row in top..GROUND_TOP_ROW {
                if rng.gen_bool(fill) {
                    slice.stamp(x, row, BlockKind::Rock);
                }
            }
        }
    }
}
