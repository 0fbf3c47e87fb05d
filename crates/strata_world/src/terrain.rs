//! # Terrain Generation (normal world)
//!
//! Fills a freshly created chunk in five passes:
//!
//! 1. Platform band of `ground`, 2-3 rows thick, starting at row 1
//! 2. At most one elevation feature: a triangular mountain or a flat hill
//! 3. An optional pit carved through the platform, sometimes flooded
//! 4. Up to three trees on the platform top
//! 5. The connectivity pass, which prunes orphaned blocks
//!
//! Every feature that cannot satisfy its preconditions is skipped on its
//! own; the rest of the chunk still generates. The generator draws from the
//! caller's random stream, so the same chunk generated twice will differ
//! unless the stream is replayed.

use rand::Rng;
use tracing::trace;

use crate::block::BlockKind;
use crate::chunk::{Chunk, LocalPos, CHUNK_SIZE};
use crate::connectivity::ConnectivityPostProcessor;
use crate::tree;

/// First row of the platform band. Row 0 stays free for tree growth.
pub const PLATFORM_START_ROW: i32 = 1;

/// Size class shared by mountains and pits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeClass {
    /// Smallest footprint.
    Small,
    /// Middle footprint.
    Medium,
    /// Largest footprint.
    Large,
}

impl SizeClass {
    /// Picks a class uniformly.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.gen_range(0..3) {
            0 => Self::Small,
            1 => Self::Medium,
            _ => Self::Large,
        }
    }
}

/// Horizontal span of a feature, clipped to the chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Span {
    start: i32,
    end: i32,
}

impl Span {
    fn new(start: i32, width: i32) -> Self {
        Self {
            start,
            end: (start + width).min(CHUNK_SIZE),
        }
    }
}

/// Mountain parameters.
#[derive(Clone, Copy, Debug)]
struct Mountain {
    height: i32,
    span: Span,
}

impl Mountain {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let (height, start, width) = match SizeClass::random(rng) {
            SizeClass::Small => (
                rng.gen_range(3..=6),
                rng.gen_range(0..=6),
                rng.gen_range(3..=6),
            ),
            SizeClass::Medium => (
                rng.gen_range(6..=10),
                rng.gen_range(0..=4),
                rng.gen_range(5..=8),
            ),
            SizeClass::Large => (
                rng.gen_range(10..=15),
                rng.gen_range(0..=2),
                rng.gen_range(7..=12),
            ),
        };
        Self {
            height,
            span: Span::new(start, width),
        }
    }

    /// Column height of the triangular profile.
    fn column_height(&self, x: i32) -> i32 {
        let center = (self.span.start + self.span.end) as f32 / 2.0;
        let half_width = (self.span.end - self.span.start) as f32 / 2.0;
        if half_width > 0.0 {
            let factor = 1.0 - (x as f32 - center).abs() / half_width;
            (self.height as f32 * factor) as i32
        } else {
            self.height
        }
    }
}

/// Pit parameters.
#[derive(Clone, Copy, Debug)]
struct Pit {
    size: SizeClass,
    span: Span,
}

impl Pit {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let size = SizeClass::random(rng);
        let (start, width) = match size {
            SizeClass::Small => (rng.gen_range(2..=8), rng.gen_range(1..=2)),
            SizeClass::Medium => (rng.gen_range(1..=7), rng.gen_range(3..=5)),
            SizeClass::Large => (rng.gen_range(0..=5), rng.gen_range(5..=8)),
        };
        Self {
            size,
            span: Span::new(start, width),
        }
    }

    /// Both edges need ground on the first platform row, unless the edge is
    /// the chunk border.
    fn is_supported(&self, chunk: &Chunk) -> bool {
        let left_ok = self.span.start == 0 || chunk.has(self.span.start - 1, PLATFORM_START_ROW);
        let right_ok =
            self.span.end == CHUNK_SIZE || chunk.has(self.span.end, PLATFORM_START_ROW);
        left_ok && right_ok
    }
}

/// Feature probabilities for the normal world.
#[derive(Clone, Copy, Debug)]
pub struct TerrainGenerator {
    /// Chance of a mountain.
    pub mountain_chance: f64,
    /// Chance of a hill when no mountain was generated.
    pub hill_chance: f64,
    /// Chance of a pit.
    pub pit_chance: f64,
    /// Chance that a large pit is flooded.
    pub flood_chance: f64,
    /// Chance that the chunk grows trees at all.
    pub tree_chance: f64,
    /// Placement attempts per tree.
    pub tree_attempts: u32,
}

impl Default for TerrainGenerator {
    fn default() -> Self {
        Self {
            mountain_chance: 0.4,
            hill_chance: 0.5,
            pit_chance: 0.4,
            flood_chance: 0.15,
            tree_chance: 0.8,
            tree_attempts: 10,
        }
    }
}

impl TerrainGenerator {
    /// Creates a generator with the standard probabilities.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates the chunk's content.
    ///
    /// Does not touch the chunk's generation state; the caller owns the
    /// idempotence guard.
    pub fn generate<R: Rng + ?Sized>(&self, chunk: &mut Chunk, rng: &mut R) {
        let thickness = rng.gen_range(2..=3);
        Self::generate_platform(chunk, thickness);

        if rng.gen_bool(self.mountain_chance) {
            Self::generate_mountain(chunk, thickness, Mountain::random(rng));
        } else if rng.gen_bool(self.hill_chance) {
            Self::generate_hill(chunk, thickness, rng);
        }

        if rng.gen_bool(self.pit_chance) {
            self.generate_pit(chunk, thickness, rng);
        }

        if rng.gen_bool(self.tree_chance) {
            self.generate_trees(chunk, rng);
        }

        let pruned = ConnectivityPostProcessor::apply(chunk);
        if pruned > 0 {
            trace!(coord = ?chunk.coord(), pruned, "pruned orphan blocks");
        }
    }

    fn generate_platform(chunk: &mut Chunk, thickness: i32) {
        for x in 0..CHUNK_SIZE {
            for y in PLATFORM_START_ROW..PLATFORM_START_ROW + thickness {
                chunk.stamp(x, y, BlockKind::Ground);
            }
        }
    }

    fn generate_mountain(chunk: &mut Chunk, thickness: i32, mountain: Mountain) {
        for x in mountain.span.start..mountain.span.end {
            let height = mountain.column_height(x);
            for y in thickness..thickness + height {
                chunk.stamp_if_empty(x, y, BlockKind::Ground);
            }
        }
    }

    fn generate_hill<R: Rng + ?Sized>(chunk: &mut Chunk, thickness: i32, rng: &mut R) {
        let height = rng.gen_range(2..=5);
        let start = rng.gen_range(0..=8);
        let width = rng.gen_range(2..=5);
        let span = Span::new(start, width);
        for x in span.start..span.end {
            for y in thickness..thickness + height {
                chunk.stamp_if_empty(x, y, BlockKind::Ground);
            }
        }
    }

    fn generate_pit<R: Rng + ?Sized>(&self, chunk: &mut Chunk, thickness: i32, rng: &mut R) {
        let pit = Pit::random(rng);
        if !pit.is_supported(chunk) {
            trace!(coord = ?chunk.coord(), ?pit, "pit skipped: no support");
            return;
        }

        let flooded = pit.size == SizeClass::Large && rng.gen_bool(self.flood_chance);
        let bottom_row = PLATFORM_START_ROW + thickness - 1;
        for x in pit.span.start..pit.span.end {
            for y in PLATFORM_START_ROW..=bottom_row {
                chunk.remove(LocalPos::new(x, y));
            }
            if flooded {
                chunk.stamp(x, bottom_row, BlockKind::Water);
            }
        }
    }

    fn generate_trees<R: Rng + ?Sized>(&self, chunk: &mut Chunk, rng: &mut R) {
        let count = rng.gen_range(1..=3);
        for _ in 0..count {
            for _ in 0..self.tree_attempts {
                let column = rng.gen_range(1..=10);
                if tree::generate_tree(chunk, column, rng) {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::ChunkCoord;
    use crate::seed::WorldSeed;

    fn generate(seed: u64, coord: ChunkCoord) -> Chunk {
        let mut rng = WorldSeed::new(seed).stream();
        let mut chunk = Chunk::new(coord, 32);
        TerrainGenerator::new().generate(&mut chunk, &mut rng);
        chunk
    }

    #[test]
    fn test_row_zero_only_holds_trees() {
        for seed in 0..200 {
            let chunk = generate(seed, ChunkCoord::new(0, 0));
            for (pos, block) in chunk.iter() {
                if pos.y == 0 {
                    assert!(block.kind.is_tree_part(), "seed {seed}: {:?} at row 0", block.kind);
                }
            }
        }
    }

    #[test]
    fn test_platform_band_exists_outside_pits() {
        for seed in 0..200 {
            let chunk = generate(seed, ChunkCoord::new(seed as i32, 0));
            let (top, bottom) = chunk.platform_rows().expect("platform band");
            assert_eq!(top, PLATFORM_START_ROW, "seed {seed}");
            assert!((2..=3).contains(&bottom), "seed {seed}: bottom row {bottom}");
        }
    }

    #[test]
    fn test_water_only_in_pit_bottom_row() {
        for seed in 0..500 {
            let chunk = generate(seed, ChunkCoord::new(0, seed as i32));
            for (pos, block) in chunk.iter() {
                if block.kind == BlockKind::Water {
                    assert!((2..=3).contains(&pos.y), "seed {seed}: water at {pos:?}");
                    assert_ne!(chunk.kind_at(pos.x, pos.y - 1), Some(BlockKind::Ground));
                }
            }
        }
    }

    #[test]
    fn test_same_stream_same_chunk() {
        let a = generate(7, ChunkCoord::new(1, 2));
        let b = generate(7, ChunkCoord::new(1, 2));
        let a: Vec<_> = a.iter().map(|(pos, block)| (pos, block.kind)).collect();
        let b: Vec<_> = b.iter().map(|(pos, block)| (pos, block.kind)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_mountain_profile_peaks_in_center() {
        let mountain = Mountain {
            height: 10,
            span: Span::new(0, 10),
        };
        assert_eq!(mountain.column_height(5), 10);
        assert_eq!(mountain.column_height(0), 0);
        assert!(mountain.column_height(3) < mountain.column_height(4));
    }

    #[test]
    fn test_unsupported_pit_is_rejected() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), 32);
        let pit = Pit {
            size: SizeClass::Medium,
            span: Span::new(3, 4),
        };
        assert!(!pit.is_supported(&chunk));
        chunk.stamp(2, PLATFORM_START_ROW, BlockKind::Ground);
        assert!(!pit.is_supported(&chunk));
        chunk.stamp(7, PLATFORM_START_ROW, BlockKind::Ground);
        assert!(pit.is_supported(&chunk));
    }

    #[test]
    fn test_pit_at_chunk_edge_needs_one_side() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), 32);
        let pit = Pit {
            size: SizeClass::Large,
            span: Span::new(5, 8),
        };
        assert_eq!(pit.span.end, CHUNK_SIZE);
        chunk.stamp(4, PLATFORM_START_ROW, BlockKind::Ground);
        assert!(pit.is_supported(&chunk));
    }
}
