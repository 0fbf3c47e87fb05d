//! # Tree Generation
//!
//! Trees grow upward from the row above the platform top and never above
//! row 0 of their chunk. A tree is a trunk (straight, curved or branching)
//! plus a canopy of `tree_leaf` blocks sampled around the trunk's column.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::block::BlockKind;
use crate::chunk::{Chunk, CHUNK_SIZE};

/// Tree size class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeSize {
    /// 50% of trees.
    Small,
    /// 30% of trees.
    Medium,
    /// 20% of trees.
    Large,
}

impl TreeSize {
    /// Weighted draw: 50% small, 30% medium, 20% large.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let roll: f64 = rng.gen();
        if roll < 0.5 {
            Self::Small
        } else if roll < 0.8 {
            Self::Medium
        } else {
            Self::Large
        }
    }

    /// Draws `(trunk height, leaf budget)` for this size.
    fn dimensions<R: Rng + ?Sized>(self, rng: &mut R) -> (i32, usize) {
        match self {
            Self::Small => (rng.gen_range(8..=15), rng.gen_range(20..=40)),
            Self::Medium => (rng.gen_range(15..=25), rng.gen_range(50..=100)),
            Self::Large => (rng.gen_range(25..=40), rng.gen_range(100..=200)),
        }
    }
}

/// Trunk shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeShape {
    /// Single vertical column.
    Straight,
    /// Drifts one column left or right every third row.
    Curved,
    /// Shortened trunk with side branches.
    Branching,
}

/// Canopy layout. Wide canopies reach further from the trunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LeafPattern {
    Circular,
    Wide,
}

/// Grows one tree rooted above `column`.
///
/// Returns false when the chunk has no usable platform top or the root
/// cell is already taken by a tree; the chunk is left untouched in that case.
pub fn generate_tree<R: Rng + ?Sized>(chunk: &mut Chunk, column: i32, rng: &mut R) -> bool {
    let (height, leaf_budget) = TreeSize::random(rng).dimensions(rng);

    let Some((platform_top, _)) = chunk.platform_rows() else {
        return false;
    };
    if platform_top <= 0 {
        return false;
    }

    let mut column = column;
    if chunk.kind_at(column, platform_top) != Some(BlockKind::Ground) {
        let candidates: Vec<i32> = (0..CHUNK_SIZE)
            .filter(|&x| chunk.kind_at(x, platform_top) == Some(BlockKind::Ground))
            .collect();
        match candidates.choose(rng) {
            Some(&x) => column = x,
            None => return false,
        }
    }

    let trunk_start = platform_top - 1;
    if chunk
        .kind_at(column, trunk_start)
        .is_some_and(BlockKind::is_tree_part)
    {
        return false;
    }

    let shape = match rng.gen_range(0..3) {
        0 => TreeShape::Straight,
        1 => TreeShape::Curved,
        _ => TreeShape::Branching,
    };
    match shape {
        TreeShape::Straight => grow_straight(chunk, column, trunk_start, height),
        TreeShape::Curved => grow_curved(chunk, column, trunk_start, height, rng),
        TreeShape::Branching => grow_branching(chunk, column, trunk_start, height, rng),
    }

    grow_canopy(chunk, column, trunk_start, height, leaf_budget, rng);
    true
}

/// Rows of a trunk of `height` growing upward from `start`, clipped at row 0.
fn trunk_rows(start: i32, height: i32) -> impl Iterator<Item = i32> {
    let stop = (start - height).max(-1);
    (stop + 1..=start).rev()
}

fn grow_straight(chunk: &mut Chunk, column: i32, start: i32, height: i32) {
    for y in trunk_rows(start, height) {
        chunk.stamp_if_empty(column, y, BlockKind::Tree);
    }
}

fn grow_curved<R: Rng + ?Sized>(
    chunk: &mut Chunk,
    column: i32,
    start: i32,
    height: i32,
    rng: &mut R,
) {
    let mut offset = 0;
    for (i, y) in trunk_rows(start, height).enumerate() {
        chunk.stamp_if_empty(column + offset, y, BlockKind::Tree);
        if i % 3 == 0 {
            offset = (offset + rng.gen_range(-1..=1)).clamp(-1, 1);
        }
    }
}

fn grow_branching<R: Rng + ?Sized>(
    chunk: &mut Chunk,
    column: i32,
    start: i32,
    height: i32,
    rng: &mut R,
) {
    let main_height = (height as f32 * 0.7) as i32;
    grow_straight(chunk, column, start, main_height);

    let branch_top = (start - main_height).max(0);
    let branch_bottom = (start - 3).max(0);
    if branch_bottom <= branch_top {
        return;
    }

    let branches = rng.gen_range(2..=3);
    for _ in 0..branches {
        let row = rng.gen_range(branch_top..=branch_bottom);
        let direction = if rng.gen_bool(0.5) { -1 } else { 1 };
        let length = rng.gen_range(2..=4);
        for step in 1..=length {
            chunk.stamp_if_empty(column + direction * step, row, BlockKind::Tree);
        }
    }
}

fn grow_canopy<R: Rng + ?Sized>(
    chunk: &mut Chunk,
    column: i32,
    start: i32,
    height: i32,
    leaf_budget: usize,
    rng: &mut R,
) {
    let first_row = (start - height + 2).max(0);
    let last_row = (start - height - 3).max(0);

    let pattern = if rng.gen_bool(0.5) {
        LeafPattern::Circular
    } else {
        LeafPattern::Wide
    };
    let width = match pattern {
        LeafPattern::Wide => rng.gen_range(3..=5),
        LeafPattern::Circular => rng.gen_range(2..=4),
    };

    let mut leaves = Vec::new();
    for y in (last_row..=first_row).rev() {
        for x in (column - width)..=(column + width) {
            if !(0..CHUNK_SIZE).contains(&x) {
                continue;
            }
            if chunk.kind_at(x, y) == Some(BlockKind::Tree) {
                continue;
            }
            if rng.gen_bool(0.7) {
                leaves.push((x, y));
            }
        }
    }

    if leaves.len() > leaf_budget {
        let (kept, _) = leaves.partial_shuffle(rng, leaf_budget);
        leaves = kept.to_vec();
    }

    for (x, y) in leaves {
        chunk.stamp_if_empty(x, y, BlockKind::TreeLeaf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::ChunkCoord;
    use crate::seed::WorldSeed;

    fn platform_chunk(thickness: i32) -> Chunk {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), 32);
        for x in 0..CHUNK_SIZE {
            for y in 1..=thickness {
                chunk.stamp(x, y, BlockKind::Ground);
            }
        }
        chunk
    }

    #[test]
    fn test_trunk_rows_clip_at_zero() {
        assert_eq!(trunk_rows(0, 10).collect::<Vec<_>>(), vec![0]);
        assert_eq!(trunk_rows(5, 3).collect::<Vec<_>>(), vec![5, 4, 3]);
        assert_eq!(trunk_rows(2, 10).collect::<Vec<_>>(), vec![2, 1, 0]);
    }

    #[test]
    fn test_tree_needs_platform() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), 32);
        let mut rng = WorldSeed::new(1).stream();
        assert!(!generate_tree(&mut chunk, 5, &mut rng));
        assert_eq!(chunk.block_count(), 0);
    }

    #[test]
    fn test_tree_grows_in_reserved_row() {
        for seed in 0..100 {
            let mut chunk = platform_chunk(2);
            let mut rng = WorldSeed::new(seed).stream();
            assert!(generate_tree(&mut chunk, 5, &mut rng), "seed {seed}");
            let trunk: Vec<_> = chunk
                .iter()
                .filter(|(_, block)| block.kind == BlockKind::Tree)
                .map(|(pos, _)| pos)
                .collect();
            assert!(!trunk.is_empty(), "seed {seed}");
            assert!(trunk.iter().all(|pos| pos.y == 0), "seed {seed}: {trunk:?}");
        }
    }

    #[test]
    fn test_tree_falls_back_to_ground_column() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), 32);
        chunk.stamp(9, 1, BlockKind::Ground);
        let mut rng = WorldSeed::new(3).stream();
        assert!(generate_tree(&mut chunk, 2, &mut rng));
        assert_eq!(chunk.kind_at(9, 0), Some(BlockKind::Tree));
    }

    #[test]
    fn test_occupied_root_rejects_tree() {
        let mut chunk = platform_chunk(2);
        chunk.stamp(5, 0, BlockKind::Tree);
        let mut rng = WorldSeed::new(9).stream();
        assert!(!generate_tree(&mut chunk, 5, &mut rng));
    }

    #[test]
    fn test_short_platform_keeps_tree_in_row_zero() {
        for seed in 0..100 {
            let mut chunk = platform_chunk(3);
            let mut rng = WorldSeed::new(seed).stream();
            generate_tree(&mut chunk, 6, &mut rng);
            let leaves = chunk
                .iter()
                .filter(|(_, block)| block.kind == BlockKind::TreeLeaf)
                .count();
            let trunks = chunk
                .iter()
                .filter(|(_, block)| block.kind == BlockKind::Tree)
                .count();
            assert!(trunks >= 1, "seed {seed}");
            assert!(leaves + trunks <= CHUNK_SIZE as usize, "seed {seed}");
        }
    }
}
