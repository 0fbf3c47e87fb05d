//! # Connectivity Pass
//!
//! Runs once after normal-world generation. A block survives if it touches
//! another block along one of its four sides, or if it sits inside the
//! platform band. Trunks and leaves are never pruned.
//!
//! The pass is a single sweep: neighbors are judged against the chunk as it
//! was before the sweep started, so removing one orphan never cascades into
//! its neighbors.

use crate::chunk::{Chunk, LocalPos};

/// Offsets of the four side neighbors.
const NEIGHBORS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Removes unsupported blocks from freshly generated chunks.
pub struct ConnectivityPostProcessor;

impl ConnectivityPostProcessor {
    /// Prunes orphans from `chunk` and returns how many blocks were removed.
    pub fn apply(chunk: &mut Chunk) -> usize {
        let anchor_row = chunk.platform_rows().map(|(_, bottom)| bottom);

        let orphans: Vec<LocalPos> = chunk
            .iter()
            .filter(|(pos, block)| {
                if block.kind.is_tree_part() {
                    return false;
                }
                if anchor_row.is_some_and(|row| pos.y <= row) {
                    return false;
                }
                !Self::has_neighbor(chunk, *pos)
            })
            .map(|(pos, _)| pos)
            .collect();

        for &pos in &orphans {
            chunk.remove(pos);
        }
        orphans.len()
    }

    /// Returns true if any side neighbor inside the chunk is occupied.
    #[must_use]
    pub fn has_neighbor(chunk: &Chunk, pos: LocalPos) -> bool {
        NEIGHBORS
            .iter()
            .any(|&(dx, dy)| chunk.has(pos.x + dx, pos.y + dy))
    }
}
