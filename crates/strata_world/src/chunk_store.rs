//! # Chunk Store
//!
//! Sparse mapping from chunk coordinate to chunk, plus the set of keys that
//! have been generated. Creating a chunk never generates it; generation is
//! owned by the `World`.
//!
//! Eviction discards state unconditionally. There is no persistence, so a
//! normal-world chunk that is evicted and later revisited is generated again
//! from the live random stream and will usually differ.

use std::collections::{HashMap, HashSet};

use crate::chunk::{Chunk, ChunkCoord};
use crate::world::WorldMode;

/// Resident chunks keyed by coordinate.
#[derive(Debug)]
pub struct ChunkStore {
    /// All resident chunks.
    chunks: HashMap<ChunkCoord, Chunk>,
    /// Keys whose chunk has been generated.
    generated: HashSet<ChunkCoord>,
    /// Block size handed to new chunks.
    block_size: i32,
}

impl ChunkStore {
    /// Creates an empty store for blocks of `block_size` pixels.
    #[must_use]
    pub fn new(block_size: i32) -> Self {
        Self {
            chunks: HashMap::new(),
            generated: HashSet::new(),
            block_size,
        }
    }

    /// Block size in pixels.
    #[inline]
    #[must_use]
    pub const fn block_size(&self) -> i32 {
        self.block_size
    }

    /// Returns the chunk at `coord`, creating an empty one if absent.
    pub fn get_or_create(&mut self, coord: ChunkCoord) -> &mut Chunk {
        let block_size = self.block_size;
        self.chunks
            .entry(coord)
            .or_insert_with(|| Chunk::new(coord, block_size))
    }

    /// Returns the chunk at `coord` without creating it.
    #[inline]
    #[must_use]
    pub fn get(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Mutable access without creation.
    #[inline]
    pub fn get_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    /// Drops the chunk and its generated flag.
    pub fn evict(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        self.generated.remove(&coord);
        self.chunks.remove(&coord)
    }

    /// Returns true if the chunk at `coord` has been generated.
    #[inline]
    #[must_use]
    pub fn is_generated(&self, coord: ChunkCoord) -> bool {
        self.generated.contains(&coord)
    }

    /// Records the chunk at `coord` as generated under `mode`.
    pub fn mark_generated(&mut self, coord: ChunkCoord, mode: WorldMode) {
        self.get_or_create(coord).mark_generated(mode);
        self.generated.insert(coord);
    }

    /// Drops every chunk and generated flag.
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.generated.clear();
    }

    /// Number of resident chunks.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns true if no chunk is resident.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Number of generated keys.
    #[inline]
    #[must_use]
    pub fn generated_count(&self) -> usize {
        self.generated.len()
    }

    /// Coordinates of all resident chunks.
    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }

    /// Iterates over resident chunks.
    pub fn iter(&self) -> impl Iterator<Item = &Chunk> + '_ {
        self.chunks.values()
    }
}
