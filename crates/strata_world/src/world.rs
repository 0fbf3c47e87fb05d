//! # World
//!
//! The facade tying chunk storage, generation and spatial queries together.
//!
//! A `World` runs in one of two modes. The normal world draws every chunk
//! from the shared random stream; the alternate world seeds each chunk from
//! its coordinate. Switching modes drops every resident chunk so that no
//! chunk generated under one mode survives into the other.
//!
//! ## Render Window
//!
//! `update_rendered_chunks` keeps a square of chunks generated around the
//! player and evicts anything further than the render distance plus the
//! eviction margin:
//!
//! ```text
//!   evicted | kept, not generated | generated | player
//!   ------- + ------------------- + --------- + ------
//!    > r+m  |     r < d <= r+m    |  d <= r   |  d = 0
//! ```

use tracing::debug;

use crate::alt_world::{AltWorldGenerator, GROUND_TOP_ROW, SPAWN_CHUNK};
use crate::block::{Block, BlockKind, BlockOrigin};
use crate::chunk::{Chunk, ChunkCoord, LocalPos, CHUNK_SIZE};
use crate::chunk_store::ChunkStore;
use crate::config::WorldConfig;
use crate::mining::within_reach;
use crate::seed::{GenRng, WorldSeed};
use crate::spatial::{CollisionQuery, Rect, SpatialQuery};
use crate::terrain::TerrainGenerator;

/// Chunks generated around the alternate-world spawn, per direction.
const SPAWN_RADIUS: i32 = 2;

/// Which generator and ruleset the world runs under.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WorldMode {
    /// Platforms, mountains, pits and trees.
    #[default]
    Normal,
    /// Ground band with rock structures.
    Alternate,
}

/// Outcome of a render window update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowUpdate {
    /// Chunks generated by this update.
    pub generated: usize,
    /// Chunks dropped for being outside the window.
    pub evicted: usize,
    /// Chunks left for a later update by the generation budget.
    pub deferred: usize,
}

/// World statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldStats {
    /// Current mode.
    pub mode: WorldMode,
    /// Resident chunks.
    pub resident_chunks: usize,
    /// Resident chunks that have been generated.
    pub generated_chunks: usize,
    /// Blocks across all resident chunks.
    pub total_blocks: usize,
}

/// Chunked 2D world.
#[derive(Debug)]
pub struct World {
    /// Configuration the world was built from.
    config: WorldConfig,
    /// Resident chunks.
    store: ChunkStore,
    /// Shared random stream for the normal world.
    rng: GenRng,
    /// Active mode.
    mode: WorldMode,
    /// Normal-world generator.
    terrain: TerrainGenerator,
    /// Alternate-world generator.
    alt_world: AltWorldGenerator,
}

impl World {
    /// Creates an empty world in normal mode.
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        let rng = WorldSeed::new(config.seed).stream();
        Self {
            store: ChunkStore::new(config.block_size),
            rng,
            mode: WorldMode::Normal,
            terrain: TerrainGenerator::new(),
            alt_world: AltWorldGenerator::new(),
            config,
        }
    }

    /// Creates a world with default configuration and the given seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::new(WorldConfig::with_seed(seed))
    }

    /// Configuration the world was built from.
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> WorldMode {
        self.mode
    }

    /// Switches mode. A real switch drops every resident chunk.
    pub fn set_mode(&mut self, mode: WorldMode) {
        if mode == self.mode {
            return;
        }
        let dropped = self.store.len();
        self.store.clear();
        self.mode = mode;
        debug!(?mode, dropped, "world mode switched");
    }

    /// Read-only spatial query view.
    #[must_use]
    pub fn query(&self) -> SpatialQuery<'_> {
        SpatialQuery::new(&self.store)
    }

    // ========================================================================
    // GENERATION
    // ========================================================================

    /// Generates the chunk at `coord` under the current mode.
    ///
    /// Returns false if the chunk was already generated; nothing changes then.
    pub fn generate_chunk(&mut self, coord: ChunkCoord) -> bool {
        if self.store.is_generated(coord) {
            return false;
        }

        let chunk = self.store.get_or_create(coord);
        match self.mode {
            WorldMode::Normal => self.terrain.generate(chunk, &mut self.rng),
            WorldMode::Alternate => {
                self.alt_world.generate(chunk);
            }
        }
        self.store.mark_generated(coord, self.mode);
        true
    }

    /// Generates the render window around a pixel position and evicts chunks
    /// that fell out of it.
    pub fn update_rendered_chunks(
        &mut self,
        center_x: f32,
        center_y: f32,
        render_distance: i32,
    ) -> WindowUpdate {
        let center = ChunkCoord::from_pixel(center_x, center_y, self.config.block_size);
        let mut update = WindowUpdate::default();

        let mut window: Vec<ChunkCoord> = (-render_distance..=render_distance)
            .flat_map(|dx| {
                (-render_distance..=render_distance)
                    .map(move |dy| ChunkCoord::new(center.x + dx, center.y + dy))
            })
            .filter(|&coord| !self.store.is_generated(coord))
            .collect();
        window.sort_by_key(|&coord| {
            let (dx, dy) = coord.axis_distance(center);
            dx.max(dy)
        });

        for coord in window {
            if self
                .config
                .generation_budget
                .is_some_and(|budget| update.generated >= budget)
            {
                update.deferred += 1;
                continue;
            }
            if self.generate_chunk(coord) {
                update.generated += 1;
            }
        }

        let keep = render_distance + self.config.eviction_margin;
        let stale: Vec<ChunkCoord> = self
            .store
            .coords()
            .filter(|&coord| {
                let (dx, dy) = coord.axis_distance(center);
                dx > keep || dy > keep
            })
            .collect();
        for coord in stale {
            if self.store.evict(coord).is_some() {
                update.evicted += 1;
            }
        }

        if update != WindowUpdate::default() {
            debug!(
                ?center,
                generated = update.generated,
                evicted = update.evicted,
                deferred = update.deferred,
                "render window updated"
            );
        }
        update
    }

    /// Moves the world into the alternate mode and returns the spawn position
    /// for an entity of `entity_height` pixels.
    ///
    /// The spawn sits at x = 0, one block above the highest block in the
    /// spawn chunk column.
    pub fn enter_alternate_world(&mut self, entity_height: f32) -> (f32, f32) {
        self.set_mode(WorldMode::Alternate);

        for dx in -SPAWN_RADIUS..=SPAWN_RADIUS {
            for dy in -SPAWN_RADIUS..=SPAWN_RADIUS {
                self.generate_chunk(ChunkCoord::new(SPAWN_CHUNK.x + dx, SPAWN_CHUNK.y + dy));
            }
        }

        let block_size = self.config.block_size;
        let chunk_px = (CHUNK_SIZE * block_size) as f32;
        let (origin_x, _) = SPAWN_CHUNK.origin_px(block_size);
        let (_, top_y) = ChunkCoord::new(0, SPAWN_CHUNK.y - SPAWN_RADIUS).origin_px(block_size);
        let column = Rect::new(
            origin_x as f32,
            top_y as f32,
            chunk_px,
            chunk_px * (SPAWN_RADIUS * 2 + 1) as f32,
        );
        let surface = self
            .query()
            .highest_solid_top(column)
            .unwrap_or((GROUND_TOP_ROW * block_size) as f32);

        let spawn = (0.0, surface - entity_height - block_size as f32);
        debug!(x = spawn.0, y = spawn.1, "entered alternate world");
        spawn
    }

    // ========================================================================
    // BLOCK ACCESS
    // ========================================================================

    /// Stamps a block unconditionally, creating the chunk if needed.
    ///
    /// Intended for scripted setups such as portal placement.
    pub fn set_block_at(&mut self, block_x: i32, block_y: i32, kind: BlockKind) {
        let (coord, local) = LocalPos::from_block_index(block_x, block_y);
        self.store
            .get_or_create(coord)
            .set(local, kind, BlockOrigin::Placed);
    }

    /// Block at world block indices.
    #[must_use]
    pub fn get_block_at(&self, block_x: i32, block_y: i32) -> Option<&Block> {
        self.query().get_block_at(block_x, block_y)
    }

    /// Removes and returns the block at world block indices.
    pub fn remove_block_at(&mut self, block_x: i32, block_y: i32) -> Option<Block> {
        let (coord, local) = LocalPos::from_block_index(block_x, block_y);
        self.store.get_mut(coord)?.remove(local)
    }

    /// Places a block of `kind` into an empty cell next to an existing block.
    ///
    /// Returns false if the cell is occupied or has no occupied side
    /// neighbor.
    pub fn place_block_at(&mut self, block_x: i32, block_y: i32, kind: BlockKind) -> bool {
        let query = self.query();
        if query.get_block_at(block_x, block_y).is_some()
            || !query.has_adjacent_block(block_x, block_y)
        {
            return false;
        }
        self.set_block_at(block_x, block_y, kind);
        true
    }

    /// Places a block for an entity whose top-left corner is at pixel
    /// `(x, y)`. The target must be within mining reach.
    ///
    /// Returns false if the target is out of reach or `place_block_at`
    /// declines it.
    pub fn place_block_within_reach(
        &mut self,
        x: f32,
        y: f32,
        block_x: i32,
        block_y: i32,
        kind: BlockKind,
    ) -> bool {
        if !within_reach(x, y, block_x, block_y, self.config.block_size) {
            return false;
        }
        self.place_block_at(block_x, block_y, kind)
    }

    // ========================================================================
    // INTROSPECTION
    // ========================================================================

    /// Resident chunk at `coord`.
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.store.get(coord)
    }

    /// Number of resident chunks.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.store.len()
    }

    /// Returns true if the chunk at `coord` has been generated.
    #[must_use]
    pub fn is_generated(&self, coord: ChunkCoord) -> bool {
        self.store.is_generated(coord)
    }

    /// Coordinates of every resident chunk.
    pub fn chunk_coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.store.coords()
    }

    /// Gets world statistics.
    #[must_use]
    pub fn stats(&self) -> WorldStats {
        WorldStats {
            mode: self.mode,
            resident_chunks: self.store.len(),
            generated_chunks: self.store.generated_count(),
            total_blocks: self.store.iter().map(Chunk::block_count).sum(),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl CollisionQuery for World {
    fn block_size(&self) -> i32 {
        self.config.block_size
    }

    fn check_block_collision(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        self.query().check_block_collision(x, y, width, height)
    }

    fn find_ground_y(&self, x: f32, bottom: f32, height: f32) -> f32 {
        self.query().find_ground_y(x, bottom, height)
    }

    fn find_ceiling_y(&self, x: f32, top: f32, height: f32) -> f32 {
        self.query().find_ceiling_y(x, top, height)
    }

    fn check_on_ground(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        self.query().check_on_ground(x, y, width, height)
    }

    fn check_portal_collision(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        self.query().check_portal_collision(x, y, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(chunk: &Chunk) -> Vec<(LocalPos, BlockKind)> {
        chunk.iter().map(|(pos, block)| (pos, block.kind)).collect()
    }

    #[test]
    fn test_generate_is_idempotent() {
        let mut world = World::with_seed(11);
        let coord = ChunkCoord::new(2, -1);
        assert!(world.generate_chunk(coord));
        let before = snapshot(world.chunk(coord).unwrap());
        assert!(!world.generate_chunk(coord));
        assert_eq!(snapshot(world.chunk(coord).unwrap()), before);
    }

    #[test]
    fn test_same_seed_same_order_same_world() {
        let mut a = World::with_seed(5);
        let mut b = World::with_seed(5);
        a.update_rendered_chunks(0.0, 0.0, 2);
        b.update_rendered_chunks(0.0, 0.0, 2);
        for coord in a.chunk_coords() {
            assert_eq!(
                snapshot(a.chunk(coord).unwrap()),
                snapshot(b.chunk(coord).unwrap())
            );
        }
    }

    #[test]
    fn test_window_generates_square() {
        let mut world = World::with_seed(1);
        let update = world.update_rendered_chunks(0.0, 0.0, 3);
        assert_eq!(update.generated, 49);
        assert_eq!(update.evicted, 0);
        assert_eq!(world.chunk_count(), 49);

        let again = world.update_rendered_chunks(100.0, 100.0, 3);
        assert_eq!(again, WindowUpdate::default());
    }

    #[test]
    fn test_generation_budget_defers() {
        let config = WorldConfig {
            generation_budget: Some(10),
            ..WorldConfig::with_seed(3)
        };
        let mut world = World::new(config);
        let update = world.update_rendered_chunks(0.0, 0.0, 2);
        assert_eq!(update.generated, 10);
        assert_eq!(update.deferred, 15);
        // Nearest chunks come first.
        assert!(world.is_generated(ChunkCoord::new(0, 0)));

        let update = world.update_rendered_chunks(0.0, 0.0, 2);
        assert_eq!((update.generated, update.deferred), (10, 5));
        let update = world.update_rendered_chunks(0.0, 0.0, 2);
        assert_eq!((update.generated, update.deferred), (5, 0));
    }

    #[test]
    fn test_mode_switch_clears_store() {
        let mut world = World::with_seed(2);
        world.update_rendered_chunks(0.0, 0.0, 1);
        assert_eq!(world.chunk_count(), 9);

        world.set_mode(WorldMode::Normal);
        assert_eq!(world.chunk_count(), 9);

        world.set_mode(WorldMode::Alternate);
        assert_eq!(world.chunk_count(), 0);
        assert_eq!(world.stats().generated_chunks, 0);
    }

    #[test]
    fn test_placement_needs_neighbor() {
        let mut world = World::with_seed(0);
        world.set_block_at(0, 0, BlockKind::Ground);
        assert!(!world.place_block_at(5, 5, BlockKind::WoodPlank));
        assert!(!world.place_block_at(0, 0, BlockKind::WoodPlank));
        assert!(world.place_block_at(0, -1, BlockKind::WoodPlank));

        let placed = world.get_block_at(0, -1).unwrap();
        assert_eq!(placed.kind, BlockKind::WoodPlank);
        assert_eq!(placed.origin, BlockOrigin::Placed);
        assert_eq!((placed.x, placed.y), (0, -32));
    }

    #[test]
    fn test_placement_within_reach() {
        let mut world = World::with_seed(0);
        world.set_block_at(10, 0, BlockKind::Ground);
        world.set_block_at(12, 0, BlockKind::Ground);
        // Entity at block (0, 0): column 11 is out of reach, column 10 is not.
        assert!(!world.place_block_within_reach(0.0, 0.0, 11, 0, BlockKind::WoodPlank));
        assert!(world.get_block_at(11, 0).is_none());
        assert!(world.place_block_within_reach(0.0, 0.0, 10, -1, BlockKind::WoodPlank));
        // Reach never bypasses the adjacency rule.
        assert!(!world.place_block_within_reach(0.0, 0.0, 5, 5, BlockKind::WoodPlank));
        assert!(!world.place_block_within_reach(0.0, 0.0, i32::MAX, 0, BlockKind::WoodPlank));
    }

    #[test]
    fn test_placement_at_index_limits() {
        let mut world = World::with_seed(0);
        assert!(!world.place_block_at(i32::MAX, i32::MIN, BlockKind::Rock));
        assert!(!world.place_block_at(i32::MIN, i32::MAX, BlockKind::Rock));
        assert_eq!(world.chunk_count(), 0);
    }

    #[test]
    fn test_remove_from_missing_chunk() {
        let mut world = World::with_seed(0);
        assert!(world.remove_block_at(100, 100).is_none());
        assert_eq!(world.chunk_count(), 0);
    }

    #[test]
    fn test_stats() {
        let mut world = World::with_seed(0);
        world.set_block_at(-1, -1, BlockKind::Portal);
        world.set_block_at(0, 0, BlockKind::Rock);
        let stats = world.stats();
        assert_eq!(stats.mode, WorldMode::Normal);
        assert_eq!(stats.resident_chunks, 2);
        assert_eq!(stats.generated_chunks, 0);
        assert_eq!(stats.total_blocks, 2);
    }
}
