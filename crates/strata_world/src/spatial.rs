//! # Spatial Queries
//!
//! Collision and probe queries against resident chunks. Every query takes a
//! world-space rectangle in pixels (y grows downward) and only visits the
//! chunks that rectangle overlaps. `water` never takes part in any query.
//!
//! Moving entities consume these queries through [`CollisionQuery`], which is
//! implemented both by [`SpatialQuery`] and by the `World` facade.

use crate::block::{Block, BlockKind};
use crate::chunk::{chunk_index_for_pixel, ChunkCoord, LocalPos, CHUNK_SIZE};
use crate::chunk_store::ChunkStore;

/// Height of the probe strip below an entity's feet, in pixels.
pub const GROUND_PROBE_DEPTH: f32 = 5.0;

/// Portal reach, in blocks, measured center to center.
pub const PORTAL_REACH_BLOCKS: f32 = 1.5;

/// Chunks searched around an entity for portals.
pub const PORTAL_SEARCH_CHUNKS: i32 = 2;

// ============================================================================
// RECT (Axis-Aligned Bounding Box)
// ============================================================================

/// Axis-aligned rectangle in world pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Creates a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center point.
    #[inline]
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict overlap: touching edges do not intersect.
    #[inline]
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Strict overlap of the horizontal spans only.
    #[inline]
    #[must_use]
    pub fn overlaps_columns(&self, other: &Rect) -> bool {
        self.x < other.right() && self.right() > other.x
    }

    /// Moves the rectangle by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Grows the rectangle by `margin` on every side.
    #[inline]
    #[must_use]
    pub fn inflate(&self, margin: f32) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }

    /// Inclusive chunk bounding box of the rectangle.
    #[must_use]
    pub fn chunk_bounds(&self, block_size: i32) -> (ChunkCoord, ChunkCoord) {
        (
            ChunkCoord::new(
                chunk_index_for_pixel(self.x, block_size),
                chunk_index_for_pixel(self.y, block_size),
            ),
            ChunkCoord::new(
                chunk_index_for_pixel(self.right(), block_size),
                chunk_index_for_pixel(self.bottom(), block_size),
            ),
        )
    }
}

// ============================================================================
// COLLISION QUERY (seam for moving entities)
// ============================================================================

/// Queries a moving entity needs from the world.
pub trait CollisionQuery {
    /// Pixel size of a block.
    fn block_size(&self) -> i32;

    /// Returns true if the rectangle strictly overlaps any solid block.
    fn check_block_collision(&self, x: f32, y: f32, width: f32, height: f32) -> bool;

    /// Entity `y` that rests the feet on the nearest floor.
    fn find_ground_y(&self, x: f32, bottom: f32, height: f32) -> f32;

    /// Entity top that sits flush under the nearest ceiling.
    fn find_ceiling_y(&self, x: f32, top: f32, height: f32) -> f32;

    /// Returns true if a solid block lies within the probe strip under the feet.
    fn check_on_ground(&self, x: f32, y: f32, width: f32, height: f32) -> bool;

    /// Returns true if the entity's center is within reach of a portal.
    fn check_portal_collision(&self, x: f32, y: f32, width: f32, height: f32) -> bool;
}

// ============================================================================
// SPATIAL QUERY
// ============================================================================

/// Read-only view over a chunk store that answers spatial queries.
#[derive(Clone, Copy, Debug)]
pub struct SpatialQuery<'a> {
    store: &'a ChunkStore,
}

impl<'a> SpatialQuery<'a> {
    /// Creates a query view over `store`.
    #[must_use]
    pub const fn new(store: &'a ChunkStore) -> Self {
        Self { store }
    }

    /// Blocks of the resident chunks inside the rectangle's chunk bounds.
    fn blocks_near(&self, area: Rect) -> impl Iterator<Item = &'a Block> + 'a {
        let store = self.store;
        let (min, max) = area.chunk_bounds(store.block_size());
        (min.x..=max.x)
            .flat_map(move |cx| (min.y..=max.y).map(move |cy| ChunkCoord::new(cx, cy)))
            .filter_map(move |coord| store.get(coord))
            .flat_map(|chunk| chunk.iter().map(|(_, block)| block))
    }

    /// Solid blocks near `area`.
    fn solid_blocks_near(&self, area: Rect) -> impl Iterator<Item = &'a Block> + 'a {
        self.blocks_near(area).filter(|block| block.kind.is_solid())
    }

    /// Block at world block indices, if its chunk is resident.
    #[must_use]
    pub fn get_block_at(&self, block_x: i32, block_y: i32) -> Option<&'a Block> {
        let (coord, local) = LocalPos::from_block_index(block_x, block_y);
        self.store.get(coord)?.get(local)
    }

    /// Returns true if any of the four side neighbors of a cell is occupied.
    ///
    /// Neighbors past the `i32` range do not exist.
    #[must_use]
    pub fn has_adjacent_block(&self, block_x: i32, block_y: i32) -> bool {
        [(-1, 0), (1, 0), (0, -1), (0, 1)].iter().any(|&(dx, dy)| {
            match (block_x.checked_add(dx), block_y.checked_add(dy)) {
                (Some(x), Some(y)) => self.get_block_at(x, y).is_some(),
                _ => false,
            }
        })
    }

    /// Highest solid block top in the rectangle's columns, if any.
    ///
    /// Used to place spawns above terrain.
    #[must_use]
    pub fn highest_solid_top(&self, area: Rect) -> Option<f32> {
        let block_size = self.store.block_size();
        self.solid_blocks_near(area)
            .map(|block| block.rect(block_size))
            .filter(|rect| rect.intersects(&area))
            .map(|rect| rect.y)
            .reduce(f32::min)
    }
}

impl CollisionQuery for SpatialQuery<'_> {
    fn block_size(&self) -> i32 {
        self.store.block_size()
    }

    fn check_block_collision(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        let entity = Rect::new(x, y, width, height);
        let block_size = self.store.block_size();
        self.solid_blocks_near(entity)
            .any(|block| block.rect(block_size).intersects(&entity))
    }

    fn find_ground_y(&self, x: f32, bottom: f32, height: f32) -> f32 {
        let block_size = self.store.block_size();
        let search_top = bottom - height * 2.0;
        let search_bottom = bottom + block_size as f32;
        let area = Rect::new(x, search_top, height, search_bottom - search_top);

        let mut above: Option<f32> = None;
        let mut below: Option<f32> = None;
        for block in self.solid_blocks_near(area) {
            let rect = block.rect(block_size);
            if !rect.overlaps_columns(&area) || rect.y < search_top || rect.y > search_bottom {
                continue;
            }
            if rect.y <= bottom {
                above = Some(above.map_or(rect.y, |best| best.max(rect.y)));
            } else {
                below = Some(below.map_or(rect.y, |best| best.min(rect.y)));
            }
        }

        above.or(below).map_or(bottom - height, |top| top - height)
    }

    fn find_ceiling_y(&self, x: f32, top: f32, height: f32) -> f32 {
        let block_size = self.store.block_size();
        let search_top = top - height;
        let search_bottom = top + block_size as f32 * 2.0;
        let area = Rect::new(x, search_top, height, search_bottom - search_top);

        let mut below: Option<f32> = None;
        let mut above: Option<f32> = None;
        for block in self.solid_blocks_near(area) {
            let rect = block.rect(block_size);
            let block_bottom = rect.bottom();
            if !rect.overlaps_columns(&area)
                || block_bottom < search_top
                || block_bottom > search_bottom
            {
                continue;
            }
            if block_bottom >= top {
                below = Some(below.map_or(block_bottom, |best| best.min(block_bottom)));
            } else {
                above = Some(above.map_or(block_bottom, |best| best.max(block_bottom)));
            }
        }

        below.or(above).unwrap_or(top)
    }

    fn check_on_ground(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        self.check_block_collision(x, y + height, width, GROUND_PROBE_DEPTH)
    }

    fn check_portal_collision(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        let block_size = self.store.block_size();
        let entity = Rect::new(x, y, width, height);
        let (cx, cy) = entity.center();
        let reach = block_size as f32 * PORTAL_REACH_BLOCKS;
        let area = entity.inflate((PORTAL_SEARCH_CHUNKS * CHUNK_SIZE * block_size) as f32);

        self.blocks_near(area)
            .filter(|block| block.kind == BlockKind::Portal)
            .any(|block| {
                let (px, py) = block.center(block_size);
                (cx - px).hypot(cy - py) <= reach
            })
    }
}
