//! # Mining
//!
//! How long a block takes to mine depends on its kind and the tool held.
//! A [`MiningSession`] tracks one target while the player keeps mining and
//! removes the block once enough time has passed.

use crate::block::{Block, BlockKind};
use crate::world::World;

/// Maximum per-axis distance, in blocks, between the miner and its target.
pub const REACH_BLOCKS: i32 = 10;

/// Shortest timed mining duration a tool can reach, in seconds.
pub const MIN_MINE_SECONDS: f32 = 0.1;

/// Tool held while mining.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tool {
    /// No tool.
    #[default]
    Hand,
    /// Crafted drill; two seconds faster on everything.
    WoodDrill,
    /// Crafted stick; a little faster on everything except trees.
    StickWood,
}

/// Time needed to mine a block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MineTime {
    /// Removed on the first tick.
    Instant,
    /// Removed after the given number of seconds.
    Timed(f32),
    /// Cannot be mined.
    Unminable,
}

/// Mining time for `kind` with `tool`.
#[must_use]
pub fn mine_duration(kind: BlockKind, tool: Tool) -> MineTime {
    let Some(base) = kind.base_mine_seconds() else {
        return MineTime::Unminable;
    };
    match kind {
        BlockKind::TreeLeaf => return MineTime::Instant,
        BlockKind::Portal => return MineTime::Timed(base),
        _ => {}
    }

    let seconds = match tool {
        Tool::Hand => base,
        Tool::WoodDrill => (base - 2.0).max(MIN_MINE_SECONDS),
        Tool::StickWood if kind == BlockKind::Tree => base,
        Tool::StickWood => 2.7,
    };
    MineTime::Timed(seconds)
}

/// Returns true if block `(block_x, block_y)` is within reach of a miner
/// whose top-left corner is at pixel `(x, y)`.
#[must_use]
pub fn within_reach(x: f32, y: f32, block_x: i32, block_y: i32, block_size: i32) -> bool {
    let size = block_size as f32;
    let miner_x = (x / size).floor() as i32;
    let miner_y = (y / size).floor() as i32;
    let reach = REACH_BLOCKS.unsigned_abs();
    block_x.abs_diff(miner_x) <= reach && block_y.abs_diff(miner_y) <= reach
}

/// Progress on mining one block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MiningSession {
    block_x: i32,
    block_y: i32,
    kind: BlockKind,
    duration: MineTime,
    elapsed: f32,
}

impl MiningSession {
    /// Starts mining the block at `(block_x, block_y)` for a miner at pixel
    /// `(x, y)`.
    ///
    /// Returns `None` if the cell is empty, out of reach, or unminable.
    #[must_use]
    pub fn start(
        world: &World,
        x: f32,
        y: f32,
        block_x: i32,
        block_y: i32,
        tool: Tool,
    ) -> Option<Self> {
        let block = world.get_block_at(block_x, block_y)?;
        if !within_reach(x, y, block_x, block_y, world.config().block_size) {
            return None;
        }
        let duration = mine_duration(block.kind, tool);
        if duration == MineTime::Unminable {
            return None;
        }
        Some(Self {
            block_x,
            block_y,
            kind: block.kind,
            duration,
            elapsed: 0.0,
        })
    }

    /// Target cell in block indices.
    #[must_use]
    pub fn target(&self) -> (i32, i32) {
        (self.block_x, self.block_y)
    }

    /// Kind of the target when mining started.
    #[must_use]
    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    /// Total time needed.
    #[must_use]
    pub fn duration(&self) -> MineTime {
        self.duration
    }

    /// Adds `dt` seconds of mining. Returns true once the block is mined.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        self.is_complete()
    }

    /// Returns true once enough time has passed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        match self.duration {
            MineTime::Instant => true,
            MineTime::Timed(seconds) => self.elapsed >= seconds,
            MineTime::Unminable => false,
        }
    }

    /// Fraction of the work done, in `0.0..=1.0`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        match self.duration {
            MineTime::Instant => 1.0,
            MineTime::Timed(seconds) if seconds > 0.0 => (self.elapsed / seconds).min(1.0),
            MineTime::Timed(_) => 1.0,
            MineTime::Unminable => 0.0,
        }
    }

    /// Removes the mined block from the world.
    ///
    /// Returns `None` if the session is not complete yet, or if the target
    /// cell no longer holds the block that was being mined.
    pub fn finish(self, world: &mut World) -> Option<Block> {
        if !self.is_complete() {
            return None;
        }
        let current = world.get_block_at(self.block_x, self.block_y)?;
        if current.kind != self.kind {
            return None;
        }
        world.remove_block_at(self.block_x, self.block_y)
    }
}
