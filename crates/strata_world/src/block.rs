//! # Blocks
//!
//! The atomic unit of the world. Every block is a square of `block_size`
//! pixels; its kind decides whether it blocks movement and how long it takes
//! to mine. The kind table is fixed at compile time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::spatial::Rect;

/// Type of a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Soil and stone of the normal world.
    Ground,
    /// Tree trunk or branch.
    Tree,
    /// Tree canopy.
    TreeLeaf,
    /// Passable liquid, left behind in some pits.
    Water,
    /// Gateway to the alternate world.
    Portal,
    /// Alternate-world structures.
    Rock,
    /// Player-crafted plank.
    WoodPlank,
    /// Player-crafted board.
    PlankBoard,
}

impl BlockKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Ground,
        Self::Tree,
        Self::TreeLeaf,
        Self::Water,
        Self::Portal,
        Self::Rock,
        Self::WoodPlank,
        Self::PlankBoard,
    ];

    /// Returns true if the block stops entity movement.
    #[inline]
    #[must_use]
    pub const fn is_solid(self) -> bool {
        !matches!(self, Self::Water)
    }

    /// Returns true if the block can be mined at all.
    #[inline]
    #[must_use]
    pub const fn is_minable(self) -> bool {
        !matches!(self, Self::Water)
    }

    /// Returns true for trunks and leaves, which are exempt from the
    /// connectivity pass.
    #[inline]
    #[must_use]
    pub const fn is_tree_part(self) -> bool {
        matches!(self, Self::Tree | Self::TreeLeaf)
    }

    /// Mining time in seconds with bare hands, `None` if unminable.
    #[must_use]
    pub const fn base_mine_seconds(self) -> Option<f32> {
        match self {
            Self::Water => None,
            Self::TreeLeaf => Some(0.0),
            Self::Tree => Some(5.0),
            Self::Portal => Some(50.0),
            Self::Ground | Self::Rock | Self::WoodPlank | Self::PlankBoard => Some(3.0),
        }
    }

    /// Stable snake_case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ground => "ground",
            Self::Tree => "tree",
            Self::TreeLeaf => "tree_leaf",
            Self::Water => "water",
            Self::Portal => "portal",
            Self::Rock => "rock",
            Self::WoodPlank => "wood_plank",
            Self::PlankBoard => "plank_board",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlockKind {
    type Err = WorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| WorldError::UnknownBlockKind(s.to_owned()))
    }
}

/// How a block came to exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockOrigin {
    /// Stamped by a generator.
    Generated,
    /// Placed by an entity or a scripted setup.
    Placed,
}

/// A single block in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    /// World X of the top-left corner, in pixels.
    pub x: i32,
    /// World Y of the top-left corner, in pixels.
    pub y: i32,
    /// Block type.
    pub kind: BlockKind,
    /// Generation or placement.
    pub origin: BlockOrigin,
}

impl Block {
    /// Creates a new block.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, kind: BlockKind, origin: BlockOrigin) -> Self {
        Self { x, y, kind, origin }
    }

    /// Returns the block's rectangle for a given block size.
    #[inline]
    #[must_use]
    pub fn rect(&self, block_size: i32) -> Rect {
        let size = block_size as f32;
        Rect::new(self.x as f32, self.y as f32, size, size)
    }

    /// Returns the block's center point.
    #[inline]
    #[must_use]
    pub fn center(&self, block_size: i32) -> (f32, f32) {
        let half = block_size as f32 / 2.0;
        (self.x as f32 + half, self.y as f32 + half)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_water_is_passable() {
        for kind in BlockKind::ALL {
            assert_eq!(kind.is_solid(), kind != BlockKind::Water, "{kind}");
        }
    }

    #[test]
    fn test_base_mine_table() {
        assert_eq!(BlockKind::Ground.base_mine_seconds(), Some(3.0));
        assert_eq!(BlockKind::Tree.base_mine_seconds(), Some(5.0));
        assert_eq!(BlockKind::TreeLeaf.base_mine_seconds(), Some(0.0));
        assert_eq!(BlockKind::Portal.base_mine_seconds(), Some(50.0));
        assert_eq!(BlockKind::Water.base_mine_seconds(), None);
        assert!(!BlockKind::Water.is_minable());
    }

    #[test]
    fn test_name_round_trip() {
        for kind in BlockKind::ALL {
            assert_eq!(kind.name().parse::<BlockKind>().unwrap(), kind);
        }
        assert!(matches!(
            "lava".parse::<BlockKind>(),
            Err(WorldError::UnknownBlockKind(name)) if name == "lava"
        ));
    }

    #[test]
    fn test_block_rect_and_center() {
        let block = Block::new(-32, 64, BlockKind::Rock, BlockOrigin::Generated);
        let rect = block.rect(32);
        assert_eq!(rect.right(), 0.0);
        assert_eq!(rect.bottom(), 96.0);
        assert_eq!(block.center(32), (-16.0, 80.0));
    }
}
