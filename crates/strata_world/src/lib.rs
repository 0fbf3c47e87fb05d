//! # STRATA World Engine
//!
//! Chunked, procedurally generated 2D world for a side-view block game.
//!
//! ## Design Principles
//!
//! 1. **Chunked**: The world is stored and generated in 12x12 block chunks
//! 2. **Streamable**: Chunks are generated around the player and evicted
//!    once they fall out of the render window
//! 3. **Explicit randomness**: Every random draw comes from a seedable
//!    generator owned by the world, never from global state
//! 4. **Never fails at runtime**: Declined actions return `bool` or `Option`
//!
//! ## Core Components
//!
//! - `World`: Facade owning chunks, the random stream and the world mode
//! - `TerrainGenerator`: Platforms, mountains, pits and trees
//! - `AltWorldGenerator`: Ground band with rock structures
//! - `ConnectivityPostProcessor`: Prunes orphaned blocks after generation
//! - `SpatialQuery`: AABB collision, ground/ceiling probes, portals
//! - `KinematicBody`: Axis-separated movement shared by all entities
//! - `MiningSession`: Tool-dependent mining timers
//!
//! ## Example
//!
//! ```rust,ignore
//! use strata_world::{CollisionQuery, KinematicBody, World, WorldConfig};
//!
//! let config = WorldConfig::with_seed(12345);
//! let mut world = World::new(config.clone());
//! world.update_rendered_chunks(0.0, 0.0, config.render_distance);
//!
//! let mut player = KinematicBody::new(0.0, -200.0, 64.0, 64.0, config.motion);
//! player.step(&world, 1.0 / 60.0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]
// Pixel and block math converts between i32 and f32 throughout.
#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]

pub mod alt_world;
pub mod block;
pub mod chunk;
pub mod chunk_store;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod mining;
pub mod physics;
pub mod seed;
pub mod spatial;
pub mod terrain;
pub mod tree;
pub mod world;

pub use alt_world::{AltWorldGenerator, StructureKind};
pub use block::{Block, BlockKind, BlockOrigin};
pub use chunk::{Chunk, ChunkCoord, ChunkState, LocalPos, CHUNK_SIZE};
pub use chunk_store::ChunkStore;
pub use config::{MotionConfig, WorldConfig};
pub use connectivity::ConnectivityPostProcessor;
pub use error::{WorldError, WorldResult};
pub use mining::{mine_duration, MineTime, MiningSession, Tool};
pub use physics::{KinematicBody, MotionState, StepOutcome};
pub use seed::{GenRng, WorldSeed};
pub use spatial::{CollisionQuery, Rect, SpatialQuery};
pub use terrain::TerrainGenerator;
pub use world::{WindowUpdate, World, WorldMode, WorldStats};
