//! # STRATA Procedural World
//!
//! An infinite 2D side-view tile world, generated lazily chunk by chunk.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed and oracle always produce the same world
//! 2. **Chunked**: The world is generated in 16x16 chunks on first touch
//! 3. **Unbounded**: Any `i32` block coordinate is addressable, negatives included
//! 4. **One buffer per frame**: Visible chunks are copied into a reusable dense buffer
//!
//! ## Core Components
//!
//! - `TerrainOracle`: Height function driving generation (`SimplexTerrain` by default)
//! - `Chunk`: Fixed-size block grid classified from the oracle
//! - `ChunkStore`: Sparse chunk map addressed in world blocks
//! - `ViewportWindowCache`: Dense, chunk-aligned buffer for the renderer
//! - `World`: Store plus viewport buffer, driven by one control loop
//! - `Camera`: Eased camera that yields the block rectangle to display
//!
//! ## Example
//!
//! ```rust
//! use strata_procedural::{Camera, World, WorldConfig};
//!
//! let config = WorldConfig::default();
//! let mut world = World::from_config(&config)?;
//! let mut camera = Camera::new(config.camera.clone());
//!
//! camera.move_to((40.0, -12.0));
//! camera.update();
//!
//! let window = world.view_rect(camera.visible_blocks(640, 360))?;
//! assert_eq!(window.height() % 16, 0);
//! # Ok::<(), strata_procedural::WorldError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod blocks;
pub mod camera;
pub mod chunk;
pub mod config;
pub mod error;
pub mod noise;
pub mod store;
pub mod terrain;
pub mod view;
pub mod world;

pub use blocks::{BlockId, BlockTable, TerrainPalette, AIR};
pub use camera::{Camera, CameraParams, ViewRect};
pub use chunk::{classify_block, Chunk, ChunkCoord, CHUNK_SIZE};
pub use config::{BlockSource, WorldConfig};
pub use error::{WorldError, WorldResult};
pub use noise::{SimplexNoise, WorldSeed};
pub use store::{ChunkStore, StoreStats};
pub use terrain::{SimplexTerrain, TerrainOracle, TerrainParams};
pub use view::{ViewStats, ViewWindow, ViewportWindowCache};
pub use world::{World, WorldStats};
