//! # World
//!
//! The session object: one chunk store plus one viewport buffer.
//!
//! Owned and driven by a single control loop. Every mutating call takes
//! `&mut self` and runs to completion; there is no background work.

use tracing::info;

use crate::blocks::{BlockId, BlockTable, TerrainPalette};
use crate::camera::ViewRect;
use crate::chunk::{Chunk, ChunkCoord};
use crate::config::WorldConfig;
use crate::error::WorldResult;
use crate::noise::WorldSeed;
use crate::store::{ChunkStore, StoreStats};
use crate::terrain::{SimplexTerrain, TerrainOracle, TerrainParams};
use crate::view::{ViewStats, ViewWindow, ViewportWindowCache};

/// Combined counters of a world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    /// Chunk store counters.
    pub store: StoreStats,
    /// Viewport buffer counters.
    pub view: ViewStats,
    /// Chunks currently held.
    pub chunks_loaded: usize,
}

/// An infinite, lazily generated tile world.
///
/// # Example
///
/// ```rust
/// use strata_procedural::{BlockTable, World, WorldSeed};
///
/// let mut world = World::new(WorldSeed::new(42.0), BlockTable::standard())?;
/// world.set_block(-3, 7, 5);
/// assert_eq!(world.get_block(-3, 7), 5);
///
/// let window = world.view((-10, -10), (10, 10))?;
/// assert_eq!(window.width() % 16, 0);
/// # Ok::<(), strata_procedural::WorldError>(())
/// ```
pub struct World<O = SimplexTerrain> {
    store: ChunkStore<O>,
    view: ViewportWindowCache,
}

impl World<SimplexTerrain> {
    /// Creates a world on the default simplex terrain.
    ///
    /// # Errors
    ///
    /// Fails if the block table is invalid or lacks a terrain block.
    pub fn new(seed: WorldSeed, blocks: BlockTable) -> WorldResult<Self> {
        Self::with_params(seed, blocks, TerrainParams::default())
    }

    /// Creates a world on simplex terrain shaped by `params`.
    ///
    /// # Errors
    ///
    /// Fails if the block table is invalid or lacks a terrain block.
    pub fn with_params(seed: WorldSeed, blocks: BlockTable, params: TerrainParams) -> WorldResult<Self> {
        Self::with_oracle(seed, blocks, SimplexTerrain::new(seed, params))
    }

    /// Creates a world from a configuration, drawing a seed if none is set.
    ///
    /// # Errors
    ///
    /// Fails if the configuration does not validate or the block table is invalid.
    pub fn from_config(config: &WorldConfig) -> WorldResult<Self> {
        config.validate()?;
        Self::with_params(config.seed_or_generate(), config.block_table(), config.terrain.clone())
    }
}

impl<O: TerrainOracle> World<O> {
    /// Creates a world on an arbitrary height function.
    ///
    /// # Errors
    ///
    /// Fails if the block table is invalid or lacks a terrain block.
    pub fn with_oracle(seed: WorldSeed, blocks: BlockTable, oracle: O) -> WorldResult<Self> {
        let store = ChunkStore::new(seed, blocks, oracle)?;
        info!(seed = seed.value(), blocks = store.blocks().len(), "world created");
        Ok(Self {
            store,
            view: ViewportWindowCache::new(),
        })
    }

    /// Reads the block at `(x, y)`, generating its chunk if needed.
    pub fn get_block(&mut self, x: i32, y: i32) -> BlockId {
        self.store.get_block(x, y)
    }

    /// Reads the block at `(x, y)`, or `default` if its chunk does not exist.
    #[must_use]
    pub fn get_block_or(&self, x: i32, y: i32, default: BlockId) -> BlockId {
        self.store.get_block_or(x, y, default)
    }

    /// Writes `value` at `(x, y)`, generating its chunk first if needed.
    pub fn set_block(&mut self, x: i32, y: i32, value: BlockId) {
        self.store.set_block(x, y, value);
    }

    /// Generates the chunk at `coord`, replacing any existing one.
    pub fn create_chunk(&mut self, coord: ChunkCoord) -> &mut Chunk {
        self.store.create_chunk(coord)
    }

    /// Assembles the dense window covering `[start, end)`.
    ///
    /// # Errors
    ///
    /// Fails if `end` lies before `start` on either axis.
    pub fn view(&mut self, start: (i32, i32), end: (i32, i32)) -> WorldResult<ViewWindow<'_>> {
        self.view.view(&mut self.store, start, end)
    }

    /// Assembles the dense window for a camera rectangle.
    ///
    /// # Errors
    ///
    /// Fails if the rectangle is inverted.
    pub fn view_rect(&mut self, rect: ViewRect) -> WorldResult<ViewWindow<'_>> {
        self.view(rect.start, rect.end)
    }
}

impl<O> World<O> {
    /// Returns the world seed.
    #[must_use]
    pub fn seed(&self) -> WorldSeed {
        self.store.seed()
    }

    /// Returns the block table.
    #[must_use]
    pub fn blocks(&self) -> &BlockTable {
        self.store.blocks()
    }

    /// Returns the identifiers generation writes.
    #[must_use]
    pub fn palette(&self) -> TerrainPalette {
        self.store.palette()
    }

    /// Returns true if the chunk at `coord` has been generated.
    #[must_use]
    pub fn contains_chunk(&self, coord: ChunkCoord) -> bool {
        self.store.contains_chunk(coord)
    }

    /// Returns the chunk at `coord` if it has been generated.
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.store.chunk(coord)
    }

    /// Number of generated chunks.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.store.chunk_count()
    }

    /// Read access to the chunk store.
    #[must_use]
    pub fn store(&self) -> &ChunkStore<O> {
        &self.store
    }

    /// Chunk-grid shape of the cached view buffer.
    #[must_use]
    pub fn view_shape(&self) -> (usize, usize) {
        self.view.shape()
    }

    /// Returns the combined counters.
    #[must_use]
    pub fn stats(&self) -> WorldStats {
        WorldStats {
            store: self.store.stats(),
            view: self.view.stats(),
            chunks_loaded: self.store.chunk_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorldError;

    #[test]
    fn test_new_rejects_bad_table() {
        let result = World::new(WorldSeed::default(), BlockTable::from_names(["grass", "dirt"]));
        assert!(matches!(result, Err(WorldError::MissingBlock("stone"))));
    }

    #[test]
    fn test_stats_track_activity() {
        let mut world = World::new(WorldSeed::new(1.0), BlockTable::standard()).unwrap();
        world.set_block(0, 0, 3);
        world.view((0, 0), (16, 16)).unwrap();
        world.view((5, 5), (21, 21)).unwrap();
        world.view((0, 0), (40, 16)).unwrap();

        let stats = world.stats();
        assert_eq!(stats.store.blocks_written, 1);
        assert_eq!(stats.view.views_assembled, 3);
        assert_eq!(stats.view.reallocations, 2);
        assert_eq!(stats.chunks_loaded, world.chunk_count());
        assert_eq!(world.view_shape(), (4, 2));
    }

    fn summary<O>(world: &World<O>) -> (WorldSeed, usize, TerrainPalette, WorldStats) {
        (world.seed(), world.blocks().len(), world.palette(), world.stats())
    }

    #[test]
    fn test_accessors_need_no_oracle_bound() {
        let mut world = World::new(WorldSeed::new(4.5), BlockTable::standard()).unwrap();
        world.get_block(0, 0);

        let (seed, blocks, palette, stats) = summary(&world);
        assert_eq!(seed, WorldSeed::new(4.5));
        assert_eq!(blocks, BlockTable::standard().len());
        assert_eq!(palette, world.store().palette());
        assert_eq!(stats.chunks_loaded, 1);
        assert_eq!(world.store().seed(), seed);
    }

    #[test]
    fn test_from_config_validates() {
        let mut config = WorldConfig::default();
        config.camera.block_pixels = 0;
        assert!(matches!(
            World::from_config(&config),
            Err(WorldError::InvalidCamera { field: "block_pixels", .. })
        ));

        config.camera.block_pixels = 16;
        config.seed = Some(WorldSeed::new(f64::INFINITY));
        assert!(matches!(World::from_config(&config), Err(WorldError::NonFiniteSeed(_))));
    }

    #[test]
    fn test_view_rect_matches_view() {
        let mut world = World::new(WorldSeed::new(2.0), BlockTable::standard()).unwrap();
        let rect = ViewRect::new((-20, -9), (3, 12));
        let by_rect = world.view_rect(rect).unwrap().as_slice().to_vec();
        let by_pair = world.view((-20, -9), (3, 12)).unwrap().as_slice().to_vec();
        assert_eq!(by_rect, by_pair);
    }
}
