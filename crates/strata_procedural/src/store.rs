//! # Chunk Store
//!
//! Sparse, unbounded map from chunk coordinate to chunk.
//!
//! Chunks are materialized on first touch and kept for the lifetime of the
//! store. Nothing is ever evicted; memory grows with the explored area.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::{debug, warn};

use crate::blocks::{BlockId, BlockTable, TerrainPalette};
use crate::chunk::{Chunk, ChunkCoord};
use crate::error::WorldResult;
use crate::noise::WorldSeed;
use crate::terrain::{SimplexTerrain, TerrainOracle};

/// Expected number of chunks touched early in a session.
const INITIAL_CHUNK_CAPACITY: usize = 256;

/// Generation counters for a store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Chunks generated into empty coordinates.
    pub chunks_generated: u64,
    /// Chunks regenerated over an existing chunk.
    pub chunks_regenerated: u64,
    /// Blocks written through `set_block`.
    pub blocks_written: u64,
}

/// Sparse chunk storage addressed in world block coordinates.
pub struct ChunkStore<O = SimplexTerrain> {
    /// Seed, fixed for the store's lifetime.
    seed: WorldSeed,
    /// Block table the palette was resolved from.
    blocks: BlockTable,
    /// Identifiers written by generation.
    palette: TerrainPalette,
    /// Height function.
    oracle: O,
    /// Materialized chunks.
    chunks: HashMap<ChunkCoord, Chunk>,
    /// Counters.
    stats: StoreStats,
}

impl<O: TerrainOracle> ChunkStore<O> {
    /// Creates an empty store.
    ///
    /// # Errors
    ///
    /// Fails if the block table is invalid or lacks a terrain block.
    pub fn new(seed: WorldSeed, blocks: BlockTable, oracle: O) -> WorldResult<Self> {
        let palette = TerrainPalette::resolve(&blocks)?;
        Ok(Self {
            seed,
            blocks,
            palette,
            oracle,
            chunks: HashMap::with_capacity(INITIAL_CHUNK_CAPACITY),
            stats: StoreStats::default(),
        })
    }

    /// Reads the block at `(x, y)`, generating its chunk if needed.
    pub fn get_block(&mut self, x: i32, y: i32) -> BlockId {
        let (coord, dx, dy) = ChunkCoord::split(x, y);
        self.ensure_chunk(coord).get(dx, dy)
    }

    /// Reads the block at `(x, y)` without generating anything.
    ///
    /// Returns `default` when the owning chunk does not exist yet.
    #[must_use]
    pub fn get_block_or(&self, x: i32, y: i32, default: BlockId) -> BlockId {
        let (coord, dx, dy) = ChunkCoord::split(x, y);
        self.chunks
            .get(&coord)
            .map_or(default, |chunk| chunk.get(dx, dy))
    }

    /// Writes `value` at `(x, y)`.
    ///
    /// The owning chunk is generated first if it does not exist, so the
    /// neighbours of the edited cell hold terrain rather than air.
    pub fn set_block(&mut self, x: i32, y: i32, value: BlockId) {
        let (coord, dx, dy) = ChunkCoord::split(x, y);
        self.ensure_chunk(coord).set(dx, dy, value);
        self.stats.blocks_written += 1;
    }

    /// Generates the chunk at `coord`, replacing any existing one.
    ///
    /// Edits made to a replaced chunk are lost. Use [`Self::ensure_chunk`]
    /// to create only when absent.
    pub fn create_chunk(&mut self, coord: ChunkCoord) -> &mut Chunk {
        let chunk = Chunk::generate(coord, self.seed, self.palette, &self.oracle);
        match self.chunks.entry(coord) {
            Entry::Occupied(mut slot) => {
                warn!(x = coord.x, y = coord.y, "regenerating existing chunk");
                self.stats.chunks_regenerated += 1;
                slot.insert(chunk);
                slot.into_mut()
            }
            Entry::Vacant(slot) => {
                debug!(x = coord.x, y = coord.y, "generated chunk");
                self.stats.chunks_generated += 1;
                slot.insert(chunk)
            }
        }
    }

    /// Returns the chunk at `coord`, generating it if absent.
    pub fn ensure_chunk(&mut self, coord: ChunkCoord) -> &mut Chunk {
        match self.chunks.entry(coord) {
            Entry::Occupied(slot) => slot.into_mut(),
            Entry::Vacant(slot) => {
                debug!(x = coord.x, y = coord.y, "generated chunk");
                self.stats.chunks_generated += 1;
                slot.insert(Chunk::generate(coord, self.seed, self.palette, &self.oracle))
            }
        }
    }
}

impl<O> ChunkStore<O> {
    /// Returns the world seed.
    #[inline]
    #[must_use]
    pub fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// Returns the block table.
    #[must_use]
    pub fn blocks(&self) -> &BlockTable {
        &self.blocks
    }

    /// Returns the identifiers generation writes.
    #[must_use]
    pub fn palette(&self) -> TerrainPalette {
        self.palette
    }

    /// Returns the height function.
    #[must_use]
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Returns the generation counters.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        self.stats
    }

    /// Returns true if the chunk at `coord` has been generated.
    #[inline]
    #[must_use]
    pub fn contains_chunk(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Returns the chunk at `coord` if it has been generated.
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Number of generated chunks.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Iterates over generated chunk coordinates in no particular order.
    pub fn chunk_coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }
}
