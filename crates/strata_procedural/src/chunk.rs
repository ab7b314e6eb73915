//! # Chunk System
//!
//! The world is split into fixed-size square chunks, the unit of lazy
//! generation. A chunk is generated once from the terrain oracle the first
//! time any block inside it is touched.
//!
//! ## Coordinates
//!
//! World block `(x, y)` lives in chunk `(floor(x / 16), floor(y / 16))` at
//! local offset `(x mod 16, y mod 16)`, with the modulo always in `[0, 16)`.
//! Negative blocks therefore belong to negative chunks: block `-1` is the last
//! cell of chunk `-1`, not a cell of chunk `0`.

use crate::blocks::{BlockId, TerrainPalette, AIR};
use crate::noise::WorldSeed;
use crate::terrain::TerrainOracle;

/// Chunk width/height in blocks.
pub const CHUNK_SIZE: usize = 16;

/// `CHUNK_SIZE` as a signed block distance.
#[allow(clippy::cast_possible_wrap)]
pub const CHUNK_SIZE_I32: i32 = CHUNK_SIZE as i32;

/// Height below which a non-solid cell is open air rather than a cave wall.
pub const CAVE_WALL_THRESHOLD: f64 = -0.3;

/// Block grid of one chunk, indexed as `[dx][dy]`.
pub type ChunkGrid = [[BlockId; CHUNK_SIZE]; CHUNK_SIZE];

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not blocks).
    pub x: i32,
    /// Y coordinate (in chunks, not blocks).
    pub y: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Converts world block coordinates to the owning chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn from_block_pos(block_x: i32, block_y: i32) -> Self {
        Self {
            x: block_x.div_euclid(CHUNK_SIZE_I32),
            y: block_y.div_euclid(CHUNK_SIZE_I32),
        }
    }

    /// Returns the offset of a world block inside its owning chunk.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn local_offset(block_x: i32, block_y: i32) -> (usize, usize) {
        (
            block_x.rem_euclid(CHUNK_SIZE_I32) as usize,
            block_y.rem_euclid(CHUNK_SIZE_I32) as usize,
        )
    }

    /// Splits world block coordinates into chunk coordinate and local offset.
    #[inline]
    #[must_use]
    pub const fn split(block_x: i32, block_y: i32) -> (Self, usize, usize) {
        let (dx, dy) = Self::local_offset(block_x, block_y);
        (Self::from_block_pos(block_x, block_y), dx, dy)
    }

    /// Returns the world X coordinate of the chunk's origin (low corner).
    ///
    /// Saturates for the padding chunk past `i32::MAX`.
    #[inline]
    #[must_use]
    pub const fn world_x(self) -> i32 {
        self.x.saturating_mul(CHUNK_SIZE_I32)
    }

    /// Returns the world Y coordinate of the chunk's origin.
    #[inline]
    #[must_use]
    pub const fn world_y(self) -> i32 {
        self.y.saturating_mul(CHUNK_SIZE_I32)
    }
}

/// Allocates a fresh all-air grid.
///
/// Every chunk owns its own allocation; grids are never shared.
#[must_use]
pub fn zeroed_grid() -> Box<ChunkGrid> {
    Box::new([[AIR; CHUNK_SIZE]; CHUNK_SIZE])
}

/// Classifies the block at world `(x, y)`.
///
/// This is the generation rule every freshly generated cell satisfies:
///
/// | height here | height 1 above | height 3 above | block           |
/// |-------------|----------------|----------------|-----------------|
/// | `> 0`       | `<= 0`         |                | grass           |
/// | `> 0`       |                | `<= 0`         | dirt            |
/// | `> 0`       |                |                | stone           |
/// | `> -0.3`    |                |                | background stone|
/// | otherwise   |                |                | air             |
#[must_use]
pub fn classify_block<O>(
    x: i32,
    y: i32,
    seed: WorldSeed,
    palette: TerrainPalette,
    oracle: &O,
) -> BlockId
where
    O: TerrainOracle + ?Sized,
{
    let z = oracle.height(x, y, seed);
    if z > 0.0 {
        if oracle.height(x, y.saturating_add(1), seed) <= 0.0 {
            palette.grass
        } else if oracle.height(x, y.saturating_add(3), seed) <= 0.0 {
            palette.dirt
        } else {
            palette.stone
        }
    } else if z > CAVE_WALL_THRESHOLD {
        palette.background_stone()
    } else {
        AIR
    }
}

/// A chunk of world data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    /// Chunk position in the world.
    pub coord: ChunkCoord,
    /// Block data (indexed as [dx][dy]).
    cells: Box<ChunkGrid>,
}

impl Chunk {
    /// Creates a new all-air chunk at the given coordinates.
    #[must_use]
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            cells: zeroed_grid(),
        }
    }

    /// Creates and generates the chunk at `coord`.
    #[must_use]
    pub fn generate<O>(coord: ChunkCoord, seed: WorldSeed, palette: TerrainPalette, oracle: &O) -> Self
    where
        O: TerrainOracle + ?Sized,
    {
        let mut chunk = Self::new(coord);
        chunk.fill(seed, palette, oracle);
        chunk
    }

    /// Regenerates every cell from the oracle, discarding edits.
    pub fn fill<O>(&mut self, seed: WorldSeed, palette: TerrainPalette, oracle: &O)
    where
        O: TerrainOracle + ?Sized,
    {
        let world_x = self.coord.world_x();
        let world_y = self.coord.world_y();

        for (dx, column) in (0..).zip(self.cells.iter_mut()) {
            for (dy, cell) in (0..).zip(column.iter_mut()) {
                *cell = classify_block(
                    world_x.saturating_add(dx),
                    world_y.saturating_add(dy),
                    seed,
                    palette,
                    oracle,
                );
            }
        }
    }

    /// Gets a block at local coordinates.
    ///
    /// Out-of-range offsets read as air.
    #[inline]
    #[must_use]
    pub fn get(&self, dx: usize, dy: usize) -> BlockId {
        if dx < CHUNK_SIZE && dy < CHUNK_SIZE {
            self.cells[dx][dy]
        } else {
            AIR
        }
    }

    /// Sets a block at local coordinates.
    ///
    /// Out-of-range offsets are ignored.
    #[inline]
    pub fn set(&mut self, dx: usize, dy: usize, block: BlockId) {
        if dx < CHUNK_SIZE && dy < CHUNK_SIZE {
            self.cells[dx][dy] = block;
        }
    }

    /// Returns the whole grid.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &ChunkGrid {
        &self.cells
    }

    /// Returns the column at local X `dx` (bottom to top).
    #[inline]
    #[must_use]
    pub fn column(&self, dx: usize) -> &[BlockId; CHUNK_SIZE] {
        &self.cells[dx]
    }

    /// Counts cells that are not air.
    #[must_use]
    pub fn filled_cells(&self) -> usize {
        self.cells.iter().flatten().filter(|&&id| id != AIR).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::BlockTable;
    use crate::terrain::SimplexTerrain;

    fn palette() -> TerrainPalette {
        TerrainPalette::resolve(&BlockTable::standard()).unwrap()
    }

    /// Flat world: ground below y = 0, a cave band between y = -20 and -10.
    fn layered(_x: i32, y: i32, _seed: WorldSeed) -> f64 {
        if (-20..-10).contains(&y) {
            if y == -15 { -0.1 } else { -1.0 }
        } else {
            -f64::from(y)
        }
    }

    #[test]
    fn test_chunk_coord_from_block() {
        assert_eq!(ChunkCoord::from_block_pos(0, 0), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_block_pos(15, 15), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_block_pos(16, 16), ChunkCoord::new(1, 1));
        assert_eq!(ChunkCoord::from_block_pos(-1, -1), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::from_block_pos(-16, -16), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::from_block_pos(-17, -17), ChunkCoord::new(-2, -2));
    }

    #[test]
    fn test_local_offset_is_non_negative() {
        assert_eq!(ChunkCoord::local_offset(-1, -1), (15, 15));
        assert_eq!(ChunkCoord::local_offset(-16, 31), (0, 15));
        assert_eq!(ChunkCoord::split(-17, 5), (ChunkCoord::new(-2, 0), 15, 5));
        assert_eq!(ChunkCoord::split(i32::MIN, i32::MAX), (ChunkCoord::new(i32::MIN / 16, i32::MAX / 16), 0, 15));
    }

    #[test]
    fn test_classification_layers() {
        let p = palette();
        let seed = WorldSeed::default();

        assert_eq!(classify_block(0, -1, seed, p, &layered), p.grass);
        assert_eq!(classify_block(0, -2, seed, p, &layered), p.dirt);
        assert_eq!(classify_block(0, -3, seed, p, &layered), p.dirt);
        assert_eq!(classify_block(0, -4, seed, p, &layered), p.stone);
        assert_eq!(classify_block(0, 0, seed, p, &layered), p.background_stone());
        assert_eq!(classify_block(0, 1, seed, p, &layered), AIR);
        assert_eq!(classify_block(0, -15, seed, p, &layered), -p.stone);
        assert_eq!(classify_block(0, -12, seed, p, &layered), AIR);
        // Ground directly beneath the cave band sees open space above it
        assert_eq!(classify_block(0, -21, seed, p, &layered), p.grass);
    }

    #[test]
    fn test_generated_cells_follow_rule() {
        let p = palette();
        let seed = WorldSeed::new(3.5);
        let coord = ChunkCoord::new(-1, -2);
        let chunk = Chunk::generate(coord, seed, p, &layered);

        for dx in 0..CHUNK_SIZE {
            for dy in 0..CHUNK_SIZE {
                let x = coord.world_x() + i32::try_from(dx).unwrap();
                let y = coord.world_y() + i32::try_from(dy).unwrap();
                assert_eq!(chunk.get(dx, dy), classify_block(x, y, seed, p, &layered));
            }
        }
    }

    #[test]
    fn test_chunk_generation_determinism() {
        let seed = WorldSeed::new(42.0);
        let terrain = SimplexTerrain::with_seed(seed);
        let coord = ChunkCoord::new(5, -1);

        let chunk1 = Chunk::generate(coord, seed, palette(), &terrain);
        let chunk2 = Chunk::generate(coord, seed, palette(), &terrain);
        assert_eq!(chunk1, chunk2);
    }

    #[test]
    fn test_chunks_do_not_share_storage() {
        let mut a = Chunk::new(ChunkCoord::new(0, 0));
        let b = Chunk::new(ChunkCoord::new(1, 0));
        a.set(3, 4, 9);

        assert_eq!(a.get(3, 4), 9);
        assert_eq!(b.get(3, 4), AIR);
        assert_eq!(b.filled_cells(), 0);
    }

    #[test]
    fn test_edit_and_refill() {
        let p = palette();
        let seed = WorldSeed::default();
        let mut chunk = Chunk::generate(ChunkCoord::new(0, -1), seed, p, &layered);
        let original = chunk.get(2, 15);

        chunk.set(2, 15, 77);
        chunk.set(CHUNK_SIZE, 0, 77);
        assert_eq!(chunk.get(2, 15), 77);
        assert_eq!(chunk.get(CHUNK_SIZE, 0), AIR);

        chunk.fill(seed, p, &layered);
        assert_eq!(chunk.get(2, 15), original);
    }
}
