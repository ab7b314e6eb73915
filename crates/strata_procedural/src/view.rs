//! # Viewport Window
//!
//! Assembles the chunks covering a world rectangle into one dense buffer,
//! once per frame, for upload by the renderer.
//!
//! ## Buffer shape
//!
//! The buffer always spans whole chunks. Its low corner is the origin of the
//! chunk containing `start`; it extends `ceil((end - start) / 16) + 1` chunks
//! along each axis, so it covers `[start, end)` however `start` is aligned.
//! Consumers must shift by [`ViewWindow::alignment_offset`] to line the buffer
//! up with the screen.
//!
//! ## Allocation reuse
//!
//! The buffer is keyed by chunk-grid shape only. Moving the camera without
//! changing the shape reuses the allocation; every cell is rewritten on every
//! call, so reuse never exposes stale blocks.

use tracing::{debug, trace};

use crate::blocks::{BlockId, AIR};
use crate::chunk::{ChunkCoord, CHUNK_SIZE, CHUNK_SIZE_I32};
use crate::error::{WorldError, WorldResult};
use crate::store::ChunkStore;
use crate::terrain::TerrainOracle;

/// Dense-buffer counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewStats {
    /// Windows assembled.
    pub views_assembled: u64,
    /// Times the buffer had to be reallocated.
    pub reallocations: u64,
}

/// Reusable dense buffer for viewport windows.
#[derive(Debug, Default)]
pub struct ViewportWindowCache {
    /// Cells, column-major: index `bx * height + by`.
    cells: Vec<BlockId>,
    /// Chunk-grid shape the buffer is sized for.
    shape: (usize, usize),
    /// Counters.
    stats: ViewStats,
}

impl ViewportWindowCache {
    /// Creates an empty cache. The first view allocates.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Chunk-grid shape of the current buffer (`(0, 0)` before the first view).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Returns the buffer counters.
    #[must_use]
    pub fn stats(&self) -> ViewStats {
        self.stats
    }

    /// Assembles the window covering `[start, end)` from `store`.
    ///
    /// Missing chunks in the covered range are generated.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvertedViewport`] if `end` lies before `start`
    /// on either axis.
    pub fn view<O: TerrainOracle>(
        &mut self,
        store: &mut ChunkStore<O>,
        start: (i32, i32),
        end: (i32, i32),
    ) -> WorldResult<ViewWindow<'_>> {
        if end.0 < start.0 || end.1 < start.1 {
            return Err(WorldError::InvertedViewport {
                start_x: start.0,
                start_y: start.1,
                end_x: end.0,
                end_y: end.1,
            });
        }

        let shape = (chunk_span(start.0, end.0), chunk_span(start.1, end.1));
        let chunk_start = ChunkCoord::from_block_pos(start.0, start.1);

        if shape != self.shape {
            debug!(
                from_w = self.shape.0,
                from_h = self.shape.1,
                to_w = shape.0,
                to_h = shape.1,
                "reallocating view buffer"
            );
            self.cells = vec![AIR; shape.0 * CHUNK_SIZE * shape.1 * CHUNK_SIZE];
            self.shape = shape;
            self.stats.reallocations += 1;
        }

        let height = shape.1 * CHUNK_SIZE;
        for (dcx, chunk_x) in (0..shape.0).zip(chunk_start.x..) {
            for (dcy, chunk_y) in (0..shape.1).zip(chunk_start.y..) {
                let chunk = store.ensure_chunk(ChunkCoord::new(chunk_x, chunk_y));
                for (dx, column) in chunk.cells().iter().enumerate() {
                    let at = (dcx * CHUNK_SIZE + dx) * height + dcy * CHUNK_SIZE;
                    self.cells[at..at + CHUNK_SIZE].copy_from_slice(column);
                }
            }
        }

        self.stats.views_assembled += 1;
        trace!(
            x = chunk_start.x,
            y = chunk_start.y,
            w = shape.0,
            h = shape.1,
            "assembled view"
        );

        Ok(ViewWindow {
            cells: &self.cells,
            shape,
            chunk_origin: chunk_start,
            start,
        })
    }
}

/// Number of chunks needed along one axis: `ceil((end - start) / N) + 1`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn chunk_span(start: i32, end: i32) -> usize {
    let span = i64::from(end) - i64::from(start);
    let size = i64::from(CHUNK_SIZE_I32);
    ((span + size - 1).div_euclid(size) + 1) as usize
}

/// A dense, chunk-aligned window into the world.
///
/// Cells are stored column-major (`bx * height + by`), matching the
/// `[dx][dy]` layout of chunks. `by` grows upward.
#[derive(Clone, Copy, Debug)]
pub struct ViewWindow<'a> {
    cells: &'a [BlockId],
    shape: (usize, usize),
    chunk_origin: ChunkCoord,
    start: (i32, i32),
}

impl<'a> ViewWindow<'a> {
    /// Width in blocks.
    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.shape.0 * CHUNK_SIZE
    }

    /// Height in blocks. Also the column stride.
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.shape.1 * CHUNK_SIZE
    }

    /// Shape in chunks.
    #[must_use]
    pub fn chunk_shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Coordinate of the chunk at the buffer's low corner.
    #[must_use]
    pub fn chunk_origin(&self) -> ChunkCoord {
        self.chunk_origin
    }

    /// World block coordinate of buffer cell `(0, 0)`.
    #[must_use]
    pub fn origin(&self) -> (i32, i32) {
        (self.chunk_origin.world_x(), self.chunk_origin.world_y())
    }

    /// The `start` corner the window was requested for.
    #[must_use]
    pub fn requested_start(&self) -> (i32, i32) {
        self.start
    }

    /// Offset from the buffer origin to the requested `start`, in blocks.
    ///
    /// Both components lie in `[0, 16)`.
    #[must_use]
    pub fn alignment_offset(&self) -> (i32, i32) {
        let (ox, oy) = self.origin();
        (self.start.0 - ox, self.start.1 - oy)
    }

    /// Block at buffer cell `(bx, by)`.
    #[inline]
    #[must_use]
    pub fn get(&self, bx: usize, by: usize) -> Option<BlockId> {
        if bx < self.width() && by < self.height() {
            Some(self.cells[bx * self.height() + by])
        } else {
            None
        }
    }

    /// Block at world `(x, y)` if the window covers it.
    #[must_use]
    pub fn get_world(&self, x: i32, y: i32) -> Option<BlockId> {
        let (ox, oy) = self.origin();
        let bx = usize::try_from(i64::from(x) - i64::from(ox)).ok()?;
        let by = usize::try_from(i64::from(y) - i64::from(oy)).ok()?;
        self.get(bx, by)
    }

    /// Column `bx`, bottom to top.
    #[must_use]
    pub fn column(&self, bx: usize) -> Option<&'a [BlockId]> {
        let height = self.height();
        let at = bx.checked_mul(height)?;
        self.cells.get(at..at.checked_add(height)?)
    }

    /// All cells, column-major.
    #[must_use]
    pub fn as_slice(&self) -> &'a [BlockId] {
        self.cells
    }

    /// All cells as raw bytes, for texture upload.
    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.cells)
    }

    /// Transposed copy with one row per `by`, bottom row first.
    #[must_use]
    pub fn to_row_major(&self) -> Vec<BlockId> {
        let (width, height) = (self.width(), self.height());
        let mut rows = Vec::with_capacity(width * height);
        for by in 0..height {
            rows.extend((0..width).map(|bx| self.cells[bx * height + by]));
        }
        rows
    }
}
