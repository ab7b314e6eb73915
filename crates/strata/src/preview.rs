//! # ASCII Preview
//!
//! Renders a viewport window as text, one character per block.
//!
//! Rows are emitted top-down (highest `y` first) so the output reads like a
//! side view. Only the requested rectangle is drawn: the dense buffer's
//! padding is skipped using the window's alignment offset.

use strata_procedural::{BlockId, TerrainPalette, ViewRect, ViewWindow, AIR};

/// Characters used for each kind of block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AsciiPalette {
    /// Identifiers the terrain writes.
    pub terrain: TerrainPalette,
    /// Grass.
    pub grass: char,
    /// Dirt.
    pub dirt: char,
    /// Stone.
    pub stone: char,
    /// Any negative (background) variant.
    pub background: char,
    /// Air.
    pub air: char,
    /// Any other placed block.
    pub other: char,
    /// Camera marker.
    pub camera: char,
}

impl AsciiPalette {
    /// Default glyphs for `terrain`.
    #[must_use]
    pub fn new(terrain: TerrainPalette) -> Self {
        Self {
            terrain,
            grass: '"',
            dirt: '%',
            stone: '#',
            background: ':',
            air: ' ',
            other: '?',
            camera: '@',
        }
    }

    /// Glyph for one block.
    #[must_use]
    pub fn glyph(&self, block: BlockId) -> char {
        match block {
            AIR => self.air,
            b if b < AIR => self.background,
            b if b == self.terrain.grass => self.grass,
            b if b == self.terrain.dirt => self.dirt,
            b if b == self.terrain.stone => self.stone,
            _ => self.other,
        }
    }
}

/// Renders `rect` out of `window`.
///
/// `marker` is a world block to overdraw with the camera glyph. `rect` must
/// be the rectangle `window` was assembled for.
#[must_use]
pub fn render(
    window: &ViewWindow<'_>,
    rect: ViewRect,
    palette: &AsciiPalette,
    marker: Option<(i32, i32)>,
) -> String {
    let (ax, ay) = window.alignment_offset();
    let (ax, ay) = (
        usize::try_from(ax).unwrap_or(0),
        usize::try_from(ay).unwrap_or(0),
    );
    let width = usize::try_from(rect.width()).unwrap_or(0);
    let height = usize::try_from(rect.height()).unwrap_or(0);

    // Top row first
    let mut rows: Vec<Vec<char>> = (0..height)
        .rev()
        .map(|by| {
            (0..width)
                .map(|bx| window.get(ax + bx, ay + by).map_or(palette.other, |b| palette.glyph(b)))
                .collect()
        })
        .collect();

    if let Some((mx, my)) = marker.filter(|&(x, y)| rect.contains(x, y)) {
        let col = usize::try_from(mx - rect.start.0).unwrap_or(0);
        let row = usize::try_from(rect.end.1 - 1 - my).unwrap_or(0);
        rows[row][col] = palette.camera;
    }

    let mut out = String::with_capacity((width + 1) * height);
    for row in rows {
        out.extend(row);
        out.push('\n');
    }
    out
}
