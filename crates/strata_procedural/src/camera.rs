//! # Camera
//!
//! Turns a continuous camera position and a screen size into the block
//! rectangle the world must assemble each frame.

use serde::{Deserialize, Serialize};

use crate::error::{WorldError, WorldResult};
use crate::view::ViewWindow;

/// Camera tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraParams {
    /// Screen pixels per texture pixel.
    pub resolution: u32,
    /// Texture pixels per block edge.
    pub block_pixels: u32,
    /// Extra blocks added on every side of the visible rectangle.
    pub padding: i32,
    /// Per-frame speed below which the camera stops.
    pub threshold: f64,
    /// Fraction of the remaining distance covered per frame is `1 / smoothing`.
    pub smoothing: f64,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            resolution: 2,
            block_pixels: 16,
            padding: 2,
            threshold: 0.1,
            smoothing: 10.0,
        }
    }
}

impl CameraParams {
    /// Screen pixels covered by one block edge.
    ///
    /// Never less than one, so unchecked params cannot divide by zero.
    #[must_use]
    pub fn pixels_per_block(&self) -> f64 {
        self.resolution
            .checked_mul(self.block_pixels)
            .map_or(f64::from(u32::MAX), f64::from)
            .max(1.0)
    }

    /// Checks that the tuning describes a usable camera.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidCamera`] naming the first bad field.
    pub fn validate(&self) -> WorldResult<()> {
        let invalid = |field: &'static str, reason: &'static str| {
            Err(WorldError::InvalidCamera { field, reason })
        };
        if self.resolution == 0 {
            return invalid("resolution", "must be at least 1");
        }
        if self.block_pixels == 0 {
            return invalid("block_pixels", "must be at least 1");
        }
        if self.resolution.checked_mul(self.block_pixels).is_none() {
            return invalid("resolution", "resolution * block_pixels overflows");
        }
        if !(self.smoothing.is_finite() && self.smoothing > 0.0) {
            return invalid("smoothing", "must be a positive number");
        }
        if !(self.threshold.is_finite() && self.threshold >= 0.0) {
            return invalid("threshold", "must be a non-negative number");
        }
        Ok(())
    }
}

/// Block rectangle `[start, end)` requested from the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ViewRect {
    /// Low corner in blocks.
    pub start: (i32, i32),
    /// High corner in blocks.
    pub end: (i32, i32),
}

impl ViewRect {
    /// Creates a rectangle.
    #[must_use]
    pub const fn new(start: (i32, i32), end: (i32, i32)) -> Self {
        Self { start, end }
    }

    /// Width in blocks.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.end.0.saturating_sub(self.start.0)
    }

    /// Height in blocks.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.end.1.saturating_sub(self.start.1)
    }

    /// Returns true if `(x, y)` lies inside the rectangle.
    #[must_use]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.start.0 && x < self.end.0 && y >= self.start.1 && y < self.end.1
    }
}

/// Smoothly following 2D camera in world block units.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// Current position (screen centre) in blocks.
    pub pos: (f64, f64),
    /// Last applied per-frame movement.
    pub vel: (f64, f64),
    /// Position the camera is easing toward.
    pub dest: (f64, f64),
    params: CameraParams,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraParams::default())
    }
}

impl Camera {
    /// Creates a camera at the origin.
    #[must_use]
    pub fn new(params: CameraParams) -> Self {
        Self {
            pos: (0.0, 0.0),
            vel: (0.0, 0.0),
            dest: (0.0, 0.0),
            params,
        }
    }

    /// Returns the tuning.
    #[must_use]
    pub fn params(&self) -> &CameraParams {
        &self.params
    }

    /// Jumps to `pos` and stops.
    pub fn set(&mut self, pos: (f64, f64)) {
        self.pos = pos;
        self.vel = (0.0, 0.0);
        self.dest = pos;
    }

    /// Starts easing toward `pos`.
    pub fn move_to(&mut self, pos: (f64, f64)) {
        self.dest = pos;
    }

    /// Advances one frame toward the destination.
    pub fn update(&mut self) {
        let step = |from: f64, to: f64| {
            let raw = round_to_thousandths((to - from) / self.params.smoothing);
            (raw.abs() - self.params.threshold).max(0.0).copysign(raw)
        };
        self.vel = (step(self.pos.0, self.dest.0), step(self.pos.1, self.dest.1));
        self.pos.0 += self.vel.0;
        self.pos.1 += self.vel.1;
    }

    /// Block rectangle visible on a `width` × `height` pixel screen, padded.
    ///
    /// The centre is the truncated camera position; half-extents round
    /// outward on the high side only.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn visible_blocks(&self, width: u32, height: u32) -> ViewRect {
        let ppb = self.params.pixels_per_block();
        let pad = self.params.padding;
        let center = (self.pos.0 as i32, self.pos.1 as i32);
        let half_w = f64::from(width) / 2.0 / ppb;
        let half_h = f64::from(height) / 2.0 / ppb;

        // Clamped at the edges of the block grid
        ViewRect {
            start: (
                center.0.saturating_sub(half_w.floor() as i32).saturating_sub(pad),
                center.1.saturating_sub(half_h.floor() as i32).saturating_sub(pad),
            ),
            end: (
                center.0.saturating_add(half_w.ceil() as i32).saturating_add(pad),
                center.1.saturating_add(half_h.ceil() as i32).saturating_add(pad),
            ),
        }
    }

    /// Maps a world point to pixels relative to the screen centre.
    #[must_use]
    pub fn world_to_screen(&self, world: (f64, f64)) -> (f64, f64) {
        let ppb = self.params.pixels_per_block();
        ((world.0 - self.pos.0) * ppb, (world.1 - self.pos.1) * ppb)
    }

    /// Maps pixels relative to the screen centre to a world point.
    #[must_use]
    pub fn screen_to_world(&self, screen: (f64, f64)) -> (f64, f64) {
        let ppb = self.params.pixels_per_block();
        (screen.0 / ppb + self.pos.0, screen.1 / ppb + self.pos.1)
    }

    /// Camera position in buffer cells of `window`.
    ///
    /// This is where the screen centre falls inside the dense buffer.
    #[must_use]
    pub fn position_in(&self, window: &ViewWindow<'_>) -> (f64, f64) {
        let (ox, oy) = window.origin();
        (self.pos.0 - f64::from(ox), self.pos.1 - f64::from(oy))
    }
}

fn round_to_thousandths(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_blocks_at_origin() {
        let camera = Camera::default();
        // 32 px per block: 640 px = 20 blocks, 360 px = 11.25 blocks
        let rect = camera.visible_blocks(640, 360);

        assert_eq!(rect.start, (-12, -7));
        assert_eq!(rect.end, (12, 8));
        assert_eq!(rect.width(), 24);
        assert!(rect.contains(0, 0));
        assert!(!rect.contains(12, 0));
    }

    #[test]
    fn test_visible_blocks_truncates_toward_zero() {
        let mut camera = Camera::default();
        camera.set((-3.7, 5.9));
        let rect = camera.visible_blocks(64, 64);

        // centre (-3, 5), one block each way plus two padding
        assert_eq!(rect, ViewRect::new((-6, 2), (0, 8)));
    }

    #[test]
    fn test_visible_blocks_clamps_at_grid_edge() {
        let mut camera = Camera::default();
        camera.set((2_147_483_640.0, -2_147_483_645.0));
        let rect = camera.visible_blocks(640, 360);

        assert_eq!(rect.start, (2_147_483_640 - 12, i32::MIN));
        assert_eq!(rect.end, (i32::MAX, -2_147_483_645 + 8));
        assert_eq!((rect.width(), rect.height()), (19, 11));
    }

    #[test]
    fn test_zero_pixel_sizes_stay_finite() {
        let params = CameraParams {
            resolution: 0,
            ..CameraParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(WorldError::InvalidCamera { field: "resolution", .. })
        ));

        // Unvalidated params still give a bounded rectangle
        let camera = Camera::new(params);
        assert_eq!(camera.params().pixels_per_block(), 1.0);
        let rect = camera.visible_blocks(64, 32);
        assert_eq!(rect, ViewRect::new((-34, -18), (34, 18)));
    }

    #[test]
    fn test_validate_rejects_bad_tuning() {
        assert!(CameraParams::default().validate().is_ok());

        let cases = [
            (CameraParams { block_pixels: 0, ..CameraParams::default() }, "block_pixels"),
            (CameraParams { resolution: u32::MAX, ..CameraParams::default() }, "resolution"),
            (CameraParams { smoothing: 0.0, ..CameraParams::default() }, "smoothing"),
            (CameraParams { threshold: f64::NAN, ..CameraParams::default() }, "threshold"),
        ];
        for (params, expected) in cases {
            match params.validate() {
                Err(WorldError::InvalidCamera { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected {expected} to be rejected, got {other:?}"),
            }
        }
        assert_eq!(
            CameraParams { resolution: u32::MAX, ..CameraParams::default() }.pixels_per_block(),
            f64::from(u32::MAX)
        );
    }

    #[test]
    fn test_update_eases_and_stops() {
        let mut camera = Camera::default();
        camera.move_to((10.0, 0.0));
        camera.update();

        assert!((camera.vel.0 - 0.9).abs() < 1e-9);
        assert_eq!(camera.vel.1, 0.0);

        for _ in 0..200 {
            camera.update();
        }
        assert_eq!(camera.vel, (0.0, 0.0));
        assert!((10.0 - camera.pos.0) < 1.1, "camera stalled at {}", camera.pos.0);
    }

    #[test]
    fn test_update_moves_backwards() {
        let mut camera = Camera::default();
        camera.set((5.0, 5.0));
        camera.move_to((-5.0, 5.0));
        camera.update();
        assert!((camera.vel.0 + 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_screen_mapping_round_trips() {
        let mut camera = Camera::default();
        camera.set((12.5, -4.0));
        let world = (13.0, -2.5);
        let screen = camera.world_to_screen(world);

        assert_eq!(screen, (16.0, 48.0));
        assert_eq!(camera.screen_to_world(screen), world);
    }
}
