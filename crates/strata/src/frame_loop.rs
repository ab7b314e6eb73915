//! # Preview Frame Loop
//!
//! ```text
//! Frame N:
//! ┌──────────────────────────────────────────────┐
//! │ 1. CAMERA    ease toward destination         │
//! │ 2. VISIBLE   camera + screen -> ViewRect     │
//! │ 3. VIEW      world assembles dense buffer    │
//! │ 4. RENDER    buffer -> text                  │
//! └──────────────────────────────────────────────┘
//! ```

use std::time::{Duration, Instant};

use strata_procedural::{Camera, World, WorldConfig, WorldResult};
use tracing::{debug, warn};

use crate::preview::{render, AsciiPalette};

/// Target frame time for 60 FPS.
pub const TARGET_FRAME_TIME: Duration = Duration::from_micros(16_666);

/// Screen and pacing for the preview.
#[derive(Clone, Debug)]
pub struct FrameLoopConfig {
    /// Virtual screen width in pixels.
    pub screen_width: u32,
    /// Virtual screen height in pixels.
    pub screen_height: u32,
    /// Log frames slower than this.
    pub frame_budget: Duration,
}

impl Default for FrameLoopConfig {
    fn default() -> Self {
        Self {
            screen_width: 640,
            screen_height: 360,
            frame_budget: TARGET_FRAME_TIME,
        }
    }
}

/// Timing for one frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameStats {
    /// Frame number.
    pub frame: u64,
    /// Window assembly time in microseconds.
    pub view_us: u64,
    /// Text rendering time in microseconds.
    pub render_us: u64,
    /// Chunks held after the frame.
    pub chunks_loaded: usize,
}

/// Owns the world and camera and produces one rendered frame per call.
pub struct FrameLoop {
    world: World,
    camera: Camera,
    palette: AsciiPalette,
    config: FrameLoopConfig,
    frame_count: u64,
}

impl FrameLoop {
    /// Builds the world described by `world_config`.
    ///
    /// # Errors
    ///
    /// Fails if the configured block table is invalid.
    pub fn new(world_config: &WorldConfig, config: FrameLoopConfig) -> WorldResult<Self> {
        let world = World::from_config(world_config)?;
        let palette = AsciiPalette::new(world.palette());
        Ok(Self {
            world,
            camera: Camera::new(world_config.camera.clone()),
            palette,
            config,
            frame_count: 0,
        })
    }

    /// Mutable access to the camera.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Read access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Frames produced so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Advances the camera and renders one frame.
    ///
    /// # Errors
    ///
    /// Fails if the camera yields an inverted rectangle.
    pub fn frame(&mut self) -> WorldResult<(String, FrameStats)> {
        self.camera.update();
        let rect = self
            .camera
            .visible_blocks(self.config.screen_width, self.config.screen_height);

        let view_start = Instant::now();
        let window = self.world.view_rect(rect)?;
        let view_time = view_start.elapsed();

        let render_start = Instant::now();
        #[allow(clippy::cast_possible_truncation)]
        let marker = (self.camera.pos.0.floor() as i32, self.camera.pos.1.floor() as i32);
        let text = render(&window, rect, &self.palette, Some(marker));
        let render_time = render_start.elapsed();

        let stats = FrameStats {
            frame: self.frame_count,
            view_us: duration_us(view_time),
            render_us: duration_us(render_time),
            chunks_loaded: self.world.chunk_count(),
        };
        self.frame_count += 1;

        if view_time + render_time > self.config.frame_budget {
            warn!(
                frame = stats.frame,
                view_us = stats.view_us,
                render_us = stats.render_us,
                "frame exceeded budget"
            );
        } else {
            debug!(frame = stats.frame, chunks = stats.chunks_loaded, "frame");
        }
        Ok((text, stats))
    }
}

fn duration_us(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_procedural::WorldSeed;

    fn config() -> WorldConfig {
        WorldConfig {
            seed: Some(WorldSeed::DEVELOPMENT),
            ..WorldConfig::default()
        }
    }

    #[test]
    fn test_frame_dimensions() {
        let mut frames = FrameLoop::new(&config(), FrameLoopConfig::default()).unwrap();
        let (text, stats) = frames.frame().unwrap();

        // 640x360 at 32 px per block, padded by 2 on each side
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 15);
        assert!(lines.iter().all(|l| l.chars().count() == 24));
        assert_eq!(stats.frame, 0);
        assert!(stats.chunks_loaded > 0);
        assert!(text.contains('@'));
    }

    #[test]
    fn test_camera_pans_across_frames() {
        let mut frames = FrameLoop::new(&config(), FrameLoopConfig::default()).unwrap();
        frames.camera_mut().move_to((200.0, 0.0));

        let before = frames.world().chunk_count();
        for _ in 0..30 {
            frames.frame().unwrap();
        }
        assert_eq!(frames.frame_count(), 30);
        assert!(frames.world().chunk_count() > before);
        assert_eq!(frames.world().stats().view.reallocations, 1);
    }
}
