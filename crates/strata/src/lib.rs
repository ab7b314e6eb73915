//! # STRATA
//!
//! Consumer side of the procedural world: a camera-driven frame loop that
//! asks the world for one viewport window per frame and draws it.
//!
//! ## Modules
//!
//! - `frame_loop`: Camera, viewport assembly and rendering per frame
//! - `preview`: ASCII rendering of viewport windows

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod frame_loop;
pub mod preview;

// Re-export the world crate
pub use strata_procedural as procedural;

pub use frame_loop::{FrameLoop, FrameLoopConfig, FrameStats};
pub use preview::{render, AsciiPalette};
