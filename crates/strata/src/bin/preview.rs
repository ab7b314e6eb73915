//! # STRATA Preview
//!
//! Walks a camera through the world and prints every frame as ASCII.
//!
//! ```bash
//! preview --seed 18125.25 --to 300,-20 --frames 60
//! preview --config world.toml --width 1280 --height 720
//! RUST_LOG=strata_procedural=debug preview --frames 5
//! ```

use std::path::PathBuf;
use std::thread;

use anyhow::{bail, Context, Result};
use strata::{FrameLoop, FrameLoopConfig};
use strata_procedural::{WorldConfig, WorldSeed};
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Command-line options.
#[derive(Debug)]
struct Options {
    config: Option<PathBuf>,
    seed: Option<f64>,
    from: (f64, f64),
    to: (f64, f64),
    width: u32,
    height: u32,
    frames: u64,
    realtime: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            config: None,
            seed: None,
            from: (0.0, 0.0),
            to: (120.0, 0.0),
            width: 640,
            height: 360,
            frames: 40,
            realtime: false,
        }
    }
}

fn parse_point(text: &str) -> Result<(f64, f64)> {
    let (x, y) = text
        .split_once(',')
        .with_context(|| format!("expected X,Y but got {text:?}"))?;
    Ok((x.trim().parse()?, y.trim().parse()?))
}

fn parse_args() -> Result<Options> {
    let mut options = Options::default();
    let mut args = std::env::args().skip(1);

    while let Some(flag) = args.next() {
        let mut value = || args.next().with_context(|| format!("{flag} needs a value"));
        match flag.as_str() {
            "--config" => options.config = Some(PathBuf::from(value()?)),
            "--seed" => options.seed = Some(value()?.parse().context("--seed")?),
            "--from" => options.from = parse_point(&value()?)?,
            "--to" => options.to = parse_point(&value()?)?,
            "--width" => options.width = value()?.parse().context("--width")?,
            "--height" => options.height = value()?.parse().context("--height")?,
            "--frames" => options.frames = value()?.parse().context("--frames")?,
            "--realtime" => options.realtime = true,
            other => bail!("unknown argument {other:?}"),
        }
    }
    Ok(options)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::from_default_env()
                .add_directive("strata=info".parse()?)
                .add_directive("strata_procedural=info".parse()?),
        )
        .init();

    let options = parse_args()?;

    let mut world_config = match &options.config {
        Some(path) => WorldConfig::load_from(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => WorldConfig::default(),
    };
    if let Some(seed) = options.seed {
        world_config.seed = Some(WorldSeed::new(seed));
    }
    let seed = world_config.seed_or_generate();
    world_config.seed = Some(seed);
    info!("Preview seed: {seed}");

    let loop_config = FrameLoopConfig {
        screen_width: options.width,
        screen_height: options.height,
        ..FrameLoopConfig::default()
    };
    let budget = loop_config.frame_budget;
    let mut frames = FrameLoop::new(&world_config, loop_config)?;
    frames.camera_mut().set(options.from);
    frames.camera_mut().move_to(options.to);

    for _ in 0..options.frames {
        let (text, stats) = frames.frame()?;
        println!("frame {} | chunks {} | view {}us", stats.frame, stats.chunks_loaded, stats.view_us);
        print!("{text}");
        if options.realtime {
            thread::sleep(budget);
        }
    }

    let stats = frames.world().stats();
    info!(
        chunks = stats.chunks_loaded,
        generated = stats.store.chunks_generated,
        views = stats.view.views_assembled,
        reallocations = stats.view.reallocations,
        "preview finished"
    );
    Ok(())
}
