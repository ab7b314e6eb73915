//! # Terrain Oracle
//!
//! The height function that drives block generation.
//!
//! A height is a real number per world block: positive values are solid
//! ground, values in `(-0.3, 0]` are cave walls, anything lower is open air.
//! The world is a side view, so `y` grows upward.
//!
//! Any pure function of `(x, y, seed)` can act as an oracle, including a
//! closure, which is how tests pin exact heights at chosen positions.

use serde::{Deserialize, Serialize};

use crate::noise::{SimplexNoise, WorldSeed};

/// Deterministic height function of a world position and seed.
///
/// Implementations must be pure: the same arguments always yield the same
/// value. Chunks are regenerated from this function, never stored.
pub trait TerrainOracle {
    /// Returns the terrain height at world block `(x, y)` for `seed`.
    fn height(&self, x: i32, y: i32, seed: WorldSeed) -> f64;
}

impl<F> TerrainOracle for F
where
    F: Fn(i32, i32, WorldSeed) -> f64,
{
    #[inline]
    fn height(&self, x: i32, y: i32, seed: WorldSeed) -> f64 {
        self(x, y, seed)
    }
}

/// Shape parameters for [`SimplexTerrain`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// Mean height of the surface line in blocks.
    pub surface_level: f64,
    /// Peak deviation of the surface line from its mean in blocks.
    pub surface_amplitude: f64,
    /// Horizontal frequency of the surface profile.
    pub surface_scale: f64,
    /// Octaves summed for the surface profile.
    pub surface_octaves: u32,
    /// Blocks below the surface at which ground reaches full solidity.
    pub depth_scale: f64,
    /// Frequency of the cave field.
    pub cave_scale: f64,
    /// Octaves summed for the cave field.
    pub cave_octaves: u32,
    /// Half-width of cave tunnels in noise units.
    pub cave_width: f64,
    /// Blocks below the surface at which caves reach full strength.
    pub cave_depth: f64,
    /// Amplitude decay per octave.
    pub persistence: f64,
    /// Frequency increase per octave.
    pub lacunarity: f64,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            surface_level: 0.0,
            surface_amplitude: 24.0,
            surface_scale: 0.012,
            surface_octaves: 4,
            depth_scale: 6.0,
            cave_scale: 0.045,
            cave_octaves: 2,
            cave_width: 0.12,
            cave_depth: 10.0,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Noise channels for one seed.
#[derive(Clone)]
struct TerrainNoise {
    seed: WorldSeed,
    surface: SimplexNoise,
    caves: SimplexNoise,
}

impl TerrainNoise {
    /// Stream purpose for the surface profile.
    const SURFACE_STREAM: u64 = 1;
    /// Stream purpose for the cave field.
    const CAVE_STREAM: u64 = 2;

    fn new(seed: WorldSeed) -> Self {
        Self {
            seed,
            surface: SimplexNoise::new(seed.derive(Self::SURFACE_STREAM)),
            caves: SimplexNoise::new(seed.derive(Self::CAVE_STREAM)),
        }
    }
}

/// Simplex-noise terrain: a rolling surface line carved by worm caves.
///
/// Noise tables are built for the seed given at construction. Asking for a
/// different seed builds throwaway tables for that call, so the oracle stays
/// a pure function of its arguments.
#[derive(Clone)]
pub struct SimplexTerrain {
    params: TerrainParams,
    noise: TerrainNoise,
}

impl SimplexTerrain {
    /// Creates a terrain oracle primed for `seed`.
    #[must_use]
    pub fn new(seed: WorldSeed, params: TerrainParams) -> Self {
        Self {
            params,
            noise: TerrainNoise::new(seed),
        }
    }

    /// Creates a terrain oracle with default parameters.
    #[must_use]
    pub fn with_seed(seed: WorldSeed) -> Self {
        Self::new(seed, TerrainParams::default())
    }

    /// Returns the shape parameters.
    #[must_use]
    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Returns the height of the surface line at column `x`.
    #[must_use]
    pub fn surface_height(&self, x: i32, seed: WorldSeed) -> f64 {
        if seed.same_streams(self.noise.seed) {
            self.surface_with(&self.noise, x)
        } else {
            self.surface_with(&TerrainNoise::new(seed), x)
        }
    }

    fn surface_with(&self, noise: &TerrainNoise, x: i32) -> f64 {
        let p = &self.params;
        let profile = noise.surface.octaved(
            f64::from(x) * p.surface_scale,
            0.0,
            p.surface_octaves,
            p.persistence,
            p.lacunarity,
        );
        p.surface_level + p.surface_amplitude * profile
    }

    fn height_with(&self, noise: &TerrainNoise, x: i32, y: i32) -> f64 {
        let p = &self.params;
        let depth = self.surface_with(noise, x) - f64::from(y);
        let ground = depth / p.depth_scale;
        if ground <= 0.0 {
            return ground;
        }

        let tunnel = noise
            .caves
            .octaved(
                f64::from(x) * p.cave_scale,
                f64::from(y) * p.cave_scale,
                p.cave_octaves,
                p.persistence,
                p.lacunarity,
            )
            .abs();
        let carve = ((tunnel - p.cave_width) / p.cave_width).clamp(-1.0, 1.0);
        let reach = (depth / p.cave_depth).clamp(0.0, 1.0);

        ground.min(1.0) * (1.0 - reach * (1.0 - carve))
    }
}

impl TerrainOracle for SimplexTerrain {
    fn height(&self, x: i32, y: i32, seed: WorldSeed) -> f64 {
        if seed.same_streams(self.noise.seed) {
            self.height_with(&self.noise, x, y)
        } else {
            self.height_with(&TerrainNoise::new(seed), x, y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_is_deterministic() {
        let seed = WorldSeed::new(42.0);
        let a = SimplexTerrain::with_seed(seed);
        let b = SimplexTerrain::with_seed(seed);

        for x in -64..64 {
            for y in [-40, -3, 0, 5, 31] {
                assert_eq!(a.height(x, y, seed), b.height(x, y, seed), "Mismatch at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_foreign_seed_matches_primed_oracle() {
        let primed = SimplexTerrain::with_seed(WorldSeed::new(7.5));
        let other = SimplexTerrain::with_seed(WorldSeed::new(-3.0));

        for x in -20..20 {
            assert_eq!(
                primed.height(x, -10, WorldSeed::new(-3.0)),
                other.height(x, -10, WorldSeed::new(-3.0)),
            );
        }
    }

    #[test]
    fn test_air_above_surface_ground_below() {
        let seed = WorldSeed::DEVELOPMENT;
        let terrain = SimplexTerrain::with_seed(seed);
        let reach = terrain.params().surface_amplitude;

        #[allow(clippy::cast_possible_truncation)]
        let high = (reach * 2.0) as i32;

        for x in (-500..500).step_by(7) {
            assert!(terrain.height(x, high, seed) <= 0.0, "Solid sky at x={x}");
        }

        let solid = (-500..500)
            .filter(|&x| {
                let surface = terrain.surface_height(x, seed);
                #[allow(clippy::cast_possible_truncation)]
                let just_below = surface.floor() as i32 - 1;
                terrain.height(x, just_below, seed) > 0.0
            })
            .count();
        assert_eq!(solid, 1000, "Caves must not breach the surface");
    }

    #[test]
    fn test_nan_seed_uses_primed_tables() {
        let seed = WorldSeed::new(f64::NAN);
        let primed = SimplexTerrain::with_seed(seed);
        let fresh = SimplexTerrain::with_seed(WorldSeed::new(f64::NAN));

        assert!(seed.same_streams(primed.noise.seed));
        for x in -10..10 {
            assert_eq!(
                primed.height(x, -4, seed).to_bits(),
                fresh.height(x, -4, seed).to_bits()
            );
        }
    }

    #[test]
    fn test_closures_are_oracles() {
        let flat = |_x: i32, y: i32, _seed: WorldSeed| -f64::from(y);
        assert!(flat.height(0, -1, WorldSeed::default()) > 0.0);
        assert!(flat.height(0, 0, WorldSeed::default()) <= 0.0);
    }
}
