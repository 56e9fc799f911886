//! Coherent 3D noise used for steering and the flow field.

use ::noise::{NoiseFn, OpenSimplex};

/// Octave weights for [`NoiseSource::octaves`]: amplitude, spatial and
/// temporal frequency multipliers.
const OCTAVES: [(f32, f32, f32); 3] = [(1.0, 1.0, 1.0), (0.5, 2.0, 1.5), (0.25, 4.0, 2.0)];

/// Seeded OpenSimplex noise with output clamped to `[-1, 1]`.
///
/// The generator's permutation table is built once in [`NoiseSource::new`];
/// sampling never mutates it.
#[derive(Clone)]
pub struct NoiseSource {
    generator: OpenSimplex,
    seed: u32,
}

impl NoiseSource {
    pub fn new(seed: u32) -> Self {
        Self {
            generator: OpenSimplex::new(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn sample(&self, x: f32, y: f32, z: f32) -> f32 {
        let v = self.generator.get([x as f64, y as f64, z as f64]) as f32;
        v.clamp(-1.0, 1.0)
    }

    /// Three octaves summed: weights 1, 0.5, 0.25 at spatial frequency ×1, ×2,
    /// ×4 and temporal frequency ×1, ×1.5, ×2. Range is `[-1.75, 1.75]`.
    pub fn octaves(&self, x: f32, y: f32, z: f32) -> f32 {
        OCTAVES
            .iter()
            .map(|&(amp, freq, tfreq)| self.sample(x * freq, y * freq, z * tfreq) * amp)
            .sum()
    }
}

impl std::fmt::Debug for NoiseSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseSource").field("seed", &self.seed).finish()
    }
}
