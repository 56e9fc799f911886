use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{GeneArtError, Result};

/// Nucleotide category carried by each particle; drives its base color.
///
/// Characters outside the four-letter alphabet become [`Category::Unknown`]
/// rather than failing, so the set of categories stays finite.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    Adenine  = 0,
    Thymine  = 1,
    Guanine  = 2,
    Cytosine = 3,
    Unknown  = 4,
}

impl Category {
    pub const BASES: [Category; 4] = [
        Category::Adenine,
        Category::Thymine,
        Category::Guanine,
        Category::Cytosine,
    ];

    /// ASCII case-insensitive.
    pub fn from_byte(b: u8) -> Self {
        match b.to_ascii_uppercase() {
            b'A' => Category::Adenine,
            b'T' => Category::Thymine,
            b'G' => Category::Guanine,
            b'C' => Category::Cytosine,
            _ => Category::Unknown,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Category::Adenine => 'A',
            Category::Thymine => 'T',
            Category::Guanine => 'G',
            Category::Cytosine => 'C',
            Category::Unknown => '?',
        }
    }
}

/// Drawn particle size range in px.
pub const SIZE_RANGE: std::ops::Range<f32> = 2.0..4.0;
/// Per-particle speed range for the helix and network modes.
pub const SPEED_RANGE: std::ops::Range<f32> = 0.5..2.0;

/// SoA particle storage
#[derive(Clone, Debug, Default)]
pub struct ParticleSet {
    pub count: usize,
    pub position: Vec<Vec2>,
    pub velocity: Vec<Vec2>,
    pub size: Vec<f32>,
    pub category: Vec<Category>,
    /// Heading used by the helix and network movement modes
    pub angle: Vec<f32>,
    /// Per-particle cruise speed for the helix and network modes
    pub speed: Vec<f32>,
}

impl ParticleSet {
    /// Allocate `count` particles at the origin, at rest, all `Unknown`.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            position: vec![Vec2::ZERO; count],
            velocity: vec![Vec2::ZERO; count],
            size: vec![SIZE_RANGE.start; count],
            category: vec![Category::Unknown; count],
            angle: vec![0.0; count],
            speed: vec![SPEED_RANGE.start; count],
        }
    }

    /// Seed `count` particles from `sequence`, reusing it cyclically when it
    /// is shorter than `count`. Positions are uniform over `bounds`.
    pub fn from_sequence<R: Rng + ?Sized>(
        sequence: &str,
        count: usize,
        bounds: Vec2,
        rng: &mut R,
    ) -> Result<Self> {
        let mut particles = Self::new(count);
        if count == 0 {
            return Ok(particles);
        }
        let bytes = sequence.as_bytes();
        if bytes.is_empty() {
            return Err(GeneArtError::EmptySequence);
        }

        for i in 0..count {
            particles.category[i] = Category::from_byte(bytes[i % bytes.len()]);
            particles.position[i] = Vec2::new(
                rng.gen::<f32>() * bounds.x,
                rng.gen::<f32>() * bounds.y,
            );
            particles.size[i] = rng.gen_range(SIZE_RANGE);
            particles.angle[i] = i as f32 / count as f32 * std::f32::consts::TAU;
            particles.speed[i] = rng.gen_range(SPEED_RANGE);
        }
        Ok(particles)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Packed particle record for zero-copy reads from JS: 24 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PackedParticle {
    pub position: [f32; 2],
    pub velocity: [f32; 2],
    pub size: f32,
    /// `Category` discriminant as a float
    pub category: f32,
}

impl ParticleSet {
    /// Write every particle into `out`, resizing it to `count`.
    pub fn pack_into(&self, out: &mut Vec<PackedParticle>) {
        out.resize(self.count, PackedParticle::default());
        for i in 0..self.count {
            out[i] = PackedParticle {
                position: self.position[i].to_array(),
                velocity: self.velocity[i].to_array(),
                size: self.size[i],
                category: self.category[i] as u8 as f32,
            };
        }
    }
}
