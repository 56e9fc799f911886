use serde::{Deserialize, Serialize};

use crate::error::{GeneArtError, Result};
use crate::render::ParticleStyle;
use crate::shapes::ShapeKind;

/// Upper bound on flow-field cells (`cols * rows`).
pub const MAX_FIELD_CELLS: usize = 1 << 20;
/// Upper bound on `particle_count`.
pub const MAX_PARTICLES: usize = 100_000;

/// Per-particle update strategy. Exactly one is active per simulation.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementMode {
    /// Multi-octave noise steering with soft margins and wraparound.
    #[default]
    Flow,
    /// Elliptical orbit around the canvas center.
    Helix,
    /// Straight-line wandering with a sinusoidal heading drift.
    Network,
}

impl std::str::FromStr for MovementMode {
    type Err = GeneArtError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "flow" => Ok(Self::Flow),
            "helix" => Ok(Self::Helix),
            "network" => Ok(Self::Network),
            other => Err(GeneArtError::UnknownMode(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtConfig {
    pub width: f32,
    pub height: f32,
    pub particle_count: usize,
    pub connection_radius: f32,
    pub max_connections: usize,
    pub draw_connections: bool,
    pub mutation_rate: f32,
    pub flow_speed: f32,
    pub noise_scale: f32,
    pub time_scale: f32,
    /// Hard cap on particle velocity magnitude (px per tick).
    pub particle_speed: f32,
    pub friction: f32,
    pub margin: f32,
    pub boundary_stiffness: f32,
    pub trail_threshold: f32,
    pub frame_interval_ms: f64,
    pub movement: MovementMode,
    pub shape: Option<ShapeKind>,
    pub transition_speed: f32,
    pub field_resolution: f32,
    pub field_scale: f32,
    pub field_depth_step: f32,
    /// 0 steers purely by noise, 1 purely by the flow field.
    pub field_blend: f32,
    pub glow_blur: f32,
    pub style: ParticleStyle,
}

impl Default for ArtConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            particle_count: 300,
            connection_radius: 100.0,
            max_connections: 200,
            draw_connections: false,
            mutation_rate: 0.05,
            flow_speed: 0.5,
            noise_scale: 0.003,
            time_scale: 0.001,
            particle_speed: 2.0,
            friction: 0.99,
            margin: 50.0,
            boundary_stiffness: 0.05,
            trail_threshold: 0.5,
            frame_interval_ms: 1000.0 / 30.0,
            movement: MovementMode::Flow,
            shape: None,
            transition_speed: 0.02,
            field_resolution: 20.0,
            field_scale: 0.005,
            field_depth_step: 0.001,
            field_blend: 0.0,
            glow_blur: 15.0,
            style: ParticleStyle::Glow,
        }
    }
}

impl ArtConfig {
    /// Parse a JSON document of overrides; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()) {
            return Err(GeneArtError::InvalidConfig(format!(
                "canvas must be non-empty and finite, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.field_resolution >= 1.0 && self.field_resolution.is_finite()) {
            return Err(GeneArtError::InvalidConfig(format!(
                "field_resolution must be at least 1px, got {}",
                self.field_resolution
            )));
        }
        let cells = (self.width / self.field_resolution).floor() as f64
            * (self.height / self.field_resolution).floor() as f64;
        if cells > MAX_FIELD_CELLS as f64 {
            return Err(GeneArtError::InvalidConfig(format!(
                "flow field of {} cells exceeds {}",
                cells, MAX_FIELD_CELLS
            )));
        }
        if self.particle_count > MAX_PARTICLES {
            return Err(GeneArtError::InvalidConfig(format!(
                "particle_count {} exceeds {}",
                self.particle_count, MAX_PARTICLES
            )));
        }
        if !(self.particle_speed > 0.0) {
            return Err(GeneArtError::InvalidConfig(
                "particle_speed must be positive".into(),
            ));
        }
        if !(self.friction > 0.0 && self.friction <= 1.0) {
            return Err(GeneArtError::InvalidConfig(format!(
                "friction must be in (0, 1], got {}",
                self.friction
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(GeneArtError::InvalidConfig(format!(
                "mutation_rate must be in [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.field_blend) || !(0.0..=1.0).contains(&self.transition_speed) {
            return Err(GeneArtError::InvalidConfig(
                "field_blend and transition_speed must be in [0, 1]".into(),
            ));
        }
        if self.margin < 0.0 {
            return Err(GeneArtError::InvalidConfig("margin must not be negative".into()));
        }
        Ok(())
    }

    pub fn center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}
