use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::ArtConfig;
use crate::error::Result;
use crate::field::FlowField;
use crate::integrator::{self, StepContext};
use crate::noise::NoiseSource;
use crate::particle::ParticleSet;
use crate::render::{Renderer, Surface};
use crate::shapes::{self, ShapeKind};

/// Everything one generation of the artwork mutates.
///
/// The whole context is replaced when a new sequence is generated; particle
/// count stays fixed for its lifetime.
pub struct Simulation {
    pub particles: ParticleSet,
    pub config: ArtConfig,
    pub field: FlowField,
    noise: NoiseSource,
    rng: StdRng,
    tick: u64,
    targets: Option<Vec<Vec2>>,
}

impl Simulation {
    /// Seed particles from `sequence`. `seed` fixes both the noise
    /// permutation and the random stream.
    pub fn new(sequence: &str, config: ArtConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let particles = ParticleSet::from_sequence(
            sequence,
            config.particle_count,
            Vec2::new(config.width, config.height),
            &mut rng,
        )?;
        let field = FlowField::from_config(&config);
        let targets = config
            .shape
            .map(|kind| shapes::targets(kind, particles.count, config.width, config.height));

        log::info!(
            "simulation seeded: {} particles, {:?} mode, {}x{} field",
            particles.count,
            config.movement,
            field.cols,
            field.rows
        );

        Ok(Self {
            particles,
            config,
            field,
            noise: NoiseSource::new(seed as u32),
            rng,
            tick: 0,
            targets,
        })
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Scaled time of the current tick.
    pub fn time(&self) -> f32 {
        self.tick as f32 * self.config.time_scale
    }

    pub fn noise(&self) -> &NoiseSource {
        &self.noise
    }

    pub fn targets(&self) -> Option<&[Vec2]> {
        self.targets.as_deref()
    }

    /// Select a layout to morph toward, or `None` to let particles roam.
    pub fn set_shape(&mut self, shape: Option<ShapeKind>) {
        self.config.shape = shape;
        self.targets = shape.map(|kind| {
            shapes::targets(kind, self.particles.count, self.config.width, self.config.height)
        });
    }

    /// Advance one tick: refresh the flow field, move every particle, then
    /// pull positions toward the shape targets if a shape is selected.
    pub fn step(&mut self) {
        self.tick += 1;
        if self.particles.is_empty() {
            return;
        }

        self.field.refresh(&self.noise);
        let ctx = StepContext {
            config: &self.config,
            noise: &self.noise,
            field: &self.field,
            time: self.time(),
            frame: self.tick as f32,
        };
        integrator::step(&mut self.particles, &ctx, &mut self.rng);

        if let Some(targets) = &self.targets {
            integrator::morph_toward(&mut self.particles, targets, self.config.transition_speed);
        }
    }

    pub fn render<S: Surface + ?Sized>(&self, renderer: &Renderer, surface: &mut S) {
        renderer.draw_frame(&self.particles, self.tick, surface);
    }
}
