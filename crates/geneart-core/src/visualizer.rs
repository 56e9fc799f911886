//! The artwork session: loaded genes, status line, the running simulation
//! and its animation loop.
//!
//! Fetching sequences is the host's job. The host reports the outcome
//! through [`Visualizer::load_sequence`] or
//! [`Visualizer::report_fetch_failure`] and then calls
//! [`Visualizer::frame`] from its per-frame callback with the generation
//! number returned by [`Visualizer::generate`].

use std::collections::HashMap;

use crate::analysis::GeneProfile;
use crate::cache::{SequenceCache, SequenceRecord};
use crate::config::{ArtConfig, MovementMode};
use crate::error::{GeneArtError, Result};
use crate::render::{Renderer, Surface};
use crate::schedule::{AnimationLoop, FrameClock};
use crate::shapes::ShapeKind;
use crate::simulation::Simulation;

pub const STATUS_LOADING: &str = "Loading gene sequence...";
pub const STATUS_FETCH_ERROR: &str = "Error loading gene sequence";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The callback's generation is no longer current; do not reschedule.
    Stopped,
    /// Too early for the next tick; reschedule without touching state.
    Skipped,
    /// One tick was simulated and painted.
    Ticked,
}

pub struct Visualizer {
    config: ArtConfig,
    renderer: Renderer,
    cache: SequenceCache,
    genes: HashMap<String, GeneProfile>,
    current: Option<String>,
    status: String,
    simulation: Option<Simulation>,
    clock: FrameClock,
    animation: AnimationLoop,
}

impl Visualizer {
    pub fn new(config: ArtConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            renderer: Renderer::from_config(&config),
            clock: FrameClock::new(config.frame_interval_ms),
            config,
            cache: SequenceCache::new(),
            genes: HashMap::new(),
            current: None,
            status: String::new(),
            simulation: None,
            animation: AnimationLoop::new(),
        })
    }

    pub fn config(&self) -> &ArtConfig {
        &self.config
    }

    /// Replace the configuration. The running generation keeps drawing and
    /// pacing with the old one; everything switches at the next generation.
    pub fn set_config(&mut self, config: ArtConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Select the movement rule for the next generation.
    pub fn set_movement(&mut self, movement: MovementMode) {
        self.config.movement = movement;
    }

    /// Switch the morph target layout, live if a simulation is running.
    pub fn set_shape(&mut self, shape: Option<ShapeKind>) {
        self.config.shape = shape;
        if let Some(sim) = self.simulation.as_mut() {
            sim.set_shape(shape);
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn cache(&self) -> &SequenceCache {
        &self.cache
    }

    pub fn profile(&self, id: &str) -> Option<&GeneProfile> {
        self.genes.get(id)
    }

    pub fn current_gene(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn simulation(&self) -> Option<&Simulation> {
        self.simulation.as_ref()
    }

    pub fn animation(&self) -> &AnimationLoop {
        &self.animation
    }

    /// Mark that the host started fetching `id`.
    pub fn begin_fetch(&mut self, id: &str) {
        log::info!("fetching sequence for {}", id);
        self.status = STATUS_LOADING.to_string();
    }

    /// Generate from the cached sequence of `id` if there is one.
    /// Returns the new loop generation, or `None` on a cache miss.
    pub fn load_cached<S: Surface + ?Sized>(&mut self, id: &str, seed: u64, surface: &mut S) -> Result<Option<u64>> {
        let Some(record) = self.cache.get(id).cloned() else {
            return Ok(None);
        };
        log::debug!("cache hit for {}", id);
        self.apply_record(id, &record);
        self.generate(id, seed, surface).map(Some)
    }

    /// Accept a freshly fetched sequence, remember it, and generate from it.
    pub fn load_sequence<S: Surface + ?Sized>(
        &mut self,
        id: &str,
        record: SequenceRecord,
        seed: u64,
        surface: &mut S,
    ) -> Result<u64> {
        self.apply_record(id, &record);
        self.cache.insert(id, record);
        self.generate(id, seed, surface)
    }

    /// Like [`Visualizer::load_sequence`], starting from the raw JSON body of
    /// the sequence endpoint. A malformed body counts as a failed fetch.
    pub fn load_sequence_json<S: Surface + ?Sized>(
        &mut self,
        id: &str,
        json: &str,
        seed: u64,
        surface: &mut S,
    ) -> Result<u64> {
        let record = match SequenceRecord::from_json(json) {
            Ok(record) => record,
            Err(err) => {
                self.report_fetch_failure(id, &err.to_string());
                return Err(err);
            }
        };
        self.load_sequence(id, record, seed, surface)
    }

    /// The fetch for `id` failed. Whatever is on screen stays; nothing is
    /// regenerated.
    pub fn report_fetch_failure(&mut self, id: &str, message: &str) {
        log::error!("error fetching gene sequence {}: {}", id, message);
        self.status = STATUS_FETCH_ERROR.to_string();
    }

    fn apply_record(&mut self, id: &str, record: &SequenceRecord) {
        let profile = GeneProfile::new(id, &record.seq, &record.desc);
        match profile.frequency {
            Some(f) => log::debug!(
                "{}: A={:.3} T={:.3} G={:.3} C={:.3}, mostly {}",
                id,
                f.a,
                f.t,
                f.g,
                f.c,
                f.dominant().symbol()
            ),
            None => log::warn!("{}: empty sequence, composition skipped", id),
        }
        self.status = format!("Loaded sequence for {}", record.desc);
        self.genes.insert(id.to_string(), profile);
    }

    /// Start a new artwork from the loaded gene `id`.
    ///
    /// The previous loop generation is cancelled before the new one starts,
    /// so at most one generation is ever current. If the new simulation
    /// cannot be built, the previous one keeps running.
    pub fn generate<S: Surface + ?Sized>(&mut self, id: &str, seed: u64, surface: &mut S) -> Result<u64> {
        let profile = self
            .genes
            .get(id)
            .ok_or_else(|| GeneArtError::UnknownGene(id.to_string()))?;
        let simulation = Simulation::new(&profile.sequence, self.config.clone(), seed)?;
        self.status = profile.info.clone();

        log::info!("generating {} with noise seed {}", id, simulation.noise().seed());

        self.animation.cancel();
        surface.clear();
        self.renderer = Renderer::from_config(&self.config);
        self.clock.interval_ms = self.config.frame_interval_ms;
        self.clock.reset();
        self.simulation = Some(simulation);
        self.current = Some(id.to_string());
        Ok(self.animation.start())
    }

    /// Stop the current loop. The last frame stays on the surface.
    pub fn stop(&mut self) -> Option<u64> {
        self.animation.cancel()
    }

    /// Per-frame callback body for loop `generation` at host time `now_ms`.
    pub fn frame<S: Surface + ?Sized>(&mut self, generation: u64, now_ms: f64, surface: &mut S) -> FrameOutcome {
        if !self.animation.is_current(generation) {
            return FrameOutcome::Stopped;
        }
        let Some(sim) = self.simulation.as_mut() else {
            return FrameOutcome::Stopped;
        };
        if !self.clock.should_tick(now_ms) {
            return FrameOutcome::Skipped;
        }
        sim.step();
        sim.render(&self.renderer, surface);
        FrameOutcome::Ticked
    }
}
