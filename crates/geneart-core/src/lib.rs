//! Gene-driven particle art engine.
//!
//! A nucleotide sequence assigns categories (and therefore colors) to a fixed
//! set of particles which are then steered through a noise flow field and
//! painted onto an abstract [`render::Surface`].

pub mod analysis;
pub mod cache;
pub mod config;
pub mod connections;
pub mod error;
pub mod field;
pub mod integrator;
pub mod math;
pub mod noise;
pub mod particle;
pub mod render;
pub mod schedule;
pub mod shapes;
pub mod simulation;
pub mod visualizer;

pub use error::{GeneArtError, Result};
