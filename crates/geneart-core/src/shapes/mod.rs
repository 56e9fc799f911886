/// Target layouts the particles can morph toward.
///
/// [`targets`] dispatches on [`ShapeKind`] and produces one position per
/// particle slot from the generators in [`primitives`].
pub mod primitives;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::GeneArtError;
use primitives::{shape_circle, shape_helix, shape_wave};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Helix,
    Circle,
    Wave,
}

impl std::str::FromStr for ShapeKind {
    type Err = GeneArtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "helix" => Ok(ShapeKind::Helix),
            "circle" => Ok(ShapeKind::Circle),
            "wave" => Ok(ShapeKind::Wave),
            other => Err(GeneArtError::UnknownShape(other.to_string())),
        }
    }
}

/// One target per particle slot, clamped onto the canvas.
pub fn targets(kind: ShapeKind, count: usize, width: f32, height: f32) -> Vec<Vec2> {
    let size = Vec2::new(width, height);
    let center = size * 0.5;

    (0..count)
        .map(|i| {
            let t = i as f32 / count as f32;
            let p = match kind {
                ShapeKind::Helix => shape_helix(t, center, size),
                ShapeKind::Circle => shape_circle(t, i, center),
                ShapeKind::Wave => shape_wave(t, center, size),
            };
            p.clamp(Vec2::ZERO, size)
        })
        .collect()
}
