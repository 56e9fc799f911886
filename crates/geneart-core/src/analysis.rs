//! Base composition of a nucleotide sequence.

use serde::{Deserialize, Serialize};

use crate::particle::Category;

/// Share of each base over the whole sequence length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseFrequency {
    pub a: f32,
    pub t: f32,
    pub g: f32,
    pub c: f32,
}

impl BaseFrequency {
    pub fn get(&self, category: Category) -> f32 {
        match category {
            Category::Adenine => self.a,
            Category::Thymine => self.t,
            Category::Guanine => self.g,
            Category::Cytosine => self.c,
            Category::Unknown => 0.0,
        }
    }

    pub fn total(&self) -> f32 {
        self.a + self.t + self.g + self.c
    }

    /// Base with the highest share; ties resolve in `A, T, G, C` order.
    pub fn dominant(&self) -> Category {
        Category::BASES
            .into_iter()
            .fold(Category::Adenine, |best, c| if self.get(c) > self.get(best) { c } else { best })
    }
}

/// Count `A/T/G/C` (case-insensitive) and divide by the total character
/// count. Unrecognised characters count toward the length only, so the
/// shares sum to 1 exactly when every character is a base.
///
/// Returns `None` for an empty sequence.
pub fn analyze_sequence(sequence: &str) -> Option<BaseFrequency> {
    let mut counts = [0usize; 4];
    let mut total = 0usize;
    for b in sequence.bytes() {
        total += 1;
        match Category::from_byte(b) {
            Category::Unknown => {}
            c => counts[c as usize] += 1,
        }
    }
    if total == 0 {
        return None;
    }
    let total = total as f32;
    Some(BaseFrequency {
        a: counts[Category::Adenine as usize] as f32 / total,
        t: counts[Category::Thymine as usize] as f32 / total,
        g: counts[Category::Guanine as usize] as f32 / total,
        c: counts[Category::Cytosine as usize] as f32 / total,
    })
}

/// What the visualizer knows about a loaded gene.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneProfile {
    pub id: String,
    pub info: String,
    pub description: String,
    pub sequence: String,
    pub frequency: Option<BaseFrequency>,
}

impl GeneProfile {
    pub fn new(id: &str, sequence: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            info: format!("Gene {}", id),
            description: description.to_string(),
            sequence: sequence.to_string(),
            frequency: analyze_sequence(sequence),
        }
    }
}
