//! Optional acid-base attraction.
//!
//! Each acid-base pair within the attraction radius pulls both members
//! toward each other by a fixed displacement along the unit direction.
//! Pairs closer than `ATTRACTION_EPSILON` have no defined direction and are
//! skipped, so positions can never pick up NaN or infinity.

use rayon::prelude::*;
use ultraviolet::Vec2;

use super::store::ParticleStore;
use crate::body::Particle;
use crate::config::{SimConfig, ATTRACTION_EPSILON};

/// Total pull on `pos` from every particle in `others`, plus the number of
/// pairs skipped by the zero-distance guard.
fn pull(pos: Vec2, others: &[Particle], strength: f32, radius: Option<f32>) -> (Vec2, usize) {
    let mut total = Vec2::zero();
    let mut skipped = 0;
    for other in others {
        let d = other.pos - pos;
        let dist = d.mag();
        if dist <= ATTRACTION_EPSILON {
            skipped += 1;
            continue;
        }
        if radius.is_some_and(|r| dist > r) {
            continue;
        }
        total += d * (strength / dist);
    }
    (total, skipped)
}

fn pulls(
    targets: &[Particle],
    sources: &[Particle],
    strength: f32,
    radius: Option<f32>,
    parallel: bool,
) -> Vec<(Vec2, usize)> {
    if parallel {
        targets
            .par_iter()
            .map(|t| pull(t.pos, sources, strength, radius))
            .collect()
    } else {
        targets
            .iter()
            .map(|t| pull(t.pos, sources, strength, radius))
            .collect()
    }
}

/// Apply attraction to every remaining acid and base particle. Displacements
/// are computed from the positions at the start of the call, then applied.
/// Returns the number of zero-distance pairs that were skipped.
pub fn apply_attraction(store: &mut ParticleStore, config: &SimConfig) -> usize {
    if !config.attraction_enabled() || store.reactants_exhausted() {
        return 0;
    }
    let strength = config.attraction_strength;
    let radius = config.attraction_radius;
    let parallel = store.acid.len().saturating_mul(store.base.len()) >= config.parallel_pair_threshold;

    let acid_pulls = pulls(&store.acid, &store.base, strength, radius, parallel);
    let base_pulls = pulls(&store.base, &store.acid, strength, radius, parallel);

    let mut skipped = 0;
    for (particle, (delta, s)) in store.acid.iter_mut().zip(acid_pulls) {
        particle.pos += delta;
        skipped += s;
    }
    for (particle, (delta, _)) in store.base.iter_mut().zip(base_pulls) {
        particle.pos += delta;
    }
    if skipped > 0 {
        log::trace!("attraction skipped {} coincident pairs", skipped);
    }
    skipped
}
