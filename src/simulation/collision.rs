// simulation/collision.rs
// Acid-base proximity detection and at-most-once pair resolution

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use ultraviolet::Vec2;

use super::store::ParticleStore;
use crate::body::{Particle, ReactionEffect, Species};
use crate::config::SimConfig;

/// An acid-base pair closer than the collision threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub acid: usize,
    pub base: usize,
    pub dist_sq: f32,
}

/// One acid + one base -> one product, at their midpoint.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub pos: Vec2,
}

pub type Reactions = SmallVec<[Reaction; 8]>;

fn row_candidates(i: usize, a: &Particle, base: &[Particle], threshold_sq: f32) -> Vec<Candidate> {
    base.iter()
        .enumerate()
        .filter_map(|(j, b)| {
            let dist_sq = a.distance_sq(b);
            (dist_sq < threshold_sq).then_some(Candidate {
                acid: i,
                base: j,
                dist_sq,
            })
        })
        .collect()
}

/// Exhaustive |acid| × |base| distance check. Candidates come back in
/// acid-major, base-minor order whether or not the search ran in parallel.
pub fn find_candidates(
    acid: &[Particle],
    base: &[Particle],
    threshold: f32,
    parallel_threshold: usize,
) -> Vec<Candidate> {
    let threshold_sq = threshold * threshold;
    if acid.len().saturating_mul(base.len()) >= parallel_threshold {
        let rows: Vec<Vec<Candidate>> = acid
            .par_iter()
            .enumerate()
            .map(|(i, a)| row_candidates(i, a, base, threshold_sq))
            .collect();
        rows.into_iter().flatten().collect()
    } else {
        acid.iter()
            .enumerate()
            .flat_map(|(i, a)| row_candidates(i, a, base, threshold_sq))
            .collect()
    }
}

/// Greedily confirm candidates in order, skipping any whose acid or base was
/// already consumed earlier in the same tick.
pub fn resolve(candidates: &[Candidate], acid_len: usize, base_len: usize) -> SmallVec<[(usize, usize); 8]> {
    let mut acid_used = vec![false; acid_len];
    let mut base_used = vec![false; base_len];
    let mut confirmed = SmallVec::new();
    for c in candidates {
        if acid_used[c.acid] || base_used[c.base] {
            continue;
        }
        acid_used[c.acid] = true;
        base_used[c.base] = true;
        confirmed.push((c.acid, c.base));
    }
    confirmed
}

/// Detect collisions and turn each confirmed pair into a product particle
/// plus a reaction effect. Does nothing once either reactant is gone.
pub fn react(store: &mut ParticleStore, config: &SimConfig) -> Reactions {
    if store.reactants_exhausted() {
        return Reactions::new();
    }

    let candidates = find_candidates(
        &store.acid,
        &store.base,
        config.collision_threshold,
        config.parallel_pair_threshold,
    );
    let confirmed = resolve(&candidates, store.acid.len(), store.base.len());
    if confirmed.is_empty() {
        return Reactions::new();
    }

    let mut reactions = Reactions::with_capacity(confirmed.len());
    for &(i, j) in &confirmed {
        let pos = store.acid[i].midpoint(&store.base[j]);
        store.push_product(pos);
        store.push_effect(ReactionEffect::new(pos, config.effect_min_size));
        reactions.push(Reaction { pos });
    }

    // Highest index first: swap-removal then only ever moves a particle
    // that is not scheduled for removal.
    let mut acid_idx: SmallVec<[usize; 8]> = confirmed.iter().map(|&(i, _)| i).collect();
    let mut base_idx: SmallVec<[usize; 8]> = confirmed.iter().map(|&(_, j)| j).collect();
    acid_idx.sort_unstable_by(|a, b| b.cmp(a));
    base_idx.sort_unstable_by(|a, b| b.cmp(a));
    for i in acid_idx {
        store.remove(Species::Acid, i);
    }
    for j in base_idx {
        store.remove(Species::Base, j);
    }

    reactions
}
