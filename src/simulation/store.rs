// simulation/store.rs
// Owns the three particle collections and the live reaction effects

use serde::{Deserialize, Serialize};
use ultraviolet::Vec2;

use super::request::RunRequest;
use crate::body::{Particle, ReactionEffect, Species};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ParticleStore {
    pub acid: Vec<Particle>,
    pub base: Vec<Particle>,
    pub product: Vec<Particle>,
    pub effects: Vec<ReactionEffect>,
}

impl ParticleStore {
    /// Scatter the requested reactants uniformly over the unit square.
    /// Acid positions are drawn before base positions so a given seed always
    /// yields the same layout.
    pub fn initialize(request: &RunRequest, rng: &mut fastrand::Rng) -> Self {
        let acid = (0..request.acid)
            .map(|_| Particle::random(Species::Acid, rng))
            .collect();
        let base = (0..request.base)
            .map(|_| Particle::random(Species::Base, rng))
            .collect();
        Self {
            acid,
            base,
            product: Vec::new(),
            effects: Vec::new(),
        }
    }

    /// Build a store from explicit positions. Used by scenario setups and tests.
    pub fn from_positions(acid: &[Vec2], base: &[Vec2]) -> Self {
        Self {
            acid: acid.iter().map(|&p| Particle::new(p, Species::Acid)).collect(),
            base: base.iter().map(|&p| Particle::new(p, Species::Base)).collect(),
            product: Vec::new(),
            effects: Vec::new(),
        }
    }

    pub fn collection(&self, species: Species) -> &[Particle] {
        match species {
            Species::Acid => &self.acid,
            Species::Base => &self.base,
            Species::Product => &self.product,
        }
    }

    pub fn collection_mut(&mut self, species: Species) -> &mut Vec<Particle> {
        match species {
            Species::Acid => &mut self.acid,
            Species::Base => &mut self.base,
            Species::Product => &mut self.product,
        }
    }

    /// Remove one particle. The last particle of the collection takes its
    /// slot; collection order carries no meaning. `index` must be in range.
    pub fn remove(&mut self, species: Species, index: usize) -> Particle {
        self.collection_mut(species).swap_remove(index)
    }

    pub fn push_product(&mut self, pos: Vec2) {
        self.product.push(Particle::new(pos, Species::Product));
    }

    pub fn push_effect(&mut self, effect: ReactionEffect) {
        self.effects.push(effect);
    }

    /// Clip every particle of every species back into [0, 1]².
    pub fn clip_all(&mut self) {
        for species in Species::ALL {
            for particle in self.collection_mut(species).iter_mut() {
                particle.clamp_to_unit();
            }
        }
    }

    pub fn len(&self, species: Species) -> usize {
        self.collection(species).len()
    }

    pub fn reactants_exhausted(&self) -> bool {
        self.acid.is_empty() || self.base.is_empty()
    }

    pub fn positions(&self, species: Species) -> Vec<Vec2> {
        self.collection(species).iter().map(|p| p.pos).collect()
    }

    pub fn all_in_bounds(&self) -> bool {
        Species::ALL
            .iter()
            .all(|&s| self.collection(s).iter().all(Particle::in_bounds))
    }
}
