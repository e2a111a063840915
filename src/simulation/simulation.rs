// simulation/simulation.rs
// Contains the SimulationRun struct and the per-tick step

use log::debug;
use smallvec::SmallVec;
use ultraviolet::Vec2;

use super::collision::{self, Reactions};
use super::forces;
use super::request::RunRequest;
use super::snapshot::{SpeciesCounts, SpeciesTally, TickSnapshot};
use super::store::ParticleStore;
use crate::body::{age_effects, Species};
use crate::config::SimConfig;
use crate::error::Result;

/// Result of one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepOutcome {
    pub reacted_pairs: usize,
    pub reactions: Reactions,
    pub expired_effects: usize,
}

/// All state of one neutralization run. Owned by the caller; nothing is
/// shared between runs.
#[derive(Clone, Debug)]
pub struct SimulationRun {
    pub store: ParticleStore,
    pub tick: u64,
    pub total_reacted: usize,
    pub initial: RunRequest,
    pub config: SimConfig,
    pub seed: u64,
    rng: fastrand::Rng,
}

impl SimulationRun {
    pub fn new(request: RunRequest, config: SimConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let mut rng = fastrand::Rng::with_seed(seed);
        let store = ParticleStore::initialize(&request, &mut rng);
        Ok(Self {
            store,
            tick: 0,
            total_reacted: 0,
            initial: request,
            config,
            seed,
            rng,
        })
    }

    /// Start from a prepared store. Products already present count as
    /// reacted pairs so the conservation identities hold from tick 0.
    pub fn with_store(store: ParticleStore, config: SimConfig, seed: u64) -> Result<Self> {
        let formed = store.product.len();
        let initial = RunRequest {
            acid: store.acid.len() + formed,
            base: store.base.len() + formed,
        };
        Self::restore(store, initial, formed, 0, config, seed)
    }

    /// Rebuild a run from saved counters. The RNG stream restarts from `seed`.
    pub fn restore(
        store: ParticleStore,
        initial: RunRequest,
        total_reacted: usize,
        tick: u64,
        config: SimConfig,
        seed: u64,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            tick,
            total_reacted,
            initial,
            config,
            seed,
            rng: fastrand::Rng::with_seed(seed),
        })
    }

    pub fn is_terminal(&self) -> bool {
        self.store.reactants_exhausted()
    }

    /// One tick: react, age effects, attract, diffuse, clip.
    pub fn step(&mut self) -> StepOutcome {
        let reactions = collision::react(&mut self.store, &self.config);
        let expired_effects = age_effects(&mut self.store.effects, &self.config);
        forces::apply_attraction(&mut self.store, &self.config);
        self.diffuse();
        self.store.clip_all();

        let reacted_pairs = reactions.len();
        self.total_reacted += reacted_pairs;
        self.tick += 1;

        if reacted_pairs > 0 {
            debug!(
                "tick {}: {} pair(s) reacted at {:?}",
                self.tick,
                reacted_pairs,
                reactions.iter().map(|r| (r.pos.x, r.pos.y)).collect::<SmallVec<[(f32, f32); 8]>>()
            );
        }

        StepOutcome {
            reacted_pairs,
            reactions,
            expired_effects,
        }
    }

    /// Memoryless displacement, uniform in [-amplitude, amplitude] per axis.
    fn diffuse(&mut self) {
        for species in Species::ALL {
            let amplitude = self.config.diffusion.for_species(species);
            if amplitude == 0.0 {
                continue;
            }
            let rng = &mut self.rng;
            for particle in self.store.collection_mut(species).iter_mut() {
                let dx = (rng.f32() * 2.0 - 1.0) * amplitude;
                let dy = (rng.f32() * 2.0 - 1.0) * amplitude;
                particle.pos += Vec2::new(dx, dy);
            }
        }
    }

    pub fn counts(&self) -> SpeciesCounts {
        let acid_left = self.store.acid.len();
        let base_left = self.store.base.len();
        let water = self.store.product.len();
        SpeciesCounts {
            acid: SpeciesTally {
                initial: self.initial.acid,
                reacted: self.initial.acid.saturating_sub(acid_left),
                remaining: acid_left,
            },
            base: SpeciesTally {
                initial: self.initial.base,
                reacted: self.initial.base.saturating_sub(base_left),
                remaining: base_left,
            },
            product: SpeciesTally {
                initial: 0,
                reacted: water,
                remaining: water,
            },
        }
    }

    pub fn snapshot(&self, reacted_this_tick: usize) -> TickSnapshot {
        TickSnapshot {
            tick: self.tick,
            acid: self.store.positions(Species::Acid),
            base: self.store.positions(Species::Base),
            product: self.store.positions(Species::Product),
            effects: self.store.effects.clone(),
            effect_shape: self.config.effect_shape,
            reacted_this_tick,
            total_reacted: self.total_reacted,
            counts: self.counts(),
        }
    }
}
