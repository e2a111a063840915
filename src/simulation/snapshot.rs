// simulation/snapshot.rs
// Per-tick data handed to renderers and reporters

use serde::{Deserialize, Serialize};
use ultraviolet::Vec2;

use crate::body::{ReactionEffect, Species};
use crate::config::EffectShape;

/// Initial / reacted / remaining for one species.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesTally {
    pub initial: usize,
    pub reacted: usize,
    pub remaining: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesCounts {
    pub acid: SpeciesTally,
    pub base: SpeciesTally,
    /// Water starts at zero; "reacted" and "remaining" both equal the amount formed.
    pub product: SpeciesTally,
}

impl SpeciesCounts {
    pub fn get(&self, species: Species) -> SpeciesTally {
        match species {
            Species::Acid => self.acid,
            Species::Base => self.base,
            Species::Product => self.product,
        }
    }

    /// Rows of the live results table, one per species.
    pub fn rows(&self) -> [(Species, SpeciesTally); 3] {
        [
            (Species::Acid, self.acid),
            (Species::Base, self.base),
            (Species::Product, self.product),
        ]
    }
}

/// Everything a renderer needs to draw one frame. Positions are plain lists;
/// nothing here exposes the store's internal ordering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub tick: u64,
    pub acid: Vec<Vec2>,
    pub base: Vec<Vec2>,
    pub product: Vec<Vec2>,
    pub effects: Vec<ReactionEffect>,
    pub effect_shape: EffectShape,
    pub reacted_this_tick: usize,
    pub total_reacted: usize,
    pub counts: SpeciesCounts,
}

impl TickSnapshot {
    pub fn positions(&self, species: Species) -> &[Vec2] {
        match species {
            Species::Acid => &self.acid,
            Species::Base => &self.base,
            Species::Product => &self.product,
        }
    }
}
