// body/effect.rs
// Transient reaction markers drawn where a pair reacted

use serde::{Deserialize, Serialize};
use ultraviolet::Vec2;

use crate::config::{SimConfig, EFFECT_SIZE_TOLERANCE};

/// Cosmetic marker left at a reaction midpoint. It grows by a fixed amount
/// every tick and is dropped once it reaches the configured maximum.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReactionEffect {
    pub pos: Vec2,
    pub size: f32,
    /// Number of aging steps applied so far
    pub age: u32,
}

impl ReactionEffect {
    pub fn new(pos: Vec2, min_size: f32) -> Self {
        Self {
            pos,
            size: min_size,
            age: 0,
        }
    }

    /// Advance one tick. `size` is derived from the age rather than summed,
    /// so long-lived effects do not pick up f32 drift.
    pub fn grow(&mut self, config: &SimConfig) {
        self.age += 1;
        self.size = config.effect_min_size + self.age as f32 * config.effect_growth_rate;
    }

    pub fn is_expired(&self, max_size: f32) -> bool {
        self.size >= max_size - EFFECT_SIZE_TOLERANCE
    }
}

/// Grow every effect by one step and drop the ones that reached the maximum.
pub fn age_effects(effects: &mut Vec<ReactionEffect>, config: &SimConfig) -> usize {
    let before = effects.len();
    effects.retain_mut(|effect| {
        effect.grow(config);
        !effect.is_expired(config.effect_max_size)
    });
    before - effects.len()
}
